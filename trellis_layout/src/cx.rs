// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout context handed to element behaviors.

use kurbo::{Rect, Size};
use smallvec::SmallVec;
use trellis_property::{PropertyValue, ReadableProperty};

use crate::tree::ElementTree;
use crate::types::{ElementId, Visibility};

/// Access to the tree during [`ElementBehavior::measure_override`] and
/// [`ElementBehavior::arrange_override`].
///
/// The context is scoped to one element. It can measure and arrange that
/// element's own children and read their state; other elements are out of
/// reach, and the tree's structure cannot change while layout runs.
///
/// [`ElementBehavior::measure_override`]: crate::ElementBehavior::measure_override
/// [`ElementBehavior::arrange_override`]: crate::ElementBehavior::arrange_override
#[derive(Debug)]
pub struct LayoutCx<'a> {
    pub(crate) tree: &'a mut ElementTree,
    pub(crate) element: ElementId,
}

impl LayoutCx<'_> {
    /// Returns the element being laid out.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Returns a snapshot of the element's children in insertion order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ElementId; 8]> {
        self.tree.children(self.element).iter().copied().collect()
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.tree.children(self.element).len()
    }

    /// Reads a property of the element being laid out.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    #[must_use]
    pub fn get_value<T: PropertyValue>(&self, property: impl ReadableProperty<T>) -> T {
        self.tree
            .get_value(self.element, property)
            .unwrap_or_else(|| panic!("element {:?} removed during layout", self.element))
    }

    /// Returns a child's visibility.
    #[must_use]
    pub fn visibility(&self, child: ElementId) -> Visibility {
        self.tree.visibility(child).unwrap_or(Visibility::Collapsed)
    }

    /// Returns a child's desired size from its last measure.
    #[must_use]
    pub fn desired_size(&self, child: ElementId) -> Size {
        if self.is_child(child) {
            self.tree.desired_size(child).unwrap_or(Size::ZERO)
        } else {
            Size::ZERO
        }
    }

    /// Measures a child and returns its desired size.
    ///
    /// Ids that are not children of the element being laid out are ignored
    /// and measure as empty.
    pub fn measure_child(&mut self, child: ElementId, available: Size) -> Size {
        if !self.is_child(child) {
            tracing::debug!(element = ?self.element, ?child, "measure_child on a non-child");
            return Size::ZERO;
        }
        self.tree.measure_element(child, available)
    }

    /// Arranges a child into `rect`, given in this element's coordinates.
    ///
    /// Arranging reaffirms the child's parent link. Ids that are not children
    /// of the element being laid out are ignored.
    pub fn arrange_child(&mut self, child: ElementId, rect: Rect) {
        if !self.is_child(child) {
            tracing::debug!(element = ?self.element, ?child, "arrange_child on a non-child");
            return;
        }
        self.tree.set_parent(child, self.element);
        self.tree.arrange_element(child, rect);
    }

    fn is_child(&self, child: ElementId) -> bool {
        self.tree.children(self.element).contains(&child)
    }
}
