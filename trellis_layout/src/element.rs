// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elements and their overridable behavior.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use kurbo::{Rect, Size};
use trellis_property::{DependencyObject, PropertyChangedArgs, PropertyFlags, PropertyStore};

use crate::cx::LayoutCx;
use crate::types::{ElementId, LayoutFlags, Visibility};

/// The overridable part of an element.
///
/// Every element in an [`ElementTree`](crate::ElementTree) owns one behavior.
/// The tree runs the fixed part of the layout protocol (visibility handling,
/// storing sizes, validity bits) and calls into the behavior for the rest.
///
/// All methods have defaults, which together give a plain leaf element:
/// it wants no space and renders at whatever size it is given.
pub trait ElementBehavior: Any {
    /// Computes the desired size for the given available size.
    ///
    /// Only called for elements that are not collapsed.
    fn measure_override(&mut self, cx: &mut LayoutCx<'_>, available: Size) -> Size {
        let _ = (cx, available);
        Size::ZERO
    }

    /// Positions children inside `final_rect` and returns the render size.
    ///
    /// Only called for elements that are not collapsed.
    fn arrange_override(&mut self, cx: &mut LayoutCx<'_>, final_rect: Rect) -> Size {
        let _ = cx;
        final_rect.size()
    }

    /// Called after a property on this element changed, once the tree has
    /// applied the change's layout invalidation.
    fn on_property_changed(&mut self, args: &PropertyChangedArgs<'_>) {
        let _ = args;
    }

    /// Called once after `child` was added to this element's children.
    fn on_child_added(&mut self, child: ElementId) {
        let _ = child;
    }

    /// Called once after `child` was removed from this element's children.
    fn on_child_removed(&mut self, child: ElementId) {
        let _ = child;
    }

    /// Returns `true` if this element owns a child collection.
    fn is_panel(&self) -> bool {
        false
    }
}

/// The base element behavior: every method keeps its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseElement;

impl ElementBehavior for BaseElement {}

/// An element stored in the tree.
///
/// Elements are created with [`ElementTree::insert`](crate::ElementTree::insert)
/// and owned by the tree. They expose their property store through
/// [`DependencyObject`], so property writes made directly on an element go
/// through the same invalidation as writes made through the tree.
pub struct Element {
    pub(crate) store: PropertyStore,
    pub(crate) behavior: Option<Box<dyn ElementBehavior>>,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) desired_size: Size,
    pub(crate) render_size: Size,
    pub(crate) layout_rect: Rect,
    pub(crate) flags: LayoutFlags,
}

impl Element {
    pub(crate) fn new(behavior: Box<dyn ElementBehavior>) -> Self {
        Self {
            store: PropertyStore::new(),
            behavior: Some(behavior),
            parent: None,
            children: Vec::new(),
            desired_size: Size::ZERO,
            render_size: Size::ZERO,
            layout_rect: Rect::ZERO,
            flags: LayoutFlags::empty(),
        }
    }

    /// Returns the panel that currently contains this element.
    #[must_use]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Returns this element's children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Returns the size computed by the last measure.
    #[must_use]
    pub fn desired_size(&self) -> Size {
        self.desired_size
    }

    /// Returns the size computed by the last arrange.
    #[must_use]
    pub fn render_size(&self) -> Size {
        self.render_size
    }

    /// Returns the rect given to the last arrange, in the parent's coordinates.
    #[must_use]
    pub fn layout_rect(&self) -> Rect {
        self.layout_rect
    }

    /// Returns the layout validity bits.
    #[must_use]
    pub fn layout_flags(&self) -> LayoutFlags {
        self.flags
    }

    /// Returns `true` if this element owns a child collection.
    #[must_use]
    pub fn is_panel(&self) -> bool {
        self.behavior.as_ref().is_some_and(|b| b.is_panel())
    }

    /// Clears the measure bit on this element only.
    pub fn invalidate_measure(&mut self) {
        self.flags.remove(LayoutFlags::MEASURE_VALID);
    }

    /// Clears the arrange bit on this element only.
    pub fn invalidate_arrange(&mut self) {
        self.flags.remove(LayoutFlags::ARRANGE_VALID);
    }

    /// Returns the behavior if it is of type `B`.
    #[must_use]
    pub fn behavior<B: ElementBehavior>(&self) -> Option<&B> {
        let behavior: &dyn Any = self.behavior.as_deref()?;
        behavior.downcast_ref()
    }

    /// Returns the behavior mutably if it is of type `B`.
    pub fn behavior_mut<B: ElementBehavior>(&mut self) -> Option<&mut B> {
        let behavior: &mut dyn Any = self.behavior.as_deref_mut()?;
        behavior.downcast_mut()
    }
}

impl DependencyObject for Element {
    fn property_store(&self) -> &PropertyStore {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }

    fn on_property_changed(&mut self, args: &PropertyChangedArgs<'_>) {
        if args.flags.contains(PropertyFlags::AFFECTS_MEASURE) {
            self.invalidate_measure();
        }
        if args.flags.contains(PropertyFlags::AFFECTS_ARRANGE) {
            self.invalidate_arrange();
        }
        if args.downcast_new::<Visibility>() == Some(&Visibility::Collapsed) {
            self.desired_size = Size::ZERO;
            self.render_size = Size::ZERO;
            self.layout_rect = Rect::ZERO;
        }
        tracing::trace!(property = args.name, flags = ?args.flags, "element property changed");
        if let Some(behavior) = self.behavior.as_mut() {
            behavior.on_property_changed(args);
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("desired_size", &self.desired_size)
            .field("render_size", &self.render_size)
            .field("layout_rect", &self.layout_rect)
            .field("flags", &self.flags)
            .field("properties", &self.store.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_property::{DependencyObjectExt, OwnerType, PropertyMetadataBuilder, PropertyRegistry};

    #[derive(Default)]
    struct Recorder {
        changed: u32,
    }

    impl ElementBehavior for Recorder {
        fn on_property_changed(&mut self, _args: &PropertyChangedArgs<'_>) {
            self.changed += 1;
        }
    }

    #[test]
    fn property_flags_clear_validity_bits() {
        let mut registry = PropertyRegistry::new();
        let owner = OwnerType::named("Element");
        let width = registry.register(
            owner,
            "Width",
            PropertyMetadataBuilder::new(0.0_f64)
                .flags(PropertyFlags::AFFECTS_MEASURE)
                .build(),
        );
        let opacity = registry.register(
            owner,
            "Opacity",
            PropertyMetadataBuilder::new(1.0_f64)
                .flags(PropertyFlags::AFFECTS_RENDER)
                .build(),
        );

        let mut element = Element::new(Box::new(Recorder::default()));
        element.flags = LayoutFlags::all();

        element.set_value(opacity, 0.5, &registry);
        assert_eq!(element.layout_flags(), LayoutFlags::all());

        element.set_value(width, 10.0, &registry);
        assert_eq!(element.layout_flags(), LayoutFlags::ARRANGE_VALID);
        assert_eq!(element.behavior::<Recorder>().unwrap().changed, 2);
    }

    #[test]
    fn behavior_downcast_is_typed() {
        let mut element = Element::new(Box::new(BaseElement));
        assert!(element.behavior::<BaseElement>().is_some());
        assert!(element.behavior::<Recorder>().is_none());
        assert!(element.behavior_mut::<BaseElement>().is_some());
        assert!(!element.is_panel());
    }
}
