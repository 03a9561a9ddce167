// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Panels: elements that own an ordered child collection.
//!
//! [`Panel`] implements the container half of the layout protocol. Measuring
//! a panel first measures every child with the panel's own available size
//! (collapsed children settle to empty without running their behavior), then
//! asks its [`PanelLayout`] for the panel's desired size.
//! Arranging delegates entirely to the [`PanelLayout`].
//!
//! Concrete container algorithms (stacks, grids, docking) are implemented as
//! [`PanelLayout`]s outside this crate. [`BasePanelLayout`] only overlays
//! every child on the panel's full rect.

use kurbo::{Point, Rect, Size};

use crate::cx::LayoutCx;
use crate::element::ElementBehavior;
use crate::types::{ElementId, Visibility};

/// The container algorithm plugged into a [`Panel`].
pub trait PanelLayout: 'static {
    /// Returns the panel's desired size once its children have been measured.
    ///
    /// The default returns the largest desired size of the non-collapsed
    /// children, per axis.
    fn measure_children(&mut self, cx: &mut LayoutCx<'_>, available: Size) -> Size {
        let _ = available;
        let mut size = Size::ZERO;
        for child in cx.children() {
            if cx.visibility(child) == Visibility::Collapsed {
                continue;
            }
            let desired = cx.desired_size(child);
            size.width = size.width.max(desired.width);
            size.height = size.height.max(desired.height);
        }
        size
    }

    /// Arranges the children and returns the panel's render size.
    ///
    /// The default arranges every child to the panel's full final rect,
    /// expressed in the panel's own coordinates, and returns the final size.
    fn arrange_children(&mut self, cx: &mut LayoutCx<'_>, final_rect: Rect) -> Size {
        let child_rect = Rect::from_origin_size(Point::ORIGIN, final_rect.size());
        for child in cx.children() {
            cx.arrange_child(child, child_rect);
        }
        final_rect.size()
    }

    /// Called once after a child was added to the panel.
    fn on_child_added(&mut self, child: ElementId) {
        let _ = child;
    }

    /// Called once after a child was removed from the panel.
    fn on_child_removed(&mut self, child: ElementId) {
        let _ = child;
    }
}

/// The layout used by a plain [`Panel`]: every method keeps its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasePanelLayout;

impl PanelLayout for BasePanelLayout {}

/// An element with an ordered child collection.
///
/// ```rust
/// use std::sync::Arc;
/// use kurbo::{Rect, Size};
/// use trellis_layout::{ElementTree, LayoutProperties, Panel, BaseElement};
/// use trellis_property::PropertyRegistry;
///
/// let mut registry = PropertyRegistry::new();
/// let properties = LayoutProperties::register(&mut registry);
/// let mut tree = ElementTree::new(Arc::new(registry), properties);
///
/// let panel = tree.insert(Panel::new());
/// let child = tree.insert(BaseElement);
/// tree.push_child(panel, child).unwrap();
/// assert_eq!(tree.parent(child), Some(panel));
///
/// tree.measure(panel, Size::new(200.0, 100.0)).unwrap();
/// tree.arrange(panel, Rect::new(10.0, 10.0, 210.0, 110.0)).unwrap();
/// assert_eq!(tree.layout_rect(child), Some(Rect::new(0.0, 0.0, 200.0, 100.0)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Panel<L = BasePanelLayout> {
    layout: L,
}

impl Panel {
    /// Creates a panel with the [`BasePanelLayout`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: PanelLayout> Panel<L> {
    /// Creates a panel using `layout` as its container algorithm.
    #[must_use]
    pub fn with_layout(layout: L) -> Self {
        Self { layout }
    }

    /// Returns the container algorithm.
    #[must_use]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Returns the container algorithm mutably.
    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }
}

impl<L: PanelLayout> ElementBehavior for Panel<L> {
    fn measure_override(&mut self, cx: &mut LayoutCx<'_>, available: Size) -> Size {
        for child in cx.children() {
            cx.measure_child(child, available);
        }
        self.layout.measure_children(cx, available)
    }

    fn arrange_override(&mut self, cx: &mut LayoutCx<'_>, final_rect: Rect) -> Size {
        self.layout.arrange_children(cx, final_rect)
    }

    fn on_child_added(&mut self, child: ElementId) {
        self.layout.on_child_added(child);
    }

    fn on_child_removed(&mut self, child: ElementId) {
        self.layout.on_child_removed(child);
    }

    fn is_panel(&self) -> bool {
        true
    }
}
