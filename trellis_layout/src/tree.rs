// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element arena and the measure/arrange protocol.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size};
use trellis_property::{
    DependencyObjectExt, ErasedValue, OwnerType, PropertyRegistry, PropertyValue,
    ReadableProperty, WritableProperty,
};

use crate::cx::LayoutCx;
use crate::element::{Element, ElementBehavior};
use crate::error::LayoutError;
use crate::properties::LayoutProperties;
use crate::types::{ElementId, LayoutFlags, Visibility};

struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// An arena of elements forming one or more trees.
///
/// The tree owns every element, its child collection and its layout state.
/// Elements are addressed by generational [`ElementId`]s; using an id after
/// its element was removed is reported as [`LayoutError::StaleElement`]
/// (or `None` from the accessors) and never reaches a different element.
///
/// ## Layout
///
/// [`measure`](Self::measure) and [`arrange`](Self::arrange) run the two-pass
/// protocol on one element, recursing through its behavior. Invalidation is
/// local: [`invalidate_measure`](Self::invalidate_measure), property changes
/// and child mutations only clear bits on the element they concern.
/// [`update_layout`](Self::update_layout) is the entry point for a full pass:
/// it looks for any invalid element under the root and, if it finds one,
/// lays out the whole tree again.
pub struct ElementTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    registry: Arc<PropertyRegistry>,
    properties: LayoutProperties,
}

impl ElementTree {
    /// Creates an empty tree.
    ///
    /// `properties` must have been registered in `registry`.
    #[must_use]
    pub fn new(registry: Arc<PropertyRegistry>, properties: LayoutProperties) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            registry,
            properties,
        }
    }

    /// Returns the property registry shared by every element.
    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Returns the layout property handles.
    #[must_use]
    pub fn properties(&self) -> LayoutProperties {
        self.properties
    }

    /// Returns the number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if there are no live elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a detached element with the given behavior.
    pub fn insert<B: ElementBehavior>(&mut self, behavior: B) -> ElementId {
        self.insert_boxed(Box::new(behavior))
    }

    /// Creates a detached element with an already boxed behavior.
    pub fn insert_boxed(&mut self, behavior: Box<dyn ElementBehavior>) -> ElementId {
        let element = Element::new(behavior);
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.element = Some(element);
            ElementId::new(idx, slot.generation)
        } else {
            let Ok(idx) = u32::try_from(self.slots.len()) else {
                panic!("element arena is full");
            };
            self.slots.push(Slot {
                generation: 1,
                element: Some(element),
            });
            ElementId::new(idx, 1)
        }
    }

    /// Removes an element and its whole subtree.
    ///
    /// If the element is in a panel, it is first removed from that panel's
    /// collection (firing the panel's removal hook). Ids of the removed
    /// elements become stale.
    ///
    /// Nothing outside the tree is told. Event handlers keyed by the removed
    /// ids stay registered until their owner clears them.
    pub fn remove(&mut self, id: ElementId) -> Result<(), LayoutError> {
        let parent = self.get(id).ok_or(LayoutError::StaleElement(id))?.parent;
        if let Some(parent) = parent {
            if let Some(panel) = self.get_mut(parent) {
                panel.children.retain(|child| *child != id);
            }
            self.child_removed(parent, id);
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self.slots.get_mut(next.idx()) else {
                continue;
            };
            if slot.generation != next.generation() {
                continue;
            }
            if let Some(element) = slot.element.take() {
                stack.extend(element.children);
                self.free.push(next.0);
            }
        }
        tracing::trace!(element = ?id, "removed element subtree");
        Ok(())
    }

    /// Returns `true` if `id` refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the element for `id`.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.get(id)
    }

    /// Returns the element for `id` mutably.
    ///
    /// Property writes made on the element go through the normal write path,
    /// so they invalidate layout like [`set_value`](Self::set_value) does.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.get_mut(id)
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<&Element> {
        slot(&self.slots, id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        slot_mut(&mut self.slots, id)
    }

    /// Returns the behavior of `id` if it is of type `B`.
    #[must_use]
    pub fn behavior<B: ElementBehavior>(&self, id: ElementId) -> Option<&B> {
        self.get(id)?.behavior()
    }

    /// Returns the behavior of `id` mutably if it is of type `B`.
    pub fn behavior_mut<B: ElementBehavior>(&mut self, id: ElementId) -> Option<&mut B> {
        self.get_mut(id)?.behavior_mut()
    }

    // --- State accessors ---

    /// Returns the panel that currently contains `id`.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id)?.parent
    }

    /// Returns the children of `id` in insertion order.
    ///
    /// Stale ids have no children.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(Element::children).unwrap_or_default()
    }

    /// Returns the children of `id` that are not collapsed, in insertion order.
    ///
    /// This is the order used by layout; hit testing walks it backwards.
    pub fn visible_children(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.visibility(*child) != Some(Visibility::Collapsed))
    }

    /// Returns the size computed by the last measure of `id`.
    #[must_use]
    pub fn desired_size(&self, id: ElementId) -> Option<Size> {
        Some(self.get(id)?.desired_size)
    }

    /// Returns the size computed by the last arrange of `id`.
    #[must_use]
    pub fn render_size(&self, id: ElementId) -> Option<Size> {
        Some(self.get(id)?.render_size)
    }

    /// Returns the rect given to the last arrange of `id`, in its parent's
    /// coordinates.
    #[must_use]
    pub fn layout_rect(&self, id: ElementId) -> Option<Rect> {
        Some(self.get(id)?.layout_rect)
    }

    /// Returns the layout validity bits of `id`.
    #[must_use]
    pub fn layout_flags(&self, id: ElementId) -> Option<LayoutFlags> {
        Some(self.get(id)?.flags)
    }

    /// Returns `true` if `id` is live and its desired size is up to date.
    #[must_use]
    pub fn is_measure_valid(&self, id: ElementId) -> bool {
        self.layout_flags(id)
            .is_some_and(|flags| flags.contains(LayoutFlags::MEASURE_VALID))
    }

    /// Returns `true` if `id` is live and its arrangement is up to date.
    #[must_use]
    pub fn is_arrange_valid(&self, id: ElementId) -> bool {
        self.layout_flags(id)
            .is_some_and(|flags| flags.contains(LayoutFlags::ARRANGE_VALID))
    }

    /// Returns the visibility of `id`.
    #[must_use]
    pub fn visibility(&self, id: ElementId) -> Option<Visibility> {
        let element = self.get(id)?;
        Some(element.get_value(self.properties.visibility, &self.registry))
    }

    // --- Properties ---

    /// Reads a property of `id`.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    #[must_use]
    pub fn get_value<T: PropertyValue>(
        &self,
        id: ElementId,
        property: impl ReadableProperty<T>,
    ) -> Option<T> {
        Some(self.get(id)?.get_value(property, &self.registry))
    }

    /// Writes a property of `id`, invalidating layout according to the
    /// property's flags.
    ///
    /// Returns whether the effective value changed.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    pub fn set_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        property: impl WritableProperty<T>,
        value: T,
    ) -> Result<bool, LayoutError> {
        let element = slot_mut(&mut self.slots, id).ok_or(LayoutError::StaleElement(id))?;
        Ok(element.set_value(property, value, &self.registry))
    }

    /// Clears a property of `id` back to its default.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    pub fn clear_value<T: PropertyValue>(
        &mut self,
        id: ElementId,
        property: impl WritableProperty<T>,
    ) -> Result<bool, LayoutError> {
        let element = slot_mut(&mut self.slots, id).ok_or(LayoutError::StaleElement(id))?;
        Ok(element.clear_value(property, &self.registry))
    }

    /// Writes a property of `id` looked up by owner and name.
    ///
    /// Read-only properties, unknown names and values of the wrong type are
    /// rejected without touching the element.
    pub fn set_value_by_name(
        &mut self,
        id: ElementId,
        owner: OwnerType,
        name: &str,
        value: ErasedValue,
    ) -> Result<bool, LayoutError> {
        let element = slot_mut(&mut self.slots, id).ok_or(LayoutError::StaleElement(id))?;
        Ok(element.set_value_by_name(owner, name, value, &self.registry)?)
    }

    /// Sets the visibility of `id`.
    pub fn set_visibility(
        &mut self,
        id: ElementId,
        visibility: Visibility,
    ) -> Result<bool, LayoutError> {
        self.set_value(id, self.properties.visibility, visibility)
    }

    // --- Child collections ---

    /// Inserts `child` into the children of `panel` at `index`.
    ///
    /// Fires the panel's `on_child_added` once: the child's parent becomes
    /// `panel` and the panel's measure is invalidated.
    pub fn insert_child(
        &mut self,
        panel: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), LayoutError> {
        self.check_insertable(panel, child)?;
        let children = &mut self.get_mut(panel).ok_or(LayoutError::StaleElement(panel))?.children;
        if index > children.len() {
            return Err(LayoutError::IndexOutOfBounds {
                index,
                len: children.len(),
            });
        }
        children.insert(index, child);
        self.child_added(panel, child);
        Ok(())
    }

    /// Appends `child` to the children of `panel`.
    pub fn push_child(&mut self, panel: ElementId, child: ElementId) -> Result<(), LayoutError> {
        let len = self.checked_panel(panel)?.children.len();
        self.insert_child(panel, len, child)
    }

    /// Removes and returns the child of `panel` at `index`.
    ///
    /// Fires the panel's `on_child_removed` once. The removed element stays
    /// alive and detached.
    pub fn remove_child_at(
        &mut self,
        panel: ElementId,
        index: usize,
    ) -> Result<ElementId, LayoutError> {
        let len = self.checked_panel(panel)?.children.len();
        if index >= len {
            return Err(LayoutError::IndexOutOfBounds { index, len });
        }
        let child = self
            .get_mut(panel)
            .ok_or(LayoutError::StaleElement(panel))?
            .children
            .remove(index);
        self.child_removed(panel, child);
        Ok(child)
    }

    /// Replaces the child of `panel` at `index` with `child`, returning the
    /// previous child.
    ///
    /// Fires `on_child_removed` for the previous child, then `on_child_added`
    /// for the new one.
    pub fn replace_child(
        &mut self,
        panel: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<ElementId, LayoutError> {
        self.check_insertable(panel, child)?;
        let children = &mut self.get_mut(panel).ok_or(LayoutError::StaleElement(panel))?.children;
        let len = children.len();
        let Some(slot) = children.get_mut(index) else {
            return Err(LayoutError::IndexOutOfBounds { index, len });
        };
        let previous = core::mem::replace(slot, child);
        self.child_removed(panel, previous);
        self.child_added(panel, child);
        Ok(previous)
    }

    /// Removes every child of `panel`, returning them in their original order.
    ///
    /// Fires `on_child_removed` once per child, in that order.
    pub fn clear_children(&mut self, panel: ElementId) -> Result<Vec<ElementId>, LayoutError> {
        self.checked_panel(panel)?;
        let children = core::mem::take(
            &mut self
                .get_mut(panel)
                .ok_or(LayoutError::StaleElement(panel))?
                .children,
        );
        for child in &children {
            self.child_removed(panel, *child);
        }
        Ok(children)
    }

    fn checked_panel(&self, panel: ElementId) -> Result<&Element, LayoutError> {
        let element = self.get(panel).ok_or(LayoutError::StaleElement(panel))?;
        if !element.is_panel() {
            return Err(LayoutError::NotAPanel(panel));
        }
        Ok(element)
    }

    fn check_insertable(&self, panel: ElementId, child: ElementId) -> Result<(), LayoutError> {
        self.checked_panel(panel)?;
        let element = self.get(child).ok_or(LayoutError::StaleElement(child))?;
        if let Some(parent) = element.parent {
            return Err(LayoutError::AlreadyParented { child, parent });
        }
        let mut ancestor = Some(panel);
        while let Some(id) = ancestor {
            if id == child {
                return Err(LayoutError::WouldCreateCycle { panel, child });
            }
            ancestor = self.parent(id);
        }
        Ok(())
    }

    fn child_added(&mut self, panel: ElementId, child: ElementId) {
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(panel);
        }
        if let Some(element) = self.get_mut(panel) {
            element.invalidate_measure();
            if let Some(behavior) = element.behavior.as_mut() {
                behavior.on_child_added(child);
            }
        }
        tracing::trace!(?panel, ?child, "child added");
    }

    fn child_removed(&mut self, panel: ElementId, child: ElementId) {
        if let Some(element) = self.get_mut(child)
            && element.parent == Some(panel)
        {
            element.parent = None;
        }
        if let Some(element) = self.get_mut(panel) {
            element.invalidate_measure();
            if let Some(behavior) = element.behavior.as_mut() {
                behavior.on_child_removed(child);
            }
        }
        tracing::trace!(?panel, ?child, "child removed");
    }

    pub(crate) fn set_parent(&mut self, child: ElementId, panel: ElementId) {
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(panel);
        }
    }

    // --- Layout ---

    /// Clears the measure bit of `id` only. Ancestors are not touched.
    pub fn invalidate_measure(&mut self, id: ElementId) -> Result<(), LayoutError> {
        self.get_mut(id)
            .ok_or(LayoutError::StaleElement(id))?
            .invalidate_measure();
        Ok(())
    }

    /// Clears the arrange bit of `id` only. Ancestors are not touched.
    pub fn invalidate_arrange(&mut self, id: ElementId) -> Result<(), LayoutError> {
        self.get_mut(id)
            .ok_or(LayoutError::StaleElement(id))?
            .invalidate_arrange();
        Ok(())
    }

    /// Measures `id` with the given available size and returns its desired
    /// size.
    ///
    /// Collapsed elements measure to [`Size::ZERO`] without calling their
    /// behavior.
    pub fn measure(&mut self, id: ElementId, available: Size) -> Result<Size, LayoutError> {
        if !self.is_alive(id) {
            return Err(LayoutError::StaleElement(id));
        }
        Ok(self.measure_element(id, available))
    }

    /// Arranges `id` into `final_rect`, given in its parent's coordinates.
    ///
    /// Collapsed elements get an empty rect and render size without calling
    /// their behavior.
    pub fn arrange(&mut self, id: ElementId, final_rect: Rect) -> Result<(), LayoutError> {
        if !self.is_alive(id) {
            return Err(LayoutError::StaleElement(id));
        }
        self.arrange_element(id, final_rect);
        Ok(())
    }

    /// Runs a full layout pass from `root` if anything under it is invalid.
    ///
    /// The root is measured with `available` and arranged at its desired
    /// size. Returns whether a pass ran.
    pub fn update_layout(&mut self, root: ElementId, available: Size) -> Result<bool, LayoutError> {
        if !self.is_alive(root) {
            return Err(LayoutError::StaleElement(root));
        }
        if !self.needs_layout(root) {
            return Ok(false);
        }
        let desired = self.measure_element(root, available);
        self.arrange_element(root, Rect::from_origin_size(Point::ORIGIN, desired));
        Ok(true)
    }

    /// Returns `true` if `root` or any element under it has an invalid
    /// measure or arrange.
    ///
    /// A freshly collapsed child counts, so that its panel gets re-measured
    /// without it. The subtree of a collapsed element is not visited.
    #[must_use]
    pub fn needs_layout(&self, root: ElementId) -> bool {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.get(id) else {
                continue;
            };
            if !element.flags.contains(LayoutFlags::all()) {
                return true;
            }
            if self.visibility(id) != Some(Visibility::Collapsed) {
                stack.extend_from_slice(&element.children);
            }
        }
        false
    }

    pub(crate) fn measure_element(&mut self, id: ElementId, available: Size) -> Size {
        let collapsed = self.visibility(id) == Some(Visibility::Collapsed);
        let Some(element) = self.get_mut(id) else {
            return Size::ZERO;
        };
        if collapsed {
            // Collapsed elements have no layout at all, so one measure settles
            // their arrange state too.
            element.desired_size = Size::ZERO;
            element.render_size = Size::ZERO;
            element.layout_rect = Rect::ZERO;
            element.flags.insert(LayoutFlags::all());
            return Size::ZERO;
        }

        let mut behavior = element.behavior.take();
        let desired = match behavior.as_mut() {
            Some(behavior) => {
                let mut cx = LayoutCx {
                    tree: self,
                    element: id,
                };
                behavior.measure_override(&mut cx, available)
            }
            None => Size::ZERO,
        };

        if let Some(element) = self.get_mut(id) {
            element.behavior = behavior;
            element.desired_size = desired;
            element.flags.insert(LayoutFlags::MEASURE_VALID);
        }
        tracing::trace!(element = ?id, ?available, ?desired, "measured");
        desired
    }

    pub(crate) fn arrange_element(&mut self, id: ElementId, final_rect: Rect) {
        let collapsed = self.visibility(id) == Some(Visibility::Collapsed);
        let Some(element) = self.get_mut(id) else {
            return;
        };
        if collapsed {
            element.layout_rect = Rect::ZERO;
            element.render_size = Size::ZERO;
            element.flags.insert(LayoutFlags::ARRANGE_VALID);
            return;
        }

        element.layout_rect = final_rect;
        let mut behavior = element.behavior.take();
        let render_size = match behavior.as_mut() {
            Some(behavior) => {
                let mut cx = LayoutCx {
                    tree: self,
                    element: id,
                };
                behavior.arrange_override(&mut cx, final_rect)
            }
            None => final_rect.size(),
        };

        if let Some(element) = self.get_mut(id) {
            element.behavior = behavior;
            element.render_size = render_size;
            element.flags.insert(LayoutFlags::ARRANGE_VALID);
        }
        tracing::trace!(element = ?id, ?final_rect, ?render_size, "arranged");
    }
}

fn slot(slots: &[Slot], id: ElementId) -> Option<&Element> {
    slots
        .get(id.idx())
        .filter(|slot| slot.generation == id.generation())?
        .element
        .as_ref()
}

fn slot_mut(slots: &mut [Slot], id: ElementId) -> Option<&mut Element> {
    slots
        .get_mut(id.idx())
        .filter(|slot| slot.generation == id.generation())?
        .element
        .as_mut()
}

impl fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementTree")
            .field("len", &self.len())
            .field("free", &self.free.len())
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
