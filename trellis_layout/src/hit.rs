// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing over the arranged tree.
//!
//! Hit testing walks the tree from a root using each element's layout rect,
//! accumulating translation from parent to child (child rects are in their
//! parent's coordinates). A point outside an element's rect prunes the whole
//! subtree. Children are tested in reverse insertion order, so the
//! last-added child is on top. If no child is hit, the element itself is.
//!
//! Only [`Visibility::Visible`] elements are hit; hidden and collapsed
//! elements prune their subtree.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::error::HitTestError;
use crate::tree::ElementTree;
use crate::types::{ElementId, Visibility};

/// The result of a successful hit test: the target and its ancestry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitPath {
    path: Vec<ElementId>,
}

impl HitPath {
    /// Returns the element that was hit.
    #[must_use]
    pub fn target(&self) -> ElementId {
        // A hit path always holds at least the root.
        self.path[self.path.len() - 1]
    }

    /// Returns the elements from the hit-test root down to the target.
    #[must_use]
    pub fn path(&self) -> &[ElementId] {
        &self.path
    }

    /// Returns the index of the target in [`path`](Self::path).
    #[must_use]
    pub fn target_index(&self) -> usize {
        self.path.len() - 1
    }

    /// Consumes the hit path, returning the root-to-target elements.
    #[must_use]
    pub fn into_path(self) -> Vec<ElementId> {
        self.path
    }
}

impl ElementTree {
    /// Returns the topmost element under `point`, starting at `root`.
    ///
    /// `point` is in the coordinate space `root`'s layout rect is expressed
    /// in. A `None` root, a point outside every element and an internal
    /// failure all yield `None`; use [`try_hit_test_path`](Self::try_hit_test_path)
    /// to tell failures apart.
    #[must_use]
    pub fn hit_test(&self, root: Option<ElementId>, point: Point) -> Option<ElementId> {
        self.hit_test_path(root, point).map(|hit| hit.target())
    }

    /// Like [`hit_test`](Self::hit_test), but returns the root-to-target path.
    #[must_use]
    pub fn hit_test_path(&self, root: Option<ElementId>, point: Point) -> Option<HitPath> {
        match self.try_hit_test_path(root?, point) {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!(%err, ?point, "hit test failed, reporting no hit");
                None
            }
        }
    }

    /// Hit tests from `root`, reporting internal failures.
    ///
    /// Returns `Ok(None)` when the point is outside every hittable element,
    /// and an error when the traversal meets a stale id or an inconsistent
    /// parent link.
    pub fn try_hit_test_path(
        &self,
        root: ElementId,
        point: Point,
    ) -> Result<Option<HitPath>, HitTestError> {
        let mut path = Vec::new();
        if self.hit_element(root, point, Vec2::ZERO, &mut path)? {
            Ok(Some(HitPath { path }))
        } else {
            Ok(None)
        }
    }

    fn hit_element(
        &self,
        id: ElementId,
        point: Point,
        offset: Vec2,
        path: &mut Vec<ElementId>,
    ) -> Result<bool, HitTestError> {
        let element = self.get(id).ok_or(HitTestError::StaleElement(id))?;
        if self.visibility(id) != Some(Visibility::Visible) {
            return Ok(false);
        }
        let rect = element.layout_rect + offset;
        if !rect.contains(point) {
            return Ok(false);
        }

        path.push(id);
        let child_offset = rect.origin().to_vec2();
        for &child in element.children.iter().rev() {
            let child_element = self.get(child).ok_or(HitTestError::StaleElement(child))?;
            if child_element.parent != Some(id) {
                return Err(HitTestError::BrokenParentLink { parent: id, child });
            }
            if self.hit_element(child, point, child_offset, path)? {
                return Ok(true);
            }
        }
        Ok(true)
    }
}
