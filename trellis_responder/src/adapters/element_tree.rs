// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for `trellis_layout` element trees.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! ## Notes
//!
//! Pointer input goes through [`route_at_point`], which hit-tests the tree
//! and routes along the hit path. Input aimed at a known element (keyboard
//! focus, for example) goes through [`route_to_element`], which rebuilds the
//! root-to-element path from parent links.
//!
//! The router does not watch the tree. Handlers registered on an element
//! stay in the router after [`ElementTree::remove`] frees it; call
//! [`EventRouter::clear_handlers`] for each removed element.

use alloc::vec::Vec;

use kurbo::Point;
use trellis_layout::{ElementId, ElementTree};

use crate::args::RoutedEventArgs;
use crate::router::{EventRouter, RouteReport};
use crate::types::RoutedEvent;

/// The outcome of routing pointer input: the arguments after every handler
/// ran, and the dispatch report.
#[derive(Debug)]
pub struct PointerRoute<A> {
    /// The arguments as the last handler left them.
    pub args: RoutedEventArgs<ElementId, A>,
    /// What happened along the route.
    pub report: RouteReport<ElementId>,
}

/// Hit-tests `tree` at `point` and routes `event` to the topmost element.
///
/// Returns `None` when nothing is hit, in which case no interceptor or
/// handler runs.
pub fn route_at_point<A: 'static>(
    tree: &ElementTree,
    router: &mut EventRouter<ElementId>,
    root: Option<ElementId>,
    point: Point,
    event: RoutedEvent<A>,
    payload: A,
) -> Option<PointerRoute<A>> {
    let hit = tree.hit_test_path(root, point)?;
    let mut args = RoutedEventArgs::new(event, hit.target(), payload);
    let report = router.route_event(&mut args, hit.path());
    Some(PointerRoute { args, report })
}

/// Routes `args` to its source along the source's ancestry in `tree`.
pub fn route_to_element<A: 'static>(
    tree: &ElementTree,
    router: &mut EventRouter<ElementId>,
    args: &mut RoutedEventArgs<ElementId, A>,
) -> RouteReport<ElementId> {
    let path = path_to_root(tree, args.source());
    router.route_event(args, &path)
}

/// Returns the path from the root of `element`'s tree down to `element`.
///
/// A stale `element` yields a path holding only itself.
#[must_use]
pub fn path_to_root(tree: &ElementTree, element: ElementId) -> Vec<ElementId> {
    let mut path = Vec::new();
    let mut current = Some(element);
    while let Some(id) = current {
        // Bounded in case a parent chain is corrupted.
        if path.len() > tree.len() {
            tracing::warn!(?element, "parent chain longer than the tree, truncated");
            break;
        }
        path.push(id);
        current = tree.parent(id);
    }
    path.reverse();
    path
}
