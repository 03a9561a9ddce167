// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route construction: which elements an event visits, in which order.

use smallvec::SmallVec;

use crate::types::RoutingStrategy;

/// The ordered elements an event is delivered to.
///
/// Built per dispatch from a root-to-target path and never stored.
///
/// ```rust
/// use trellis_responder::{EventRoute, RoutingStrategy};
///
/// let path = ["root", "panel", "button"];
/// let bubble = EventRoute::build(&path, 2, RoutingStrategy::Bubble).unwrap();
/// assert_eq!(bubble.elements(), &["button", "panel", "root"]);
///
/// let tunnel = EventRoute::build(&path, 2, RoutingStrategy::Tunnel).unwrap();
/// assert_eq!(tunnel.elements(), &["root", "panel"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRoute<K> {
    elements: SmallVec<[K; 8]>,
    target: K,
    strategy: RoutingStrategy,
}

impl<K: Copy + PartialEq> EventRoute<K> {
    /// Builds the route for the element at `target_index` in `path`.
    ///
    /// - [`Tunnel`](RoutingStrategy::Tunnel): `path[..target_index]`, root
    ///   first, without the target.
    /// - [`Direct`](RoutingStrategy::Direct): the target alone.
    /// - [`Bubble`](RoutingStrategy::Bubble): `path[..=target_index]`
    ///   reversed, target first.
    ///
    /// Returns `None` if `target_index` is outside `path`.
    #[must_use]
    pub fn build(path: &[K], target_index: usize, strategy: RoutingStrategy) -> Option<Self> {
        (target_index < path.len()).then(|| Self::from_index(path, target_index, strategy))
    }

    /// Builds the route for `target`, locating it in `path`.
    ///
    /// If `target` is not on `path` the route is built as though the path
    /// were `[target]`.
    #[must_use]
    pub fn for_target(target: K, path: &[K], strategy: RoutingStrategy) -> Self {
        match path.iter().rposition(|&k| k == target) {
            Some(index) => Self::from_index(path, index, strategy),
            None => Self::from_index(core::slice::from_ref(&target), 0, strategy),
        }
    }

    // `target_index` must be within `path`.
    fn from_index(path: &[K], target_index: usize, strategy: RoutingStrategy) -> Self {
        let target = path[target_index];
        let elements = match strategy {
            RoutingStrategy::Tunnel => path[..target_index].iter().copied().collect(),
            RoutingStrategy::Direct => SmallVec::from_slice(&[target]),
            RoutingStrategy::Bubble => path[..=target_index].iter().rev().copied().collect(),
        };
        Self {
            elements,
            target,
            strategy,
        }
    }

    /// Returns the elements in delivery order.
    #[must_use]
    pub fn elements(&self) -> &[K] {
        &self.elements
    }

    /// Returns the event's target.
    #[must_use]
    pub fn target(&self) -> K {
        self.target
    }

    /// Returns the strategy the route was built with.
    #[must_use]
    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    /// Returns the number of elements on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the route visits no element.
    ///
    /// This is the case for a tunneling event whose target is the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
