// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core routed-event types: strategies, event handles and handler tokens.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// How a routed event travels along the root-to-target path.
///
/// The strategy is fixed when the event is registered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RoutingStrategy {
    /// Root to the target's parent; the target itself is excluded.
    ///
    /// Used for "preview" events that ancestors may handle before the target.
    Tunnel,
    /// The target only.
    Direct,
    /// Target to root, inclusive.
    Bubble,
}

/// A runtime routed-event identifier, handed out in registration order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutedEventId(u16);

impl RoutedEventId {
    /// Creates a new event ID from the given index.
    ///
    /// This is typically called by the registry rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for RoutedEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoutedEventId").field(&self.0).finish()
    }
}

/// A typed handle to a registered routed event.
///
/// `A` is the payload carried by the event's
/// [`RoutedEventArgs`](crate::RoutedEventArgs). The handle also carries the
/// event's name and strategy so routing needs no registry lookup.
pub struct RoutedEvent<A> {
    id: RoutedEventId,
    name: &'static str,
    strategy: RoutingStrategy,
    _marker: PhantomData<fn() -> A>,
}

impl<A> RoutedEvent<A> {
    pub(crate) const fn new(id: RoutedEventId, name: &'static str, strategy: RoutingStrategy) -> Self {
        Self {
            id,
            name,
            strategy,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying event ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> RoutedEventId {
        self.id
    }

    /// Returns the name the event was registered under.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Returns the event's routing strategy.
    #[must_use]
    #[inline]
    pub const fn strategy(self) -> RoutingStrategy {
        self.strategy
    }
}

// Manual impls: the derives would add bounds on `A`.
impl<A> Clone for RoutedEvent<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for RoutedEvent<A> {}

impl<A> PartialEq for RoutedEvent<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A> Eq for RoutedEvent<A> {}

impl<A> Hash for RoutedEvent<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<A> fmt::Debug for RoutedEvent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutedEvent")
            .field("id", &self.id.0)
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Identifies one handler registration, for removal.
///
/// Tokens are unique for the lifetime of an [`EventRouter`](crate::EventRouter).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerToken(pub(crate) u64);

impl fmt::Debug for HandlerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerToken({})", self.0)
    }
}
