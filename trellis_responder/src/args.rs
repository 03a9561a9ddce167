// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-dispatch event arguments.

use crate::types::RoutedEvent;

/// The arguments handed to every handler along a route.
///
/// `K` is the element key and `A` the event's payload. Handlers see the same
/// arguments in turn, so a handler can mark the event handled or update the
/// payload for the handlers after it.
#[derive(Clone, Debug)]
pub struct RoutedEventArgs<K, A> {
    event: RoutedEvent<A>,
    source: K,
    /// Set by a handler to stop delivery to handlers that did not opt in to
    /// handled events.
    pub handled: bool,
    /// The event-specific payload.
    pub payload: A,
}

impl<K: Copy, A> RoutedEventArgs<K, A> {
    /// Creates arguments for raising `event` on `source`.
    #[must_use]
    pub fn new(event: RoutedEvent<A>, source: K, payload: A) -> Self {
        Self {
            event,
            source,
            handled: false,
            payload,
        }
    }

    /// Returns the event being routed.
    #[must_use]
    pub fn event(&self) -> RoutedEvent<A> {
        self.event
    }

    /// Returns the element the event was raised on: the route's target.
    #[must_use]
    pub fn source(&self) -> K {
        self.source
    }

    /// Marks the event handled.
    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    /// Consumes the arguments, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> A {
        self.payload
    }
}
