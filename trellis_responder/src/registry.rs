// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The routed-event registry.

use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use hashbrown::HashMap;
use trellis_property::OwnerType;

use crate::error::RouterError;
use crate::types::{RoutedEvent, RoutedEventId, RoutingStrategy};

/// Everything the registry knows about one routed event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutedEventDescriptor {
    /// The event's identifier.
    pub id: RoutedEventId,
    /// The type that declared the event.
    pub owner: OwnerType,
    /// The event's name, unique per owner.
    pub name: &'static str,
    /// How the event travels, fixed at registration.
    pub strategy: RoutingStrategy,
    /// [`TypeId`] of the event's payload.
    pub payload_type: TypeId,
    /// Name of the event's payload type, for diagnostics.
    pub payload_type_name: &'static str,
}

/// Registry of routed events.
///
/// Like the property registry, this is built once up front and passed by
/// reference wherever events are looked up by name.
///
/// ```rust
/// use trellis_property::OwnerType;
/// use trellis_responder::{RoutedEventRegistry, RoutingStrategy};
///
/// struct Button;
///
/// let mut events = RoutedEventRegistry::new();
/// let click = events.register::<()>(OwnerType::of::<Button>(), "Click", RoutingStrategy::Bubble);
///
/// assert_eq!(click.strategy(), RoutingStrategy::Bubble);
/// assert_eq!(events.find(OwnerType::of::<Button>(), "Click"), Some(click.id()));
/// assert!(
///     events
///         .try_register::<()>(OwnerType::of::<Button>(), "Click", RoutingStrategy::Tunnel)
///         .is_err()
/// );
/// ```
#[derive(Default)]
pub struct RoutedEventRegistry {
    events: Vec<RoutedEventDescriptor>,
    by_name: HashMap<OwnerType, HashMap<&'static str, RoutedEventId>>,
}

impl RoutedEventRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a routed event carrying payloads of type `A`.
    ///
    /// # Panics
    ///
    /// Panics if an event with the same name is already registered on the
    /// same owner, or if more than 65,536 events are registered. Use
    /// [`try_register`](Self::try_register) to handle duplicates.
    pub fn register<A: 'static>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        strategy: RoutingStrategy,
    ) -> RoutedEvent<A> {
        match self.try_register(owner, name, strategy) {
            Ok(event) => event,
            Err(err) => panic!("{err}"),
        }
    }

    /// Registers a routed event, reporting duplicates as an error.
    ///
    /// On error the registry is unchanged.
    pub fn try_register<A: 'static>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        strategy: RoutingStrategy,
    ) -> Result<RoutedEvent<A>, RouterError> {
        if self.find(owner, name).is_some() {
            return Err(RouterError::AlreadyRegistered { owner, name });
        }
        let Ok(index) = u16::try_from(self.events.len()) else {
            panic!("Too many routed events registered (max {})", u16::MAX);
        };
        let id = RoutedEventId::new(index);

        self.events.push(RoutedEventDescriptor {
            id,
            owner,
            name,
            strategy,
            payload_type: TypeId::of::<A>(),
            payload_type_name: core::any::type_name::<A>(),
        });
        self.by_name.entry(owner).or_default().insert(name, id);
        tracing::trace!(%owner, name, ?strategy, "registered routed event");

        Ok(RoutedEvent::new(id, name, strategy))
    }

    /// Returns the number of registered events.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no events are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Looks up an event by owner and name.
    #[must_use]
    pub fn find(&self, owner: OwnerType, name: &str) -> Option<RoutedEventId> {
        self.by_name.get(&owner)?.get(name).copied()
    }

    /// Returns the descriptor for `id`.
    #[must_use]
    pub fn get(&self, id: RoutedEventId) -> Option<&RoutedEventDescriptor> {
        self.events.get(usize::from(id.index()))
    }

    /// Recovers a typed handle for `id`, if its payload type is `A`.
    ///
    /// This is how a collaborator that found an event by name attaches typed
    /// handlers to it.
    #[must_use]
    pub fn handle<A: 'static>(&self, id: RoutedEventId) -> Option<RoutedEvent<A>> {
        let descriptor = self.get(id)?;
        (descriptor.payload_type == TypeId::of::<A>())
            .then(|| RoutedEvent::new(id, descriptor.name, descriptor.strategy))
    }

    /// Iterates over all descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RoutedEventDescriptor> {
        self.events.iter()
    }
}

impl fmt::Debug for RoutedEventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutedEventRegistry")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
