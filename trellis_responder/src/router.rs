// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler storage, interceptors and route dispatch.
//!
//! [`EventRouter::route_event`] runs one dispatch:
//!
//! 1. Build the [`EventRoute`] for the event's strategy from the
//!    root-to-target path.
//! 2. Run every interceptor's [`pre_process`](Interceptor::pre_process) in
//!    registration order. The first one to return `false` vetoes the route
//!    and no handler runs.
//! 3. Visit the route's elements in order and, per element, that element's
//!    handlers for the event in registration order. Once the event is
//!    handled only handlers registered with `handled_events_too` still run.
//!    A handler returning an error is recorded and delivery continues.
//! 4. Run [`post_process`](Interceptor::post_process) in reverse order for
//!    every interceptor whose `pre_process` ran, the vetoing one included.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::args::RoutedEventArgs;
use crate::error::{HandlerError, HandlerFailure};
use crate::route::EventRoute;
use crate::types::{HandlerToken, RoutedEvent, RoutedEventId, RoutingStrategy};

type BoxedHandler<K, A> = Box<dyn FnMut(K, &mut RoutedEventArgs<K, A>) -> Result<(), HandlerError>>;

struct HandlerEntry {
    token: HandlerToken,
    event: RoutedEventId,
    handled_events_too: bool,
    // A `BoxedHandler<K, A>` for the event's payload type.
    handler: Box<dyn Any>,
}

/// A cross-cutting hook that wraps every routing operation.
///
/// Interceptors see the route before any handler runs and may veto it. They
/// can pass state from [`pre_process`](Self::pre_process) to
/// [`post_process`](Self::post_process) through the context's data bag.
pub trait Interceptor<K> {
    /// Called before delivery, in registration order. Returning `false`
    /// aborts the route.
    fn pre_process(&mut self, cx: &mut RouteContext<K>) -> bool {
        let _ = cx;
        true
    }

    /// Called after delivery, or after a veto, in reverse registration order.
    fn post_process(&mut self, cx: &mut RouteContext<K>) {
        let _ = cx;
    }
}

/// The state of one dispatch, as seen by interceptors.
pub struct RouteContext<K> {
    event: RoutedEventId,
    name: &'static str,
    route: EventRoute<K>,
    handled: bool,
    aborted: bool,
    invoked: usize,
    failures: Vec<HandlerFailure<K>>,
    data: HashMap<&'static str, Box<dyn Any>>,
}

impl<K: Copy + PartialEq> RouteContext<K> {
    fn new(event: RoutedEventId, name: &'static str, route: EventRoute<K>, handled: bool) -> Self {
        Self {
            event,
            name,
            route,
            handled,
            aborted: false,
            invoked: 0,
            failures: Vec::new(),
            data: HashMap::new(),
        }
    }

    /// Returns the id of the event being routed.
    #[must_use]
    pub fn event_id(&self) -> RoutedEventId {
        self.event
    }

    /// Returns the name of the event being routed.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        self.name
    }

    /// Returns the event's routing strategy.
    #[must_use]
    pub fn strategy(&self) -> RoutingStrategy {
        self.route.strategy()
    }

    /// Returns the route's target.
    #[must_use]
    pub fn target(&self) -> K {
        self.route.target()
    }

    /// Returns the route being dispatched.
    #[must_use]
    pub fn route(&self) -> &EventRoute<K> {
        &self.route
    }

    /// Returns whether the event is handled.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Returns whether an interceptor vetoed the route.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Returns how many handlers have been invoked.
    #[must_use]
    pub fn invoked(&self) -> usize {
        self.invoked
    }

    /// Returns the handler failures recorded so far.
    #[must_use]
    pub fn failures(&self) -> &[HandlerFailure<K>] {
        &self.failures
    }

    /// Stores a value in the route's data bag, replacing any previous value.
    pub fn insert<T: Any>(&mut self, key: &'static str, value: T) {
        self.data.insert(key, Box::new(value));
    }

    /// Returns the value stored under `key`, if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.get(key)?.downcast_ref()
    }

    /// Returns the value stored under `key` mutably, if it has type `T`.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.data.get_mut(key)?.downcast_mut()
    }

    /// Removes and returns the value stored under `key`, if it has type `T`.
    ///
    /// A value of another type is left in place.
    pub fn remove<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.data.get(key)?.is::<T>() {
            return None;
        }
        self.data.remove(key)?.downcast().ok().map(|value| *value)
    }

    fn into_report(self) -> RouteReport<K> {
        RouteReport {
            route: self.route,
            invoked: self.invoked,
            aborted: self.aborted,
            handled: self.handled,
            failures: self.failures,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RouteContext<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("event", &self.event)
            .field("name", &self.name)
            .field("route", &self.route)
            .field("handled", &self.handled)
            .field("aborted", &self.aborted)
            .field("invoked", &self.invoked)
            .field("failures", &self.failures)
            .field("data", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// What happened during one [`EventRouter::route_event`] call.
#[derive(Debug)]
pub struct RouteReport<K> {
    /// The route that was built for the event.
    pub route: EventRoute<K>,
    /// The number of handlers invoked.
    pub invoked: usize,
    /// Whether an interceptor vetoed the route.
    pub aborted: bool,
    /// Whether the event ended up handled.
    pub handled: bool,
    /// Handlers that returned an error, in invocation order.
    pub failures: Vec<HandlerFailure<K>>,
}

/// Per-element handler lists and the interceptor chain.
///
/// `K` is the element key, for example `trellis_layout::ElementId`.
///
/// ```rust
/// use trellis_property::OwnerType;
/// use trellis_responder::{EventRouter, RoutedEventArgs, RoutedEventRegistry, RoutingStrategy};
///
/// struct Button;
///
/// let mut events = RoutedEventRegistry::new();
/// let click = events.register::<u32>(OwnerType::of::<Button>(), "Click", RoutingStrategy::Bubble);
///
/// let mut router = EventRouter::<&str>::new();
/// router.add_handler("button", click, |_, args| {
///     args.payload += 1;
///     args.set_handled();
///     Ok(())
/// }, false);
/// // Skipped: the event is handled by then.
/// router.add_handler("root", click, |_, args| {
///     args.payload += 10;
///     Ok(())
/// }, false);
///
/// let mut args = RoutedEventArgs::new(click, "button", 0);
/// let report = router.route_event(&mut args, &["root", "button"]);
/// assert_eq!(report.invoked, 1);
/// assert!(report.handled);
/// assert_eq!(args.payload, 1);
/// ```
pub struct EventRouter<K> {
    handlers: HashMap<K, Vec<HandlerEntry>>,
    owners: HashMap<HandlerToken, K>,
    interceptors: Vec<Box<dyn Interceptor<K>>>,
    next_token: u64,
}

impl<K> Default for EventRouter<K> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            owners: HashMap::new(),
            interceptors: Vec::new(),
            next_token: 0,
        }
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug + 'static> EventRouter<K> {
    /// Creates a router with no handlers and no interceptors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `handler` for `event` to `element`.
    ///
    /// Handlers on one element run in the order they were added. The handler
    /// receives the element it is attached to and the shared arguments. With
    /// `handled_events_too` set it also runs after the event was handled.
    pub fn add_handler<A: 'static>(
        &mut self,
        element: K,
        event: RoutedEvent<A>,
        handler: impl FnMut(K, &mut RoutedEventArgs<K, A>) -> Result<(), HandlerError> + 'static,
        handled_events_too: bool,
    ) -> HandlerToken {
        let token = HandlerToken(self.next_token);
        self.next_token += 1;
        let handler: BoxedHandler<K, A> = Box::new(handler);
        self.handlers.entry(element).or_default().push(HandlerEntry {
            token,
            event: event.id(),
            handled_events_too,
            handler: Box::new(handler),
        });
        self.owners.insert(token, element);
        token
    }

    /// Detaches the handler registered under `token`.
    ///
    /// Returns `false` if the token is unknown or was already removed.
    pub fn remove_handler(&mut self, token: HandlerToken) -> bool {
        let Some(element) = self.owners.remove(&token) else {
            return false;
        };
        let Some(entries) = self.handlers.get_mut(&element) else {
            return false;
        };
        entries.retain(|entry| entry.token != token);
        if entries.is_empty() {
            self.handlers.remove(&element);
        }
        true
    }

    /// Detaches every handler attached to `element`, returning how many
    /// there were.
    pub fn clear_handlers(&mut self, element: K) -> usize {
        let Some(entries) = self.handlers.remove(&element) else {
            return 0;
        };
        for entry in &entries {
            self.owners.remove(&entry.token);
        }
        entries.len()
    }

    /// Returns how many handlers for `event` are attached to `element`.
    #[must_use]
    pub fn handler_count<A>(&self, element: K, event: RoutedEvent<A>) -> usize {
        self.handlers.get(&element).map_or(0, |entries| {
            entries
                .iter()
                .filter(|entry| entry.event == event.id())
                .count()
        })
    }

    /// Appends an interceptor to the chain.
    pub fn add_interceptor(&mut self, interceptor: impl Interceptor<K> + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    /// Returns the number of interceptors.
    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Removes every interceptor.
    pub fn clear_interceptors(&mut self) {
        self.interceptors.clear();
    }

    /// Routes the event in `args` along `path`.
    ///
    /// `path` runs from the root to the event's source. If the source is not
    /// on `path` the event is routed as though the path held the source
    /// alone. Handler errors are collected in the report; they never stop
    /// delivery.
    ///
    /// Panics are not isolated. A handler or interceptor that panics unwinds
    /// out of this call, and interceptors that already ran do not get their
    /// `post_process`. Report failures by returning `Err` instead.
    pub fn route_event<A: 'static>(
        &mut self,
        args: &mut RoutedEventArgs<K, A>,
        path: &[K],
    ) -> RouteReport<K> {
        let event = args.event();
        let route = EventRoute::for_target(args.source(), path, event.strategy());
        tracing::trace!(event = event.name(), route = ?route.elements(), "routing event");
        let mut cx = RouteContext::new(event.id(), event.name(), route, args.handled);

        let mut entered = 0;
        for interceptor in &mut self.interceptors {
            entered += 1;
            if !interceptor.pre_process(&mut cx) {
                cx.aborted = true;
                tracing::debug!(
                    event = event.name(),
                    interceptor = entered - 1,
                    "route vetoed by interceptor"
                );
                break;
            }
        }

        if !cx.aborted {
            Self::deliver(&mut self.handlers, &mut cx, args);
        }

        for interceptor in self.interceptors[..entered].iter_mut().rev() {
            interceptor.post_process(&mut cx);
        }
        cx.into_report()
    }

    fn deliver<A: 'static>(
        handlers: &mut HashMap<K, Vec<HandlerEntry>>,
        cx: &mut RouteContext<K>,
        args: &mut RoutedEventArgs<K, A>,
    ) {
        let event = cx.event;
        for index in 0..cx.route.len() {
            let element = cx.route.elements()[index];
            let Some(entries) = handlers.get_mut(&element) else {
                continue;
            };
            for entry in entries.iter_mut().filter(|entry| entry.event == event) {
                if args.handled && !entry.handled_events_too {
                    continue;
                }
                let Some(handler) = entry.handler.downcast_mut::<BoxedHandler<K, A>>() else {
                    tracing::warn!(
                        ?element,
                        token = ?entry.token,
                        event = cx.name,
                        "handler payload type does not match the event, skipped"
                    );
                    continue;
                };
                cx.invoked += 1;
                if let Err(error) = handler(element, &mut *args) {
                    tracing::warn!(
                        ?element,
                        token = ?entry.token,
                        event = cx.name,
                        %error,
                        "routed event handler failed"
                    );
                    cx.failures.push(HandlerFailure {
                        element,
                        token: entry.token,
                        error,
                    });
                }
                cx.handled = args.handled;
            }
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for EventRouter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("elements", &self.handlers.keys().collect::<Vec<_>>())
            .field("handlers", &self.owners.len())
            .field("interceptors", &self.interceptors.len())
            .finish_non_exhaustive()
    }
}
