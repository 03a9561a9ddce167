// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Responder: routed events over element trees.
//!
//! ## Overview
//!
//! A routed event is registered once in a [`RoutedEventRegistry`] with a
//! [`RoutingStrategy`] that never changes afterwards. Raising it on an
//! element delivers it along part of the root-to-element path:
//!
//! - [`Tunnel`](RoutingStrategy::Tunnel): root down to the target's parent.
//! - [`Direct`](RoutingStrategy::Direct): the target only.
//! - [`Bubble`](RoutingStrategy::Bubble): target up to the root.
//!
//! This crate does not hit test. Feed [`EventRouter::route_event`] a
//! root-to-target path, for example from
//! `trellis_layout::ElementTree::hit_test_path`, or enable the
//! `element_tree_adapter` feature and use the [`adapters`] module.
//!
//! ## Handlers
//!
//! Handlers are attached per element and per event with
//! [`EventRouter::add_handler`], which returns a [`HandlerToken`] for
//! [`EventRouter::remove_handler`]. Along a route, each element's handlers run
//! in registration order. Once a handler marks the event
//! [`handled`](RoutedEventArgs::handled), only handlers registered with
//! `handled_events_too` keep running.
//!
//! A handler that returns an error does not stop the route: the failure is
//! recorded in the [`RouteReport`] and logged, and delivery continues.
//!
//! ## Interceptors
//!
//! [`Interceptor`]s wrap every dispatch. Their `pre_process` hooks run in
//! order and may veto the route; their `post_process` hooks run in reverse
//! for every interceptor that was entered, whether or not the route ran.
//!
//! ## Example
//!
//! ```rust
//! use trellis_property::OwnerType;
//! use trellis_responder::{EventRouter, RoutedEventArgs, RoutedEventRegistry, RoutingStrategy};
//!
//! struct Button;
//!
//! let mut events = RoutedEventRegistry::new();
//! let click = events.register::<()>(OwnerType::of::<Button>(), "Click", RoutingStrategy::Bubble);
//!
//! let mut router = EventRouter::<u32>::new();
//! router.add_handler(1, click, |_, _| Err("broken".into()), false);
//! router.add_handler(1, click, |_, _| Ok(()), false);
//!
//! let report = router.route_event(&mut RoutedEventArgs::new(click, 3, ()), &[1, 2, 3]);
//! assert_eq!(report.route.elements(), &[3, 2, 1]);
//! assert_eq!(report.invoked, 2);
//! assert_eq!(report.failures.len(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;

mod args;
mod error;
mod registry;
mod route;
mod router;
mod types;

pub use args::RoutedEventArgs;
pub use error::{HandlerError, HandlerFailure, RouterError};
pub use registry::{RoutedEventDescriptor, RoutedEventRegistry};
pub use route::EventRoute;
pub use router::{EventRouter, Interceptor, RouteContext, RouteReport};
pub use types::{HandlerToken, RoutedEvent, RoutedEventId, RoutingStrategy};
