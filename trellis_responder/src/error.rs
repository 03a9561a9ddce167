// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by event registration and by handlers.

use alloc::boxed::Box;
use core::fmt;

use trellis_property::OwnerType;

use crate::types::HandlerToken;

/// Error returned by [`RoutedEventRegistry::try_register`](crate::RoutedEventRegistry::try_register).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterError {
    /// An event with the same name is already registered for the owner.
    AlreadyRegistered {
        /// Owner the registration was attempted for.
        owner: OwnerType,
        /// Name of the event.
        name: &'static str,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered { owner, name } => {
                write!(f, "routed event '{name}' is already registered on {owner}")
            }
        }
    }
}

impl core::error::Error for RouterError {}

/// The error type handlers return.
///
/// Any error type converts into it with `?` or `.into()`, including string
/// messages.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync>;

/// A handler that returned an error while an event was routed.
///
/// Failures are collected on the route and never stop delivery to the
/// remaining handlers.
#[derive(Debug)]
pub struct HandlerFailure<K> {
    /// The element the handler was attached to.
    pub element: K,
    /// The handler's registration token.
    pub token: HandlerToken,
    /// The error the handler returned.
    pub error: HandlerError,
}
