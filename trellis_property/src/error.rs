// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the property system.

use alloc::string::String;
use core::fmt;

use crate::owner::OwnerType;

/// Error returned by registration and by the dynamic write path.
///
/// Every variant is reported before any state is touched: a failed
/// registration leaves the registry unchanged and a rejected write leaves the
/// object's values unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyError {
    /// A property with the same name is already registered for the owner.
    AlreadyRegistered {
        /// Owner the registration was attempted for.
        owner: OwnerType,
        /// Name of the property.
        name: &'static str,
    },
    /// The property is read-only and the write did not present its key.
    ReadOnly {
        /// Name of the property.
        name: &'static str,
    },
    /// No property with that name is registered for the owner.
    UnknownProperty {
        /// Owner that was searched.
        owner: OwnerType,
        /// Name that was looked up.
        name: String,
    },
    /// The value's type is not the property's declared type.
    TypeMismatch {
        /// Name of the property.
        name: &'static str,
        /// Declared value type.
        expected: &'static str,
        /// Type of the rejected value.
        found: &'static str,
    },
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered { owner, name } => {
                write!(f, "property '{name}' is already registered on {owner}")
            }
            Self::ReadOnly { name } => write!(f, "property '{name}' is read-only"),
            Self::UnknownProperty { owner, name } => {
                write!(f, "no property '{name}' is registered on {owner}")
            }
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "property '{name}' expects a value of type {expected}, got {found}"
            ),
        }
    }
}

impl core::error::Error for PropertyError {}
