// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owner types for registered properties.

use core::fmt;

/// The type that declares a property or routed event.
///
/// Names are unique per owner: two owners may each register a `"Width"`, but
/// one owner cannot register it twice.
///
/// Owners are identified by name. [`OwnerType::of`] uses the Rust type name;
/// [`OwnerType::named`] lets collaborators that only know a textual type name
/// (for example a markup loader) address the same owner.
///
/// ```rust
/// use trellis_property::OwnerType;
///
/// struct Button;
///
/// let owner = OwnerType::of::<Button>();
/// assert!(owner.name().ends_with("Button"));
/// assert_eq!(OwnerType::named("Button"), OwnerType::named("Button"));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerType {
    name: &'static str,
}

impl OwnerType {
    /// Returns the owner for the Rust type `T`.
    #[must_use]
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: core::any::type_name::<T>(),
        }
    }

    /// Returns an owner identified by an explicit name.
    #[must_use]
    #[inline]
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// Returns the owner's name.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnerType").field(&self.name).finish()
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
