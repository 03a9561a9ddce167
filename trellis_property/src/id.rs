// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property ids and the typed handles built on them:
//!
//! - [`Property<T>`]: a read-write property.
//! - [`ReadOnlyProperty<T>`]: the public, read-only face of a property whose
//!   writes are reserved to its owner.
//! - [`PropertyKey<T>`]: the write capability for a read-only property.
//!
//! Write access is checked by the type system: only [`Property<T>`] and
//! [`PropertyKey<T>`] implement [`WritableProperty`].

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// The untyped id of a registered property.
///
/// A `u16` index into a [`PropertyRegistry`](crate::PropertyRegistry). Ids are
/// assigned in registration order, so sorting by id sorts by registration.
///
/// # Example
///
/// ```rust
/// use trellis_property::PropertyId;
///
/// let id = PropertyId::new(42);
/// assert_eq!(id.index(), 42);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a new property ID from the given index.
    ///
    /// This is typically called by [`PropertyRegistry::register`](crate::PropertyRegistry::register)
    /// rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this property ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// A typed handle that can be used to read a property.
pub trait ReadableProperty<T>: Copy {
    /// Returns the underlying property ID.
    fn id(self) -> PropertyId;
}

/// A typed handle that grants write access to a property.
///
/// Implemented by [`Property<T>`] and [`PropertyKey<T>`], never by
/// [`ReadOnlyProperty<T>`].
pub trait WritableProperty<T>: ReadableProperty<T> {}

/// A type-safe, read-write property key.
///
/// This wraps a [`PropertyId`] with a phantom type parameter `T` that represents
/// the property's value type, so getting and setting values is checked at
/// compile time.
///
/// ```rust
/// use trellis_property::{OwnerType, Property, PropertyMetadataBuilder, PropertyRegistry};
///
/// struct Button;
///
/// let mut registry = PropertyRegistry::new();
/// let width: Property<f64> = registry.register(
///     OwnerType::of::<Button>(),
///     "Width",
///     PropertyMetadataBuilder::new(0.0_f64).build(),
/// );
/// // store.set_value(width, "not a number"); // Would not compile!
/// # let _ = width;
/// ```
///
/// `Property<T>` is the same size as `PropertyId` (2 bytes).
pub struct Property<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Creates a new typed property from a property ID.
    ///
    /// This is typically called by the registry rather than directly. The
    /// caller must ensure that the `PropertyId` was registered with the same
    /// type `T`; a mismatch is reported as a missing registration at use.
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

/// The read-only face of a property registered with
/// [`PropertyRegistry::register_read_only`](crate::PropertyRegistry::register_read_only).
///
/// Anyone holding this handle can read the property; writing requires the
/// matching [`PropertyKey<T>`].
pub struct ReadOnlyProperty<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ReadOnlyProperty<T> {
    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

/// Write capability for a read-only property.
///
/// Only the code that registered the property receives a key. Hand out
/// [`PropertyKey::property`] to readers and keep the key private.
pub struct PropertyKey<T> {
    property: ReadOnlyProperty<T>,
}

impl<T> PropertyKey<T> {
    pub(crate) const fn from_id(id: PropertyId) -> Self {
        Self {
            property: ReadOnlyProperty {
                id,
                _marker: PhantomData,
            },
        }
    }

    /// Returns the read-only handle for this property.
    #[must_use]
    #[inline]
    pub const fn property(&self) -> ReadOnlyProperty<T> {
        self.property
    }

    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(&self) -> PropertyId {
        self.property.id
    }
}

impl<T> ReadableProperty<T> for Property<T> {
    #[inline]
    fn id(self) -> PropertyId {
        self.id
    }
}

impl<T> WritableProperty<T> for Property<T> {}

impl<T> ReadableProperty<T> for ReadOnlyProperty<T> {
    #[inline]
    fn id(self) -> PropertyId {
        self.id
    }
}

impl<T> ReadableProperty<T> for &PropertyKey<T> {
    #[inline]
    fn id(self) -> PropertyId {
        self.property.id
    }
}

impl<T> WritableProperty<T> for &PropertyKey<T> {}

// No bounds on `T`: handles are ids.

macro_rules! impl_handle_traits {
    ($name:ident, $label:literal) => {
        impl<T> Copy for $name<T> {}

        impl<T> Clone for $name<T> {
            #[inline]
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> PartialEq for $name<T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl<T> Eq for $name<T> {}

        impl<T> Hash for $name<T> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct($label)
                    .field("id", &self.id)
                    .field("type", &core::any::type_name::<T>())
                    .finish()
            }
        }
    };
}

impl_handle_traits!(Property, "Property");
impl_handle_traits!(ReadOnlyProperty, "ReadOnlyProperty");

impl<T> fmt::Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyKey")
            .field("id", &self.property.id)
            .finish_non_exhaustive()
    }
}
