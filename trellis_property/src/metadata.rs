// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-property behavior fixed at registration: the default value, layout
//! flags, and the optional coerce and changed callbacks.

use alloc::boxed::Box;

use crate::object::DependencyObject;

bitflags::bitflags! {
    /// What a change to a property invalidates on the object that owns the value.
    ///
    /// The property system only carries these flags; element types read them
    /// from [`PropertyChangedArgs::flags`](crate::PropertyChangedArgs::flags)
    /// and invalidate accordingly.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// A change requires a new measure pass.
        const AFFECTS_MEASURE = 0b0000_0001;
        /// A change requires a new arrange pass.
        const AFFECTS_ARRANGE = 0b0000_0010;
        /// A change requires repainting.
        const AFFECTS_RENDER  = 0b0000_0100;
    }
}

/// Callback invoked after a property value changes.
///
/// The callback receives the object whose value changed, the old effective
/// value and the new effective value.
pub type PropertyChangedCallback<T> =
    Box<dyn Fn(&mut dyn DependencyObject, &T, &T) + Send + Sync>;

/// Callback for coercing a candidate value before it's compared and stored.
///
/// This is a pure transform of (object, candidate) into the value to store,
/// used to clamp values, validate ranges, etc.
pub type CoerceValueCallback<T> = Box<dyn Fn(&dyn DependencyObject, T) -> T + Send + Sync>;

/// Metadata for a dependency property.
///
/// This contains the configuration for a property: its default value, which
/// passes a change invalidates, and optional callbacks.
///
/// # Example
///
/// ```rust
/// use trellis_property::{PropertyFlags, PropertyMetadataBuilder};
///
/// let metadata = PropertyMetadataBuilder::new(100.0_f64)
///     .flags(PropertyFlags::AFFECTS_MEASURE)
///     .build();
///
/// assert_eq!(metadata.default_value(), &100.0);
/// assert!(metadata.flags().contains(PropertyFlags::AFFECTS_MEASURE));
/// ```
pub struct PropertyMetadata<T: 'static> {
    default_value: T,
    flags: PropertyFlags,
    changed_callback: Option<PropertyChangedCallback<T>>,
    coerce_callback: Option<CoerceValueCallback<T>>,
}

impl<T: 'static> PropertyMetadata<T> {
    /// Creates new property metadata with the given default value, no flags
    /// and no callbacks.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default_value,
            flags: PropertyFlags::empty(),
            changed_callback: None,
            coerce_callback: None,
        }
    }

    /// Returns a reference to the default value.
    #[must_use]
    #[inline]
    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Returns the invalidation flags.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Invokes the changed callback if one is set.
    #[inline]
    pub fn on_changed(&self, object: &mut dyn DependencyObject, old_value: &T, new_value: &T) {
        if let Some(callback) = &self.changed_callback {
            callback(object, old_value, new_value);
        }
    }

    /// Coerces a value using the coerce callback if one is set.
    #[inline]
    pub fn coerce(&self, object: &dyn DependencyObject, value: T) -> T {
        if let Some(callback) = &self.coerce_callback {
            callback(object, value)
        } else {
            value
        }
    }

    /// Returns whether a changed callback is set.
    #[must_use]
    #[inline]
    pub fn has_changed_callback(&self) -> bool {
        self.changed_callback.is_some()
    }

    /// Returns whether a coerce callback is set.
    #[must_use]
    #[inline]
    pub fn has_coerce_callback(&self) -> bool {
        self.coerce_callback.is_some()
    }
}

// Manual Debug impl since callbacks aren't Debug
impl<T: core::fmt::Debug + 'static> core::fmt::Debug for PropertyMetadata<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("default_value", &self.default_value)
            .field("flags", &self.flags)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .finish()
    }
}

/// Builder for [`PropertyMetadata`].
///
/// # Example
///
/// ```rust
/// use trellis_property::{PropertyFlags, PropertyMetadataBuilder};
///
/// let metadata = PropertyMetadataBuilder::new(0.0_f64)
///     .flags(PropertyFlags::AFFECTS_MEASURE | PropertyFlags::AFFECTS_RENDER)
///     .coerce(|_, v: f64| v.clamp(0.0, 100.0))
///     .on_changed(|_, old, new| assert_ne!(old, new))
///     .build();
/// assert!(metadata.has_coerce_callback());
/// ```
pub struct PropertyMetadataBuilder<T: 'static> {
    metadata: PropertyMetadata<T>,
}

impl<T: core::fmt::Debug + 'static> core::fmt::Debug for PropertyMetadataBuilder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyMetadataBuilder")
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl<T: 'static> PropertyMetadataBuilder<T> {
    /// Creates a new builder with the given default value.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            metadata: PropertyMetadata::new(default_value),
        }
    }

    /// Sets the passes invalidated by changes to this property.
    #[must_use]
    pub fn flags(mut self, flags: PropertyFlags) -> Self {
        self.metadata.flags = flags;
        self
    }

    /// Sets a callback to be invoked after the property value changes.
    ///
    /// It runs after the object's own
    /// [`on_property_changed`](DependencyObject::on_property_changed) hook.
    #[must_use]
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut dyn DependencyObject, &T, &T) + Send + Sync + 'static,
    {
        self.metadata.changed_callback = Some(Box::new(callback));
        self
    }

    /// Sets a callback to coerce candidate values before they are compared
    /// and stored.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(&dyn DependencyObject, T) -> T + Send + Sync + 'static,
    {
        self.metadata.coerce_callback = Some(Box::new(callback));
        self
    }

    /// Builds the [`PropertyMetadata`].
    #[must_use]
    pub fn build(self) -> PropertyMetadata<T> {
        self.metadata
    }
}
