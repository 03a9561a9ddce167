// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Property: dependency properties for retained UI objects.
//!
//! This crate provides the storage and change-notification engine that
//! element state is built on. Properties are registered once per owner type
//! in a [`PropertyRegistry`]; each object keeps only the values that differ
//! from their registered defaults in a sparse [`PropertyStore`].
//!
//! ## Core Concepts
//!
//! - [`PropertyRegistry`] owns one [`PropertyRegistration`] per property:
//!   owner, name, value type, [`PropertyFlags`] and [`PropertyMetadata`]
//!   (default value plus optional coerce and changed callbacks).
//! - [`Property<T>`] is the typed handle returned by registration. Read-only
//!   properties hand out a [`ReadOnlyProperty<T>`] for reads and keep the
//!   [`PropertyKey<T>`] that grants writes.
//! - [`DependencyObject`] is implemented by anything that carries a
//!   [`PropertyStore`]. [`DependencyObjectExt`] adds the read and write
//!   operations on top.
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_property::{
//!     DependencyObject, DependencyObjectExt, ErasedValue, OwnerType, PropertyError,
//!     PropertyFlags, PropertyMetadataBuilder, PropertyRegistry, PropertyStore,
//! };
//!
//! #[derive(Default)]
//! struct Label {
//!     store: PropertyStore,
//! }
//!
//! impl DependencyObject for Label {
//!     fn property_store(&self) -> &PropertyStore { &self.store }
//!     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
//! }
//!
//! let mut registry = PropertyRegistry::new();
//! let font_size = registry.register(
//!     OwnerType::of::<Label>(),
//!     "FontSize",
//!     PropertyMetadataBuilder::new(12.0_f64)
//!         .flags(PropertyFlags::AFFECTS_MEASURE)
//!         .coerce(|_, v: f64| v.max(1.0))
//!         .build(),
//! );
//!
//! let mut label = Label::default();
//! assert_eq!(label.get_value(font_size, &registry), 12.0);
//!
//! label.set_value(font_size, 0.0, &registry);
//! assert_eq!(label.get_value(font_size, &registry), 1.0);
//!
//! // Collaborators that only know names go through the checked dynamic path.
//! let err = label
//!     .set_value_by_name(OwnerType::of::<Label>(), "FontSize", ErasedValue::new("big"), &registry)
//!     .unwrap_err();
//! assert!(matches!(err, PropertyError::TypeMismatch { .. }));
//! ```
//!
//! ## Memory Layout
//!
//! | Optimization | Description |
//! |--------------|-------------|
//! | **Sparse storage** | `PropertyStore` only allocates for non-default properties |
//! | **Shared defaults** | Default values stored in registry, not per-object |
//! | **Inline storage** | `SmallVec` for small property counts |
//! | **`PropertyId` as u16** | Compact property identification |
//!
//! ## Threading
//!
//! Writes need `&mut` access to the object, so each read or write is atomic
//! with respect to the object by construction. Values and callbacks are
//! `Send + Sync`, so a built registry can be shared behind an `Arc`.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod error;
mod id;
mod metadata;
mod object;
mod owner;
mod registry;
mod store;
mod value;

pub use error::PropertyError;
pub use id::{
    Property, PropertyId, PropertyKey, ReadOnlyProperty, ReadableProperty, WritableProperty,
};
pub use metadata::{
    CoerceValueCallback, PropertyChangedCallback, PropertyFlags, PropertyMetadata,
    PropertyMetadataBuilder,
};
pub use object::{DependencyObject, DependencyObjectExt, PropertyChangedArgs};
pub use owner::OwnerType;
pub use registry::{PropertyRegistration, PropertyRegistry};
pub use store::PropertyStore;
pub use value::{ErasedValue, PropertyValue};
