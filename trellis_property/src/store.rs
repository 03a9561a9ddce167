// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse local values for one dependency object.
//!
//! A [`PropertyStore`] keeps only the values that differ from their defaults,
//! as `(PropertyId, ErasedValue)` pairs sorted by id. Lookups binary search the
//! pairs; an element rarely sets more than a handful of properties, so the pairs
//! usually fit inline and a read touches one small contiguous buffer.
//!
//! No entry ever equals its property's default: a missing entry means "use the
//! default". Only the write path on
//! [`DependencyObjectExt`](crate::DependencyObjectExt) mutates a store, and it
//! keeps that true.

use smallvec::SmallVec;

use crate::id::{PropertyId, ReadableProperty};
use crate::registry::PropertyRegistry;
use crate::value::{ErasedValue, PropertyValue};

/// Entries held before the store spills to the heap.
const INLINE_CAPACITY: usize = 8;

/// Per-object sparse storage for local property values.
///
/// # Example
///
/// ```rust
/// use trellis_property::{
///     DependencyObject, DependencyObjectExt, OwnerType, PropertyMetadataBuilder,
///     PropertyRegistry, PropertyStore,
/// };
///
/// struct Element { store: PropertyStore }
/// impl DependencyObject for Element {
///     fn property_store(&self) -> &PropertyStore { &self.store }
///     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
/// }
///
/// let mut registry = PropertyRegistry::new();
/// let width = registry.register(
///     OwnerType::named("Element"),
///     "Width",
///     PropertyMetadataBuilder::new(0.0_f64).build(),
/// );
///
/// let mut element = Element { store: PropertyStore::new() };
/// assert!(element.property_store().get_local(width).is_none());
/// assert_eq!(element.property_store().get_value(width, &registry), 0.0);
///
/// element.set_value(width, 100.0, &registry);
/// assert_eq!(element.property_store().get_local(width), Some(&100.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    /// Sorted by [`PropertyId`].
    local_entries: SmallVec<[(PropertyId, ErasedValue); INLINE_CAPACITY]>,
}

impl PropertyStore {
    /// Creates a new, empty property store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no properties have explicit values set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local_entries.is_empty()
    }

    /// Returns the number of properties with explicit values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.local_entries.len()
    }

    /// Returns the property IDs that have local values, in ascending order.
    pub fn property_ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.local_entries.iter().map(|(id, _)| *id)
    }

    #[inline]
    fn find_entry(&self, id: PropertyId) -> Result<usize, usize> {
        self.local_entries.binary_search_by_key(&id, |(pid, _)| *pid)
    }

    /// Gets the local value, if set.
    #[must_use]
    #[inline]
    pub fn get_local<T: 'static>(&self, property: impl ReadableProperty<T>) -> Option<&T> {
        self.get_local_erased(property.id())
            .and_then(ErasedValue::downcast_ref)
    }

    /// Gets the local value as an [`ErasedValue`], if set.
    #[must_use]
    #[inline]
    pub fn get_local_erased(&self, id: PropertyId) -> Option<&ErasedValue> {
        self.find_entry(id)
            .ok()
            .map(|idx| &self.local_entries[idx].1)
    }

    /// Returns `true` if the property has a local value.
    #[must_use]
    #[inline]
    pub fn has_local(&self, id: PropertyId) -> bool {
        self.find_entry(id).is_ok()
    }

    /// Gets the effective value: the local value if one is set, else the
    /// registered default.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered in the registry with type `T`.
    #[must_use]
    pub fn get_value<T: PropertyValue>(
        &self,
        property: impl ReadableProperty<T>,
        registry: &PropertyRegistry,
    ) -> T {
        self.get_value_ref(property, registry).clone()
    }

    /// Borrowing form of [`get_value`](Self::get_value).
    ///
    /// The reference points into this store for a local value and into the
    /// registry for a default.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered in the registry with type `T`.
    #[must_use]
    #[inline]
    pub fn get_value_ref<'a, T: PropertyValue>(
        &'a self,
        property: impl ReadableProperty<T>,
        registry: &'a PropertyRegistry,
    ) -> &'a T {
        let id = property.id();
        if let Some(v) = self.get_local_erased(id)
            && let Some(v) = v.downcast_ref::<T>()
        {
            return v;
        }

        if let Some(metadata) = registry.metadata_by_id::<T>(id) {
            return metadata.default_value();
        }

        panic!("Property {id:?} not found in registry");
    }

    /// Stores a local value, replacing any previous one.
    pub(crate) fn set_local_erased(&mut self, id: PropertyId, value: ErasedValue) {
        match self.find_entry(id) {
            Ok(idx) => self.local_entries[idx].1 = value,
            Err(idx) => self.local_entries.insert(idx, (id, value)),
        }
    }

    /// Removes a local value, returning it if one was present.
    pub(crate) fn remove_local(&mut self, id: PropertyId) -> Option<ErasedValue> {
        let idx = self.find_entry(id).ok()?;
        Some(self.local_entries.remove(idx).1)
    }
}
