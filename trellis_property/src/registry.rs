// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The table of registered properties, keyed by id and by `(owner, name)`.

use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use hashbrown::HashMap;

use crate::error::PropertyError;
use crate::id::{Property, PropertyId, PropertyKey, ReadableProperty};
use crate::metadata::{PropertyFlags, PropertyMetadata};
use crate::object::{self, DependencyObject};
use crate::owner::OwnerType;
use crate::value::{ErasedValue, PropertyValue};

/// A registration entry for a property.
///
/// This stores the property's name, owner, type information and metadata, and
/// the typed write path used by the dynamic, name-based setters.
pub struct PropertyRegistration {
    id: PropertyId,
    owner: OwnerType,
    name: &'static str,
    type_id: TypeId,
    type_name: &'static str,
    read_only: bool,
    metadata: Box<dyn ErasedMetadata>,
}

impl PropertyRegistration {
    /// Returns the property's identifier (its registration index).
    #[must_use]
    #[inline]
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// Returns the owner type the property was registered on.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> OwnerType {
        self.owner
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the property's value type.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the name of the property's value type.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns whether writes require a [`PropertyKey`].
    #[must_use]
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns the invalidation flags of this property.
    #[must_use]
    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.metadata.flags()
    }

    /// Returns the default value, type-erased.
    #[must_use]
    pub fn default_value(&self) -> ErasedValue {
        self.metadata.default_erased()
    }

    /// Writes an erased value through the typed write path.
    ///
    /// Access control is the caller's responsibility.
    pub(crate) fn write_erased(
        &self,
        object: &mut dyn DependencyObject,
        value: ErasedValue,
    ) -> Result<bool, PropertyError> {
        if value.type_id() != self.type_id {
            return Err(PropertyError::TypeMismatch {
                name: self.name,
                expected: self.type_name,
                found: value.type_name(),
            });
        }
        Ok(self.metadata.write(self, object, value))
    }

    /// Clears the local value through the typed write path.
    pub(crate) fn clear_erased(&self, object: &mut dyn DependencyObject) -> bool {
        self.metadata.clear(self, object)
    }
}

impl core::fmt::Debug for PropertyRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistration")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("type", &self.type_name)
            .field("read_only", &self.read_only)
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}

/// Every registered dependency property, in registration order.
///
/// Registration happens once, up front. Afterwards the registry answers
/// lookups by id or by owner and name, and hands out typed metadata.
/// The registry is an explicit value: build one, register into it, then share
/// it (for example behind an `Arc`) with everything that reads or writes
/// properties.
///
/// # Example
///
/// ```rust
/// use trellis_property::{OwnerType, PropertyFlags, PropertyMetadataBuilder, PropertyRegistry};
///
/// struct Button;
///
/// let mut registry = PropertyRegistry::new();
/// let width = registry.register(
///     OwnerType::of::<Button>(),
///     "Width",
///     PropertyMetadataBuilder::new(0.0_f64)
///         .flags(PropertyFlags::AFFECTS_MEASURE)
///         .build(),
/// );
///
/// assert_eq!(registry.name(width.id()), Some("Width"));
/// assert_eq!(registry.find(OwnerType::of::<Button>(), "Width"), Some(width.id()));
/// assert!(registry.flags(width.id()).contains(PropertyFlags::AFFECTS_MEASURE));
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    properties: Vec<PropertyRegistration>,
    by_name: HashMap<OwnerType, HashMap<&'static str, PropertyId>>,
}

impl PropertyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new read-write property on `owner`.
    ///
    /// Returns a type-safe [`Property<T>`] handle for accessing the property.
    ///
    /// # Panics
    ///
    /// Panics if a property with the same name is already registered on the
    /// same owner, or if more than 65,536 properties are registered. Use
    /// [`try_register`](Self::try_register) to handle duplicates.
    pub fn register<T: PropertyValue>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        metadata: PropertyMetadata<T>,
    ) -> Property<T> {
        match self.try_register(owner, name, metadata) {
            Ok(property) => property,
            Err(err) => panic!("{err}"),
        }
    }

    /// Registers a new read-write property, reporting duplicates as an error.
    ///
    /// On error the registry is unchanged.
    pub fn try_register<T: PropertyValue>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        metadata: PropertyMetadata<T>,
    ) -> Result<Property<T>, PropertyError> {
        self.insert(owner, name, metadata, false)
            .map(Property::from_id)
    }

    /// Registers a read-only property on `owner`.
    ///
    /// Returns the [`PropertyKey<T>`] that grants write access; hand out
    /// [`PropertyKey::property`] to readers.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`register`](Self::register).
    pub fn register_read_only<T: PropertyValue>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        metadata: PropertyMetadata<T>,
    ) -> PropertyKey<T> {
        match self.try_register_read_only(owner, name, metadata) {
            Ok(key) => key,
            Err(err) => panic!("{err}"),
        }
    }

    /// Registers a read-only property, reporting duplicates as an error.
    pub fn try_register_read_only<T: PropertyValue>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        metadata: PropertyMetadata<T>,
    ) -> Result<PropertyKey<T>, PropertyError> {
        self.insert(owner, name, metadata, true)
            .map(PropertyKey::from_id)
    }

    fn insert<T: PropertyValue>(
        &mut self,
        owner: OwnerType,
        name: &'static str,
        metadata: PropertyMetadata<T>,
        read_only: bool,
    ) -> Result<PropertyId, PropertyError> {
        if self.find(owner, name).is_some() {
            return Err(PropertyError::AlreadyRegistered { owner, name });
        }
        let Ok(index) = u16::try_from(self.properties.len()) else {
            panic!("Too many properties registered (max {})", u16::MAX);
        };
        let id = PropertyId::new(index);

        self.properties.push(PropertyRegistration {
            id,
            owner,
            name,
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            read_only,
            metadata: Box::new(metadata),
        });
        self.by_name.entry(owner).or_default().insert(name, id);

        Ok(id)
    }

    /// Returns the number of registered properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Looks up a property by owner and name.
    #[must_use]
    pub fn find(&self, owner: OwnerType, name: &str) -> Option<PropertyId> {
        self.by_name.get(&owner)?.get(name).copied()
    }

    /// Looks up a property by owner and name, reporting a miss as an error.
    pub fn find_or_err(&self, owner: OwnerType, name: &str) -> Result<PropertyId, PropertyError> {
        self.find(owner, name)
            .ok_or_else(|| PropertyError::UnknownProperty {
                owner,
                name: name.to_string(),
            })
    }

    /// Returns the name of a property.
    #[must_use]
    pub fn name(&self, id: PropertyId) -> Option<&'static str> {
        self.get(id).map(PropertyRegistration::name)
    }

    /// Returns the registration for a property.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyRegistration> {
        self.properties.get(id.index() as usize)
    }

    /// Returns the invalidation flags of a property.
    #[must_use]
    pub fn flags(&self, id: PropertyId) -> PropertyFlags {
        self.get(id)
            .map(PropertyRegistration::flags)
            .unwrap_or_default()
    }

    /// Returns the metadata for a typed property.
    ///
    /// Returns `None` if the property is not registered or the type doesn't match.
    #[must_use]
    pub fn metadata<T: 'static>(
        &self,
        property: impl ReadableProperty<T>,
    ) -> Option<&PropertyMetadata<T>> {
        self.metadata_by_id(property.id())
    }

    /// Returns the metadata for a property ID, if it was registered with type `T`.
    #[must_use]
    pub fn metadata_by_id<T: 'static>(&self, id: PropertyId) -> Option<&PropertyMetadata<T>> {
        self.get(id).and_then(|r| r.metadata.downcast_ref())
    }

    /// Returns an iterator over all registered properties in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyRegistration> {
        self.properties.iter()
    }

    /// Returns an iterator over the properties registered on `owner`, in
    /// registration order.
    pub fn owned_by(&self, owner: OwnerType) -> impl Iterator<Item = &PropertyRegistration> {
        self.properties.iter().filter(move |r| r.owner == owner)
    }
}

impl core::fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("count", &self.properties.len())
            .field(
                "properties",
                &self.properties.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Type-erased metadata: the typed write path for one property value type,
/// captured at registration time.
trait ErasedMetadata: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn flags(&self) -> PropertyFlags;
    fn default_erased(&self) -> ErasedValue;
    fn write(
        &self,
        registration: &PropertyRegistration,
        object: &mut dyn DependencyObject,
        value: ErasedValue,
    ) -> bool;
    fn clear(&self, registration: &PropertyRegistration, object: &mut dyn DependencyObject)
    -> bool;
}

impl<T: PropertyValue> ErasedMetadata for PropertyMetadata<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn flags(&self) -> PropertyFlags {
        PropertyMetadata::flags(self)
    }

    fn default_erased(&self) -> ErasedValue {
        ErasedValue::new(self.default_value().clone())
    }

    fn write(
        &self,
        registration: &PropertyRegistration,
        object: &mut dyn DependencyObject,
        value: ErasedValue,
    ) -> bool {
        match value.downcast::<T>() {
            Ok(value) => object::write_value(object, registration, self, value),
            // Type was checked by `write_erased`.
            Err(_) => false,
        }
    }

    fn clear(
        &self,
        registration: &PropertyRegistration,
        object: &mut dyn DependencyObject,
    ) -> bool {
        object::clear_value(object, registration, self)
    }
}

impl dyn ErasedMetadata {
    fn downcast_ref<T: 'static>(&self) -> Option<&PropertyMetadata<T>> {
        self.as_any().downcast_ref()
    }
}
