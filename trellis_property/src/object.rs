// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dependency object trait and the property write path.
//!
//! This module provides the [`DependencyObject`] trait for objects that carry
//! dependency properties, and [`DependencyObjectExt`], which implements the
//! read and write operations for every such object.
//!
//! Every write goes through the same sequence:
//!
//! 1. The candidate is coerced by the property's coerce callback.
//! 2. It is compared with the current effective value; an equal value is a
//!    no-op and fires nothing.
//! 3. A value equal to the default removes the local entry, anything else is
//!    stored.
//! 4. [`DependencyObject::on_property_changed`] runs, then the metadata's
//!    changed callback, both with the old and new effective values.

use alloc::format;

use crate::error::PropertyError;
use crate::id::{PropertyId, ReadableProperty, WritableProperty};
use crate::metadata::{PropertyFlags, PropertyMetadata};
use crate::owner::OwnerType;
use crate::registry::{PropertyRegistration, PropertyRegistry};
use crate::store::PropertyStore;
use crate::value::{ErasedValue, PropertyValue};

/// Arguments passed to [`DependencyObject::on_property_changed`].
#[derive(Debug)]
pub struct PropertyChangedArgs<'a> {
    /// The property that changed.
    pub property: PropertyId,
    /// The property's registered name.
    pub name: &'static str,
    /// Passes invalidated by the change.
    pub flags: PropertyFlags,
    /// The effective value before the change.
    pub old_value: &'a ErasedValue,
    /// The effective value after the change.
    pub new_value: &'a ErasedValue,
}

impl PropertyChangedArgs<'_> {
    /// Returns the old value if the property's type is `T`.
    #[must_use]
    pub fn downcast_old<T: 'static>(&self) -> Option<&T> {
        self.old_value.downcast_ref()
    }

    /// Returns the new value if the property's type is `T`.
    #[must_use]
    pub fn downcast_new<T: 'static>(&self) -> Option<&T> {
        self.new_value.downcast_ref()
    }

    /// Returns `true` if this change is for `property`.
    #[must_use]
    pub fn is<T>(&self, property: impl ReadableProperty<T>) -> bool {
        self.property == property.id()
    }
}

/// A trait for objects that can have dependency properties.
///
/// Implementors only expose their [`PropertyStore`]; the read and write
/// operations come from [`DependencyObjectExt`].
///
/// # Example
///
/// ```rust
/// use trellis_property::{
///     DependencyObject, DependencyObjectExt, OwnerType, PropertyChangedArgs,
///     PropertyMetadataBuilder, PropertyRegistry, PropertyStore,
/// };
///
/// #[derive(Default)]
/// struct Element {
///     store: PropertyStore,
///     changes: u32,
/// }
///
/// impl DependencyObject for Element {
///     fn property_store(&self) -> &PropertyStore { &self.store }
///     fn property_store_mut(&mut self) -> &mut PropertyStore { &mut self.store }
///     fn on_property_changed(&mut self, _args: &PropertyChangedArgs<'_>) {
///         self.changes += 1;
///     }
/// }
///
/// let mut registry = PropertyRegistry::new();
/// let width = registry.register(
///     OwnerType::of::<Element>(),
///     "Width",
///     PropertyMetadataBuilder::new(0.0_f64)
///         .coerce(|_, v: f64| v.max(0.0))
///         .build(),
/// );
///
/// let mut element = Element::default();
/// assert!(element.set_value(width, 100.0, &registry));
/// assert!(!element.set_value(width, 100.0, &registry));
///
/// // Coerced to the default, so the local entry is dropped.
/// assert!(element.set_value(width, -5.0, &registry));
/// assert!(!element.has_local_value(width));
/// assert_eq!(element.changes, 2);
/// ```
pub trait DependencyObject {
    /// Returns the object's property store.
    fn property_store(&self) -> &PropertyStore;

    /// Returns the object's property store mutably.
    ///
    /// Writing to the store directly bypasses coercion and notification; use
    /// the [`DependencyObjectExt`] methods instead.
    fn property_store_mut(&mut self) -> &mut PropertyStore;

    /// Called after any property on this object changed its effective value.
    ///
    /// Runs before the property's own changed callback.
    fn on_property_changed(&mut self, args: &PropertyChangedArgs<'_>) {
        let _ = args;
    }
}

/// Read and write operations for [`DependencyObject`]s.
///
/// Implemented for every [`DependencyObject`].
pub trait DependencyObjectExt: DependencyObject {
    /// Gets the effective value (local value, else the registered default).
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    fn get_value<T: PropertyValue>(
        &self,
        property: impl ReadableProperty<T>,
        registry: &PropertyRegistry,
    ) -> T;

    /// Gets the effective value, borrowed.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    fn get_value_ref<'a, T: PropertyValue>(
        &'a self,
        property: impl ReadableProperty<T>,
        registry: &'a PropertyRegistry,
    ) -> &'a T;

    /// Gets the effective value without knowing its type.
    ///
    /// Returns `None` if the property is not registered.
    fn get_value_erased(&self, id: PropertyId, registry: &PropertyRegistry)
    -> Option<ErasedValue>;

    /// Returns `true` if the property has a local value.
    fn has_local_value<T>(&self, property: impl ReadableProperty<T>) -> bool;

    /// Sets a local value through coercion, comparison and notification.
    ///
    /// Returns `true` if the effective value changed.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    fn set_value<T: PropertyValue>(
        &mut self,
        property: impl WritableProperty<T>,
        value: T,
        registry: &PropertyRegistry,
    ) -> bool;

    /// Removes the local value, notifying a change back to the default.
    ///
    /// Returns `true` if a local value was present. Coercion is not applied.
    ///
    /// # Panics
    ///
    /// Panics if the property is not registered with type `T`.
    fn clear_value<T: PropertyValue>(
        &mut self,
        property: impl WritableProperty<T>,
        registry: &PropertyRegistry,
    ) -> bool;

    /// Sets a value by ID with a runtime-typed value.
    ///
    /// This is the path for collaborators that only know properties by name,
    /// such as markup loaders. Read-only properties are rejected; unknown
    /// properties and values of the wrong type are reported. On error the
    /// object is untouched.
    fn set_value_erased(
        &mut self,
        id: PropertyId,
        value: ErasedValue,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError>;

    /// Looks a property up by owner and name, then writes it like
    /// [`set_value_erased`](Self::set_value_erased).
    fn set_value_by_name(
        &mut self,
        owner: OwnerType,
        name: &str,
        value: ErasedValue,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError>;

    /// Clears a value by ID. Read-only properties are rejected.
    fn clear_value_erased(
        &mut self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError>;
}

impl<O: DependencyObject> DependencyObjectExt for O {
    fn get_value<T: PropertyValue>(
        &self,
        property: impl ReadableProperty<T>,
        registry: &PropertyRegistry,
    ) -> T {
        self.property_store().get_value(property, registry)
    }

    fn get_value_ref<'a, T: PropertyValue>(
        &'a self,
        property: impl ReadableProperty<T>,
        registry: &'a PropertyRegistry,
    ) -> &'a T {
        self.property_store().get_value_ref(property, registry)
    }

    fn get_value_erased(
        &self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Option<ErasedValue> {
        let registration = registry.get(id)?;
        Some(match self.property_store().get_local_erased(id) {
            Some(value) => value.clone(),
            None => registration.default_value(),
        })
    }

    fn has_local_value<T>(&self, property: impl ReadableProperty<T>) -> bool {
        self.property_store().has_local(property.id())
    }

    fn set_value<T: PropertyValue>(
        &mut self,
        property: impl WritableProperty<T>,
        value: T,
        registry: &PropertyRegistry,
    ) -> bool {
        let (registration, metadata) = typed_registration(property.id(), registry);
        write_value(self, registration, metadata, value)
    }

    fn clear_value<T: PropertyValue>(
        &mut self,
        property: impl WritableProperty<T>,
        registry: &PropertyRegistry,
    ) -> bool {
        let (registration, metadata) = typed_registration::<T>(property.id(), registry);
        clear_value(self, registration, metadata)
    }

    fn set_value_erased(
        &mut self,
        id: PropertyId,
        value: ErasedValue,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError> {
        let registration = writable_registration(id, registry)?;
        registration.write_erased(self, value)
    }

    fn set_value_by_name(
        &mut self,
        owner: OwnerType,
        name: &str,
        value: ErasedValue,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError> {
        let id = registry.find_or_err(owner, name)?;
        self.set_value_erased(id, value, registry)
    }

    fn clear_value_erased(
        &mut self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<bool, PropertyError> {
        let registration = writable_registration(id, registry)?;
        Ok(registration.clear_erased(self))
    }
}

fn typed_registration<T: PropertyValue>(
    id: PropertyId,
    registry: &PropertyRegistry,
) -> (&PropertyRegistration, &PropertyMetadata<T>) {
    match (registry.get(id), registry.metadata_by_id::<T>(id)) {
        (Some(registration), Some(metadata)) => (registration, metadata),
        _ => panic!("Property {id:?} not found in registry"),
    }
}

fn writable_registration(
    id: PropertyId,
    registry: &PropertyRegistry,
) -> Result<&PropertyRegistration, PropertyError> {
    let registration = registry
        .get(id)
        .ok_or_else(|| PropertyError::UnknownProperty {
            owner: OwnerType::named("<unregistered>"),
            name: format!("{id}"),
        })?;
    if registration.is_read_only() {
        return Err(PropertyError::ReadOnly {
            name: registration.name(),
        });
    }
    Ok(registration)
}

/// Coerces, compares, stores and notifies. Returns whether the effective
/// value changed.
pub(crate) fn write_value<T: PropertyValue>(
    object: &mut dyn DependencyObject,
    registration: &PropertyRegistration,
    metadata: &PropertyMetadata<T>,
    value: T,
) -> bool {
    let id = registration.id();
    let value = metadata.coerce(&*object, value);

    let old = match object.property_store().get_local_erased(id) {
        Some(local) => local.clone(),
        None => ErasedValue::new(metadata.default_value().clone()),
    };
    if old.downcast_ref::<T>() == Some(&value) {
        return false;
    }

    let new = ErasedValue::new(value);
    if new.downcast_ref::<T>() == Some(metadata.default_value()) {
        object.property_store_mut().remove_local(id);
    } else {
        object.property_store_mut().set_local_erased(id, new.clone());
    }

    notify(object, registration, metadata, &old, &new);
    true
}

/// Removes the local value and notifies a change back to the default.
pub(crate) fn clear_value<T: PropertyValue>(
    object: &mut dyn DependencyObject,
    registration: &PropertyRegistration,
    metadata: &PropertyMetadata<T>,
) -> bool {
    let Some(old) = object.property_store_mut().remove_local(registration.id()) else {
        return false;
    };
    let new = ErasedValue::new(metadata.default_value().clone());
    notify(object, registration, metadata, &old, &new);
    true
}

fn notify<T: PropertyValue>(
    object: &mut dyn DependencyObject,
    registration: &PropertyRegistration,
    metadata: &PropertyMetadata<T>,
    old: &ErasedValue,
    new: &ErasedValue,
) {
    object.on_property_changed(&PropertyChangedArgs {
        property: registration.id(),
        name: registration.name(),
        flags: registration.flags(),
        old_value: old,
        new_value: new,
    });
    if let (Some(old), Some(new)) = (old.downcast_ref::<T>(), new.downcast_ref::<T>()) {
        metadata.on_changed(object, old, new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{Property, PropertyKey};
    use crate::metadata::PropertyMetadataBuilder;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicU32, Ordering};

    const OWNER: OwnerType = OwnerType::named("Widget");

    #[derive(Default)]
    struct Widget {
        store: PropertyStore,
        changes: Vec<(&'static str, PropertyFlags)>,
    }

    impl DependencyObject for Widget {
        fn property_store(&self) -> &PropertyStore {
            &self.store
        }

        fn property_store_mut(&mut self) -> &mut PropertyStore {
            &mut self.store
        }

        fn on_property_changed(&mut self, args: &PropertyChangedArgs<'_>) {
            self.changes.push((args.name, args.flags));
        }
    }

    struct Fixture {
        registry: PropertyRegistry,
        width: Property<f64>,
        title: Property<String>,
        pressed: PropertyKey<bool>,
    }

    fn fixture() -> Fixture {
        let mut registry = PropertyRegistry::new();
        let width = registry.register(
            OWNER,
            "Width",
            PropertyMetadataBuilder::new(0.0_f64)
                .flags(PropertyFlags::AFFECTS_MEASURE)
                .coerce(|_, v: f64| v.clamp(0.0, 1000.0))
                .build(),
        );
        let title = registry.register(OWNER, "Title", PropertyMetadata::new(String::new()));
        let pressed = registry.register_read_only(OWNER, "IsPressed", PropertyMetadata::new(false));
        Fixture {
            registry,
            width,
            title,
            pressed,
        }
    }

    #[test]
    fn fresh_object_reads_defaults() {
        let f = fixture();
        let widget = Widget::default();
        assert_eq!(widget.get_value(f.width, &f.registry), 0.0);
        assert_eq!(widget.get_value_ref(f.title, &f.registry), "");
        assert!(!widget.get_value(f.pressed.property(), &f.registry));
        assert!(!widget.has_local_value(f.width));
    }

    #[test]
    fn set_value_notifies_once_per_change() {
        let f = fixture();
        let mut widget = Widget::default();

        assert!(widget.set_value(f.width, 50.0, &f.registry));
        assert!(!widget.set_value(f.width, 50.0, &f.registry));
        assert_eq!(widget.changes, [("Width", PropertyFlags::AFFECTS_MEASURE)]);
        assert_eq!(widget.get_value(f.width, &f.registry), 50.0);
    }

    #[test]
    fn setting_default_removes_local_entry() {
        let f = fixture();
        let mut widget = Widget::default();

        widget.set_value(f.width, 50.0, &f.registry);
        assert!(widget.set_value(f.width, 0.0, &f.registry));
        assert!(!widget.has_local_value(f.width));
        assert!(widget.property_store().is_empty());
        assert_eq!(widget.changes.len(), 2);
    }

    #[test]
    fn setting_default_on_fresh_object_is_a_no_op() {
        let f = fixture();
        let mut widget = Widget::default();
        assert!(!widget.set_value(f.width, 0.0, &f.registry));
        assert!(widget.changes.is_empty());
    }

    #[test]
    fn coercion_applies_before_comparison() {
        let f = fixture();
        let mut widget = Widget::default();

        assert!(widget.set_value(f.width, 5000.0, &f.registry));
        assert_eq!(widget.get_value(f.width, &f.registry), 1000.0);
        // Coerces to the stored value, so nothing changes.
        assert!(!widget.set_value(f.width, 2000.0, &f.registry));
        // Coerces to the default.
        assert!(widget.set_value(f.width, -1.0, &f.registry));
        assert!(!widget.has_local_value(f.width));
    }

    #[test]
    fn hook_runs_before_metadata_callback() {
        let order = Arc::new(AtomicU32::new(0));
        let seen = order.clone();

        let mut registry = PropertyRegistry::new();
        let count = registry.register(
            OWNER,
            "Count",
            PropertyMetadataBuilder::new(0_i32)
                .on_changed(move |object, old, new| {
                    assert_eq!((*old, *new), (0, 3));
                    // The hook has already recorded the change.
                    assert_eq!(object.property_store().len(), 1);
                    seen.store(1, Ordering::SeqCst);
                })
                .build(),
        );

        struct Counter {
            store: PropertyStore,
            hook_saw_callback: bool,
            order: Arc<AtomicU32>,
        }
        impl DependencyObject for Counter {
            fn property_store(&self) -> &PropertyStore {
                &self.store
            }
            fn property_store_mut(&mut self) -> &mut PropertyStore {
                &mut self.store
            }
            fn on_property_changed(&mut self, args: &PropertyChangedArgs<'_>) {
                assert_eq!(args.downcast_old::<i32>(), Some(&0));
                assert_eq!(args.downcast_new::<i32>(), Some(&3));
                self.hook_saw_callback = self.order.load(Ordering::SeqCst) == 1;
            }
        }

        let mut counter = Counter {
            store: PropertyStore::new(),
            hook_saw_callback: true,
            order: order.clone(),
        };
        assert!(counter.set_value(count, 3, &registry));
        assert!(!counter.hook_saw_callback);
        assert_eq!(order.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn clear_value_notifies_back_to_default() {
        let f = fixture();
        let mut widget = Widget::default();

        assert!(!widget.clear_value(f.width, &f.registry));
        assert!(widget.changes.is_empty());

        widget.set_value(f.title, String::from("hello"), &f.registry);
        assert!(widget.clear_value(f.title, &f.registry));
        assert_eq!(widget.get_value(f.title, &f.registry), "");
        assert_eq!(widget.changes.len(), 2);
    }

    #[test]
    fn key_writes_read_only_property() {
        let f = fixture();
        let mut widget = Widget::default();

        assert!(widget.set_value(&f.pressed, true, &f.registry));
        assert!(widget.get_value(f.pressed.property(), &f.registry));
        assert!(widget.clear_value(&f.pressed, &f.registry));
    }

    #[test]
    fn erased_write_rejects_read_only() {
        let f = fixture();
        let mut widget = Widget::default();

        let err = widget
            .set_value_erased(f.pressed.id(), ErasedValue::new(true), &f.registry)
            .unwrap_err();
        assert_eq!(err, PropertyError::ReadOnly { name: "IsPressed" });
        assert!(widget.property_store().is_empty());

        let err = widget
            .clear_value_erased(f.pressed.id(), &f.registry)
            .unwrap_err();
        assert_eq!(err, PropertyError::ReadOnly { name: "IsPressed" });
    }

    #[test]
    fn erased_write_rejects_wrong_type_without_mutation() {
        let f = fixture();
        let mut widget = Widget::default();
        widget.set_value(f.width, 10.0, &f.registry);

        let err = widget
            .set_value_erased(f.width.id(), ErasedValue::new(20_i32), &f.registry)
            .unwrap_err();
        assert!(matches!(
            err,
            PropertyError::TypeMismatch {
                name: "Width",
                expected: "f64",
                found: "i32"
            }
        ));
        assert_eq!(widget.get_value(f.width, &f.registry), 10.0);
        assert_eq!(widget.changes.len(), 1);
    }

    #[test]
    fn erased_write_goes_through_coercion() {
        let f = fixture();
        let mut widget = Widget::default();

        let changed = widget
            .set_value_erased(f.width.id(), ErasedValue::new(1500.0_f64), &f.registry)
            .unwrap();
        assert!(changed);
        assert_eq!(widget.get_value(f.width, &f.registry), 1000.0);
    }

    #[test]
    fn write_by_name() {
        let f = fixture();
        let mut widget = Widget::default();

        let changed = widget
            .set_value_by_name(
                OWNER,
                "Title",
                ErasedValue::new(String::from("Save")),
                &f.registry,
            )
            .unwrap();
        assert!(changed);
        assert_eq!(widget.get_value(f.title, &f.registry), "Save");

        let err = widget
            .set_value_by_name(OWNER, "Missing", ErasedValue::new(1_i32), &f.registry)
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::UnknownProperty {
                owner: OWNER,
                name: String::from("Missing"),
            }
        );
    }

    #[test]
    fn erased_read_falls_back_to_default() {
        let f = fixture();
        let mut widget = Widget::default();

        let value = widget.get_value_erased(f.width.id(), &f.registry).unwrap();
        assert_eq!(value.downcast_ref::<f64>(), Some(&0.0));

        widget.set_value(f.width, 12.0, &f.registry);
        let value = widget.get_value_erased(f.width.id(), &f.registry).unwrap();
        assert_eq!(value.downcast_ref::<f64>(), Some(&12.0));

        assert!(
            widget
                .get_value_erased(PropertyId::new(200), &f.registry)
                .is_none()
        );
    }
}
