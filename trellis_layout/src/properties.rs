// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties every element carries.

use trellis_property::{
    OwnerType, Property, PropertyFlags, PropertyMetadataBuilder, PropertyRegistry,
};

use crate::types::Visibility;

/// Handles for the properties the element tree itself reads.
///
/// Register them once into the registry that will be shared with the
/// [`ElementTree`](crate::ElementTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutProperties {
    /// `Element.Visibility`, default [`Visibility::Visible`]. Changes
    /// invalidate measure and arrange.
    pub visibility: Property<Visibility>,
}

impl LayoutProperties {
    /// The owner the layout properties are registered on.
    pub const OWNER: OwnerType = OwnerType::named("Element");

    /// Registers the layout properties.
    ///
    /// # Panics
    ///
    /// Panics if they were already registered in `registry`.
    pub fn register(registry: &mut PropertyRegistry) -> Self {
        let visibility = registry.register(
            Self::OWNER,
            "Visibility",
            PropertyMetadataBuilder::new(Visibility::Visible)
                .flags(PropertyFlags::AFFECTS_MEASURE | PropertyFlags::AFFECTS_ARRANGE)
                .build(),
        );
        Self { visibility }
    }

    /// Looks the layout properties up in a registry they were registered in.
    #[must_use]
    pub fn find(registry: &PropertyRegistry) -> Option<Self> {
        let id = registry.find(Self::OWNER, "Visibility")?;
        registry.metadata_by_id::<Visibility>(id)?;
        Some(Self {
            visibility: Property::from_id(id),
        })
    }
}
