// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: element identifiers, visibility and
//! layout validity.

use core::fmt;

/// Identifier for an element in an [`ElementTree`](crate::ElementTree).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// Use [`ElementTree::is_alive`](crate::ElementTree::is_alive) to check whether an
/// `ElementId` still refers to a live element. Stale ids never alias a different
/// live element because the generation must match.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}v{})", self.0, self.1)
    }
}

/// Whether an element is shown, and whether it takes part in layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Laid out, rendered and hit-testable.
    #[default]
    Visible,
    /// Laid out (keeps its space) but neither rendered nor hit.
    Hidden,
    /// Takes no space: measures and arranges to empty and is skipped by
    /// panels, rendering and hit testing.
    Collapsed,
}

bitflags::bitflags! {
    /// Layout validity of a single element.
    ///
    /// Both bits start cleared. [`ElementTree::measure`](crate::ElementTree::measure)
    /// and [`ElementTree::arrange`](crate::ElementTree::arrange) set them; the
    /// invalidation calls and property changes clear them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayoutFlags: u8 {
        /// The desired size is up to date.
        const MEASURE_VALID = 0b0000_0001;
        /// The layout rect and render size are up to date.
        const ARRANGE_VALID = 0b0000_0010;
    }
}
