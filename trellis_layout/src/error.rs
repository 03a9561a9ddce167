// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the element tree.

use core::fmt;

use trellis_property::PropertyError;

use crate::types::ElementId;

/// Error returned by tree mutations and property writes through the tree.
///
/// Every check runs before anything is mutated, so a failed call leaves the
/// tree exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The id does not refer to a live element.
    StaleElement(ElementId),
    /// The element does not own a child collection.
    NotAPanel(ElementId),
    /// The child already belongs to a panel and must be removed first.
    AlreadyParented {
        /// The element that was to be inserted.
        child: ElementId,
        /// Its current parent.
        parent: ElementId,
    },
    /// Inserting the child would make an element its own ancestor.
    WouldCreateCycle {
        /// The panel being inserted into.
        panel: ElementId,
        /// The element that was to be inserted.
        child: ElementId,
    },
    /// The index is outside the child collection.
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of children.
        len: usize,
    },
    /// A property write was rejected.
    Property(PropertyError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleElement(id) => write!(f, "element {id:?} is not alive"),
            Self::NotAPanel(id) => write!(f, "element {id:?} cannot have children"),
            Self::AlreadyParented { child, parent } => {
                write!(f, "element {child:?} already belongs to {parent:?}")
            }
            Self::WouldCreateCycle { panel, child } => {
                write!(f, "inserting {child:?} into {panel:?} would create a cycle")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "child index {index} out of bounds for {len} children")
            }
            Self::Property(err) => write!(f, "property write rejected: {err}"),
        }
    }
}

impl core::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Property(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PropertyError> for LayoutError {
    fn from(err: PropertyError) -> Self {
        Self::Property(err)
    }
}

/// Internal failure during hit testing.
///
/// Returned by [`ElementTree::try_hit_test_path`](crate::ElementTree::try_hit_test_path)
/// so that a broken tree can be told apart from a point that is simply outside
/// every element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTestError {
    /// The traversal reached an id that is not alive.
    StaleElement(ElementId),
    /// A child listed by `parent` does not point back at it.
    BrokenParentLink {
        /// The element whose child list was walked.
        parent: ElementId,
        /// The child with the inconsistent parent link.
        child: ElementId,
    },
}

impl fmt::Display for HitTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleElement(id) => write!(f, "hit test reached stale element {id:?}"),
            Self::BrokenParentLink { parent, child } => {
                write!(f, "child {child:?} of {parent:?} has a different parent")
            }
        }
    }
}

impl core::error::Error for HitTestError {}
