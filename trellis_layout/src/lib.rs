// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: elements, panels and the measure/arrange protocol.
//!
//! ## Overview
//!
//! An [`ElementTree`] owns elements addressed by generational [`ElementId`]s.
//! Each element carries a [`PropertyStore`](trellis_property::PropertyStore)
//! (it is a [`DependencyObject`](trellis_property::DependencyObject)), layout
//! state, an optional parent and, for panels, an ordered child collection.
//! What an element does during layout is supplied by its [`ElementBehavior`].
//!
//! ## Layout protocol
//!
//! - [`ElementTree::measure`] computes a desired size from an available size.
//! - [`ElementTree::arrange`] assigns a final rect, in the parent's
//!   coordinates, and records the resulting render size.
//! - [`Visibility::Collapsed`] elements measure and arrange to empty without
//!   running their behavior.
//! - Invalidation is local to the element concerned; [`ElementTree::update_layout`]
//!   re-runs layout from a root when anything beneath it is invalid.
//!
//! [`Panel`] is the container behavior: it measures its children with its own
//! available size and delegates the rest to a [`PanelLayout`]. Child
//! collection changes ([`ElementTree::insert_child`] and friends) fire exactly
//! one hook per mutation and keep each child's parent link pointing at the
//! one panel that contains it.
//!
//! ## Hit testing
//!
//! [`ElementTree::hit_test`] returns the topmost visible element under a
//! point, testing later children first. [`ElementTree::hit_test_path`] also
//! returns the root-to-target path used for event routing.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use kurbo::{Point, Size};
//! use trellis_layout::{BaseElement, ElementTree, LayoutProperties, Panel, Visibility};
//! use trellis_property::PropertyRegistry;
//!
//! let mut registry = PropertyRegistry::new();
//! let properties = LayoutProperties::register(&mut registry);
//! let mut tree = ElementTree::new(Arc::new(registry), properties);
//!
//! let root = tree.insert(Panel::new());
//! let button = tree.insert(BaseElement);
//! tree.push_child(root, button).unwrap();
//!
//! assert!(tree.update_layout(root, Size::new(100.0, 40.0)).unwrap());
//! // A base element wants no space, so nothing is hit yet.
//! assert_eq!(tree.hit_test(Some(root), Point::new(5.0, 5.0)), None);
//!
//! // Collapsing a child drops its layout and schedules a pass for its panel.
//! tree.set_visibility(button, Visibility::Collapsed).unwrap();
//! assert_eq!(tree.render_size(button), Some(Size::ZERO));
//! assert!(tree.needs_layout(root));
//! assert!(tree.update_layout(root, Size::new(100.0, 40.0)).unwrap());
//! assert!(!tree.needs_layout(root));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cx;
mod element;
mod error;
mod hit;
mod panel;
mod properties;
mod tree;
mod types;

pub use cx::LayoutCx;
pub use element::{BaseElement, Element, ElementBehavior};
pub use error::{HitTestError, LayoutError};
pub use hit::HitPath;
pub use panel::{BasePanelLayout, Panel, PanelLayout};
pub use properties::LayoutProperties;
pub use tree::ElementTree;
pub use types::{ElementId, LayoutFlags, Visibility};
