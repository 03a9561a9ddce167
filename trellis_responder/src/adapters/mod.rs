// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters that feed routes from other Trellis crates.
//!
//! - `element_tree_adapter`: hit-test a `trellis_layout` element tree and
//!   route to the hit element, or route along an element's ancestry.

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
