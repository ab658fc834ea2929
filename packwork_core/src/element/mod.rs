// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element tree data model.
//!
//! An *element* is a rectangular node in a retained tree. Each element has:
//!
//! - An identity ([`ElementId`]), a generational handle that becomes stale
//!   when the element is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. Child order is the tie-break order used by packing.
//! - **Layout inputs** set by the caller: [`pack_mode`](ElementStore::set_pack_mode),
//!   [`w_range`](ElementStore::set_w_range), [`h_range`](ElementStore::set_h_range),
//!   and the [`hidden`](ElementStore::set_hidden) flag.
//! - **Layout outputs** written by packing: [`area`](ElementStore::area) and
//!   [`z`](ElementStore::z).
//!
//! Elements are stored in struct-of-arrays layout with index-based handles.
//!
//! # Depth
//!
//! Every direct child sits one level deeper than its parent. Linking an
//! element into the tree restamps the depth of its whole subtree, so the
//! scheduler can order pending work shallowest-first without walking
//! ancestors.
//!
//! # Hidden state
//!
//! An element is suppressed from packing when it is hidden itself or when
//! any ancestor is. The inherited part is kept eagerly in
//! [`ElementFlags::parent_hidden`].

mod id;
mod mode;
mod store;
mod traverse;

pub use id::{ElementId, INVALID};
pub use mode::{ElementKind, PackMode};
pub use store::{ElementFlags, ElementStore};
pub use traverse::{Children, Descendants};
