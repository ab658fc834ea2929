// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and tree dumps for packwork diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`PackSink`](packwork_core::trace::PackSink)
//!   writing one human-readable line per event.
//! - [`tree::write_tree`]: an indented dump of an element subtree with pack
//!   modes, ranges, and areas.

pub mod pretty;
pub mod tree;
