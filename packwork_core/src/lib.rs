// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor-based packing of retained element trees.
//!
//! `packwork_core` positions and sizes a tree of rectangular elements inside
//! their parents from declarative anchoring rules ([`PackMode`]s) and a
//! min/max length per axis. Relayout is deferred and incremental: callers
//! queue the containers that changed, and one pass per tick recomputes only
//! the subtrees whose areas actually moved.
//!
//! # Architecture
//!
//! ```text
//!   caller mutates elements
//!       │
//!       ▼
//!   Organizer::schedule_pack() ──► Scheduler (windows | elements)
//!                                        │
//!                 ┌──────────────────────┘
//!                 ▼
//!   Organizer::pack_items() ──► pack_children() ──► distribute()
//!                                    │
//!                 ┌──────────────────┘
//!                 ▼
//!   changed children ──► recurse ──► AreaObserver::area_changed()
//!                                          │
//!                 ┌────────────────────────┘
//!                 ▼
//!   new work lands in the Scheduler
//! ```
//!
//! **[`element`]**: Struct-of-arrays element tree with generational handles.
//! Pack modes, size ranges, and hidden flags are set by the caller; areas and
//! depths are written by packing.
//!
//! **[`scheduler`]**: Two deduplicated queues. Windows are repacked in full;
//! ordinary elements are repacked shallowest first.
//!
//! **[`organizer`]**: The [`Organizer`] owning the store and the queues, with
//! the per-tick [`pack_items`](Organizer::pack_items) entry point.
//!
//! **[`pack`]**: Bucket partition, the vertical and horizontal passes, and
//! change propagation.
//!
//! **[`distribute`]**: The per-axis share-and-shrink algorithm.
//!
//! **[`observer`]**: The [`AreaObserver`] hook that hears about moved
//! elements.
//!
//! **[`trace`]**: [`PackSink`](trace::PackSink) trait and event types for
//! pass instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Example
//!
//! ```
//! use packwork_core::{Area, NoopObserver, Organizer, PackMode};
//!
//! let mut org = Organizer::default();
//! let win = org.elements_mut().create_window(Area::new(0, 0, 100, 100));
//! let header = org.elements_mut().create_element();
//! let body = org.elements_mut().create_element();
//! org.elements_mut().set_pack_mode(header, PackMode::Top);
//! org.elements_mut().set_pack_mode(body, PackMode::Main);
//! org.add_child(win, header);
//! org.add_child(win, body);
//!
//! let report = org.pack_items(&mut NoopObserver).unwrap();
//! assert_eq!(org.elements().area(header), Area::new(0, 0, 100, 50));
//! assert_eq!(org.elements().area(body), Area::new(0, 50, 100, 50));
//! assert_eq!(report.area_changes.len(), 2);
//! ```
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-axis and
//!   per-area-change events.
//!
//! Log records are emitted through `tracing` regardless of features.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod distribute;
pub mod element;
pub mod error;
pub mod geometry;
pub mod observer;
pub mod organizer;
pub mod pack;
pub mod scheduler;
pub mod trace;

pub use element::{ElementId, ElementKind, ElementStore, PackMode};
pub use error::{ErrorKind, PackError};
pub use geometry::{Area, Axis, SizeRange};
pub use observer::{AreaObserver, NoopObserver};
pub use organizer::{Organizer, OrganizerConfig};
pub use pack::{AreaChange, PackReport};
pub use scheduler::{DuplicatePolicy, Scheduler};
