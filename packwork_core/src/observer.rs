// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Area-change notification.
//!
//! Packing itself only writes areas. Everything that reacts to an element
//! moving or resizing (texture invalidation, scroll-bar sync, hit-test
//! updates) lives outside this crate and is reached through
//! [`AreaObserver`].
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(organizer: &mut Organizer, renderer: &mut Renderer) -> Result<(), PackError> {
//!     // Input handlers mutate elements and call `organizer.request_pack(..)`.
//!     dispatch_input(organizer);
//!
//!     // Pack: drain both queues, distribute, notify.
//!     let report = organizer.pack_items(renderer)?;
//!
//!     // Draw: only what moved needs a fresh texture.
//!     if let Some(damage) = report.damage() {
//!         renderer.redraw(damage);
//!     }
//!     Ok(())
//! }
//! ```

use crate::element::ElementId;
use crate::geometry::Area;
use crate::organizer::Organizer;

/// Receives area changes produced by a pack pass.
///
/// The observer gets mutable access to the [`Organizer`], so it may adjust
/// elements or schedule further packing. Ordinary elements scheduled while
/// windows are being packed are handled later in the same pass; everything
/// else is deferred to the next [`pack_items`](Organizer::pack_items) call.
/// Scheduling an element that is still pending has no effect.
pub trait AreaObserver {
    /// Called after `element` was moved or resized and its own children were
    /// repacked. `old_area` is the area it had before the pass.
    fn area_changed(&mut self, organizer: &mut Organizer, element: ElementId, old_area: Area);
}

/// An [`AreaObserver`] that ignores every change.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl AreaObserver for NoopObserver {
    fn area_changed(&mut self, organizer: &mut Organizer, element: ElementId, old_area: Area) {
        _ = (organizer, element, old_area);
    }
}

impl<F> AreaObserver for F
where
    F: FnMut(&mut Organizer, ElementId, Area),
{
    fn area_changed(&mut self, organizer: &mut Organizer, element: ElementId, old_area: Area) {
        self(organizer, element, old_area);
    }
}
