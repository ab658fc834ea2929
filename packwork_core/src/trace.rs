// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for pack passes.
//!
//! This module provides a [`PackSink`] trait with per-event methods that the
//! organizer calls while draining its queues. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn PackSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Log output independent of any sink goes through the `tracing` crate.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`AxisEvent`] and
//!   [`AreaChangeEvent`] plus the corresponding `PackSink` methods.

#[cfg(feature = "trace-rich")]
use crate::geometry::{Area, Axis};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which queue of a pass is being drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassPhase {
    /// Windows, each repacked in full.
    Windows,
    /// Ordinary elements, shallowest first.
    Elements,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a pass starts, after the window queue was taken.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Windows drained from the window queue.
    pub windows: usize,
    /// Elements waiting in the ordinary queue. Observers of the window phase
    /// may add more before it is drained.
    pub elements: usize,
}

/// Marks the beginning of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is starting.
    pub phase: PassPhase,
}

/// Marks the end of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is ending.
    pub phase: PassPhase,
}

/// Emitted each time the children of one parent are distributed.
#[derive(Clone, Copy, Debug)]
pub struct PackChildrenEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Raw slot index of the parent.
    pub parent: u32,
    /// Children that took part (fill and bucketed).
    pub distributed: usize,
    /// Whether the subtree is walked unconditionally (window repack).
    pub forced: bool,
}

/// Emitted after one axis of one parent was distributed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct AxisEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Raw slot index of the parent.
    pub parent: u32,
    /// Axis of the pass.
    pub axis: Axis,
    /// Pixels available along the axis.
    pub available: u32,
    /// Final share of the non-small elements.
    pub share: u32,
    /// Remainder absorbed by the first open element.
    pub extra: u32,
    /// Number of elements clamped to their maximum.
    pub small: usize,
    /// Number of elements distributed.
    pub count: usize,
}

/// Emitted when an element's area changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct AreaChangeEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Raw slot index of the element.
    pub element: u32,
    /// Area before the pass.
    pub old: Area,
    /// Area after the pass.
    pub new: Area,
}

/// Per-pass summary emitted when a pass completes.
#[derive(Clone, Copy, Debug)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Windows repacked.
    pub windows_packed: usize,
    /// Queued elements repacked.
    pub elements_packed: usize,
    /// Parents distributed, including recursion.
    pub parents_packed: usize,
    /// Elements whose area changed.
    pub area_changes: usize,
    /// Items scheduled during the pass and left for the next one.
    pub deferred: usize,
}

// ---------------------------------------------------------------------------
// PackSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from pack passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait PackSink {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called at the beginning of a pass phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called after the children of a parent were distributed.
    fn on_pack_children(&mut self, e: &PackChildrenEvent) {
        _ = e;
    }

    /// Called after one axis was distributed (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_axis(&mut self, e: &AxisEvent) {
        _ = e;
    }

    /// Called when an element's area changed (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_area_change(&mut self, e: &AreaChangeEvent) {
        _ = e;
    }

    /// Called with the summary of a completed pass.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`PackSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl PackSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`PackSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn PackSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn PackSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn PackSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PackChildrenEvent`].
    #[inline]
    pub fn pack_children(&mut self, e: &PackChildrenEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pack_children(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AxisEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn axis(&mut self, e: &AxisEvent) {
        if let Some(s) = &mut self.sink {
            s.on_axis(e);
        }
    }

    /// Emits an [`AreaChangeEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn area_change(&mut self, e: &AreaChangeEvent) {
        if let Some(s) = &mut self.sink {
            s.on_area_change(e);
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
