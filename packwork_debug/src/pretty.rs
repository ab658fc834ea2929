// Copyright 2026 the Packwork Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`PackSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use packwork_core::trace::{
    AreaChangeEvent, AxisEvent, PackChildrenEvent, PackSink, PassBeginEvent, PassPhase,
    PassSummary, PhaseBeginEvent, PhaseEndEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PassPhase) -> &'static str {
    match phase {
        PassPhase::Windows => "windows",
        PassPhase::Elements => "elements",
    }
}

impl<W: Write> PackSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass] #{} windows={} elements={}",
            e.pass_index, e.windows, e.elements,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] pass={} {}",
            e.pass_index,
            phase_name(e.phase),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] pass={} {}",
            e.pass_index,
            phase_name(e.phase),
        );
    }

    fn on_pack_children(&mut self, e: &PackChildrenEvent) {
        let forced = if e.forced { " forced" } else { "" };
        let _ = writeln!(
            self.writer,
            "[pack] pass={} parent={} children={}{forced}",
            e.pass_index, e.parent, e.distributed,
        );
    }

    fn on_axis(&mut self, e: &AxisEvent) {
        let _ = writeln!(
            self.writer,
            "[axis] pass={} parent={} {} avail={} share={} extra={} small={}/{}",
            e.pass_index, e.parent, e.axis, e.available, e.share, e.extra, e.small, e.count,
        );
    }

    fn on_area_change(&mut self, e: &AreaChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[area] pass={} element={} {} -> {}",
            e.pass_index, e.element, e.old, e.new,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] pass={} windows={} elements={} parents={} changed={} deferred={}",
            s.pass_index,
            s.windows_packed,
            s.elements_packed,
            s.parents_packed,
            s.area_changes,
            s.deferred,
        );
    }
}
