// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use alight_core::time::{HostTime, Timebase};
use alight_core::trace::{
    AcquireEvent, AcquireOutcome, FrameSkippedEvent, FrameSummary, FrameTickEvent,
    PlacementEvent, RenderEvent, ResizeEvent, SessionEvent, SessionTransition, TraceSink,
};
use alight_core::viewport::ResizeOutcome;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_micros(t.ticks())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let session = e.session.map_or_else(|| "-".into(), |s| s.0.to_string());
        let _ = writeln!(
            self.writer,
            "[tick] frame={} session={session} now={:.1}µs",
            e.frame_index,
            self.host_us(e.now),
        );
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        let _ = writeln!(self.writer, "[skip] frame={} idle", e.frame_index);
    }

    fn on_session(&mut self, e: &SessionEvent) {
        let verb = match e.transition {
            SessionTransition::Began => "began",
            SessionTransition::Ended => "ended",
        };
        let _ = writeln!(self.writer, "[session] {} {verb}", e.session.0);
    }

    fn on_acquire(&mut self, e: &AcquireEvent) {
        let outcome = match &e.outcome {
            AcquireOutcome::Requested => "requested".to_string(),
            AcquireOutcome::Ready => "ready".to_string(),
            AcquireOutcome::Failed(err) => format!("FAILED ({err})"),
            AcquireOutcome::Stale => "stale, after session end".to_string(),
        };
        let _ = writeln!(self.writer, "[acquire] session={} {outcome}", e.session.0);
    }

    fn on_placement(&mut self, e: &PlacementEvent) {
        let [x, y, z] = e.position.to_array();
        let _ = writeln!(
            self.writer,
            "[place] frame={} at ({x:.3}, {y:.3}, {z:.3})",
            e.frame_index,
        );
    }

    fn on_render(&mut self, e: &RenderEvent) {
        let _ = writeln!(
            self.writer,
            "[render] frame={} {} target={}",
            e.frame_index,
            if e.xr { "xr" } else { "inline" },
            e.has_target,
        );
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let outcome = match e.outcome {
            ResizeOutcome::Applied { aspect, .. } => format!("aspect={aspect:.3}"),
            ResizeOutcome::Ignored => "ignored".to_string(),
            ResizeOutcome::Degenerate => "degenerate".to_string(),
        };
        let _ = writeln!(self.writer, "[resize] {}x{} {outcome}", e.width, e.height);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} session={} source={:?} hit={} placed={}",
            s.frame_index, s.session.0, s.source, s.hit, s.placed,
        );
    }
}
