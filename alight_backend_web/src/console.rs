// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace sink writing to the browser console.

use alloc::format;
use alloc::string::String;

use alight_core::trace::{
    AcquireEvent, AcquireOutcome, FrameSkippedEvent, FrameSummary, PlacementEvent, ResizeEvent,
    SessionEvent, SessionTransition, TraceSink,
};
use alight_core::viewport::ResizeOutcome;

/// Writes loop events to `console.log` / `console.warn`, one line each.
///
/// Per-frame summaries are only written when `verbose` is set; everything
/// else is rare enough to always log. Events only arrive when
/// `alight_core` is built with its `trace` feature.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleSink {
    prefix: &'static str,
    verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink prefixing every line with `prefix`.
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            verbose: false,
        }
    }

    /// Also log a summary line for every presenting frame.
    #[must_use]
    pub const fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    fn log(&self, line: &str) {
        web_sys::console::log_1(&format!("[{}] {line}", self.prefix).into());
    }

    fn warn(&self, line: &str) {
        web_sys::console::warn_1(&format!("[{}] {line}", self.prefix).into());
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new("alight")
    }
}

impl TraceSink for ConsoleSink {
    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        if self.verbose {
            self.log(&format!("frame {} skipped: no session", e.frame_index));
        }
    }

    fn on_session(&mut self, e: &SessionEvent) {
        let verb = match e.transition {
            SessionTransition::Began => "began",
            SessionTransition::Ended => "ended",
        };
        self.log(&format!("session {} {verb}", e.session.0));
    }

    fn on_acquire(&mut self, e: &AcquireEvent) {
        let session = e.session.0;
        match &e.outcome {
            AcquireOutcome::Requested => {
                self.log(&format!("session {session}: hit-test source requested"));
            }
            AcquireOutcome::Ready => self.log(&format!("session {session}: hit-test source ready")),
            AcquireOutcome::Failed(err) => {
                self.warn(&format!("session {session}: {err}; placement disabled"));
            }
            AcquireOutcome::Stale => {
                self.log(&format!("session {session}: hit-test request finished after session end"));
            }
        }
    }

    fn on_placement(&mut self, e: &PlacementEvent) {
        if self.verbose {
            let [x, y, z] = e.position.to_array();
            self.log(&format!("frame {}: placed at ({x:.3}, {y:.3}, {z:.3})", e.frame_index));
        }
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let what: String = match e.outcome {
            ResizeOutcome::Applied { aspect, .. } => format!("aspect {aspect:.3}"),
            ResizeOutcome::Ignored => "ignored".into(),
            ResizeOutcome::Degenerate => "degenerate, kept previous size".into(),
        };
        self.log(&format!("resize {}x{}: {what}", e.width, e.height));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        if self.verbose {
            self.log(&format!(
                "frame {} session {} source {:?} hit {} placed {}",
                s.frame_index, s.session.0, s.source, s.hit, s.placed
            ));
        }
    }
}
