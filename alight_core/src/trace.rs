// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the placement loop.
//!
//! [`TraceSink`] has one method per loop event, all defaulting to no-ops, so
//! a sink implements only the events it cares about.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. With the `trace`
//! feature **off**, every `Tracer` method compiles to nothing. With it
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events are emitted in loop order within a tick:
//!
//! ```text
//! frame_tick → [acquire] → [placement] → render → frame_summary
//! frame_tick → frame_skipped                          (Idle)
//! ```

use crate::error::AcquireError;
use crate::hit_test::SourceStatus;
use crate::pose::Vec3;
use crate::session::SessionId;
use crate::time::{FrameTick, HostTime};
use crate::viewport::ResizeOutcome;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Direction of a scheduler state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionTransition {
    /// Idle → Presenting.
    Began,
    /// Presenting → Idle.
    Ended,
}

/// A step in the life of a hit-test source request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The request was issued to the host.
    Requested,
    /// The source resolved and is usable from this tick on.
    Ready,
    /// The request failed; the session continues without placement.
    Failed(AcquireError),
    /// The request completed after its session ended. A late source is
    /// released instead of used.
    Stale,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the backend delivers a frame callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTickEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time of the callback.
    pub now: HostTime,
    /// The presenting session, if any.
    pub session: Option<SessionId>,
}

impl FrameTickEvent {
    /// Creates an event for `tick` observed while `session` is current.
    #[must_use]
    pub fn new(tick: &FrameTick, session: Option<SessionId>) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            session,
        }
    }
}

/// Emitted when a callback arrives while Idle and is ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSkippedEvent {
    /// Frame counter of the ignored tick.
    pub frame_index: u64,
    /// Host time of the ignored tick.
    pub now: HostTime,
}

/// Emitted on every scheduler state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionEvent {
    /// The session entering or leaving.
    pub session: SessionId,
    /// Which way.
    pub transition: SessionTransition,
}

/// Emitted when a hit-test source request is issued, resolves or fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcquireEvent {
    /// Session the request belongs to.
    pub session: SessionId,
    /// What happened.
    pub outcome: AcquireOutcome,
}

/// Emitted when the placement target moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Presenting session.
    pub session: SessionId,
    /// New target position.
    pub position: Vec3,
}

/// Emitted after each render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Whether the renderer received an XR frame context.
    pub xr: bool,
    /// Whether the scene had a placement target to draw.
    pub has_target: bool,
}

/// Emitted when the host surface is resized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    /// Requested width in CSS pixels.
    pub width: f64,
    /// Requested height in CSS pixels.
    pub height: f64,
    /// What the viewport manager did with it.
    pub outcome: ResizeOutcome,
}

impl ResizeEvent {
    /// Creates an event for a resize to `size`.
    #[must_use]
    pub fn new(size: kurbo::Size, outcome: ResizeOutcome) -> Self {
        Self {
            width: size.width,
            height: size.height,
            outcome,
        }
    }
}

/// One-line digest of a presenting tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Presenting session.
    pub session: SessionId,
    /// Host time of the tick.
    pub now: HostTime,
    /// Hit-test source status at the end of the tick.
    pub source: SourceStatus,
    /// Whether a pose was sampled.
    pub hit: bool,
    /// Whether the target moved.
    pub placed: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the placement loop.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called for every frame callback, presenting or not.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called when a callback is ignored because no session is presenting.
    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        _ = e;
    }

    /// Called on Idle↔Presenting transitions.
    fn on_session(&mut self, e: &SessionEvent) {
        _ = e;
    }

    /// Called as the hit-test source request progresses.
    fn on_acquire(&mut self, e: &AcquireEvent) {
        _ = e;
    }

    /// Called when the target is repositioned.
    fn on_placement(&mut self, e: &PlacementEvent) {
        _ = e;
    }

    /// Called after each render.
    fn on_render(&mut self, e: &RenderEvent) {
        _ = e;
    }

    /// Called on host resize.
    fn on_resize(&mut self, e: &ResizeEvent) {
        _ = e;
    }

    /// Called at the end of every presenting tick.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
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

    /// Emits a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSkippedEvent`].
    #[inline]
    pub fn frame_skipped(&mut self, e: &FrameSkippedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_skipped(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SessionEvent`].
    #[inline]
    pub fn session(&mut self, e: &SessionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AcquireEvent`].
    #[inline]
    pub fn acquire(&mut self, e: &AcquireEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_acquire(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PlacementEvent`].
    #[inline]
    pub fn placement(&mut self, e: &PlacementEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_placement(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RenderEvent`].
    #[inline]
    pub fn render(&mut self, e: &RenderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_render(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ResizeEvent`].
    #[inline]
    pub fn resize(&mut self, e: &ResizeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_resize(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}
