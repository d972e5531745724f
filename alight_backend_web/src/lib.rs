// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebXR backend for alight.
//!
//! This crate provides the browser side of the placement loop:
//!
//! - [`ArButton`]: feature detection and the "START AR" / "STOP AR" control
//! - [`WebXrSession`]: [`XrSession`] over an `XRSession`, plus
//!   [`start_session`] for the layer and reference-space bootstrap
//! - [`XrFrameLoop`]: `XRSession.requestAnimationFrame` tick source
//! - [`WebGlRenderer`]: WebGL2 [`Renderer`] and [`DrawableSurface`]
//! - [`ResizeListener`]: `window` resize events
//! - [`load_model`]: model fetch, validation and mesh decoding
//! - [`ConsoleSink`]: [`TraceSink`] writing to the browser console
//!
//! [`XrSession`]: alight_core::session::XrSession
//! [`Renderer`]: alight_core::session::Renderer
//! [`DrawableSurface`]: alight_core::viewport::DrawableSurface
//! [`TraceSink`]: alight_core::trace::TraceSink

#![no_std]

extern crate alloc;

mod asset;
mod console;
mod entry;
mod frame_loop;
mod model;
mod renderer;
mod session;
pub mod sys;
mod viewport;

pub use asset::{LoadedModel, fetch_bytes, load_model, load_model_async};
pub use console::ConsoleSink;
pub use entry::{ArButton, ArHooks, navigator_xr};
pub use frame_loop::XrFrameLoop;
pub use model::{MeshVertex, ModelMesh};
pub use renderer::WebGlRenderer;
pub use session::{WebXrSession, XrStart, start_session};
pub use viewport::{ResizeListener, window_size};

use alight_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    host_time_from_millis(frame_loop::performance_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

/// Converts a `DOMHighResTimeStamp` (milliseconds) to microsecond ticks.
pub(crate) fn host_time_from_millis(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "timestamps are small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}
