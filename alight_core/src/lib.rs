// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core state machine and data model for AR hit-test placement.
//!
//! `alight_core` owns everything about the placement loop that does not
//! touch a platform API. It is `no_std` compatible (with `alloc`); platform
//! glue lives in backend crates that implement the host contracts in
//! [`session`].
//!
//! # Architecture
//!
//! One display tick flows through the pieces in a fixed order:
//!
//! ```text
//!   Backend (XR frame callback)
//!       │
//!       ▼
//!   FrameTick ──► FrameScheduler::on_frame()
//!                     │
//!                     ├─► HitTestSourceManager::ensure_requested()  (once per session)
//!                     ├─► sampler::sample()                          (first hit → Pose)
//!                     ├─► PlacementController::update()              (Pose → target)
//!                     └─► Renderer::render()                         (every presenting tick)
//!
//!   resize event ──► ViewportManager::on_resize() ──► Camera + DrawableSurface
//! ```
//!
//! **[`scheduler`]**: Idle/Presenting state machine. Session transitions
//! return a [`LoopCommand`](scheduler::LoopCommand) telling the backend to
//! register or deregister its frame callback.
//!
//! **[`hit_test`]**: One-shot acquisition of the hit-test source for the
//! current session, built on the [`acquire`] pending/resolver pair.
//!
//! **[`sampler`]** and **[`placement`]**: Pure per-frame steps turning hit
//! results into a target position.
//!
//! **[`viewport`]**: Camera projection and drawable-size bookkeeping on
//! resize.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! loop instrumentation, with the zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `test-helpers` (disabled by default): Exposes the [`mock`] host
//!   implementations used by tests in this and downstream crates.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod acquire;
pub mod asset;
pub mod config;
pub mod error;
pub mod hit_test;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod placement;
pub mod pose;
pub mod sampler;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod time;
pub mod trace;
pub mod transform;
pub mod viewport;
