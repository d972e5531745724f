// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contracts for platform integrations.
//!
//! Alight splits platform-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Frame source**: Calls
//!   [`FrameScheduler::on_frame`](crate::scheduler::FrameScheduler::on_frame)
//!   from the platform's XR frame callback. Not abstracted by a trait: the
//!   registration lifecycle is driven by the
//!   [`LoopCommand`](crate::scheduler::LoopCommand)s the scheduler returns.
//!
//! - **Session**: Implements [`XrSession`] so the hit-test manager can
//!   request a source without knowing about promises.
//!
//! - **Frame**: Implements [`HitTestFrame`] and [`HitTestResult`] over the
//!   platform's per-callback frame object.
//!
//! - **Renderer**: Implements [`Renderer`] and
//!   [`DrawableSurface`](crate::viewport::DrawableSurface).
//!
//! # Crate boundaries
//!
//! `alight_core` owns the data model, the state machine and these
//! contracts. Backend crates depend on `alight_core` and provide platform
//! glue. Application code depends on both and wires them together.

use alloc::vec::Vec;
use core::fmt;

use crate::acquire::Resolver;
use crate::pose::Pose;
use crate::scene::Scene;
use crate::viewport::Camera;

/// Identifies one AR session from entry to exit.
///
/// Assigned by the [`FrameScheduler`](crate::scheduler::FrameScheduler) at
/// each Idle→Presenting transition; never reused within a scheduler.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(pub u64);

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

/// The reference spaces the placement loop asks the host for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceKind {
    /// Tracks the viewer's head/device; hit-test rays originate here.
    Viewer,
    /// World-locked space near the session origin.
    Local,
    /// Like [`Local`](Self::Local) with the origin on the floor.
    LocalFloor,
}

impl ReferenceSpaceKind {
    /// The platform string for this space (`XRReferenceSpaceType`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Local => "local",
            Self::LocalFloor => "local-floor",
        }
    }
}

/// An active AR session as seen by the hit-test manager.
pub trait XrSession {
    /// Reference space handle.
    type Space;
    /// Hit-test source handle.
    type Source;
    /// Per-callback frame handle.
    type Frame: HitTestFrame<Source = Self::Source, Space = Self::Space>;

    /// Starts acquiring a hit-test source for session `id` whose rays
    /// originate in a reference space of kind `space`.
    ///
    /// Implementations obtain the reference space and then the source,
    /// completing `resolver` when both steps finish (or rejecting it when
    /// either fails). They must not block; completing `resolver`
    /// synchronously from inside this call is allowed.
    fn request_hit_test_source(
        &self,
        id: SessionId,
        space: ReferenceSpaceKind,
        resolver: Resolver<Self::Source>,
    );
}

/// A frame that can answer hit-test queries.
pub trait HitTestFrame {
    /// Hit-test source handle.
    type Source;
    /// Reference space handle.
    type Space;
    /// One ranked intersection.
    type Hit: HitTestResult<Space = Self::Space>;

    /// Returns this frame's intersections for `source`, best ranked first.
    fn hit_test_results(&self, source: &Self::Source) -> Vec<Self::Hit>;
}

/// One intersection returned by [`HitTestFrame::hit_test_results`].
pub trait HitTestResult {
    /// Reference space handle.
    type Space;

    /// Resolves this hit in `space`, or `None` if the host cannot relate
    /// the two this frame.
    fn pose(&self, space: &Self::Space) -> Option<Pose>;
}

/// XR context handed to the renderer on presenting frames.
pub struct FrameContext<'a, F: HitTestFrame> {
    /// The current frame.
    pub frame: &'a F,
    /// The session's render reference space.
    pub reference_space: &'a F::Space,
}

impl<F: HitTestFrame> fmt::Debug for FrameContext<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext").finish_non_exhaustive()
    }
}

/// Draws the scene.
///
/// Called once on every presenting tick, whatever the hit-test and
/// placement steps did.
pub trait Renderer<F: HitTestFrame> {
    /// Renders `scene` from `camera`. `xr` is `None` when the host supplied
    /// no frame for this tick; renderers fall back to the inline camera.
    fn render(&mut self, scene: &Scene, camera: &Camera, xr: Option<FrameContext<'_, F>>);
}
