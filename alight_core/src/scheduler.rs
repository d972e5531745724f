// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Idle/Presenting frame loop.
//!
//! [`FrameScheduler`] owns the per-session state (session handle, render
//! reference space, hit-test source manager) for exactly as long as the
//! session presents. The state is created at Idle→Presenting and dropped at
//! Presenting→Idle; dropping it is what turns a source request still in
//! flight into a stale one.
//!
//! Each presenting tick runs, in order:
//!
//! 1. acquisition check ([`HitTestSourceManager::ensure_requested`]),
//! 2. sampling ([`sampler::sample`]),
//! 3. placement ([`PlacementController::update`]),
//! 4. render ([`Renderer::render`]), unconditionally.
//!
//! Ticks that arrive while Idle do nothing at all.

use core::task::Poll;

use crate::config::PlacementConfig;
use crate::hit_test::{HitTestSourceManager, SourceStatus};
use crate::placement::PlacementController;
use crate::sampler;
use crate::scene::Scene;
use crate::session::{FrameContext, ReferenceSpaceKind, Renderer, SessionId, XrSession};
use crate::time::FrameTick;
use crate::trace::{
    FrameSkippedEvent, FrameSummary, FrameTickEvent, PlacementEvent, RenderEvent, SessionEvent,
    SessionTransition, Tracer,
};
use crate::viewport::Camera;

/// What the backend must do with its frame callback after a transition.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopCommand {
    /// Start delivering frame callbacks for the new session.
    Register,
    /// Stop delivering frame callbacks.
    Deregister,
    /// Leave the callback as it is.
    Keep,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No session was presenting; nothing ran.
    Skipped,
    /// The tick ran and rendered.
    Presented {
        /// The presenting session.
        session: SessionId,
        /// Source status after the acquisition check.
        source: SourceStatus,
        /// Whether a pose was sampled.
        hit: bool,
        /// Whether the target moved.
        placed: bool,
    },
}

impl FrameOutcome {
    /// Returns `true` if the target moved this tick.
    #[must_use]
    pub fn placed(&self) -> bool {
        matches!(self, Self::Presented { placed: true, .. })
    }
}

/// State that lives exactly as long as one presenting session.
struct SessionState<X: XrSession> {
    id: SessionId,
    session: X,
    reference_space: X::Space,
    hit_test: HitTestSourceManager<X::Source>,
}

enum LoopState<X: XrSession> {
    Idle,
    Presenting(SessionState<X>),
}

/// Drives the placement loop for a sequence of AR sessions.
pub struct FrameScheduler<X: XrSession> {
    state: LoopState<X>,
    hit_test_space: ReferenceSpaceKind,
    placement: PlacementController,
    next_session: u64,
}

impl<X: XrSession> FrameScheduler<X> {
    /// Creates an Idle scheduler.
    #[must_use]
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            state: LoopState::Idle,
            hit_test_space: config.hit_test_space,
            placement: PlacementController::new(),
            next_session: 1,
        }
    }

    /// Idle→Presenting.
    ///
    /// `reference_space` is the space poses and views are resolved in for
    /// the whole session. If a session is already presenting, `session` is
    /// dropped and [`LoopCommand::Keep`] is returned.
    pub fn begin_session(
        &mut self,
        session: X,
        reference_space: X::Space,
        tracer: &mut Tracer<'_>,
    ) -> LoopCommand {
        if self.is_presenting() {
            return LoopCommand::Keep;
        }
        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.state = LoopState::Presenting(SessionState {
            id,
            session,
            reference_space,
            hit_test: HitTestSourceManager::new(id),
        });
        tracer.session(&SessionEvent {
            session: id,
            transition: SessionTransition::Began,
        });
        LoopCommand::Register
    }

    /// Presenting→Idle.
    ///
    /// Drops the session state, so a source request still in flight
    /// resolves as stale and is never applied.
    pub fn end_session(&mut self, tracer: &mut Tracer<'_>) -> LoopCommand {
        match core::mem::replace(&mut self.state, LoopState::Idle) {
            LoopState::Presenting(state) => {
                tracer.session(&SessionEvent {
                    session: state.id,
                    transition: SessionTransition::Ended,
                });
                LoopCommand::Deregister
            }
            LoopState::Idle => LoopCommand::Keep,
        }
    }

    /// Returns `true` while a session is presenting.
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        matches!(self.state, LoopState::Presenting(_))
    }

    /// The presenting session's id.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        match &self.state {
            LoopState::Presenting(state) => Some(state.id),
            LoopState::Idle => None,
        }
    }

    /// The presenting session.
    #[must_use]
    pub fn session(&self) -> Option<&X> {
        match &self.state {
            LoopState::Presenting(state) => Some(&state.session),
            LoopState::Idle => None,
        }
    }

    /// The presenting session's hit-test source status.
    #[must_use]
    pub fn source_status(&self) -> Option<SourceStatus> {
        match &self.state {
            LoopState::Presenting(state) => Some(state.hit_test.status()),
            LoopState::Idle => None,
        }
    }

    /// Number of ticks, across all sessions, that moved the target.
    #[must_use]
    pub fn placements(&self) -> u64 {
        self.placement.placements()
    }

    /// Runs one display tick.
    ///
    /// `frame` is the host's per-callback frame, or `None` when the host
    /// delivered a tick without one. The scene is rendered on every
    /// presenting tick whatever the acquisition, sampling and placement
    /// steps did.
    pub fn on_frame<R>(
        &mut self,
        tick: &FrameTick,
        frame: Option<&X::Frame>,
        scene: &mut Scene,
        camera: &Camera,
        renderer: &mut R,
        tracer: &mut Tracer<'_>,
    ) -> FrameOutcome
    where
        R: Renderer<X::Frame> + ?Sized,
    {
        tracer.frame_tick(&FrameTickEvent::new(tick, self.session_id()));

        let LoopState::Presenting(state) = &mut self.state else {
            tracer.frame_skipped(&FrameSkippedEvent {
                frame_index: tick.frame_index,
                now: tick.now,
            });
            return FrameOutcome::Skipped;
        };

        let source = match state
            .hit_test
            .ensure_requested(&state.session, self.hit_test_space, tracer)
        {
            Poll::Ready(Ok(source)) => Some(source),
            Poll::Ready(Err(_)) | Poll::Pending => None,
        };
        let pose = sampler::sample(frame, source, &state.reference_space);
        let placed = self.placement.update(scene.target_mut(), pose.as_ref());
        if let (true, Some(pose)) = (placed, pose) {
            tracer.placement(&PlacementEvent {
                frame_index: tick.frame_index,
                session: state.id,
                position: pose.position,
            });
        }

        renderer.render(
            scene,
            camera,
            frame.map(|frame| FrameContext {
                frame,
                reference_space: &state.reference_space,
            }),
        );
        tracer.render(&RenderEvent {
            frame_index: tick.frame_index,
            xr: frame.is_some(),
            has_target: scene.target().is_some(),
        });

        let source = state.hit_test.status();
        tracer.frame_summary(&FrameSummary {
            frame_index: tick.frame_index,
            session: state.id,
            now: tick.now,
            source,
            hit: pose.is_some(),
            placed,
        });
        FrameOutcome::Presented {
            session: state.id,
            source,
            hit: pose.is_some(),
            placed,
        }
    }
}

impl<X: XrSession> core::fmt::Debug for FrameScheduler<X> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("session", &self.session_id())
            .field("source", &self.source_status())
            .field("hit_test_space", &self.hit_test_space)
            .field("placement", &self.placement)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::Delivery;
    use crate::error::AcquireError;
    use crate::mock::{
        MockFrame, MockHit, MockRenderer, MockSession, MockSource, MockSpace, MockSurface,
    };
    use crate::pose::Vec3;
    use crate::scene::PlacementTarget;
    use crate::time::HostTime;
    use crate::viewport::{ResizeOutcome, ViewportManager};
    use kurbo::Size;

    struct Harness {
        scheduler: FrameScheduler<MockSession>,
        scene: Scene,
        camera: Camera,
        renderer: MockRenderer,
        frame_index: u64,
    }

    impl Harness {
        fn new() -> Self {
            let config = PlacementConfig::web_ar();
            Self {
                scheduler: FrameScheduler::new(&config),
                scene: Scene::new(config.light),
                camera: Camera::new(&config.camera, 800.0 / 600.0),
                renderer: MockRenderer::new(),
                frame_index: 0,
            }
        }

        fn with_target(mut self, position: Vec3) -> Self {
            let mut target = PlacementTarget::new("model", 1.0);
            target.set_position(position);
            self.scene.set_target(target);
            self
        }

        fn begin(&mut self, session: &MockSession) -> LoopCommand {
            self.scheduler
                .begin_session(session.clone(), MockSpace::LOCAL, &mut Tracer::none())
        }

        fn end(&mut self) -> LoopCommand {
            self.scheduler.end_session(&mut Tracer::none())
        }

        fn tick(&mut self, frame: Option<&MockFrame>) -> FrameOutcome {
            self.frame_index += 1;
            let tick = FrameTick::new(HostTime(self.frame_index * 16_667), self.frame_index);
            self.scheduler.on_frame(
                &tick,
                frame,
                &mut self.scene,
                &self.camera,
                &mut self.renderer,
                &mut Tracer::none(),
            )
        }

        fn target_position(&self) -> Option<Vec3> {
            self.scene.target().map(PlacementTarget::position)
        }
    }

    fn hit_frame(position: Vec3) -> MockFrame {
        MockFrame::with_hits([MockHit::at(position)])
    }

    #[test]
    fn idle_ticks_do_nothing() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let frame = hit_frame(Vec3::ONE);
        assert_eq!(h.tick(Some(&frame)), FrameOutcome::Skipped);
        assert_eq!(h.renderer.renders(), 0);
        assert_eq!(frame.queries(), 0);
        assert_eq!(h.scheduler.session_id(), None);
    }

    #[test]
    fn transitions_drive_loop_registration() {
        let mut h = Harness::new();
        let session = MockSession::new();
        assert_eq!(h.end(), LoopCommand::Keep, "end while idle");
        assert_eq!(h.begin(&session), LoopCommand::Register);
        assert_eq!(h.begin(&MockSession::new()), LoopCommand::Keep, "begin while presenting");
        assert_eq!(h.scheduler.session_id(), Some(SessionId(1)));
        assert_eq!(h.end(), LoopCommand::Deregister);
        assert!(!h.scheduler.is_presenting());
        assert_eq!(h.begin(&session), LoopCommand::Register);
        assert_eq!(h.scheduler.session_id(), Some(SessionId(2)), "ids are not reused");
    }

    #[test]
    fn session_dropped_by_begin_is_never_used() {
        let mut h = Harness::new();
        let presenting = MockSession::new();
        let dropped = MockSession::new();
        assert_eq!(h.begin(&presenting), LoopCommand::Register);
        assert_eq!(h.begin(&dropped), LoopCommand::Keep);

        let frame = hit_frame(Vec3::ONE);
        let _ = h.tick(Some(&frame));
        let _ = h.tick(Some(&frame));
        assert_eq!(presenting.requests(), 1);
        assert_eq!(dropped.requests(), 0, "the dropped session is not acquired for");
        assert_eq!(h.scheduler.session_id(), Some(SessionId(1)));
    }

    #[test]
    fn renders_every_tick_before_the_source_resolves() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let session = MockSession::new();
        let _ = h.begin(&session);
        let frame = hit_frame(Vec3::new(2.0, 0.0, -1.0));

        for n in 1..=6 {
            let outcome = h.tick(Some(&frame));
            assert_eq!(
                outcome,
                FrameOutcome::Presented {
                    session: SessionId(1),
                    source: SourceStatus::Pending,
                    hit: false,
                    placed: false,
                }
            );
            assert_eq!(h.renderer.renders(), n);
        }
        assert_eq!(session.requests(), 1, "one request per session");
        assert_eq!(session.requested_spaces(), [ReferenceSpaceKind::Viewer]);
        assert_eq!(frame.queries(), 0, "no sampling without a source");
        assert_eq!(h.target_position(), Some(Vec3::ZERO));
        assert_eq!(h.scheduler.placements(), 0);
    }

    #[test]
    fn resolved_source_places_target_at_first_hit() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let session = MockSession::new();
        let _ = h.begin(&session);
        h.tick(None);
        assert_eq!(session.resolve_next(MockSource(4)), Some(Delivery::Delivered));

        let frame = MockFrame::with_hits([
            MockHit::at(Vec3::new(1.0, 0.2, -0.5)),
            MockHit::at(Vec3::new(5.0, 5.0, 5.0)),
        ]);
        let outcome = h.tick(Some(&frame));

        assert!(outcome.placed());
        assert_eq!(h.target_position(), Some(Vec3::new(1.0, 0.2, -0.5)));
        assert_eq!(frame.last_source(), Some(MockSource(4)));
        assert_eq!(h.renderer.renders(), 2);
        assert_eq!(
            h.renderer.positions().last(),
            Some(&Some(Vec3::new(1.0, 0.2, -0.5))),
            "render sees the placed position"
        );
    }

    #[test]
    fn zero_hits_keep_last_position_and_still_render() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let _ = h.begin(&MockSession::resolving_immediately(MockSource(1)));
        h.tick(Some(&hit_frame(Vec3::new(1.0, 0.0, 0.0))));

        let outcome = h.tick(Some(&MockFrame::empty()));
        assert_eq!(
            outcome,
            FrameOutcome::Presented {
                session: SessionId(1),
                source: SourceStatus::Ready,
                hit: false,
                placed: false,
            }
        );
        assert_eq!(h.target_position(), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(h.renderer.renders(), 2);
    }

    #[test]
    fn tick_without_frame_renders_inline() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let _ = h.begin(&MockSession::resolving_immediately(MockSource(1)));
        let outcome = h.tick(None);
        assert!(!outcome.placed());
        assert_eq!(h.renderer.renders(), 1);
        assert_eq!(h.renderer.xr_renders(), 0);
        assert_eq!(h.target_position(), Some(Vec3::ZERO));
    }

    #[test]
    fn missing_target_still_renders() {
        let mut h = Harness::new();
        let _ = h.begin(&MockSession::resolving_immediately(MockSource(1)));
        let outcome = h.tick(Some(&hit_frame(Vec3::ONE)));
        assert_eq!(
            outcome,
            FrameOutcome::Presented {
                session: SessionId(1),
                source: SourceStatus::Ready,
                hit: true,
                placed: false,
            }
        );
        assert_eq!(h.renderer.positions(), [None]);
        assert_eq!(h.renderer.xr_renders(), 1);
    }

    #[test]
    fn target_loaded_mid_session_is_placed_from_then_on() {
        let mut h = Harness::new();
        let _ = h.begin(&MockSession::resolving_immediately(MockSource(1)));
        let frame = hit_frame(Vec3::new(0.0, -1.0, -2.0));
        h.tick(Some(&frame));
        h.scene.set_target(PlacementTarget::new("late", 1.0));
        assert!(h.tick(Some(&frame)).placed());
        assert_eq!(h.target_position(), Some(Vec3::new(0.0, -1.0, -2.0)));
    }

    #[test]
    fn acquisition_failure_degrades_to_render_only() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let session = MockSession::new();
        let _ = h.begin(&session);
        h.tick(None);
        assert_eq!(session.reject_next(AcquireError::Unsupported), Some(true));

        let frame = hit_frame(Vec3::ONE);
        for _ in 0..4 {
            let outcome = h.tick(Some(&frame));
            assert!(matches!(
                outcome,
                FrameOutcome::Presented {
                    source: SourceStatus::Failed,
                    placed: false,
                    ..
                }
            ));
        }
        assert_eq!(session.requests(), 1, "no retry");
        assert_eq!(h.renderer.renders(), 5);
        assert_eq!(h.target_position(), Some(Vec3::ZERO));
    }

    #[test]
    fn late_resolution_after_session_end_is_never_applied() {
        let mut h = Harness::new().with_target(Vec3::ZERO);
        let first = MockSession::new();
        let _ = h.begin(&first);
        h.tick(None);
        assert_eq!(h.end(), LoopCommand::Deregister);

        assert_eq!(
            first.resolve_next(MockSource(1)),
            Some(Delivery::Stale(MockSource(1)))
        );

        let frame = hit_frame(Vec3::ONE);
        assert_eq!(h.tick(Some(&frame)), FrameOutcome::Skipped, "stray callback");

        let second = MockSession::new();
        let _ = h.begin(&second);
        let outcome = h.tick(Some(&frame));
        assert_eq!(
            outcome,
            FrameOutcome::Presented {
                session: SessionId(2),
                source: SourceStatus::Pending,
                hit: false,
                placed: false,
            }
        );
        assert_eq!(second.requests(), 1, "new session requests afresh");
        assert_eq!(second.requesting_sessions(), [SessionId(2)]);
        assert_eq!(frame.queries(), 0);
        assert_eq!(h.target_position(), Some(Vec3::ZERO));
        assert_eq!(h.scheduler.placements(), 0);
    }

    #[test]
    fn resize_does_not_touch_placement_state() {
        let mut h = Harness::new().with_target(Vec3::new(0.5, 0.0, -1.0));
        let session = MockSession::new();
        let _ = h.begin(&session);
        h.tick(None);

        let mut viewport = ViewportManager::new(Size::new(800.0, 600.0));
        let mut surface = MockSurface::new(Size::new(800.0, 600.0));
        let _ = viewport.register();
        let outcome = viewport.on_resize(Size::new(1920.0, 1080.0), &mut h.camera, &mut surface);
        assert!(matches!(outcome, ResizeOutcome::Applied { .. }));

        assert_eq!(h.scheduler.source_status(), Some(SourceStatus::Pending));
        assert_eq!(h.target_position(), Some(Vec3::new(0.5, 0.0, -1.0)));
        assert_eq!(session.requests(), 1);

        h.tick(None);
        assert_eq!(h.renderer.last_aspect(), Some(1920.0 / 1080.0));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn presenting_tick_emits_events_in_loop_order() {
        use crate::trace::{AcquireEvent, TraceSink};
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Order(Vec<&'static str>);
        impl TraceSink for Order {
            fn on_frame_tick(&mut self, _: &FrameTickEvent) {
                self.0.push("tick");
            }
            fn on_acquire(&mut self, _: &AcquireEvent) {
                self.0.push("acquire");
            }
            fn on_placement(&mut self, _: &PlacementEvent) {
                self.0.push("place");
            }
            fn on_render(&mut self, _: &RenderEvent) {
                self.0.push("render");
            }
            fn on_frame_summary(&mut self, _: &FrameSummary) {
                self.0.push("summary");
            }
        }

        let mut h = Harness::new().with_target(Vec3::ZERO);
        let _ = h.begin(&MockSession::resolving_immediately(MockSource(1)));
        let mut order = Order::default();
        let tick = FrameTick::new(HostTime(0), 1);
        h.scheduler.on_frame(
            &tick,
            Some(&hit_frame(Vec3::ONE)),
            &mut h.scene,
            &h.camera,
            &mut h.renderer,
            &mut Tracer::new(&mut order),
        );
        assert_eq!(
            order.0,
            ["tick", "acquire", "acquire", "place", "render", "summary"]
        );
    }
}
