// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps every event, in
//! emission order, as a [`RecordedEvent`]. Recordings feed
//! [`chrome::export`](crate::chrome::export) and make loop behavior easy to
//! assert on in tests.

use alight_core::session::SessionId;
use alight_core::trace::{
    AcquireEvent, FrameSkippedEvent, FrameSummary, FrameTickEvent, PlacementEvent, RenderEvent,
    ResizeEvent, SessionEvent, TraceSink,
};

/// One recorded event.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`FrameSkippedEvent`].
    FrameSkipped(FrameSkippedEvent),
    /// A [`SessionEvent`].
    Session(SessionEvent),
    /// An [`AcquireEvent`].
    Acquire(AcquireEvent),
    /// A [`PlacementEvent`].
    Placement(PlacementEvent),
    /// A [`RenderEvent`].
    Render(RenderEvent),
    /// A [`ResizeEvent`].
    Resize(ResizeEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

impl RecordedEvent {
    /// Short lowercase name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FrameTick(_) => "tick",
            Self::FrameSkipped(_) => "skipped",
            Self::Session(_) => "session",
            Self::Acquire(_) => "acquire",
            Self::Placement(_) => "place",
            Self::Render(_) => "render",
            Self::Resize(_) => "resize",
            Self::FrameSummary(_) => "summary",
        }
    }

    /// Frame counter of per-tick events; `None` for session, acquire and
    /// resize events, which happen outside a tick's numbering.
    #[must_use]
    pub fn frame_index(&self) -> Option<u64> {
        match self {
            Self::FrameTick(e) => Some(e.frame_index),
            Self::FrameSkipped(e) => Some(e.frame_index),
            Self::Placement(e) => Some(e.frame_index),
            Self::Render(e) => Some(e.frame_index),
            Self::FrameSummary(s) => Some(s.frame_index),
            Self::Session(_) | Self::Acquire(_) | Self::Resize(_) => None,
        }
    }

    /// The session the event concerns, if any.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::FrameTick(e) => e.session,
            Self::Session(e) => Some(e.session),
            Self::Acquire(e) => Some(e.session),
            Self::Placement(e) => Some(e.session),
            Self::FrameSummary(s) => Some(s.session),
            Self::FrameSkipped(_) | Self::Render(_) | Self::Resize(_) => None,
        }
    }
}

/// A [`TraceSink`] that keeps every event in memory.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// The [`kind`](RecordedEvent::kind) of every event, oldest first.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(RecordedEvent::kind).collect()
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Every frame summary, oldest first.
    pub fn summaries(&self) -> impl Iterator<Item = &FrameSummary> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::FrameSummary(s) => Some(s),
            _ => None,
        })
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.events.push(RecordedEvent::FrameTick(*e));
    }

    fn on_frame_skipped(&mut self, e: &FrameSkippedEvent) {
        self.events.push(RecordedEvent::FrameSkipped(*e));
    }

    fn on_session(&mut self, e: &SessionEvent) {
        self.events.push(RecordedEvent::Session(*e));
    }

    fn on_acquire(&mut self, e: &AcquireEvent) {
        self.events.push(RecordedEvent::Acquire(e.clone()));
    }

    fn on_placement(&mut self, e: &PlacementEvent) {
        self.events.push(RecordedEvent::Placement(*e));
    }

    fn on_render(&mut self, e: &RenderEvent) {
        self.events.push(RecordedEvent::Render(*e));
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.events.push(RecordedEvent::Resize(*e));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.events.push(RecordedEvent::FrameSummary(*s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alight_core::config::PlacementConfig;
    use alight_core::error::AcquireError;
    use alight_core::hit_test::SourceStatus;
    use alight_core::mock::{
        MockFrame, MockHit, MockRenderer, MockSession, MockSource, MockSpace, MockSurface,
    };
    use alight_core::pose::Vec3;
    use alight_core::scene::{PlacementTarget, Scene};
    use alight_core::scheduler::{FrameScheduler, LoopCommand};
    use alight_core::time::{FrameTick, HostTime};
    use alight_core::trace::{AcquireOutcome, SessionTransition, Tracer};
    use alight_core::viewport::{Camera, ResizeOutcome, ViewportManager};
    use kurbo::Size;

    /// A scheduler wired to mocks, recording everything it does.
    struct Rig {
        scheduler: FrameScheduler<MockSession>,
        scene: Scene,
        camera: Camera,
        renderer: MockRenderer,
        rec: RecorderSink,
        frame_index: u64,
    }

    impl Rig {
        fn new() -> Self {
            let config = PlacementConfig::web_ar();
            let mut scene = Scene::new(config.light);
            scene.set_target(PlacementTarget::new("model", 0.4));
            Self {
                scheduler: FrameScheduler::new(&config),
                scene,
                camera: Camera::new(&config.camera, 1.0),
                renderer: MockRenderer::new(),
                rec: RecorderSink::new(),
                frame_index: 0,
            }
        }

        fn begin(&mut self, session: &MockSession) -> LoopCommand {
            self.scheduler
                .begin_session(session.clone(), MockSpace::LOCAL, &mut Tracer::new(&mut self.rec))
        }

        fn end(&mut self) -> LoopCommand {
            self.scheduler.end_session(&mut Tracer::new(&mut self.rec))
        }

        fn tick(&mut self, frame: &MockFrame) {
            self.frame_index += 1;
            let tick = FrameTick::new(HostTime(self.frame_index * 16_667), self.frame_index);
            let _ = self.scheduler.on_frame(
                &tick,
                Some(frame),
                &mut self.scene,
                &self.camera,
                &mut self.renderer,
                &mut Tracer::new(&mut self.rec),
            );
        }
    }

    #[test]
    fn records_a_session_in_loop_order() {
        let mut rig = Rig::new();
        let session = MockSession::new();
        let frame = MockFrame::with_hits([MockHit::at(Vec3::new(1.0, 0.2, -0.5))]);

        assert_eq!(rig.begin(&session), LoopCommand::Register);
        rig.tick(&frame);
        assert!(matches!(
            session.resolve_next(MockSource(1)),
            Some(alight_core::acquire::Delivery::Delivered)
        ));
        rig.tick(&frame);
        assert_eq!(rig.end(), LoopCommand::Deregister);
        rig.tick(&frame);

        assert_eq!(
            rig.rec.kinds(),
            [
                "session", // began
                "tick", "acquire", "render", "summary", // source pending
                "tick", "acquire", "place", "render", "summary", // source ready
                "session", // ended
                "tick", "skipped",
            ]
        );

        let acquires: Vec<_> = rig
            .rec
            .events()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Acquire(a) => Some(a.outcome.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(acquires, [AcquireOutcome::Requested, AcquireOutcome::Ready]);

        match rig.rec.events().last() {
            Some(RecordedEvent::FrameSkipped(e)) => assert_eq!(e.frame_index, 3),
            other => panic!("expected FrameSkipped, got {other:?}"),
        }
    }

    #[test]
    fn summaries_track_source_status() {
        let mut rig = Rig::new();
        let session = MockSession::new();
        let frame = MockFrame::with_hits([MockHit::at(Vec3::ONE)]);
        let _ = rig.begin(&session);
        rig.tick(&frame);
        let _ = session.reject_next(AcquireError::Unsupported);
        rig.tick(&frame);
        rig.tick(&frame);

        let statuses: Vec<_> = rig.rec.summaries().map(|s| (s.source, s.placed)).collect();
        assert_eq!(
            statuses,
            [
                (SourceStatus::Pending, false),
                (SourceStatus::Failed, false),
                (SourceStatus::Failed, false),
            ]
        );
        assert_eq!(rig.renderer.renders(), 3, "rendering continues after failure");
        assert!(
            rig.rec.events().iter().any(|e| matches!(
                e,
                RecordedEvent::Acquire(AcquireEvent {
                    outcome: AcquireOutcome::Failed(AcquireError::Unsupported),
                    ..
                })
            )),
            "failure is traced"
        );
    }

    #[test]
    fn session_ids_are_attached() {
        let mut rig = Rig::new();
        let session = MockSession::resolving_immediately(MockSource(9));
        let frame = MockFrame::empty();
        let _ = rig.begin(&session);
        rig.tick(&frame);
        let _ = rig.end();
        let _ = rig.begin(&session);
        rig.tick(&frame);

        let begun: Vec<_> = rig
            .rec
            .events()
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Session(s) if s.transition == SessionTransition::Began => {
                    Some(s.session)
                }
                _ => None,
            })
            .collect();
        assert_eq!(begun, [SessionId(1), SessionId(2)]);
        let ticked: Vec<_> = rig
            .rec
            .events()
            .iter()
            .filter(|e| matches!(e, RecordedEvent::FrameTick(_)))
            .map(RecordedEvent::session)
            .collect();
        assert_eq!(ticked, [Some(SessionId(1)), Some(SessionId(2))]);
    }

    #[test]
    fn resize_events_are_recorded() {
        let mut rec = RecorderSink::new();
        let mut viewport = ViewportManager::new(Size::new(800.0, 600.0));
        let mut camera = Camera::new(&PlacementConfig::web_ar().camera, 800.0 / 600.0);
        let mut surface = MockSurface::new(Size::new(800.0, 600.0));
        assert!(viewport.register(), "first registration");

        let size = Size::new(400.0, 400.0);
        let outcome = viewport.on_resize(size, &mut camera, &mut surface);
        Tracer::new(&mut rec).resize(&ResizeEvent::new(size, outcome));

        match rec.events() {
            [RecordedEvent::Resize(e)] => {
                assert_eq!(e.width, 400.0);
                assert!(
                    matches!(e.outcome, ResizeOutcome::Applied { aspect, .. } if aspect == 1.0),
                    "got {:?}",
                    e.outcome
                );
            }
            other => panic!("expected one Resize, got {other:?}"),
        }
        assert_eq!(rec.events()[0].frame_index(), None);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut rec = RecorderSink::new();
        rec.on_frame_skipped(&FrameSkippedEvent {
            frame_index: 1,
            now: HostTime(0),
        });
        assert_eq!(rec.kinds(), ["skipped"]);
        rec.clear();
        assert!(rec.events().is_empty());
    }
}
