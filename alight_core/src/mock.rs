// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host implementations for tests.
//!
//! [`MockSession`] shares its request log between clones, so a test can keep
//! one handle while the scheduler owns another, then complete or reject the
//! queued requests at any point, including after the session has ended.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Size;

use crate::acquire::{Delivery, Resolver};
use crate::error::AcquireError;
use crate::pose::{Pose, Vec3};
use crate::scene::Scene;
use crate::session::{
    FrameContext, HitTestFrame, HitTestResult, ReferenceSpaceKind, Renderer, SessionId,
    XrSession,
};
use crate::viewport::{Camera, DrawableSurface};

/// A hit-test source handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MockSource(pub u32);

/// A reference space that shifts every hit by a fixed offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MockSpace {
    offset: Vec3,
}

impl MockSpace {
    /// A space that reports hits unchanged.
    pub const LOCAL: Self = Self { offset: Vec3::ZERO };

    /// A space whose origin is displaced by `-offset`.
    #[must_use]
    pub const fn offset(offset: Vec3) -> Self {
        Self { offset }
    }
}

/// One scripted intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MockHit {
    position: Option<Vec3>,
}

impl MockHit {
    /// A hit at `position` (before space offset).
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// A hit that cannot be resolved in any space.
    #[must_use]
    pub const fn unresolvable() -> Self {
        Self { position: None }
    }
}

impl HitTestResult for MockHit {
    type Space = MockSpace;

    fn pose(&self, space: &MockSpace) -> Option<Pose> {
        self.position.map(|p| Pose::from_position(p + space.offset))
    }
}

/// A frame with a fixed list of hits.
#[derive(Debug, Default)]
pub struct MockFrame {
    hits: Vec<MockHit>,
    queries: Cell<usize>,
    last_source: Cell<Option<MockSource>>,
}

impl MockFrame {
    /// A frame with no intersections.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A frame returning `hits` in order.
    #[must_use]
    pub fn with_hits(hits: impl IntoIterator<Item = MockHit>) -> Self {
        Self {
            hits: hits.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Number of hit-test queries made against this frame.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    /// Source used by the most recent query.
    #[must_use]
    pub fn last_source(&self) -> Option<MockSource> {
        self.last_source.get()
    }
}

impl HitTestFrame for MockFrame {
    type Source = MockSource;
    type Space = MockSpace;
    type Hit = MockHit;

    fn hit_test_results(&self, source: &MockSource) -> Vec<MockHit> {
        self.queries.set(self.queries.get() + 1);
        self.last_source.set(Some(*source));
        self.hits.clone()
    }
}

#[derive(Debug, Default)]
struct MockHost {
    requested: Vec<(SessionId, ReferenceSpaceKind)>,
    queue: VecDeque<Resolver<MockSource>>,
    immediate: Option<MockSource>,
}

/// A session whose source requests are completed by the test.
#[derive(Clone, Debug, Default)]
pub struct MockSession {
    host: Rc<RefCell<MockHost>>,
}

impl MockSession {
    /// A session that queues every request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that resolves every request with `source` before
    /// returning from the request call.
    #[must_use]
    pub fn resolving_immediately(source: MockSource) -> Self {
        let session = Self::default();
        session.host.borrow_mut().immediate = Some(source);
        session
    }

    /// Total requests received.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.host.borrow().requested.len()
    }

    /// Spaces named by each request, in order.
    #[must_use]
    pub fn requested_spaces(&self) -> Vec<ReferenceSpaceKind> {
        self.host.borrow().requested.iter().map(|&(_, s)| s).collect()
    }

    /// Sessions named by each request, in order.
    #[must_use]
    pub fn requesting_sessions(&self) -> Vec<SessionId> {
        self.host.borrow().requested.iter().map(|&(id, _)| id).collect()
    }

    /// Completes the oldest queued request. `None` if nothing is queued.
    pub fn resolve_next(&self, source: MockSource) -> Option<Delivery<MockSource>> {
        let resolver = self.host.borrow_mut().queue.pop_front()?;
        Some(resolver.resolve(source))
    }

    /// Fails the oldest queued request. `None` if nothing is queued;
    /// otherwise whether anyone was still listening.
    pub fn reject_next(&self, err: AcquireError) -> Option<bool> {
        let resolver = self.host.borrow_mut().queue.pop_front()?;
        Some(resolver.reject(err))
    }

    /// Drops every queued request without completing it.
    pub fn abandon_all(&self) {
        let queue = core::mem::take(&mut self.host.borrow_mut().queue);
        drop(queue);
    }
}

impl XrSession for MockSession {
    type Space = MockSpace;
    type Source = MockSource;
    type Frame = MockFrame;

    fn request_hit_test_source(
        &self,
        id: SessionId,
        space: ReferenceSpaceKind,
        resolver: Resolver<MockSource>,
    ) {
        let immediate = {
            let mut host = self.host.borrow_mut();
            host.requested.push((id, space));
            host.immediate
        };
        match immediate {
            Some(source) => {
                let _ = resolver.resolve(source);
            }
            None => self.host.borrow_mut().queue.push_back(resolver),
        }
    }
}

/// A renderer that records what it was asked to draw.
#[derive(Clone, Debug, Default)]
pub struct MockRenderer {
    renders: usize,
    xr_renders: usize,
    positions: Vec<Option<Vec3>>,
    last_aspect: Option<f64>,
}

impl MockRenderer {
    /// Creates a renderer with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total render calls.
    #[must_use]
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Render calls that carried an XR frame context.
    #[must_use]
    pub fn xr_renders(&self) -> usize {
        self.xr_renders
    }

    /// Target position seen by each render call, `None` while unloaded.
    #[must_use]
    pub fn positions(&self) -> &[Option<Vec3>] {
        &self.positions
    }

    /// Camera aspect seen by the most recent render.
    #[must_use]
    pub fn last_aspect(&self) -> Option<f64> {
        self.last_aspect
    }
}

impl Renderer<MockFrame> for MockRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera, xr: Option<FrameContext<'_, MockFrame>>) {
        self.renders += 1;
        if xr.is_some() {
            self.xr_renders += 1;
        }
        self.positions.push(scene.target().map(|t| t.position()));
        self.last_aspect = Some(camera.aspect());
    }
}

/// A drawable surface that records resizes.
#[derive(Clone, Copy, Debug)]
pub struct MockSurface {
    size: Size,
    resizes: usize,
}

impl MockSurface {
    /// A surface of `size` that has not been resized.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self { size, resizes: 0 }
    }

    /// Current size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Number of resizes applied.
    #[must_use]
    pub const fn resizes(&self) -> usize {
        self.resizes
    }
}

impl DrawableSurface for MockSurface {
    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.resizes += 1;
    }
}
