// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-session hit-test source acquisition.
//!
//! A [`HitTestSourceManager`] belongs to exactly one session. It issues at
//! most one request to the host, no matter how many frames call
//! [`ensure_requested`](HitTestSourceManager::ensure_requested) before the
//! request resolves, and never retries after a failure.
//!
//! ```text
//! Unrequested ──ensure_requested──► Pending ──resolve──► Ready
//!                                      └──────reject───► Failed
//! ```

use core::task::Poll;

use crate::acquire::{self, Pending};
use crate::error::AcquireError;
use crate::session::{ReferenceSpaceKind, SessionId, XrSession};
use crate::trace::{AcquireEvent, AcquireOutcome, Tracer};

/// Externally visible state of the hit-test source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceStatus {
    /// No request issued yet.
    Unrequested,
    /// Request in flight.
    Pending,
    /// Source available.
    Ready,
    /// Request failed; the session will not get a source.
    Failed,
}

enum SourceState<S> {
    Unrequested,
    Pending(Pending<S>),
    Ready(S),
    Failed(AcquireError),
}

/// Owns the hit-test source for one session.
pub struct HitTestSourceManager<S> {
    session: SessionId,
    state: SourceState<S>,
}

impl<S> HitTestSourceManager<S> {
    /// Creates a manager with no request issued.
    #[must_use]
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            state: SourceState::Unrequested,
        }
    }

    /// The session this manager belongs to.
    #[must_use]
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Issues the source request if none has been issued yet, then picks up
    /// any outcome that has arrived since the last call.
    ///
    /// Never waits: a request still in flight yields `Poll::Pending`. The
    /// manager is marked as requested before the host is called, so a host
    /// that completes synchronously is observed by this same call.
    pub fn ensure_requested<X>(
        &mut self,
        session: &X,
        space: ReferenceSpaceKind,
        tracer: &mut Tracer<'_>,
    ) -> Poll<Result<&S, &AcquireError>>
    where
        X: XrSession<Source = S>,
    {
        if matches!(self.state, SourceState::Unrequested) {
            let (pending, resolver) = acquire::channel();
            self.state = SourceState::Pending(pending);
            tracer.acquire(&AcquireEvent {
                session: self.session,
                outcome: AcquireOutcome::Requested,
            });
            session.request_hit_test_source(self.session, space, resolver);
        }
        self.poll(tracer)
    }

    /// Picks up an outcome that has arrived, without issuing a request.
    pub fn poll(&mut self, tracer: &mut Tracer<'_>) -> Poll<Result<&S, &AcquireError>> {
        if let SourceState::Pending(pending) = &self.state {
            match pending.poll() {
                Poll::Ready(Ok(source)) => {
                    self.state = SourceState::Ready(source);
                    tracer.acquire(&AcquireEvent {
                        session: self.session,
                        outcome: AcquireOutcome::Ready,
                    });
                }
                Poll::Ready(Err(err)) => {
                    tracer.acquire(&AcquireEvent {
                        session: self.session,
                        outcome: AcquireOutcome::Failed(err.clone()),
                    });
                    self.state = SourceState::Failed(err);
                }
                Poll::Pending => {}
            }
        }
        match &self.state {
            SourceState::Ready(source) => Poll::Ready(Ok(source)),
            SourceState::Failed(err) => Poll::Ready(Err(err)),
            SourceState::Unrequested | SourceState::Pending(_) => Poll::Pending,
        }
    }

    /// The resolved source, if any.
    #[must_use]
    pub fn current_source(&self) -> Option<&S> {
        match &self.state {
            SourceState::Ready(source) => Some(source),
            _ => None,
        }
    }

    /// The failure, if the request failed.
    #[must_use]
    pub fn error(&self) -> Option<&AcquireError> {
        match &self.state {
            SourceState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` once a request has been issued.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        !matches!(self.state, SourceState::Unrequested)
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SourceStatus {
        match self.state {
            SourceState::Unrequested => SourceStatus::Unrequested,
            SourceState::Pending(_) => SourceStatus::Pending,
            SourceState::Ready(_) => SourceStatus::Ready,
            SourceState::Failed(_) => SourceStatus::Failed,
        }
    }
}

impl<S> core::fmt::Debug for HitTestSourceManager<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HitTestSourceManager")
            .field("session", &self.session)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockSession, MockSource};

    fn manager() -> HitTestSourceManager<MockSource> {
        HitTestSourceManager::new(SessionId(1))
    }

    #[test]
    fn starts_unrequested() {
        let m = manager();
        assert_eq!(m.status(), SourceStatus::Unrequested);
        assert!(!m.is_requested());
        assert!(m.current_source().is_none());
    }

    #[test]
    fn requests_exactly_once_across_many_frames() {
        let session = MockSession::new();
        let mut m = manager();
        for _ in 0..10 {
            let polled = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
            assert!(polled.is_pending());
        }
        assert_eq!(session.requests(), 1);
        assert_eq!(session.requested_spaces(), [ReferenceSpaceKind::Viewer]);
        assert_eq!(m.status(), SourceStatus::Pending);

        assert!(session.resolve_next(MockSource(7)).is_some());
        for _ in 0..3 {
            let polled = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
            assert_eq!(polled, Poll::Ready(Ok(&MockSource(7))));
        }
        assert_eq!(session.requests(), 1);
        assert_eq!(m.current_source(), Some(&MockSource(7)));
    }

    #[test]
    fn synchronous_completion_is_seen_by_the_requesting_call() {
        let session = MockSession::resolving_immediately(MockSource(3));
        let mut m = manager();
        let polled = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
        assert_eq!(polled, Poll::Ready(Ok(&MockSource(3))));
        assert_eq!(session.requests(), 1);
    }

    #[test]
    fn failure_is_permanent() {
        let session = MockSession::new();
        let mut m = manager();
        let _ = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
        assert_eq!(session.reject_next(AcquireError::Unsupported), Some(true));

        for _ in 0..5 {
            let polled = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
            assert_eq!(polled, Poll::Ready(Err(&AcquireError::Unsupported)));
        }
        assert_eq!(session.requests(), 1, "no retry after failure");
        assert_eq!(m.status(), SourceStatus::Failed);
        assert_eq!(m.error(), Some(&AcquireError::Unsupported));
        assert!(m.current_source().is_none());
    }

    #[test]
    fn host_dropping_the_request_fails_it() {
        let session = MockSession::new();
        let mut m = manager();
        let _ = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
        session.abandon_all();
        assert_eq!(
            m.poll(&mut Tracer::none()),
            Poll::Ready(Err(&AcquireError::Abandoned))
        );
    }

    #[test]
    fn resolution_after_manager_dropped_is_stale() {
        let session = MockSession::new();
        let mut m = manager();
        let _ = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::none());
        drop(m);
        assert_eq!(
            session.resolve_next(MockSource(9)),
            Some(acquire::Delivery::Stale(MockSource(9)))
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn acquisition_steps_are_traced() {
        use crate::trace::TraceSink;
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Steps(Vec<AcquireOutcome>);
        impl TraceSink for Steps {
            fn on_acquire(&mut self, e: &AcquireEvent) {
                self.0.push(e.outcome.clone());
            }
        }

        let session = MockSession::new();
        let mut m = manager();
        let mut steps = Steps::default();
        let _ = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::new(&mut steps));
        session.resolve_next(MockSource(1));
        let _ = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::new(&mut steps));
        let _ = m.ensure_requested(&session, ReferenceSpaceKind::Viewer, &mut Tracer::new(&mut steps));
        assert_eq!(steps.0, [AcquireOutcome::Requested, AcquireOutcome::Ready]);
    }
}
