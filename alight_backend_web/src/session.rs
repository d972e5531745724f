// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebXR implementations of the host contracts.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::WebGl2RenderingContext;

use alight_core::acquire::{Delivery, Resolver};
use alight_core::error::AcquireError;
use alight_core::pose::{Pose, Quat, Vec3};
use alight_core::session::{HitTestFrame, HitTestResult, ReferenceSpaceKind, SessionId, XrSession};
use alight_core::trace::{AcquireEvent, AcquireOutcome, Tracer};

use crate::console::ConsoleSink;
use crate::sys;

/// An `immersive-ar` session as seen by the placement loop.
#[derive(Clone, Debug)]
pub struct WebXrSession {
    session: sys::Session,
    sink: ConsoleSink,
}

impl WebXrSession {
    /// Wraps a started session. Late acquisitions are reported to `sink`.
    #[must_use]
    pub fn new(session: sys::Session, sink: ConsoleSink) -> Self {
        Self { session, sink }
    }

    /// The underlying `XRSession`.
    #[must_use]
    pub fn raw(&self) -> &sys::Session {
        &self.session
    }
}

impl XrSession for WebXrSession {
    type Space = sys::ReferenceSpace;
    type Source = sys::HitTestSource;
    type Frame = sys::Frame;

    fn request_hit_test_source(
        &self,
        id: SessionId,
        space: ReferenceSpaceKind,
        resolver: Resolver<sys::HitTestSource>,
    ) {
        let session = self.session.clone();
        let mut sink = self.sink;
        wasm_bindgen_futures::spawn_local(async move {
            let result = acquire_source(&session, space)
                .await
                .map_err(|err| classify(&err));
            // An ended session may already have deactivated the source.
            let release = |source: sys::HitTestSource| {
                let _ = source.cancel();
            };
            settle(resolver, id, result, release, &mut Tracer::new(&mut sink));
        });
    }
}

/// Completes a source request through `resolver`.
///
/// A request that finishes after its session ended is traced as stale and,
/// if it produced a source, that source goes to `release`. Returns `true`
/// in that case.
fn settle<S>(
    resolver: Resolver<S>,
    id: SessionId,
    result: Result<S, AcquireError>,
    release: impl FnOnce(S),
    tracer: &mut Tracer<'_>,
) -> bool {
    let stale = match result {
        Ok(source) => match resolver.resolve(source) {
            Delivery::Delivered => false,
            Delivery::Stale(source) => {
                release(source);
                true
            }
        },
        Err(err) => !resolver.reject(err),
    };
    if stale {
        tracer.acquire(&AcquireEvent {
            session: id,
            outcome: AcquireOutcome::Stale,
        });
    }
    stale
}

/// `requestReferenceSpace(space)` followed by `requestHitTestSource`.
async fn acquire_source(
    session: &sys::Session,
    space: ReferenceSpaceKind,
) -> Result<sys::HitTestSource, JsValue> {
    let space: sys::ReferenceSpace =
        JsFuture::from(session.request_reference_space(space.as_str()))
            .await?
            .unchecked_into();
    let options = Object::new();
    Reflect::set(&options, &"space".into(), &space)?;
    let source = JsFuture::from(session.request_hit_test_source(&options)).await?;
    Ok(source.unchecked_into())
}

/// Maps a rejected WebXR promise to an [`AcquireError`].
fn classify(err: &JsValue) -> AcquireError {
    let name = Reflect::get(err, &"name".into())
        .ok()
        .and_then(|v| v.as_string());
    match name.as_deref() {
        Some("NotSupportedError") => AcquireError::Unsupported,
        Some("InvalidStateError") => AcquireError::SessionEnded,
        _ => AcquireError::Rejected(describe(err)),
    }
}

/// Best-effort message for a JS error value.
pub(crate) fn describe(err: &JsValue) -> String {
    Reflect::get(err, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

impl HitTestFrame for sys::Frame {
    type Source = sys::HitTestSource;
    type Space = sys::ReferenceSpace;
    type Hit = sys::HitTestResult;

    fn hit_test_results(&self, source: &sys::HitTestSource) -> Vec<sys::HitTestResult> {
        self.get_hit_test_results(source)
            .iter()
            .map(JsCast::unchecked_into)
            .collect()
    }
}

impl HitTestResult for sys::HitTestResult {
    type Space = sys::ReferenceSpace;

    fn pose(&self, space: &sys::ReferenceSpace) -> Option<Pose> {
        self.get_pose(space).map(|pose| pose_from_transform(&pose.transform()))
    }
}

fn pose_from_transform(transform: &sys::RigidTransform) -> Pose {
    let p = transform.position();
    let q = transform.orientation();
    Pose::new(
        Vec3::new(p.x(), p.y(), p.z()),
        Quat::from_xyzw(q.x(), q.y(), q.z(), q.w()),
    )
}

/// Everything a session needs before it can present.
#[derive(Debug)]
pub struct XrStart {
    /// The session, ready for the scheduler.
    pub session: WebXrSession,
    /// The space views and hit poses are resolved in.
    pub reference_space: sys::ReferenceSpace,
    /// The layer the renderer draws into.
    pub layer: sys::WebGlLayer,
}

/// Attaches an `XRWebGLLayer` drawing through `gl` to `session` and
/// resolves its `render_space` reference space.
///
/// `gl` must have been created with `xrCompatible: true`.
///
/// # Errors
///
/// Returns the JS error if the layer cannot be created or the reference
/// space is not available.
pub async fn start_session(
    session: sys::Session,
    gl: &WebGl2RenderingContext,
    render_space: ReferenceSpaceKind,
    sink: ConsoleSink,
) -> Result<XrStart, JsValue> {
    let layer = sys::WebGlLayer::new(&session, gl)?;
    let state = Object::new();
    Reflect::set(&state, &"baseLayer".into(), &layer)?;
    session.update_render_state(&state);

    let reference_space: sys::ReferenceSpace =
        JsFuture::from(session.request_reference_space(render_space.as_str()))
            .await?
            .unchecked_into();

    Ok(XrStart {
        session: WebXrSession::new(session, sink),
        reference_space,
        layer,
    })
}
