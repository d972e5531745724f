// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw WebXR bindings.
//!
//! Only the slice of the WebXR Device API and the WebXR Hit Test Module the
//! placement loop touches. Declared here rather than taken from `web-sys`,
//! whose WebXR types sit behind an unstable-API cfg.

use js_sys::{Array, Float32Array, Function, Object, Promise};
use wasm_bindgen::prelude::*;
use web_sys::{DomPointReadOnly, EventTarget, WebGl2RenderingContext, WebGlFramebuffer};

#[wasm_bindgen]
extern "C" {
    /// `navigator.xr`.
    #[wasm_bindgen(extends = EventTarget, extends = Object, js_name = XRSystem)]
    #[derive(Debug, Clone)]
    pub type System;

    /// Resolves to `true` if `mode` can be requested on this device.
    #[wasm_bindgen(method, js_name = isSessionSupported)]
    pub fn is_session_supported(this: &System, mode: &str) -> Promise;

    /// Resolves to a [`Session`]. Must be called from a user gesture.
    #[wasm_bindgen(method, js_name = requestSession)]
    pub fn request_session(this: &System, mode: &str, options: &Object) -> Promise;

    /// `XRSession`.
    #[wasm_bindgen(extends = EventTarget, extends = Object, js_name = XRSession)]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub type Session;

    /// Resolves to a [`ReferenceSpace`] of the given `XRReferenceSpaceType`.
    #[wasm_bindgen(method, js_name = requestReferenceSpace)]
    pub fn request_reference_space(this: &Session, kind: &str) -> Promise;

    /// Resolves to a [`HitTestSource`]. `options` is an
    /// `XRHitTestOptionsInit` dictionary.
    #[wasm_bindgen(method, js_name = requestHitTestSource)]
    pub fn request_hit_test_source(this: &Session, options: &Object) -> Promise;

    /// Schedules `callback(time, frame)` for the session's next frame.
    #[wasm_bindgen(method, js_name = requestAnimationFrame)]
    pub fn request_animation_frame(this: &Session, callback: &Function) -> u32;

    /// Cancels a callback scheduled with
    /// [`request_animation_frame`](Session::request_animation_frame).
    #[wasm_bindgen(method, js_name = cancelAnimationFrame)]
    pub fn cancel_animation_frame(this: &Session, handle: u32);

    /// Ends the session; fires `end` on the session.
    #[wasm_bindgen(method)]
    pub fn end(this: &Session) -> Promise;

    /// Replaces parts of the session's render state.
    #[wasm_bindgen(method, js_name = updateRenderState)]
    pub fn update_render_state(this: &Session, state: &Object);

    /// `XRReferenceSpace`.
    #[wasm_bindgen(extends = EventTarget, extends = Object, js_name = XRReferenceSpace)]
    #[derive(Debug, Clone)]
    pub type ReferenceSpace;

    /// `XRHitTestSource`.
    #[wasm_bindgen(extends = Object, js_name = XRHitTestSource)]
    #[derive(Debug, Clone)]
    pub type HitTestSource;

    /// Unsubscribes the source; it yields no further results. Throws
    /// `InvalidStateError` if the source is no longer active.
    #[wasm_bindgen(method, catch)]
    pub fn cancel(this: &HitTestSource) -> Result<(), JsValue>;

    /// `XRFrame`. Only valid during the callback it was passed to.
    #[wasm_bindgen(extends = Object, js_name = XRFrame)]
    #[derive(Debug, Clone)]
    pub type Frame;

    /// This frame's intersections for `source`, best first.
    #[wasm_bindgen(method, js_name = getHitTestResults)]
    pub fn get_hit_test_results(this: &Frame, source: &HitTestSource) -> Array;

    /// The viewer's pose in `space`, if tracked.
    #[wasm_bindgen(method, js_name = getViewerPose)]
    pub fn get_viewer_pose(this: &Frame, space: &ReferenceSpace) -> Option<ViewerPose>;

    /// `XRHitTestResult`.
    #[wasm_bindgen(extends = Object, js_name = XRHitTestResult)]
    #[derive(Debug, Clone)]
    pub type HitTestResult;

    /// The intersection's pose in `space`, if the two can be related.
    #[wasm_bindgen(method, js_name = getPose)]
    pub fn get_pose(this: &HitTestResult, space: &ReferenceSpace) -> Option<Pose>;

    /// `XRPose`.
    #[wasm_bindgen(extends = Object, js_name = XRPose)]
    #[derive(Debug, Clone)]
    pub type Pose;

    /// Position and orientation.
    #[wasm_bindgen(method, getter)]
    pub fn transform(this: &Pose) -> RigidTransform;

    /// `XRViewerPose`.
    #[wasm_bindgen(extends = Pose, extends = Object, js_name = XRViewerPose)]
    #[derive(Debug, Clone)]
    pub type ViewerPose;

    /// One [`View`] per eye or screen.
    #[wasm_bindgen(method, getter)]
    pub fn views(this: &ViewerPose) -> Array;

    /// `XRView`.
    #[wasm_bindgen(extends = Object, js_name = XRView)]
    #[derive(Debug, Clone)]
    pub type View;

    /// Column-major projection matrix.
    #[wasm_bindgen(method, getter, js_name = projectionMatrix)]
    pub fn projection_matrix(this: &View) -> Float32Array;

    /// Pose of the view in the reference space.
    #[wasm_bindgen(method, getter)]
    pub fn transform(this: &View) -> RigidTransform;

    /// `XRRigidTransform`.
    #[wasm_bindgen(extends = Object, js_name = XRRigidTransform)]
    #[derive(Debug, Clone)]
    pub type RigidTransform;

    /// Translation, `w = 1`.
    #[wasm_bindgen(method, getter)]
    pub fn position(this: &RigidTransform) -> DomPointReadOnly;

    /// Unit quaternion.
    #[wasm_bindgen(method, getter)]
    pub fn orientation(this: &RigidTransform) -> DomPointReadOnly;

    /// Column-major 4×4 matrix.
    #[wasm_bindgen(method, getter)]
    pub fn matrix(this: &RigidTransform) -> Float32Array;

    /// The inverse transform.
    #[wasm_bindgen(method, getter)]
    pub fn inverse(this: &RigidTransform) -> RigidTransform;

    /// `XRWebGLLayer`.
    #[wasm_bindgen(extends = Object, js_name = XRWebGLLayer)]
    #[derive(Debug, Clone)]
    pub type WebGlLayer;

    /// Creates a layer for `session` drawing through `context`, which must
    /// be XR compatible.
    #[wasm_bindgen(constructor, catch, js_class = "XRWebGLLayer")]
    pub fn new(session: &Session, context: &WebGl2RenderingContext) -> Result<WebGlLayer, JsValue>;

    /// The opaque framebuffer to draw into while presenting.
    #[wasm_bindgen(method, getter)]
    pub fn framebuffer(this: &WebGlLayer) -> Option<WebGlFramebuffer>;

    /// The pixel rectangle of `view` within the framebuffer.
    #[wasm_bindgen(method, js_name = getViewport)]
    pub fn get_viewport(this: &WebGlLayer, view: &View) -> Option<Viewport>;

    /// `XRViewport`.
    #[wasm_bindgen(extends = Object, js_name = XRViewport)]
    #[derive(Debug, Clone)]
    pub type Viewport;

    /// Left edge in pixels.
    #[wasm_bindgen(method, getter)]
    pub fn x(this: &Viewport) -> i32;

    /// Bottom edge in pixels.
    #[wasm_bindgen(method, getter)]
    pub fn y(this: &Viewport) -> i32;

    /// Width in pixels.
    #[wasm_bindgen(method, getter)]
    pub fn width(this: &Viewport) -> i32;

    /// Height in pixels.
    #[wasm_bindgen(method, getter)]
    pub fn height(this: &Viewport) -> i32;
}
