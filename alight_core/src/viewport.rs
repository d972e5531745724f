// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera projection and drawable-size bookkeeping.
//!
//! [`ViewportManager`] reacts to host-surface resize events. It is
//! independent of AR state: it never touches the scheduler, the hit-test
//! manager or the placement target.

use kurbo::Size;

use crate::config::CameraConfig;
use crate::transform::Transform3d;

/// Perspective camera used for inline (non-XR) rendering.
///
/// During an AR session the host supplies per-view projections and this
/// camera only determines the aspect of the drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    fov_y_degrees: f64,
    aspect: f64,
    near: f64,
    far: f64,
    projection: Transform3d,
}

impl Camera {
    /// Creates a camera for a drawable of the given aspect ratio.
    #[must_use]
    pub fn new(config: &CameraConfig, aspect: f64) -> Self {
        let mut camera = Self {
            fov_y_degrees: config.fov_y_degrees,
            aspect,
            near: config.near,
            far: config.far,
            projection: Transform3d::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Vertical field of view in degrees.
    #[must_use]
    pub fn fov_y_degrees(&self) -> f64 {
        self.fov_y_degrees
    }

    /// Sets the aspect ratio. Call [`update_projection`](Self::update_projection)
    /// afterwards.
    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
    }

    /// Recomputes the projection matrix from the current parameters.
    pub fn update_projection(&mut self) {
        self.projection = Transform3d::perspective(
            self.fov_y_degrees * (core::f64::consts::PI / 180.0),
            self.aspect,
            self.near,
            self.far,
        );
    }

    /// The current projection matrix.
    #[must_use]
    pub fn projection(&self) -> Transform3d {
        self.projection
    }
}

/// The host-managed pixel buffer the renderer draws into.
pub trait DrawableSurface {
    /// Resizes the drawable to `size` CSS pixels.
    fn set_size(&mut self, size: Size);
}

/// What a resize event did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResizeOutcome {
    /// Camera and drawable were updated.
    Applied {
        /// New drawable size.
        size: Size,
        /// New camera aspect.
        aspect: f64,
    },
    /// The manager is not registered; the event was ignored.
    Ignored,
    /// Zero or non-finite size (e.g. a minimized window); nothing changed.
    Degenerate,
}

/// Keeps the camera and the drawable consistent with the host surface.
#[derive(Clone, Copy, Debug)]
pub struct ViewportManager {
    size: Size,
    registered: bool,
}

impl ViewportManager {
    /// Creates an unregistered manager for a surface of `initial` size.
    #[must_use]
    pub fn new(initial: Size) -> Self {
        Self {
            size: initial,
            registered: false,
        }
    }

    /// Starts reacting to resize events. Returns `false` if already
    /// registered.
    pub fn register(&mut self) -> bool {
        !core::mem::replace(&mut self.registered, true)
    }

    /// Stops reacting to resize events. Returns `false` if not registered.
    pub fn deregister(&mut self) -> bool {
        core::mem::replace(&mut self.registered, false)
    }

    /// Returns `true` while registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Last applied size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Handles a host resize to `size`.
    pub fn on_resize(
        &mut self,
        size: Size,
        camera: &mut Camera,
        surface: &mut impl DrawableSurface,
    ) -> ResizeOutcome {
        if !self.registered {
            return ResizeOutcome::Ignored;
        }
        if !size.is_finite() || size.width <= 0.0 || size.height <= 0.0 {
            return ResizeOutcome::Degenerate;
        }
        let aspect = size.width / size.height;
        camera.set_aspect(aspect);
        camera.update_projection();
        surface.set_size(size);
        self.size = size;
        ResizeOutcome::Applied { size, aspect }
    }
}
