// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static configuration for the placement loop and its scene.

use crate::scene::{Color, HemisphereLight};
use crate::session::ReferenceSpaceKind;

/// Perspective camera parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    /// Full vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Near clip distance in meters.
    pub near: f64,
    /// Far clip distance in meters.
    pub far: f64,
}

/// Configuration for the placement loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementConfig {
    /// Inline camera used for the initial projection and non-XR frames.
    pub camera: CameraConfig,
    /// Scene light.
    pub light: HemisphereLight,
    /// Uniform scale applied to the model when it is loaded.
    pub model_scale: f64,
    /// Where the model is fetched from.
    pub model_url: &'static str,
    /// Space hit-test rays originate in.
    pub hit_test_space: ReferenceSpaceKind,
    /// Space hit poses and views are resolved in.
    pub render_space: ReferenceSpaceKind,
    /// Edge length, in model units, of the box drawn for the target.
    pub proxy_extent: f64,
}

impl PlacementConfig {
    /// Defaults for a handheld WebXR `immersive-ar` session.
    #[must_use]
    pub const fn web_ar() -> Self {
        Self {
            camera: CameraConfig {
                fov_y_degrees: 70.0,
                near: 0.1,
                far: 100.0,
            },
            light: HemisphereLight {
                sky: Color::from_hex(0xffffff),
                ground: Color::from_hex(0xbbbbff),
                intensity: 1.0,
            },
            model_scale: 0.5,
            model_url: "/model.glb",
            hit_test_space: ReferenceSpaceKind::Viewer,
            render_space: ReferenceSpaceKind::Local,
            proxy_extent: 0.4,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self::web_ar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_ar_defaults() {
        let cfg = PlacementConfig::web_ar();
        assert_eq!(cfg.camera.fov_y_degrees, 70.0);
        assert_eq!(cfg.camera.near, 0.1);
        assert_eq!(cfg.camera.far, 100.0);
        assert_eq!(cfg.model_scale, 0.5);
        assert_eq!(cfg.hit_test_space, ReferenceSpaceKind::Viewer);
        assert_eq!(cfg.render_space, ReferenceSpaceKind::Local);
        assert_eq!(cfg.light.sky, Color::WHITE);
        assert_eq!(PlacementConfig::default(), cfg);
    }
}
