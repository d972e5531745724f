// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: one light and at most one placement target.
//!
//! The target is written once by the asset loader (via
//! [`Scene::set_target`]) and afterwards only moved by the
//! [`PlacementController`](crate::placement::PlacementController).

use alloc::string::String;

use crate::asset::AssetInfo;
use crate::config::PlacementConfig;
use crate::pose::{Quat, Vec3};
use crate::transform::Transform3d;

/// Linear RGB color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red, `0.0..=1.0`.
    pub r: f32,
    /// Green, `0.0..=1.0`.
    pub g: f32,
    /// Blue, `0.0..=1.0`.
    pub b: f32,
}

impl Color {
    /// White.
    pub const WHITE: Self = Self::from_hex(0xffffff);

    /// Creates a color from `0xRRGGBB`.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Returns `[r, g, b]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Sky/ground gradient light.
///
/// Surfaces facing up receive `sky`, surfaces facing down receive
/// `ground`, blended by the normal's vertical component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    /// Color from above.
    pub sky: Color,
    /// Color from below.
    pub ground: Color,
    /// Scalar multiplier.
    pub intensity: f32,
}

/// The loaded model being positioned on detected surfaces.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementTarget {
    name: String,
    position: Vec3,
    orientation: Quat,
    scale: Vec3,
    extent: f64,
    asset: Option<AssetInfo>,
}

impl PlacementTarget {
    /// Creates a target at the origin with unit scale.
    ///
    /// `extent` is the edge length, in model units, of the box renderers
    /// draw while no model geometry is available.
    #[must_use]
    pub fn new(name: impl Into<String>, extent: f64) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
            extent,
            asset: None,
        }
    }

    /// Creates a target for a loaded asset, with the configured authored
    /// scale applied.
    #[must_use]
    pub fn from_asset(name: impl Into<String>, asset: AssetInfo, config: &PlacementConfig) -> Self {
        let mut target = Self::new(name, config.proxy_extent);
        target.scale = Vec3::splat(config.model_scale);
        target.asset = Some(asset);
        target
    }

    /// Human-readable name (usually the asset URL).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position in the session's render space.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the target.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Authored orientation; placement never changes it.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Authored scale; placement never changes it.
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Edge length of the stand-in box, before scale.
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Header information of the loaded asset, if any.
    #[must_use]
    pub fn asset(&self) -> Option<&AssetInfo> {
        self.asset.as_ref()
    }

    /// Object-to-world transform.
    #[must_use]
    pub fn model_matrix(&self) -> Transform3d {
        Transform3d::from_trs(self.position, self.orientation, self.scale)
    }
}

/// Everything the renderer draws.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    light: HemisphereLight,
    target: Option<PlacementTarget>,
}

impl Scene {
    /// Creates an empty scene lit by `light`.
    #[must_use]
    pub fn new(light: HemisphereLight) -> Self {
        Self {
            light,
            target: None,
        }
    }

    /// The scene light.
    #[must_use]
    pub fn light(&self) -> &HemisphereLight {
        &self.light
    }

    /// The placement target, once loaded.
    #[must_use]
    pub fn target(&self) -> Option<&PlacementTarget> {
        self.target.as_ref()
    }

    /// Mutable access to the placement target, once loaded.
    pub fn target_mut(&mut self) -> Option<&mut PlacementTarget> {
        self.target.as_mut()
    }

    /// Installs the loaded target. Returns the previous one, if any.
    pub fn set_target(&mut self, target: PlacementTarget) -> Option<PlacementTarget> {
        self.target.replace(target)
    }
}
