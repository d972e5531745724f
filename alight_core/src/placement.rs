// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving the placement target onto sampled surfaces.

use crate::pose::Pose;
use crate::scene::PlacementTarget;

/// Repositions the target to the latest sampled pose.
///
/// Only the position is taken from the pose. The target keeps its authored
/// orientation and scale. When either input is missing the target is left
/// exactly where it was: it is never hidden or reset.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlacementController {
    placements: u64,
}

impl PlacementController {
    /// Creates a controller that has not placed anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `pose` to `target`. Returns `true` if the target moved.
    ///
    /// A pose with a non-finite position is ignored.
    pub fn update(&mut self, target: Option<&mut PlacementTarget>, pose: Option<&Pose>) -> bool {
        let (Some(target), Some(pose)) = (target, pose) else {
            return false;
        };
        if !pose.position.is_finite() {
            return false;
        }
        target.set_position(pose.position);
        self.placements += 1;
        true
    }

    /// Number of updates that moved the target.
    #[must_use]
    pub fn placements(&self) -> u64 {
        self.placements
    }
}
