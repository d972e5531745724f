// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-hit pose sampling.

use crate::pose::Pose;
use crate::session::{HitTestFrame, HitTestResult};

/// Extracts the first surface intersection of `frame` for `source`,
/// resolved in `space`.
///
/// Returns `None` if there is no source yet, no frame this tick, no
/// intersection, or the first intersection cannot be expressed in `space`.
/// Ranking is the host's: the first result is used as-is.
#[must_use]
pub fn sample<F: HitTestFrame>(
    frame: Option<&F>,
    source: Option<&F::Source>,
    space: &F::Space,
) -> Option<Pose> {
    let (frame, source) = (frame?, source?);
    frame
        .hit_test_results(source)
        .first()
        .and_then(|hit| hit.pose(space))
}
