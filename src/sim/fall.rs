//! Fall-into-hole sequence
//!
//! Slides the ball over the hole, sinks it, holds, then asks for a restart.
//! Driven purely by accumulated time so it replays identically for the same
//! sequence of frame deltas.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::Tuning;

/// Where the fall sequence currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStage {
    /// Ball sliding over and sinking into the hole
    Falling,
    /// Ball sits in the hole
    Holding,
    /// Sequence finished; the level should restart
    Restarting,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallAnimation {
    /// Ball position when the lose trigger was hit
    pub from: Vec3,
    /// Horizontal target (trigger interior point)
    pub target_xy: Vec2,
    /// Final height after sinking
    pub target_z: f32,
    pub elapsed: f32,
}

impl FallAnimation {
    pub fn new(from: Vec3, interior: Vec3, depth: f32) -> Self {
        Self {
            from,
            target_xy: interior.truncate(),
            target_z: from.z - depth,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn stage(&self, tuning: &Tuning) -> FallStage {
        let drop_secs = tuning.fall_xy_secs.max(tuning.fall_z_secs);
        if self.elapsed < drop_secs {
            FallStage::Falling
        } else if self.elapsed < drop_secs + tuning.fall_hold_secs {
            FallStage::Holding
        } else {
            FallStage::Restarting
        }
    }

    /// Ball position at the current elapsed time
    pub fn position(&self, tuning: &Tuning) -> Vec3 {
        let t_xy = progress(self.elapsed, tuning.fall_xy_secs);
        let t_z = progress(self.elapsed, tuning.fall_z_secs);
        Vec3::new(
            lerp(self.from.x, self.target_xy.x, t_xy),
            lerp(self.from.y, self.target_xy.y, t_xy),
            lerp(self.from.z, self.target_z, t_z),
        )
    }
}

#[inline]
fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        elapsed / duration
    }
}
