//! Tilt Maze - roll a ball through a tilting maze
//!
//! Core modules:
//! - `sim`: Ball controller (rolling physics, collision response, win/lose state)
//! - `host`: Seams to the host engine (clock, collision queries, scene outputs)
//! - `maze`: Analytic flat-maze scene for headless runs and tests
//! - `tuning`: Data-driven physics constants

pub mod host;
pub mod maze;
pub mod sim;
pub mod tuning;

pub use host::{Clock, CollisionQuery, FixedClock, FrameOutcome, SceneHandle, Session};
pub use maze::{FlatMaze, MazeLayout};
pub use tuning::Tuning;

use glam::{Quat, Vec3};

/// Game configuration constants
pub mod consts {
    /// Acceleration multiplier applied to the downhill pull
    pub const ACCEL: f32 = 70.0;
    /// Maximum ball speed (units/s)
    pub const MAX_SPEED: f32 = 5.0;
    /// Frames longer than this are treated as an engine stall and skipped
    pub const STALL_DT: f32 = 0.2;

    /// Minimum alignment between wall normal and hit direction for a bounce
    pub const WALL_HIT_THRESHOLD: f32 = 0.995;
    /// Speeds below this are treated as resting (no wall reaction)
    pub const MIN_BOUNCE_SPEED: f32 = 1e-4;

    /// Ball root height above the ground contact point
    pub const GROUND_OFFSET: f32 = 0.4;

    /// Cosmetic rolling rate (degrees per unit travelled)
    pub const ROLL_SPIN_DEG: f32 = 45.5;

    /// Maze tilt at the edge of the screen (degrees)
    pub const TILT_DEG: f32 = 10.0;
    /// Largest tilt a tuning file may ask for; steeper mazes have no usable floor
    pub const MAX_TILT_DEG: f32 = 60.0;

    /// Fall animation: horizontal slide into the hole (seconds)
    pub const FALL_XY_SECS: f32 = 0.1;
    /// Fall animation: vertical drop (seconds)
    pub const FALL_Z_SECS: f32 = 0.2;
    /// How far the ball sinks into the hole
    pub const FALL_DEPTH: f32 = 0.9;
    /// Pause after the drop before the level restarts (seconds)
    pub const FALL_HOLD_SECS: f32 = 1.0;

    /// Title shown when the goal is reached
    pub const WIN_TITLE: &str = "Goal!!";
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Incremental rolling rotation about `axis` (need not be normalized)
///
/// Returns `None` when the axis is degenerate (ball at rest or moving
/// straight up/down).
#[inline]
pub fn roll_rotation(axis: Vec3, angle_deg: f32) -> Option<Quat> {
    let axis = axis.try_normalize()?;
    Some(Quat::from_axis_angle(axis, angle_deg.to_radians()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn test_roll_rotation_degenerate_axis() {
        assert!(roll_rotation(Vec3::ZERO, 30.0).is_none());
        let q = roll_rotation(Vec3::new(0.0, 2.0, 0.0), 90.0).unwrap();
        let rotated = q * Vec3::X;
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
