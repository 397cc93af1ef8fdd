//! Data-driven physics tuning
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! tuning file only needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

fn default_accel() -> f32 {
    ACCEL
}
fn default_max_speed() -> f32 {
    MAX_SPEED
}
fn default_stall_dt() -> f32 {
    STALL_DT
}
fn default_wall_hit_threshold() -> f32 {
    WALL_HIT_THRESHOLD
}
fn default_min_bounce_speed() -> f32 {
    MIN_BOUNCE_SPEED
}
fn default_ground_offset() -> f32 {
    GROUND_OFFSET
}
fn default_roll_spin_deg() -> f32 {
    ROLL_SPIN_DEG
}
fn default_tilt_deg() -> f32 {
    TILT_DEG
}
fn default_fall_xy_secs() -> f32 {
    FALL_XY_SECS
}
fn default_fall_z_secs() -> f32 {
    FALL_Z_SECS
}
fn default_fall_depth() -> f32 {
    FALL_DEPTH
}
fn default_fall_hold_secs() -> f32 {
    FALL_HOLD_SECS
}
fn default_win_title() -> String {
    WIN_TITLE.to_string()
}

/// Tunable physics and presentation values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    #[serde(default = "default_accel")]
    pub accel: f32,
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,
    /// Frames with a longer delta are skipped entirely
    #[serde(default = "default_stall_dt")]
    pub stall_dt: f32,
    #[serde(default = "default_wall_hit_threshold")]
    pub wall_hit_threshold: f32,
    #[serde(default = "default_min_bounce_speed")]
    pub min_bounce_speed: f32,
    #[serde(default = "default_ground_offset")]
    pub ground_offset: f32,
    #[serde(default = "default_roll_spin_deg")]
    pub roll_spin_deg: f32,
    #[serde(default = "default_tilt_deg")]
    pub tilt_deg: f32,
    #[serde(default = "default_fall_xy_secs")]
    pub fall_xy_secs: f32,
    #[serde(default = "default_fall_z_secs")]
    pub fall_z_secs: f32,
    #[serde(default = "default_fall_depth")]
    pub fall_depth: f32,
    #[serde(default = "default_fall_hold_secs")]
    pub fall_hold_secs: f32,
    #[serde(default = "default_win_title")]
    pub win_title: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            accel: ACCEL,
            max_speed: MAX_SPEED,
            stall_dt: STALL_DT,
            wall_hit_threshold: WALL_HIT_THRESHOLD,
            min_bounce_speed: MIN_BOUNCE_SPEED,
            ground_offset: GROUND_OFFSET,
            roll_spin_deg: ROLL_SPIN_DEG,
            tilt_deg: TILT_DEG,
            fall_xy_secs: FALL_XY_SECS,
            fall_z_secs: FALL_Z_SECS,
            fall_depth: FALL_DEPTH,
            fall_hold_secs: FALL_HOLD_SECS,
            win_title: WIN_TITLE.to_string(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        let tilt = self.tilt_deg.clamp(0.0, MAX_TILT_DEG);
        if tilt != self.tilt_deg {
            log::warn!("tilt_deg {} out of range, clamped to {}", self.tilt_deg, tilt);
            self.tilt_deg = tilt;
        }
        self
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Squared speed cap
    #[inline]
    pub fn max_speed_sq(&self) -> f32 {
        self.max_speed * self.max_speed
    }

    /// Total length of the lose sequence (drop + hold)
    pub fn fall_total_secs(&self) -> f32 {
        self.fall_xy_secs.max(self.fall_z_secs) + self.fall_hold_secs
    }
}
