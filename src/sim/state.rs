//! Game state and core simulation types

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::fall::FallAnimation;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball rolls freely; contacts are processed every frame
    Rolling,
    /// Ball is dropping into a hole; the level restarts when the animation ends
    Losing(FallAnimation),
    /// Goal reached; nothing updates until an external restart
    Won,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off a wall
    WallHit { speed: f32 },
    /// Ball touched a lose trigger and started falling
    Fell { target: Vec3 },
    /// Level restarted at the start anchor
    Restarted,
    /// Ball reached the goal
    Won,
}

/// The ball root (position/velocity) plus its cosmetic rolling orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Visual spin only; never feeds back into the physics
    pub orientation: Quat,
    pub visible: bool,
}

impl Ball {
    pub fn at(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            visible: true,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Maze tilt in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MazeTilt {
    /// Rotation about the X axis
    pub pitch: f32,
    /// Rotation about the Y axis
    pub roll: f32,
}

impl MazeTilt {
    /// Tilt from normalized mouse coordinates in [-1, 1]
    pub fn from_mouse(mouse: Vec2, max_deg: f32) -> Self {
        Self {
            pitch: mouse.y * -max_deg,
            roll: mouse.x * max_deg,
        }
    }

    /// World rotation of the maze geometry
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians()) * Quat::from_rotation_y(self.roll.to_radians())
    }

    /// Up vector of the tilted ground plane
    pub fn ground_normal(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }
}

/// Complete controller state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub ball: Ball,
    /// Downhill pull from the last ground contact
    pub accel: Vec3,
    pub tilt: MazeTilt,
    pub phase: GamePhase,
    /// Where the ball goes on restart
    pub start: Vec3,
    pub tuning: Tuning,
    /// Number of restarts after a fall
    pub restarts: u32,
    /// Frames advanced while rolling
    pub time_ticks: u64,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the ball at the start anchor
    pub fn new(start: Vec3, tuning: Tuning) -> Self {
        Self {
            ball: Ball::at(start),
            accel: Vec3::ZERO,
            tilt: MazeTilt::default(),
            phase: GamePhase::Rolling,
            start,
            tuning,
            restarts: 0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Put the ball back on the start anchor and resume rolling
    ///
    /// Calling this repeatedly leaves the same state as calling it once.
    pub fn restart(&mut self) {
        self.ball = Ball::at(self.start);
        self.accel = Vec3::ZERO;
        self.phase = GamePhase::Rolling;
    }

    /// True while the per-frame rolling update is installed
    #[inline]
    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, GamePhase::Rolling)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
