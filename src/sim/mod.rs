//! Deterministic ball controller
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through the `dt` passed to `tick`
//! - Contacts are processed in a fixed order
//! - No rendering or host engine dependencies

pub mod collision;
pub mod contact;
pub mod fall;
pub mod state;
pub mod tick;

pub use collision::{WallBounce, bounce_damping, ground_acceleration, reflect_direction, wall_bounce};
pub use contact::{ContactEvent, SurfaceKind};
pub use fall::{FallAnimation, FallStage};
pub use state::{Ball, GameEvent, GamePhase, GameState, MazeTilt};
pub use tick::{TickInput, tick};
