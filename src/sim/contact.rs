//! Per-frame contact events reported by the collision engine

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Scene node names the controller reacts to
pub mod names {
    pub const WALL: &str = "wall_collide";
    pub const GROUND: &str = "ground_collide";
    /// Holes are authored as `hole_collide0..5` and may be renamed to this
    pub const LOSE_TRIGGER: &str = "lose_trigger";
    pub const HOLE_PREFIX: &str = "hole_collide";
    pub const GOAL: &str = "goal_collide";
    pub const GOAL_ALT: &str = "goalCol";
    pub const START: &str = "start";
}

/// What a contact touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    // Declaration order is the in-frame processing order
    Ground,
    Wall,
    Goal,
    LoseTrigger,
}

impl SurfaceKind {
    /// Map a collision node name to a surface kind
    pub fn from_node_name(name: &str) -> Option<Self> {
        match name {
            names::WALL => Some(SurfaceKind::Wall),
            names::GROUND => Some(SurfaceKind::Ground),
            names::LOSE_TRIGGER => Some(SurfaceKind::LoseTrigger),
            names::GOAL | names::GOAL_ALT => Some(SurfaceKind::Goal),
            _ if is_hole_name(name) => Some(SurfaceKind::LoseTrigger),
            _ => None,
        }
    }

    /// Contacts of this kind end rolling
    pub fn is_terminal(&self) -> bool {
        matches!(self, SurfaceKind::Goal | SurfaceKind::LoseTrigger)
    }
}

fn is_hole_name(name: &str) -> bool {
    name.strip_prefix(names::HOLE_PREFIX)
        .is_some_and(|idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()))
}

/// One intersection between a ball collider and the scene, in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub kind: SurfaceKind,
    /// Point on the surface of the hit solid
    pub surface_point: Vec3,
    /// Surface normal, pointing out of the hit solid
    pub surface_normal: Vec3,
    /// Deepest point of the ball collider inside the hit solid
    pub interior_point: Vec3,
}

impl ContactEvent {
    pub fn new(kind: SurfaceKind, surface_point: Vec3, surface_normal: Vec3, interior_point: Vec3) -> Self {
        Self {
            kind,
            surface_point,
            surface_normal,
            interior_point,
        }
    }

    /// Build from an engine node name; unknown nodes yield `None`
    pub fn from_node(
        name: &str,
        surface_point: Vec3,
        surface_normal: Vec3,
        interior_point: Vec3,
    ) -> Option<Self> {
        match SurfaceKind::from_node_name(name) {
            Some(kind) => Some(Self::new(kind, surface_point, surface_normal, interior_point)),
            None => {
                log::debug!("Ignoring contact with unknown node '{}'", name);
                None
            }
        }
    }
}

/// Order a frame's contacts for processing (stable within a kind)
pub fn ordered(contacts: &[ContactEvent]) -> Vec<ContactEvent> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_key(|c| c.kind);
    sorted
}
