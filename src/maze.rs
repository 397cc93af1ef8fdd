//! Analytic flat-maze scene
//!
//! A stand-in for the host engine: a ground plane through the origin that
//! tilts with the maze, axis-aligned box walls, circular holes and a box
//! goal, all laid out in maze-local XY. Good enough to drive the controller
//! headless and in tests.

use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::host::{CollisionQuery, SceneHandle};
use crate::sim::{Ball, ContactEvent, MazeTilt, SurfaceKind};

/// Ground normals flatter than this have no usable plane height
const MIN_GROUND_NORMAL_Z: f32 = 1e-3;

/// Axis-aligned rectangle in maze XY
///
/// Corners are normalized on construction, including when read from a
/// layout file, so `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectCorners")]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

/// Rect corners as written in a layout file, in any order
#[derive(Deserialize)]
struct RectCorners {
    min: Vec2,
    max: Vec2,
}

impl From<RectCorners> for Rect {
    fn from(corners: RectCorners) -> Self {
        Rect::new(corners.min, corners.max)
    }
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn centered(center: Vec2, half: Vec2) -> Self {
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Circular hole in the maze floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub center: Vec2,
    pub radius: f32,
}

fn default_ball_radius() -> f32 {
    0.4
}

/// Maze geometry, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    /// The `start` anchor
    pub start: Vec3,
    #[serde(default = "default_ball_radius")]
    pub ball_radius: f32,
    #[serde(default)]
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub holes: Vec<Hole>,
    pub goal: Rect,
}

impl MazeLayout {
    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a layout file, falling back to the demo layout on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(layout) => {
                log::info!(
                    "Loaded maze {} ({} walls, {} holes)",
                    path.display(),
                    layout.walls.len(),
                    layout.holes.len()
                );
                layout
            }
            Err(e) => {
                log::warn!("Could not load maze {}: {}, using demo layout", path.display(), e);
                Self::demo()
            }
        }
    }

    /// 10x10 maze: start in one corner, goal at (4, 4), six holes
    pub fn demo() -> Self {
        let wall = |x0: f32, y0: f32, x1: f32, y1: f32| Rect::new(Vec2::new(x0, y0), Vec2::new(x1, y1));
        Self {
            start: Vec3::new(-4.0, -4.0, 0.4),
            ball_radius: default_ball_radius(),
            walls: vec![
                // Outer border
                wall(-5.5, -5.5, 5.5, -5.0),
                wall(-5.5, 5.0, 5.5, 5.5),
                wall(-5.5, -5.0, -5.0, 5.0),
                wall(5.0, -5.0, 5.5, 5.0),
                // Inner baffles
                wall(-5.0, -2.25, 2.5, -1.75),
                wall(-2.5, 1.75, 5.0, 2.25),
            ],
            holes: vec![
                Hole { center: Vec2::new(3.8, -3.8), radius: 0.45 },
                Hole { center: Vec2::new(0.0, -3.2), radius: 0.45 },
                Hole { center: Vec2::new(3.8, 0.0), radius: 0.45 },
                Hole { center: Vec2::new(-1.0, 0.2), radius: 0.45 },
                Hole { center: Vec2::new(-4.0, 3.6), radius: 0.45 },
                Hole { center: Vec2::new(1.5, 3.4), radius: 0.45 },
            ],
            goal: Rect::centered(Vec2::new(4.0, 4.0), Vec2::splat(0.3)),
        }
    }
}

/// Scene state and collision queries for a [`MazeLayout`]
#[derive(Debug, Clone)]
pub struct FlatMaze {
    pub layout: MazeLayout,
    pub tilt: MazeTilt,
    pub mouse: Option<Vec2>,
    pub title: String,
    pub ball_visible: bool,
    pub quit: bool,
}

impl FlatMaze {
    pub fn new(layout: MazeLayout) -> Self {
        Self {
            layout,
            tilt: MazeTilt::default(),
            mouse: None,
            title: String::new(),
            ball_visible: true,
            quit: false,
        }
    }

    /// Height of the tilted ground plane under maze point `p`
    ///
    /// `None` when the plane is (nearly) vertical and a downward ray misses it.
    fn ground_height(&self, normal: Vec3, p: Vec2) -> Option<f32> {
        if normal.z < MIN_GROUND_NORMAL_Z {
            return None;
        }
        Some(-(normal.x * p.x + normal.y * p.y) / normal.z)
    }

    /// Downward ray from above the ball onto the ground plane
    fn ground_contact(&self, ball: &Ball) -> Option<ContactEvent> {
        let normal = self.tilt.ground_normal();
        let xy = ball.pos.truncate();
        let surface = xy.extend(self.ground_height(normal, xy)?);
        Some(ContactEvent::new(SurfaceKind::Ground, surface, normal, surface))
    }

    fn wall_contacts(&self, ball: &Ball, out: &mut Vec<ContactEvent>) {
        let center = ball.pos.truncate();
        let radius = self.layout.ball_radius;
        for wall in &self.layout.walls {
            let closest = wall.closest_point(center);
            let offset = center - closest;
            let dist = offset.length();
            if dist >= radius || dist <= f32::EPSILON {
                continue;
            }
            let outward = offset / dist;
            let surface = closest.extend(ball.pos.z);
            let interior = (center - outward * radius).extend(ball.pos.z);
            out.push(ContactEvent::new(SurfaceKind::Wall, surface, outward.extend(0.0), interior));
        }
    }

    fn trigger_contacts(&self, ball: &Ball, out: &mut Vec<ContactEvent>) {
        let center = ball.pos.truncate();
        let floor = ball.pos.z - self.layout.ball_radius;
        for hole in &self.layout.holes {
            if center.distance(hole.center) < hole.radius {
                out.push(ContactEvent::new(
                    SurfaceKind::LoseTrigger,
                    hole.center.extend(floor),
                    Vec3::Z,
                    hole.center.extend(floor - 1.0),
                ));
            }
        }
        if self.layout.goal.contains(center) {
            let c = (self.layout.goal.min + self.layout.goal.max) * 0.5;
            out.push(ContactEvent::new(SurfaceKind::Goal, c.extend(floor), Vec3::Z, c.extend(floor - 0.1)));
        }
    }
}

impl CollisionQuery for FlatMaze {
    fn contacts(&mut self, ball: &Ball) -> Vec<ContactEvent> {
        let mut contacts: Vec<ContactEvent> = self.ground_contact(ball).into_iter().collect();
        self.wall_contacts(ball, &mut contacts);
        self.trigger_contacts(ball, &mut contacts);
        contacts
    }
}

impl SceneHandle for FlatMaze {
    fn start_anchor(&self) -> Vec3 {
        self.layout.start
    }

    fn mouse(&self) -> Option<Vec2> {
        self.mouse
    }

    fn set_tilt(&mut self, tilt: MazeTilt) {
        self.tilt = tilt;
    }

    fn set_title(&mut self, text: &str) {
        self.title = text.to_string();
    }

    fn set_ball_visible(&mut self, visible: bool) {
        self.ball_visible = visible;
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FixedClock, FrameOutcome, Session};
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn open_field() -> MazeLayout {
        MazeLayout {
            start: Vec3::new(0.0, 0.0, 0.4),
            ball_radius: 0.4,
            walls: vec![Rect::new(Vec2::new(2.0, -5.0), Vec2::new(2.5, 5.0))],
            holes: vec![Hole { center: Vec2::new(-3.0, 0.0), radius: 0.5 }],
            goal: Rect::centered(Vec2::new(0.0, 4.0), Vec2::splat(0.3)),
        }
    }

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::at(Vec3::new(x, y, 0.4))
    }

    fn session_with_mouse(mouse: Vec2) -> Session<FixedClock, FlatMaze> {
        let mut maze = FlatMaze::new(open_field());
        maze.mouse = Some(mouse);
        Session::new(FixedClock::new(DT), maze, Tuning::default())
    }

    #[test]
    fn test_flat_ground_contact() {
        let mut maze = FlatMaze::new(open_field());
        let contacts = maze.contacts(&ball_at(0.0, 0.0));
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind, SurfaceKind::Ground);
        assert_eq!(contacts[0].surface_point, Vec3::ZERO);
        assert_eq!(contacts[0].surface_normal, Vec3::Z);
    }

    #[test]
    fn test_tilted_ground_height() {
        let mut maze = FlatMaze::new(open_field());
        maze.set_tilt(MazeTilt::from_mouse(Vec2::new(1.0, 0.0), 10.0));
        let contacts = maze.contacts(&ball_at(1.0, 0.0));
        // Sloping down toward +X
        assert!(contacts[0].surface_point.z < 0.0);
        assert!(contacts[0].surface_normal.x > 0.0);
    }

    #[test]
    fn test_wall_contact_geometry() {
        let mut maze = FlatMaze::new(open_field());
        let contacts = maze.contacts(&ball_at(1.8, 0.0));
        let wall = contacts.iter().find(|c| c.kind == SurfaceKind::Wall).unwrap();
        assert!((wall.surface_point - Vec3::new(2.0, 0.0, 0.4)).length() < 1e-5);
        assert!((wall.surface_normal - Vec3::NEG_X).length() < 1e-5);
        assert!((wall.interior_point - Vec3::new(2.2, 0.0, 0.4)).length() < 1e-5);
    }

    #[test]
    fn test_hole_and_goal_triggers() {
        let mut maze = FlatMaze::new(open_field());
        let in_hole = maze.contacts(&ball_at(-3.1, 0.1));
        assert!(in_hole.iter().any(|c| c.kind == SurfaceKind::LoseTrigger));

        let at_goal = maze.contacts(&ball_at(0.1, 4.1));
        assert!(at_goal.iter().any(|c| c.kind == SurfaceKind::Goal));
    }

    #[test]
    fn test_layout_json() {
        let json = r#"{
            "start": [0.0, 0.0, 0.4],
            "goal": { "min": [1.0, 1.0], "max": [2.0, 2.0] }
        }"#;
        let layout = MazeLayout::from_json(json).unwrap();
        assert_eq!(layout.ball_radius, 0.4);
        assert!(layout.walls.is_empty());
        assert!(layout.goal.contains(Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn test_reversed_goal_corners_still_trigger() {
        let json = r#"{
            "start": [0.0, 0.0, 0.4],
            "walls": [{ "min": [3.0, 1.0], "max": [2.5, -1.0] }],
            "goal": { "min": [2.0, 2.0], "max": [1.0, 1.0] }
        }"#;
        let layout = MazeLayout::from_json(json).unwrap();
        assert_eq!(layout.goal, Rect::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)));
        assert_eq!(layout.walls[0].min, Vec2::new(2.5, -1.0));

        let mut maze = FlatMaze::new(layout);
        let at_goal = maze.contacts(&ball_at(1.5, 1.5));
        assert!(at_goal.iter().any(|c| c.kind == SurfaceKind::Goal));

        let near_wall = maze.contacts(&ball_at(2.2, 0.0));
        let wall = near_wall.iter().find(|c| c.kind == SurfaceKind::Wall).unwrap();
        assert!((wall.surface_point.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_vertical_ground_has_no_contact() {
        let mut maze = FlatMaze::new(open_field());
        maze.set_tilt(MazeTilt { pitch: 90.0, roll: 0.0 });
        let contacts = maze.contacts(&ball_at(1.0, 1.0));
        assert!(contacts.iter().all(|c| c.kind != SurfaceKind::Ground));
        assert!(contacts.iter().all(|c| c.surface_point.is_finite()));
    }

    #[test]
    fn test_malformed_layout_falls_back_to_demo() {
        let path = std::env::temp_dir().join(format!("tilt-maze-layout-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"start\": [0.0, 0.0 ").unwrap();
        let layout = MazeLayout::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(layout, MazeLayout::demo());
    }

    #[test]
    fn test_demo_start_is_clear() {
        let mut maze = FlatMaze::new(MazeLayout::demo());
        let start = maze.start_anchor();
        let contacts = maze.contacts(&Ball::at(start));
        assert!(contacts.iter().all(|c| c.kind == SurfaceKind::Ground));
    }

    #[test]
    fn test_tilt_right_bounces_off_wall() {
        let mut session = session_with_mouse(Vec2::new(1.0, 0.0));

        let mut bounced = false;
        for _ in 0..240 {
            session.frame();
            assert!(session.state.ball.pos.x < 2.0);
            if session.state.ball.vel.x < 0.0 {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
        assert!(session.state.ball.pos.x > 1.0);
    }

    #[test]
    fn test_tilt_left_falls_into_hole_and_restarts() {
        let mut session = session_with_mouse(Vec2::new(-1.0, 0.0));

        let mut fell = false;
        for _ in 0..300 {
            session.frame();
            fell |= matches!(session.state.phase, GamePhase::Losing(_));
            if session.state.restarts == 1 {
                break;
            }
        }
        assert!(fell);
        assert_eq!(session.state.restarts, 1);
        assert_eq!(session.state.ball.pos, Vec3::new(0.0, 0.0, 0.4));
        assert!(session.world().ball_visible);
    }

    #[test]
    fn test_tilt_up_reaches_goal() {
        let mut session = session_with_mouse(Vec2::new(0.0, 1.0));
        assert_eq!(session.run(600), FrameOutcome::Won);
        assert_eq!(session.world().title, "Goal!!");
        assert!(!session.world().ball_visible);
    }

    #[test]
    fn test_no_mouse_stays_put() {
        let mut maze = FlatMaze::new(open_field());
        maze.mouse = None;
        let mut session = Session::new(FixedClock::new(DT), maze, Tuning::default());
        assert_eq!(session.run(120), FrameOutcome::Continue);
        assert_eq!(session.state.ball.pos, Vec3::new(0.0, 0.0, 0.4));
    }
}
