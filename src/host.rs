//! Host engine seams
//!
//! The controller never reaches for engine globals. A [`Session`] pulls the
//! frame delta, contacts and mouse from injected collaborators, runs one
//! [`tick`], and pushes tilt, title and ball visibility back to the world.

use glam::{Vec2, Vec3};

use crate::sim::{Ball, ContactEvent, GameEvent, GamePhase, GameState, MazeTilt, TickInput, tick};
use crate::tuning::Tuning;

/// Per-frame delta time source
pub trait Clock {
    /// Seconds since the previous frame
    fn delta(&mut self) -> f32;
}

/// Collision pass for the ball sphere and its downward ground ray
pub trait CollisionQuery {
    /// Contacts for the ball at its current position
    fn contacts(&mut self, ball: &Ball) -> Vec<ContactEvent>;
}

/// Scene graph access and presentation outputs
pub trait SceneHandle {
    /// Position of the `start` anchor node
    fn start_anchor(&self) -> Vec3;
    /// Normalized mouse position, or `None` when there is no pointer
    fn mouse(&self) -> Option<Vec2>;
    fn set_tilt(&mut self, tilt: MazeTilt);
    fn set_title(&mut self, text: &str);
    fn set_ball_visible(&mut self, visible: bool);
    /// Escape was pressed
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Clock that always reports the same delta
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub dt: f32,
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        Self { dt }
    }
}

impl Clock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.dt
    }
}

/// What the host loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Won,
    Quit,
}

/// One game wired to its host collaborators
///
/// The world answers both collision queries and scene calls, as a host
/// engine's scene graph does.
pub struct Session<C, W> {
    pub state: GameState,
    clock: C,
    world: W,
    /// Events from the most recent frame
    events: Vec<GameEvent>,
}

impl<C: Clock, W: CollisionQuery + SceneHandle> Session<C, W> {
    /// Start a game with the ball on the world's start anchor
    pub fn new(clock: C, world: W, tuning: Tuning) -> Self {
        let start = world.start_anchor();
        log::info!("New game, start anchor at ({:.2}, {:.2}, {:.2})", start.x, start.y, start.z);
        Self {
            state: GameState::new(start, tuning),
            clock,
            world,
            events: Vec::new(),
        }
    }

    /// Run one frame
    pub fn frame(&mut self) -> FrameOutcome {
        if self.world.quit_requested() {
            log::info!("Quit requested");
            return FrameOutcome::Quit;
        }

        let dt = self.clock.delta();
        // The collision pass only feeds the rolling update
        let contacts = if self.state.is_rolling() {
            self.world.contacts(&self.state.ball)
        } else {
            Vec::new()
        };
        let input = TickInput {
            contacts,
            mouse: self.world.mouse(),
        };
        tick(&mut self.state, &input, dt);

        self.world.set_tilt(self.state.tilt);
        self.events = self.state.drain_events();
        for event in &self.events {
            match event {
                GameEvent::Won => {
                    self.world.set_title(&self.state.tuning.win_title);
                    self.world.set_ball_visible(false);
                }
                GameEvent::Restarted => self.world.set_ball_visible(true),
                GameEvent::WallHit { .. } | GameEvent::Fell { .. } => {}
            }
        }

        match self.state.phase {
            GamePhase::Won => FrameOutcome::Won,
            GamePhase::Rolling | GamePhase::Losing(_) => FrameOutcome::Continue,
        }
    }

    /// Run frames until the goal is reached, quit is requested, or `max_frames` elapse
    pub fn run(&mut self, max_frames: u64) -> FrameOutcome {
        for _ in 0..max_frames {
            match self.frame() {
                FrameOutcome::Continue => {}
                outcome => return outcome,
            }
        }
        FrameOutcome::Continue
    }

    /// Restart from the start anchor (external "play again")
    pub fn restart(&mut self) {
        self.state.start = self.world.start_anchor();
        self.state.restart();
        self.world.set_ball_visible(true);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}
