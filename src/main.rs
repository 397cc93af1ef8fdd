//! Tilt Maze headless demo
//!
//! Runs the ball controller against the flat-maze scene with an autopilot
//! steering the mouse toward the goal.
//!
//! Usage: `tilt-maze [layout.json] [tuning.json]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tilt_maze::sim::GameEvent;
use tilt_maze::{FixedClock, FlatMaze, FrameOutcome, MazeLayout, Session, Tuning};

/// Frame rate of the simulated host
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after two simulated minutes
const MAX_FRAMES: u64 = 60 * 120;
/// Autopilot RNG seed
const SEED: u64 = 0x6d617a65;

/// Mouse position that leans the maze toward `target`, with a little wobble
fn autopilot_mouse(ball: Vec2, target: Vec2, rng: &mut Pcg32) -> Vec2 {
    let dir = (target - ball).normalize_or_zero();
    let jitter = Vec2::new(rng.random_range(-0.35..0.35), rng.random_range(-0.35..0.35));
    (dir * 0.6 + jitter).clamp(Vec2::splat(-1.0), Vec2::ONE)
}

fn main() {
    env_logger::init();
    log::info!("Tilt Maze (headless) starting...");

    let mut args = std::env::args().skip(1);
    let layout = match args.next() {
        Some(path) => MazeLayout::load(path),
        None => MazeLayout::demo(),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(path),
        None => Tuning::default(),
    };

    let goal = (layout.goal.min + layout.goal.max) * 0.5;
    let mut rng = Pcg32::seed_from_u64(SEED);
    let mut session = Session::new(FixedClock::new(FRAME_DT), FlatMaze::new(layout), tuning);

    let mut falls = 0u32;
    let mut wall_hits = 0u32;
    let mut outcome = FrameOutcome::Continue;
    for frame in 0..MAX_FRAMES {
        let ball = session.state.ball.pos.truncate();
        session.world_mut().mouse = Some(autopilot_mouse(ball, goal, &mut rng));

        outcome = session.frame();
        for event in session.events() {
            match event {
                GameEvent::Fell { .. } => falls += 1,
                GameEvent::WallHit { .. } => wall_hits += 1,
                GameEvent::Restarted | GameEvent::Won => {}
            }
        }
        if outcome != FrameOutcome::Continue {
            log::info!("Stopped after {} frames", frame + 1);
            break;
        }
    }

    match outcome {
        FrameOutcome::Won => println!("{} ({} falls, {} wall hits)", session.world().title, falls, wall_hits),
        FrameOutcome::Quit => println!("Quit"),
        FrameOutcome::Continue => println!("Out of time ({} falls, {} wall hits)", falls, wall_hits),
    }
}
