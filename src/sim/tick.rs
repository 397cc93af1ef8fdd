//! Per-frame ball controller update
//!
//! Advances the game by one rendered frame: contact dispatch, velocity
//! integration, rolling spin and maze tilt while rolling; the fall sequence
//! while losing; nothing once won.

use glam::{Vec2, Vec3};

use super::collision::{ground_acceleration, wall_bounce};
use super::contact::{ContactEvent, SurfaceKind, ordered};
use super::fall::{FallAnimation, FallStage};
use super::state::{GameEvent, GamePhase, GameState, MazeTilt};
use crate::roll_rotation;

/// Inputs for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Contacts reported by the collision pass this frame
    pub contacts: Vec<ContactEvent>,
    /// Normalized mouse position, or `None` when the pointer is outside the window
    pub mouse: Option<Vec2>,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::Rolling => roll(state, input, dt),
        GamePhase::Losing(mut anim) => {
            anim.advance(dt);
            match anim.stage(&state.tuning) {
                FallStage::Restarting => {
                    state.restart();
                    state.restarts += 1;
                    state.events.push(GameEvent::Restarted);
                    log::info!("Level restarted (restart #{})", state.restarts);
                }
                FallStage::Falling | FallStage::Holding => {
                    state.ball.pos = anim.position(&state.tuning);
                    state.phase = GamePhase::Losing(anim);
                }
            }
        }
        GamePhase::Won => {}
    }
}

/// One rolling frame
fn roll(state: &mut GameState, input: &TickInput, dt: f32) {
    // Engine stall: a single huge step would tunnel through walls
    if dt > state.tuning.stall_dt {
        log::debug!("Skipping stalled frame (dt = {:.3})", dt);
        return;
    }

    state.time_ticks += 1;

    for contact in ordered(&input.contacts) {
        match contact.kind {
            SurfaceKind::Wall => on_wall(state, &contact),
            SurfaceKind::Ground => on_ground(state, &contact),
            SurfaceKind::Goal => on_goal(state),
            SurfaceKind::LoseTrigger => on_lose(state, &contact),
        }
        // Rolling ended; the rest of this frame's contacts are dropped
        if contact.kind.is_terminal() {
            return;
        }
    }

    integrate(state, dt);

    if let Some(mouse) = input.mouse {
        state.tilt = MazeTilt::from_mouse(mouse, state.tuning.tilt_deg);
    }
}

fn on_wall(state: &mut GameState, contact: &ContactEvent) {
    let tuning = &state.tuning;
    if let Some(bounce) = wall_bounce(
        state.ball.pos,
        state.ball.vel,
        contact,
        tuning.wall_hit_threshold,
        tuning.min_bounce_speed,
    ) {
        let speed = state.ball.speed();
        state.ball.vel = bounce.velocity;
        state.ball.pos += bounce.push_out;
        state.events.push(GameEvent::WallHit { speed });
        log::debug!("Wall hit at speed {:.2} (angle {:.3})", speed, bounce.vel_angle);
    }
}

fn on_ground(state: &mut GameState, contact: &ContactEvent) {
    state.ball.pos.z = contact.surface_point.z + state.tuning.ground_offset;
    state.accel = ground_acceleration(contact.surface_normal);
}

fn on_lose(state: &mut GameState, contact: &ContactEvent) {
    let anim = FallAnimation::new(state.ball.pos, contact.interior_point, state.tuning.fall_depth);
    state.phase = GamePhase::Losing(anim);
    state.events.push(GameEvent::Fell {
        target: contact.interior_point,
    });
    log::info!(
        "Ball fell into hole at ({:.2}, {:.2})",
        contact.interior_point.x,
        contact.interior_point.y
    );
}

fn on_goal(state: &mut GameState) {
    state.phase = GamePhase::Won;
    state.ball.visible = false;
    state.events.push(GameEvent::Won);
    log::info!("Goal reached after {} frames", state.time_ticks);
}

/// Apply the downhill pull, cap speed, move, and spin the ball
fn integrate(state: &mut GameState, dt: f32) {
    let tuning = &state.tuning;
    let ball = &mut state.ball;

    ball.vel += state.accel * dt * tuning.accel;
    if ball.vel.length_squared() > tuning.max_speed_sq() {
        ball.vel = ball.vel.normalize() * tuning.max_speed;
    }
    ball.pos += ball.vel * dt;

    let axis = Vec3::Z.cross(ball.vel);
    if let Some(spin) = roll_rotation(axis, tuning.roll_spin_deg * dt * ball.vel.length()) {
        ball.orientation = (spin * ball.orientation).normalize();
    }
}
