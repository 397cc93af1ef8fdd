//! Collision response for the rolling ball
//!
//! Wall bounces with angle-dependent damping, and the downhill pull derived
//! from the ground contact normal.

use glam::Vec3;

use super::contact::ContactEvent;

/// Result of a wall contact that passed the bounce filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallBounce {
    /// New ball velocity
    pub velocity: Vec3,
    /// Translation that pushes the ball out of the wall
    pub push_out: Vec3,
    /// Alignment of the incoming direction with the wall normal (0..1]
    pub vel_angle: f32,
}

/// Reflect a unit direction about a normal
///
/// v' = n * (n · -v) * 2 + v
#[inline]
pub fn reflect_direction(dir: Vec3, normal: Vec3) -> Vec3 {
    normal * normal.dot(-dir) * 2.0 + dir
}

/// Fraction of speed kept after a bounce
///
/// Head-on hits (`vel_angle` = 1) keep half, grazing hits keep nearly all.
#[inline]
pub fn bounce_damping(vel_angle: f32) -> f32 {
    (1.0 - vel_angle) * 0.5 + 0.5
}

/// Decide whether a wall contact bounces the ball, and how
///
/// Only contacts straight ahead of the ball (`hit_angle` above `threshold`)
/// while it moves into the wall react; the broad collision pass also reports
/// glancing touches that must be ignored. Returns `None` for a ball slower
/// than `min_speed`.
pub fn wall_bounce(
    ball_pos: Vec3,
    ball_vel: Vec3,
    contact: &ContactEvent,
    threshold: f32,
    min_speed: f32,
) -> Option<WallBounce> {
    let speed = ball_vel.length();
    if speed < min_speed {
        return None;
    }
    let in_vec = ball_vel / speed;
    // Engine normals point out of the wall; flip to face into it
    let norm = -contact.surface_normal;
    let vel_angle = norm.dot(in_vec);
    let hit_dir = (contact.surface_point - ball_pos).normalize_or_zero();
    let hit_angle = norm.dot(hit_dir);

    if vel_angle > 0.0 && hit_angle > threshold {
        let reflected = reflect_direction(in_vec, norm);
        Some(WallBounce {
            velocity: reflected * (speed * bounce_damping(vel_angle)),
            push_out: contact.surface_point - contact.interior_point,
            vel_angle,
        })
    } else {
        None
    }
}

/// Downhill acceleration along a ground surface with the given normal
///
/// Projects world up onto the plane twice: `n × (n × up)`. Zero on flat
/// ground.
#[inline]
pub fn ground_acceleration(normal: Vec3) -> Vec3 {
    let side = normal.cross(Vec3::Z);
    normal.cross(side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::contact::SurfaceKind;

    /// Wall at x = 1 facing -X, ball at origin heading +X
    fn wall_contact(surface: Vec3) -> ContactEvent {
        ContactEvent::new(
            SurfaceKind::Wall,
            surface,
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.05, surface.y, surface.z),
        )
    }

    #[test]
    fn test_reflect_direction() {
        let r = reflect_direction(Vec3::X, Vec3::X);
        assert!((r - Vec3::NEG_X).length() < 1e-6);

        let d = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = reflect_direction(d, Vec3::X);
        assert!((r - Vec3::new(-d.x, d.y, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_head_on_bounce_halves_speed() {
        let contact = wall_contact(Vec3::new(1.0, 0.0, 0.0));
        let bounce = wall_bounce(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), &contact, 0.995, 1e-4).unwrap();
        assert!((bounce.velocity - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
        assert!((bounce.push_out - Vec3::new(-0.05, 0.0, 0.0)).length() < 1e-5);
        assert!((bounce.vel_angle - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hit_angle_threshold() {
        let vel = Vec3::new(3.0, 0.0, 0.0);

        // hit_angle = 1.0 reacts
        let straight = wall_contact(Vec3::new(1.0, 0.0, 0.0));
        assert!(wall_bounce(Vec3::ZERO, vel, &straight, 0.995, 1e-4).is_some());

        // hit_angle = 0.99 is a glancing contact
        let h = 0.99_f32;
        let off_axis = wall_contact(Vec3::new(h, (1.0 - h * h).sqrt(), 0.0));
        assert!(wall_bounce(Vec3::ZERO, vel, &off_axis, 0.995, 1e-4).is_none());
    }

    #[test]
    fn test_moving_away_does_not_bounce() {
        let contact = wall_contact(Vec3::new(1.0, 0.0, 0.0));
        let vel = Vec3::new(-3.0, 0.0, 0.0);
        assert!(wall_bounce(Vec3::ZERO, vel, &contact, 0.995, 1e-4).is_none());
    }

    #[test]
    fn test_resting_ball_does_not_bounce() {
        let contact = wall_contact(Vec3::new(1.0, 0.0, 0.0));
        assert!(wall_bounce(Vec3::ZERO, Vec3::ZERO, &contact, 0.995, 1e-4).is_none());
    }

    #[test]
    fn test_flat_ground_has_no_pull() {
        assert_eq!(ground_acceleration(Vec3::Z), Vec3::ZERO);
    }

    #[test]
    fn test_tilted_ground_pulls_downhill() {
        // Ground sloping down toward +X
        let normal = Vec3::new(0.2, 0.0, 1.0).normalize();
        let accel = ground_acceleration(normal);

        // In the ground plane
        assert!(accel.dot(normal).abs() < 1e-6);
        // Downhill: toward +X and downward
        assert!(accel.x > 0.0);
        assert!(accel.z < 0.0);
        assert!(accel.y.abs() < 1e-6);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn damping_stays_in_range(angle in 0.0f32..=1.0) {
                let d = bounce_damping(angle);
                prop_assert!((0.5..=1.0).contains(&d));
            }

            #[test]
            fn damping_grows_as_hits_get_shallower(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
                prop_assume!(a < b);
                prop_assert!(bounce_damping(a) >= bounce_damping(b));
            }

            #[test]
            fn bounce_never_adds_energy(vx in 0.1f32..5.0, vy in -5.0f32..5.0) {
                let contact = wall_contact(Vec3::new(1.0, 0.0, 0.0));
                let vel = Vec3::new(vx, vy, 0.0);
                if let Some(bounce) = wall_bounce(Vec3::ZERO, vel, &contact, 0.995, 1e-4) {
                    prop_assert!(bounce.velocity.length() <= vel.length() + 1e-4);
                }
            }
        }
    }
}
