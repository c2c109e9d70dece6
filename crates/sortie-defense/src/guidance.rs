//! Aiming and steering for hostile rounds.
//!
//! Lead prediction for launch, bounded aim error, and turn-rate-limited
//! pursuit for guided rounds.

use glam::{DQuat, DVec3};
use rand::Rng;

use sortie_core::types::{Position, Velocity};

/// Predicted point where a round fired now at `round_speed` meets a target
/// moving at constant velocity. Falls back to the target's current position
/// when no intercept exists.
pub fn lead_aim_point(
    shooter: &Position,
    target: &Position,
    target_vel: &Velocity,
    round_speed: f64,
) -> Position {
    let rel = DVec3::from(*target) - DVec3::from(*shooter);
    let vel = DVec3::from(*target_vel);

    // |rel + vel * t| = round_speed * t  →  a t² + b t + c = 0
    let a = vel.length_squared() - round_speed * round_speed;
    let b = 2.0 * rel.dot(vel);
    let c = rel.length_squared();

    let t = if a.abs() < 1e-9 {
        if b.abs() < 1e-9 {
            None
        } else {
            Some(-c / b)
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            None
        } else {
            let sqrt_disc = disc.sqrt();
            let t1 = (-b - sqrt_disc) / (2.0 * a);
            let t2 = (-b + sqrt_disc) / (2.0 * a);
            [t1, t2]
                .into_iter()
                .filter(|t| *t > 0.0)
                .min_by(|x, y| x.total_cmp(y))
        }
    };

    match t {
        Some(t) if t.is_finite() && t > 0.0 => (DVec3::from(*target) + vel * t).into(),
        _ => *target,
    }
}

/// Launch velocity toward `aim` at `speed`, deflected by the given yaw/pitch
/// errors (radians) about the line of fire.
pub fn launch_velocity(
    from: &Position,
    aim: &Position,
    speed: f64,
    yaw_error: f64,
    pitch_error: f64,
) -> Velocity {
    let dir = (DVec3::from(*aim) - DVec3::from(*from)).normalize_or_zero();
    if dir == DVec3::ZERO {
        return Velocity::new(0.0, speed, 0.0);
    }
    let (u, v) = dir.any_orthonormal_pair();
    let deflected = (dir + u * yaw_error.tan() + v * pitch_error.tan()).normalize_or_zero();
    (deflected * speed).into()
}

/// Draw a (yaw, pitch) aim error, each uniform in `[-bound, bound]`.
pub fn sample_aim_error<R: Rng>(rng: &mut R, bound: f64) -> (f64, f64) {
    if bound <= 0.0 {
        return (0.0, 0.0);
    }
    (rng.gen_range(-bound..=bound), rng.gen_range(-bound..=bound))
}

/// Turn `vel` toward `target` by at most `max_turn_rate * dt`, keeping `speed`.
pub fn steer_toward(
    pos: &Position,
    vel: &Velocity,
    target: &Position,
    speed: f64,
    max_turn_rate: f64,
    dt: f64,
) -> Velocity {
    let current = DVec3::from(*vel).normalize_or_zero();
    let desired = (DVec3::from(*target) - DVec3::from(*pos)).normalize_or_zero();

    if desired == DVec3::ZERO {
        return *vel;
    }
    if current == DVec3::ZERO {
        return (desired * speed).into();
    }

    let angle = current.angle_between(desired);
    let max_angle = max_turn_rate * dt;
    if angle <= max_angle || angle < 1e-9 {
        return (desired * speed).into();
    }

    let axis = current.cross(desired);
    let axis = if axis.length_squared() < 1e-12 {
        // Target directly behind: any perpendicular axis will do.
        current.any_orthonormal_vector()
    } else {
        axis.normalize()
    };
    let turned = DQuat::from_axis_angle(axis, max_angle) * current;
    (turned.normalize_or_zero() * speed).into()
}
