//! Flight integrator.
//!
//! Moves the UAV in a straight line toward a point at a fixed speed,
//! snapping onto the point once inside the arrival threshold.

use glam::DVec3;
use tracing::warn;

use sortie_core::components::UavState;
use sortie_core::constants::{ARRIVAL_THRESHOLD, YAW_EPSILON};
use sortie_core::enums::UavStatus;
use sortie_core::events::SimEvent;
use sortie_core::types::{Position, Velocity};

/// Result of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStep {
    pub position: Position,
    /// The step snapped onto the destination.
    pub arrived: bool,
    /// New heading, when the horizontal component of travel is large enough.
    pub yaw: Option<f64>,
}

/// Compute one step from `from` toward `to`. Returns `None` when the
/// geometry is non-finite.
pub fn step_toward(from: &Position, to: &Position, speed: f64, dt: f64) -> Option<FlightStep> {
    let delta = DVec3::from(*to) - DVec3::from(*from);
    let distance = delta.length();
    if !distance.is_finite() || !speed.is_finite() || !dt.is_finite() {
        return None;
    }

    let direction = delta.normalize_or_zero();
    let yaw = heading(direction);

    let step = if distance <= ARRIVAL_THRESHOLD {
        FlightStep {
            position: *to,
            arrived: true,
            yaw,
        }
    } else {
        let advance = (speed.max(0.0) * dt).min(distance);
        FlightStep {
            position: (DVec3::from(*from) + direction * advance).into(),
            arrived: false,
            yaw,
        }
    };

    step.position.is_finite().then_some(step)
}

/// Yaw facing `direction`, or `None` for (nearly) vertical travel.
fn heading(direction: DVec3) -> Option<f64> {
    let horizontal = direction.x.hypot(direction.z);
    (horizontal > YAW_EPSILON).then(|| direction.x.atan2(direction.z))
}

/// Apply a computed step to the UAV, deriving velocity from displacement.
pub fn apply_step(uav: &mut UavState, step: &FlightStep, dt: f64) {
    if dt > 0.0 {
        let displacement = DVec3::from(step.position) - DVec3::from(uav.position);
        uav.velocity = (displacement / dt).into();
    }
    uav.position = step.position;
    if let Some(yaw) = step.yaw {
        uav.rotation.yaw = yaw;
    }
}

/// Fly the UAV toward its commanded target point, if it has one.
pub fn run(uav: &mut UavState, dt: f64, events: &mut Vec<SimEvent>) {
    let Some(target) = uav.target_position else {
        uav.velocity = Velocity::default();
        return;
    };

    let Some(step) = step_toward(&uav.position, &target, uav.speed, dt) else {
        warn!(
            position = ?uav.position,
            target = ?target,
            "non-finite flight step discarded"
        );
        return;
    };

    apply_step(uav, &step, dt);
    if step.arrived {
        uav.target_position = None;
        events.push(SimEvent::Arrived {
            position: step.position,
        });
    }
}

/// Derive the UAV's activity status from what drove it this tick.
pub fn update_status(uav: &mut UavState, hovering: bool, engaging: bool) {
    uav.status = if uav.is_crashed {
        UavStatus::Idle
    } else if hovering {
        UavStatus::Hovering
    } else if engaging {
        UavStatus::Attack
    } else if uav.target_position.is_some() {
        UavStatus::Transit
    } else {
        UavStatus::Idle
    };
}
