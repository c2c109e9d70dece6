//! Mission clock and lifecycle decisions.
//!
//! The clock only reports what happened this tick; the engine applies the
//! cross-component effects (recall, scheduling, resolution).

use sortie_core::components::{MissionState, UavState};
use sortie_core::constants::BASE_ARRIVAL_RADIUS;
use sortie_core::enums::{DroneMode, MissionStatus, TargetType};
use sortie_core::types::{Position, TypeCounts};

/// What the clock saw this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockOutcome {
    /// Time fell below the return threshold; recall the UAV.
    pub recall: bool,
    /// Returning UAV is home; schedule the arrival resolution.
    pub arrived_home: bool,
    /// Countdown hit zero with nothing else pending.
    pub expired: bool,
}

/// Advance the countdown by `dt`.
pub fn advance(mission: &mut MissionState, uav: &UavState, base: &Position, dt: f64) -> ClockOutcome {
    if mission.status != MissionStatus::Active {
        return ClockOutcome::default();
    }

    mission.time_remaining = (mission.time_remaining - dt).max(0.0);

    let uav_flying = uav.spawned && !uav.is_crashed;
    let recall = uav_flying && !mission.returning && mission.time_remaining < mission.return_threshold;
    let arrived_home = uav_flying
        && mission.returning
        && !mission.resolution_pending
        && uav.position.distance_to(base) <= BASE_ARRIVAL_RADIUS;
    let expired = mission.time_remaining <= 0.0
        && !mission.resolution_pending
        && !mission.failure_pending
        && !arrived_home;

    ClockOutcome {
        recall,
        arrived_home,
        expired,
    }
}

/// Outcome of landing back at base.
pub fn evaluate_return(
    mode: DroneMode,
    surveilled: &TypeCounts,
    destroyed: &TypeCounts,
) -> (MissionStatus, Option<String>) {
    match mode {
        DroneMode::Surveillance if surveilled.covers_all_types() => (MissionStatus::Completed, None),
        DroneMode::Surveillance => (
            MissionStatus::Failed,
            Some(format!(
                "Surveillance incomplete: {} of 4 target types surveilled",
                surveilled_types(surveilled)
            )),
        ),
        DroneMode::Attack if destroyed.total() > 0 => (MissionStatus::Completed, None),
        DroneMode::Attack => (
            MissionStatus::Failed,
            Some("Returned without destroying a target".to_string()),
        ),
    }
}

fn surveilled_types(counts: &TypeCounts) -> usize {
    TargetType::ALL
        .iter()
        .filter(|kind| counts.get(**kind) > 0)
        .count()
}

/// Apply a resolution. Returns false (and changes nothing) if the mission
/// was already resolved.
pub fn resolve(mission: &mut MissionState, status: MissionStatus, reason: Option<String>) -> bool {
    if mission.status.is_terminal() || !status.is_terminal() {
        return false;
    }
    mission.status = status;
    mission.fail_reason = if status == MissionStatus::Failed {
        reason
    } else {
        None
    };
    mission.failure_pending = false;
    mission.resolution_pending = false;
    mission.ammo_check_pending = false;
    true
}
