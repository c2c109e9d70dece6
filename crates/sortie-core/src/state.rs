//! Simulation snapshot: the complete visible state handed to presentation each tick.

use serde::{Deserialize, Serialize};

use crate::components::AmmoCount;
use crate::enums::*;
use crate::error::FireOutcome;
use crate::events::{Alert, SimEvent};
use crate::types::{Position, Rotation, SimTime, TypeCounts, Velocity};

/// Complete read-only state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub mission: MissionView,
    pub uav: UavView,
    pub targets: Vec<TargetView>,
    pub objectives: ObjectivesView,
    pub hover: Option<HoverView>,
    pub targeting: TargetingView,
    pub loadout: LoadoutView,
    pub munitions: Vec<MunitionView>,
    pub hostile_rounds: Vec<HostileRoundView>,
    pub defense_sites: Vec<DefenseSiteView>,
    /// Result of the most recent fire attempt.
    pub last_fire: Option<FireOutcome>,
    pub events: Vec<SimEvent>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionView {
    pub status: MissionStatus,
    pub time_remaining: f64,
    pub max_time: f64,
    pub fail_reason: Option<String>,
    pub returning: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UavView {
    pub position: Position,
    pub rotation: Rotation,
    pub velocity: Velocity,
    pub target_position: Option<Position>,
    pub speed: f64,
    pub battery: f64,
    pub status: UavStatus,
    pub mode: DroneMode,
    pub is_crashed: bool,
    pub crash_reason: Option<String>,
    pub spawned: bool,
    pub thermal_vision: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: u32,
    pub kind: TargetType,
    pub position: Position,
    pub detected: bool,
    pub surveilled: bool,
    pub destroyed: bool,
}

/// Objective progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectivesView {
    /// Completed hover sessions per type.
    pub completed_targets: TypeCounts,
    pub destroyed_targets: TypeCounts,
    pub detected_count: u32,
    pub total_targets: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverView {
    pub target_id: u32,
    pub orbit_angle: f64,
    pub dwell_accumulated: f64,
    pub dwell_required: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetingView {
    pub locked_target_id: Option<u32>,
    pub lock_status: LockStatus,
    pub lock_timer: f64,
    pub max_lock_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadoutView {
    pub selected: WeaponKind,
    pub ammo: AmmoCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MunitionView {
    pub id: u32,
    pub weapon: WeaponKind,
    pub target_id: u32,
    pub position: Position,
    pub flight_progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostileRoundView {
    pub site_id: u32,
    pub weapon: DefenseWeapon,
    pub position: Position,
    pub velocity: Velocity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenseSiteView {
    pub id: u32,
    pub weapon: DefenseWeapon,
    pub position: Position,
    pub phase: EmplacementPhase,
}
