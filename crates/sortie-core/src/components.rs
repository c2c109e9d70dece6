//! ECS components and engine-owned state records.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::{Position, Rotation, Velocity};

/// Marks an entity as a ground target (tank, jeep, warehouse, soldier).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroundTarget;

/// Marks an entity as a player munition in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Munition;

/// Marks an entity as a hostile air-defense emplacement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DefenseSite;

/// Marks an entity as a round fired by an air-defense emplacement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HostileRound;

/// Identity of a ground target. Immutable after spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetInfo {
    pub id: u32,
    pub kind: TargetType,
}

/// Derived detection/completion status of a ground target.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetStatus {
    /// UAV has passed within detection range.
    pub detected: bool,
    /// A hover session over this target has completed.
    pub surveilled: bool,
    /// Destroyed by a player munition.
    pub destroyed: bool,
}

/// Player munition in flight toward a locked target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MunitionState {
    pub id: u32,
    pub weapon: WeaponKind,
    pub target_id: u32,
    pub start_position: Position,
    /// Impact point (target position clamped to world bounds).
    pub target_position: Position,
    /// 0.0 at release, 1.0 at impact.
    pub flight_progress: f64,
    /// Set once the impact has been resolved.
    pub impacted: bool,
}

/// Air-defense emplacement state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emplacement {
    pub id: u32,
    pub weapon: DefenseWeapon,
    pub phase: EmplacementPhase,
    /// Seconds spent in the current phase.
    pub phase_elapsed_secs: f64,
    /// Rounds fired this mission.
    pub shots_fired: u32,
}

/// Hostile round in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostileRoundState {
    pub site_id: u32,
    pub weapon: DefenseWeapon,
    pub age_secs: f64,
}

/// The player-controlled UAV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UavState {
    pub position: Position,
    pub rotation: Rotation,
    /// Velocity over the last tick (derived from displacement).
    pub velocity: Velocity,
    /// Commanded destination. `None` = holding.
    pub target_position: Option<Position>,
    pub speed: f64,
    /// Power remaining, always within [0, 100].
    pub battery: f64,
    pub status: UavStatus,
    pub mode: DroneMode,
    pub is_crashed: bool,
    pub crash_reason: Option<CrashReason>,
    /// False until the first placement.
    pub spawned: bool,
    pub thermal_vision: bool,
    /// Battery warning alerts already raised this mission.
    pub low_battery_warned: bool,
    pub critical_battery_warned: bool,
}

impl Default for UavState {
    fn default() -> Self {
        Self {
            position: UNSPAWNED_POSITION,
            rotation: Rotation::default(),
            velocity: Velocity::default(),
            target_position: None,
            speed: DEFAULT_UAV_SPEED,
            battery: BATTERY_MAX,
            status: UavStatus::Idle,
            mode: DroneMode::default(),
            is_crashed: false,
            crash_reason: None,
            spawned: false,
            thermal_vision: false,
            low_battery_warned: false,
            critical_battery_warned: false,
        }
    }
}

/// Orbit over a target while accumulating dwell time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverSession {
    pub target_id: u32,
    pub target_kind: TargetType,
    /// Orbit center (the target's position).
    pub center: Position,
    pub orbit_angle: f64,
    pub orbit_radius: f64,
    pub orbit_height: f64,
    /// Angular speed (rad/s).
    pub orbit_speed: f64,
    pub dwell_accumulated: f64,
    pub dwell_required: f64,
}

/// Lock-on state against a selected target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetingSession {
    pub locked_target_id: Option<u32>,
    pub lock_status: LockStatus,
    /// Seconds accumulated while seeking, clamped at `max_lock_time`.
    pub lock_timer: f64,
    pub max_lock_time: f64,
}

impl Default for TargetingSession {
    fn default() -> Self {
        Self {
            locked_target_id: None,
            lock_status: LockStatus::Inactive,
            lock_timer: 0.0,
            max_lock_time: DEFAULT_MAX_LOCK_TIME,
        }
    }
}

/// Rounds per weapon type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoCount {
    pub missile: u32,
    pub bomb: u32,
}

impl Default for AmmoCount {
    fn default() -> Self {
        Self {
            missile: DEFAULT_MISSILE_AMMO,
            bomb: DEFAULT_BOMB_AMMO,
        }
    }
}

/// Selected weapon and remaining ammunition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponLoadout {
    pub selected: WeaponKind,
    pub ammo: AmmoCount,
}

/// Mission lifecycle record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionState {
    pub status: MissionStatus,
    pub time_remaining: f64,
    pub max_time: f64,
    /// Seconds before expiry at which the UAV is recalled.
    pub return_threshold: f64,
    pub fail_reason: Option<String>,
    /// UAV has been recalled to base.
    pub returning: bool,
    /// A crash has scheduled a deferred failure.
    pub failure_pending: bool,
    /// A return-arrival or victory resolution is scheduled.
    pub resolution_pending: bool,
    /// An ammunition exhaustion check is scheduled.
    pub ammo_check_pending: bool,
}
