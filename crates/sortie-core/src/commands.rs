//! Player commands and mission configuration.
//!
//! Commands can be applied immediately through the engine's command methods
//! or queued for processing at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::components::AmmoCount;
use crate::constants::*;
use crate::enums::*;
use crate::types::Position;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// A click on the terrain: spawn point, move point, or target selection.
    TerrainClick { point: Position },
    /// Fly straight to a world position.
    SetTargetPosition { position: Position },
    /// Start acquiring a lock on a target (attack mode).
    BeginTargetLock { target_id: u32 },
    /// Release the selected weapon at the locked target.
    FireWeapon,
    /// Switch the selected weapon.
    SelectWeapon { weapon: WeaponKind },
    /// Switch the UAV variant.
    SetDroneType { mode: DroneMode },
    /// Toggle the thermal camera.
    SetThermalVision { enabled: bool },
    /// Begin a mission with the given configuration.
    StartMission { config: MissionConfig },
    /// Return to planning with everything restored.
    ResetMission,
}

/// Parameters chosen when a mission starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub mode: DroneMode,
    /// Mission countdown (seconds).
    pub max_time_secs: f64,
    /// UAV cruise speed (units/s).
    pub speed: f64,
    pub ammo: AmmoCount,
    /// Seek time before lock (seconds).
    pub max_lock_time_secs: f64,
    /// Time remaining at which the UAV is recalled.
    pub return_threshold_secs: f64,
    pub thermal_vision: bool,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            mode: DroneMode::default(),
            max_time_secs: DEFAULT_MAX_TIME_SECS,
            speed: DEFAULT_UAV_SPEED,
            ammo: AmmoCount::default(),
            max_lock_time_secs: DEFAULT_MAX_LOCK_TIME,
            return_threshold_secs: DEFAULT_RETURN_THRESHOLD_SECS,
            thermal_vision: false,
        }
    }
}
