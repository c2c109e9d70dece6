//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// UAV variant chosen before or during a mission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneMode {
    /// Reconnaissance: orbit targets to surveil them.
    #[default]
    Surveillance,
    /// Strike: lock on to detected targets and destroy them.
    Attack,
}

/// What the UAV is currently doing. Selects the battery drain rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UavStatus {
    #[default]
    Idle,
    Transit,
    Hovering,
    /// Attack variant with an active lock-on sequence.
    Attack,
}

/// Ground target category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Tank,
    Jeep,
    Warehouse,
    Soldier,
}

impl TargetType {
    pub const ALL: [TargetType; 4] = [
        TargetType::Tank,
        TargetType::Jeep,
        TargetType::Warehouse,
        TargetType::Soldier,
    ];
}

/// Lock-on acquisition state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    #[default]
    Inactive,
    Seeking,
    Locked,
}

/// Player weapon type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Stand-off missile, limited by straight-line range.
    #[default]
    Missile,
    /// Gravity bomb, must be released from above the target.
    Bomb,
}

/// Mission lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Failed,
}

impl MissionStatus {
    /// Completed or failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Failed)
    }
}

/// Hostile air-defense weapon type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseWeapon {
    /// Guided anti-drone missile.
    Missile,
    /// Lobbed airburst bomb.
    Bomb,
    /// Rapid-fire gun emplacement.
    Gun,
}

/// Air-defense emplacement behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmplacementPhase {
    /// No target in range or line of sight.
    #[default]
    Idle,
    /// Building a firing solution on the UAV.
    Tracking,
    /// Shot away, waiting to reload.
    Reloading,
}

/// Why the UAV went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrashReason {
    TerrainCollision,
    ShotDown(DefenseWeapon),
    BatteryDepleted,
}

impl CrashReason {
    /// Human-readable reason, also used as the mission failure reason.
    pub fn message(self) -> &'static str {
        match self {
            CrashReason::TerrainCollision => "Terrain Collision",
            CrashReason::ShotDown(DefenseWeapon::Missile) => "Shot down by anti-drone missile",
            CrashReason::ShotDown(DefenseWeapon::Bomb) => "Shot down by anti-drone bomb",
            CrashReason::ShotDown(DefenseWeapon::Gun) => "Shot down by defense system",
            CrashReason::BatteryDepleted => "Battery Depleted",
        }
    }
}

impl fmt::Display for CrashReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
