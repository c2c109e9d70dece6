//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Something that happened during a tick or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// UAV placed in the world for the first time.
    Spawned { position: Position },
    /// UAV reached its commanded destination.
    Arrived { position: Position },
    /// Target came within detection range.
    TargetDetected { target_id: u32, kind: TargetType },
    HoverStarted { target_id: u32 },
    HoverCompleted { target_id: u32, kind: TargetType },
    LockStarted { target_id: u32 },
    LockAcquired { target_id: u32 },
    LockLost { target_id: u32 },
    WeaponFired {
        munition_id: u32,
        weapon: WeaponKind,
        target_id: u32,
    },
    TargetDestroyed { target_id: u32, kind: TargetType },
    /// Air-defense emplacement fired at the UAV.
    DefenseFired { site_id: u32, weapon: DefenseWeapon },
    Crashed { reason: CrashReason },
    ReturningToBase,
    MissionStarted { mode: DroneMode },
    MissionResolved {
        status: MissionStatus,
        reason: Option<String>,
    },
    MissionReset,
    /// A queued command was refused.
    CommandRejected { reason: String },
}

/// Alert for the UI alert queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    /// Simulation time at which the alert was raised (seconds).
    pub time_secs: f64,
}
