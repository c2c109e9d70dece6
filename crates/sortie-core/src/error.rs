//! Structured rejections for player commands.
//!
//! A rejected command never changes simulation state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::{DroneMode, LockStatus, MissionStatus, WeaponKind};

/// Why a command was refused.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandError {
    #[error("UAV has crashed")]
    Crashed,
    #[error("UAV has not been spawned")]
    NotSpawned,
    #[error("mission is {status:?}")]
    InvalidMissionStatus { status: MissionStatus },
    #[error("command requires {required:?} mode")]
    WrongMode { required: DroneMode },
    #[error("non-finite {field}")]
    NonFinite { field: String },
    #[error("unknown target {target_id}")]
    UnknownTarget { target_id: u32 },
    #[error("target {target_id} has not been detected")]
    TargetNotDetected { target_id: u32 },
    #[error("target {target_id} is destroyed")]
    TargetDestroyed { target_id: u32 },
    #[error("target {target_id} has already been surveilled")]
    TargetAlreadySurveilled { target_id: u32 },
    #[error("hover cooldown active")]
    HoverCooldown,
    #[error("UAV is returning to base")]
    Returning,
    #[error("invalid mission config: {reason}")]
    InvalidConfig { reason: String },
}

/// Why a fire attempt failed.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FireError {
    #[error("UAV has crashed")]
    Crashed,
    #[error("mission is {status:?}")]
    MissionNotActive { status: MissionStatus },
    #[error("weapons require attack mode")]
    WrongMode,
    #[error("no target lock (status {status:?})")]
    NotLocked { status: LockStatus },
    #[error("no {weapon:?} ammunition")]
    NoAmmo { weapon: WeaponKind },
    #[error("locked target is gone")]
    TargetLost,
    #[error("{weapon:?} out of range: {current_distance:.1} > {required_distance:.1}")]
    OutOfRange {
        weapon: WeaponKind,
        required_distance: f64,
        current_distance: f64,
    },
    #[error("bomb release too low: {current_distance:.1} < {required_distance:.1}")]
    InsufficientDropHeight {
        required_distance: f64,
        current_distance: f64,
    },
}

impl FireError {
    /// The violated distance requirement, for geometric failures.
    pub fn required_distance(&self) -> Option<f64> {
        match self {
            FireError::OutOfRange {
                required_distance, ..
            }
            | FireError::InsufficientDropHeight {
                required_distance, ..
            } => Some(*required_distance),
            _ => None,
        }
    }

    /// The measured distance, for geometric failures.
    pub fn current_distance(&self) -> Option<f64> {
        match self {
            FireError::OutOfRange {
                current_distance, ..
            }
            | FireError::InsufficientDropHeight {
                current_distance, ..
            } => Some(*current_distance),
            _ => None,
        }
    }
}

/// Successful release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireReport {
    pub munition_id: u32,
    pub weapon: WeaponKind,
    pub target_id: u32,
    pub ammo_remaining: u32,
    /// Distance to the target at release.
    pub distance: f64,
}

/// Flat, display-friendly view of a fire attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub required_distance: Option<f64>,
    pub current_distance: Option<f64>,
    pub munition_id: Option<u32>,
}

impl From<&Result<FireReport, FireError>> for FireOutcome {
    fn from(result: &Result<FireReport, FireError>) -> Self {
        match result {
            Ok(report) => FireOutcome {
                success: true,
                error: None,
                required_distance: None,
                current_distance: Some(report.distance),
                munition_id: Some(report.munition_id),
            },
            Err(err) => FireOutcome {
                success: false,
                error: Some(err.to_string()),
                required_distance: err.required_distance(),
                current_distance: err.current_distance(),
                munition_id: None,
            },
        }
    }
}
