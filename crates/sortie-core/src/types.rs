//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::TargetType;

/// 3D position in world space (units).
/// x = East, y = Up (altitude), z = South.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in world space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Euler rotation in radians. Only yaw is driven by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks run while the mission was active.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Per-type tally used for surveillance and destruction objectives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub tank: u32,
    pub jeep: u32,
    pub warehouse: u32,
    pub soldier: u32,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance in the ground plane (ignoring altitude).
    pub fn horizontal_distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Height of `self` above `other` (negative when below).
    pub fn height_above(&self, other: &Position) -> f64 {
        self.y - other.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Linear interpolation toward `other` by factor `t`.
    pub fn lerp(&self, other: &Position, t: f64) -> Position {
        Position::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl From<Position> for DVec3 {
    fn from(p: Position) -> Self {
        DVec3::new(p.x, p.y, p.z)
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Position::new(v.x, v.y, v.z)
    }
}

impl From<Velocity> for DVec3 {
    fn from(v: Velocity) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

impl From<DVec3> for Velocity {
    fn from(v: DVec3) -> Self {
        Velocity::new(v.x, v.y, v.z)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

impl TypeCounts {
    pub fn get(&self, kind: TargetType) -> u32 {
        match kind {
            TargetType::Tank => self.tank,
            TargetType::Jeep => self.jeep,
            TargetType::Warehouse => self.warehouse,
            TargetType::Soldier => self.soldier,
        }
    }

    pub fn increment(&mut self, kind: TargetType) {
        match kind {
            TargetType::Tank => self.tank += 1,
            TargetType::Jeep => self.jeep += 1,
            TargetType::Warehouse => self.warehouse += 1,
            TargetType::Soldier => self.soldier += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.tank + self.jeep + self.warehouse + self.soldier
    }

    /// True when every target type has at least one entry.
    pub fn covers_all_types(&self) -> bool {
        TargetType::ALL.iter().all(|kind| self.get(*kind) > 0)
    }
}
