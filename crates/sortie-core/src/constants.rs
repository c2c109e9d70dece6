//! Simulation constants and tuning parameters.

use crate::types::Position;

/// Simulation tick rate (Hz) for fixed-step ticking.
pub const TICK_RATE: u32 = 30;

/// Seconds per fixed tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// Half-width of the playable square (x and z in [-extent, extent]).
pub const WORLD_HALF_EXTENT: f64 = 100.0;

/// Ceiling used when clamping impact points.
pub const WORLD_MAX_ALTITUDE: f64 = 200.0;

/// Default launch/recovery point.
pub const BASE_POSITION: Position = Position {
    x: 0.0,
    y: 30.0,
    z: 0.0,
};

// --- Flight ---

/// Placeholder position for a UAV that has not been placed yet.
pub const UNSPAWNED_POSITION: Position = Position {
    x: 0.0,
    y: -1000.0,
    z: 0.0,
};

/// Default cruise speed (units/s).
pub const DEFAULT_UAV_SPEED: f64 = 10.0;

/// Distance under which the UAV snaps onto its commanded destination.
pub const ARRIVAL_THRESHOLD: f64 = 2.5;

/// Minimum horizontal direction component before yaw follows travel.
pub const YAW_EPSILON: f64 = 0.01;

/// Spawn height above the clicked terrain point.
pub const SPAWN_CLEARANCE: f64 = 20.0;

/// Minimum height above a clicked movement point.
pub const MOVE_MIN_CLEARANCE: f64 = 15.0;

// --- Detection / surveillance ---

/// Horizontal range at which targets are detected.
pub const DETECTION_RADIUS: f64 = 30.0;

/// Horizontal distance within which a click selects a target.
pub const SELECTION_THRESHOLD: f64 = 8.0;

/// Window after a hover completion during which no new session starts.
pub const HOVER_COOLDOWN_SECS: f64 = 2.0;

// --- Targeting ---

/// Default seek time before lock (seconds).
pub const DEFAULT_MAX_LOCK_TIME: f64 = 2.5;

/// Distance beyond which a lock is dropped.
pub const LOCK_BREAK_RANGE: f64 = 60.0;

// --- Weapons ---

pub const DEFAULT_MISSILE_AMMO: u32 = 4;
pub const DEFAULT_BOMB_AMMO: u32 = 2;

/// Maximum straight-line missile launch distance.
pub const MISSILE_MAX_RANGE: f64 = 20.0;

/// Maximum horizontal offset for a bomb release.
pub const BOMB_MAX_HORIZONTAL: f64 = 10.0;

/// Minimum height above the target for a bomb release.
pub const BOMB_MIN_DROP_HEIGHT: f64 = 15.0;

/// Flight progress per second.
pub const MISSILE_FLIGHT_RATE: f64 = 1.0;
pub const BOMB_FLIGHT_RATE: f64 = 0.8;

/// Delay between running out of ammunition and the recall decision.
pub const AMMO_EXHAUSTED_GRACE_SECS: f64 = 2.0;

/// Delay between the last target's destruction and mission success.
pub const VICTORY_DELAY_SECS: f64 = 2.0;

// --- Crash detection ---

/// Minimum clearance above the ground when a height map is available.
pub const TERRAIN_SAFETY_MARGIN: f64 = 2.0;

/// Absolute minimum altitude when no height map is available.
pub const FALLBACK_MIN_ALTITUDE: f64 = 12.0;

/// Distance at which a hostile round destroys the UAV.
pub const DEFENSE_HIT_RADIUS: f64 = 4.0;

/// Delay between a crash and the mission failure.
pub const CRASH_FAILURE_DELAY_SECS: f64 = 5.0;

// --- Battery ---

pub const BATTERY_MAX: f64 = 100.0;

/// Drain rates (percent per second) by UAV status.
pub const DRAIN_IDLE: f64 = 0.5;
pub const DRAIN_TRANSIT: f64 = 1.0;
pub const DRAIN_HOVERING: f64 = 2.0;
pub const DRAIN_ATTACK: f64 = 3.5;

/// Extra drain while thermal vision is on.
pub const DRAIN_THERMAL_EXTRA: f64 = 1.5;

/// Battery warning thresholds (percent).
pub const BATTERY_LOW_WARNING: f64 = 25.0;
pub const BATTERY_CRITICAL_WARNING: f64 = 10.0;

// --- Mission ---

pub const DEFAULT_MAX_TIME_SECS: f64 = 300.0;

/// Time remaining at which the UAV is recalled to base.
pub const DEFAULT_RETURN_THRESHOLD_SECS: f64 = 5.0;

/// Distance from base that counts as arrival.
pub const BASE_ARRIVAL_RADIUS: f64 = 5.0;

/// Delay between arriving at base and the mission outcome.
pub const RETURN_RESOLVE_DELAY_SECS: f64 = 1.0;

// --- Terrain ---

/// Line-of-sight sampling interval (units).
pub const TERRAIN_LOS_SAMPLE_INTERVAL: f64 = 2.0;
