//! Target-type-specific surveillance profiles.
//!
//! Consolidates per-type orbit and hover-trigger parameters.

use sortie_core::enums::TargetType;

/// Orbit and trigger parameters for hovering over one target type.
pub struct HoverProfile {
    /// Orbit radius around the target (units).
    pub orbit_radius: f64,
    /// Orbit height above the target (units).
    pub orbit_height: f64,
    /// Angular speed of the orbit (rad/s).
    pub orbit_speed: f64,
    /// Dwell time needed to complete surveillance (seconds).
    pub dwell_required: f64,
    /// Horizontal distance that triggers a hover.
    pub trigger_radius: f64,
    /// Height band above the target that triggers a hover.
    pub trigger_min_height: f64,
    pub trigger_max_height: f64,
}

/// Get the hover profile for a given target type.
pub fn get_profile(kind: TargetType) -> HoverProfile {
    match kind {
        TargetType::Tank => HoverProfile {
            orbit_radius: 10.0,
            orbit_height: 15.0,
            orbit_speed: 0.5,
            dwell_required: 5.0,
            trigger_radius: 15.0,
            trigger_min_height: 5.0,
            trigger_max_height: 25.0,
        },
        TargetType::Jeep => HoverProfile {
            orbit_radius: 8.0,
            orbit_height: 15.0,
            orbit_speed: 0.6,
            dwell_required: 4.0,
            trigger_radius: 15.0,
            trigger_min_height: 5.0,
            trigger_max_height: 25.0,
        },
        TargetType::Warehouse => HoverProfile {
            orbit_radius: 12.0,
            orbit_height: 15.0,
            orbit_speed: 0.4,
            dwell_required: 6.0,
            trigger_radius: 15.0,
            trigger_min_height: 5.0,
            trigger_max_height: 25.0,
        },
        // Soldiers are small: tighter and lower than vehicles and structures.
        TargetType::Soldier => HoverProfile {
            orbit_radius: 6.0,
            orbit_height: 10.0,
            orbit_speed: 0.7,
            dwell_required: 3.0,
            trigger_radius: 10.0,
            trigger_min_height: 3.0,
            trigger_max_height: 15.0,
        },
    }
}
