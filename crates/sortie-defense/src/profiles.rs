//! Weapon-specific emplacement profiles.
//!
//! Consolidates per-weapon parameters for the emplacement FSM and its rounds.

use sortie_core::enums::DefenseWeapon;

/// Behavioral profile for an air-defense weapon.
pub struct DefenseProfile {
    /// Maximum engagement distance (units).
    pub range: f64,
    /// Tracking time needed before the first shot (seconds).
    pub acquire_secs: f64,
    /// Time between a shot and the next acquisition (seconds).
    pub reload_secs: f64,
    /// Round speed (units/s).
    pub round_speed: f64,
    /// Round self-destruct time (seconds).
    pub round_lifetime_secs: f64,
    /// Standard deviation-ish bound of the launch aim error (radians).
    pub aim_error_rad: f64,
    /// Whether rounds steer toward the UAV after launch.
    pub guided: bool,
    /// Maximum steering rate for guided rounds (rad/s).
    pub turn_rate: f64,
}

/// Get the profile for a given weapon.
pub fn get_profile(weapon: DefenseWeapon) -> DefenseProfile {
    match weapon {
        DefenseWeapon::Missile => DefenseProfile {
            range: 45.0,
            acquire_secs: 2.0,
            reload_secs: 6.0,
            round_speed: 18.0,
            round_lifetime_secs: 5.0,
            aim_error_rad: 0.05,
            guided: true,
            turn_rate: 1.2,
        },
        DefenseWeapon::Bomb => DefenseProfile {
            range: 30.0,
            acquire_secs: 3.0,
            reload_secs: 8.0,
            round_speed: 12.0,
            round_lifetime_secs: 4.0,
            aim_error_rad: 0.15,
            guided: false,
            turn_rate: 0.0,
        },
        DefenseWeapon::Gun => DefenseProfile {
            range: 25.0,
            acquire_secs: 1.0,
            reload_secs: 3.0,
            round_speed: 30.0,
            round_lifetime_secs: 1.5,
            aim_error_rad: 0.10,
            guided: false,
            turn_rate: 0.0,
        },
    }
}
