//! Battery drain system.
//!
//! Drain rate follows the UAV's status, with thermal vision as an overlay.
//! Reaching zero is reported to the caller, which owns the crash path.

use tracing::info;

use sortie_core::components::UavState;
use sortie_core::constants::*;
use sortie_core::enums::{AlertLevel, UavStatus};
use sortie_core::events::Alert;

/// Drain in percent per second for a status.
pub fn drain_rate(status: UavStatus, thermal_vision: bool) -> f64 {
    let base = match status {
        UavStatus::Idle => DRAIN_IDLE,
        UavStatus::Transit => DRAIN_TRANSIT,
        UavStatus::Hovering => DRAIN_HOVERING,
        UavStatus::Attack => DRAIN_ATTACK,
    };
    if thermal_vision {
        base + DRAIN_THERMAL_EXTRA
    } else {
        base
    }
}

/// Drain the battery for one tick. Returns true if this tick emptied it.
pub fn run(uav: &mut UavState, dt: f64, now_secs: f64, alerts: &mut Vec<Alert>) -> bool {
    let drained = uav.battery - drain_rate(uav.status, uav.thermal_vision) * dt;
    let depleted = set_level(uav, drained);
    raise_warnings(uav, now_secs, alerts);
    depleted
}

/// Clamp and store a battery level. Returns true only when the level
/// crosses from positive to empty.
pub fn set_level(uav: &mut UavState, level: f64) -> bool {
    let was_charged = uav.battery > 0.0;
    uav.battery = if level.is_nan() {
        uav.battery
    } else {
        level.clamp(0.0, BATTERY_MAX)
    };
    was_charged && uav.battery <= 0.0
}

/// Full charge and re-armed warnings.
pub fn restore(uav: &mut UavState) {
    uav.battery = BATTERY_MAX;
    uav.low_battery_warned = false;
    uav.critical_battery_warned = false;
}

fn raise_warnings(uav: &mut UavState, now_secs: f64, alerts: &mut Vec<Alert>) {
    if !uav.low_battery_warned && uav.battery <= BATTERY_LOW_WARNING {
        uav.low_battery_warned = true;
        info!(battery = uav.battery, "battery low");
        alerts.push(Alert {
            level: AlertLevel::Warning,
            message: format!("Battery low ({:.0}%)", uav.battery),
            time_secs: now_secs,
        });
    }
    if !uav.critical_battery_warned && uav.battery <= BATTERY_CRITICAL_WARNING {
        uav.critical_battery_warned = true;
        info!(battery = uav.battery, "battery critical");
        alerts.push(Alert {
            level: AlertLevel::Critical,
            message: format!("Battery critical ({:.0}%)", uav.battery),
            time_secs: now_secs,
        });
    }
}
