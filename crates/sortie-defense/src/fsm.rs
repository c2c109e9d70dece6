//! Emplacement behavior finite state machine.
//!
//! Pure functions that compute phase transitions and firing decisions
//! for air-defense emplacements. No ECS dependency: operates on plain data.

use sortie_core::enums::{DefenseWeapon, EmplacementPhase};

use crate::profiles::{get_profile, DefenseProfile};

/// Input to the emplacement FSM for a single site.
pub struct EmplacementContext {
    pub weapon: DefenseWeapon,
    pub phase: EmplacementPhase,
    /// Seconds spent in the current phase, including this tick.
    pub elapsed_in_phase_secs: f64,
    /// Straight-line distance to the UAV.
    pub range_to_uav: f64,
    /// Terrain does not block the site's view of the UAV.
    pub line_of_sight: bool,
    /// UAV is spawned, alive, and the mission is active.
    pub uav_engageable: bool,
}

/// Output from the emplacement FSM.
pub struct EmplacementUpdate {
    pub new_phase: EmplacementPhase,
    pub phase_changed: bool,
    /// Launch a round this tick.
    pub fire: bool,
}

/// Evaluate the FSM for one emplacement.
pub fn evaluate(ctx: &EmplacementContext) -> EmplacementUpdate {
    let profile = get_profile(ctx.weapon);
    let in_envelope = in_envelope(ctx, &profile);

    match ctx.phase {
        EmplacementPhase::Idle => {
            if in_envelope {
                transition(EmplacementPhase::Tracking, false)
            } else {
                hold(ctx.phase)
            }
        }
        EmplacementPhase::Tracking => {
            if !in_envelope {
                transition(EmplacementPhase::Idle, false)
            } else if ctx.elapsed_in_phase_secs >= profile.acquire_secs {
                transition(EmplacementPhase::Reloading, true)
            } else {
                hold(ctx.phase)
            }
        }
        EmplacementPhase::Reloading => {
            if ctx.elapsed_in_phase_secs < profile.reload_secs {
                hold(ctx.phase)
            } else if in_envelope {
                transition(EmplacementPhase::Tracking, false)
            } else {
                transition(EmplacementPhase::Idle, false)
            }
        }
    }
}

/// Whether the UAV can currently be engaged by this emplacement.
fn in_envelope(ctx: &EmplacementContext, profile: &DefenseProfile) -> bool {
    ctx.uav_engageable && ctx.line_of_sight && ctx.range_to_uav <= profile.range
}

fn hold(phase: EmplacementPhase) -> EmplacementUpdate {
    EmplacementUpdate {
        new_phase: phase,
        phase_changed: false,
        fire: false,
    }
}

fn transition(phase: EmplacementPhase, fire: bool) -> EmplacementUpdate {
    EmplacementUpdate {
        new_phase: phase,
        phase_changed: true,
        fire,
    }
}
