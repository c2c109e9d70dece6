//! Air-defense system: runs the emplacement FSM for each site and flies
//! the rounds they launch.
//!
//! Behavior decisions come from `sortie_defense`; this module applies them
//! to the ECS world.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use sortie_core::components::*;
use sortie_core::enums::DefenseWeapon;
use sortie_core::events::SimEvent;
use sortie_core::types::{Position, Velocity};
use sortie_defense::fsm::{evaluate, EmplacementContext};
use sortie_defense::guidance::{lead_aim_point, launch_velocity, sample_aim_error, steer_toward};
use sortie_defense::profiles::get_profile;
use sortie_terrain::{has_line_of_sight, GroundHeight};

use crate::world_setup::spawn_hostile_round;

/// Muzzle height above the emplacement's base.
const LAUNCH_HEIGHT: f64 = 2.0;

/// Run the FSM for every emplacement and launch any rounds it calls for.
pub fn run(
    world: &mut World,
    uav: &UavState,
    engageable: bool,
    ground: Option<&dyn GroundHeight>,
    rng: &mut ChaCha8Rng,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let mut launches: Vec<(u32, DefenseWeapon, Position)> = Vec::new();

    for (_entity, (_site, emplacement, pos)) in
        world.query_mut::<(&DefenseSite, &mut Emplacement, &Position)>()
    {
        let muzzle = Position::new(pos.x, pos.y + LAUNCH_HEIGHT, pos.z);
        let line_of_sight = match ground {
            Some(ground) => has_line_of_sight(ground, &muzzle, &uav.position),
            None => true,
        };

        let ctx = EmplacementContext {
            weapon: emplacement.weapon,
            phase: emplacement.phase,
            elapsed_in_phase_secs: emplacement.phase_elapsed_secs + dt,
            range_to_uav: muzzle.distance_to(&uav.position),
            line_of_sight,
            uav_engageable: engageable,
        };
        let update = evaluate(&ctx);

        if update.phase_changed {
            emplacement.phase = update.new_phase;
            emplacement.phase_elapsed_secs = 0.0;
        } else {
            emplacement.phase_elapsed_secs += dt;
        }

        if update.fire {
            emplacement.shots_fired += 1;
            launches.push((emplacement.id, emplacement.weapon, muzzle));
        }
    }

    for (site_id, weapon, muzzle) in launches {
        let profile = get_profile(weapon);
        let aim = lead_aim_point(&muzzle, &uav.position, &uav.velocity, profile.round_speed);
        let (yaw_error, pitch_error) = sample_aim_error(rng, profile.aim_error_rad);
        let velocity = launch_velocity(&muzzle, &aim, profile.round_speed, yaw_error, pitch_error);
        spawn_hostile_round(world, site_id, weapon, muzzle, velocity);
        debug!(site_id, weapon = ?weapon, "defense round launched");
        events.push(SimEvent::DefenseFired { site_id, weapon });
    }
}

/// Fly hostile rounds. Guided rounds steer toward `uav_pos` when given.
/// Rounds expire after their lifetime or on ground contact.
pub fn advance_rounds(
    world: &mut World,
    uav_pos: Option<&Position>,
    ground: Option<&dyn GroundHeight>,
    dt: f64,
) {
    let mut expired: Vec<Entity> = Vec::new();

    for (entity, (_round, state, pos, vel)) in world.query_mut::<(
        &HostileRound,
        &mut HostileRoundState,
        &mut Position,
        &mut Velocity,
    )>() {
        let profile = get_profile(state.weapon);
        state.age_secs += dt;

        if profile.guided {
            if let Some(target) = uav_pos {
                *vel = steer_toward(pos, vel, target, profile.round_speed, profile.turn_rate, dt);
            }
        }

        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;

        let ground_level = ground.and_then(|g| g.height_below(pos)).unwrap_or(0.0);
        if state.age_secs >= profile.round_lifetime_secs || pos.y <= ground_level || !pos.is_finite()
        {
            expired.push(entity);
        }
    }

    for entity in expired {
        let _ = world.despawn(entity);
    }
}
