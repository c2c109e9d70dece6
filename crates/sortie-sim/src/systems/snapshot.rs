//! Snapshot system: builds a complete `SimSnapshot` from engine state.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use sortie_core::components::*;
use sortie_core::error::FireOutcome;
use sortie_core::events::{Alert, SimEvent};
use sortie_core::state::*;
use sortie_core::types::{Position, SimTime, TypeCounts, Velocity};

use crate::systems::detection;

/// Engine state the snapshot is built from.
pub struct SnapshotSource<'a> {
    pub world: &'a World,
    pub time: &'a SimTime,
    pub mission: &'a MissionState,
    pub uav: &'a UavState,
    pub hover: Option<&'a HoverSession>,
    pub targeting: &'a TargetingSession,
    pub loadout: &'a WeaponLoadout,
    pub surveilled: &'a TypeCounts,
    pub destroyed: &'a TypeCounts,
    pub last_fire: Option<&'a FireOutcome>,
}

/// Build a complete snapshot. Events and alerts are handed over by the caller.
pub fn build_snapshot(
    src: &SnapshotSource,
    events: Vec<SimEvent>,
    alerts: Vec<Alert>,
) -> SimSnapshot {
    let targets = build_targets(src.world);
    let objectives = ObjectivesView {
        completed_targets: *src.surveilled,
        destroyed_targets: *src.destroyed,
        detected_count: targets.iter().filter(|t| t.detected).count() as u32,
        total_targets: targets.len() as u32,
    };

    SimSnapshot {
        time: *src.time,
        mission: build_mission(src.mission),
        uav: build_uav(src.uav),
        targets,
        objectives,
        hover: src.hover.map(|session| HoverView {
            target_id: session.target_id,
            orbit_angle: session.orbit_angle,
            dwell_accumulated: session.dwell_accumulated,
            dwell_required: session.dwell_required,
        }),
        targeting: TargetingView {
            locked_target_id: src.targeting.locked_target_id,
            lock_status: src.targeting.lock_status,
            lock_timer: src.targeting.lock_timer,
            max_lock_time: src.targeting.max_lock_time,
        },
        loadout: LoadoutView {
            selected: src.loadout.selected,
            ammo: src.loadout.ammo,
        },
        munitions: build_munitions(src.world),
        hostile_rounds: build_hostile_rounds(src.world),
        defense_sites: build_defense_sites(src.world),
        last_fire: src.last_fire.cloned(),
        events,
        alerts,
    }
}

fn build_mission(mission: &MissionState) -> MissionView {
    MissionView {
        status: mission.status,
        time_remaining: mission.time_remaining,
        max_time: mission.max_time,
        fail_reason: mission.fail_reason.clone(),
        returning: mission.returning,
    }
}

fn build_uav(uav: &UavState) -> UavView {
    UavView {
        position: uav.position,
        rotation: uav.rotation,
        velocity: uav.velocity,
        target_position: uav.target_position,
        speed: uav.speed,
        battery: uav.battery,
        status: uav.status,
        mode: uav.mode,
        is_crashed: uav.is_crashed,
        crash_reason: uav.crash_reason.map(|reason| reason.to_string()),
        spawned: uav.spawned,
        thermal_vision: uav.thermal_vision,
    }
}

fn build_targets(world: &World) -> Vec<TargetView> {
    detection::all_targets(world)
        .into_iter()
        .map(|t| TargetView {
            id: t.info.id,
            kind: t.info.kind,
            position: t.position,
            detected: t.status.detected,
            surveilled: t.status.surveilled,
            destroyed: t.status.destroyed,
        })
        .collect()
}

fn build_munitions(world: &World) -> Vec<MunitionView> {
    let mut munitions: Vec<MunitionView> = world
        .query::<(&Munition, &MunitionState, &Position)>()
        .iter()
        .map(|(_, (_, state, pos))| MunitionView {
            id: state.id,
            weapon: state.weapon,
            target_id: state.target_id,
            position: *pos,
            flight_progress: state.flight_progress,
        })
        .collect();
    munitions.sort_by_key(|m| m.id);
    munitions
}

fn build_hostile_rounds(world: &World) -> Vec<HostileRoundView> {
    let mut rounds: Vec<(u32, HostileRoundView)> = world
        .query::<(&HostileRound, &HostileRoundState, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (_, state, pos, vel))| {
            (
                entity.id(),
                HostileRoundView {
                    site_id: state.site_id,
                    weapon: state.weapon,
                    position: *pos,
                    velocity: *vel,
                },
            )
        })
        .collect();
    // Entity ids keep the listing deterministic.
    rounds.sort_by_key(|(id, _)| *id);
    rounds.into_iter().map(|(_, view)| view).collect()
}

fn build_defense_sites(world: &World) -> Vec<DefenseSiteView> {
    let mut sites: Vec<DefenseSiteView> = world
        .query::<(&DefenseSite, &Emplacement, &Position)>()
        .iter()
        .map(|(_, (_, emplacement, pos))| DefenseSiteView {
            id: emplacement.id,
            weapon: emplacement.weapon,
            position: *pos,
            phase: emplacement.phase,
        })
        .collect();
    sites.sort_by_key(|s| s.id);
    sites
}
