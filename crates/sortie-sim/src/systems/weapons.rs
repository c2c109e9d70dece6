//! Weapons resolution: fire validation, munition flight, impact.
//!
//! Impact resolution is idempotent. A munition is flagged on its first
//! impact and a target is only counted the first time it is destroyed.

use hecs::World;
use tracing::info;

use sortie_core::components::*;
use sortie_core::constants::*;
use sortie_core::enums::{DroneMode, LockStatus, MissionStatus, WeaponKind};
use sortie_core::error::FireError;
use sortie_core::events::SimEvent;
use sortie_core::types::{Position, TypeCounts};

use crate::systems::detection;

/// What the engine needs to know to fire.
pub struct FireContext<'a> {
    pub uav: &'a UavState,
    pub mission_status: MissionStatus,
    pub targeting: &'a TargetingSession,
    pub loadout: &'a WeaponLoadout,
}

/// A validated shot, ready to be released.
#[derive(Debug, Clone, Copy)]
pub struct FireSolution {
    pub weapon: WeaponKind,
    pub target_id: u32,
    /// Impact point, clamped to world bounds.
    pub aim_point: Position,
    pub distance: f64,
}

pub fn ammo_for(ammo: &AmmoCount, weapon: WeaponKind) -> u32 {
    match weapon {
        WeaponKind::Missile => ammo.missile,
        WeaponKind::Bomb => ammo.bomb,
    }
}

pub fn ammo_slot(ammo: &mut AmmoCount, weapon: WeaponKind) -> &mut u32 {
    match weapon {
        WeaponKind::Missile => &mut ammo.missile,
        WeaponKind::Bomb => &mut ammo.bomb,
    }
}

pub fn out_of_ammo(ammo: &AmmoCount) -> bool {
    ammo.missile == 0 && ammo.bomb == 0
}

/// Flight progress per second.
pub fn flight_rate(weapon: WeaponKind) -> f64 {
    match weapon {
        WeaponKind::Missile => MISSILE_FLIGHT_RATE,
        WeaponKind::Bomb => BOMB_FLIGHT_RATE,
    }
}

/// Clamp a point into the playable volume.
pub fn clamp_to_world(pos: &Position) -> Position {
    Position::new(
        pos.x.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
        pos.y.clamp(0.0, WORLD_MAX_ALTITUDE),
        pos.z.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
    )
}

/// Weapon-specific release geometry. Returns the distance reported back to
/// the caller on success.
pub fn check_geometry(
    weapon: WeaponKind,
    uav_pos: &Position,
    target_pos: &Position,
) -> Result<f64, FireError> {
    match weapon {
        WeaponKind::Missile => {
            let distance = uav_pos.distance_to(target_pos);
            if distance > MISSILE_MAX_RANGE {
                return Err(FireError::OutOfRange {
                    weapon,
                    required_distance: MISSILE_MAX_RANGE,
                    current_distance: distance,
                });
            }
            Ok(distance)
        }
        WeaponKind::Bomb => {
            let horizontal = uav_pos.horizontal_distance_to(target_pos);
            if horizontal > BOMB_MAX_HORIZONTAL {
                return Err(FireError::OutOfRange {
                    weapon,
                    required_distance: BOMB_MAX_HORIZONTAL,
                    current_distance: horizontal,
                });
            }
            let drop_height = uav_pos.height_above(target_pos);
            if drop_height < BOMB_MIN_DROP_HEIGHT {
                return Err(FireError::InsufficientDropHeight {
                    required_distance: BOMB_MIN_DROP_HEIGHT,
                    current_distance: drop_height,
                });
            }
            Ok(horizontal)
        }
    }
}

/// Check every firing precondition. Nothing is mutated.
pub fn check_fire(world: &World, ctx: &FireContext) -> Result<FireSolution, FireError> {
    if ctx.uav.is_crashed {
        return Err(FireError::Crashed);
    }
    if ctx.mission_status != MissionStatus::Active {
        return Err(FireError::MissionNotActive {
            status: ctx.mission_status,
        });
    }
    if ctx.uav.mode != DroneMode::Attack {
        return Err(FireError::WrongMode);
    }
    let status = ctx.targeting.lock_status;
    let target_id = match (status, ctx.targeting.locked_target_id) {
        (LockStatus::Locked, Some(id)) => id,
        _ => return Err(FireError::NotLocked { status }),
    };
    let weapon = ctx.loadout.selected;
    if ammo_for(&ctx.loadout.ammo, weapon) == 0 {
        return Err(FireError::NoAmmo { weapon });
    }
    let target = detection::lookup(world, target_id)
        .filter(|t| !t.status.destroyed)
        .ok_or(FireError::TargetLost)?;

    let distance = check_geometry(weapon, &ctx.uav.position, &target.position)?;
    Ok(FireSolution {
        weapon,
        target_id,
        aim_point: clamp_to_world(&target.position),
        distance,
    })
}

/// Advance munitions in flight and resolve impacts. Returns the ids of
/// targets destroyed this tick.
pub fn advance_munitions(
    world: &mut World,
    dt: f64,
    destroyed: &mut TypeCounts,
    events: &mut Vec<SimEvent>,
) -> Vec<u32> {
    let mut impacts: Vec<(hecs::Entity, u32)> = Vec::new();

    for (entity, (_munition, state, pos)) in
        world.query_mut::<(&Munition, &mut MunitionState, &mut Position)>()
    {
        if state.impacted {
            continue;
        }
        state.flight_progress = (state.flight_progress + flight_rate(state.weapon) * dt).min(1.0);
        *pos = state
            .start_position
            .lerp(&state.target_position, state.flight_progress);
        if state.flight_progress >= 1.0 {
            state.impacted = true;
            impacts.push((entity, state.target_id));
        }
    }

    let mut kills = Vec::new();
    for (entity, target_id) in impacts {
        let mut newly_destroyed = false;
        detection::update_status(world, target_id, |status| {
            if !status.destroyed {
                status.destroyed = true;
                newly_destroyed = true;
            }
        });
        if newly_destroyed {
            if let Some(target) = detection::lookup(world, target_id) {
                destroyed.increment(target.info.kind);
                info!(target_id, kind = ?target.info.kind, "target destroyed");
                events.push(SimEvent::TargetDestroyed {
                    target_id,
                    kind: target.info.kind,
                });
                kills.push(target_id);
            }
        }
        let _ = world.despawn(entity);
    }
    kills
}

pub fn munitions_in_flight(world: &World) -> usize {
    world.query::<&Munition>().iter().count()
}

/// True when the world has targets and every one of them is destroyed.
pub fn all_targets_destroyed(world: &World) -> bool {
    let targets = detection::all_targets(world);
    !targets.is_empty() && targets.iter().all(|t| t.status.destroyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_setup::{spawn_munition, spawn_target};
    use sortie_core::enums::TargetType;

    fn locked_on(target_id: u32) -> TargetingSession {
        TargetingSession {
            locked_target_id: Some(target_id),
            lock_status: LockStatus::Locked,
            lock_timer: 2.5,
            max_lock_time: 2.5,
        }
    }

    fn attack_uav(position: Position) -> UavState {
        UavState {
            position,
            mode: DroneMode::Attack,
            spawned: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_missile_range_check() {
        let target = Position::new(0.0, 0.0, 0.0);
        assert!(check_geometry(WeaponKind::Missile, &Position::new(15.0, 0.0, 0.0), &target).is_ok());
        let err = check_geometry(WeaponKind::Missile, &Position::new(0.0, 25.0, 0.0), &target)
            .unwrap_err();
        assert_eq!(err.required_distance(), Some(20.0));
        assert!((err.current_distance().unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_bomb_needs_overhead_and_height() {
        let target = Position::new(0.0, 0.0, 0.0);
        assert!(check_geometry(WeaponKind::Bomb, &Position::new(3.0, 20.0, 0.0), &target).is_ok());
        assert!(matches!(
            check_geometry(WeaponKind::Bomb, &Position::new(12.0, 20.0, 0.0), &target),
            Err(FireError::OutOfRange { .. })
        ));
        assert!(matches!(
            check_geometry(WeaponKind::Bomb, &Position::new(0.0, 10.0, 0.0), &target),
            Err(FireError::InsufficientDropHeight { .. })
        ));
    }

    #[test]
    fn test_fire_requires_lock() {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Tank, Position::new(0.0, 0.0, 0.0));
        let uav = attack_uav(Position::new(0.0, 15.0, 0.0));
        let targeting = TargetingSession::default();
        let loadout = WeaponLoadout::default();
        let ctx = FireContext {
            uav: &uav,
            mission_status: MissionStatus::Active,
            targeting: &targeting,
            loadout: &loadout,
        };
        assert!(matches!(
            check_fire(&world, &ctx),
            Err(FireError::NotLocked {
                status: LockStatus::Inactive
            })
        ));
    }

    #[test]
    fn test_fire_requires_ammo() {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Tank, Position::new(0.0, 0.0, 0.0));
        let uav = attack_uav(Position::new(0.0, 15.0, 0.0));
        let targeting = locked_on(1);
        let loadout = WeaponLoadout {
            selected: WeaponKind::Missile,
            ammo: AmmoCount {
                missile: 0,
                bomb: 2,
            },
        };
        let ctx = FireContext {
            uav: &uav,
            mission_status: MissionStatus::Active,
            targeting: &targeting,
            loadout: &loadout,
        };
        assert_eq!(
            check_fire(&world, &ctx).unwrap_err(),
            FireError::NoAmmo {
                weapon: WeaponKind::Missile
            }
        );
    }

    #[test]
    fn test_fire_solution_clamps_aim_point() {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Tank, Position::new(105.0, 0.0, 0.0));
        let uav = attack_uav(Position::new(100.0, 15.0, 0.0));
        let targeting = locked_on(1);
        let loadout = WeaponLoadout::default();
        let ctx = FireContext {
            uav: &uav,
            mission_status: MissionStatus::Active,
            targeting: &targeting,
            loadout: &loadout,
        };
        let solution = check_fire(&world, &ctx).unwrap();
        assert_eq!(solution.target_id, 1);
        assert_eq!(solution.aim_point.x, WORLD_HALF_EXTENT);
    }

    #[test]
    fn test_impact_destroys_target_exactly_once() {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Tank, Position::new(10.0, 0.0, 0.0));
        for id in 1..=2 {
            spawn_munition(
                &mut world,
                MunitionState {
                    id,
                    weapon: WeaponKind::Missile,
                    target_id: 1,
                    start_position: Position::new(0.0, 10.0, 0.0),
                    target_position: Position::new(10.0, 0.0, 0.0),
                    flight_progress: 0.95,
                    impacted: false,
                },
            );
        }
        let mut destroyed = TypeCounts::default();
        let mut events = Vec::new();

        let kills = advance_munitions(&mut world, 0.1, &mut destroyed, &mut events);
        assert_eq!(kills, vec![1]);
        assert_eq!(destroyed.tank, 1);
        assert_eq!(munitions_in_flight(&world), 0);

        let kills = advance_munitions(&mut world, 0.1, &mut destroyed, &mut events);
        assert!(kills.is_empty());
        assert_eq!(destroyed.tank, 1);
        assert!(all_targets_destroyed(&world));
    }

    #[test]
    fn test_munition_flies_at_weapon_rate() {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Tank, Position::new(10.0, 0.0, 0.0));
        let entity = spawn_munition(
            &mut world,
            MunitionState {
                id: 1,
                weapon: WeaponKind::Bomb,
                target_id: 1,
                start_position: Position::new(10.0, 20.0, 0.0),
                target_position: Position::new(10.0, 0.0, 0.0),
                flight_progress: 0.0,
                impacted: false,
            },
        );
        let mut destroyed = TypeCounts::default();
        let mut events = Vec::new();
        advance_munitions(&mut world, 0.5, &mut destroyed, &mut events);

        let state = world.get::<&MunitionState>(entity).unwrap();
        assert!((state.flight_progress - 0.4).abs() < 1e-9);
        let pos = world.get::<&Position>(entity).unwrap();
        assert!((pos.y - 12.0).abs() < 1e-9);
    }
}
