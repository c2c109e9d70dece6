//! Crash detection.
//!
//! Three independent checks, in order: terrain clearance, hostile-fire hit,
//! power loss. The first that trips names the crash reason.

use hecs::World;

use sortie_core::components::{HostileRound, HostileRoundState, UavState};
use sortie_core::constants::{DEFENSE_HIT_RADIUS, FALLBACK_MIN_ALTITUDE, TERRAIN_SAFETY_MARGIN};
use sortie_core::enums::CrashReason;
use sortie_core::types::Position;
use sortie_terrain::GroundHeight;

/// Evaluate all crash conditions for a live, spawned UAV.
pub fn detect(
    world: &World,
    uav: &UavState,
    ground: Option<&dyn GroundHeight>,
) -> Option<CrashReason> {
    if uav.is_crashed || !uav.spawned {
        return None;
    }
    if terrain_collision(&uav.position, ground) {
        return Some(CrashReason::TerrainCollision);
    }
    if let Some(reason) = hostile_hit(world, &uav.position) {
        return Some(reason);
    }
    if uav.battery <= 0.0 {
        return Some(CrashReason::BatteryDepleted);
    }
    None
}

/// True when the UAV is too close to the ground below it. Without height
/// data for this point, a fixed minimum altitude applies.
pub fn terrain_collision(position: &Position, ground: Option<&dyn GroundHeight>) -> bool {
    match ground.and_then(|g| g.height_below(position)) {
        Some(height) => position.y - height < TERRAIN_SAFETY_MARGIN,
        None => position.y < FALLBACK_MIN_ALTITUDE,
    }
}

/// The first hostile round within hit radius of the UAV.
fn hostile_hit(world: &World, uav_pos: &Position) -> Option<CrashReason> {
    world
        .query::<(&HostileRound, &HostileRoundState, &Position)>()
        .iter()
        .find(|(_, (_, _, pos))| pos.distance_to(uav_pos) <= DEFENSE_HIT_RADIUS)
        .map(|(_, (_, round, _))| CrashReason::ShotDown(round.weapon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_setup::spawn_hostile_round;
    use sortie_core::enums::DefenseWeapon;
    use sortie_core::types::Velocity;
    use sortie_terrain::FlatGround;

    fn live_uav(position: Position) -> UavState {
        UavState {
            position,
            spawned: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_altitude_without_ground() {
        assert!(terrain_collision(&Position::new(0.0, 11.9, 0.0), None));
        assert!(!terrain_collision(&Position::new(0.0, 12.0, 0.0), None));
    }

    #[test]
    fn test_clearance_against_ground() {
        let ground = FlatGround::new(20.0);
        assert!(terrain_collision(&Position::new(0.0, 21.0, 0.0), Some(&ground)));
        assert!(!terrain_collision(&Position::new(0.0, 23.0, 0.0), Some(&ground)));
    }

    #[test]
    fn test_unspawned_uav_never_crashes() {
        let world = World::new();
        let uav = UavState::default();
        assert_eq!(detect(&world, &uav, None), None);
    }

    #[test]
    fn test_hostile_round_hit_names_weapon() {
        let mut world = World::new();
        let uav = live_uav(Position::new(0.0, 30.0, 0.0));
        spawn_hostile_round(
            &mut world,
            1,
            DefenseWeapon::Missile,
            Position::new(2.0, 30.0, 0.0),
            Velocity::default(),
        );
        assert_eq!(
            detect(&world, &uav, None),
            Some(CrashReason::ShotDown(DefenseWeapon::Missile))
        );
    }

    #[test]
    fn test_distant_round_is_a_miss() {
        let mut world = World::new();
        let uav = live_uav(Position::new(0.0, 30.0, 0.0));
        spawn_hostile_round(
            &mut world,
            1,
            DefenseWeapon::Gun,
            Position::new(10.0, 30.0, 0.0),
            Velocity::default(),
        );
        assert_eq!(detect(&world, &uav, None), None);
    }

    #[test]
    fn test_terrain_checked_before_battery() {
        let world = World::new();
        let mut uav = live_uav(Position::new(0.0, 5.0, 0.0));
        uav.battery = 0.0;
        assert_eq!(
            detect(&world, &uav, None),
            Some(CrashReason::TerrainCollision)
        );
        uav.position.y = 30.0;
        assert_eq!(
            detect(&world, &uav, None),
            Some(CrashReason::BatteryDepleted)
        );
    }
}
