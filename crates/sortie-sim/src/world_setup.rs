//! Entity spawn factories for setting up the mission world.
//!
//! The world is small and fixed: a handful of ground targets of each type,
//! a few air-defense emplacements, and a base the UAV launches from.

use hecs::World;
use serde::{Deserialize, Serialize};

use sortie_core::components::*;
use sortie_core::constants::BASE_POSITION;
use sortie_core::enums::*;
use sortie_core::types::{Position, Velocity};

/// A ground target to place at mission setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    pub kind: TargetType,
    pub position: Position,
}

/// An air-defense emplacement to place at mission setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenseSiteSpec {
    pub weapon: DefenseWeapon,
    pub position: Position,
}

/// Static description of the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldLayout {
    pub base: Position,
    pub targets: Vec<TargetSpec>,
    pub defense_sites: Vec<DefenseSiteSpec>,
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self::default_world()
    }
}

impl WorldLayout {
    /// The built-in world: two targets of each type and two defended areas.
    pub fn default_world() -> Self {
        let target = |kind, x, y, z| TargetSpec {
            kind,
            position: Position::new(x, y, z),
        };
        Self {
            base: BASE_POSITION,
            targets: vec![
                target(TargetType::Tank, 40.0, 19.0, 16.0),
                target(TargetType::Tank, -55.0, 8.0, 30.0),
                target(TargetType::Jeep, 25.0, 12.0, -45.0),
                target(TargetType::Jeep, -20.0, 6.0, -60.0),
                target(TargetType::Warehouse, 60.0, 15.0, -20.0),
                target(TargetType::Warehouse, -70.0, 10.0, -35.0),
                target(TargetType::Soldier, 15.0, 5.0, 55.0),
                target(TargetType::Soldier, -35.0, 4.0, 65.0),
            ],
            defense_sites: vec![
                DefenseSiteSpec {
                    weapon: DefenseWeapon::Missile,
                    position: Position::new(85.0, 14.0, 70.0),
                },
                DefenseSiteSpec {
                    weapon: DefenseWeapon::Gun,
                    position: Position::new(-85.0, 9.0, -5.0),
                },
            ],
        }
    }

    /// A world with a base and nothing else.
    pub fn empty() -> Self {
        Self {
            base: BASE_POSITION,
            targets: Vec::new(),
            defense_sites: Vec::new(),
        }
    }

    pub fn with_target(mut self, kind: TargetType, position: Position) -> Self {
        self.targets.push(TargetSpec { kind, position });
        self
    }

    pub fn with_defense_site(mut self, weapon: DefenseWeapon, position: Position) -> Self {
        self.defense_sites.push(DefenseSiteSpec { weapon, position });
        self
    }
}

/// Clear the world and spawn every entity the layout describes.
/// Target and site ids are assigned in layout order, starting at 1.
pub fn populate(world: &mut World, layout: &WorldLayout) {
    world.clear();
    for (index, spec) in layout.targets.iter().enumerate() {
        spawn_target(world, index as u32 + 1, spec.kind, spec.position);
    }
    for (index, spec) in layout.defense_sites.iter().enumerate() {
        spawn_defense_site(world, index as u32 + 1, spec.weapon, spec.position);
    }
}

/// Spawn a ground target. Targets start undetected.
pub fn spawn_target(
    world: &mut World,
    id: u32,
    kind: TargetType,
    position: Position,
) -> hecs::Entity {
    world.spawn((
        GroundTarget,
        TargetInfo { id, kind },
        position,
        TargetStatus::default(),
    ))
}

/// Spawn an idle air-defense emplacement.
pub fn spawn_defense_site(
    world: &mut World,
    id: u32,
    weapon: DefenseWeapon,
    position: Position,
) -> hecs::Entity {
    world.spawn((
        DefenseSite,
        Emplacement {
            id,
            weapon,
            phase: EmplacementPhase::Idle,
            phase_elapsed_secs: 0.0,
            shots_fired: 0,
        },
        position,
    ))
}

/// Spawn a player munition at the release point.
pub fn spawn_munition(world: &mut World, state: MunitionState) -> hecs::Entity {
    let position = state.start_position;
    world.spawn((Munition, state, position))
}

/// Spawn a hostile round leaving an emplacement.
pub fn spawn_hostile_round(
    world: &mut World,
    site_id: u32,
    weapon: DefenseWeapon,
    position: Position,
    velocity: Velocity,
) -> hecs::Entity {
    world.spawn((
        HostileRound,
        HostileRoundState {
            site_id,
            weapon,
            age_secs: 0.0,
        },
        position,
        velocity,
    ))
}
