//! Scripted pilot for headless runs.
//!
//! Surveillance: orbit every unsurveilled target in id order.
//! Attack: fly over the nearest live target, lock it, and fire until the
//! mission resolves or the magazine is empty.

use tracing::debug;

use sortie_core::enums::{DroneMode, LockStatus, WeaponKind};
use sortie_core::error::FireError;
use sortie_core::state::{SimSnapshot, TargetView};
use sortie_core::types::Position;
use sortie_sim::SimulationEngine;

/// Height above a target the pilot holds while attacking.
const MISSILE_STANDOFF: f64 = 12.0;
const BOMB_STANDOFF: f64 = 18.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    /// Point the UAV was last sent to, so moves are only issued on change.
    heading_for: Option<Position>,
}

impl Autopilot {
    /// Issue commands for the coming tick based on the latest snapshot.
    pub fn step(&mut self, engine: &mut SimulationEngine, snap: &SimSnapshot) {
        if snap.uav.is_crashed || snap.mission.returning || !snap.uav.spawned {
            return;
        }
        match snap.uav.mode {
            DroneMode::Surveillance => self.survey(engine, snap),
            DroneMode::Attack => self.attack(engine, snap),
        }
    }

    fn survey(&mut self, engine: &mut SimulationEngine, snap: &SimSnapshot) {
        if snap.hover.is_some() {
            self.heading_for = None;
            return;
        }
        let Some(next) = snap.targets.iter().find(|t| !t.surveilled && !t.destroyed) else {
            return;
        };
        // Cooldown rejections are expected; retry next tick.
        if let Err(e) = engine.terrain_click(next.position) {
            debug!(target_id = next.id, error = %e, "selection deferred");
        }
    }

    fn attack(&mut self, engine: &mut SimulationEngine, snap: &SimSnapshot) {
        if snap.loadout.ammo.missile == 0 && snap.loadout.ammo.bomb == 0 {
            return;
        }
        if snap.loadout.ammo.missile == 0 && snap.loadout.selected == WeaponKind::Missile {
            let _ = engine.select_weapon(WeaponKind::Bomb);
        }
        // Let a released munition land before committing another one.
        if !snap.munitions.is_empty() {
            return;
        }

        let Some(target) = nearest_live(snap) else {
            return;
        };
        let standoff = match engine.loadout().selected {
            WeaponKind::Missile => MISSILE_STANDOFF,
            WeaponKind::Bomb => BOMB_STANDOFF,
        };
        let station = Position::new(
            target.position.x,
            target.position.y + standoff,
            target.position.z,
        );

        match snap.targeting.lock_status {
            LockStatus::Inactive => {
                if target.detected && engine.begin_target_lock(target.id).is_ok() {
                    return;
                }
                self.fly_to(engine, station);
            }
            LockStatus::Seeking => self.fly_to(engine, station),
            LockStatus::Locked => match engine.fire_weapon() {
                Ok(report) => {
                    debug!(target_id = report.target_id, ammo = report.ammo_remaining, "released");
                }
                Err(FireError::OutOfRange { .. } | FireError::InsufficientDropHeight { .. }) => {
                    self.fly_to(engine, station);
                }
                Err(e) => debug!(error = %e, "fire refused"),
            },
        }
    }

    fn fly_to(&mut self, engine: &mut SimulationEngine, point: Position) {
        if self.heading_for == Some(point) && engine.uav().target_position.is_some() {
            return;
        }
        if engine.set_target_position(point).is_ok() {
            self.heading_for = Some(point);
        }
    }
}

fn nearest_live(snap: &SimSnapshot) -> Option<&TargetView> {
    let uav = snap.uav.position;
    snap.targets
        .iter()
        .filter(|t| !t.destroyed)
        .min_by(|a, b| {
            a.position
                .horizontal_distance_to(&uav)
                .total_cmp(&b.position.horizontal_distance_to(&uav))
        })
}
