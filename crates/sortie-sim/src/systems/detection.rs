//! Proximity detection of ground targets, plus target lookups shared by
//! the hover, targeting, and weapons systems.

use hecs::World;
use tracing::debug;

use sortie_core::components::{GroundTarget, TargetInfo, TargetStatus};
use sortie_core::constants::DETECTION_RADIUS;
use sortie_core::events::SimEvent;
use sortie_core::types::Position;

/// Read-only copy of one ground target.
#[derive(Debug, Clone, Copy)]
pub struct TargetRecord {
    pub info: TargetInfo,
    pub position: Position,
    pub status: TargetStatus,
}

/// Mark every target within detection range of the UAV as detected.
pub fn run(world: &mut World, uav_pos: &Position, events: &mut Vec<SimEvent>) {
    for (_entity, (_target, info, pos, status)) in
        world.query_mut::<(&GroundTarget, &TargetInfo, &Position, &mut TargetStatus)>()
    {
        if status.detected || status.destroyed {
            continue;
        }
        if pos.horizontal_distance_to(uav_pos) <= DETECTION_RADIUS {
            status.detected = true;
            debug!(target_id = info.id, kind = ?info.kind, "target detected");
            events.push(SimEvent::TargetDetected {
                target_id: info.id,
                kind: info.kind,
            });
        }
    }
}

/// Find a target by id.
pub fn lookup(world: &World, target_id: u32) -> Option<TargetRecord> {
    world
        .query::<(&GroundTarget, &TargetInfo, &Position, &TargetStatus)>()
        .iter()
        .find(|(_, (_, info, _, _))| info.id == target_id)
        .map(|(_, (_, info, pos, status))| TargetRecord {
            info: *info,
            position: *pos,
            status: *status,
        })
}

/// Nearest target (horizontally) to `point` within `radius` that passes `filter`.
pub fn nearest(
    world: &World,
    point: &Position,
    radius: f64,
    filter: impl Fn(&TargetStatus) -> bool,
) -> Option<TargetRecord> {
    world
        .query::<(&GroundTarget, &TargetInfo, &Position, &TargetStatus)>()
        .iter()
        .filter(|(_, (_, _, _, status))| filter(*status))
        .map(|(_, (_, info, pos, status))| {
            let record = TargetRecord {
                info: *info,
                position: *pos,
                status: *status,
            };
            (pos.horizontal_distance_to(point), record)
        })
        .filter(|(distance, _)| *distance <= radius)
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.info.id.cmp(&b.1.info.id)))
        .map(|(_, record)| record)
}

/// All targets, ordered by id.
pub fn all_targets(world: &World) -> Vec<TargetRecord> {
    let mut targets: Vec<TargetRecord> = world
        .query::<(&GroundTarget, &TargetInfo, &Position, &TargetStatus)>()
        .iter()
        .map(|(_, (_, info, pos, status))| TargetRecord {
            info: *info,
            position: *pos,
            status: *status,
        })
        .collect();
    targets.sort_by_key(|t| t.info.id);
    targets
}

/// Apply `f` to the status of the target with `target_id`. Returns false
/// when no such target exists.
pub fn update_status(world: &mut World, target_id: u32, f: impl FnOnce(&mut TargetStatus)) -> bool {
    for (_entity, (info, status)) in world.query_mut::<(&TargetInfo, &mut TargetStatus)>() {
        if info.id == target_id {
            f(status);
            return true;
        }
    }
    false
}
