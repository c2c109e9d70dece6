//! Targeting and lock-on (attack mode).
//!
//! Inactive → Seeking → Locked. The lock timer only runs while seeking and
//! is clamped at the session's max lock time.

use hecs::World;
use tracing::debug;

use sortie_core::components::TargetingSession;
use sortie_core::constants::LOCK_BREAK_RANGE;
use sortie_core::enums::LockStatus;
use sortie_core::events::SimEvent;
use sortie_core::types::Position;

use crate::systems::detection;

/// Enter Seeking against `target_id` with a fresh timer.
pub fn begin(session: &mut TargetingSession, target_id: u32) {
    session.locked_target_id = Some(target_id);
    session.lock_status = LockStatus::Seeking;
    session.lock_timer = 0.0;
}

/// Back to Inactive. The configured max lock time is kept.
pub fn reset(session: &mut TargetingSession) {
    session.locked_target_id = None;
    session.lock_status = LockStatus::Inactive;
    session.lock_timer = 0.0;
}

/// True while a target is selected.
pub fn is_engaging(session: &TargetingSession) -> bool {
    session.lock_status != LockStatus::Inactive
}

/// Advance the lock state machine for one tick.
pub fn run(
    world: &World,
    session: &mut TargetingSession,
    uav_pos: &Position,
    dt: f64,
    events: &mut Vec<SimEvent>,
) {
    let Some(target_id) = session.locked_target_id else {
        return;
    };
    if session.lock_status == LockStatus::Inactive {
        return;
    }

    let still_valid = detection::lookup(world, target_id).is_some_and(|target| {
        !target.status.destroyed && target.position.distance_to(uav_pos) <= LOCK_BREAK_RANGE
    });
    if !still_valid {
        reset(session);
        debug!(target_id, "lock lost");
        events.push(SimEvent::LockLost { target_id });
        return;
    }

    if session.lock_status == LockStatus::Seeking {
        session.lock_timer = (session.lock_timer + dt).min(session.max_lock_time);
        if session.lock_timer >= session.max_lock_time {
            session.lock_status = LockStatus::Locked;
            debug!(target_id, "lock acquired");
            events.push(SimEvent::LockAcquired { target_id });
        }
    }
}
