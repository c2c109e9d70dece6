//! Hover/detection controller (surveillance mode).
//!
//! Idle → Hovering → Complete → Cooldown → Idle. While a session is active
//! the orbit drives the UAV instead of its commanded target point.

use std::f64::consts::TAU;

use hecs::World;
use tracing::{info, warn};

use sortie_core::components::{HoverSession, TargetStatus, UavState};
use sortie_core::constants::HOVER_COOLDOWN_SECS;
use sortie_core::events::SimEvent;
use sortie_core::types::{Position, TypeCounts};

use crate::profiles::get_profile;
use crate::systems::detection::{self, TargetRecord};
use crate::systems::flight;

/// Hover session plus the cooldown that follows a completion.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    pub session: Option<HoverSession>,
    /// No new session may start before this sim time.
    pub cooldown_until_secs: f64,
}

impl HoverState {
    pub fn in_cooldown(&self, now_secs: f64) -> bool {
        now_secs < self.cooldown_until_secs
    }

    pub fn is_hovering(&self) -> bool {
        self.session.is_some()
    }

    /// Drop any active session. The cooldown is left as is.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

/// Targets that can still be surveilled.
pub fn eligible(status: &TargetStatus) -> bool {
    !status.surveilled && !status.destroyed
}

/// True when `uav_pos` sits inside the target type's trigger band.
pub fn in_trigger_band(target: &TargetRecord, uav_pos: &Position) -> bool {
    let profile = get_profile(target.info.kind);
    let horizontal = uav_pos.horizontal_distance_to(&target.position);
    let height = uav_pos.height_above(&target.position);
    horizontal <= profile.trigger_radius
        && (profile.trigger_min_height..=profile.trigger_max_height).contains(&height)
}

/// Nearest eligible target whose trigger band contains the UAV.
pub fn find_trigger(world: &World, uav_pos: &Position) -> Option<TargetRecord> {
    detection::all_targets(world)
        .into_iter()
        .filter(|t| eligible(&t.status) && in_trigger_band(t, uav_pos))
        .min_by(|a, b| {
            a.position
                .horizontal_distance_to(uav_pos)
                .total_cmp(&b.position.horizontal_distance_to(uav_pos))
        })
}

/// Build a fresh session over `target`, entering the orbit at the UAV's
/// current bearing from the target.
pub fn new_session(target: &TargetRecord, uav_pos: &Position) -> HoverSession {
    let profile = get_profile(target.info.kind);
    let dx = uav_pos.x - target.position.x;
    let dz = uav_pos.z - target.position.z;
    let orbit_angle = if dx.hypot(dz) > 1e-6 { dz.atan2(dx) } else { 0.0 };

    HoverSession {
        target_id: target.info.id,
        target_kind: target.info.kind,
        center: target.position,
        orbit_angle,
        orbit_radius: profile.orbit_radius,
        orbit_height: profile.orbit_height,
        orbit_speed: profile.orbit_speed,
        dwell_accumulated: 0.0,
        dwell_required: profile.dwell_required,
    }
}

/// Point on the orbit at the session's current angle.
pub fn orbit_point(session: &HoverSession) -> Position {
    Position::new(
        session.center.x + session.orbit_radius * session.orbit_angle.cos(),
        session.center.y + session.orbit_height,
        session.center.z + session.orbit_radius * session.orbit_angle.sin(),
    )
}

/// Start a session over `target`. The commanded target point is dropped.
pub fn start(
    hover: &mut HoverState,
    target: &TargetRecord,
    uav: &mut UavState,
    events: &mut Vec<SimEvent>,
) {
    hover.session = Some(new_session(target, &uav.position));
    uav.target_position = None;
    info!(target_id = target.info.id, kind = ?target.info.kind, "hover started");
    events.push(SimEvent::HoverStarted {
        target_id: target.info.id,
    });
}

/// Run the hover controller for one tick. Returns true while a session
/// is driving the UAV.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    hover: &mut HoverState,
    uav: &mut UavState,
    surveilled: &mut TypeCounts,
    allow_trigger: bool,
    now_secs: f64,
    dt: f64,
    events: &mut Vec<SimEvent>,
) -> bool {
    if hover.session.is_none() && allow_trigger && !hover.in_cooldown(now_secs) {
        if let Some(target) = find_trigger(world, &uav.position) {
            start(hover, &target, uav, events);
        }
    }

    let Some(session) = hover.session.as_mut() else {
        return false;
    };

    // Target may have been completed or destroyed since the session began.
    let Some(target) = detection::lookup(world, session.target_id).filter(|t| eligible(&t.status))
    else {
        hover.cancel();
        return false;
    };

    session.orbit_angle = (session.orbit_angle + session.orbit_speed * dt).rem_euclid(TAU);
    let aim = orbit_point(session);
    match flight::step_toward(&uav.position, &aim, uav.speed, dt) {
        Some(step) => flight::apply_step(uav, &step, dt),
        None => warn!(
            target_id = session.target_id,
            orbit_point = ?aim,
            "non-finite orbit step discarded"
        ),
    }

    // Dwell only counts once the UAV is on station.
    if in_trigger_band(&target, &uav.position) {
        session.dwell_accumulated += dt;
    }

    if session.dwell_accumulated >= session.dwell_required {
        let target_id = session.target_id;
        let kind = session.target_kind;
        detection::update_status(world, target_id, |status| status.surveilled = true);
        surveilled.increment(kind);
        hover.session = None;
        hover.cooldown_until_secs = now_secs + HOVER_COOLDOWN_SECS;
        info!(target_id, kind = ?kind, "surveillance complete");
        events.push(SimEvent::HoverCompleted { target_id, kind });
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_setup::spawn_target;
    use sortie_core::enums::TargetType;

    fn tank_world() -> World {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Tank, Position::new(40.0, 19.0, 16.0));
        world
    }

    fn uav_at(position: Position) -> UavState {
        UavState {
            position,
            spawned: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_trigger_band_by_type() {
        let mut world = World::new();
        spawn_target(&mut world, 1, TargetType::Soldier, Position::new(0.0, 0.0, 0.0));
        let soldier = detection::lookup(&world, 1).unwrap();

        // Vehicle band would accept 20 above; soldier band stops at 15.
        assert!(!in_trigger_band(&soldier, &Position::new(0.0, 20.0, 0.0)));
        assert!(in_trigger_band(&soldier, &Position::new(5.0, 10.0, 0.0)));
        assert!(!in_trigger_band(&soldier, &Position::new(12.0, 10.0, 0.0)));
    }

    #[test]
    fn test_orbit_point_stays_on_station() {
        let world = tank_world();
        let tank = detection::lookup(&world, 1).unwrap();
        let mut session = new_session(&tank, &Position::new(40.0, 30.0, 16.0));
        for _ in 0..10 {
            session.orbit_angle += 0.7;
            assert!(in_trigger_band(&tank, &orbit_point(&session)));
        }
    }

    #[test]
    fn test_auto_trigger_and_complete() {
        let mut world = tank_world();
        let mut hover = HoverState::default();
        let mut uav = uav_at(Position::new(40.0, 30.0, 16.0));
        let mut surveilled = TypeCounts::default();
        let mut events = Vec::new();
        let dt = 0.1;
        let mut now = 0.0;

        let mut last_dwell = 0.0;
        for _ in 0..49 {
            now += dt;
            assert!(run(
                &mut world, &mut hover, &mut uav, &mut surveilled, true, now, dt, &mut events
            ));
            let dwell = hover.session.as_ref().unwrap().dwell_accumulated;
            assert!(dwell >= last_dwell, "dwell must not decrease");
            last_dwell = dwell;
        }
        assert_eq!(surveilled.tank, 0);

        for _ in 0..3 {
            now += dt;
            run(
                &mut world, &mut hover, &mut uav, &mut surveilled, true, now, dt, &mut events,
            );
        }
        assert_eq!(surveilled.tank, 1);
        assert!(hover.session.is_none());
        assert!(hover.in_cooldown(now));
        assert!(detection::lookup(&world, 1).unwrap().status.surveilled);
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::HoverCompleted { target_id: 1, .. })));
    }

    #[test]
    fn test_completed_target_does_not_retrigger() {
        let mut world = tank_world();
        detection::update_status(&mut world, 1, |s| s.surveilled = true);
        let mut hover = HoverState::default();
        let mut uav = uav_at(Position::new(40.0, 30.0, 16.0));
        let mut surveilled = TypeCounts::default();
        let mut events = Vec::new();

        let driving = run(
            &mut world, &mut hover, &mut uav, &mut surveilled, true, 10.0, 0.1, &mut events,
        );
        assert!(!driving);
        assert!(hover.session.is_none());
    }

    #[test]
    fn test_cooldown_blocks_trigger() {
        let mut world = tank_world();
        let mut hover = HoverState {
            session: None,
            cooldown_until_secs: 5.0,
        };
        let mut uav = uav_at(Position::new(40.0, 30.0, 16.0));
        let mut surveilled = TypeCounts::default();
        let mut events = Vec::new();

        assert!(!run(
            &mut world, &mut hover, &mut uav, &mut surveilled, true, 4.0, 0.1, &mut events
        ));
        assert!(run(
            &mut world, &mut hover, &mut uav, &mut surveilled, true, 5.0, 0.1, &mut events
        ));
    }

    #[test]
    fn test_destroyed_target_cancels_session() {
        let mut world = tank_world();
        let mut hover = HoverState::default();
        let mut uav = uav_at(Position::new(40.0, 30.0, 16.0));
        let mut surveilled = TypeCounts::default();
        let mut events = Vec::new();

        run(
            &mut world, &mut hover, &mut uav, &mut surveilled, true, 0.1, 0.1, &mut events,
        );
        assert!(hover.is_hovering());
        detection::update_status(&mut world, 1, |s| s.destroyed = true);
        run(
            &mut world, &mut hover, &mut uav, &mut surveilled, true, 0.2, 0.1, &mut events,
        );
        assert!(!hover.is_hovering());
        assert_eq!(surveilled.tank, 0);
    }
}
