use sortie_core::commands::{MissionConfig, PlayerCommand};
use sortie_core::components::AmmoCount;
use sortie_core::constants::*;
use sortie_core::enums::*;
use sortie_core::events::SimEvent;
use sortie_core::state::SimSnapshot;
use sortie_core::types::Position;
use sortie_sim::world_setup::WorldLayout;
use sortie_sim::{ClickOutcome, SimConfig, SimulationEngine};
use sortie_terrain::FlatGround;

/// One target of each type, arranged so every orbit sits at cruise altitude.
fn sweep_layout() -> WorldLayout {
    WorldLayout::empty()
        .with_target(TargetType::Tank, Position::new(15.0, 15.0, 0.0))
        .with_target(TargetType::Jeep, Position::new(-15.0, 15.0, 0.0))
        .with_target(TargetType::Warehouse, Position::new(0.0, 15.0, 20.0))
        .with_target(TargetType::Soldier, Position::new(0.0, 20.0, -15.0))
}

fn run_until(
    engine: &mut SimulationEngine,
    max_secs: f64,
    mut done: impl FnMut(&SimSnapshot) -> bool,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..(max_secs * TICK_RATE as f64) as usize {
        let snap = engine.tick();
        events.extend(snap.events.iter().cloned());
        if done(&snap) {
            break;
        }
    }
    events
}

#[test]
fn surveillance_sweep_completes_on_return() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 3,
        layout: sweep_layout(),
    });
    engine
        .start_mission(MissionConfig {
            max_time_secs: 60.0,
            return_threshold_secs: 20.0,
            speed: 20.0,
            ..Default::default()
        })
        .unwrap();

    let mut events = Vec::new();
    for _ in 0..(70 * TICK_RATE) {
        let snap = engine.tick();
        events.extend(snap.events.iter().cloned());
        if snap.mission.status.is_terminal() {
            break;
        }
        // Autopilot: click the next unsurveilled target whenever idle.
        if snap.hover.is_none() && !snap.mission.returning && !snap.uav.is_crashed {
            if let Some(next) = snap.targets.iter().find(|t| !t.surveilled) {
                let _ = engine.terrain_click(next.position);
            }
        }
    }

    assert_eq!(engine.mission().status, MissionStatus::Completed);
    assert!(engine.surveilled().covers_all_types());
    let completions = events
        .iter()
        .filter(|e| matches!(e, SimEvent::HoverCompleted { .. }))
        .count();
    assert_eq!(completions, 4);
    assert!(events.iter().any(|e| matches!(e, SimEvent::ReturningToBase)));
    assert!(engine.uav().battery > 0.0);
}

#[test]
fn attack_run_destroys_last_target_and_wins() {
    let layout = WorldLayout::empty().with_target(TargetType::Tank, Position::new(9.0, 18.0, 0.0));
    let mut engine = SimulationEngine::new(SimConfig { seed: 5, layout });
    engine
        .start_mission(MissionConfig {
            mode: DroneMode::Attack,
            ..Default::default()
        })
        .unwrap();

    // Detection needs one tick over the target.
    engine.tick();
    let outcome = engine.terrain_click(Position::new(9.0, 18.0, 0.0)).unwrap();
    assert_eq!(outcome, ClickOutcome::LockStarted { target_id: 1 });

    run_until(&mut engine, 5.0, |s| s.targeting.lock_status == LockStatus::Locked);
    assert_eq!(engine.targeting().lock_status, LockStatus::Locked);

    let report = engine.fire_weapon().unwrap();
    assert_eq!(report.weapon, WeaponKind::Missile);
    assert_eq!(report.ammo_remaining, DEFAULT_MISSILE_AMMO - 1);

    let events = run_until(&mut engine, 5.0, |s| s.mission.status.is_terminal());
    assert_eq!(engine.mission().status, MissionStatus::Completed);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::TargetDestroyed {
            target_id: 1,
            kind: TargetType::Tank
        }
    )));
    assert_eq!(engine.destroyed().tank, 1);
}

#[test]
fn descending_into_terrain_fails_after_delay() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 9,
        layout: WorldLayout::empty(),
    })
    .with_ground(FlatGround::new(20.0));
    engine.start_mission(MissionConfig::default()).unwrap();
    engine
        .set_target_position(Position::new(40.0, 20.5, 0.0))
        .unwrap();

    let events = run_until(&mut engine, 10.0, |s| s.uav.is_crashed);
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::Crashed {
            reason: CrashReason::TerrainCollision
        }
    )));
    let crash_time = engine.time().elapsed_secs;
    assert_eq!(engine.mission().status, MissionStatus::Active);

    let events = run_until(&mut engine, 10.0, |s| s.mission.status.is_terminal());
    assert_eq!(engine.mission().status, MissionStatus::Failed);
    assert_eq!(
        engine.mission().fail_reason.as_deref(),
        Some("Terrain Collision")
    );
    assert!(engine.time().elapsed_secs - crash_time >= CRASH_FAILURE_DELAY_SECS - 1e-9);
    let resolutions = events
        .iter()
        .filter(|e| matches!(e, SimEvent::MissionResolved { .. }))
        .count();
    assert_eq!(resolutions, 1);
}

#[test]
fn guided_missile_site_shoots_down_loitering_uav() {
    let layout =
        WorldLayout::empty().with_defense_site(DefenseWeapon::Missile, Position::new(30.0, 10.0, 0.0));
    let mut engine = SimulationEngine::new(SimConfig { seed: 11, layout });
    engine.start_mission(MissionConfig::default()).unwrap();

    let events = run_until(&mut engine, 10.0, |s| s.uav.is_crashed);
    assert_eq!(
        engine.uav().crash_reason,
        Some(CrashReason::ShotDown(DefenseWeapon::Missile))
    );
    assert!(events.iter().any(|e| matches!(
        e,
        SimEvent::DefenseFired {
            weapon: DefenseWeapon::Missile,
            ..
        }
    )));

    // Site stands down once the UAV is down.
    let snap = engine.tick();
    assert!(snap
        .defense_sites
        .iter()
        .all(|site| site.phase != EmplacementPhase::Tracking));
}

#[test]
fn json_commands_drive_the_engine() {
    let commands: Vec<PlayerCommand> = serde_json::from_str(
        r#"[
            {"type": "TerrainClick", "point": {"x": 10.0, "y": 10.0, "z": 10.0}},
            {"type": "StartMission", "config": {"mode": "attack", "max_time_secs": 120.0}},
            {"type": "SetThermalVision", "enabled": true},
            {"type": "SetTargetPosition", "position": {"x": 30.0, "y": 30.0, "z": 10.0}}
        ]"#,
    )
    .unwrap();

    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands(commands);
    let snap = engine.tick();

    assert_eq!(snap.mission.status, MissionStatus::Active);
    assert_eq!(snap.mission.max_time, 120.0);
    assert_eq!(snap.uav.mode, DroneMode::Attack);
    assert!(snap.uav.thermal_vision);
    assert_eq!(snap.uav.target_position, Some(Position::new(30.0, 30.0, 10.0)));
    assert!(snap.events.iter().any(|e| matches!(e, SimEvent::Spawned { .. })));
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::CommandRejected { .. })));
}

#[test]
fn reset_mid_mission_discards_pending_failure() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.start_mission(MissionConfig::default()).unwrap();
    engine.tick();
    engine.set_battery(0.0);
    assert!(engine.uav().is_crashed);

    engine.queue_command(PlayerCommand::ResetMission);
    let snap = engine.tick();
    assert_eq!(snap.mission.status, MissionStatus::Planning);
    assert_eq!(snap.uav.battery, BATTERY_MAX);
    assert!(snap.events.iter().any(|e| matches!(e, SimEvent::MissionReset)));

    engine.start_mission(MissionConfig::default()).unwrap();
    run_until(&mut engine, CRASH_FAILURE_DELAY_SECS + 2.0, |_| false);
    assert_eq!(engine.mission().status, MissionStatus::Active);
    assert!(!engine.uav().is_crashed);
}

#[test]
fn last_missile_kill_with_bombs_left_returns_home() {
    let layout = WorldLayout::empty()
        .with_target(TargetType::Tank, Position::new(9.0, 18.0, 0.0))
        .with_target(TargetType::Jeep, Position::new(-80.0, 5.0, -80.0));
    let mut engine = SimulationEngine::new(SimConfig { seed: 13, layout });
    engine
        .start_mission(MissionConfig {
            mode: DroneMode::Attack,
            ammo: AmmoCount { missile: 1, bomb: 2 },
            ..Default::default()
        })
        .unwrap();

    engine.tick();
    engine.begin_target_lock(1).unwrap();
    run_until(&mut engine, 5.0, |s| s.targeting.lock_status == LockStatus::Locked);
    let report = engine.fire_weapon().unwrap();
    assert_eq!(report.ammo_remaining, 0);

    let events = run_until(&mut engine, 10.0, |s| s.mission.status.is_terminal());
    assert!(events.iter().any(|e| matches!(e, SimEvent::ReturningToBase)));
    assert_eq!(engine.mission().status, MissionStatus::Completed);
    assert_eq!(engine.loadout().ammo.bomb, 2);
}
