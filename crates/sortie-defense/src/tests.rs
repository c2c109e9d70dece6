use rand::SeedableRng;

use sortie_core::enums::{DefenseWeapon, EmplacementPhase};
use sortie_core::types::{Position, Velocity};

use crate::fsm::{evaluate, EmplacementContext};
use crate::guidance::{lead_aim_point, launch_velocity, sample_aim_error, steer_toward};
use crate::profiles::get_profile;

fn make_context(
    weapon: DefenseWeapon,
    phase: EmplacementPhase,
    elapsed: f64,
    range: f64,
) -> EmplacementContext {
    EmplacementContext {
        weapon,
        phase,
        elapsed_in_phase_secs: elapsed,
        range_to_uav: range,
        line_of_sight: true,
        uav_engageable: true,
    }
}

// ---- FSM ----

#[test]
fn test_idle_to_tracking_in_range() {
    let ctx = make_context(DefenseWeapon::Missile, EmplacementPhase::Idle, 0.0, 30.0);
    let update = evaluate(&ctx);
    assert!(update.phase_changed);
    assert_eq!(update.new_phase, EmplacementPhase::Tracking);
    assert!(!update.fire, "Acquisition must precede the first shot");
}

#[test]
fn test_idle_stays_idle_out_of_range() {
    let range = get_profile(DefenseWeapon::Gun).range + 1.0;
    let ctx = make_context(DefenseWeapon::Gun, EmplacementPhase::Idle, 10.0, range);
    let update = evaluate(&ctx);
    assert!(!update.phase_changed);
    assert_eq!(update.new_phase, EmplacementPhase::Idle);
}

#[test]
fn test_tracking_fires_after_acquire_time() {
    let profile = get_profile(DefenseWeapon::Bomb);
    let early = make_context(
        DefenseWeapon::Bomb,
        EmplacementPhase::Tracking,
        profile.acquire_secs - 0.1,
        10.0,
    );
    assert!(!evaluate(&early).fire);

    let ready = make_context(
        DefenseWeapon::Bomb,
        EmplacementPhase::Tracking,
        profile.acquire_secs,
        10.0,
    );
    let update = evaluate(&ready);
    assert!(update.fire);
    assert_eq!(update.new_phase, EmplacementPhase::Reloading);
}

#[test]
fn test_tracking_drops_without_line_of_sight() {
    let mut ctx = make_context(DefenseWeapon::Missile, EmplacementPhase::Tracking, 1.9, 10.0);
    ctx.line_of_sight = false;
    let update = evaluate(&ctx);
    assert_eq!(update.new_phase, EmplacementPhase::Idle);
    assert!(!update.fire);
}

#[test]
fn test_tracking_drops_when_uav_not_engageable() {
    let mut ctx = make_context(DefenseWeapon::Gun, EmplacementPhase::Tracking, 5.0, 5.0);
    ctx.uav_engageable = false;
    let update = evaluate(&ctx);
    assert_eq!(update.new_phase, EmplacementPhase::Idle);
    assert!(!update.fire, "A crashed UAV must never be fired upon");
}

#[test]
fn test_reloading_holds_then_reacquires() {
    let profile = get_profile(DefenseWeapon::Gun);
    let reloading = make_context(
        DefenseWeapon::Gun,
        EmplacementPhase::Reloading,
        profile.reload_secs * 0.5,
        5.0,
    );
    let update = evaluate(&reloading);
    assert_eq!(update.new_phase, EmplacementPhase::Reloading);
    assert!(!update.fire);

    let reloaded = make_context(
        DefenseWeapon::Gun,
        EmplacementPhase::Reloading,
        profile.reload_secs,
        5.0,
    );
    let update = evaluate(&reloaded);
    assert_eq!(update.new_phase, EmplacementPhase::Tracking);
    assert!(!update.fire, "Reload must be followed by a fresh acquisition");
}

// ---- Guidance ----

#[test]
fn test_lead_aim_stationary_target() {
    let shooter = Position::new(0.0, 0.0, 0.0);
    let target = Position::new(10.0, 5.0, 0.0);
    let aim = lead_aim_point(&shooter, &target, &Velocity::default(), 20.0);
    assert!(aim.distance_to(&target) < 1e-9);
}

#[test]
fn test_lead_aim_leads_crossing_target() {
    let shooter = Position::new(0.0, 0.0, 0.0);
    let target = Position::new(20.0, 0.0, 0.0);
    let vel = Velocity::new(0.0, 0.0, 10.0);
    let aim = lead_aim_point(&shooter, &target, &vel, 20.0);
    assert!(aim.z > 1.0, "Aim point should lead the target, got z={}", aim.z);

    // The round reaches the aim point exactly when the target does.
    let t_round = shooter.distance_to(&aim) / 20.0;
    let t_target = target.distance_to(&aim) / 10.0;
    assert!((t_round - t_target).abs() < 1e-6);
}

#[test]
fn test_lead_aim_unreachable_falls_back() {
    let shooter = Position::new(0.0, 0.0, 0.0);
    let target = Position::new(20.0, 0.0, 0.0);
    // Target running away faster than the round.
    let vel = Velocity::new(50.0, 0.0, 0.0);
    let aim = lead_aim_point(&shooter, &target, &vel, 10.0);
    assert!(aim.distance_to(&target) < 1e-9);
}

#[test]
fn test_launch_velocity_speed_and_direction() {
    let from = Position::new(0.0, 0.0, 0.0);
    let aim = Position::new(0.0, 10.0, 0.0);
    let vel = launch_velocity(&from, &aim, 18.0, 0.0, 0.0);
    assert!((vel.speed() - 18.0).abs() < 1e-9);
    assert!((vel.y - 18.0).abs() < 1e-9);

    let deflected = launch_velocity(&from, &aim, 18.0, 0.1, -0.1);
    assert!((deflected.speed() - 18.0).abs() < 1e-9);
    assert!(deflected.y < 18.0, "Aim error should deflect the round");
}

#[test]
fn test_steer_toward_respects_turn_rate() {
    let pos = Position::new(0.0, 0.0, 0.0);
    let vel = Velocity::new(10.0, 0.0, 0.0);
    // Target at 90 degrees.
    let target = Position::new(0.0, 0.0, 50.0);
    let dt = 0.1;
    let new_vel = steer_toward(&pos, &vel, &target, 10.0, 1.0, dt);

    assert!((new_vel.speed() - 10.0).abs() < 1e-9);
    let cos = (vel.x * new_vel.x + vel.y * new_vel.y + vel.z * new_vel.z) / 100.0;
    let turned = cos.clamp(-1.0, 1.0).acos();
    assert!(
        (turned - 0.1).abs() < 1e-6,
        "Turn should be limited to rate * dt, got {turned}"
    );
    assert!(new_vel.z > 0.0, "Should turn toward the target");
}

#[test]
fn test_steer_toward_small_correction_is_exact() {
    let pos = Position::new(0.0, 0.0, 0.0);
    let vel = Velocity::new(10.0, 0.0, 0.0);
    let target = Position::new(100.0, 0.0, 0.5);
    let new_vel = steer_toward(&pos, &vel, &target, 10.0, 1.2, 1.0 / 30.0);
    let expected_z = 10.0 * 0.5 / (100.0f64 * 100.0 + 0.25).sqrt();
    assert!((new_vel.z - expected_z).abs() < 1e-9);
}

#[test]
fn test_aim_error_bounded_and_deterministic() {
    let mut rng_a = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let mut rng_b = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    for _ in 0..100 {
        let (yaw, pitch) = sample_aim_error(&mut rng_a, 0.15);
        assert!(yaw.abs() <= 0.15 && pitch.abs() <= 0.15);
        assert_eq!((yaw, pitch), sample_aim_error(&mut rng_b, 0.15));
    }
    assert_eq!(sample_aim_error(&mut rng_a, 0.0), (0.0, 0.0));
}
