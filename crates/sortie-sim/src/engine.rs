//! Simulation engine: the mission state machine.
//!
//! `SimulationEngine` owns the hecs ECS world and the engine-level records
//! (UAV, mission, hover, targeting, loadout), processes player commands,
//! runs the ordered per-tick pipeline, and produces `SimSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use sortie_core::commands::{MissionConfig, PlayerCommand};
use sortie_core::components::*;
use sortie_core::constants::*;
use sortie_core::enums::*;
use sortie_core::error::{CommandError, FireError, FireOutcome, FireReport};
use sortie_core::events::{Alert, SimEvent};
use sortie_core::state::SimSnapshot;
use sortie_core::types::{Position, SimTime, TypeCounts, Velocity};
use sortie_terrain::GroundHeight;

use crate::deferred::{DeferredAction, DeferredQueue};
use crate::systems;
use crate::systems::hover::HoverState;
use crate::systems::snapshot::SnapshotSource;
use crate::systems::weapons::FireContext;
use crate::world_setup::{self, WorldLayout};

/// Configuration for constructing an engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Targets, defense sites, and base position.
    pub layout: WorldLayout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            layout: WorldLayout::default(),
        }
    }
}

/// How a terrain click was interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// First placement of the UAV.
    Spawned { position: Position },
    /// Commanded movement to a point above the click.
    Moving { destination: Position },
    /// The click selected a target to surveil.
    HoverStarted { target_id: u32 },
    /// The click selected a target to lock.
    LockStarted { target_id: u32 },
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    layout: WorldLayout,
    time: SimTime,
    rng: ChaCha8Rng,
    ground: Option<Box<dyn GroundHeight>>,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<SimEvent>,
    alerts: Vec<Alert>,

    uav: UavState,
    mission: MissionState,
    hover: HoverState,
    targeting: TargetingSession,
    loadout: WeaponLoadout,
    surveilled: TypeCounts,
    destroyed: TypeCounts,
    deferred: DeferredQueue,
    last_fire: Option<FireOutcome>,
    next_munition_id: u32,
}

impl SimulationEngine {
    /// Create an engine in the planning state with the layout populated.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world_setup::populate(&mut world, &config.layout);
        Self {
            world,
            layout: config.layout,
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ground: None,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            alerts: Vec::new(),
            uav: UavState::default(),
            mission: MissionState::default(),
            hover: HoverState::default(),
            targeting: TargetingSession::default(),
            loadout: WeaponLoadout::default(),
            surveilled: TypeCounts::default(),
            destroyed: TypeCounts::default(),
            deferred: DeferredQueue::default(),
            last_fire: None,
            next_munition_id: 0,
        }
    }

    /// Attach a ground-height source. Without one, crash detection falls
    /// back to a fixed minimum altitude and defense sites have clear sight.
    pub fn with_ground(mut self, ground: impl GroundHeight + 'static) -> Self {
        self.ground = Some(Box::new(ground));
        self
    }

    pub fn set_ground(&mut self, ground: Option<Box<dyn GroundHeight>>) {
        self.ground = ground;
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one fixed step and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.tick_with_delta(DT)
    }

    /// Advance by `dt` seconds and return the resulting snapshot.
    /// Systems only run while the mission is active.
    pub fn tick_with_delta(&mut self, dt: f64) -> SimSnapshot {
        self.process_commands();

        if !(dt.is_finite() && dt > 0.0) {
            warn!(dt, "invalid tick delta ignored");
        } else if self.mission.status == MissionStatus::Active {
            self.time.advance(dt);
            self.run_systems(dt);
        }

        let events = std::mem::take(&mut self.events);
        let alerts = std::mem::take(&mut self.alerts);
        systems::snapshot::build_snapshot(&self.snapshot_source(), events, alerts)
    }

    /// Snapshot of the current state without advancing. Pending events and
    /// alerts are included but not consumed.
    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.snapshot_source(),
            self.events.clone(),
            self.alerts.clone(),
        )
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn uav(&self) -> &UavState {
        &self.uav
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn hover_session(&self) -> Option<&HoverSession> {
        self.hover.session.as_ref()
    }

    pub fn targeting(&self) -> &TargetingSession {
        &self.targeting
    }

    pub fn loadout(&self) -> &WeaponLoadout {
        &self.loadout
    }

    /// Completed surveillance sessions per target type.
    pub fn surveilled(&self) -> &TypeCounts {
        &self.surveilled
    }

    /// Destroyed targets per type.
    pub fn destroyed(&self) -> &TypeCounts {
        &self.destroyed
    }

    pub fn last_fire(&self) -> Option<&FireOutcome> {
        self.last_fire.as_ref()
    }

    pub fn layout(&self) -> &WorldLayout {
        &self.layout
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    // --- Commands ---

    /// Interpret a click on the terrain: the first click spawns the UAV,
    /// later clicks select a nearby target or command a move.
    pub fn terrain_click(&mut self, point: Position) -> Result<ClickOutcome, CommandError> {
        if !point.is_finite() {
            warn!(point = ?point, "non-finite terrain click discarded");
            return Err(CommandError::NonFinite {
                field: "point".into(),
            });
        }

        if !self.uav.spawned {
            if self.mission.status.is_terminal() {
                return Err(CommandError::InvalidMissionStatus {
                    status: self.mission.status,
                });
            }
            let position = Position::new(point.x, point.y + SPAWN_CLEARANCE, point.z);
            self.spawn_uav(position);
            return Ok(ClickOutcome::Spawned { position });
        }

        self.ensure_controllable()?;
        if self.mission.returning {
            return Err(CommandError::Returning);
        }

        match self.uav.mode {
            DroneMode::Surveillance => {
                let selected = systems::detection::nearest(
                    &self.world,
                    &point,
                    SELECTION_THRESHOLD,
                    systems::hover::eligible,
                );
                if let Some(target) = selected {
                    if self.hover.in_cooldown(self.time.elapsed_secs) {
                        return Err(CommandError::HoverCooldown);
                    }
                    systems::hover::start(&mut self.hover, &target, &mut self.uav, &mut self.events);
                    return Ok(ClickOutcome::HoverStarted {
                        target_id: target.info.id,
                    });
                }
            }
            DroneMode::Attack => {
                let selected = systems::detection::nearest(
                    &self.world,
                    &point,
                    SELECTION_THRESHOLD,
                    |status| !status.destroyed && (status.detected || status.surveilled),
                );
                if let Some(target) = selected {
                    self.begin_target_lock(target.info.id)?;
                    return Ok(ClickOutcome::LockStarted {
                        target_id: target.info.id,
                    });
                }
            }
        }

        let destination = Position::new(point.x, point.y + MOVE_MIN_CLEARANCE, point.z);
        self.set_target_position(destination)?;
        Ok(ClickOutcome::Moving { destination })
    }

    /// Command the UAV toward a point. Cancels any hover session.
    pub fn set_target_position(&mut self, position: Position) -> Result<(), CommandError> {
        if !position.is_finite() {
            warn!(position = ?position, "non-finite target position discarded");
            return Err(CommandError::NonFinite {
                field: "target_position".into(),
            });
        }
        self.ensure_controllable()?;
        if self.mission.returning {
            return Err(CommandError::Returning);
        }
        if self.hover.is_hovering() {
            // Cooldown lets the UAV leave the trigger band before a new
            // session can capture it again.
            self.hover.cancel();
            self.hover.cooldown_until_secs = self.time.elapsed_secs + HOVER_COOLDOWN_SECS;
        }
        self.uav.target_position = Some(position);
        Ok(())
    }

    /// Select a target and start seeking a lock on it.
    pub fn begin_target_lock(&mut self, target_id: u32) -> Result<(), CommandError> {
        self.ensure_controllable()?;
        if self.uav.mode != DroneMode::Attack {
            return Err(CommandError::WrongMode {
                required: DroneMode::Attack,
            });
        }
        let target = systems::detection::lookup(&self.world, target_id)
            .ok_or(CommandError::UnknownTarget { target_id })?;
        if target.status.destroyed {
            return Err(CommandError::TargetDestroyed { target_id });
        }
        if !(target.status.detected || target.status.surveilled) {
            return Err(CommandError::TargetNotDetected { target_id });
        }

        systems::targeting::begin(&mut self.targeting, target_id);
        debug!(target_id, "lock started");
        self.events.push(SimEvent::LockStarted { target_id });
        Ok(())
    }

    /// Fire the selected weapon at the locked target. The outcome is also
    /// kept as `last_fire` for presentation.
    pub fn fire_weapon(&mut self) -> Result<FireReport, FireError> {
        let result = self.release_weapon();
        self.last_fire = Some(FireOutcome::from(&result));
        if let Err(err) = &result {
            debug!(error = %err, "fire rejected");
        }
        result
    }

    pub fn select_weapon(&mut self, weapon: WeaponKind) -> Result<(), CommandError> {
        if self.uav.is_crashed {
            return Err(CommandError::Crashed);
        }
        self.loadout.selected = weapon;
        Ok(())
    }

    /// Switch between surveillance and attack. Cancels hover and targeting.
    pub fn set_drone_type(&mut self, mode: DroneMode) -> Result<(), CommandError> {
        if self.uav.is_crashed {
            return Err(CommandError::Crashed);
        }
        if self.uav.mode != mode {
            self.hover.cancel();
            systems::targeting::reset(&mut self.targeting);
            self.uav.mode = mode;
            info!(mode = ?mode, "drone type changed");
        }
        Ok(())
    }

    pub fn set_thermal_vision(&mut self, enabled: bool) -> Result<(), CommandError> {
        if self.uav.is_crashed {
            return Err(CommandError::Crashed);
        }
        self.uav.thermal_vision = enabled;
        Ok(())
    }

    /// Set the battery level (clamped to [0, 100]). Emptying it during an
    /// active mission takes the power-loss crash path.
    pub fn set_battery(&mut self, level: f64) {
        let depleted = systems::battery::set_level(&mut self.uav, level);
        if depleted && self.mission.status == MissionStatus::Active {
            self.crash(CrashReason::BatteryDepleted);
        }
    }

    /// Start a mission. A finished mission is reset first; an unplaced UAV
    /// launches from the base.
    pub fn start_mission(&mut self, config: MissionConfig) -> Result<(), CommandError> {
        validate_config(&config)?;
        match self.mission.status {
            MissionStatus::Active => {
                return Err(CommandError::InvalidMissionStatus {
                    status: MissionStatus::Active,
                })
            }
            MissionStatus::Completed | MissionStatus::Failed => self.reset_mission(),
            MissionStatus::Planning => {}
        }

        self.time = SimTime::default();
        self.deferred.clear();
        self.mission = MissionState {
            status: MissionStatus::Active,
            time_remaining: config.max_time_secs,
            max_time: config.max_time_secs,
            return_threshold: config.return_threshold_secs,
            ..Default::default()
        };
        self.hover = HoverState::default();
        self.targeting = TargetingSession {
            max_lock_time: config.max_lock_time_secs,
            ..Default::default()
        };
        let selected = if config.ammo.missile == 0 && config.ammo.bomb > 0 {
            WeaponKind::Bomb
        } else {
            WeaponKind::Missile
        };
        self.loadout = WeaponLoadout {
            selected,
            ammo: config.ammo,
        };
        self.surveilled = TypeCounts::default();
        self.destroyed = TypeCounts::default();
        self.last_fire = None;

        self.uav.mode = config.mode;
        self.uav.speed = config.speed;
        self.uav.thermal_vision = config.thermal_vision;
        if !self.uav.spawned {
            self.spawn_uav(self.layout.base);
        }

        info!(
            mode = ?config.mode,
            max_time = config.max_time_secs,
            "mission started"
        );
        self.events.push(SimEvent::MissionStarted { mode: config.mode });
        Ok(())
    }

    /// Back to planning with a fresh world, an unplaced UAV, and a full battery.
    /// Pending deferred outcomes are cancelled.
    pub fn reset_mission(&mut self) {
        self.deferred.clear();
        world_setup::populate(&mut self.world, &self.layout);
        self.time = SimTime::default();
        self.mission = MissionState::default();
        self.hover = HoverState::default();
        self.targeting = TargetingSession::default();
        self.loadout = WeaponLoadout::default();
        self.surveilled = TypeCounts::default();
        self.destroyed = TypeCounts::default();
        self.last_fire = None;
        self.next_munition_id = 0;
        self.uav = UavState::default();
        // Power is restored last, after every other record is cleared.
        systems::battery::restore(&mut self.uav);

        info!("mission reset");
        self.events.push(SimEvent::MissionReset);
    }

    /// Place the UAV directly (for tests).
    #[cfg(test)]
    pub fn place_uav(&mut self, position: Position) {
        self.uav.position = position;
        self.uav.spawned = true;
    }

    /// Mark a target detected without flying over it (for tests).
    #[cfg(test)]
    pub fn force_detect(&mut self, target_id: u32) {
        systems::detection::update_status(&mut self.world, target_id, |s| s.detected = true);
    }

    /// Jump the lock straight to Locked (for tests).
    #[cfg(test)]
    pub fn force_lock(&mut self, target_id: u32) {
        systems::targeting::begin(&mut self.targeting, target_id);
        self.targeting.lock_timer = self.targeting.max_lock_time;
        self.targeting.lock_status = LockStatus::Locked;
    }

    /// Credit a completed surveillance of `kind` (for tests).
    #[cfg(test)]
    pub fn mark_surveilled(&mut self, kind: TargetType) {
        self.surveilled.increment(kind);
    }

    /// Override the countdown (for tests).
    #[cfg(test)]
    pub fn set_time_remaining(&mut self, secs: f64) {
        self.mission.time_remaining = secs;
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        let rejection = match command {
            PlayerCommand::TerrainClick { point } => {
                self.terrain_click(point).err().map(|e| e.to_string())
            }
            PlayerCommand::SetTargetPosition { position } => {
                self.set_target_position(position).err().map(|e| e.to_string())
            }
            PlayerCommand::BeginTargetLock { target_id } => {
                self.begin_target_lock(target_id).err().map(|e| e.to_string())
            }
            PlayerCommand::FireWeapon => self.fire_weapon().err().map(|e| e.to_string()),
            PlayerCommand::SelectWeapon { weapon } => {
                self.select_weapon(weapon).err().map(|e| e.to_string())
            }
            PlayerCommand::SetDroneType { mode } => {
                self.set_drone_type(mode).err().map(|e| e.to_string())
            }
            PlayerCommand::SetThermalVision { enabled } => {
                self.set_thermal_vision(enabled).err().map(|e| e.to_string())
            }
            PlayerCommand::StartMission { config } => {
                self.start_mission(config).err().map(|e| e.to_string())
            }
            PlayerCommand::ResetMission => {
                self.reset_mission();
                None
            }
        };

        if let Some(reason) = rejection {
            debug!(%reason, "command rejected");
            self.events.push(SimEvent::CommandRejected { reason });
        }
    }

    /// Run the pipeline in order. Later stages see the crash and battery
    /// state already updated by earlier ones.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Crash detection
        if let Some(reason) =
            systems::crash::detect(&self.world, &self.uav, self.ground.as_deref())
        {
            self.crash(reason);
        }

        // 2. Battery drain, at the rate for what the UAV is doing now
        if self.uav_flying() {
            systems::flight::update_status(
                &mut self.uav,
                self.hover.is_hovering(),
                systems::targeting::is_engaging(&self.targeting),
            );
        }
        if self.uav_flying() && systems::battery::run(&mut self.uav, dt, now, &mut self.alerts) {
            self.crash(CrashReason::BatteryDepleted);
        }

        // 3. Detection, hover/flight, targeting
        if self.uav_flying() {
            self.run_flight(dt, now);
        }

        // 4. Munitions and air defense
        let kills = systems::weapons::advance_munitions(
            &mut self.world,
            dt,
            &mut self.destroyed,
            &mut self.events,
        );
        if !kills.is_empty() && systems::weapons::all_targets_destroyed(&self.world) {
            self.schedule_victory(now);
        }
        let engageable = self.uav_flying();
        systems::defense::run(
            &mut self.world,
            &self.uav,
            engageable,
            self.ground.as_deref(),
            &mut self.rng,
            dt,
            &mut self.events,
        );
        let tracked = engageable.then_some(self.uav.position);
        systems::defense::advance_rounds(
            &mut self.world,
            tracked.as_ref(),
            self.ground.as_deref(),
            dt,
        );

        // 5. Mission clock and deferred outcomes
        let clock =
            systems::mission::advance(&mut self.mission, &self.uav, &self.layout.base, dt);
        if clock.recall {
            self.begin_return();
        }
        if clock.arrived_home {
            self.mission.resolution_pending = true;
            self.deferred.schedule(
                now,
                RETURN_RESOLVE_DELAY_SECS,
                DeferredAction::ResolveReturnArrival,
            );
            info!("UAV back at base");
        }
        if clock.expired {
            self.resolve(MissionStatus::Failed, Some("Time expired".to_string()));
        }
        self.run_deferred(now);
    }

    fn run_flight(&mut self, dt: f64, now: f64) {
        systems::detection::run(&mut self.world, &self.uav.position, &mut self.events);

        let hovering = self.uav.mode == DroneMode::Surveillance
            && systems::hover::run(
                &mut self.world,
                &mut self.hover,
                &mut self.uav,
                &mut self.surveilled,
                !self.mission.returning,
                now,
                dt,
                &mut self.events,
            );
        if !hovering {
            systems::flight::run(&mut self.uav, dt, &mut self.events);
        }

        if self.uav.mode == DroneMode::Attack {
            systems::targeting::run(
                &self.world,
                &mut self.targeting,
                &self.uav.position,
                dt,
                &mut self.events,
            );
        }

        systems::flight::update_status(
            &mut self.uav,
            self.hover.is_hovering(),
            systems::targeting::is_engaging(&self.targeting),
        );
    }

    fn run_deferred(&mut self, now: f64) {
        for action in self.deferred.take_due(now) {
            match action {
                DeferredAction::ResolveFailure { reason } => {
                    self.resolve(MissionStatus::Failed, Some(reason));
                }
                // A pending crash failure outranks any success outcome.
                DeferredAction::ResolveVictory | DeferredAction::ResolveReturnArrival
                    if self.mission.failure_pending =>
                {
                    debug!("success outcome superseded by pending crash failure");
                }
                DeferredAction::ResolveVictory => {
                    self.resolve(MissionStatus::Completed, None);
                }
                DeferredAction::ResolveReturnArrival => {
                    let (status, reason) = systems::mission::evaluate_return(
                        self.uav.mode,
                        &self.surveilled,
                        &self.destroyed,
                    );
                    self.resolve(status, reason);
                }
                DeferredAction::AmmoExhausted => self.on_ammo_exhausted(now),
            }
        }
    }

    fn release_weapon(&mut self) -> Result<FireReport, FireError> {
        let ctx = FireContext {
            uav: &self.uav,
            mission_status: self.mission.status,
            targeting: &self.targeting,
            loadout: &self.loadout,
        };
        let solution = systems::weapons::check_fire(&self.world, &ctx)?;

        let slot = systems::weapons::ammo_slot(&mut self.loadout.ammo, solution.weapon);
        *slot -= 1;
        let ammo_remaining = *slot;

        self.next_munition_id += 1;
        let munition_id = self.next_munition_id;
        world_setup::spawn_munition(
            &mut self.world,
            MunitionState {
                id: munition_id,
                weapon: solution.weapon,
                target_id: solution.target_id,
                start_position: self.uav.position,
                target_position: solution.aim_point,
                flight_progress: 0.0,
                impacted: false,
            },
        );
        debug!(
            munition_id,
            weapon = ?solution.weapon,
            target_id = solution.target_id,
            ammo_remaining,
            "weapon fired"
        );
        self.events.push(SimEvent::WeaponFired {
            munition_id,
            weapon: solution.weapon,
            target_id: solution.target_id,
        });

        if systems::weapons::out_of_ammo(&self.loadout.ammo) {
            systems::targeting::reset(&mut self.targeting);
        }
        if ammo_remaining == 0 {
            self.schedule_ammo_check(self.time.elapsed_secs);
        }

        Ok(FireReport {
            munition_id,
            weapon: solution.weapon,
            target_id: solution.target_id,
            ammo_remaining,
            distance: solution.distance,
        })
    }

    fn spawn_uav(&mut self, position: Position) {
        self.uav.position = position;
        self.uav.spawned = true;
        self.uav.target_position = None;
        self.uav.velocity = Velocity::default();
        info!(position = ?position, "UAV spawned");
        self.events.push(SimEvent::Spawned { position });
    }

    fn ensure_controllable(&self) -> Result<(), CommandError> {
        if self.uav.is_crashed {
            return Err(CommandError::Crashed);
        }
        if self.mission.status.is_terminal() {
            return Err(CommandError::InvalidMissionStatus {
                status: self.mission.status,
            });
        }
        if !self.uav.spawned {
            return Err(CommandError::NotSpawned);
        }
        Ok(())
    }

    fn uav_flying(&self) -> bool {
        self.uav.spawned && !self.uav.is_crashed
    }

    /// Crash the UAV. Only the first crash schedules the deferred failure.
    fn crash(&mut self, reason: CrashReason) {
        if self.uav.is_crashed {
            return;
        }
        let now = self.time.elapsed_secs;
        self.uav.is_crashed = true;
        self.uav.crash_reason = Some(reason);
        self.uav.target_position = None;
        self.uav.velocity = Velocity::default();
        self.uav.status = UavStatus::Idle;
        self.hover.cancel();
        systems::targeting::reset(&mut self.targeting);

        info!(reason = %reason, position = ?self.uav.position, "UAV crashed");
        self.events.push(SimEvent::Crashed { reason });
        self.alerts.push(Alert {
            level: AlertLevel::Critical,
            message: reason.to_string(),
            time_secs: now,
        });

        if self.mission.status == MissionStatus::Active && !self.mission.failure_pending {
            self.mission.failure_pending = true;
            self.deferred.schedule(
                now,
                CRASH_FAILURE_DELAY_SECS,
                DeferredAction::ResolveFailure {
                    reason: reason.message().to_string(),
                },
            );
        }
    }

    /// Recall the UAV to base. Hover is dropped; no new hover may start.
    fn begin_return(&mut self) {
        if self.mission.returning {
            return;
        }
        self.mission.returning = true;
        self.hover.cancel();
        if self.uav_flying() {
            self.uav.target_position = Some(self.layout.base);
        }
        info!(time_remaining = self.mission.time_remaining, "returning to base");
        self.events.push(SimEvent::ReturningToBase);
        self.alerts.push(Alert {
            level: AlertLevel::Info,
            message: "Returning to base".to_string(),
            time_secs: self.time.elapsed_secs,
        });
    }

    fn schedule_victory(&mut self, now: f64) {
        if self.mission.resolution_pending || self.mission.failure_pending {
            return;
        }
        self.mission.resolution_pending = true;
        info!("all targets destroyed");
        self.deferred
            .schedule(now, VICTORY_DELAY_SECS, DeferredAction::ResolveVictory);
    }

    fn schedule_ammo_check(&mut self, now: f64) {
        if self.mission.ammo_check_pending {
            return;
        }
        self.mission.ammo_check_pending = true;
        self.deferred.schedule(
            now,
            AMMO_EXHAUSTED_GRACE_SECS,
            DeferredAction::AmmoExhausted,
        );
    }

    fn on_ammo_exhausted(&mut self, now: f64) {
        self.mission.ammo_check_pending = false;
        if self.mission.status != MissionStatus::Active {
            return;
        }
        if self.destroyed.total() > 0 {
            self.begin_return();
        } else if systems::weapons::munitions_in_flight(&self.world) > 0 {
            self.schedule_ammo_check(now);
        } else if systems::weapons::out_of_ammo(&self.loadout.ammo) {
            self.resolve(
                MissionStatus::Failed,
                Some("Ammunition exhausted without a kill".to_string()),
            );
        } else {
            // One weapon type ran dry: the sortie heads home either way.
            self.begin_return();
        }
    }

    /// Resolve the mission. Ignored once the mission is already resolved.
    fn resolve(&mut self, status: MissionStatus, reason: Option<String>) {
        if !systems::mission::resolve(&mut self.mission, status, reason) {
            return;
        }
        self.deferred.clear();
        self.hover.cancel();

        let reason = self.mission.fail_reason.clone();
        info!(status = ?status, reason = ?reason, "mission resolved");
        self.alerts.push(Alert {
            level: if status == MissionStatus::Completed {
                AlertLevel::Info
            } else {
                AlertLevel::Critical
            },
            message: match &reason {
                Some(reason) => format!("Mission failed: {reason}"),
                None => "Mission complete".to_string(),
            },
            time_secs: self.time.elapsed_secs,
        });
        self.events.push(SimEvent::MissionResolved { status, reason });
    }

    fn snapshot_source(&self) -> SnapshotSource<'_> {
        SnapshotSource {
            world: &self.world,
            time: &self.time,
            mission: &self.mission,
            uav: &self.uav,
            hover: self.hover.session.as_ref(),
            targeting: &self.targeting,
            loadout: &self.loadout,
            surveilled: &self.surveilled,
            destroyed: &self.destroyed,
            last_fire: self.last_fire.as_ref(),
        }
    }
}

fn validate_config(config: &MissionConfig) -> Result<(), CommandError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    let invalid = |reason: &str| {
        Err(CommandError::InvalidConfig {
            reason: reason.to_string(),
        })
    };

    if !positive(config.max_time_secs) {
        return invalid("max_time_secs must be positive");
    }
    if !positive(config.speed) {
        return invalid("speed must be positive");
    }
    if !positive(config.max_lock_time_secs) {
        return invalid("max_lock_time_secs must be positive");
    }
    if !(config.return_threshold_secs.is_finite()
        && (0.0..config.max_time_secs).contains(&config.return_threshold_secs))
    {
        return invalid("return_threshold_secs must be within [0, max_time_secs)");
    }
    Ok(())
}
