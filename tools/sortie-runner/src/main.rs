//! sortie-runner: headless mission runner for the SORTIE simulation.
//!
//! Usage:
//!   sortie-runner fly --mode attack --seed 7 --max-ticks 9000
//!   sortie-runner fly --config mission.json --layout world.json --terrain rolling
//!   sortie-runner layout > world.json

mod autopilot;

use std::path::{Path, PathBuf};
use std::process;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sortie_core::commands::MissionConfig;
use sortie_core::enums::DroneMode;
use sortie_core::error::CommandError;
use sortie_sim::world_setup::WorldLayout;
use sortie_sim::{SimConfig, SimulationEngine};
use sortie_terrain::{FlatGround, HeightGrid};

use crate::autopilot::Autopilot;

#[derive(Debug, Error)]
enum RunnerError {
    #[error("{0}")]
    Usage(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("mission rejected: {0}")]
    Mission(#[from] CommandError),
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "fly" => cmd_fly(&args[2..]),
        "layout" => cmd_layout(),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(RunnerError::Usage(format!("Unknown command: {other}"))),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if matches!(e, RunnerError::Usage(_)) {
            print_usage();
        }
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "sortie-runner: SORTIE headless mission runner\n\
         \n\
         Commands:\n\
         \n\
         fly      Fly a mission on autopilot and print the final snapshot as JSON\n\
         \n\
           --mode <surveillance|attack>  Drone variant (default: surveillance)\n\
           --config <path>               Mission config JSON (overrides defaults)\n\
           --layout <path>               World layout JSON (default: built-in world)\n\
           --seed <N>                    RNG seed (default: 42)\n\
           --max-ticks <N>               Tick budget (default: 18000)\n\
           --flat-ground <elevation>     Flat ground at the given elevation\n\
           --terrain rolling             Gentle synthetic hills under the world\n\
           --verbose                     Debug logging\n\
         \n\
         layout   Print the built-in world layout as JSON\n\
         \n\
         Examples:\n\
         \n\
           sortie-runner fly --mode attack --seed 7\n\
           sortie-runner layout > world.json\n"
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(
    args: &[String],
    name: &str,
    default: T,
) -> Result<T, RunnerError> {
    match flag_value(args, name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| RunnerError::Usage(format!("invalid value for {name}: {raw}"))),
        None => Ok(default),
    }
}

fn parse_mode(args: &[String]) -> Result<Option<DroneMode>, RunnerError> {
    match flag_value(args, "--mode") {
        None => Ok(None),
        Some("surveillance") => Ok(Some(DroneMode::Surveillance)),
        Some("attack") => Ok(Some(DroneMode::Attack)),
        Some(other) => Err(RunnerError::Usage(format!("unknown mode: {other}"))),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RunnerError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| RunnerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// --- Fly command ---

fn cmd_fly(args: &[String]) -> Result<(), RunnerError> {
    init_logging(args.iter().any(|a| a == "--verbose"));

    let seed: u64 = parse_flag(args, "--seed", 42)?;
    let max_ticks: u64 = parse_flag(args, "--max-ticks", 18_000)?;

    let mut config: MissionConfig = match flag_value(args, "--config") {
        Some(path) => read_json(Path::new(path))?,
        None => MissionConfig::default(),
    };
    if let Some(mode) = parse_mode(args)? {
        config.mode = mode;
    }

    let layout: WorldLayout = match flag_value(args, "--layout") {
        Some(path) => read_json(Path::new(path))?,
        None => WorldLayout::default_world(),
    };

    let mut engine = SimulationEngine::new(SimConfig { seed, layout });
    if let Some(raw) = flag_value(args, "--flat-ground") {
        let elevation: f64 = raw
            .parse()
            .map_err(|_| RunnerError::Usage(format!("invalid elevation: {raw}")))?;
        engine.set_ground(Some(Box::new(FlatGround::new(elevation))));
    } else if let Some(kind) = flag_value(args, "--terrain") {
        match kind {
            "rolling" => engine.set_ground(Some(Box::new(rolling_terrain()?))),
            other => return Err(RunnerError::Usage(format!("unknown terrain: {other}"))),
        }
    }

    info!(seed, mode = ?config.mode, max_ticks, "flying sortie");
    engine.start_mission(config)?;

    let mut autopilot = Autopilot::default();
    let mut snapshot = engine.snapshot();
    for _ in 0..max_ticks {
        autopilot.step(&mut engine, &snapshot);
        snapshot = engine.tick();
        if snapshot.mission.status.is_terminal() {
            break;
        }
    }

    info!(
        status = ?snapshot.mission.status,
        reason = ?snapshot.mission.fail_reason,
        elapsed = snapshot.time.elapsed_secs,
        battery = snapshot.uav.battery,
        "sortie finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

// --- Layout command ---

fn cmd_layout() -> Result<(), RunnerError> {
    println!(
        "{}",
        serde_json::to_string_pretty(&WorldLayout::default_world())?
    );
    Ok(())
}

/// Low hills rising toward the north edge, sampled every 4 units across
/// the world. Peaks stay well under the UAV's cruise altitude.
fn rolling_terrain() -> Result<HeightGrid, RunnerError> {
    HeightGrid::from_fn(-100.0, -100.0, 4.0, 51, 51, |x, z| {
        let nx = (x + 100.0) / 200.0;
        let nz = (z + 100.0) / 200.0;
        let swell = 3.0 * (nx * 9.0).sin() * (nz * 7.0).cos();
        let ridge = 6.0 * smooth_step(1.0 - nz, 0.7, 0.95);
        (2.0 + swell + ridge).max(0.0)
    })
    .ok_or_else(|| RunnerError::Usage("terrain grid dimensions invalid".into()))
}

/// 0 below `edge0`, 1 above `edge1`, smooth between.
fn smooth_step(x: f64, edge0: f64, edge1: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
