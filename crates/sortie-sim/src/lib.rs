//! Mission simulation engine for SORTIE.
//!
//! Owns the hecs ECS world, runs the ordered per-tick pipeline,
//! and produces `SimSnapshot`s for presentation.

pub mod deferred;
pub mod engine;
pub mod profiles;
pub mod systems;
pub mod world_setup;

pub use sortie_core as core;
pub use engine::{ClickOutcome, SimConfig, SimulationEngine};
