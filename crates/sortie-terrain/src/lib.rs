//! Terrain collaborators for SORTIE.
//!
//! Ground-height queries and terrain line-of-sight.
//! The simulation only sees the `GroundHeight` trait; a missing height map
//! is handled by the caller with a conservative fallback.

pub use sortie_core as core;

pub mod grid;
pub mod los;

// Re-export key types for convenience.
pub use grid::{FlatGround, GroundHeight, HeightGrid};
pub use los::has_line_of_sight;
