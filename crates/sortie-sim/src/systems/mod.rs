//! Systems that advance the mission simulation each tick.
//!
//! Systems are plain functions over `&mut World` and the engine-owned state
//! they are handed. They do not own state. The engine calls them in a fixed
//! order: crash → battery → movement/hover/targeting → munitions/defense →
//! mission clock.

pub mod battery;
pub mod crash;
pub mod defense;
pub mod detection;
pub mod flight;
pub mod hover;
pub mod mission;
pub mod snapshot;
pub mod targeting;
pub mod weapons;
