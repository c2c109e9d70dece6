//! Hostile air defense for SORTIE.
//!
//! Emplacement state machines, per-weapon profiles, and the aiming and
//! steering math used by rounds fired at the UAV.

pub mod fsm;
pub mod guidance;
pub mod profiles;

pub use sortie_core as core;

#[cfg(test)]
mod tests;
