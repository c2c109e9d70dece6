//! Core types and definitions for the SORTIE mission simulator.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, snapshot views, events, errors, and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
