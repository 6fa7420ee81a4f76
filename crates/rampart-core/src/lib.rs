//! Core types and definitions for the RAMPART simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! enums, geometric and time types, tuning constants, player commands,
//! game events and the render snapshot. It has no dependency on any
//! host or runtime.

pub mod commands;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;
