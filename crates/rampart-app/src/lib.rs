//! RAMPART host application.
//!
//! Wires the simulation engine to a frame loop and a scripted player so runs
//! can be played headless or in real time from the command line.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use rampart_core as core;
