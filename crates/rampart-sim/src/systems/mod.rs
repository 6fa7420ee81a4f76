//! Per-tick systems run by the engine in a fixed order.
//!
//! Systems are plain functions over the world and whichever engine state they
//! need. They hold no state of their own.

pub mod combat;
pub mod enemies;
pub mod projectiles;
pub mod snapshot;
