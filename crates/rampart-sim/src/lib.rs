//! Simulation engine for RAMPART.
//!
//! Owns the entity pools, the combatant, the economy and the wave manager,
//! runs them in a fixed order every frame, and produces `GameStateSnapshot`s
//! for the renderer.

pub mod clock;
pub mod combatant;
pub mod deferred;
pub mod economy;
pub mod enemy;
pub mod engine;
pub mod fx;
pub mod meta;
pub mod path;
pub mod persistence;
pub mod pool;
pub mod projectile;
pub mod skills;
pub mod systems;
pub mod wave;
pub mod world;

pub use engine::{SimConfig, SimulationEngine};
pub use rampart_core as core;
