//! State shared between the game loop thread and whoever drives it.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use rampart_core::commands::PlayerCommand;
use rampart_core::enums::GamePhase;
use rampart_core::state::GameStateSnapshot;

/// Commands sent from the controller to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the loop after every frame.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}

/// Final tally of a run, printed when the app exits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub frames: u64,
    pub phase: GamePhase,
    pub wave: u32,
    pub kills: u32,
    pub gold: i64,
    pub gems: u32,
    pub castle_hp: f32,
    pub elapsed_ms: f64,
}

impl RunSummary {
    pub fn from_snapshot(frames: u64, snapshot: &GameStateSnapshot) -> Self {
        Self {
            frames,
            phase: snapshot.phase,
            wave: snapshot.wave.number,
            kills: snapshot.economy.kills,
            gold: snapshot.economy.gold,
            gems: snapshot.economy.gems,
            castle_hp: snapshot.castle.hp,
            elapsed_ms: snapshot.time.elapsed_ms,
        }
    }
}
