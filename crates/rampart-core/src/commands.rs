//! Player commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Waves ---
    /// Start the next wave (only between waves).
    StartWave,
    /// Start the next wave immediately for a small gold bonus.
    CallWaveEarly,

    // --- Economy ---
    /// Buy one level of a combatant stat.
    Upgrade { stat: Stat },
    /// Buy one level of a skill.
    PurchaseSkill { skill: SkillId },
    /// Spend gems on a meta upgrade.
    PurchaseMeta { upgrade: MetaUpgrade },

    // --- Input ---
    /// Normalized hero movement vector. Magnitude is clamped to 1.
    SetMoveInput { x: f32, y: f32 },
    /// The playfield changed size. Takes effect for the next path.
    Resize { width: f32, height: f32 },

    // --- Session control ---
    Pause,
    Resume,
    /// Discard the current run and start fresh.
    NewGame,
}
