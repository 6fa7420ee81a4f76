//! Events emitted by the simulation for audio and UI feedback.
//!
//! Fire-and-forget: the simulation never reads anything back from them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::SlotId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A projectile left the combatant.
    Shoot { x: f32, y: f32, is_crit: bool },
    /// An enemy took damage and survived.
    EnemyHit {
        enemy: SlotId,
        damage: f32,
        is_crit: bool,
    },
    /// An enemy died and paid out.
    EnemyDeath {
        enemy: SlotId,
        enemy_type: EnemyType,
        reward: u32,
        x: f32,
        y: f32,
    },
    /// An enemy reached the castle.
    CastleHit { damage: f32, remaining_hp: f32 },
    WaveStart { wave: u32, enemy_count: u32 },
    WaveClear { wave: u32, gold_bonus: i64, gems: u32 },
    Upgrade { stat: Stat, level: u32, cost: u32 },
    SkillPurchased { skill: SkillId, level: u32, cost: u32 },
    MetaPurchased {
        upgrade: MetaUpgrade,
        level: u32,
        cost: u32,
    },
    /// A purchase was rejected for lack of funds.
    InsufficientFunds { cost: u32, available: i64 },
    GameOver { wave: u32, kills: u32 },
}
