//! Game state snapshot, the complete visible state handed to the renderer each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{SimTime, SlotId, Viewport};

/// Complete game state produced after each tick. Read-only for consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub wave: WaveView,
    pub economy: EconomyView,
    pub castle: CastleView,
    pub combatant: CombatantView,
    pub path: Vec<Vec2>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub floating_texts: Vec<FloatingTextView>,
    pub particles: Vec<ParticleView>,
    /// Current screen-shake magnitude in pixels.
    pub shake: f32,
    pub upgrades: Vec<UpgradeView>,
    pub skills: Vec<SkillView>,
    pub meta: Vec<MetaView>,
    /// Events raised during this tick, in order.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub phase: WavePhase,
    pub spawned: u32,
    pub total: u32,
    pub spawn_interval_ms: f32,
    /// Whether "call wave early" is currently accepted.
    pub can_call_early: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub gold: i64,
    pub gems: u32,
    pub kills: u32,
    /// Multiplier applied to stat upgrade costs, in (0, 1].
    pub discount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastleView {
    pub position: Vec2,
    pub hp: f32,
    pub max_hp: f32,
}

/// The hero or tower with its effective (upgrade + skill + meta) stats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatantView {
    pub kind: CombatantKind,
    pub position: Vec2,
    pub damage: f32,
    pub range: f32,
    pub fire_rate: f32,
    pub crit_chance: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: SlotId,
    pub enemy_type: EnemyType,
    pub position: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub size: f32,
    pub color: String,
    pub stunned: bool,
    pub flashing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec2,
    pub is_crit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingTextView {
    pub position: Vec2,
    pub text: String,
    /// Remaining life in [0, 1], for fading.
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeView {
    pub stat: Stat,
    pub level: u32,
    pub cost: u32,
    pub affordable: bool,
    /// The stat already sits at its cap.
    pub maxed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillView {
    pub skill: SkillId,
    pub level: u32,
    pub max_level: u32,
    pub unlock_wave: u32,
    pub requires: Option<SkillId>,
    pub cost: u32,
    pub purchasable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaView {
    pub upgrade: MetaUpgrade,
    pub level: u32,
    pub max_level: u32,
    pub cost: u32,
}
