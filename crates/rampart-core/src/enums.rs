//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Stats come from the template table in the sim crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyType {
    #[default]
    Normal,
    Tank,
    Runner,
    Healer,
    Splitter,
}

impl EnemyType {
    pub const ALL: [EnemyType; 5] = [
        EnemyType::Normal,
        EnemyType::Tank,
        EnemyType::Runner,
        EnemyType::Healer,
        EnemyType::Splitter,
    ];

    /// Special behavior carried by this archetype.
    pub fn special(self) -> SpecialAbility {
        match self {
            EnemyType::Healer => SpecialAbility::Heal,
            EnemyType::Splitter => SpecialAbility::Split,
            _ => SpecialAbility::None,
        }
    }

    /// Display color (CSS hex) for the renderer.
    pub fn color(self) -> &'static str {
        match self {
            EnemyType::Normal => "#e74c3c",
            EnemyType::Tank => "#8e44ad",
            EnemyType::Runner => "#f1c40f",
            EnemyType::Healer => "#2ecc71",
            EnemyType::Splitter => "#e67e22",
        }
    }
}

/// Type-tagged enemy specialization. Dispatched through a function table,
/// not through per-type structs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAbility {
    #[default]
    None,
    /// Periodically restores HP to nearby enemies.
    Heal,
    /// Spawns two weaker children on death.
    Split,
}

/// Top-level session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// Castle destroyed. Terminal until a new game.
    GameOver,
}

/// Wave manager state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Between waves.
    #[default]
    Idle,
    /// Composition entries still being spawned.
    Spawning,
    /// Everything spawned; waiting for the field to clear.
    AwaitingClear,
}

/// Which combatant the player controls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantKind {
    /// Mobile hero steered by a directional input vector.
    Hero,
    /// Stationary tower next to the castle.
    #[default]
    Tower,
}

impl CombatantKind {
    /// Whether an upgrade to `stat` has any effect. Towers never move.
    pub fn uses(self, stat: Stat) -> bool {
        stat != Stat::Speed || self == CombatantKind::Hero
    }
}

/// Upgradeable combatant stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    Damage,
    Range,
    FireRate,
    Crit,
    /// Movement speed. Hero only.
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 5] = [
        Stat::Damage,
        Stat::Range,
        Stat::FireRate,
        Stat::Crit,
        Stat::Speed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stat::Damage => "damage",
            Stat::Range => "range",
            Stat::FireRate => "fireRate",
            Stat::Crit => "crit",
            Stat::Speed => "speed",
        }
    }
}

/// Node in the skill tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillId {
    Overclock,
    Velocity,
    Sharpshooter,
    Fortify,
    Piercing,
    RapidFire,
    Concussion,
    MultiShot,
    SpreadShot,
}

impl SkillId {
    pub const ALL: [SkillId; 9] = [
        SkillId::Overclock,
        SkillId::Velocity,
        SkillId::Sharpshooter,
        SkillId::Fortify,
        SkillId::Piercing,
        SkillId::RapidFire,
        SkillId::Concussion,
        SkillId::MultiShot,
        SkillId::SpreadShot,
    ];
}

/// Upgrade bought with gems; persists across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetaUpgrade {
    StartingGold,
    CritChance,
    UpgradeDiscount,
}

impl MetaUpgrade {
    pub const ALL: [MetaUpgrade; 3] = [
        MetaUpgrade::StartingGold,
        MetaUpgrade::CritChance,
        MetaUpgrade::UpgradeDiscount,
    ];
}
