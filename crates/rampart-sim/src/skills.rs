//! Skill tree: a small prerequisite DAG bought with gold between and during waves.

use std::collections::BTreeMap;

use rampart_core::constants::{PROJECTILE_SPEED, SKILL_COST_GROWTH};
use rampart_core::enums::SkillId;

use crate::combatant::StatBlock;
use crate::economy::PurchaseError;

/// Static description of one skill node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillDef {
    pub id: SkillId,
    pub max_level: u32,
    pub unlock_wave: u32,
    pub requires: Option<SkillId>,
    pub cost_base: f64,
}

pub fn def(id: SkillId) -> SkillDef {
    use SkillId::*;
    let (max_level, unlock_wave, requires, cost_base) = match id {
        Overclock => (5, 1, None, 50.0),
        Velocity => (5, 2, None, 40.0),
        Sharpshooter => (5, 3, None, 60.0),
        Fortify => (4, 4, None, 80.0),
        Piercing => (3, 5, Some(Overclock), 100.0),
        RapidFire => (3, 6, Some(Overclock), 120.0),
        Concussion => (3, 7, Some(Sharpshooter), 90.0),
        MultiShot => (3, 8, Some(Sharpshooter), 150.0),
        SpreadShot => (3, 10, Some(MultiShot), 200.0),
    };
    SkillDef {
        id,
        max_level,
        unlock_wave,
        requires,
        cost_base,
    }
}

/// Per-level fire-rate bonus from Overclock.
pub const OVERCLOCK_FIRE_RATE: f32 = 0.5;
/// Per-level projectile speed fraction from Velocity.
pub const VELOCITY_SPEED_FRACTION: f32 = 0.2;
/// Per-level crit bonus (percent) from Sharpshooter.
pub const SHARPSHOOTER_CRIT: f32 = 3.0;
/// Per-level castle max HP from Fortify.
pub const FORTIFY_CASTLE_HP: f32 = 25.0;
/// Per-level stun on crit from Concussion.
pub const CONCUSSION_STUN_MS: f64 = 300.0;

/// Stat bonus granted by a single level of `id`.
pub fn level_bonus(id: SkillId) -> StatBlock {
    let mut bonus = StatBlock::ZERO;
    match id {
        SkillId::Overclock => bonus.fire_rate = OVERCLOCK_FIRE_RATE,
        SkillId::Sharpshooter => bonus.crit = SHARPSHOOTER_CRIT,
        _ => {}
    }
    bonus
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillTree {
    levels: BTreeMap<SkillId, u32>,
}

impl SkillTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from saved levels, clamping anything beyond a node's max.
    pub fn restore(levels: &BTreeMap<SkillId, u32>) -> Self {
        let levels = levels
            .iter()
            .map(|(id, level)| (*id, (*level).min(def(*id).max_level)))
            .filter(|(_, level)| *level > 0)
            .collect();
        Self { levels }
    }

    pub fn level(&self, id: SkillId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &BTreeMap<SkillId, u32> {
        &self.levels
    }

    /// `ceil(cost_base * 1.5^level)`.
    pub fn cost(&self, id: SkillId) -> u32 {
        let d = def(id);
        (d.cost_base * SKILL_COST_GROWTH.powi(self.level(id) as i32)).ceil() as u32
    }

    /// Validate a purchase at `wave` with `gold` on hand. Returns the price.
    pub fn check(&self, id: SkillId, wave: u32, gold: i64) -> Result<u32, PurchaseError> {
        let d = def(id);
        if self.level(id) >= d.max_level {
            return Err(PurchaseError::MaxLevel);
        }
        if wave < d.unlock_wave {
            return Err(PurchaseError::Locked {
                unlock_wave: d.unlock_wave,
            });
        }
        if let Some(parent) = d.requires {
            if self.level(parent) == 0 {
                return Err(PurchaseError::MissingPrerequisite(parent));
            }
        }
        let cost = self.cost(id);
        if gold < i64::from(cost) {
            return Err(PurchaseError::InsufficientFunds { cost, gold });
        }
        Ok(cost)
    }

    /// Record one purchased level. Returns the new level.
    pub fn raise(&mut self, id: SkillId) -> u32 {
        let level = self.levels.entry(id).or_insert(0);
        *level += 1;
        *level
    }

    /// Cumulative stat bonus for the stored levels, derived in one step.
    pub fn stat_bonus(&self) -> StatBlock {
        let mut bonus = StatBlock::ZERO;
        bonus.fire_rate = OVERCLOCK_FIRE_RATE * self.level(SkillId::Overclock) as f32;
        bonus.crit = SHARPSHOOTER_CRIT * self.level(SkillId::Sharpshooter) as f32;
        bonus
    }

    pub fn projectile_speed(&self) -> f32 {
        PROJECTILE_SPEED * (1.0 + VELOCITY_SPEED_FRACTION * self.level(SkillId::Velocity) as f32)
    }

    pub fn pierce(&self) -> i32 {
        self.level(SkillId::Piercing) as i32
    }

    pub fn follow_up_shots(&self) -> u32 {
        self.level(SkillId::RapidFire)
    }

    /// Stun applied by critical hits.
    pub fn crit_stun_ms(&self) -> f64 {
        CONCUSSION_STUN_MS * f64::from(self.level(SkillId::Concussion))
    }

    pub fn extra_targets(&self) -> u32 {
        self.level(SkillId::MultiShot)
    }

    pub fn spread_projectiles(&self) -> u32 {
        self.level(SkillId::SpreadShot)
    }
}
