//! Meta-progression: gems and the upgrades they buy. Survives game over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rampart_core::constants::*;
use rampart_core::enums::MetaUpgrade;

use crate::economy::PurchaseError;

pub fn max_level(upgrade: MetaUpgrade) -> u32 {
    match upgrade {
        MetaUpgrade::StartingGold => 10,
        MetaUpgrade::CritChance => 10,
        MetaUpgrade::UpgradeDiscount => 8,
    }
}

/// The persisted meta document: `{gems, levels: {startingGold, critChance, upgradeDiscount}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaProgress {
    pub gems: u32,
    pub levels: BTreeMap<MetaUpgrade, u32>,
}

impl MetaProgress {
    pub fn level(&self, upgrade: MetaUpgrade) -> u32 {
        self.levels
            .get(&upgrade)
            .copied()
            .unwrap_or(0)
            .min(max_level(upgrade))
    }

    /// Gem price of the next level.
    pub fn cost(&self, upgrade: MetaUpgrade) -> u32 {
        META_COST_STEP * (self.level(upgrade) + 1)
    }

    pub fn add_gems(&mut self, gems: u32) {
        self.gems += gems;
    }

    /// Spend gems on one level. Returns the gem cost.
    pub fn purchase(&mut self, upgrade: MetaUpgrade) -> Result<u32, PurchaseError> {
        let level = self.level(upgrade);
        if level >= max_level(upgrade) {
            return Err(PurchaseError::MaxLevel);
        }
        let cost = self.cost(upgrade);
        if self.gems < cost {
            return Err(PurchaseError::InsufficientFunds {
                cost,
                gold: i64::from(self.gems),
            });
        }
        self.gems -= cost;
        self.levels.insert(upgrade, level + 1);
        Ok(cost)
    }

    /// Gold at the start of a new run.
    pub fn starting_gold(&self) -> i64 {
        STARTING_GOLD + META_STARTING_GOLD_PER_LEVEL * i64::from(self.level(MetaUpgrade::StartingGold))
    }

    /// Extra crit chance in percent.
    pub fn crit_bonus(&self) -> f32 {
        META_CRIT_PER_LEVEL * self.level(MetaUpgrade::CritChance) as f32
    }

    /// Multiplier on stat upgrade costs, in (0, 1].
    pub fn discount(&self) -> f64 {
        1.0 - META_DISCOUNT_PER_LEVEL * f64::from(self.level(MetaUpgrade::UpgradeDiscount))
    }
}
