//! Per-run gold economy and stat upgrade pricing.

use std::collections::BTreeMap;

use rampart_core::enums::{SkillId, Stat};

/// Why a purchase or wave command was rejected. Rejections never mutate state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    #[error("insufficient funds: need {cost}, have {gold}")]
    InsufficientFunds { cost: u32, gold: i64 },
    #[error("already at max level")]
    MaxLevel,
    #[error("stat has no effect for this combatant")]
    NotApplicable,
    #[error("locked until wave {unlock_wave}")]
    Locked { unlock_wave: u32 },
    #[error("requires {0:?}")]
    MissingPrerequisite(SkillId),
    #[error("only allowed between waves")]
    NotBetweenWaves,
    #[error("game is over")]
    GameOver,
}

/// Pricing and effect of one stat upgrade track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeSpec {
    pub base_cost: f64,
    /// Geometric cost growth per level, always > 1.
    pub multiplier: f64,
    /// Added to the stat per level.
    pub delta: f32,
    /// Hard maximum for the upgraded stat.
    pub cap: f32,
}

pub fn upgrade_spec(stat: Stat) -> UpgradeSpec {
    let (base_cost, multiplier, delta, cap) = match stat {
        Stat::Damage => (20.0, 1.15, 5.0, 500.0),
        Stat::Range => (25.0, 1.2, 15.0, 400.0),
        Stat::FireRate => (30.0, 1.2, 0.2, 10.0),
        Stat::Crit => (40.0, 1.25, 2.0, 50.0),
        Stat::Speed => (20.0, 1.15, 15.0, 400.0),
    };
    UpgradeSpec {
        base_cost,
        multiplier,
        delta,
        cap,
    }
}

/// `ceil(base * multiplier^level * discount)`.
pub fn upgrade_cost(stat: Stat, level: u32, discount: f64) -> u32 {
    let spec = upgrade_spec(stat);
    (spec.base_cost * spec.multiplier.powi(level as i32) * discount).ceil() as u32
}

/// Gold, kills and upgrade levels for the current run.
///
/// `pay` does not check the balance. Every caller checks `can_afford` first;
/// skipping it drives gold negative.
#[derive(Debug, Clone)]
pub struct Economy {
    gold: i64,
    kills: u32,
    levels: BTreeMap<Stat, u32>,
    discount: f64,
}

impl Economy {
    pub fn new(starting_gold: i64, discount: f64) -> Self {
        Self {
            gold: starting_gold,
            kills: 0,
            levels: BTreeMap::new(),
            discount,
        }
    }

    /// Restore a saved run.
    pub fn restore(gold: i64, kills: u32, levels: BTreeMap<Stat, u32>, discount: f64) -> Self {
        Self {
            gold,
            kills,
            levels,
            discount,
        }
    }

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn set_discount(&mut self, discount: f64) {
        self.discount = discount;
    }

    pub fn level(&self, stat: Stat) -> u32 {
        self.levels.get(&stat).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> &BTreeMap<Stat, u32> {
        &self.levels
    }

    /// Current price of the next level of `stat`.
    pub fn cost(&self, stat: Stat) -> u32 {
        upgrade_cost(stat, self.level(stat), self.discount)
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.gold >= i64::from(cost)
    }

    /// Check affordability, producing the rejection the caller reports.
    pub fn check_afford(&self, cost: u32) -> Result<(), PurchaseError> {
        if self.can_afford(cost) {
            Ok(())
        } else {
            Err(PurchaseError::InsufficientFunds {
                cost,
                gold: self.gold,
            })
        }
    }

    /// Deduct `cost` unconditionally.
    pub fn pay(&mut self, cost: u32) {
        self.gold -= i64::from(cost);
    }

    pub fn earn(&mut self, amount: i64) {
        self.gold += amount;
    }

    pub fn record_kill(&mut self) {
        self.kills += 1;
    }

    /// Bump the level of `stat` after a successful purchase. Returns the new level.
    pub fn raise_level(&mut self, stat: Stat) -> u32 {
        let level = self.levels.entry(stat).or_insert(0);
        *level += 1;
        *level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_level_costs_base() {
        assert_eq!(upgrade_cost(Stat::Damage, 0, 1.0), 20);
        assert_eq!(upgrade_cost(Stat::Range, 0, 1.0), 25);
        assert_eq!(upgrade_cost(Stat::FireRate, 0, 1.0), 30);
        assert_eq!(upgrade_cost(Stat::Crit, 0, 1.0), 40);
        assert_eq!(upgrade_cost(Stat::Speed, 0, 1.0), 20);
    }

    #[test]
    fn test_cost_rounds_up() {
        // 20 * 1.15 = 23.0, 20 * 1.15^2 = 26.45
        assert_eq!(upgrade_cost(Stat::Damage, 1, 1.0), 23);
        assert_eq!(upgrade_cost(Stat::Damage, 2, 1.0), 27);
    }

    #[test]
    fn test_cost_monotonic_in_level() {
        for stat in Stat::ALL {
            for discount in [1.0, 0.8, 0.6] {
                for level in 0..40 {
                    assert!(
                        upgrade_cost(stat, level + 1, discount) >= upgrade_cost(stat, level, discount),
                        "{stat:?} level {level} discount {discount}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_discount_lowers_cost() {
        assert_eq!(upgrade_cost(Stat::Crit, 0, 0.5), 20);
        assert!(upgrade_cost(Stat::Range, 5, 0.9) < upgrade_cost(Stat::Range, 5, 1.0));
    }

    #[test]
    fn test_pay_deducts_exactly() {
        let mut eco = Economy::new(100, 1.0);
        let cost = eco.cost(Stat::Damage);
        assert!(eco.can_afford(cost));
        eco.pay(cost);
        assert_eq!(eco.raise_level(Stat::Damage), 1);
        assert_eq!(eco.gold(), 80);
        assert_eq!(eco.cost(Stat::Damage), 23);
    }

    #[test]
    fn test_unguarded_pay_goes_negative() {
        let mut eco = Economy::new(10, 1.0);
        assert!(eco.check_afford(30).is_err());
        eco.pay(30);
        assert_eq!(eco.gold(), -20);
    }

    #[test]
    fn test_check_afford_reports_shortfall() {
        let eco = Economy::new(15, 1.0);
        assert_eq!(
            eco.check_afford(20),
            Err(PurchaseError::InsufficientFunds { cost: 20, gold: 15 })
        );
        assert_eq!(eco.check_afford(15), Ok(()));
    }
}
