//! The single player-controlled shooter: a mobile hero or a fixed tower.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use rampart_core::constants::*;
use rampart_core::enums::{CombatantKind, Stat};
use rampart_core::types::{SlotId, Viewport};

use crate::economy::upgrade_spec;
use crate::enemy::Enemy;
use crate::pool::Pool;

/// One value per combat stat. Also the persisted `hero` document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatBlock {
    pub damage: f32,
    pub fire_rate: f32,
    pub range: f32,
    /// Percent.
    pub crit: f32,
    pub speed: f32,
}

impl StatBlock {
    pub const ZERO: StatBlock = StatBlock {
        damage: 0.0,
        fire_rate: 0.0,
        range: 0.0,
        crit: 0.0,
        speed: 0.0,
    };

    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Damage => self.damage,
            Stat::Range => self.range,
            Stat::FireRate => self.fire_rate,
            Stat::Crit => self.crit,
            Stat::Speed => self.speed,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::Damage => &mut self.damage,
            Stat::Range => &mut self.range,
            Stat::FireRate => &mut self.fire_rate,
            Stat::Crit => &mut self.crit,
            Stat::Speed => &mut self.speed,
        }
    }

    pub fn add(&mut self, stat: Stat, delta: f32) {
        *self.slot(stat) += delta;
    }

    pub fn combined(&self, other: &StatBlock) -> StatBlock {
        StatBlock {
            damage: self.damage + other.damage,
            fire_rate: self.fire_rate + other.fire_rate,
            range: self.range + other.range,
            crit: self.crit + other.crit,
            speed: self.speed + other.speed,
        }
    }
}

/// Starting stats.
impl Default for StatBlock {
    fn default() -> Self {
        Self {
            damage: BASE_DAMAGE,
            fire_rate: BASE_FIRE_RATE,
            range: BASE_RANGE,
            crit: BASE_CRIT_CHANCE,
            speed: BASE_HERO_SPEED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Combatant {
    pub kind: CombatantKind,
    pub pos: Vec2,
    /// Stats bought with gold, bounded by the upgrade caps.
    pub upgraded: StatBlock,
    /// Skill and meta bonuses layered on top.
    pub bonus: StatBlock,
    /// Simulation time of the last primary shot.
    pub last_shot_ms: Option<f64>,
    /// Directional input, magnitude at most 1.
    pub move_input: Vec2,
}

impl Combatant {
    pub fn new(kind: CombatantKind, viewport: Viewport) -> Self {
        Self {
            kind,
            pos: anchor(kind, viewport),
            upgraded: StatBlock::default(),
            bonus: StatBlock::ZERO,
            last_shot_ms: None,
            move_input: Vec2::ZERO,
        }
    }

    /// Upgraded stats plus bonuses.
    pub fn effective(&self) -> StatBlock {
        self.upgraded.combined(&self.bonus)
    }

    pub fn stat(&self, stat: Stat) -> f32 {
        self.upgraded.get(stat) + self.bonus.get(stat)
    }

    /// Minimum spacing between primary shots.
    pub fn fire_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.stat(Stat::FireRate))
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last >= self.fire_interval_ms(),
            None => true,
        }
    }

    pub fn mark_fired(&mut self, now_ms: f64) {
        self.last_shot_ms = Some(now_ms);
    }

    /// Nearest active enemy within range, skipping `exclude`. Exact ties go
    /// to the lowest slot index.
    pub fn find_target(&self, enemies: &Pool<Enemy>, exclude: &[SlotId]) -> Option<SlotId> {
        let range = self.stat(Stat::Range);
        let mut best: Option<(SlotId, f32)> = None;
        for (id, enemy) in enemies.iter_active() {
            if exclude.contains(&id) {
                continue;
            }
            let d = self.pos.distance(enemy.pos);
            if d > range {
                continue;
            }
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn roll_crit(&self, rng: &mut ChaCha8Rng) -> bool {
        rng.gen::<f32>() * 100.0 < self.stat(Stat::Crit)
    }

    pub fn shot_damage(&self, is_crit: bool) -> f32 {
        let base = self.stat(Stat::Damage);
        if is_crit {
            base * CRIT_MULTIPLIER
        } else {
            base
        }
    }

    /// Whether the upgraded value of `stat` already sits at its cap.
    pub fn is_maxed(&self, stat: Stat) -> bool {
        self.upgraded.get(stat) >= upgrade_spec(stat).cap
    }

    /// Apply one purchased level of `stat`, clamped to its cap.
    pub fn apply_upgrade(&mut self, stat: Stat) {
        let spec = upgrade_spec(stat);
        let slot = self.upgraded.slot(stat);
        *slot = (*slot + spec.delta).min(spec.cap);
    }

    pub fn set_move_input(&mut self, x: f32, y: f32) {
        let input = Vec2::new(x, y);
        self.move_input = if input.is_finite() {
            input.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
    }

    /// Integrate hero movement. Towers never move.
    pub fn integrate(&mut self, dt: f32, viewport: Viewport) {
        if self.kind != CombatantKind::Hero {
            return;
        }
        let next = self.pos + self.move_input * self.stat(Stat::Speed) * dt;
        self.pos = viewport.clamp(next);
    }

    /// Follow a viewport change: towers re-anchor, heroes stay in bounds.
    pub fn relayout(&mut self, viewport: Viewport) {
        self.pos = match self.kind {
            CombatantKind::Tower => anchor(self.kind, viewport),
            CombatantKind::Hero => viewport.clamp(self.pos),
        };
    }
}

/// Starting position for a combatant kind.
pub fn anchor(kind: CombatantKind, viewport: Viewport) -> Vec2 {
    match kind {
        CombatantKind::Hero => viewport.center(),
        CombatantKind::Tower => Vec2::new(viewport.width - TOWER_INSET, viewport.height * 0.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::enums::EnemyType;
    use rand::SeedableRng;

    fn enemy_at(pool: &mut Pool<Enemy>, pos: Vec2) -> SlotId {
        let (id, slot) = pool.acquire();
        slot.init(EnemyType::Normal, 0, pos);
        id
    }

    #[test]
    fn test_fire_gate_at_base_rate() {
        let mut c = Combatant::new(CombatantKind::Tower, Viewport::default());
        assert!(c.can_fire(0.0));
        c.mark_fired(1000.0);
        assert!(!c.can_fire(1000.0 + 833.0));
        assert!(c.can_fire(1000.0 + 834.0));
    }

    #[test]
    fn test_targets_nearest_in_range() {
        let c = Combatant::new(CombatantKind::Hero, Viewport::default());
        let mut enemies = Pool::new();
        let far = enemy_at(&mut enemies, c.pos + Vec2::new(120.0, 0.0));
        let near = enemy_at(&mut enemies, c.pos + Vec2::new(0.0, 50.0));
        enemy_at(&mut enemies, c.pos + Vec2::new(400.0, 0.0));

        assert_eq!(c.find_target(&enemies, &[]), Some(near));
        assert_eq!(c.find_target(&enemies, &[near]), Some(far));
        assert_eq!(c.find_target(&enemies, &[near, far]), None);
    }

    #[test]
    fn test_exact_tie_goes_to_first_slot() {
        let c = Combatant::new(CombatantKind::Hero, Viewport::default());
        let mut enemies = Pool::new();
        let a = enemy_at(&mut enemies, c.pos + Vec2::new(30.0, 0.0));
        enemy_at(&mut enemies, c.pos - Vec2::new(30.0, 0.0));
        assert_eq!(c.find_target(&enemies, &[]), Some(a));
    }

    #[test]
    fn test_upgrade_clamps_to_cap() {
        let mut c = Combatant::new(CombatantKind::Tower, Viewport::default());
        for _ in 0..100 {
            c.apply_upgrade(Stat::FireRate);
        }
        assert_eq!(c.upgraded.fire_rate, 10.0);
        assert!(c.is_maxed(Stat::FireRate));
        c.bonus.fire_rate = 1.5;
        assert_eq!(c.stat(Stat::FireRate), 11.5, "bonuses sit above the cap");
    }

    #[test]
    fn test_crit_damage_multiplier() {
        let c = Combatant::new(CombatantKind::Tower, Viewport::default());
        assert_eq!(c.shot_damage(false), 10.0);
        assert_eq!(c.shot_damage(true), 25.0);
    }

    #[test]
    fn test_crit_chance_zero_and_full() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut c = Combatant::new(CombatantKind::Tower, Viewport::default());
        c.upgraded.crit = 0.0;
        assert!((0..200).all(|_| !c.roll_crit(&mut rng)));
        c.upgraded.crit = 100.0;
        assert!((0..200).all(|_| c.roll_crit(&mut rng)));
    }

    #[test]
    fn test_hero_moves_and_stays_in_bounds() {
        let vp = Viewport::default();
        let mut hero = Combatant::new(CombatantKind::Hero, vp);
        hero.set_move_input(3.0, 0.0);
        assert!((hero.move_input.length() - 1.0).abs() < 1e-6);
        hero.integrate(0.1, vp);
        assert!((hero.pos.x - 420.0).abs() < 1e-3);
        for _ in 0..100 {
            hero.integrate(0.1, vp);
        }
        assert_eq!(hero.pos.x, vp.width);
    }

    #[test]
    fn test_tower_ignores_input() {
        let vp = Viewport::default();
        let mut tower = Combatant::new(CombatantKind::Tower, vp);
        let start = tower.pos;
        tower.set_move_input(0.0, -1.0);
        tower.integrate(0.1, vp);
        assert_eq!(tower.pos, start);
        assert_eq!(start, Vec2::new(700.0, 300.0));
    }

    #[test]
    fn test_stat_block_serde_defaults_missing_fields() {
        let block: StatBlock = serde_json::from_str(r#"{"damage":40}"#).unwrap();
        assert_eq!(block.damage, 40.0);
        assert_eq!(block.speed, BASE_HERO_SPEED);
        assert_eq!(block.fire_rate, BASE_FIRE_RATE);
    }
}
