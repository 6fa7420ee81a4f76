//! Enemy state machine: spawn, path following, stun, damage and death,
//! plus the type-keyed special behaviors (heal aura, split on death).

use glam::Vec2;

use rampart_core::constants::*;
use rampart_core::enums::{EnemyType, SpecialAbility};
use rampart_core::types::SlotId;

use crate::path::Path;
use crate::pool::{Pool, Poolable};

/// Base stats for an enemy archetype, before wave scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTemplate {
    pub base_hp: f32,
    /// Pixels per second.
    pub speed: f32,
    pub reward: u32,
    pub size: f32,
}

pub fn template(kind: EnemyType) -> EnemyTemplate {
    match kind {
        EnemyType::Normal => EnemyTemplate {
            base_hp: 30.0,
            speed: 60.0,
            reward: 5,
            size: 20.0,
        },
        EnemyType::Tank => EnemyTemplate {
            base_hp: 120.0,
            speed: 35.0,
            reward: 15,
            size: 30.0,
        },
        EnemyType::Runner => EnemyTemplate {
            base_hp: 15.0,
            speed: 120.0,
            reward: 4,
            size: 14.0,
        },
        EnemyType::Healer => EnemyTemplate {
            base_hp: 40.0,
            speed: 50.0,
            reward: 10,
            size: 22.0,
        },
        EnemyType::Splitter => EnemyTemplate {
            base_hp: 60.0,
            speed: 50.0,
            reward: 8,
            size: 24.0,
        },
    }
}

/// HP multiplier for enemies spawned in `wave`.
pub fn hp_modifier(wave: u32) -> f32 {
    1.0 + wave as f32 * HP_SCALE_PER_WAVE
}

/// Speed multiplier for enemies spawned in `wave`.
pub fn speed_modifier(wave: u32) -> f32 {
    1.0 + (wave as f32 * SPEED_SCALE_PER_WAVE).min(SPEED_SCALE_CAP)
}

/// A pooled enemy.
#[derive(Debug, Clone, Default)]
pub struct Enemy {
    pub active: bool,
    pub enemy_type: EnemyType,
    pub pos: Vec2,
    /// Index of the waypoint currently being walked toward.
    pub path_index: usize,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub reward: u32,
    pub size: f32,
    /// Simulation time (ms) until which the enemy is frozen.
    pub stunned_until_ms: f64,
    pub hit_flash_ms: f32,
    pub special_timer_ms: f32,
}

/// Outcome of one movement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyStep {
    /// Inactive or stunned; nothing happened.
    Idle,
    Moved,
    /// Walked off the end of the path. The enemy is now inactive.
    ReachedEnd,
}

impl Poolable for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Enemy {
    /// Reset this slot as a fresh enemy standing on the spawn waypoint.
    pub fn init(&mut self, kind: EnemyType, wave: u32, spawn: Vec2) {
        let t = template(kind);
        let max_hp = t.base_hp * hp_modifier(wave);
        *self = Self {
            active: true,
            enemy_type: kind,
            pos: spawn,
            // Index 0 is the spawn point the enemy already occupies.
            path_index: 1,
            hp: max_hp,
            max_hp,
            speed: t.speed * speed_modifier(wave),
            reward: t.reward,
            size: t.size,
            stunned_until_ms: 0.0,
            hit_flash_ms: 0.0,
            special_timer_ms: 0.0,
        };
    }

    /// Reset this slot as a split child of `parent`.
    pub fn init_split_child(&mut self, parent: &Enemy, wave: u32, offset: Vec2) {
        let max_hp = parent.max_hp * SPLIT_CHILD_HP_FRACTION;
        *self = Self {
            active: true,
            enemy_type: EnemyType::Normal,
            pos: parent.pos + offset,
            path_index: parent.path_index,
            hp: max_hp,
            max_hp,
            speed: template(EnemyType::Normal).speed
                * SPLIT_CHILD_SPEED_FACTOR
                * speed_modifier(wave),
            reward: SPLIT_CHILD_REWARD,
            size: SPLIT_CHILD_SIZE,
            stunned_until_ms: 0.0,
            hit_flash_ms: 0.0,
            special_timer_ms: 0.0,
        };
    }

    pub fn special(&self) -> SpecialAbility {
        self.enemy_type.special()
    }

    pub fn is_stunned(&self, now_ms: f64) -> bool {
        now_ms < self.stunned_until_ms
    }

    /// Freeze until `until_ms`. A longer existing stun is kept.
    pub fn stun(&mut self, until_ms: f64) {
        self.stunned_until_ms = self.stunned_until_ms.max(until_ms);
    }

    /// Advance along the path by `dt` seconds.
    pub fn update(&mut self, path: &Path, dt: f32, now_ms: f64) -> EnemyStep {
        if !self.active {
            return EnemyStep::Idle;
        }
        self.hit_flash_ms = (self.hit_flash_ms - dt * 1000.0).max(0.0);
        if self.is_stunned(now_ms) {
            return EnemyStep::Idle;
        }

        let target = match path.get(self.path_index) {
            Some(target) => target,
            None => {
                self.active = false;
                return EnemyStep::ReachedEnd;
            }
        };

        let to_target = target - self.pos;
        let dist = to_target.length();
        let step = self.speed * dt;
        if step >= dist {
            self.pos = target;
        } else {
            self.pos += to_target / dist * step;
        }
        if self.pos.distance(target) < WAYPOINT_REACHED_DIST {
            self.path_index += 1;
        }
        EnemyStep::Moved
    }

    /// Subtract `amount` HP. Returns `true` only on the hit that kills.
    ///
    /// A dead or inactive enemy ignores further damage, so several projectiles
    /// landing on the same tick pay out one death.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active || self.hp <= 0.0 {
            return false;
        }
        self.hp -= amount;
        self.hit_flash_ms = HIT_FLASH_MS;
        if self.hp <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Restore HP, capped at max.
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

// --- Special behaviors ---

/// Per-tick hook: `(enemy, pool, dt_ms)`. Returns the number of enemies affected.
pub type TickHook = fn(SlotId, &mut Pool<Enemy>, f32) -> usize;

/// Death hook: `(dead enemy, pool, wave)`. Returns the ids of any spawned enemies.
pub type DeathHook = fn(&Enemy, &mut Pool<Enemy>, u32) -> Vec<SlotId>;

/// Hooks attached to a special ability.
#[derive(Clone, Copy)]
pub struct SpecialBehavior {
    pub on_tick: Option<TickHook>,
    pub on_death: Option<DeathHook>,
}

/// Lookup table from ability to behavior.
pub fn behavior(ability: SpecialAbility) -> SpecialBehavior {
    match ability {
        SpecialAbility::None => SpecialBehavior {
            on_tick: None,
            on_death: None,
        },
        SpecialAbility::Heal => SpecialBehavior {
            on_tick: Some(heal_pulse),
            on_death: None,
        },
        SpecialAbility::Split => SpecialBehavior {
            on_tick: None,
            on_death: Some(split),
        },
    }
}

/// Every `HEAL_INTERVAL_MS`, other active enemies within `HEAL_RADIUS`
/// regain `HEAL_FRACTION` of their own max HP.
pub fn heal_pulse(healer: SlotId, pool: &mut Pool<Enemy>, dt_ms: f32) -> usize {
    let center = match pool.get_mut(healer) {
        Some(enemy) if enemy.active => {
            enemy.special_timer_ms += dt_ms;
            if enemy.special_timer_ms < HEAL_INTERVAL_MS {
                return 0;
            }
            enemy.special_timer_ms -= HEAL_INTERVAL_MS;
            enemy.pos
        }
        _ => return 0,
    };

    let mut healed = 0;
    for (id, other) in pool.iter_active_mut() {
        if id == healer || other.pos.distance(center) > HEAL_RADIUS {
            continue;
        }
        other.heal(other.max_hp * HEAL_FRACTION);
        healed += 1;
    }
    healed
}

/// Spawn `SPLIT_CHILD_COUNT` weakened normal enemies where `parent` died.
pub fn split(parent: &Enemy, pool: &mut Pool<Enemy>, wave: u32) -> Vec<SlotId> {
    (0..SPLIT_CHILD_COUNT)
        .map(|i| {
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            let offset = Vec2::new(side * SPLIT_CHILD_OFFSET, 0.0);
            let (id, slot) = pool.acquire();
            slot.init_split_child(parent, wave, offset);
            id
        })
        .collect()
}
