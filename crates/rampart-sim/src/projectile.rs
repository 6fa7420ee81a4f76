//! Projectile resolver: homing pursuit, proximity collision and pierce.
//!
//! Collision is a point-in-radius test at the post-move position, not a swept
//! test. At 500-900 px/s and a step of at most 100 ms a projectile moves
//! 50-90 px per tick, so a very small fast enemy can occasionally be skipped.

use glam::Vec2;

use rampart_core::constants::*;
use rampart_core::types::SlotId;

use crate::enemy::Enemy;
use crate::pool::{Pool, Poolable};

/// How a projectile travels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Chase the current position of an enemy slot.
    Homing(SlotId),
    /// Fly in a fixed unit direction (spread shots).
    Straight { dir: Vec2 },
}

impl Default for Motion {
    fn default() -> Self {
        Motion::Straight { dir: Vec2::X }
    }
}

/// Shot parameters decided by the combatant at fire time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub damage: f32,
    pub is_crit: bool,
    /// Px per second.
    pub speed: f32,
    /// Extra enemies this projectile may pass through.
    pub pierce: i32,
    /// Stun applied on hit, 0 for none.
    pub stun_ms: f64,
}

/// One damage application produced by a projectile update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub enemy: SlotId,
    pub damage: f32,
    pub is_crit: bool,
    pub stun_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub active: bool,
    pub pos: Vec2,
    pub motion: Motion,
    pub damage: f32,
    pub is_crit: bool,
    pub speed: f32,
    pub stun_ms: f64,
    pub age_ms: f32,
    pub traveled: f32,
    /// Goes negative on the hit that exhausts the projectile.
    pub pierce_remaining: i32,
    /// Enemies already damaged by this projectile.
    pub hit_set: Vec<SlotId>,
}

impl Poolable for Projectile {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Projectile {
    pub fn init(&mut self, origin: Vec2, motion: Motion, shot: ShotSpec) {
        self.active = true;
        self.pos = origin;
        self.motion = motion;
        self.damage = shot.damage;
        self.is_crit = shot.is_crit;
        self.speed = shot.speed;
        self.stun_ms = shot.stun_ms;
        self.age_ms = 0.0;
        self.traveled = 0.0;
        self.pierce_remaining = shot.pierce;
        self.hit_set.clear();
    }

    /// Move, then collect every active enemy newly overlapped.
    ///
    /// The caller applies the returned hits immediately, so an enemy killed
    /// by this projectile is already inactive when the next one updates.
    pub fn update(&mut self, dt: f32, enemies: &Pool<Enemy>) -> Vec<Hit> {
        let mut hits = Vec::new();
        if !self.active {
            return hits;
        }

        self.age_ms += dt * 1000.0;
        if self.age_ms > PROJECTILE_LIFETIME_MS || self.traveled > PROJECTILE_MAX_TRAVEL {
            self.active = false;
            return hits;
        }

        let step = self.speed * dt;
        match self.motion {
            Motion::Homing(target) => {
                let Some(enemy) = enemies.get_active(target) else {
                    self.active = false;
                    return hits;
                };
                let to_target = enemy.pos - self.pos;
                let dist = to_target.length();
                if step >= dist {
                    self.pos = enemy.pos;
                } else {
                    self.pos += to_target / dist * step;
                }
            }
            Motion::Straight { dir } => {
                self.pos += dir * step;
            }
        }
        self.traveled += step;

        for (id, enemy) in enemies.iter_active() {
            if self.hit_set.contains(&id) {
                continue;
            }
            let radius = (enemy.size * 0.5).max(PROJECTILE_HIT_RADIUS);
            if self.pos.distance(enemy.pos) >= radius {
                continue;
            }
            hits.push(Hit {
                enemy: id,
                damage: self.damage,
                is_crit: self.is_crit,
                stun_ms: self.stun_ms,
            });
            self.hit_set.push(id);
            self.pierce_remaining -= 1;
            if self.pierce_remaining < 0 {
                self.active = false;
                return hits;
            }
        }

        if let Motion::Homing(target) = self.motion {
            if self.hit_set.contains(&target) {
                self.retarget(enemies);
            }
        }
        hits
    }

    /// Chase the nearest active enemy not yet hit, or expire if none is left.
    fn retarget(&mut self, enemies: &Pool<Enemy>) {
        let next = enemies
            .iter_active()
            .filter(|(id, _)| !self.hit_set.contains(id))
            .map(|(id, enemy)| (id, self.pos.distance_squared(enemy.pos)))
            .fold(None, |best: Option<(SlotId, f32)>, (id, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((id, d)),
            });
        match next {
            Some((id, _)) => self.motion = Motion::Homing(id),
            None => self.active = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::enums::EnemyType;

    fn shot(pierce: i32) -> ShotSpec {
        ShotSpec {
            damage: 10.0,
            is_crit: false,
            speed: PROJECTILE_SPEED,
            pierce,
            stun_ms: 0.0,
        }
    }

    fn enemy_at(pool: &mut Pool<Enemy>, pos: Vec2) -> SlotId {
        let (id, slot) = pool.acquire();
        slot.init(EnemyType::Normal, 0, pos);
        id
    }

    #[test]
    fn test_homing_projectile_hits_target() {
        let mut enemies = Pool::new();
        let target = enemy_at(&mut enemies, Vec2::new(40.0, 0.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Homing(target), shot(0));

        let hits = p.update(0.1, &enemies);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy, target);
        assert!(!p.active, "single-hit projectile is spent");
    }

    #[test]
    fn test_dead_target_deactivates_without_damage() {
        let mut enemies = Pool::new();
        let target = enemy_at(&mut enemies, Vec2::new(400.0, 0.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Homing(target), shot(0));
        assert!(p.update(0.016, &enemies).is_empty());

        enemies.release(target);
        assert!(p.update(0.016, &enemies).is_empty());
        assert!(!p.active);
    }

    #[test]
    fn test_reused_target_slot_still_tracked_by_index() {
        let mut enemies = Pool::new();
        let target = enemy_at(&mut enemies, Vec2::new(400.0, 0.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Homing(target), shot(0));
        enemies.release(target);
        let reused = enemy_at(&mut enemies, Vec2::new(0.0, 400.0));
        assert_eq!(reused, target);
        // Handles carry no generation; the projectile follows the new occupant.
        p.update(0.016, &enemies);
        assert!(p.active);
        assert!(p.pos.y > 0.0);
    }

    #[test]
    fn test_lifetime_failsafe() {
        let enemies = Pool::new();
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Straight { dir: Vec2::Y }, ShotSpec {
            speed: 1.0,
            ..shot(0)
        });
        for _ in 0..30 {
            p.update(0.1, &enemies);
        }
        assert!(p.active, "exactly 3000 ms is still alive");
        p.update(0.1, &enemies);
        assert!(!p.active);
    }

    #[test]
    fn test_travel_failsafe() {
        let enemies = Pool::new();
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Straight { dir: Vec2::X }, ShotSpec {
            speed: 30_000.0,
            ..shot(0)
        });
        p.update(0.1, &enemies);
        assert!(p.traveled > PROJECTILE_MAX_TRAVEL);
        p.update(0.1, &enemies);
        assert!(!p.active);
    }

    #[test]
    fn test_pierce_hits_adjacent_enemies_once_each() {
        let mut enemies = Pool::new();
        let a = enemy_at(&mut enemies, Vec2::new(20.0, 0.0));
        let b = enemy_at(&mut enemies, Vec2::new(24.0, 0.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Homing(a), shot(1));

        let hits = p.update(0.1, &enemies);
        let ids: Vec<SlotId> = hits.iter().map(|h| h.enemy).collect();
        assert_eq!(ids, vec![a, b]);
        assert!(!p.active, "pierce 1 allows exactly two hits");
    }

    #[test]
    fn test_pierce_retargets_after_tracked_hit() {
        let mut enemies = Pool::new();
        let a = enemy_at(&mut enemies, Vec2::new(20.0, 0.0));
        let b = enemy_at(&mut enemies, Vec2::new(200.0, 0.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Homing(a), shot(2));

        let hits = p.update(0.1, &enemies);
        assert_eq!(hits.len(), 1);
        assert_eq!(p.motion, Motion::Homing(b));
        assert!(p.active);

        // Hitting `a` again is impossible even if it stays in range.
        let mut total = 0;
        for _ in 0..10 {
            for hit in p.update(0.1, &enemies) {
                assert_ne!(hit.enemy, a);
                total += 1;
            }
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn test_pierce_with_nothing_left_expires() {
        let mut enemies = Pool::new();
        let a = enemy_at(&mut enemies, Vec2::new(20.0, 0.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Homing(a), shot(3));
        assert_eq!(p.update(0.1, &enemies).len(), 1);
        assert!(!p.active);
    }

    #[test]
    fn test_straight_projectile_hits_whatever_it_crosses() {
        let mut enemies = Pool::new();
        let e = enemy_at(&mut enemies, Vec2::new(0.0, 50.0));
        let mut p = Projectile::default();
        p.init(Vec2::ZERO, Motion::Straight { dir: Vec2::Y }, shot(0));
        let hits = p.update(0.1, &enemies);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy, e);
    }
}
