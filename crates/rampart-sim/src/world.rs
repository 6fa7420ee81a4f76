//! The playfield: entity pools, the current path and the castle.

use glam::Vec2;
use rand_chacha::ChaCha8Rng;

use rampart_core::constants::{CASTLE_INSET, CASTLE_MAX_HP};
use rampart_core::enums::EnemyType;
use rampart_core::types::{SlotId, Viewport};

use crate::enemy::Enemy;
use crate::fx::Effects;
use crate::path::{self, Path};
use crate::pool::Pool;
use crate::projectile::{Motion, Projectile, ShotSpec};

#[derive(Debug, Clone)]
pub struct Castle {
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
}

impl Castle {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pos: castle_anchor(viewport),
            hp: CASTLE_MAX_HP,
            max_hp: CASTLE_MAX_HP,
        }
    }

    /// Apply damage. Returns `true` once HP reaches zero.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.hp = (self.hp - amount).max(0.0);
        self.is_destroyed()
    }

    pub fn recover(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }
}

pub fn castle_anchor(viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width - CASTLE_INSET, viewport.height * 0.5)
}

#[derive(Debug, Clone)]
pub struct World {
    pub viewport: Viewport,
    pub path: Path,
    pub enemies: Pool<Enemy>,
    pub projectiles: Pool<Projectile>,
    pub castle: Castle,
    pub fx: Effects,
}

impl World {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            path: Path::straight(viewport),
            enemies: Pool::new(),
            projectiles: Pool::new(),
            castle: Castle::new(viewport),
            fx: Effects::new(),
        }
    }

    /// Pick a fresh path for the next wave.
    pub fn regenerate_path(&mut self, rng: &mut ChaCha8Rng) {
        self.path = path::generate(self.viewport, rng);
    }

    /// Adopt a new viewport. The current path stays until the next wave.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.castle.pos = castle_anchor(viewport);
    }

    pub fn spawn_enemy(&mut self, kind: EnemyType, wave: u32) -> SlotId {
        let spawn = self.path.spawn();
        let (id, slot) = self.enemies.acquire();
        slot.init(kind, wave, spawn);
        id
    }

    pub fn spawn_projectile(&mut self, origin: Vec2, motion: Motion, shot: ShotSpec) -> SlotId {
        let (id, slot) = self.projectiles.acquire();
        slot.init(origin, motion, shot);
        id
    }

    /// Back to a fresh playfield at the current viewport. Pools keep their
    /// capacity.
    pub fn reset(&mut self) {
        self.enemies.release_all();
        self.projectiles.release_all();
        self.fx.clear();
        self.path = Path::straight(self.viewport);
        self.castle = Castle::new(self.viewport);
    }
}
