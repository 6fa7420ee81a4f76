//! Snapshot system: assembles the read-only `GameStateSnapshot` for the renderer.

use rampart_core::enums::*;
use rampart_core::events::GameEvent;
use rampart_core::state::*;
use rampart_core::types::SimTime;

use crate::combatant::Combatant;
use crate::economy::Economy;
use crate::meta::{self, MetaProgress};
use crate::skills::{self, SkillTree};
use crate::wave::WaveManager;
use crate::world::World;

/// Everything the snapshot reads, borrowed from the engine.
pub struct SnapshotSource<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub world: &'a World,
    pub combatant: &'a Combatant,
    pub economy: &'a Economy,
    pub skills: &'a SkillTree,
    pub meta: &'a MetaProgress,
    pub waves: &'a WaveManager,
    pub can_call_early: bool,
}

pub fn build_snapshot(src: &SnapshotSource<'_>, events: Vec<GameEvent>) -> GameStateSnapshot {
    let world = src.world;
    GameStateSnapshot {
        time: src.time,
        phase: src.phase,
        viewport: world.viewport,
        wave: WaveView {
            number: src.waves.number(),
            phase: src.waves.phase(),
            spawned: src.waves.spawned() as u32,
            total: src.waves.total() as u32,
            spawn_interval_ms: src.waves.interval_ms(),
            can_call_early: src.can_call_early,
        },
        economy: EconomyView {
            gold: src.economy.gold(),
            gems: src.meta.gems,
            kills: src.economy.kills(),
            discount: src.economy.discount(),
        },
        castle: CastleView {
            position: world.castle.pos,
            hp: world.castle.hp,
            max_hp: world.castle.max_hp,
        },
        combatant: build_combatant(src.combatant),
        path: world.path.waypoints().to_vec(),
        enemies: build_enemies(src),
        projectiles: world
            .projectiles
            .iter_active()
            .map(|(_, p)| ProjectileView {
                position: p.pos,
                is_crit: p.is_crit,
            })
            .collect(),
        floating_texts: world.fx.text_views(),
        particles: world.fx.particle_views(),
        shake: world.fx.shake_magnitude(),
        upgrades: build_upgrades(src),
        skills: build_skills(src),
        meta: build_meta(src.meta),
        events,
    }
}

fn build_combatant(c: &Combatant) -> CombatantView {
    let stats = c.effective();
    CombatantView {
        kind: c.kind,
        position: c.pos,
        damage: stats.damage,
        range: stats.range,
        fire_rate: stats.fire_rate,
        crit_chance: stats.crit,
        speed: stats.speed,
    }
}

fn build_enemies(src: &SnapshotSource<'_>) -> Vec<EnemyView> {
    let now = src.time.elapsed_ms;
    src.world
        .enemies
        .iter_active()
        .map(|(id, e)| EnemyView {
            id,
            enemy_type: e.enemy_type,
            position: e.pos,
            hp: e.hp,
            max_hp: e.max_hp,
            size: e.size,
            color: e.enemy_type.color().to_string(),
            stunned: e.is_stunned(now),
            flashing: e.hit_flash_ms > 0.0,
        })
        .collect()
}

fn build_upgrades(src: &SnapshotSource<'_>) -> Vec<UpgradeView> {
    Stat::ALL
        .iter()
        .filter(|&&stat| src.combatant.kind.uses(stat))
        .map(|&stat| {
            let cost = src.economy.cost(stat);
            UpgradeView {
                stat,
                level: src.economy.level(stat),
                cost,
                affordable: src.economy.can_afford(cost),
                maxed: src.combatant.is_maxed(stat),
            }
        })
        .collect()
}

fn build_skills(src: &SnapshotSource<'_>) -> Vec<SkillView> {
    SkillId::ALL
        .iter()
        .map(|&id| {
            let def = skills::def(id);
            SkillView {
                skill: id,
                level: src.skills.level(id),
                max_level: def.max_level,
                unlock_wave: def.unlock_wave,
                requires: def.requires,
                cost: src.skills.cost(id),
                purchasable: src.phase != GamePhase::GameOver
                    && src
                        .skills
                        .check(id, src.waves.number(), src.economy.gold())
                        .is_ok(),
            }
        })
        .collect()
}

fn build_meta(progress: &MetaProgress) -> Vec<MetaView> {
    MetaUpgrade::ALL
        .iter()
        .map(|&upgrade| MetaView {
            upgrade,
            level: progress.level(upgrade),
            max_level: meta::max_level(upgrade),
            cost: progress.cost(upgrade),
        })
        .collect()
}
