//! Projectile system: flight, collision and damage resolution.

use rand_chacha::ChaCha8Rng;

use rampart_core::events::GameEvent;

use crate::economy::Economy;
use crate::enemy::behavior;
use crate::projectile::Hit;
use crate::world::World;

/// Update every active projectile and apply its hits immediately.
pub fn run(
    world: &mut World,
    economy: &mut Economy,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    wave: u32,
    dt: f32,
    now_ms: f64,
) {
    for id in world.projectiles.active_ids() {
        let Some(projectile) = world.projectiles.get_mut(id) else {
            continue;
        };
        let hits = projectile.update(dt, &world.enemies);
        for hit in hits {
            resolve_hit(world, economy, rng, events, wave, hit, now_ms);
        }
    }
}

/// Damage one enemy. On the killing blow: pay the reward, count the kill and
/// run the enemy's death special.
pub fn resolve_hit(
    world: &mut World,
    economy: &mut Economy,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    wave: u32,
    hit: Hit,
    now_ms: f64,
) {
    let Some(enemy) = world.enemies.get_mut(hit.enemy) else {
        return;
    };
    if !enemy.active {
        return;
    }
    if hit.stun_ms > 0.0 {
        enemy.stun(now_ms + hit.stun_ms);
    }
    let died = enemy.take_damage(hit.damage);
    let dead = enemy.clone();

    world.fx.damage_number(dead.pos, hit.damage, hit.is_crit);
    if !died {
        events.push(GameEvent::EnemyHit {
            enemy: hit.enemy,
            damage: hit.damage,
            is_crit: hit.is_crit,
        });
        return;
    }

    economy.earn(i64::from(dead.reward));
    economy.record_kill();
    world.fx.text(dead.pos, format!("+{}g", dead.reward));
    world.fx.burst(dead.pos, rng);
    events.push(GameEvent::EnemyDeath {
        enemy: hit.enemy,
        enemy_type: dead.enemy_type,
        reward: dead.reward,
        x: dead.pos.x,
        y: dead.pos.y,
    });

    if let Some(on_death) = behavior(dead.special()).on_death {
        on_death(&dead, &mut world.enemies, wave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rampart_core::enums::EnemyType;
    use rampart_core::types::{SlotId, Viewport};
    use rand::SeedableRng;

    use crate::projectile::{Motion, ShotSpec};

    fn hit(enemy: SlotId, damage: f32) -> Hit {
        Hit {
            enemy,
            damage,
            is_crit: false,
            stun_ms: 0.0,
        }
    }

    fn shot(damage: f32) -> ShotSpec {
        ShotSpec {
            damage,
            is_crit: false,
            speed: 500.0,
            pierce: 0,
            stun_ms: 0.0,
        }
    }

    #[test]
    fn test_simultaneous_lethal_hits_pay_once() {
        let mut world = World::new(Viewport::default());
        let mut economy = Economy::new(0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let target = world.spawn_enemy(EnemyType::Normal, 0);
        world.enemies.get_mut(target).unwrap().pos = Vec2::new(100.0, 100.0);
        for _ in 0..3 {
            world.spawn_projectile(Vec2::new(95.0, 100.0), Motion::Homing(target), shot(50.0));
        }

        run(&mut world, &mut economy, &mut rng, &mut events, 1, 0.016, 0.0);

        assert_eq!(economy.gold(), 5);
        assert_eq!(economy.kills(), 1);
        let deaths = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDeath { .. }))
            .count();
        assert_eq!(deaths, 1);
        // The two surplus projectiles lose their target and expire unspent.
        run(&mut world, &mut economy, &mut rng, &mut events, 1, 0.016, 16.0);
        assert_eq!(world.projectiles.active_count(), 0);
    }

    #[test]
    fn test_survivor_emits_hit() {
        let mut world = World::new(Viewport::default());
        let mut economy = Economy::new(0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let target = world.spawn_enemy(EnemyType::Tank, 0);
        resolve_hit(&mut world, &mut economy, &mut rng, &mut events, 1, hit(target, 10.0), 0.0);
        assert!(matches!(events[0], GameEvent::EnemyHit { damage, .. } if damage == 10.0));
        assert_eq!(world.enemies.get(target).unwrap().hp, 110.0);
        assert_eq!(economy.gold(), 0);
    }

    #[test]
    fn test_splitter_death_spawns_children() {
        let mut world = World::new(Viewport::default());
        let mut economy = Economy::new(0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let splitter = world.spawn_enemy(EnemyType::Splitter, 4);
        let parent_max = world.enemies.get(splitter).unwrap().max_hp;

        resolve_hit(&mut world, &mut economy, &mut rng, &mut events, 4, hit(splitter, 1.0e4), 0.0);

        assert_eq!(economy.gold(), 8);
        let children: Vec<f32> = world.enemies.iter_active().map(|(_, e)| e.max_hp).collect();
        assert_eq!(children.len(), 2);
        assert!(children.iter().sum::<f32>() < parent_max);
    }

    #[test]
    fn test_stun_applied_on_hit() {
        let mut world = World::new(Viewport::default());
        let mut economy = Economy::new(0, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let target = world.spawn_enemy(EnemyType::Tank, 0);
        let stunning = Hit {
            stun_ms: 300.0,
            ..hit(target, 1.0)
        };
        resolve_hit(&mut world, &mut economy, &mut rng, &mut events, 1, stunning, 1000.0);
        assert!(world.enemies.get(target).unwrap().is_stunned(1299.0));
        assert!(!world.enemies.get(target).unwrap().is_stunned(1300.0));
    }
}
