//! Enemy system: path movement, castle hits and per-tick specials.

use rampart_core::constants::ENEMY_REACH_DAMAGE;
use rampart_core::events::GameEvent;

use crate::enemy::{behavior, EnemyStep};
use crate::world::World;

/// Advance every active enemy. Returns `true` if the castle fell this tick.
pub fn run(world: &mut World, dt: f32, now_ms: f64, events: &mut Vec<GameEvent>) -> bool {
    let mut castle_destroyed = false;

    for id in world.enemies.active_ids() {
        let Some(enemy) = world.enemies.get_mut(id) else {
            continue;
        };
        let step = enemy.update(&world.path, dt, now_ms);
        let special = enemy.special();

        match step {
            EnemyStep::ReachedEnd => {
                castle_destroyed |= world.castle.take_damage(ENEMY_REACH_DAMAGE);
                world.fx.shake();
                events.push(GameEvent::CastleHit {
                    damage: ENEMY_REACH_DAMAGE,
                    remaining_hp: world.castle.hp,
                });
            }
            EnemyStep::Moved => {
                if let Some(on_tick) = behavior(special).on_tick {
                    on_tick(id, &mut world.enemies, dt * 1000.0);
                }
            }
            EnemyStep::Idle => {}
        }
    }

    castle_destroyed
}
