//! Combat system: hero movement, target acquisition and firing.

use glam::Vec2;
use rand_chacha::ChaCha8Rng;

use rampart_core::constants::*;
use rampart_core::events::GameEvent;
use rampart_core::types::SlotId;

use crate::combatant::Combatant;
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::projectile::{Motion, ShotSpec};
use crate::skills::SkillTree;
use crate::world::World;

/// Parameters shared by every projectile in one volley.
pub fn shot_spec(skills: &SkillTree, damage: f32, is_crit: bool) -> ShotSpec {
    ShotSpec {
        damage,
        is_crit,
        speed: skills.projectile_speed(),
        pierce: skills.pierce(),
        stun_ms: if is_crit { skills.crit_stun_ms() } else { 0.0 },
    }
}

/// Move the combatant, then fire a volley if the gate is open and a target
/// is in range. Returns `true` if a volley went out.
#[allow(clippy::too_many_arguments)]
pub fn run(
    combatant: &mut Combatant,
    world: &mut World,
    skills: &SkillTree,
    deferred: &mut DeferredQueue,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
    dt: f32,
    now_ms: f64,
) -> bool {
    combatant.integrate(dt, world.viewport);

    if !combatant.can_fire(now_ms) {
        return false;
    }
    let Some(target) = combatant.find_target(&world.enemies, &[]) else {
        return false;
    };
    let Some(target_pos) = world.enemies.get_active(target).map(|e| e.pos) else {
        return false;
    };

    let is_crit = combatant.roll_crit(rng);
    let damage = combatant.shot_damage(is_crit);
    let shot = shot_spec(skills, damage, is_crit);
    let origin = combatant.pos;

    world.spawn_projectile(origin, Motion::Homing(target), shot);
    combatant.mark_fired(now_ms);
    events.push(GameEvent::Shoot {
        x: origin.x,
        y: origin.y,
        is_crit,
    });

    // Multi-shot: one extra projectile per level at other in-range enemies.
    let mut taken = vec![target];
    for _ in 0..skills.extra_targets() {
        let Some(extra) = combatant.find_target(&world.enemies, &taken) else {
            break;
        };
        world.spawn_projectile(origin, Motion::Homing(extra), shot);
        taken.push(extra);
    }

    // Spread-shot: straight projectiles fanned around the aim line,
    // alternating sides at growing angles.
    let aim = (target_pos - origin).try_normalize().unwrap_or(Vec2::X);
    for i in 0..skills.spread_projectiles() {
        let ring = (i / 2 + 1) as f32;
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let dir = Vec2::from_angle(side * ring * SPREAD_ANGLE_STEP).rotate(aim);
        world.spawn_projectile(origin, Motion::Straight { dir }, shot);
    }

    // Rapid-fire: half-damage follow-ups at the primary target.
    for k in 1..=skills.follow_up_shots() {
        deferred.schedule(
            now_ms + RAPID_FIRE_INTERVAL_MS * f64::from(k),
            DeferredAction::FollowUpShot {
                target,
                damage: damage * RAPID_FIRE_DAMAGE_FACTOR,
                is_crit,
            },
        );
    }

    true
}

/// Fire a scheduled follow-up. Dropped if the target is gone.
pub fn fire_follow_up(
    combatant: &Combatant,
    world: &mut World,
    skills: &SkillTree,
    events: &mut Vec<GameEvent>,
    target: SlotId,
    damage: f32,
    is_crit: bool,
) -> bool {
    if !world.enemies.is_active(target) {
        return false;
    }
    let origin = combatant.pos;
    world.spawn_projectile(origin, Motion::Homing(target), shot_spec(skills, damage, is_crit));
    events.push(GameEvent::Shoot {
        x: origin.x,
        y: origin.y,
        is_crit,
    });
    true
}
