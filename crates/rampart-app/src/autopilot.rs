//! A simple scripted player for headless runs.
//!
//! Between waves it spends gold (the cheapest stat, then any open skill) and
//! starts the next wave, calling it early when allowed. In hero mode it also
//! walks toward the nearest enemy until it is comfortably in range.

use tracing::info;

use rampart_core::commands::PlayerCommand;
use rampart_core::enums::{CombatantKind, GamePhase, WavePhase};
use rampart_core::state::GameStateSnapshot;

/// Fraction of range the hero tries to close to.
const HERO_ENGAGE_FRACTION: f32 = 0.6;

#[derive(Debug, Clone)]
pub struct Autopilot {
    kind: CombatantKind,
    /// Highest wave already reported as cleared.
    reported: u32,
}

impl Autopilot {
    pub fn new(kind: CombatantKind) -> Self {
        Self { kind, reported: 0 }
    }

    /// Commands to send in response to `snapshot`.
    pub fn decide(&self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if snapshot.phase != GamePhase::Active {
            return commands;
        }
        if self.kind == CombatantKind::Hero {
            commands.push(steer(snapshot));
        }
        if snapshot.wave.phase == WavePhase::Idle {
            let next = self.shop(snapshot).unwrap_or(if snapshot.wave.can_call_early {
                PlayerCommand::CallWaveEarly
            } else {
                PlayerCommand::StartWave
            });
            commands.push(next);
        }
        commands
    }

    /// Log each wave clear once. Returns the wave if this snapshot reported one.
    pub fn observe(&mut self, snapshot: &GameStateSnapshot) -> Option<u32> {
        let wave = snapshot.wave.number;
        if snapshot.wave.phase != WavePhase::Idle || wave <= self.reported {
            return None;
        }
        self.reported = wave;
        info!(
            wave,
            gold = snapshot.economy.gold,
            kills = snapshot.economy.kills,
            castle_hp = snapshot.castle.hp,
            "autopilot: wave cleared"
        );
        Some(wave)
    }

    /// One purchase, if anything is worth buying.
    fn shop(&self, snapshot: &GameStateSnapshot) -> Option<PlayerCommand> {
        let upgrade = snapshot
            .upgrades
            .iter()
            .filter(|u| u.affordable && !u.maxed)
            .min_by_key(|u| u.cost);
        if let Some(upgrade) = upgrade {
            return Some(PlayerCommand::Upgrade { stat: upgrade.stat });
        }
        if let Some(skill) = snapshot.skills.iter().find(|s| s.purchasable) {
            return Some(PlayerCommand::PurchaseSkill { skill: skill.skill });
        }
        snapshot
            .meta
            .iter()
            .filter(|m| m.level < m.max_level && m.cost <= snapshot.economy.gems)
            .min_by_key(|m| m.cost)
            .map(|m| PlayerCommand::PurchaseMeta { upgrade: m.upgrade })
    }
}

/// Walk toward the nearest enemy; stand still once it is well inside range.
fn steer(snapshot: &GameStateSnapshot) -> PlayerCommand {
    let hero = &snapshot.combatant;
    let nearest = snapshot
        .enemies
        .iter()
        .map(|e| e.position - hero.position)
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));

    match nearest {
        Some(offset) if offset.length() > hero.range * HERO_ENGAGE_FRACTION => {
            let dir = offset.normalize_or_zero();
            PlayerCommand::SetMoveInput { x: dir.x, y: dir.y }
        }
        _ => PlayerCommand::SetMoveInput { x: 0.0, y: 0.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rampart_core::enums::{EnemyType, Stat};
    use rampart_core::state::EnemyView;
    use rampart_core::types::SlotId;
    use rampart_sim::{SimConfig, SimulationEngine};

    fn fresh_snapshot(kind: CombatantKind) -> GameStateSnapshot {
        let mut engine = SimulationEngine::new(SimConfig {
            mode: kind,
            ..SimConfig::default()
        });
        engine.tick(0.016)
    }

    fn broke(snapshot: &mut GameStateSnapshot) {
        snapshot.economy.gold = 0;
        for upgrade in &mut snapshot.upgrades {
            upgrade.affordable = false;
        }
    }

    fn enemy_at(position: Vec2) -> EnemyView {
        EnemyView {
            id: SlotId(0),
            enemy_type: EnemyType::Normal,
            position,
            hp: 30.0,
            max_hp: 30.0,
            size: 20.0,
            color: EnemyType::Normal.color().to_string(),
            stunned: false,
            flashing: false,
        }
    }

    #[test]
    fn test_buys_cheapest_useful_upgrade() {
        let pilot = Autopilot::new(CombatantKind::Tower);
        let snapshot = fresh_snapshot(CombatantKind::Tower);
        assert_eq!(
            pilot.decide(&snapshot),
            vec![PlayerCommand::Upgrade { stat: Stat::Damage }]
        );
    }

    #[test]
    fn test_starts_wave_when_broke() {
        let pilot = Autopilot::new(CombatantKind::Tower);
        let mut snapshot = fresh_snapshot(CombatantKind::Tower);
        broke(&mut snapshot);
        assert_eq!(pilot.decide(&snapshot), vec![PlayerCommand::StartWave]);

        snapshot.wave.number = 2;
        snapshot.wave.can_call_early = true;
        assert_eq!(pilot.decide(&snapshot), vec![PlayerCommand::CallWaveEarly]);
    }

    #[test]
    fn test_quiet_during_wave() {
        let pilot = Autopilot::new(CombatantKind::Tower);
        let mut snapshot = fresh_snapshot(CombatantKind::Tower);
        snapshot.wave.phase = WavePhase::Spawning;
        assert!(pilot.decide(&snapshot).is_empty());
        snapshot.phase = GamePhase::GameOver;
        snapshot.wave.phase = WavePhase::Idle;
        assert!(pilot.decide(&snapshot).is_empty());
    }

    #[test]
    fn test_hero_walks_toward_enemy() {
        let pilot = Autopilot::new(CombatantKind::Hero);
        let mut snapshot = fresh_snapshot(CombatantKind::Hero);
        snapshot.wave.phase = WavePhase::Spawning;
        let hero = snapshot.combatant.position;
        snapshot.enemies.push(enemy_at(hero + Vec2::new(0.0, 300.0)));
        snapshot.enemies.push(enemy_at(hero + Vec2::new(-200.0, 0.0)));
        assert_eq!(
            pilot.decide(&snapshot),
            vec![PlayerCommand::SetMoveInput { x: -1.0, y: 0.0 }]
        );

        snapshot.enemies[1].position = hero + Vec2::new(-50.0, 0.0);
        assert_eq!(
            pilot.decide(&snapshot),
            vec![PlayerCommand::SetMoveInput { x: 0.0, y: 0.0 }]
        );
    }

    #[test]
    fn test_observe_reports_each_clear_once() {
        let mut pilot = Autopilot::new(CombatantKind::Tower);
        let mut snapshot = fresh_snapshot(CombatantKind::Tower);
        assert_eq!(pilot.observe(&snapshot), None);
        snapshot.wave.number = 1;
        snapshot.wave.phase = WavePhase::Spawning;
        assert_eq!(pilot.observe(&snapshot), None);
        snapshot.wave.phase = WavePhase::Idle;
        assert_eq!(pilot.observe(&snapshot), Some(1));
        assert_eq!(pilot.observe(&snapshot), None);
    }
}
