//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the session: world, combatant, economy, skill tree,
//! meta progression, wave manager and deferred actions. It processes player
//! commands, runs the systems in a fixed order and produces
//! `GameStateSnapshot`s. Completely headless, so every run is reproducible
//! from its seed and inputs.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use rampart_core::commands::PlayerCommand;
use rampart_core::constants::{CASTLE_WAVE_HEAL_FRACTION, META_CRIT_PER_LEVEL};
use rampart_core::enums::*;
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_core::types::{SimTime, Viewport};

use crate::clock::{self, FrameClock};
use crate::combatant::{Combatant, StatBlock};
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::economy::{Economy, PurchaseError};
use crate::meta::MetaProgress;
use crate::persistence::{self, CastleSave, MemoryStore, PersistenceError, SaveData, SaveStore};
use crate::skills::{self, SkillTree, FORTIFY_CASTLE_HP};
use crate::systems;
use crate::systems::snapshot::SnapshotSource;
use crate::wave::{self, WaveManager};
use crate::world::World;

/// Configuration for a simulation session. Every field has a default, so a
/// partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed and same inputs give the same run.
    pub seed: u64,
    pub viewport: Viewport,
    pub mode: CombatantKind,
    /// Start the next wave automatically after a clear.
    pub auto_next_wave: bool,
    pub auto_wave_delay_ms: f64,
    pub save_key: String,
    pub meta_key: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            viewport: Viewport::default(),
            mode: CombatantKind::Tower,
            auto_next_wave: true,
            auto_wave_delay_ms: rampart_core::constants::AUTO_WAVE_DELAY_MS,
            save_key: "rampart.save".to_string(),
            meta_key: "rampart.meta".to_string(),
        }
    }
}

/// The simulation engine. Owns all session state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    combatant: Combatant,
    economy: Economy,
    skills: SkillTree,
    meta: MetaProgress,
    waves: WaveManager,
    deferred: DeferredQueue,
    clock: FrameClock,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    store: Box<dyn SaveStore>,
    command_queue: VecDeque<PlayerCommand>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine backed by an in-memory store.
    pub fn new(config: SimConfig) -> Self {
        Self::with_store(config, Box::new(MemoryStore::new()))
    }

    /// Create an engine on top of `store`, resuming a saved run if one exists.
    pub fn with_store(mut config: SimConfig, store: Box<dyn SaveStore>) -> Self {
        if !config.viewport.is_valid() {
            warn!(
                width = config.viewport.width,
                height = config.viewport.height,
                "invalid configured viewport, using default"
            );
            config.viewport = Viewport::default();
        }
        let saved: Option<SaveData> = persistence::load_json(store.as_ref(), &config.save_key);
        let meta = persistence::load_json::<MetaProgress>(store.as_ref(), &config.meta_key)
            .unwrap_or_else(|| MetaProgress {
                gems: saved.as_ref().map_or(0, |s| s.gems),
                ..MetaProgress::default()
            });

        let viewport = config.viewport;
        let mut engine = Self {
            world: World::new(viewport),
            combatant: Combatant::new(config.mode, viewport),
            economy: Economy::new(meta.starting_gold(), meta.discount()),
            skills: SkillTree::new(),
            waves: WaveManager::new(),
            deferred: DeferredQueue::new(),
            clock: FrameClock::new(),
            time: SimTime::default(),
            phase: GamePhase::Active,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            meta,
            store,
            config,
        };
        engine.combatant.bonus = engine.derived_bonus();

        if let Some(save) = saved {
            info!(wave = save.wave, gold = save.gold, "resuming saved run");
            engine.apply_save(save);
        }
        engine
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by one host frame stamped `timestamp_ms`.
    pub fn frame(&mut self, timestamp_ms: f64) -> GameStateSnapshot {
        let dt = self.clock.step(timestamp_ms);
        self.tick(dt)
    }

    /// Advance the simulation by `dt` seconds (clamped) and return the
    /// resulting snapshot. Paused or finished sessions only process commands.
    pub fn tick(&mut self, dt: f32) -> GameStateSnapshot {
        let dt = clock::clamp_dt(dt);
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems(dt);
            self.time.advance(dt);
        }

        self.snapshot()
    }

    // --- Accessors ---

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn skills(&self) -> &SkillTree {
        &self.skills
    }

    pub fn meta(&self) -> &MetaProgress {
        &self.meta
    }

    pub fn waves(&self) -> &WaveManager {
        &self.waves
    }

    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    pub fn store(&self) -> &dyn SaveStore {
        self.store.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Active
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// "Call wave early" is accepted: between waves, after the first one.
    pub fn can_call_early(&self) -> bool {
        !self.is_game_over() && self.waves.is_idle() && self.waves.number() >= 1
    }

    // --- Synchronous operations ---

    /// Start the next wave. Only valid between waves.
    pub fn start_next_wave(&mut self) -> Result<u32, PurchaseError> {
        if self.is_game_over() {
            return Err(PurchaseError::GameOver);
        }
        if !self.waves.is_idle() {
            return Err(PurchaseError::NotBetweenWaves);
        }
        self.world.regenerate_path(&mut self.rng);
        let wave = self
            .waves
            .start_next(&mut self.rng)
            .ok_or(PurchaseError::NotBetweenWaves)?;
        self.deferred.cancel_wave_starts();

        let enemy_count = self.waves.total() as u32;
        info!(wave, enemies = enemy_count, path_points = self.world.path.len(), "wave started");
        self.events.push(GameEvent::WaveStart { wave, enemy_count });
        Ok(wave)
    }

    /// Start the next wave now for a small gold bonus. Returns the bonus.
    pub fn call_wave_early(&mut self) -> Result<i64, PurchaseError> {
        if self.is_game_over() {
            return Err(PurchaseError::GameOver);
        }
        if !self.can_call_early() {
            return Err(PurchaseError::NotBetweenWaves);
        }
        let bonus = wave::call_early_bonus(self.waves.number());
        self.start_next_wave()?;
        self.economy.earn(bonus);
        debug!(bonus, "wave called early");
        Ok(bonus)
    }

    /// Buy one level of `stat`. Returns the gold paid.
    pub fn upgrade(&mut self, stat: Stat) -> Result<u32, PurchaseError> {
        if self.is_game_over() {
            return self.reject(PurchaseError::GameOver);
        }
        if !self.combatant.kind.uses(stat) {
            return self.reject(PurchaseError::NotApplicable);
        }
        if self.combatant.is_maxed(stat) {
            return self.reject(PurchaseError::MaxLevel);
        }
        let cost = self.economy.cost(stat);
        if let Err(e) = self.economy.check_afford(cost) {
            return self.reject(e);
        }
        self.economy.pay(cost);
        let level = self.economy.raise_level(stat);
        self.combatant.apply_upgrade(stat);

        debug!(stat = stat.as_str(), level, cost, "upgrade purchased");
        self.events.push(GameEvent::Upgrade { stat, level, cost });
        Ok(cost)
    }

    /// Buy one level of a skill. Returns the gold paid.
    pub fn purchase_skill(&mut self, skill: SkillId) -> Result<u32, PurchaseError> {
        if self.is_game_over() {
            return self.reject(PurchaseError::GameOver);
        }
        let cost = match self
            .skills
            .check(skill, self.waves.number(), self.economy.gold())
        {
            Ok(cost) => cost,
            Err(e) => return self.reject(e),
        };
        if !self.economy.can_afford(cost) {
            return self.reject(PurchaseError::InsufficientFunds {
                cost,
                gold: self.economy.gold(),
            });
        }
        self.economy.pay(cost);
        let level = self.skills.raise(skill);

        self.combatant.bonus = self.combatant.bonus.combined(&skills::level_bonus(skill));
        if skill == SkillId::Fortify {
            self.world.castle.max_hp += FORTIFY_CASTLE_HP;
            self.world.castle.recover(FORTIFY_CASTLE_HP);
        }

        debug!(?skill, level, cost, "skill purchased");
        self.events.push(GameEvent::SkillPurchased { skill, level, cost });
        Ok(cost)
    }

    /// Spend gems on a meta upgrade. Valid at any time. Returns the gems paid.
    pub fn purchase_meta(&mut self, upgrade: MetaUpgrade) -> Result<u32, PurchaseError> {
        let cost = match self.meta.purchase(upgrade) {
            Ok(cost) => cost,
            Err(e) => return self.reject(e),
        };
        match upgrade {
            MetaUpgrade::CritChance => self.combatant.bonus.crit += META_CRIT_PER_LEVEL,
            MetaUpgrade::UpgradeDiscount => self.economy.set_discount(self.meta.discount()),
            MetaUpgrade::StartingGold => {}
        }
        let level = self.meta.level(upgrade);
        debug!(?upgrade, level, cost, "meta upgrade purchased");
        self.events.push(GameEvent::MetaPurchased {
            upgrade,
            level,
            cost,
        });
        self.persist_meta();
        Ok(cost)
    }

    /// Halt the session and write the save.
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Active {
            return;
        }
        self.phase = GamePhase::Paused;
        self.persist_save();
        debug!(tick = self.time.tick, "paused");
    }

    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.phase = GamePhase::Active;
        self.clock.reset();
        debug!(tick = self.time.tick, "resumed");
    }

    /// Throw away the current run and start fresh. Meta progress is kept.
    pub fn new_game(&mut self) {
        let viewport = self.world.viewport;
        self.world.reset();
        self.combatant = Combatant::new(self.config.mode, viewport);
        self.economy = Economy::new(self.meta.starting_gold(), self.meta.discount());
        self.skills = SkillTree::new();
        self.combatant.bonus = self.derived_bonus();
        self.waves = WaveManager::new();
        self.deferred.clear();
        self.clock.reset();
        self.time = SimTime::default();
        self.phase = GamePhase::Active;
        if let Err(e) = self.store.remove(&self.config.save_key) {
            warn!(error = %e, "failed to remove save");
        }
        info!(gold = self.economy.gold(), "new game");
    }

    /// Write the run and meta documents.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let data = self.to_save_data();
        persistence::store_json(self.store.as_mut(), &self.config.save_key, &data)?;
        persistence::store_json(self.store.as_mut(), &self.config.meta_key, &self.meta)
    }

    /// The persisted form of the current run.
    pub fn to_save_data(&self) -> SaveData {
        SaveData {
            gold: self.economy.gold(),
            wave: self.waves.number(),
            kills: self.economy.kills(),
            gems: self.meta.gems,
            castle: CastleSave {
                hp: self.world.castle.hp,
                max_hp: self.world.castle.max_hp,
            },
            hero: self.combatant.upgraded,
            upgrade_levels: self.economy.levels().clone(),
            skill_levels: self.skills.levels().clone(),
        }
    }

    pub fn set_move_input(&mut self, x: f32, y: f32) {
        self.combatant.set_move_input(x, y);
    }

    /// Adopt a new playfield size. The current path is kept until the next wave.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            warn!(width, height, "ignoring invalid viewport");
            return;
        }
        self.world.resize(viewport);
        self.combatant.relayout(viewport);
    }

    // --- Internals ---

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartWave => {
                if let Err(e) = self.start_next_wave() {
                    debug!(error = %e, "start wave rejected");
                }
            }
            PlayerCommand::CallWaveEarly => {
                if let Err(e) = self.call_wave_early() {
                    debug!(error = %e, "call early rejected");
                }
            }
            PlayerCommand::Upgrade { stat } => {
                let _ = self.upgrade(stat);
            }
            PlayerCommand::PurchaseSkill { skill } => {
                let _ = self.purchase_skill(skill);
            }
            PlayerCommand::PurchaseMeta { upgrade } => {
                let _ = self.purchase_meta(upgrade);
            }
            PlayerCommand::SetMoveInput { x, y } => self.set_move_input(x, y),
            PlayerCommand::Resize { width, height } => self.resize(width, height),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Resume => self.resume(),
            PlayerCommand::NewGame => self.new_game(),
        }
    }

    /// Run all systems in order for one tick.
    fn run_systems(&mut self, dt: f32) {
        let now = self.time.elapsed_ms;

        // 1. Deferred actions that came due
        self.run_deferred(now);

        // 2. Wave manager
        if let Some(kind) = self.waves.update(dt * 1000.0) {
            self.world.spawn_enemy(kind, self.waves.number());
        }

        // 3. Combatant: move, target, fire
        systems::combat::run(
            &mut self.combatant,
            &mut self.world,
            &self.skills,
            &mut self.deferred,
            &mut self.rng,
            &mut self.events,
            dt,
            now,
        );

        // 4. Enemies
        if systems::enemies::run(&mut self.world, dt, now, &mut self.events) {
            self.game_over();
            return;
        }

        // 5. Projectiles
        systems::projectiles::run(
            &mut self.world,
            &mut self.economy,
            &mut self.rng,
            &mut self.events,
            self.waves.number(),
            dt,
            now,
        );

        // 6. Wave clear
        if self.waves.is_cleared(self.world.enemies.active_count()) {
            self.end_wave(now);
        }

        // 7. Cosmetics
        self.world.fx.update(dt);
        self.world.fx.decay_shake(dt);
    }

    /// Pop due actions and run the ones that still apply.
    fn run_deferred(&mut self, now: f64) {
        for action in self.deferred.pop_due(now) {
            if self.phase != GamePhase::Active {
                continue;
            }
            match action {
                DeferredAction::FollowUpShot {
                    target,
                    damage,
                    is_crit,
                } => {
                    systems::combat::fire_follow_up(
                        &self.combatant,
                        &mut self.world,
                        &self.skills,
                        &mut self.events,
                        target,
                        damage,
                        is_crit,
                    );
                }
                DeferredAction::StartNextWave => {
                    if self.waves.is_idle() {
                        let _ = self.start_next_wave();
                    }
                }
            }
        }
    }

    fn end_wave(&mut self, now: f64) {
        let wave = self.waves.number();
        self.waves.finish();

        let gold_bonus = wave::clear_gold(wave);
        let gems = wave::clear_gems(wave);
        self.economy.earn(gold_bonus);
        self.meta.add_gems(gems);
        if wave % 5 == 0 {
            let heal = self.world.castle.max_hp * CASTLE_WAVE_HEAL_FRACTION;
            self.world.castle.recover(heal);
        }
        self.world
            .fx
            .text(self.world.castle.pos, format!("+{gold_bonus}g"));

        info!(
            wave,
            gold_bonus,
            gems,
            gold = self.economy.gold(),
            castle_hp = self.world.castle.hp,
            "wave cleared"
        );
        self.events.push(GameEvent::WaveClear {
            wave,
            gold_bonus,
            gems,
        });

        self.persist_save();
        self.persist_meta();

        if self.config.auto_next_wave {
            self.deferred
                .schedule(now + self.config.auto_wave_delay_ms, DeferredAction::StartNextWave);
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.deferred.clear();
        let wave = self.waves.number();
        let kills = self.economy.kills();
        info!(wave, kills, gems = self.meta.gems, "game over");
        self.events.push(GameEvent::GameOver { wave, kills });

        if let Err(e) = self.store.remove(&self.config.save_key) {
            warn!(error = %e, "failed to remove save");
        }
        self.persist_meta();
    }

    /// Restore a saved run on top of a fresh session.
    fn apply_save(&mut self, save: SaveData) {
        self.economy = Economy::restore(save.gold, save.kills, save.upgrade_levels, self.meta.discount());
        self.skills = SkillTree::restore(&save.skill_levels);
        self.combatant.upgraded = save.hero;
        self.combatant.bonus = self.derived_bonus();
        let max_hp = save.castle.max_hp.max(1.0);
        self.world.castle.max_hp = max_hp;
        self.world.castle.hp = save.castle.hp.clamp(1.0, max_hp);
        self.waves = WaveManager::restore(save.wave);
    }

    /// Skill and meta bonuses from stored levels.
    fn derived_bonus(&self) -> StatBlock {
        let mut bonus = self.skills.stat_bonus();
        bonus.crit += self.meta.crit_bonus();
        bonus
    }

    /// Report a rejected purchase and pass the error back.
    fn reject<T>(&mut self, err: PurchaseError) -> Result<T, PurchaseError> {
        if let PurchaseError::InsufficientFunds { cost, gold } = err {
            self.events.push(GameEvent::InsufficientFunds {
                cost,
                available: gold,
            });
        }
        debug!(error = %err, "purchase rejected");
        Err(err)
    }

    fn persist_save(&mut self) {
        let data = self.to_save_data();
        if let Err(e) = persistence::store_json(self.store.as_mut(), &self.config.save_key, &data) {
            warn!(error = %e, "failed to write save");
        }
    }

    fn persist_meta(&mut self) {
        if let Err(e) = persistence::store_json(self.store.as_mut(), &self.config.meta_key, &self.meta) {
            warn!(error = %e, "failed to write meta progress");
        }
    }

    fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        let source = SnapshotSource {
            time: self.time,
            phase: self.phase,
            world: &self.world,
            combatant: &self.combatant,
            economy: &self.economy,
            skills: &self.skills,
            meta: &self.meta,
            waves: &self.waves,
            can_call_early: self.can_call_early(),
        };
        systems::snapshot::build_snapshot(&source, events)
    }

    // --- Test hooks ---

    /// Mutable combatant, for tests that need specific stats.
    #[cfg(test)]
    pub fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    /// Mutable world, for tests that place entities directly.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn set_gold(&mut self, gold: i64) {
        let delta = gold - self.economy.gold();
        self.economy.earn(delta);
    }

    /// Jump the wave counter, leaving the manager idle.
    #[cfg(test)]
    pub fn set_wave(&mut self, wave: u32) {
        self.waves = WaveManager::restore(wave);
    }
}
