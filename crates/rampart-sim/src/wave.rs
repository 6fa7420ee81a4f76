//! Wave manager: composition, spawn pacing and the Idle/Spawning/AwaitingClear cycle.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use rampart_core::constants::*;
use rampart_core::enums::{EnemyType, WavePhase};

/// Unshuffled composition for wave `n`.
pub fn compose(n: u32) -> Vec<EnemyType> {
    let mut counts = vec![(EnemyType::Normal, WAVE_BASE_NORMALS + WAVE_NORMALS_PER_WAVE * n)];
    if n > RUNNER_AFTER_WAVE {
        counts.push((EnemyType::Runner, n));
    }
    if n > TANK_AFTER_WAVE {
        counts.push((EnemyType::Tank, n / 2));
    }
    if n > HEALER_AFTER_WAVE {
        counts.push((EnemyType::Healer, n / 5));
    }
    if n > SPLITTER_AFTER_WAVE {
        counts.push((EnemyType::Splitter, n / 4));
    }
    counts
        .into_iter()
        .flat_map(|(kind, count)| std::iter::repeat(kind).take(count as usize))
        .collect()
}

pub fn spawn_interval_ms(n: u32) -> f32 {
    (SPAWN_INTERVAL_BASE_MS - SPAWN_INTERVAL_STEP_MS * n as f32).max(SPAWN_INTERVAL_MIN_MS)
}

/// Gold granted for clearing wave `n`.
pub fn clear_gold(n: u32) -> i64 {
    WAVE_CLEAR_GOLD_PER_WAVE * i64::from(n)
}

/// Gems granted for clearing wave `n`.
pub fn clear_gems(n: u32) -> u32 {
    1 + n / 5
}

/// Bonus for calling the wave after `cleared` early.
pub fn call_early_bonus(cleared: u32) -> i64 {
    CALL_EARLY_GOLD_PER_WAVE * i64::from(cleared + 1)
}

#[derive(Debug, Clone, Default)]
pub struct WaveManager {
    number: u32,
    phase: WavePhase,
    composition: Vec<EnemyType>,
    spawned: usize,
    spawn_timer_ms: f32,
    interval_ms: f32,
}

impl WaveManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume between waves after `number` has been cleared.
    pub fn restore(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == WavePhase::Idle
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn total(&self) -> usize {
        self.composition.len()
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    pub fn composition(&self) -> &[EnemyType] {
        &self.composition
    }

    /// Begin the next wave. Returns its number, or `None` if a wave is already running.
    pub fn start_next(&mut self, rng: &mut ChaCha8Rng) -> Option<u32> {
        if !self.is_idle() {
            return None;
        }
        self.number += 1;
        let mut composition = compose(self.number);
        composition.shuffle(rng);
        self.composition = composition;
        self.spawned = 0;
        self.spawn_timer_ms = 0.0;
        self.interval_ms = spawn_interval_ms(self.number);
        self.phase = WavePhase::Spawning;
        Some(self.number)
    }

    /// Advance the spawn timer. Returns the enemy type to spawn this tick, if any.
    pub fn update(&mut self, dt_ms: f32) -> Option<EnemyType> {
        if self.phase != WavePhase::Spawning {
            return None;
        }
        self.spawn_timer_ms += dt_ms;
        if self.spawn_timer_ms < self.interval_ms {
            return None;
        }
        self.spawn_timer_ms = 0.0;
        let next = self.composition.get(self.spawned).copied();
        self.spawned += 1;
        if self.spawned >= self.composition.len() {
            self.phase = WavePhase::AwaitingClear;
        }
        next
    }

    /// Whether the wave is done: fully spawned and nothing left alive.
    pub fn is_cleared(&self, active_enemies: usize) -> bool {
        self.phase == WavePhase::AwaitingClear && active_enemies == 0
    }

    /// Close out the current wave.
    pub fn finish(&mut self) {
        self.phase = WavePhase::Idle;
    }
}
