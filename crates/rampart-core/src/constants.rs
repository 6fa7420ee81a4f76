//! Simulation constants and tuning parameters.

// --- Clock ---

/// Smallest simulated step in seconds (never faster than 100 Hz).
pub const MIN_DT: f32 = 0.01;

/// Largest simulated step in seconds. Long host stalls collapse to this.
pub const MAX_DT: f32 = 0.1;

// --- Castle ---

/// Castle hit points at the start of a run.
pub const CASTLE_MAX_HP: f32 = 100.0;

/// Damage dealt to the castle by any enemy reaching the end of the path.
pub const ENEMY_REACH_DAMAGE: f32 = 10.0;

/// Distance from the right edge to the castle-adjacent path exit (px).
pub const CASTLE_EXIT_INSET: f32 = 60.0;

/// Distance from the right edge to the castle center (px).
pub const CASTLE_INSET: f32 = 40.0;

/// Distance from the right edge to the stationary tower (px).
pub const TOWER_INSET: f32 = 100.0;

/// Spawn waypoint sits this far left of the visible area (px).
pub const SPAWN_OFFSCREEN: f32 = 30.0;

/// Fraction of max HP recovered on every fifth wave clear.
pub const CASTLE_WAVE_HEAL_FRACTION: f32 = 0.2;

// --- Enemy movement ---

/// Distance at which an enemy counts as having reached its waypoint (px).
pub const WAYPOINT_REACHED_DIST: f32 = 1.0;

/// Per-wave HP multiplier slope: `1 + wave * HP_SCALE_PER_WAVE`.
pub const HP_SCALE_PER_WAVE: f32 = 0.15;

/// Per-wave speed multiplier slope.
pub const SPEED_SCALE_PER_WAVE: f32 = 0.02;

/// Cap on the extra speed fraction gained from wave scaling.
pub const SPEED_SCALE_CAP: f32 = 0.5;

/// Hit-flash duration after taking damage (ms).
pub const HIT_FLASH_MS: f32 = 100.0;

// --- Enemy specials ---

/// Interval between heal pulses (ms).
pub const HEAL_INTERVAL_MS: f32 = 3000.0;

/// Heal pulse radius (px).
pub const HEAL_RADIUS: f32 = 60.0;

/// Fraction of the receiver's max HP restored per pulse.
pub const HEAL_FRACTION: f32 = 0.1;

/// Number of children spawned by a splitter.
pub const SPLIT_CHILD_COUNT: usize = 2;

/// Child max HP as a fraction of the parent's max HP.
pub const SPLIT_CHILD_HP_FRACTION: f32 = 0.3;

/// Child speed relative to a normal enemy.
pub const SPLIT_CHILD_SPEED_FACTOR: f32 = 1.2;

/// Gold paid for a split child.
pub const SPLIT_CHILD_REWARD: u32 = 2;

/// Split child size (px).
pub const SPLIT_CHILD_SIZE: f32 = 14.0;

/// Horizontal offset of split children from the death point (px).
pub const SPLIT_CHILD_OFFSET: f32 = 6.0;

// --- Projectiles ---

/// Base projectile speed (px/s).
pub const PROJECTILE_SPEED: f32 = 500.0;

/// Minimum collision radius (px). Larger enemies use half their size.
pub const PROJECTILE_HIT_RADIUS: f32 = 10.0;

/// Failsafe lifetime (ms).
pub const PROJECTILE_LIFETIME_MS: f32 = 3000.0;

/// Failsafe travel distance (px).
pub const PROJECTILE_MAX_TRAVEL: f32 = 2000.0;

// --- Combatant ---

pub const BASE_DAMAGE: f32 = 10.0;
pub const BASE_RANGE: f32 = 150.0;
pub const BASE_FIRE_RATE: f32 = 1.2;
pub const BASE_CRIT_CHANCE: f32 = 5.0;
pub const BASE_HERO_SPEED: f32 = 200.0;

/// Damage multiplier on a critical hit.
pub const CRIT_MULTIPLIER: f32 = 2.5;

/// Angular step between spread-shot projectiles (radians).
pub const SPREAD_ANGLE_STEP: f32 = 0.26;

/// Spacing between rapid-fire follow-up shots (ms).
pub const RAPID_FIRE_INTERVAL_MS: f64 = 120.0;

/// Damage factor of a rapid-fire follow-up shot.
pub const RAPID_FIRE_DAMAGE_FACTOR: f32 = 0.5;

// --- Economy ---

/// Gold at the start of a run, before meta bonuses.
pub const STARTING_GOLD: i64 = 100;

/// Geometric growth of skill costs per level.
pub const SKILL_COST_GROWTH: f64 = 1.5;

// --- Waves ---

/// Normal enemies in every wave: `BASE + PER_WAVE * wave`.
pub const WAVE_BASE_NORMALS: u32 = 8;
pub const WAVE_NORMALS_PER_WAVE: u32 = 2;

/// Runners appear after this wave.
pub const RUNNER_AFTER_WAVE: u32 = 1;
/// Tanks appear after this wave.
pub const TANK_AFTER_WAVE: u32 = 3;
/// Healers appear after this wave.
pub const HEALER_AFTER_WAVE: u32 = 5;
/// Splitters appear after this wave.
pub const SPLITTER_AFTER_WAVE: u32 = 7;

/// Base delay between spawns (ms).
pub const SPAWN_INTERVAL_BASE_MS: f32 = 1000.0;
/// Spawn delay reduction per wave (ms).
pub const SPAWN_INTERVAL_STEP_MS: f32 = 50.0;
/// Spawn delay floor (ms).
pub const SPAWN_INTERVAL_MIN_MS: f32 = 250.0;

/// Wave-clear gold: `WAVE_CLEAR_GOLD_PER_WAVE * wave`.
pub const WAVE_CLEAR_GOLD_PER_WAVE: i64 = 10;

/// Early call bonus: `CALL_EARLY_GOLD_PER_WAVE * next_wave`.
pub const CALL_EARLY_GOLD_PER_WAVE: i64 = 5;

/// Default pause between a wave clear and the automatic next wave (ms).
pub const AUTO_WAVE_DELAY_MS: f64 = 3000.0;

// --- Meta progression ---

/// Gem cost of a meta upgrade: `META_COST_STEP * (level + 1)`.
pub const META_COST_STEP: u32 = 10;
pub const META_STARTING_GOLD_PER_LEVEL: i64 = 50;
pub const META_CRIT_PER_LEVEL: f32 = 1.0;
pub const META_DISCOUNT_PER_LEVEL: f64 = 0.05;

// --- Cosmetic effects ---

pub const FLOATING_TEXT_LIFE_MS: f32 = 800.0;
/// Upward drift of floating text (px/s).
pub const FLOATING_TEXT_RISE: f32 = 30.0;
pub const PARTICLE_LIFE_MS: f32 = 500.0;
pub const PARTICLES_PER_DEATH: usize = 8;
pub const PARTICLE_SPEED: f32 = 80.0;
/// Shake magnitude added per castle hit.
pub const SHAKE_PER_HIT: f32 = 8.0;
/// Linear shake decay (magnitude per second).
pub const SHAKE_DECAY_PER_SEC: f32 = 40.0;
