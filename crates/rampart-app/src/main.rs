use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rampart_app::autopilot::Autopilot;
use rampart_app::game_loop::{self, spawn_game_loop};
use rampart_app::state::{shared_snapshot, GameLoopCommand, RunSummary};
use rampart_core::commands::PlayerCommand;
use rampart_core::enums::{CombatantKind, GamePhase};
use rampart_sim::SimConfig;

/// How often the real-time controller looks at the latest snapshot.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run a RAMPART session with the autopilot at the controls.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON file with engine settings. Missing fields take their defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// RNG seed, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Stationary tower or movable hero, overriding the config file.
    #[arg(long, value_enum)]
    mode: Option<Mode>,
    /// Number of frames to run before stopping.
    #[arg(
        long,
        default_value_t = 36_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    frames: u64,
    /// Directory for the save and meta documents. In memory when absent.
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
    /// Discard any saved run before starting.
    #[arg(long)]
    new_game: bool,
    /// Run at 60Hz wall-clock time on a loop thread instead of flat out.
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Tower,
    Hero,
}

impl From<Mode> for CombatantKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Tower => CombatantKind::Tower,
            Mode::Hero => CombatantKind::Hero,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    info!(seed = config.seed, mode = ?config.mode, frames = args.frames, "starting run");

    let summary = if args.realtime {
        run_realtime(config, &args)?
    } else {
        let mut engine = game_loop::open_engine(config, args.save_dir.as_deref());
        if args.new_game {
            engine.new_game();
        }
        let mut pilot = Autopilot::new(engine.config().mode);
        let summary = game_loop::run_headless(&mut engine, &mut pilot, args.frames);
        if summary.phase != GamePhase::GameOver {
            engine.save().context("writing save")?;
        }
        summary
    };

    info!(
        wave = summary.wave,
        kills = summary.kills,
        gold = summary.gold,
        gems = summary.gems,
        castle_hp = summary.castle_hp,
        phase = ?summary.phase,
        "run finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(args: &CliArgs) -> Result<SimConfig> {
    let mut config: SimConfig = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    Ok(config)
}

/// Drive the threaded loop from this thread by polling its snapshots.
fn run_realtime(config: SimConfig, args: &CliArgs) -> Result<RunSummary> {
    let mut pilot = Autopilot::new(config.mode);
    let latest = shared_snapshot();
    let (tx, handle) = spawn_game_loop(config, args.save_dir.clone(), latest.clone())
        .context("spawning game loop")?;
    if args.new_game {
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::NewGame))?;
    }

    loop {
        std::thread::sleep(POLL_INTERVAL);
        let snapshot = match latest.lock() {
            Ok(lock) => lock.clone(),
            Err(_) => {
                warn!("snapshot lock poisoned, stopping");
                break;
            }
        };
        let Some(snapshot) = snapshot else {
            continue;
        };
        pilot.observe(&snapshot);
        if snapshot.phase == GamePhase::GameOver || snapshot.time.tick >= args.frames {
            break;
        }
        for command in pilot.decide(&snapshot) {
            tx.send(GameLoopCommand::PlayerCommand(command))?;
        }
    }

    tx.send(GameLoopCommand::Shutdown)?;
    handle.join().map_err(|_| anyhow!("game loop thread panicked"))
}
