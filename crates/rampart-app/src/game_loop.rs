//! Game loop: drives the simulation engine either flat out (headless) or at
//! 60Hz on its own thread, publishing snapshots as it goes.
//!
//! The threaded engine is created inside its thread, so the save store never
//! has to cross a thread boundary. Commands arrive via an `mpsc` channel.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use rampart_core::enums::GamePhase;
use rampart_sim::persistence::{FileStore, MemoryStore, SaveStore};
use rampart_sim::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::state::{GameLoopCommand, RunSummary, SharedSnapshot};

/// Host frame rate.
pub const FRAME_RATE: u32 = 60;

/// Nominal duration of one frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

/// Step used by headless runs, in seconds.
pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;

/// Build an engine on a file store in `save_dir`, or in memory without one.
pub fn open_engine(config: SimConfig, save_dir: Option<&Path>) -> SimulationEngine {
    let store: Box<dyn SaveStore> = match save_dir {
        Some(dir) => Box::new(FileStore::new(dir)),
        None => Box::new(MemoryStore::new()),
    };
    SimulationEngine::with_store(config, store)
}

/// Run up to `frames` fixed steps with the autopilot playing. Stops early on
/// game over. Same config and store contents give the same summary.
pub fn run_headless(engine: &mut SimulationEngine, pilot: &mut Autopilot, frames: u64) -> RunSummary {
    let mut snapshot = engine.tick(FRAME_DT);
    let mut ran = 1;
    while ran < frames && snapshot.phase != GamePhase::GameOver {
        engine.queue_commands(pilot.decide(&snapshot));
        snapshot = engine.tick(FRAME_DT);
        pilot.observe(&snapshot);
        ran += 1;
    }
    RunSummary::from_snapshot(ran, &snapshot)
}

/// Spawn the real-time loop on its own thread.
///
/// Returns the command sender and a handle that yields the run summary once
/// the loop receives `Shutdown` or the sender is dropped.
pub fn spawn_game_loop(
    config: SimConfig,
    save_dir: Option<PathBuf>,
    latest_snapshot: SharedSnapshot,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("rampart-game-loop".into())
        .spawn(move || {
            let mut engine = open_engine(config, save_dir.as_deref());
            run_game_loop(&mut engine, cmd_rx, &latest_snapshot)
        })?;

    Ok((cmd_tx, handle))
}

/// The loop itself. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    engine: &mut SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &SharedSnapshot,
) -> RunSummary {
    let start = Instant::now();
    let mut next_frame_time = start;
    let mut frames = 0;
    let mut summary = RunSummary::from_snapshot(0, &engine.frame(0.0));

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    shut_down(engine);
                    return summary;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the wall-clock time since the last frame
        let snapshot = engine.frame(start.elapsed().as_secs_f64() * 1000.0);
        frames += 1;
        summary = RunSummary::from_snapshot(frames, &snapshot);

        // 3. Publish for the controller
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 4. Sleep until the next frame
        next_frame_time += FRAME_DURATION;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > FRAME_DURATION * 2 {
            // Too far behind; drop the backlog instead of spiralling
            next_frame_time = now;
        }
    }
}

/// Persist a run that is still going so the next launch resumes it.
fn shut_down(engine: &mut SimulationEngine) {
    if engine.is_game_over() {
        return;
    }
    if let Err(e) = engine.save() {
        warn!(error = %e, "failed to save on shutdown");
    }
    debug!(tick = engine.time().tick, "game loop stopped");
}
