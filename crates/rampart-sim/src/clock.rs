//! Frame clock: turns host frame timestamps into clamped simulation steps.

use rampart_core::constants::{MAX_DT, MIN_DT};

/// Tracks the previous host timestamp and produces a clamped `dt`.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_timestamp_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step length in seconds for a frame at `timestamp_ms`, clamped to
    /// `[MIN_DT, MAX_DT]`. The first frame after a reset yields `MIN_DT`.
    pub fn step(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_timestamp_ms {
            Some(last) => clamp_dt(((timestamp_ms - last) / 1000.0) as f32),
            None => MIN_DT,
        };
        self.last_timestamp_ms = Some(timestamp_ms);
        dt
    }

    /// Forget the previous timestamp, e.g. after a pause, so the idle gap is
    /// not simulated.
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }
}

/// Clamp a raw step to the simulated range. NaN collapses to `MIN_DT`.
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return MIN_DT;
    }
    dt.clamp(MIN_DT, MAX_DT)
}
