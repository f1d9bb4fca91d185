//! Travel-time stopwatch.
//!
//! Times are epoch seconds so the state can be persisted as plain numbers
//! and survive a restart while running.

use serde::{Deserialize, Serialize};

/// Elapsed time saturates here and the stopwatch stops itself.
pub const MAX_ELAPSED_SECS: f64 = 999.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stopwatch {
    pub running: bool,
    /// Epoch seconds of the last start. Meaningless while stopped.
    pub start_timestamp: f64,
    /// Seconds collected by earlier start/stop cycles.
    pub accumulated: f64,
}

impl Stopwatch {
    /// Elapsed seconds at `now`, capped at [`MAX_ELAPSED_SECS`].
    pub fn elapsed(&self, now: f64) -> f64 {
        let total = if self.running {
            self.accumulated + (now - self.start_timestamp).max(0.0)
        } else {
            self.accumulated
        };
        total.min(MAX_ELAPSED_SECS)
    }

    /// Starts a stopped stopwatch, stops a running one.
    pub fn toggle(&mut self, now: f64) {
        if self.running {
            self.stop(now);
        } else {
            self.start_timestamp = now;
            self.running = true;
        }
    }

    /// Folds the running interval into `accumulated`. No-op when stopped.
    pub fn stop(&mut self, now: f64) {
        if self.running {
            self.accumulated = self.elapsed(now);
            self.running = false;
        }
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.start_timestamp = 0.0;
        self.accumulated = 0.0;
    }

    /// Display refresh. Returns the elapsed value, stopping at the ceiling.
    pub fn tick(&mut self, now: f64) -> f64 {
        let elapsed = self.elapsed(now);
        if self.running && elapsed >= MAX_ELAPSED_SECS {
            self.accumulated = MAX_ELAPSED_SECS;
            self.running = false;
            log::info!("Stopwatch reached {}s and stopped", MAX_ELAPSED_SECS);
        }
        elapsed
    }

    /// Adopts a manually entered elapsed value while stopped.
    pub fn sync(&mut self, value: f64) {
        if !self.running {
            self.accumulated = value.clamp(0.0, MAX_ELAPSED_SECS);
        }
    }
}
