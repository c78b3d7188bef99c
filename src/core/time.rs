//! Frame timing

use std::time::{Duration, Instant};

/// Wall-clock frame timer
///
/// Tracks the interval between `update` calls and the total time since
/// construction. The first delta is zero until `update` runs once.
#[derive(Debug, Clone)]
pub struct Time {
    startup: Instant,
    last_update: Instant,
    delta: Duration,
}

impl Time {
    /// Start the clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            last_update: now,
            delta: Duration::ZERO,
        }
    }

    /// Mark a frame boundary, measuring the delta since the previous one
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.last_update = now;
    }

    /// Interval between the two most recent updates
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta in seconds, the unit scene updates integrate with
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since construction
    pub fn elapsed(&self) -> Duration {
        self.startup.elapsed()
    }

    /// Elapsed time in seconds
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
