//! Repeating spawn timer
//!
//! Runs on game time fed in by the session tick. Freezing stops the clock
//! without touching the phase, so a resume continues the same interval
//! instead of restarting it. The first fire is due at t = 0.

use crate::consts::{MAX_FIRES_PER_TICK, SPAWN_INTERVAL};

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    interval: f64,
    /// Unfrozen time since start (seconds)
    clock: f64,
    next_fire: f64,
    running: bool,
    frozen: bool,
    fired: u64,
}

impl SpawnScheduler {
    /// `interval` must be positive and finite; anything else falls back to
    /// [`SPAWN_INTERVAL`]
    pub fn new(interval: f32) -> Self {
        let interval = if interval.is_finite() && interval > 0.0 {
            interval
        } else {
            log::warn!("Invalid spawn interval {}, using {}", interval, SPAWN_INTERVAL);
            SPAWN_INTERVAL
        };
        Self {
            interval: f64::from(interval),
            clock: 0.0,
            next_fire: 0.0,
            running: false,
            frozen: false,
            fired: 0,
        }
    }

    /// (Re)start from t = 0 with the first fire due immediately
    pub fn start(&mut self) {
        self.clock = 0.0;
        self.next_fire = 0.0;
        self.running = true;
        self.frozen = false;
        self.fired = 0;
    }

    /// No fire is reported after this until the next `start`
    pub fn stop(&mut self) {
        self.running = false;
        self.frozen = false;
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Total fires since the last start
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Game time since the last start, excluding frozen time
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Seconds of unfrozen time until the next fire
    pub fn time_until_next(&self) -> Option<f64> {
        self.running.then(|| (self.next_fire - self.clock).max(0.0))
    }

    /// Advance by `dt` seconds and return how many spawns are due
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running || self.frozen {
            return 0;
        }
        if dt.is_finite() && dt > 0.0 {
            self.clock += f64::from(dt);
        }

        let mut fires = 0;
        while self.clock >= self.next_fire {
            if fires == MAX_FIRES_PER_TICK {
                // Drop the backlog but stay on the interval grid
                let behind = self.clock - self.next_fire;
                let skipped = (behind / self.interval).floor() + 1.0;
                self.next_fire += skipped * self.interval;
                log::warn!("Spawn timer fell behind, skipped {} fires", skipped);
                break;
            }
            self.next_fire += self.interval;
            fires += 1;
        }

        self.fired += u64::from(fires);
        fires
    }
}
