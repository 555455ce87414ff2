//! ADR flush scheduling policy.
//!
//! The platform guarantees buffered writes can drain for one hold-up window
//! after a power event, so every staged block must reach the write queue at
//! least once per `flush_interval`. The engine fires a flush event on this
//! cadence and re-arms it unconditionally.

use crate::common::addr::Tick;

/// Flush cadence and staleness policy.
pub struct FlushScheduler {
    interval: Tick,
    stale_threshold: Option<Tick>,
}

impl FlushScheduler {
    /// Creates a scheduler firing every `interval` ticks.
    ///
    /// When `stale_threshold` is set, entries idle longer than the threshold
    /// are discarded at flush time instead of written.
    pub fn new(interval: Tick, stale_threshold: Option<Tick>) -> Self {
        Self {
            interval,
            stale_threshold,
        }
    }

    /// Ticks between flush firings.
    pub fn interval(&self) -> Tick {
        self.interval
    }

    /// Staleness bound applied at each flush, if any.
    pub fn stale_threshold(&self) -> Option<Tick> {
        self.stale_threshold
    }

    /// Tick of the first firing.
    pub fn first_due(&self) -> Tick {
        self.interval
    }

    /// Tick of the next firing after a flush at `now`.
    pub fn next_due(&self, now: Tick) -> Tick {
        now + self.interval
    }
}
