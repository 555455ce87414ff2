//! Simulation layer: event queue, engine, traffic, and the top-level driver.

/// Core datapath engine.
pub mod engine;

/// Discrete-event queue over the logical tick clock.
pub mod event;

/// Burst metadata traffic generation.
pub mod traffic;

pub use engine::MetadataEngine;
pub use traffic::{TrafficGen, TrafficRequest};

use crate::common::error::ConfigError;
use crate::config::Config;
use crate::security::KeystreamGenerator;
use crate::stats::SimStats;

/// Top-level simulation: the engine driven by generated traffic.
///
/// Owns the engine, the traffic generator, and the keystream generator
/// side-by-side, mirroring the hardware topology (generator and traffic
/// source feed the cache's host port).
pub struct Simulation {
    /// The datapath under test.
    pub engine: MetadataEngine,
    traffic: TrafficGen,
    generator: KeystreamGenerator,
}

impl Simulation {
    /// Builds a simulation from the given configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: MetadataEngine::new(config)?,
            traffic: TrafficGen::new(&config.traffic),
            generator: KeystreamGenerator::new(&config.generator),
        })
    }

    /// Issues `count` metadata writes on the traffic generator's schedule.
    ///
    /// Each request advances the clock to its issue tick (firing any flush
    /// or drain events due before it), draws a fresh partial from the
    /// keystream, and applies the write.
    pub fn run_partials(&mut self, count: u64) {
        for _ in 0..count {
            let request = self.traffic.next_request();
            self.engine.run_until(request.at);

            let partial = self.generator.next_partial();
            self.engine.stats.generated_partials += 1;

            self.engine.write(request.addr, partial);
            self.engine.stats.requests_sent += 1;
            if request.ends_burst {
                self.engine.stats.bursts_completed += 1;
            }
        }
    }

    /// Ends the run: one final ADR flush, then drains the write queue.
    pub fn finish(&mut self) {
        self.engine.flush_now();
        self.engine.drain_pending();
    }

    /// The accumulated statistics.
    pub fn stats(&self) -> &SimStats {
        &self.engine.stats
    }
}
