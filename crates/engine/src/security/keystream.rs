//! Keystream partial generation.
//!
//! `PartialGenerator` is the external contract: a pure function of a counter
//! and a fixed key seed. `KeystreamGenerator` is the default implementation,
//! a keyed avalanche mixer standing in for the reference AES-CTR keystream.
//! Output is masked to 53 bits so partials survive round-trips through
//! double-precision accounting tools unchanged.

use crate::common::addr::Tick;
use crate::config::GeneratorConfig;

/// Partials are masked to 53 bits.
pub const PARTIAL_VALUE_MASK: u64 = (1 << 53) - 1;

/// Contract for partial generation: deterministic, side-effect free.
///
/// For a fixed key, equal counters must yield equal partials.
pub trait PartialGenerator {
    /// Produces the 64-bit partial for `counter`.
    fn generate(&self, counter: u64) -> u64;
}

/// Default keyed generator.
///
/// Subkeys are derived from the configured seed; each `generate` call runs
/// the counter through xorshift-multiply rounds keyed by them. Generation is
/// modeled as taking `latency + counter_latency` ticks; pacing is the
/// caller's concern.
pub struct KeystreamGenerator {
    subkeys: [u64; 4],
    next_counter: u64,
    latency: Tick,
    counter_latency: Tick,
}

impl KeystreamGenerator {
    /// Creates a generator from the given configuration.
    pub fn new(config: &GeneratorConfig) -> Self {
        // Subkey schedule: repeated avalanche over the seed, so nearby seeds
        // diverge completely.
        let mut subkeys = [0u64; 4];
        let mut state = config.key_seed;
        for subkey in subkeys.iter_mut() {
            state = mix64(state.wrapping_add(0x9E37_79B9_7F4A_7C15));
            *subkey = state;
        }
        Self {
            subkeys,
            next_counter: config.start_counter,
            latency: config.latency,
            counter_latency: config.counter_latency,
        }
    }

    /// Ticks one generation takes.
    pub fn pace(&self) -> Tick {
        self.latency + self.counter_latency
    }

    /// Counter the next `next_partial` call will consume.
    pub fn counter(&self) -> u64 {
        self.next_counter
    }

    /// Generates the partial for the current counter and advances it.
    pub fn next_partial(&mut self) -> u64 {
        let partial = self.generate(self.next_counter);
        self.next_counter += 1;
        partial
    }
}

impl PartialGenerator for KeystreamGenerator {
    fn generate(&self, counter: u64) -> u64 {
        let mut value = counter.wrapping_add(self.subkeys[0]);
        for &subkey in &self.subkeys[1..] {
            value = mix64(value ^ subkey);
        }
        value & PARTIAL_VALUE_MASK
    }
}

/// One finalization-strength avalanche round.
fn mix64(mut value: u64) -> u64 {
    value ^= value >> 33;
    value = value.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    value ^= value >> 33;
    value = value.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    value ^ (value >> 33)
}
