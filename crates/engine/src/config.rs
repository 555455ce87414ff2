//! Configuration system for the metadata-path simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (cache geometry, PCB, NVM timing).
//! 2. **Structures:** Hierarchical config for cache, PCB, NVM, generator, and traffic.
//! 3. **Validation:** Construction-time checks that reject impossible hardware.
//!
//! Configuration is supplied as JSON (see the CLI `--config` flag) or use
//! `Config::default()` for the baseline 256 KiB / 4-way platform.

use serde::Deserialize;

use crate::common::addr::{PARTIAL_BYTES, Tick};
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden. Ticks are picosecond-granular, matching the
/// latency figures below.
mod defaults {
    use crate::common::addr::Tick;

    /// Cache set count (256 KiB total with 4 ways of 64-byte lines).
    pub const NUM_SETS: usize = 1024;

    /// Cache associativity.
    pub const NUM_WAYS: usize = 4;

    /// Bytes per cache line and per NVM block.
    ///
    /// Must stay 64: the coalescing buffer's valid mask is one bit per
    /// 8-byte partial and is exactly 8 bits wide.
    pub const BLOCK_SIZE: u64 = 64;

    /// Cache access latency (10 ns).
    pub const ACCESS_LATENCY: Tick = 10_000;

    /// Write queue depth feeding the NVM sink.
    pub const WRITE_QUEUE_CAPACITY: usize = 64;

    /// Maximum distinct block bases staged in the coalescing buffer (16 KiB).
    pub const PCB_CAPACITY: usize = 256;

    /// ADR flush interval (10 ms). Chosen at or below the platform's
    /// asynchronous-DRAM-refresh hold-up window.
    pub const FLUSH_INTERVAL: Tick = 10_000_000_000;

    /// Row-activate latency of the NVM medium (48 ns).
    pub const T_RCD: Tick = 48_000;

    /// Column-access latency of the NVM medium (15 ns).
    pub const T_CL: Tick = 15_000;

    /// Write-recovery latency of the NVM medium (150 ns; PCM-class writes).
    pub const T_WR: Tick = 150_000;

    /// First counter value consumed by the partial generator.
    pub const START_COUNTER: u64 = 0;

    /// Key seed the generator derives its subkeys from.
    pub const KEY_SEED: u64 = 0x5EED_5EED_5EED_5EED;

    /// Partial generation latency (20 ns).
    pub const GENERATOR_LATENCY: Tick = 20_000;

    /// Additional latency per counter fetch (1 ns).
    pub const COUNTER_LATENCY: Tick = 1_000;

    /// Start of the metadata address window (8 GiB).
    pub const TRAFFIC_START_ADDR: u64 = 0x2_0000_0000;

    /// End of the metadata address window (8 GiB + 16 MiB).
    pub const TRAFFIC_END_ADDR: u64 = 0x2_0100_0000;

    /// Requests per traffic burst.
    pub const BURST_SIZE: u64 = 100;

    /// Interval between bursts (1 ms).
    pub const BURST_INTERVAL: Tick = 1_000_000_000;

    /// Interval between requests within a burst (10 us).
    pub const REQUEST_LATENCY: Tick = 10_000_000;

    /// Stride for the strided traffic pattern (one block).
    pub const TRAFFIC_STRIDE: u64 = 64;

    /// Seed for the uniform traffic pattern's deterministic generator.
    pub const TRAFFIC_SEED: u64 = 0x9E37_79B9_7F4A_7C15;
}

/// Address pattern produced by the traffic generator.
///
/// All patterns are deterministic; `Uniform` draws from a seeded xorshift
/// generator so runs are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TrafficPattern {
    /// Consecutive partials: dense coverage of every block in order.
    #[default]
    Sequential,
    /// Fixed stride between partials (defaults to one block).
    Strided,
    /// Uniformly distributed partials over the address window.
    Uniform,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use thoth_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.cache.num_sets, 1024);
/// assert_eq!(config.pcb.capacity, 256);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON (any omitted field takes its default):
///
/// ```
/// use thoth_core::config::{Config, TrafficPattern};
///
/// let json = r#"{
///     "cache": { "num_sets": 4, "num_ways": 4 },
///     "pcb": { "capacity": 8, "flush_interval": 10000000000 },
///     "traffic": { "pattern": "Uniform" }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.cache.num_sets, 4);
/// assert_eq!(config.cache.block_size, 64);
/// assert_eq!(config.traffic.pattern, TrafficPattern::Uniform);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Metadata cache geometry and latency.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Partial coalescing buffer and flush policy.
    #[serde(default)]
    pub pcb: PcbConfig,
    /// NVM sink timing.
    #[serde(default)]
    pub nvm: NvmConfig,
    /// Partial generator parameters.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Traffic generator parameters.
    #[serde(default)]
    pub traffic: TrafficConfig,
}

impl Config {
    /// Checks the configuration for violations that would make the modeled
    /// hardware impossible.
    ///
    /// Returns the first violation found. Runtime pressure (queue full, PCB
    /// overflow) is never a configuration error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.num_sets == 0 {
            return Err(ConfigError::ZeroSets);
        }
        if self.cache.num_ways == 0 {
            return Err(ConfigError::ZeroWays);
        }
        if self.cache.block_size != defaults::BLOCK_SIZE {
            return Err(ConfigError::UnsupportedBlockSize(self.cache.block_size));
        }
        if self.cache.access_latency == 0 {
            return Err(ConfigError::ZeroAccessLatency);
        }
        if self.cache.write_queue_capacity == 0 {
            return Err(ConfigError::ZeroWriteQueueCapacity);
        }
        if self.pcb.capacity == 0 {
            return Err(ConfigError::ZeroPcbCapacity);
        }
        if self.pcb.flush_interval == 0 {
            return Err(ConfigError::ZeroFlushInterval);
        }
        if self.generator.latency == 0 {
            return Err(ConfigError::ZeroGeneratorLatency);
        }
        if self.traffic.start_addr >= self.traffic.end_addr {
            return Err(ConfigError::EmptyAddressWindow(
                self.traffic.start_addr,
                self.traffic.end_addr,
            ));
        }
        for bound in [self.traffic.start_addr, self.traffic.end_addr] {
            if bound % PARTIAL_BYTES != 0 {
                return Err(ConfigError::UnalignedAddressWindow(bound));
            }
        }
        Ok(())
    }
}

/// Metadata cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Number of cache sets.
    #[serde(default = "CacheConfig::default_num_sets")]
    pub num_sets: usize,

    /// Associativity (number of ways).
    #[serde(default = "CacheConfig::default_num_ways")]
    pub num_ways: usize,

    /// Bytes per line; must be 64 for coalescing-buffer compatibility.
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size: u64,

    /// Ticks per cache access.
    #[serde(default = "CacheConfig::default_access_latency")]
    pub access_latency: Tick,

    /// Depth of the write queue feeding the NVM sink.
    #[serde(default = "CacheConfig::default_write_queue_capacity")]
    pub write_queue_capacity: usize,
}

impl CacheConfig {
    /// Returns the default cache set count.
    fn default_num_sets() -> usize {
        defaults::NUM_SETS
    }

    /// Returns the default cache associativity.
    fn default_num_ways() -> usize {
        defaults::NUM_WAYS
    }

    /// Returns the default block size in bytes.
    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default cache access latency in ticks.
    fn default_access_latency() -> Tick {
        defaults::ACCESS_LATENCY
    }

    /// Returns the default write queue depth.
    fn default_write_queue_capacity() -> usize {
        defaults::WRITE_QUEUE_CAPACITY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            num_sets: defaults::NUM_SETS,
            num_ways: defaults::NUM_WAYS,
            block_size: defaults::BLOCK_SIZE,
            access_latency: defaults::ACCESS_LATENCY,
            write_queue_capacity: defaults::WRITE_QUEUE_CAPACITY,
        }
    }
}

/// Partial coalescing buffer and ADR flush configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PcbConfig {
    /// Maximum distinct block bases staged at once.
    #[serde(default = "PcbConfig::default_capacity")]
    pub capacity: usize,

    /// Ticks between ADR flushes.
    #[serde(default = "PcbConfig::default_flush_interval")]
    pub flush_interval: Tick,

    /// Optional staleness bound: entries idle longer than this are discarded
    /// at flush time instead of being written out.
    #[serde(default)]
    pub stale_threshold: Option<Tick>,
}

impl PcbConfig {
    /// Returns the default coalescing buffer capacity.
    fn default_capacity() -> usize {
        defaults::PCB_CAPACITY
    }

    /// Returns the default ADR flush interval in ticks.
    fn default_flush_interval() -> Tick {
        defaults::FLUSH_INTERVAL
    }
}

impl Default for PcbConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::PCB_CAPACITY,
            flush_interval: defaults::FLUSH_INTERVAL,
            stale_threshold: None,
        }
    }
}

/// NVM sink timing configuration.
///
/// Reads complete after `t_rcd + t_cl`; writes after `t_wr`. The sink
/// serves one access at a time and back-pressures the write queue while busy.
#[derive(Debug, Clone, Deserialize)]
pub struct NvmConfig {
    /// Row-activate latency in ticks.
    #[serde(default = "NvmConfig::default_t_rcd")]
    pub t_rcd: Tick,

    /// Column-access latency in ticks.
    #[serde(default = "NvmConfig::default_t_cl")]
    pub t_cl: Tick,

    /// Write-recovery latency in ticks.
    #[serde(default = "NvmConfig::default_t_wr")]
    pub t_wr: Tick,
}

impl NvmConfig {
    /// Returns the default row-activate latency.
    fn default_t_rcd() -> Tick {
        defaults::T_RCD
    }

    /// Returns the default column-access latency.
    fn default_t_cl() -> Tick {
        defaults::T_CL
    }

    /// Returns the default write-recovery latency.
    fn default_t_wr() -> Tick {
        defaults::T_WR
    }
}

impl Default for NvmConfig {
    fn default() -> Self {
        Self {
            t_rcd: defaults::T_RCD,
            t_cl: defaults::T_CL,
            t_wr: defaults::T_WR,
        }
    }
}

/// Partial generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// First counter value consumed.
    #[serde(default = "GeneratorConfig::default_start_counter")]
    pub start_counter: u64,

    /// Seed the generator derives its subkeys from.
    #[serde(default = "GeneratorConfig::default_key_seed")]
    pub key_seed: u64,

    /// Ticks per partial generation.
    #[serde(default = "GeneratorConfig::default_latency")]
    pub latency: Tick,

    /// Additional ticks per counter fetch.
    #[serde(default = "GeneratorConfig::default_counter_latency")]
    pub counter_latency: Tick,
}

impl GeneratorConfig {
    /// Returns the default starting counter value.
    fn default_start_counter() -> u64 {
        defaults::START_COUNTER
    }

    /// Returns the default key seed.
    fn default_key_seed() -> u64 {
        defaults::KEY_SEED
    }

    /// Returns the default generation latency in ticks.
    fn default_latency() -> Tick {
        defaults::GENERATOR_LATENCY
    }

    /// Returns the default counter-fetch latency in ticks.
    fn default_counter_latency() -> Tick {
        defaults::COUNTER_LATENCY
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_counter: defaults::START_COUNTER,
            key_seed: defaults::KEY_SEED,
            latency: defaults::GENERATOR_LATENCY,
            counter_latency: defaults::COUNTER_LATENCY,
        }
    }
}

/// Traffic generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficConfig {
    /// Start of the metadata address window (inclusive).
    #[serde(default = "TrafficConfig::default_start_addr")]
    pub start_addr: u64,

    /// End of the metadata address window (exclusive).
    #[serde(default = "TrafficConfig::default_end_addr")]
    pub end_addr: u64,

    /// Requests per burst.
    #[serde(default = "TrafficConfig::default_burst_size")]
    pub burst_size: u64,

    /// Ticks between bursts.
    #[serde(default = "TrafficConfig::default_burst_interval")]
    pub burst_interval: Tick,

    /// Ticks between requests within a burst.
    #[serde(default = "TrafficConfig::default_request_latency")]
    pub request_latency: Tick,

    /// Address pattern.
    #[serde(default)]
    pub pattern: TrafficPattern,

    /// Stride in bytes for `TrafficPattern::Strided`.
    #[serde(default = "TrafficConfig::default_stride")]
    pub stride: u64,

    /// Seed for `TrafficPattern::Uniform`.
    #[serde(default = "TrafficConfig::default_seed")]
    pub seed: u64,
}

impl TrafficConfig {
    /// Returns the default window start address.
    fn default_start_addr() -> u64 {
        defaults::TRAFFIC_START_ADDR
    }

    /// Returns the default window end address.
    fn default_end_addr() -> u64 {
        defaults::TRAFFIC_END_ADDR
    }

    /// Returns the default burst size.
    fn default_burst_size() -> u64 {
        defaults::BURST_SIZE
    }

    /// Returns the default burst interval in ticks.
    fn default_burst_interval() -> Tick {
        defaults::BURST_INTERVAL
    }

    /// Returns the default intra-burst request latency in ticks.
    fn default_request_latency() -> Tick {
        defaults::REQUEST_LATENCY
    }

    /// Returns the default stride in bytes.
    fn default_stride() -> u64 {
        defaults::TRAFFIC_STRIDE
    }

    /// Returns the default uniform-pattern seed.
    fn default_seed() -> u64 {
        defaults::TRAFFIC_SEED
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            start_addr: defaults::TRAFFIC_START_ADDR,
            end_addr: defaults::TRAFFIC_END_ADDR,
            burst_size: defaults::BURST_SIZE,
            burst_interval: defaults::BURST_INTERVAL,
            request_latency: defaults::REQUEST_LATENCY,
            pattern: TrafficPattern::default(),
            stride: defaults::TRAFFIC_STRIDE,
            seed: defaults::TRAFFIC_SEED,
        }
    }
}
