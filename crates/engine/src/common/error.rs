//! Configuration error definitions.
//!
//! Invalid configurations are fatal at construction time: `Config::validate`
//! reports the first violation and the enclosing driver aborts. Runtime
//! pressure conditions (queue full, PCB overflow) are never errors; they are
//! counted in statistics and recovered locally.

use std::fmt;

/// A construction-time configuration violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Cache set count is zero.
    ZeroSets,

    /// Cache associativity is zero.
    ZeroWays,

    /// Block size is not the 64 bytes the coalescing buffer requires.
    ///
    /// The associated value is the configured block size.
    UnsupportedBlockSize(u64),

    /// Cache access latency is zero ticks.
    ZeroAccessLatency,

    /// Write queue capacity is zero.
    ZeroWriteQueueCapacity,

    /// Coalescing buffer capacity is zero.
    ZeroPcbCapacity,

    /// ADR flush interval is zero ticks.
    ZeroFlushInterval,

    /// Partial generator latency is zero ticks.
    ZeroGeneratorLatency,

    /// Traffic address window is empty or inverted.
    ///
    /// The associated values are the configured start and end addresses.
    EmptyAddressWindow(u64, u64),

    /// Traffic window bound is not partial-aligned.
    ///
    /// The associated value is the misaligned address.
    UnalignedAddressWindow(u64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSets => write!(f, "cache num_sets must be positive"),
            ConfigError::ZeroWays => write!(f, "cache num_ways must be positive"),
            ConfigError::UnsupportedBlockSize(size) => {
                write!(f, "block_size must be 64 bytes, got {}", size)
            }
            ConfigError::ZeroAccessLatency => {
                write!(f, "cache access_latency must be positive")
            }
            ConfigError::ZeroWriteQueueCapacity => {
                write!(f, "write_queue_capacity must be positive")
            }
            ConfigError::ZeroPcbCapacity => write!(f, "pcb capacity must be positive"),
            ConfigError::ZeroFlushInterval => write!(f, "flush_interval must be positive"),
            ConfigError::ZeroGeneratorLatency => {
                write!(f, "generator latency must be positive")
            }
            ConfigError::EmptyAddressWindow(start, end) => {
                write!(f, "traffic window [{:#x}, {:#x}) is empty", start, end)
            }
            ConfigError::UnalignedAddressWindow(addr) => {
                write!(f, "traffic window bound {:#x} is not 8-byte aligned", addr)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
