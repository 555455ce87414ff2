//! NVM sink contract and timing model.
//!
//! The sink accepts 8-byte write records and read requests, acknowledging
//! reads after `t_rcd + t_cl` and writes after `t_wr`. It serves one access
//! at a time; a second access issued while busy queues behind the first
//! (bank serialization), and the engine's drain loop pauses until the sink
//! reports ready. Functional (untimed) reads expose the stored contents for
//! verification.

use std::collections::HashMap;

use crate::common::addr::{Tick, is_partial_aligned};
use crate::common::data::WriteRecord;
use crate::config::NvmConfig;

/// Contract for the non-volatile backend.
///
/// Implementors must be `Send + Sync` so simulations can move across threads.
pub trait NvmSink: Send + Sync {
    /// Earliest tick at which the sink can begin a new access.
    fn ready_at(&self) -> Tick;

    /// Issues a timed 8-byte write. Returns the completion tick.
    ///
    /// An access issued before `ready_at` queues behind the in-flight one.
    fn write(&mut self, record: WriteRecord, now: Tick) -> Tick;

    /// Issues a timed 8-byte read. Returns the value and its completion tick.
    fn read(&mut self, addr: u64, now: Tick) -> (u64, Tick);

    /// Reads stored contents without consuming time (verification only).
    fn read_functional(&self, addr: u64) -> u64;
}

/// Latency-model sink with sparse 8-byte-granular contents.
pub struct NvmModel {
    t_rcd: Tick,
    t_cl: Tick,
    t_wr: Tick,
    busy_until: Tick,
    cells: HashMap<u64, u64>,
}

impl NvmModel {
    /// Creates a sink with the given timing parameters and empty contents.
    pub fn new(config: &NvmConfig) -> Self {
        Self {
            t_rcd: config.t_rcd,
            t_cl: config.t_cl,
            t_wr: config.t_wr,
            busy_until: 0,
            cells: HashMap::new(),
        }
    }

    /// Start tick for an access issued at `now`, honoring bank serialization.
    fn issue_at(&self, now: Tick) -> Tick {
        self.busy_until.max(now)
    }
}

impl NvmSink for NvmModel {
    fn ready_at(&self) -> Tick {
        self.busy_until
    }

    fn write(&mut self, record: WriteRecord, now: Tick) -> Tick {
        if !is_partial_aligned(record.addr) {
            panic!("NVM write to unaligned address {:#x}", record.addr);
        }
        self.cells.insert(record.addr, record.data);
        self.busy_until = self.issue_at(now) + self.t_wr;
        self.busy_until
    }

    fn read(&mut self, addr: u64, now: Tick) -> (u64, Tick) {
        if !is_partial_aligned(addr) {
            panic!("NVM read from unaligned address {:#x}", addr);
        }
        let value = self.cells.get(&addr).copied().unwrap_or(0);
        self.busy_until = self.issue_at(now) + self.t_rcd + self.t_cl;
        (value, self.busy_until)
    }

    fn read_functional(&self, addr: u64) -> u64 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }
}
