//! Partial-Log Update Buffer (PLUB) overflow path.
//!
//! Partials the coalescing buffer cannot admit bypass coalescing entirely and
//! travel to NVM as individual 8-byte writes. The path is a direct
//! pass-through into the write queue.

use crate::common::data::WriteRecord;
use crate::mem::queue::WriteQueue;

/// Overflow forwarder for uncoalesced partials.
#[derive(Default)]
pub struct PartialLogBuffer;

impl PartialLogBuffer {
    /// Creates the overflow path.
    pub fn new() -> Self {
        Self
    }

    /// Forwards one partial to the write queue as a single 8-byte write.
    ///
    /// Returns false when the queue is full; the record is then dropped and
    /// the caller accounts a `write_queue_full` event. This is a modeled
    /// stall; a production controller must convert it into upstream
    /// back-pressure instead of losing the update.
    pub fn forward(&mut self, record: WriteRecord, queue: &mut WriteQueue) -> bool {
        queue.push(record)
    }
}
