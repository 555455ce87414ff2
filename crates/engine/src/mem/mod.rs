//! Memory-side components of the metadata datapath.
//!
//! In dependency order: the write queue feeds the NVM sink; the coalescing
//! buffer and PLUB emit into the write queue; the cache forwards writes and
//! evictions into the coalescing buffer; the flush scheduler bounds how long
//! anything may stay staged.

/// Set-associative metadata cache over 8-byte entries.
pub mod cache;

/// ADR flush interval and staleness policy.
pub mod flush;

/// NVM sink contract and timing model.
pub mod nvm;

/// Partial coalescing buffer (PCB).
pub mod pcb;

/// Partial-log update buffer (PLUB) overflow path.
pub mod plub;

/// Bounded write queue feeding the NVM sink.
pub mod queue;

pub use cache::{EvictedLine, MetadataCache};
pub use flush::FlushScheduler;
pub use nvm::{NvmModel, NvmSink};
pub use pcb::{CoalesceOutcome, CoalescingBuffer, EmittedBlock, PcbEntry};
pub use plub::PartialLogBuffer;
pub use queue::WriteQueue;
