//! Core datapath engine.
//!
//! `MetadataEngine` owns every stage of the write-side datapath (cache,
//! coalescing buffer, overflow path, write queue, NVM sink) plus the flush
//! scheduler, the event queue, and the statistics block. Each container is
//! owned by exactly one component; cross-component traffic is copied value
//! records.
//!
//! Host accesses (`write`, `read`) execute atomically at the current tick,
//! matching the run-to-completion handler model; request pacing is applied
//! by the simulation driver before invoking them.

use crate::common::addr::{PARTIAL_BYTES, PARTIALS_PER_BLOCK, Tick, block_base, is_partial_aligned};
use crate::common::data::WriteRecord;
use crate::common::error::ConfigError;
use crate::config::Config;
use crate::mem::cache::{EvictedLine, MetadataCache};
use crate::mem::flush::FlushScheduler;
use crate::mem::nvm::{NvmModel, NvmSink};
use crate::mem::pcb::{CoalesceOutcome, CoalescingBuffer, EmittedBlock};
use crate::mem::plub::PartialLogBuffer;
use crate::mem::queue::WriteQueue;
use crate::sim::event::{Event, EventQueue};
use crate::stats::SimStats;

/// The metadata-path engine.
pub struct MetadataEngine {
    block_size: u64,
    cache: MetadataCache,
    pcb: CoalescingBuffer,
    plub: PartialLogBuffer,
    write_queue: WriteQueue,
    nvm: Box<dyn NvmSink>,
    flush: FlushScheduler,
    events: EventQueue,
    drain_scheduled: bool,
    now: Tick,
    /// Statistics block; counters are public for reporting and tests.
    pub stats: SimStats,
}

impl MetadataEngine {
    /// Builds an engine from a validated configuration.
    ///
    /// The first ADR flush is armed one interval into the future.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let flush = FlushScheduler::new(config.pcb.flush_interval, config.pcb.stale_threshold);
        let mut events = EventQueue::new();
        events.schedule(flush.first_due(), Event::PcbFlush);

        Ok(Self {
            block_size: config.cache.block_size,
            cache: MetadataCache::new(&config.cache),
            pcb: CoalescingBuffer::new(config.pcb.capacity),
            plub: PartialLogBuffer::new(),
            write_queue: WriteQueue::new(config.cache.write_queue_capacity),
            nvm: Box::new(NvmModel::new(&config.nvm)),
            flush,
            events,
            drain_scheduled: false,
            now: 0,
            stats: SimStats::default(),
        })
    }

    /// Current logical time.
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Ticks per cache access.
    pub fn access_latency(&self) -> Tick {
        self.cache.access_latency()
    }

    /// Number of bases staged in the coalescing buffer.
    pub fn pcb_len(&self) -> usize {
        self.pcb.len()
    }

    /// True if `base` is staged in the coalescing buffer.
    pub fn pcb_contains(&self, base: u64) -> bool {
        self.pcb.contains_base(base)
    }

    /// Number of records pending in the write queue.
    pub fn write_queue_len(&self) -> usize {
        self.write_queue.len()
    }

    /// True if the block containing `addr` is cache-resident.
    pub fn cache_contains(&self, addr: u64) -> bool {
        self.cache.contains(addr)
    }

    /// The NVM sink, for functional verification reads.
    pub fn sink(&self) -> &dyn NvmSink {
        self.nvm.as_ref()
    }

    /// Host metadata write: update the cache line, then forward the partial
    /// to the coalescing buffer.
    ///
    /// An eviction caused by the install cascades first, so the victim's
    /// partials never interleave with the incoming one.
    ///
    /// # Panics
    ///
    /// Panics on a misaligned address: updates arrive at 8-byte granularity
    /// by protocol, so anything else indicates a broken upstream.
    pub fn write(&mut self, addr: u64, data: u64) {
        if !is_partial_aligned(addr) {
            panic!("metadata write to unaligned address {:#x}", addr);
        }
        if let Some(evicted) = self.cache.insert(addr, data, self.now) {
            self.retire_line(evicted);
        }
        self.coalesce_partial(WriteRecord::new(addr, data));
    }

    /// Host metadata read.
    ///
    /// A hit serves from the cache. A miss reads the containing block back
    /// from the sink (one timed access models the 64-byte transfer) and
    /// installs it clean; the displaced victim, if dirty, cascades into the
    /// coalescing buffer.
    ///
    /// # Panics
    ///
    /// Panics on a misaligned address, like `write`.
    pub fn read(&mut self, addr: u64) -> u64 {
        if !is_partial_aligned(addr) {
            panic!("metadata read from unaligned address {:#x}", addr);
        }
        if let Some(value) = self.cache.lookup(addr, self.now) {
            self.stats.hits += 1;
            return value;
        }
        self.stats.misses += 1;

        let base = block_base(addr, self.block_size);
        let mut block = [0u64; PARTIALS_PER_BLOCK];
        for (i, slot) in block.iter_mut().enumerate() {
            *slot = self.nvm.read_functional(base + i as u64 * PARTIAL_BYTES);
        }
        let (value, _complete) = self.nvm.read(addr, self.now);
        self.stats.nvm_reads += 1;
        self.stats.nvm_bytes_read += self.block_size;

        if let Some(evicted) = self.cache.fill(addr, block, self.now) {
            self.retire_line(evicted);
        }
        value
    }

    /// Runs every ADR-flush action once, atomically, at the current tick.
    ///
    /// Dirty entries are emitted (full blocks count as coalesced, the rest
    /// as partial flushes), stale entries are discarded, and the buffer ends
    /// empty. Re-arming is the event loop's job.
    pub fn flush_now(&mut self) {
        let drain = self.pcb.drain(self.now, self.flush.stale_threshold());
        self.stats.stale_blocks_discarded += drain.stale_discarded;
        for b in drain.emitted {
            if b.was_full {
                self.stats.pcb_coalesced_blocks += 1;
            } else {
                self.stats.pcb_partial_flushes += 1;
            }
            self.emit_block(b);
        }
    }

    /// Processes events up to and including `limit`, then advances the clock
    /// to `limit`.
    pub fn run_until(&mut self, limit: Tick) {
        while let Some(tick) = self.events.peek_tick() {
            if tick > limit {
                break;
            }
            if let Some((tick, event)) = self.events.pop() {
                self.now = tick;
                self.handle(event);
            }
        }
        if limit > self.now {
            self.now = limit;
        }
        self.stats.ticks = self.now;
    }

    /// Advances time until the write queue has fully drained into the sink.
    ///
    /// Recurring flushes encountered along the way still fire (and are
    /// no-ops on an empty buffer).
    pub fn drain_pending(&mut self) {
        while !self.write_queue.is_empty() || self.drain_scheduled {
            let Some(tick) = self.events.peek_tick() else {
                break;
            };
            self.run_until(tick);
        }
        self.stats.ticks = self.now;
    }

    /// Forwards one evicted dirty line into the coalescing buffer.
    ///
    /// All 8 slots are forwarded; the line does not track which partials
    /// were written since install.
    fn retire_line(&mut self, line: EvictedLine) {
        self.stats.evictions += 1;
        for (i, &data) in line.partials.iter().enumerate() {
            self.coalesce_partial(WriteRecord::new(
                line.base_addr + i as u64 * PARTIAL_BYTES,
                data,
            ));
        }
    }

    /// Routes one partial through the coalescing buffer, handling eager
    /// emission and overflow.
    fn coalesce_partial(&mut self, record: WriteRecord) {
        self.stats.pcb_total_partials += 1;
        match self.pcb.coalesce(record.addr, record.data, self.now) {
            CoalesceOutcome::Staged => {}
            CoalesceOutcome::Emitted(block) => {
                self.stats.pcb_coalesced_blocks += 1;
                self.emit_block(block);
            }
            CoalesceOutcome::Rejected => {
                self.stats.pcb_overflows += 1;
                self.forward_to_plub(record);
            }
        }
    }

    /// Pushes an emitted block's records into the write queue.
    ///
    /// The block is admitted whole or not at all; a refused block counts one
    /// queue-full event and is dropped (modeled stall).
    fn emit_block(&mut self, block: EmittedBlock) {
        if self.write_queue.free_slots() < block.records.len() {
            self.stats.write_queue_full += 1;
            return;
        }
        self.stats.nvm_writes += 1;
        self.stats.nvm_bytes_written += block.records.len() as u64 * PARTIAL_BYTES;
        for record in block.records {
            self.write_queue.push(record);
        }
        self.schedule_drain();
    }

    /// Sends one uncoalesced partial down the overflow path.
    fn forward_to_plub(&mut self, record: WriteRecord) {
        if self.plub.forward(record, &mut self.write_queue) {
            self.stats.plub_partials += 1;
            self.stats.nvm_writes += 1;
            self.stats.nvm_bytes_written += PARTIAL_BYTES;
            self.schedule_drain();
        } else {
            self.stats.write_queue_full += 1;
        }
    }

    /// Arms a drain event if records are pending and none is armed.
    fn schedule_drain(&mut self) {
        if !self.drain_scheduled && !self.write_queue.is_empty() {
            self.drain_scheduled = true;
            self.events
                .schedule(self.now.max(self.nvm.ready_at()), Event::QueueDrain);
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::PcbFlush => {
                self.flush_now();
                let next = self.flush.next_due(self.now);
                self.events.schedule(next, Event::PcbFlush);
            }
            Event::QueueDrain => {
                self.drain_scheduled = false;
                let ready = self.nvm.ready_at();
                if ready > self.now {
                    // Sink busy: pause the drain until it signals ready.
                    self.drain_scheduled = true;
                    self.events.schedule(ready, Event::QueueDrain);
                    return;
                }
                if let Some(record) = self.write_queue.pop() {
                    self.nvm.write(record, self.now);
                }
                self.schedule_drain();
            }
        }
    }
}
