//! Simulation statistics collection and reporting.
//!
//! This module tracks the accounting the coalescing research depends on:
//! 1. **Cache:** Hit/miss/eviction counts.
//! 2. **Coalescing:** Total partials, coalesced blocks, partial flushes, overflows.
//! 3. **Backend:** NVM reads/writes, bytes moved, queue-full events.
//! 4. **Derived Ratios:** Hit rate, coalescing rate, overflow rate, write
//!    amplification, PLUB overhead. Computed on read, never incrementally,
//!    so a snapshot is always self-consistent.

use std::time::Instant;

use crate::common::addr::PARTIALS_PER_BLOCK;

/// Simulation statistics structure tracking all metadata-path counters.
///
/// Every counter is incremented by exactly one component (mediated by the
/// engine); derived ratios guard against division by zero and return 0.0 on
/// empty histories.
#[derive(Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Simulated ticks elapsed.
    pub ticks: u64,

    /// Cache lookup hits.
    pub hits: u64,
    /// Cache lookup misses.
    pub misses: u64,
    /// Dirty cache line evictions.
    pub evictions: u64,

    /// Total 8-byte partials entering the coalescing buffer.
    pub pcb_total_partials: u64,
    /// Full 64-byte blocks emitted (eagerly or at flush).
    pub pcb_coalesced_blocks: u64,
    /// Incomplete blocks emitted at flush time.
    pub pcb_partial_flushes: u64,
    /// Partials rejected by the admission rule and routed to the PLUB.
    pub pcb_overflows: u64,
    /// Stale blocks discarded at flush instead of written.
    pub stale_blocks_discarded: u64,

    /// Partials forwarded individually through the PLUB overflow path.
    pub plub_partials: u64,
    /// Enqueue attempts dropped because the write queue was full.
    pub write_queue_full: u64,

    /// Write operations issued to NVM (one per emitted block or PLUB partial).
    pub nvm_writes: u64,
    /// Read operations issued to NVM (miss fills).
    pub nvm_reads: u64,
    /// Bytes written to NVM.
    pub nvm_bytes_written: u64,
    /// Bytes read from NVM.
    pub nvm_bytes_read: u64,

    /// Partials produced by the keystream generator.
    pub generated_partials: u64,
    /// Requests issued by the traffic generator.
    pub requests_sent: u64,
    /// Bursts completed by the traffic generator.
    pub bursts_completed: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            ticks: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            pcb_total_partials: 0,
            pcb_coalesced_blocks: 0,
            pcb_partial_flushes: 0,
            pcb_overflows: 0,
            stale_blocks_discarded: 0,
            plub_partials: 0,
            write_queue_full: 0,
            nvm_writes: 0,
            nvm_reads: 0,
            nvm_bytes_written: 0,
            nvm_bytes_read: 0,
            generated_partials: 0,
            requests_sent: 0,
            bursts_completed: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"cache"`, `"pcb"`, `"nvm"`,
/// `"traffic"`. Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "cache", "pcb", "nvm", "traffic"];

impl SimStats {
    /// Cache hit rate, or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.hits + self.misses)
    }

    /// Fraction of partials retired through full-block coalescing:
    /// `8 × coalesced_blocks / total_partials`, or 0.0 before any partial.
    pub fn pcb_coalescing_rate(&self) -> f64 {
        ratio(
            self.pcb_coalesced_blocks * PARTIALS_PER_BLOCK as u64,
            self.pcb_total_partials,
        )
    }

    /// Fraction of partials rejected by the admission rule.
    pub fn overflow_rate(&self) -> f64 {
        ratio(self.pcb_overflows, self.pcb_total_partials)
    }

    /// NVM write operations per minimal block write:
    /// `nvm_writes / (total_partials / 8)`, or 0.0 before any partial.
    ///
    /// A fully coalescing workload approaches 1.0; a pure overflow workload
    /// approaches 8.0.
    pub fn write_amplification(&self) -> f64 {
        ratio(
            self.nvm_writes * PARTIALS_PER_BLOCK as u64,
            self.pcb_total_partials,
        )
    }

    /// Fraction of partials taking the PLUB overflow path.
    pub fn plub_overhead(&self) -> f64 {
        ratio(self.plub_partials, self.pcb_total_partials)
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"cache"`,
    /// `"pcb"`, `"nvm"`, or `"traffic"`. Pass an empty slice to print all
    /// sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            println!("\n==========================================================");
            println!("SECURE METADATA CACHE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {:.4} s", seconds);
            println!("sim_ticks                {}", self.ticks);
            println!("total_partials           {}", self.pcb_total_partials);
            println!("coalescing_rate          {:.4}", self.pcb_coalescing_rate());
            println!("write_amplification      {:.4}", self.write_amplification());
            println!("----------------------------------------------------------");
        }
        if want("cache") {
            println!("METADATA CACHE");
            println!("  cache.hits             {}", self.hits);
            println!("  cache.misses           {}", self.misses);
            println!("  cache.hit_rate         {:.2}%", self.hit_rate() * 100.0);
            println!("  cache.evictions        {}", self.evictions);
            println!("----------------------------------------------------------");
        }
        if want("pcb") {
            println!("PARTIAL COALESCING BUFFER");
            println!("  pcb.total_partials     {}", self.pcb_total_partials);
            println!("  pcb.coalesced_blocks   {}", self.pcb_coalesced_blocks);
            println!("  pcb.partial_flushes    {}", self.pcb_partial_flushes);
            println!("  pcb.overflows          {}", self.pcb_overflows);
            println!("  pcb.stale_discarded    {}", self.stale_blocks_discarded);
            println!(
                "  pcb.overflow_rate      {:.2}%",
                self.overflow_rate() * 100.0
            );
            println!(
                "  plub.partials          {} ({:.2}%)",
                self.plub_partials,
                self.plub_overhead() * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("nvm") {
            println!("NVM BACKEND");
            println!("  nvm.writes             {}", self.nvm_writes);
            println!("  nvm.reads              {}", self.nvm_reads);
            println!("  nvm.bytes_written      {}", self.nvm_bytes_written);
            println!("  nvm.bytes_read         {}", self.nvm_bytes_read);
            println!("  queue.full_events      {}", self.write_queue_full);
            println!("----------------------------------------------------------");
        }
        if want("traffic") {
            println!("TRAFFIC");
            println!("  gen.partials           {}", self.generated_partials);
            println!("  traffic.requests       {}", self.requests_sent);
            println!("  traffic.bursts         {}", self.bursts_completed);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

/// Guarded ratio: 0.0 when the denominator is zero.
fn ratio(num: u64, denom: u64) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}
