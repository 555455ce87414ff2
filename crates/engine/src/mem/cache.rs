//! Set-associative metadata cache.
//!
//! The cache absorbs 8-byte metadata partials at line granularity: each
//! 64-byte line holds 8 partials. Eviction is strict recency-based (the way
//! with the smallest `last_access` loses, lowest way index on ties). A dirty
//! eviction exports the whole line: per-partial dirtiness is not tracked, so
//! every slot of a dirty line is treated as potentially modified and handed
//! to the coalescing buffer by the engine.

use crate::common::addr::{PARTIALS_PER_BLOCK, Tick, partial_index};
use crate::config::CacheConfig;

/// Cache line entry: tag, validity, dirtiness, and 8 partial slots.
#[derive(Clone)]
pub struct CacheLine {
    /// Whether this way holds a line.
    pub valid: bool,
    /// Block tag within the set.
    pub tag: u64,
    /// The 8 partial slots of the line.
    pub data: [u64; PARTIALS_PER_BLOCK],
    /// Tick of the most recent access (for victim selection).
    pub last_access: Tick,
    /// Whether the line has been written since install.
    pub dirty: bool,
}

impl Default for CacheLine {
    fn default() -> Self {
        Self {
            valid: false,
            tag: 0,
            data: [0; PARTIALS_PER_BLOCK],
            last_access: 0,
            dirty: false,
        }
    }
}

/// One set of `num_ways` lines.
#[derive(Clone)]
struct CacheSet {
    ways: Vec<CacheLine>,
}

impl CacheSet {
    fn new(num_ways: usize) -> Self {
        Self {
            ways: vec![CacheLine::default(); num_ways],
        }
    }
}

/// A dirty line leaving the cache.
///
/// Carries all 8 partials; the engine forwards each to the coalescing buffer.
#[derive(Clone, Copy, Debug)]
pub struct EvictedLine {
    /// Block-aligned base address of the evicted line.
    pub base_addr: u64,
    /// The line's 8 partial slots.
    pub partials: [u64; PARTIALS_PER_BLOCK],
}

/// Set-associative cache over 8-byte metadata entries.
///
/// Geometry: `set = (addr / block_size) mod num_sets`,
/// `tag = addr / (block_size × num_sets)`,
/// `offset = (addr mod block_size) / 8`.
pub struct MetadataCache {
    num_sets: usize,
    num_ways: usize,
    block_size: u64,
    access_latency: Tick,
    sets: Vec<CacheSet>,
}

impl MetadataCache {
    /// Creates a cache from the given configuration.
    ///
    /// The configuration is assumed validated (`Config::validate`).
    pub fn new(config: &CacheConfig) -> Self {
        let mut sets = Vec::with_capacity(config.num_sets);
        for _ in 0..config.num_sets {
            sets.push(CacheSet::new(config.num_ways));
        }
        Self {
            num_sets: config.num_sets,
            num_ways: config.num_ways,
            block_size: config.block_size,
            access_latency: config.access_latency,
            sets,
        }
    }

    /// Ticks per cache access.
    pub fn access_latency(&self) -> Tick {
        self.access_latency
    }

    fn set_index(&self, addr: u64) -> usize {
        ((addr / self.block_size) % self.num_sets as u64) as usize
    }

    fn tag_of(&self, addr: u64) -> u64 {
        addr / (self.block_size * self.num_sets as u64)
    }

    /// Reconstructs the block base address of a (set, tag) pair.
    fn base_of(&self, set_idx: usize, tag: u64) -> u64 {
        (tag * self.num_sets as u64 + set_idx as u64) * self.block_size
    }

    /// Looks up the partial at `addr`.
    ///
    /// On a tag match in a valid way the line's recency is refreshed and the
    /// 8-byte value returned. A miss returns `None`; the caller decides
    /// whether to fill.
    pub fn lookup(&mut self, addr: u64, now: Tick) -> Option<u64> {
        let set_idx = self.set_index(addr);
        let tag = self.tag_of(addr);
        let offset = partial_index(addr, self.block_size);

        for line in &mut self.sets[set_idx].ways {
            if line.valid && line.tag == tag {
                line.last_access = now;
                return Some(line.data[offset]);
            }
        }
        None
    }

    /// Writes the partial at `addr`, installing a line if necessary.
    ///
    /// Order of preference: update an existing line with a matching tag,
    /// install into the first invalid way, otherwise evict the recency
    /// victim. Installed lines are valid and dirty. Returns the evicted
    /// dirty line, if any.
    pub fn insert(&mut self, addr: u64, data: u64, now: Tick) -> Option<EvictedLine> {
        let set_idx = self.set_index(addr);
        let tag = self.tag_of(addr);
        let offset = partial_index(addr, self.block_size);

        for line in &mut self.sets[set_idx].ways {
            if line.valid && line.tag == tag {
                line.data[offset] = data;
                line.dirty = true;
                line.last_access = now;
                return None;
            }
        }

        for way in 0..self.num_ways {
            if !self.sets[set_idx].ways[way].valid {
                self.install(set_idx, way, tag, now, true, {
                    let mut block = [0; PARTIALS_PER_BLOCK];
                    block[offset] = data;
                    block
                });
                return None;
            }
        }

        let victim = self.find_victim(set_idx);
        let evicted = self.evict(set_idx, victim);
        self.install(set_idx, victim, tag, now, true, {
            let mut block = [0; PARTIALS_PER_BLOCK];
            block[offset] = data;
            block
        });
        evicted
    }

    /// Installs a whole clean block, as read back from NVM on a miss.
    ///
    /// Returns the evicted dirty line, if any.
    pub fn fill(
        &mut self,
        addr: u64,
        block: [u64; PARTIALS_PER_BLOCK],
        now: Tick,
    ) -> Option<EvictedLine> {
        let set_idx = self.set_index(addr);
        let tag = self.tag_of(addr);

        for way in 0..self.num_ways {
            if !self.sets[set_idx].ways[way].valid {
                self.install(set_idx, way, tag, now, false, block);
                return None;
            }
        }

        let victim = self.find_victim(set_idx);
        let evicted = self.evict(set_idx, victim);
        self.install(set_idx, victim, tag, now, false, block);
        evicted
    }

    /// Returns true if the block containing `addr` is resident.
    pub fn contains(&self, addr: u64) -> bool {
        let set_idx = self.set_index(addr);
        let tag = self.tag_of(addr);
        self.sets[set_idx]
            .ways
            .iter()
            .any(|line| line.valid && line.tag == tag)
    }

    fn install(
        &mut self,
        set_idx: usize,
        way: usize,
        tag: u64,
        now: Tick,
        dirty: bool,
        block: [u64; PARTIALS_PER_BLOCK],
    ) {
        let line = &mut self.sets[set_idx].ways[way];
        line.valid = true;
        line.tag = tag;
        line.data = block;
        line.dirty = dirty;
        line.last_access = now;
    }

    /// Strict LRU: smallest `last_access` wins, lowest way index on ties.
    fn find_victim(&self, set_idx: usize) -> usize {
        let mut victim = 0;
        let mut oldest = Tick::MAX;
        for (way, line) in self.sets[set_idx].ways.iter().enumerate() {
            if line.last_access < oldest {
                oldest = line.last_access;
                victim = way;
            }
        }
        victim
    }

    /// Invalidates the given way, returning its contents if it was dirty.
    fn evict(&mut self, set_idx: usize, way: usize) -> Option<EvictedLine> {
        let (tag, partials, dirty) = {
            let line = &mut self.sets[set_idx].ways[way];
            if !line.valid {
                return None;
            }
            let snapshot = (line.tag, line.data, line.dirty);
            line.valid = false;
            line.dirty = false;
            snapshot
        };

        if !dirty {
            return None;
        }
        Some(EvictedLine {
            base_addr: self.base_of(set_idx, tag),
            partials,
        })
    }
}
