//! Metadata Cache Unit Tests.
//!
//! Verifies the set-associative cache over 8-byte entries: lookup/insert
//! semantics, strict-LRU victim selection with lowest-way tie break, and the
//! conservative dirty-eviction export of all 8 partial slots.
//!
//! The cache is constructed directly from CacheConfig; no engine needed.

use thoth_core::config::CacheConfig;
use thoth_core::mem::cache::MetadataCache;

// ──────────────────────────────────────────────────────────
// Helper: build a small deterministic test cache
// ──────────────────────────────────────────────────────────

/// 2 sets x 2 ways x 64-byte lines.
///
/// Set index = (addr / 64) % 2
/// Tag       = addr / 128
fn test_config(num_sets: usize, num_ways: usize) -> CacheConfig {
    CacheConfig {
        num_sets,
        num_ways,
        block_size: 64,
        access_latency: 1,
        write_queue_capacity: 64,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Lookup
// ══════════════════════════════════════════════════════════

/// First lookup of any address is a miss.
#[test]
fn cold_lookup_misses() {
    let mut cache = MetadataCache::new(&test_config(2, 2));
    assert_eq!(cache.lookup(0x0, 1), None);
}

/// A written partial reads back from its exact offset slot.
#[test]
fn lookup_returns_written_partial() {
    let mut cache = MetadataCache::new(&test_config(2, 2));
    cache.insert(0x18, 0xAB, 1);

    assert_eq!(cache.lookup(0x18, 2), Some(0xAB));
    // Other slots of the same line exist but hold zero.
    assert_eq!(cache.lookup(0x10, 3), Some(0x0));
}

/// A second write to the same address overwrites in place, no new line.
#[test]
fn insert_updates_existing_line() {
    let mut cache = MetadataCache::new(&test_config(2, 2));
    cache.insert(0x8, 0x11, 1);
    let evicted = cache.insert(0x8, 0x22, 2);

    assert!(evicted.is_none());
    assert_eq!(cache.lookup(0x8, 3), Some(0x22));
}

// ══════════════════════════════════════════════════════════
// 2. Victim selection
// ══════════════════════════════════════════════════════════

/// With both ways full, the least recently accessed line is evicted.
#[test]
fn lru_victim_is_least_recent() {
    let mut cache = MetadataCache::new(&test_config(1, 2));

    // Tags 0, 1, 2 all map to set 0.
    cache.insert(0x0, 1, 1); // way 0, t=1
    cache.insert(0x40, 2, 2); // way 1, t=2
    cache.lookup(0x0, 3); // refresh tag 0

    // Tag 2 must displace tag 1 (oldest access).
    cache.insert(0x80, 3, 4);
    assert!(cache.contains(0x0), "refreshed line survives");
    assert!(!cache.contains(0x40), "LRU line evicted");
    assert!(cache.contains(0x80));
}

/// Equal recency falls back to the lowest way index.
#[test]
fn lru_tie_breaks_to_lowest_way() {
    let mut cache = MetadataCache::new(&test_config(1, 2));
    cache.insert(0x0, 1, 5); // way 0
    cache.insert(0x40, 2, 5); // way 1, same tick

    cache.insert(0x80, 3, 6);
    assert!(!cache.contains(0x0), "way 0 is the tie-break victim");
    assert!(cache.contains(0x40));
}

// ══════════════════════════════════════════════════════════
// 3. Dirty eviction
// ══════════════════════════════════════════════════════════

/// A dirty eviction exports the whole line: the written slot carries its
/// value, the 7 untouched slots carry zero.
#[test]
fn dirty_eviction_exports_all_slots() {
    let mut cache = MetadataCache::new(&test_config(1, 1));
    cache.insert(0x10, 0xCAFE, 1); // partial index 2 of block 0x0

    let evicted = cache
        .insert(0x40, 0x1, 2)
        .expect("conflicting insert must evict the dirty line");

    assert_eq!(evicted.base_addr, 0x0);
    assert_eq!(evicted.partials[2], 0xCAFE);
    for (i, &partial) in evicted.partials.iter().enumerate() {
        if i != 2 {
            assert_eq!(partial, 0, "untouched slot {} must be zero", i);
        }
    }
    assert!(!cache.contains(0x0));
}

/// The evicted base address is reconstructed from (set, tag).
#[test]
fn eviction_base_address_round_trips() {
    let mut cache = MetadataCache::new(&test_config(2, 1));

    // 0x1C0 / 64 = 7 -> set 1, tag 3.
    cache.insert(0x1C0, 0x7, 1);
    let evicted = cache.insert(0x2C0, 0x8, 2).expect("same set, new tag");
    assert_eq!(evicted.base_addr, 0x1C0);
}

// ══════════════════════════════════════════════════════════
// 4. Clean lines
// ══════════════════════════════════════════════════════════

/// A filled (read-back) line is clean; displacing it produces no export.
#[test]
fn clean_fill_evicts_silently() {
    let mut cache = MetadataCache::new(&test_config(1, 1));

    cache.fill(0x0, [9; 8], 1);
    assert_eq!(cache.lookup(0x0, 2), Some(9));

    let evicted = cache.insert(0x40, 0x1, 3);
    assert!(evicted.is_none(), "clean victim must not cascade");
}

/// A fill that displaces a dirty line still exports it.
#[test]
fn fill_displacing_dirty_line_exports_it() {
    let mut cache = MetadataCache::new(&test_config(1, 1));
    cache.insert(0x0, 0x5, 1);

    let evicted = cache.fill(0x40, [0; 8], 2);
    assert!(evicted.is_some());
    assert_eq!(evicted.unwrap().base_addr, 0x0);
}

// ══════════════════════════════════════════════════════════
// 5. Set isolation
// ══════════════════════════════════════════════════════════

/// Lines in different sets never conflict.
#[test]
fn different_sets_do_not_conflict() {
    let mut cache = MetadataCache::new(&test_config(2, 1));

    cache.insert(0x0, 1, 1); // set 0
    cache.insert(0x40, 2, 2); // set 1
    assert!(cache.contains(0x0));
    assert!(cache.contains(0x40));
}

/// At most one way per set carries a given tag: rewriting an address after
/// an eviction reinstalls rather than duplicating.
#[test]
fn no_duplicate_tags_within_a_set() {
    let mut cache = MetadataCache::new(&test_config(1, 2));
    cache.insert(0x0, 1, 1);
    cache.insert(0x0, 2, 2);
    cache.insert(0x40, 3, 3);
    cache.insert(0x0, 4, 4);

    assert_eq!(cache.lookup(0x0, 5), Some(4));
    assert!(cache.contains(0x40), "no spurious eviction");
}
