//! Cache Engine Unit Tests.
//!
//! Exercises all three organizations: residency, LRU victim selection,
//! write-back addressing, line-crossing word decomposition, and the peek
//! accessors the bus relies on. Shared behavior is parameterized over the
//! organizations with rstest; geometry-specific scenarios get their own
//! tests.

use emu4380_core::mem::SystemMemory;
use emu4380_core::{CacheModel, Organization};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn memory(size: u32) -> SystemMemory {
    SystemMemory::new(size).expect("allocation")
}

// ──────────────────────────────────────────────────────────
// Shared behavior across organizations
// ──────────────────────────────────────────────────────────

#[rstest]
#[case::direct(Organization::DirectMapped)]
#[case::fully(Organization::FullyAssociative)]
#[case::two_way(Organization::TwoWaySetAssociative)]
fn cold_miss_then_hit(#[case] organization: Organization) {
    let mut cache = CacheModel::new(organization);
    let mut mem = memory(4096);

    assert!(!cache.contains(0x100));
    let miss = cache.read_byte(&mut mem, 0x100);
    assert!(!miss.hit);

    assert!(cache.contains(0x100));
    let hit = cache.read_byte(&mut mem, 0x100);
    assert!(hit.hit);
}

#[rstest]
#[case::direct(Organization::DirectMapped)]
#[case::fully(Organization::FullyAssociative)]
#[case::two_way(Organization::TwoWaySetAssociative)]
fn byte_write_is_visible_through_peek(#[case] organization: Organization) {
    let mut cache = CacheModel::new(organization);
    let mut mem = memory(4096);

    cache.write_byte(&mut mem, 123, 0x7E);
    assert_eq!(cache.peek_byte(123), 0x7E);
}

#[rstest]
#[case::direct(Organization::DirectMapped)]
#[case::fully(Organization::FullyAssociative)]
#[case::two_way(Organization::TwoWaySetAssociative)]
fn word_round_trip_within_a_block(#[case] organization: Organization) {
    let mut cache = CacheModel::new(organization);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 64, 0x0102_0304);
    let result = cache.read_word(&mut mem, 64);
    assert!(result.hit);
    assert_eq!(cache.peek_word(64), 0x0102_0304);
}

#[rstest]
#[case::direct(Organization::DirectMapped)]
#[case::fully(Organization::FullyAssociative)]
#[case::two_way(Organization::TwoWaySetAssociative)]
fn fill_reads_existing_memory_contents(#[case] organization: Organization) {
    let mut cache = CacheModel::new(organization);
    let mut mem = memory(4096);
    mem.write_word(200, 0x5555_AAAA);

    cache.read_word(&mut mem, 200);
    assert_eq!(cache.peek_word(200), 0x5555_AAAA);
}

#[rstest]
#[case::direct(Organization::DirectMapped)]
#[case::fully(Organization::FullyAssociative)]
#[case::two_way(Organization::TwoWaySetAssociative)]
fn reset_invalidates_everything(#[case] organization: Organization) {
    let mut cache = CacheModel::new(organization);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 0, 1);
    cache.read_byte(&mut mem, 512);
    cache.reset();

    assert!(!cache.contains(0));
    assert!(!cache.contains(512));
}

/// A write dropped into the cache is not in memory until eviction; the
/// cache is write-back, not write-through.
#[rstest]
#[case::direct(Organization::DirectMapped)]
#[case::fully(Organization::FullyAssociative)]
#[case::two_way(Organization::TwoWaySetAssociative)]
fn writes_stay_in_the_cache_until_eviction(#[case] organization: Organization) {
    let mut cache = CacheModel::new(organization);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 100, 0xFEED_FACE);
    assert_eq!(mem.read_word(100), 0, "no write-through");
    assert_eq!(cache.peek_word(100), 0xFEED_FACE);
}

#[test]
fn labels_name_the_organizations() {
    assert_eq!(
        CacheModel::new(Organization::DirectMapped).label(),
        "Direct Mapped Cache"
    );
    assert_eq!(
        CacheModel::new(Organization::FullyAssociative).label(),
        "Fully Associative Cache"
    );
    assert_eq!(
        CacheModel::new(Organization::TwoWaySetAssociative).label(),
        "Two Way Set Associative Cache"
    );
}

// ──────────────────────────────────────────────────────────
// Direct-mapped: index conflicts and write-back addressing
// ──────────────────────────────────────────────────────────

/// Addresses 1024 bytes apart share an index; the second access evicts the
/// first and a dirty victim lands back at block_address * 32.
#[test]
fn direct_mapped_conflict_writes_back_dirty_victim() {
    let mut cache = CacheModel::new(Organization::DirectMapped);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 0, 0xAABB_CCDD);
    let result = cache.read_byte(&mut mem, 1024);

    assert!(result.writeback_occurred);
    assert!(!cache.contains(0));
    assert!(cache.contains(1024));
    assert_eq!(mem.read_word(0), 0xAABB_CCDD, "write-back target is block 0");
}

#[test]
fn direct_mapped_clean_eviction_skips_writeback() {
    let mut cache = CacheModel::new(Organization::DirectMapped);
    let mut mem = memory(4096);

    cache.read_byte(&mut mem, 0);
    let result = cache.read_byte(&mut mem, 1024);

    assert!(!result.writeback_occurred);
    assert_eq!(result.total(), 23);
}

/// Distinct indexes coexist: 32 consecutive blocks fill the cache with no
/// evictions.
#[test]
fn direct_mapped_distinct_indexes_do_not_conflict() {
    let mut cache = CacheModel::new(Organization::DirectMapped);
    let mut mem = memory(4096);

    for block in 0..32u32 {
        cache.read_byte(&mut mem, block * 32);
    }
    for block in 0..32u32 {
        assert!(cache.contains(block * 32));
    }
}

// ──────────────────────────────────────────────────────────
// Fully associative: LRU over all 32 lines
// ──────────────────────────────────────────────────────────

/// Fill all 32 lines, then install a 33rd block: the first-loaded (oldest
/// stamp) line is the victim.
#[test]
fn fully_associative_evicts_the_oldest_line() {
    let mut cache = CacheModel::new(Organization::FullyAssociative);
    let mut mem = memory(4096);

    for block in 0..32u32 {
        cache.read_byte(&mut mem, block * 32);
    }
    cache.read_byte(&mut mem, 1024);

    assert!(!cache.contains(0), "block 0 was least recently used");
    for block in 1..32u32 {
        assert!(cache.contains(block * 32));
    }
    assert!(cache.contains(1024));
}

/// A hit refreshes the stamp: re-touching block 0 redirects the eviction
/// to block 1.
#[test]
fn fully_associative_hit_refreshes_lru_stamp() {
    let mut cache = CacheModel::new(Organization::FullyAssociative);
    let mut mem = memory(4096);

    for block in 0..32u32 {
        cache.read_byte(&mut mem, block * 32);
    }
    cache.read_byte(&mut mem, 0);
    cache.read_byte(&mut mem, 1024);

    assert!(cache.contains(0));
    assert!(!cache.contains(32), "block 1 became the oldest");
}

/// Invalid lines are preferred over any LRU victim while the cache warms
/// up.
#[test]
fn fully_associative_prefers_invalid_lines() {
    let mut cache = CacheModel::new(Organization::FullyAssociative);
    let mut mem = memory(4096);

    cache.read_byte(&mut mem, 0);
    cache.read_byte(&mut mem, 32);
    assert!(cache.contains(0));
    assert!(cache.contains(32));
}

/// Write-back address for a fully associative line is tag * 32.
#[test]
fn fully_associative_writeback_address() {
    let mut cache = CacheModel::new(Organization::FullyAssociative);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 64, 0x0DD_BA11);
    for block in 0..32u32 {
        if block != 2 {
            cache.read_byte(&mut mem, block * 32);
        }
    }
    // All 32 lines are resident; the dirty block (tag 2) is now oldest.
    cache.read_byte(&mut mem, 1024);

    assert!(!cache.contains(64));
    assert_eq!(mem.read_word(64), 0x0DD_BA11);
}

// ──────────────────────────────────────────────────────────
// Two-way set-associative: per-set LRU
// ──────────────────────────────────────────────────────────

/// Addresses 0, 512, and 1024 all map to set 0 (tags 0, 1, 2). The third
/// install evicts the LRU of the first two.
#[test]
fn two_way_set_conflict_evicts_lru_of_the_set() {
    let mut cache = CacheModel::new(Organization::TwoWaySetAssociative);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 0, 1);
    cache.write_word(&mut mem, 512, 2);
    let result = cache.write_word(&mut mem, 1024, 3);

    assert!(!result.hit);
    assert!(result.writeback_occurred, "evicted tag 0 was dirty");
    assert!(!cache.contains(0), "tag 0 was the LRU way");
    assert!(cache.contains(512));
    assert!(cache.contains(1024));
    assert_eq!(mem.read_word(0), 1, "write-back lands at (0 * 16 + 0) * 32");
}

/// Write-back address reconstruction: tag 1 at set 0 is block 16, byte
/// address 512.
#[test]
fn two_way_writeback_address_includes_the_set_index() {
    let mut cache = CacheModel::new(Organization::TwoWaySetAssociative);
    let mut mem = memory(4096);

    cache.write_word(&mut mem, 512, 0xC0FF_EE00);
    cache.read_byte(&mut mem, 0);
    // Tag 1 is now the LRU way of set 0; this install evicts it.
    cache.read_byte(&mut mem, 1024);

    assert!(!cache.contains(512));
    assert_eq!(mem.read_word(512), 0xC0FF_EE00);
}

/// Different sets never conflict: blocks 0 and 1 live in sets 0 and 1.
#[test]
fn two_way_distinct_sets_coexist() {
    let mut cache = CacheModel::new(Organization::TwoWaySetAssociative);
    let mut mem = memory(4096);

    cache.read_byte(&mut mem, 0);
    cache.read_byte(&mut mem, 32);
    cache.read_byte(&mut mem, 512);
    cache.read_byte(&mut mem, 544);

    assert!(cache.contains(0));
    assert!(cache.contains(32));
    assert!(cache.contains(512));
    assert!(cache.contains(544));
}

// ──────────────────────────────────────────────────────────
// Line-crossing words
// ──────────────────────────────────────────────────────────

/// A read at offset 30 probes bytes 30 and 33; both blocks become
/// resident and each endpoint misses independently.
#[test]
fn crossing_read_probes_both_endpoint_blocks() {
    let mut cache = CacheModel::new(Organization::DirectMapped);
    let mut mem = memory(4096);
    mem.write_word(28, 0x4433_2211);
    mem.write_word(32, 0x8877_6655);

    let result = cache.read_word(&mut mem, 30);

    assert!(!result.hit);
    assert_eq!(result.total(), 46, "two independent endpoint misses");
    assert!(cache.contains(30));
    assert!(cache.contains(32));
    assert_eq!(cache.peek_word(30), 0x6655_4433);
}

/// A second crossing read hits in both blocks: 1 + 1 cycles.
#[test]
fn crossing_read_hits_after_both_blocks_are_resident() {
    let mut cache = CacheModel::new(Organization::DirectMapped);
    let mut mem = memory(4096);

    cache.read_word(&mut mem, 30);
    let result = cache.read_word(&mut mem, 30);

    assert!(result.hit);
    assert_eq!(result.total(), 2);
}

/// A crossing write issues all four bytes: the first byte of each block
/// misses, the second hits (23 + 1 + 23 + 1).
#[test]
fn crossing_write_issues_four_byte_writes() {
    let mut cache = CacheModel::new(Organization::TwoWaySetAssociative);
    let mut mem = memory(4096);

    let result = cache.write_word(&mut mem, 30, 0xDDCC_BBAA);

    assert!(!result.hit);
    assert_eq!(result.total(), 48);
    assert_eq!(cache.peek_word(30), 0xDDCC_BBAA);
    assert_eq!(cache.peek_byte(30), 0xAA);
    assert_eq!(cache.peek_byte(33), 0xDD);
}

/// Crossing state folds: one resident block and one cold block report a
/// combined miss.
#[test]
fn crossing_result_is_a_conjunction_of_hits() {
    let mut cache = CacheModel::new(Organization::FullyAssociative);
    let mut mem = memory(4096);

    cache.read_byte(&mut mem, 28);
    let result = cache.read_word(&mut mem, 30);

    assert!(!result.hit, "second endpoint still misses");
    assert_eq!(result.total(), 1 + 23);
}

/// The fold of a crossing access accumulates sub-access totals into
/// `cycles` while also summing `writeback_cycles`; on a miss, `total`
/// adds the write-back sum on top. Two dirty-evicting endpoints:
/// (23 + 22) * 2 folded cycles plus 22 * 2 again = 134.
#[test]
fn crossing_fold_recounts_writeback_in_the_total() {
    let mut cache = CacheModel::new(Organization::DirectMapped);
    let mut mem = memory(4096);

    // Dirty the lines at indexes 0 and 1 with conflicting tags.
    cache.write_word(&mut mem, 1024, 1);
    cache.write_word(&mut mem, 1056, 2);

    let result = cache.read_word(&mut mem, 30);
    assert!(!result.hit);
    assert!(result.writeback_occurred);
    assert_eq!(result.cycles, 90, "folded endpoint totals");
    assert_eq!(result.writeback_cycles, 44);
    assert_eq!(result.total(), 134);
}

proptest! {
    /// Round-trip invariant across organizations: a word written through
    /// the cache reads back identically, crossing or not.
    #[test]
    fn word_round_trip_any_alignment(
        addr in 0u32..1020,
        value: u32,
        organization in 0usize..3,
    ) {
        let organization = [
            Organization::DirectMapped,
            Organization::FullyAssociative,
            Organization::TwoWaySetAssociative,
        ][organization];
        let mut cache = CacheModel::new(organization);
        let mut mem = memory(1024);

        cache.write_word(&mut mem, addr, value);
        cache.read_word(&mut mem, addr);
        prop_assert_eq!(cache.peek_word(addr), value);
    }
}
