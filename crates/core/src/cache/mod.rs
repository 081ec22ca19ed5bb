//! Write-Back Cache Simulator.
//!
//! One geometry-parameterized engine realizes the three cache
//! organizations: direct-mapped (32 sets x 1 way), fully associative
//! (1 set x 32 ways), and two-way set-associative (16 sets x 2 ways).
//! Total capacity is 32 lines of 32 bytes in every organization.
//!
//! The engine models hits, misses, write-back of dirty victims, and
//! least-recently-used replacement via monotonic stamps. It holds no
//! reference to memory; fill and write-back take `&mut SystemMemory`, so a
//! cache can be driven against a bare memory in tests.
//!
//! Word accesses whose byte range straddles two blocks decompose into
//! per-byte sub-accesses: reads probe the two endpoint bytes (which land on
//! the two distinct blocks), writes issue all four bytes. Each sub-access
//! costs and can miss independently.

mod line;
mod timing;

pub use self::timing::AccessResult;

use self::line::CacheLine;
use crate::common::constants::{BLOCK_SIZE, CACHE_LINES};
use crate::mem::system::SystemMemory;

/// Cache organization: geometry plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Organization {
    /// 32 sets of one way.
    DirectMapped,
    /// One set of 32 ways, scanned linearly.
    FullyAssociative,
    /// 16 sets of two ways.
    TwoWaySetAssociative,
}

impl Organization {
    /// Human-readable cache type name.
    pub fn label(self) -> &'static str {
        match self {
            Self::DirectMapped => "Direct Mapped Cache",
            Self::FullyAssociative => "Fully Associative Cache",
            Self::TwoWaySetAssociative => "Two Way Set Associative Cache",
        }
    }

    /// Number of sets used for index/tag decomposition; 0 means fully
    /// associative (index is always 0 and the tag is the block address).
    fn num_sets(self) -> u32 {
        match self {
            Self::DirectMapped => CACHE_LINES,
            Self::FullyAssociative => 0,
            Self::TwoWaySetAssociative => CACHE_LINES / 2,
        }
    }

    fn ways(self) -> usize {
        match self {
            Self::DirectMapped => 1,
            Self::FullyAssociative => CACHE_LINES as usize,
            Self::TwoWaySetAssociative => 2,
        }
    }
}

/// Address decomposition for a given set count.
#[derive(Debug, Clone, Copy)]
struct AddressParts {
    block_offset: u32,
    tag: u32,
    index: u32,
}

impl AddressParts {
    fn new(addr: u32, num_sets: u32) -> Self {
        let block_address = addr / BLOCK_SIZE;
        let block_offset = addr % BLOCK_SIZE;

        let (index, tag) = if num_sets > 0 {
            (block_address % num_sets, block_address / num_sets)
        } else {
            (0, block_address)
        };

        Self {
            block_offset,
            tag,
            index,
        }
    }
}

/// Data mutation applied to a resident line on the write paths.
#[derive(Debug, Clone, Copy)]
enum Mutation {
    None,
    Byte(u8),
    Word(u32),
}

/// The cache engine.
#[derive(Debug)]
pub struct CacheModel {
    organization: Organization,
    /// Index/tag divisor; 0 denotes fully associative.
    num_sets: u32,
    sets: Vec<Vec<CacheLine>>,
    lru_counter: u64,
}

impl CacheModel {
    /// Creates an empty cache with every line invalid.
    pub fn new(organization: Organization) -> Self {
        let set_count = match organization.num_sets() {
            0 => 1,
            n => n as usize,
        };
        let sets = (0..set_count)
            .map(|_| (0..organization.ways()).map(|_| CacheLine::new()).collect())
            .collect();

        Self {
            organization,
            num_sets: organization.num_sets(),
            sets,
            lru_counter: 0,
        }
    }

    /// The organization this cache was built as.
    pub fn organization(&self) -> Organization {
        self.organization
    }

    /// Human-readable cache type name.
    pub fn label(&self) -> &'static str {
        self.organization.label()
    }

    /// Invalidates every line and resets the LRU counter.
    pub fn reset(&mut self) {
        for set in &mut self.sets {
            for line in set {
                line.invalidate();
            }
        }
        self.lru_counter = 0;
    }

    /// Whether the block containing `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        let parts = AddressParts::new(addr, self.num_sets);
        self.find_way(parts.index as usize, parts.tag).is_some()
    }

    /// Reads the byte at `addr`, filling the block on a miss.
    pub fn read_byte(&mut self, mem: &mut SystemMemory, addr: u32) -> AccessResult {
        self.access(mem, addr, Mutation::None)
    }

    /// Reads the word at `addr`, filling on a miss.
    ///
    /// A crossing word probes the two endpoint bytes; the endpoints lie on
    /// the two blocks the word spans, so both become resident.
    pub fn read_word(&mut self, mem: &mut SystemMemory, addr: u32) -> AccessResult {
        if Self::crosses_block(addr) {
            let lo = self.access(mem, addr, Mutation::None);
            let hi = self.access(mem, addr.wrapping_add(3), Mutation::None);
            return AccessResult::fold(&[lo, hi]);
        }
        self.access(mem, addr, Mutation::None)
    }

    /// Writes the byte at `addr`, filling the block on a miss.
    pub fn write_byte(&mut self, mem: &mut SystemMemory, addr: u32, value: u8) -> AccessResult {
        self.access(mem, addr, Mutation::Byte(value))
    }

    /// Writes the word at `addr`, filling on a miss. A crossing word is
    /// issued as four independent byte writes.
    pub fn write_word(&mut self, mem: &mut SystemMemory, addr: u32, value: u32) -> AccessResult {
        if Self::crosses_block(addr) {
            let parts: Vec<AccessResult> = value
                .to_le_bytes()
                .into_iter()
                .enumerate()
                .map(|(i, byte)| self.access(mem, addr.wrapping_add(i as u32), Mutation::Byte(byte)))
                .collect();
            return AccessResult::fold(&parts);
        }
        self.access(mem, addr, Mutation::Word(value))
    }

    /// Reads the byte at `addr` from the resident block, or 0 when the
    /// block is not resident. Valid data is guaranteed immediately after a
    /// read or write of the same address.
    pub fn peek_byte(&self, addr: u32) -> u8 {
        let parts = AddressParts::new(addr, self.num_sets);
        match self.find_way(parts.index as usize, parts.tag) {
            Some(way) => self.sets[parts.index as usize][way].data[parts.block_offset as usize],
            None => 0,
        }
    }

    /// Reads the little-endian word at `addr` from resident data.
    ///
    /// Assembled per byte so a crossing word picks each byte out of its own
    /// block.
    pub fn peek_word(&self, addr: u32) -> u32 {
        u32::from_le_bytes([
            self.peek_byte(addr),
            self.peek_byte(addr.wrapping_add(1)),
            self.peek_byte(addr.wrapping_add(2)),
            self.peek_byte(addr.wrapping_add(3)),
        ])
    }

    fn crosses_block(addr: u32) -> bool {
        addr % BLOCK_SIZE + 4 > BLOCK_SIZE
    }

    fn find_way(&self, set_idx: usize, tag: u32) -> Option<usize> {
        self.sets[set_idx]
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// First invalid way, else the way with the smallest LRU stamp.
    fn victim_way(&self, set_idx: usize) -> usize {
        let set = &self.sets[set_idx];
        let mut victim = 0;
        for (way, line) in set.iter().enumerate() {
            if !line.valid {
                return way;
            }
            if line.last_used < set[victim].last_used {
                victim = way;
            }
        }
        victim
    }

    /// Memory address of the block a resident line holds.
    fn resident_block_base(&self, tag: u32, index: u32) -> u32 {
        let block_address = if self.num_sets > 0 {
            tag.wrapping_mul(self.num_sets).wrapping_add(index)
        } else {
            tag
        };
        block_address.wrapping_mul(BLOCK_SIZE)
    }

    fn next_stamp(&mut self) -> u64 {
        self.lru_counter += 1;
        self.lru_counter
    }

    /// Single-block access: lookup, optional write-back, fill, mutate.
    fn access(&mut self, mem: &mut SystemMemory, addr: u32, mutation: Mutation) -> AccessResult {
        let parts = AddressParts::new(addr, self.num_sets);
        let set_idx = parts.index as usize;

        if let Some(way) = self.find_way(set_idx, parts.tag) {
            let stamp = self.next_stamp();
            let line = &mut self.sets[set_idx][way];
            line.last_used = stamp;
            if !matches!(mutation, Mutation::None) {
                Self::apply(line, parts.block_offset, mutation);
                line.dirty = true;
            }
            return AccessResult::timed(true, false);
        }

        let way = self.victim_way(set_idx);
        let needs_writeback = {
            let line = &self.sets[set_idx][way];
            line.valid && line.dirty
        };
        let result = AccessResult::timed(false, needs_writeback);

        if needs_writeback {
            let base = self.resident_block_base(self.sets[set_idx][way].tag, parts.index);
            log::trace!(
                "{}: writeback of block {:#x} from set {set_idx} way {way}",
                self.label(),
                base
            );
            let line = &self.sets[set_idx][way];
            for i in 0..BLOCK_SIZE {
                mem.write_byte(base.wrapping_add(i), line.data[i as usize]);
            }
        }

        let block_base = addr - parts.block_offset;
        log::trace!(
            "{}: miss at {addr:#x}, filling block {block_base:#x} into set {set_idx} way {way}",
            self.label()
        );
        let stamp = self.next_stamp();
        let line = &mut self.sets[set_idx][way];
        for i in 0..BLOCK_SIZE {
            line.data[i as usize] = mem.read_byte(block_base + i);
        }
        line.valid = true;
        line.dirty = false;
        line.tag = parts.tag;
        if !matches!(mutation, Mutation::None) {
            Self::apply(line, parts.block_offset, mutation);
            line.dirty = true;
        }
        line.last_used = stamp;

        result
    }

    fn apply(line: &mut CacheLine, offset: u32, mutation: Mutation) {
        match mutation {
            Mutation::None => {}
            Mutation::Byte(value) => line.data[offset as usize] = value,
            Mutation::Word(value) => {
                let base = offset as usize;
                line.data[base..base + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
    }
}
