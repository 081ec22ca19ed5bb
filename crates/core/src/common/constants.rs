//! Global System Constants.
//!
//! Geometry of the cache and memory system plus the fixed costs of the
//! no-cache streaming-burst model. These values appear in binary images
//! and recorded cycle counts; they are not tunable.

/// Cache block (line) size in bytes; also the unit of fill and write-back.
pub const BLOCK_SIZE: u32 = 32;

/// Words transferred per block fill or write-back.
pub const WORDS_PER_BLOCK: u32 = BLOCK_SIZE / 4;

/// Total number of cache lines across every organization (1 KiB capacity).
pub const CACHE_LINES: u32 = 32;

/// Number of architectural registers (R0-R15, PC, SL, SB, SP, FP, HP).
pub const NUM_REGS: usize = 22;

/// Instruction width in bytes: one opcode word plus one immediate word.
pub const INSTRUCTION_BYTES: u32 = 8;

/// Cycles charged for the first access of an uncached burst.
pub const STREAM_FIRST_COST: u64 = 8;

/// Cycles charged for each continuation access within an uncached burst.
pub const STREAM_NEXT_COST: u64 = 2;
