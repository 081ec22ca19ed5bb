//! Instruction set definitions.
//!
//! Numeric opcode and trap-code values are fixed by the binary image
//! format; the constants here are the single source of truth for both the
//! decoder and the test builders.

/// Opcode numeric values.
pub mod opcodes;
/// Trap immediate values for the TRP instruction.
pub mod traps;
