//! Trap immediate values for the TRP instruction.

/// Stop execution; the front end reports the total memory cycles.
pub const HALT: u32 = 0;
/// Print the trap register as a signed decimal integer.
pub const INT_OUT: u32 = 1;
/// Read a signed decimal integer into the trap register.
pub const INT_IN: u32 = 2;
/// Print the low byte of the trap register as a character.
pub const CHAR_OUT: u32 = 3;
/// Read one character into the trap register.
pub const CHAR_IN: u32 = 4;
/// Print the length-prefixed string addressed by the trap register.
pub const STRING_OUT: u32 = 5;
/// Read a line into the buffer addressed by the trap register.
pub const STRING_IN: u32 = 6;
/// Dump all registers as `name<TAB>value` lines.
pub const PRINT_REG: u32 = 98;

/// Register carrying trap input and output data (R3).
pub const TRAP_REG: usize = 3;
