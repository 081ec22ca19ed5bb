//! Opcode numeric values, as encoded in binary images.

/// Unconditional jump to the immediate address.
pub const JMP: u8 = 1;
/// Jump to the address in the operand-1 register.
pub const JMR: u8 = 2;
/// Branch to the immediate when the operand-1 register is non-zero.
pub const BNZ: u8 = 3;
/// Branch when the operand-1 register is greater than zero (signed).
pub const BGT: u8 = 4;
/// Branch when the operand-1 register is less than zero (signed).
pub const BLT: u8 = 5;
/// Branch when the operand-1 register is zero.
pub const BRZ: u8 = 6;
/// Register-to-register move.
pub const MOV: u8 = 7;
/// Load the immediate into a register.
pub const MOVI: u8 = 8;
/// Load the immediate address value into a register (no memory access).
pub const LDA: u8 = 9;
/// Store a word at the immediate address.
pub const STR: u8 = 10;
/// Load a word from the immediate address.
pub const LDR: u8 = 11;
/// Store a byte at the immediate address.
pub const STB: u8 = 12;
/// Load a byte from the immediate address.
pub const LDB: u8 = 13;
/// Store a word at the address in the operand-2 register.
pub const ISTR: u8 = 14;
/// Load a word from the address in the operand-2 register.
pub const ILDR: u8 = 15;
/// Store a byte at the address in the operand-2 register.
pub const ISTB: u8 = 16;
/// Load a byte from the address in the operand-2 register.
pub const ILDB: u8 = 17;
/// Unsigned wrapping addition.
pub const ADD: u8 = 18;
/// Unsigned wrapping addition with immediate.
pub const ADDI: u8 = 19;
/// Unsigned wrapping subtraction.
pub const SUB: u8 = 20;
/// Unsigned wrapping subtraction with immediate.
pub const SUBI: u8 = 21;
/// Unsigned wrapping multiplication.
pub const MUL: u8 = 22;
/// Unsigned wrapping multiplication with immediate.
pub const MULI: u8 = 23;
/// Unsigned division.
pub const DIV: u8 = 24;
/// Signed division.
pub const SDIV: u8 = 25;
/// Signed division by the immediate.
pub const DIVI: u8 = 26;
/// Logical AND: 1 when both operands are non-zero, else 0.
pub const AND: u8 = 27;
/// Logical OR: 1 when either operand is non-zero, else 0.
pub const OR: u8 = 28;
/// Signed three-way comparison of two registers.
pub const CMP: u8 = 29;
/// Signed three-way comparison against the immediate.
pub const CMPI: u8 = 30;
/// Trap to the I/O and control routines selected by the immediate.
pub const TRP: u8 = 31;
/// Allocate `immediate` heap bytes, returning the old heap pointer.
pub const ALCI: u8 = 32;
/// Allocate heap bytes sized by the word at the immediate address.
pub const ALLC: u8 = 33;
/// Allocate heap bytes sized by the word at the operand-2 register address.
pub const IALLC: u8 = 34;
/// Push the operand-1 register word onto the stack.
pub const PSHR: u8 = 35;
/// Push the low byte of the operand-1 register onto the stack.
pub const PSHB: u8 = 36;
/// Pop a word from the stack into the operand-1 register.
pub const POPR: u8 = 37;
/// Pop a byte from the stack into the operand-1 register.
pub const POPB: u8 = 38;
/// Push the return address and jump to the immediate.
pub const CALL: u8 = 39;
/// Pop the return address into the program counter.
pub const RET: u8 = 40;
