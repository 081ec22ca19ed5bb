//! Decode: operand and immediate validation.
//!
//! Decode checks only what is knowable without executing: register
//! operands must index the 22-entry file, control-flow targets must lie in
//! memory, DIVI's immediate must be non-zero, and TRP's immediate must
//! name a known trap. Memory-operand immediates (STR/LDR/STB/LDB and the
//! heap allocators) are execute-time concerns and are deliberately not
//! checked here.

use crate::common::constants::NUM_REGS;
use crate::common::error::Fault;
use crate::core::machine::Machine;
use crate::isa::{opcodes as op, traps};

fn reg_ok(idx: u8) -> bool {
    usize::from(idx) < NUM_REGS
}

impl Machine {
    /// Validates the control registers against the opcode table.
    pub(crate) fn decode(&self) -> Result<(), Fault> {
        let c = self.ctrl;
        let size = self.bus.size();

        let ok = match c.operation {
            op::JMP => c.immediate < size,
            op::JMR => reg_ok(c.operand1),
            op::BNZ | op::BGT | op::BLT | op::BRZ => reg_ok(c.operand1) && c.immediate < size,
            op::MOV => reg_ok(c.operand1) && reg_ok(c.operand2),
            op::MOVI => reg_ok(c.operand1),
            op::LDA | op::STR | op::LDR | op::STB | op::LDB => reg_ok(c.operand1),
            op::ISTR | op::ILDR | op::ISTB | op::ILDB => {
                reg_ok(c.operand1) && reg_ok(c.operand2)
            }
            op::ADD | op::SUB | op::MUL | op::DIV | op::SDIV | op::AND | op::OR | op::CMP => {
                reg_ok(c.operand1) && reg_ok(c.operand2) && reg_ok(c.operand3)
            }
            op::DIVI => c.immediate != 0 && reg_ok(c.operand1) && reg_ok(c.operand2),
            op::ADDI | op::SUBI | op::MULI | op::CMPI => {
                reg_ok(c.operand1) && reg_ok(c.operand2)
            }
            op::TRP => matches!(
                c.immediate,
                traps::HALT
                    | traps::INT_OUT
                    | traps::INT_IN
                    | traps::CHAR_OUT
                    | traps::CHAR_IN
                    | traps::STRING_OUT
                    | traps::STRING_IN
                    | traps::PRINT_REG
            ),
            op::ALCI | op::ALLC => reg_ok(c.operand1),
            op::IALLC => reg_ok(c.operand1) && reg_ok(c.operand2),
            op::PSHR | op::PSHB | op::POPR | op::POPB => reg_ok(c.operand1),
            op::CALL => c.immediate < size,
            op::RET => true,
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(Fault::Decode(self.fault_address()))
        }
    }
}
