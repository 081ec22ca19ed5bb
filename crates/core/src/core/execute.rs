//! Execute: instruction semantics.
//!
//! Arithmetic is modular unsigned 32-bit; the signed operations (BGT, BLT,
//! SDIV, DIVI, CMP, CMPI) reinterpret register bit patterns as
//! two's-complement. Memory-operand immediates are bounds checked here, at
//! execute time. Every instruction that can write SP validates
//! `SL <= SP <= SB` afterwards; POPR and POPB additionally validate it
//! unconditionally.
//!
//! The burst flag is closed after each instruction's memory phase, so the
//! next instruction's traffic starts a fresh streaming burst.

use crate::common::error::Fault;
use crate::common::reg::{HP, PC, SB, SL, SP};
use crate::core::machine::{Machine, Step};
use crate::isa::opcodes as op;

impl Machine {
    /// Executes the decoded instruction.
    pub(crate) fn execute(&mut self) -> Result<Step, Fault> {
        let c = self.ctrl;

        match c.operation {
            op::JMP => {
                if c.immediate >= self.bus.size() {
                    return Err(self.exec_fault());
                }
                self.regs.write(PC, c.immediate);
            }

            op::JMR => {
                let target = self.r(c.operand1);
                self.regs.write(PC, target);
            }

            op::BNZ => {
                if self.r(c.operand1) != 0 {
                    self.regs.write(PC, c.immediate);
                }
            }

            op::BGT => {
                if (self.r(c.operand1) as i32) > 0 {
                    self.regs.write(PC, c.immediate);
                }
            }

            op::BLT => {
                if (self.r(c.operand1) as i32) < 0 {
                    self.regs.write(PC, c.immediate);
                }
            }

            op::BRZ => {
                if self.r(c.operand1) == 0 {
                    self.regs.write(PC, c.immediate);
                }
            }

            op::MOV => {
                let value = self.r(c.operand2);
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::MOVI | op::LDA => {
                self.set_r(c.operand1, c.immediate);
                self.guard_sp(c.operand1)?;
            }

            op::STR => {
                if self.word_oob(c.immediate) {
                    return Err(self.exec_fault());
                }
                let value = self.r(c.operand1);
                self.bus.write_word(c.immediate, value);
                self.bus.end_burst();
            }

            op::LDR => {
                if self.word_oob(c.immediate) {
                    return Err(self.exec_fault());
                }
                let value = self.bus.read_word(c.immediate);
                self.set_r(c.operand1, value);
                self.bus.end_burst();
                self.guard_sp(c.operand1)?;
            }

            op::STB => {
                if self.byte_oob(c.immediate) {
                    return Err(self.exec_fault());
                }
                let value = self.r(c.operand1) as u8;
                self.bus.write_byte(c.immediate, value);
                self.bus.end_burst();
            }

            op::LDB => {
                if self.byte_oob(c.immediate) {
                    return Err(self.exec_fault());
                }
                let value = u32::from(self.bus.read_byte(c.immediate));
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
                self.bus.end_burst();
            }

            op::ISTR => {
                let addr = self.r(c.operand2);
                let value = self.r(c.operand1);
                self.bus.write_word(addr, value);
                self.bus.end_burst();
            }

            op::ILDR => {
                let addr = self.r(c.operand2);
                let value = self.bus.read_word(addr);
                self.set_r(c.operand1, value);
                self.bus.end_burst();
                self.guard_sp(c.operand1)?;
            }

            op::ISTB => {
                let addr = self.r(c.operand2);
                let value = self.r(c.operand1) as u8;
                self.bus.write_byte(addr, value);
                self.bus.end_burst();
            }

            op::ILDB => {
                let addr = self.r(c.operand2);
                let value = u32::from(self.bus.read_byte(addr));
                self.set_r(c.operand1, value);
                self.bus.end_burst();
                self.guard_sp(c.operand1)?;
            }

            op::ADD => {
                let value = self.r(c.operand2).wrapping_add(self.r(c.operand3));
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::ADDI => {
                let value = self.r(c.operand2).wrapping_add(c.immediate);
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::SUB => {
                let value = self.r(c.operand2).wrapping_sub(self.r(c.operand3));
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::SUBI => {
                let value = self.r(c.operand2).wrapping_sub(c.immediate);
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::MUL => {
                let value = self.r(c.operand2).wrapping_mul(self.r(c.operand3));
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::MULI => {
                let value = self.r(c.operand2).wrapping_mul(c.immediate);
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::DIV => {
                let divisor = self.r(c.operand3);
                if divisor == 0 {
                    return Err(self.exec_fault());
                }
                let value = self.r(c.operand2) / divisor;
                self.set_r(c.operand1, value);
                self.guard_sp(c.operand1)?;
            }

            op::SDIV => {
                let divisor = self.r(c.operand3);
                if divisor == 0 {
                    return Err(self.exec_fault());
                }
                let value = (self.r(c.operand2) as i32).wrapping_div(divisor as i32);
                self.set_r(c.operand1, value as u32);
                self.guard_sp(c.operand1)?;
            }

            op::DIVI => {
                if c.immediate == 0 {
                    return Err(self.exec_fault());
                }
                let value = (self.r(c.operand2) as i32).wrapping_div(c.immediate as i32);
                self.set_r(c.operand1, value as u32);
                self.guard_sp(c.operand1)?;
            }

            op::AND => {
                let value = u32::from(self.r(c.operand2) != 0 && self.r(c.operand3) != 0);
                self.set_r(c.operand1, value);
            }

            op::OR => {
                let value = u32::from(self.r(c.operand2) != 0 || self.r(c.operand3) != 0);
                self.set_r(c.operand1, value);
            }

            op::CMP => {
                let value = Self::compare(self.r(c.operand2) as i32, self.r(c.operand3) as i32);
                self.set_r(c.operand1, value);
            }

            op::CMPI => {
                let value = Self::compare(self.r(c.operand2) as i32, c.immediate as i32);
                self.set_r(c.operand1, value);
            }

            op::TRP => return self.trap(c.immediate),

            op::ALCI => {
                let old_hp = self.regs.read(HP);
                self.set_r(c.operand1, old_hp);
                let new_hp = self.regs.read(HP).wrapping_add(c.immediate);
                self.regs.write(HP, new_hp);
                if new_hp >= self.regs.read(SP) {
                    return Err(self.exec_fault());
                }
            }

            op::ALLC => {
                if self.word_oob(c.immediate) {
                    return Err(self.exec_fault());
                }
                let bytes = self.bus.read_word(c.immediate);
                let old_hp = self.regs.read(HP);
                self.set_r(c.operand1, old_hp);
                let new_hp = self.regs.read(HP).wrapping_add(bytes);
                self.regs.write(HP, new_hp);
                self.bus.end_burst();
                if new_hp >= self.regs.read(SP) {
                    return Err(self.exec_fault());
                }
            }

            op::IALLC => {
                let addr = self.r(c.operand2);
                if self.word_oob(addr) {
                    return Err(self.exec_fault());
                }
                let bytes = self.bus.read_word(addr);
                let old_hp = self.regs.read(HP);
                self.set_r(c.operand1, old_hp);
                let new_hp = self.regs.read(HP).wrapping_add(bytes);
                self.regs.write(HP, new_hp);
                self.bus.end_burst();
                if new_hp >= self.regs.read(SP) {
                    return Err(self.exec_fault());
                }
            }

            op::PSHR => {
                let sp = self.regs.read(SP);
                if sp.wrapping_sub(4) < self.regs.read(SL) {
                    return Err(self.exec_fault());
                }
                let sp = sp.wrapping_sub(4);
                self.regs.write(SP, sp);
                self.guard_sp(c.operand1)?;
                let value = self.r(c.operand1);
                self.bus.write_word(sp, value);
                self.bus.end_burst();
            }

            op::PSHB => {
                let sp = self.regs.read(SP);
                if sp.wrapping_sub(1) < self.regs.read(SL) {
                    return Err(self.exec_fault());
                }
                let sp = sp.wrapping_sub(1);
                self.regs.write(SP, sp);
                self.guard_sp(c.operand1)?;
                let value = self.r(c.operand1) as u8;
                self.bus.write_byte(sp, value);
                self.bus.end_burst();
            }

            op::POPR => {
                let sp = self.regs.read(SP);
                if sp.wrapping_add(4) > self.regs.read(SB) {
                    return Err(self.exec_fault());
                }
                let value = self.bus.read_word(sp);
                self.set_r(c.operand1, value);
                let sp = self.regs.read(SP).wrapping_add(4);
                self.regs.write(SP, sp);
                self.guard_sp(c.operand1)?;
                self.bus.end_burst();
                self.check_sp()?;
            }

            op::POPB => {
                let sp = self.regs.read(SP);
                if sp.wrapping_add(1) > self.regs.read(SB) {
                    return Err(self.exec_fault());
                }
                let value = u32::from(self.bus.read_byte(sp));
                self.set_r(c.operand1, value);
                let sp = self.regs.read(SP).wrapping_add(1);
                self.regs.write(SP, sp);
                self.guard_sp(c.operand1)?;
                self.bus.end_burst();
                self.check_sp()?;
            }

            op::CALL => {
                let sp = self.regs.read(SP);
                if sp.wrapping_sub(4) < self.regs.read(SL) {
                    return Err(self.exec_fault());
                }
                let sp = sp.wrapping_sub(4);
                self.regs.write(SP, sp);
                self.guard_sp(c.operand1)?;
                let ret = self.regs.read(PC);
                self.bus.write_word(sp, ret);
                self.regs.write(PC, c.immediate);
                self.bus.end_burst();
            }

            op::RET => {
                let sp = self.regs.read(SP);
                if sp.wrapping_add(4) > self.regs.read(SB) {
                    return Err(self.exec_fault());
                }
                let target = self.bus.read_word(sp);
                self.regs.write(PC, target);
                let sp = self.regs.read(SP).wrapping_add(4);
                self.regs.write(SP, sp);
                self.guard_sp(c.operand1)?;
                self.bus.end_burst();
            }

            _ => return Err(self.exec_fault()),
        }

        Ok(Step::Continue)
    }

    /// Signed three-way comparison: 0 equal, 1 greater, -1 (as u32) less.
    fn compare(lhs: i32, rhs: i32) -> u32 {
        if lhs == rhs {
            0
        } else if lhs > rhs {
            1
        } else {
            u32::MAX
        }
    }

    pub(crate) fn r(&self, idx: u8) -> u32 {
        self.regs.read(usize::from(idx))
    }

    pub(crate) fn set_r(&mut self, idx: u8, value: u32) {
        self.regs.write(usize::from(idx), value);
    }

    pub(crate) fn exec_fault(&self) -> Fault {
        Fault::Execute(self.fault_address())
    }

    /// Fails when the stack pointer has left `SL..=SB`.
    fn check_sp(&self) -> Result<(), Fault> {
        let sp = self.regs.read(SP);
        if sp < self.regs.read(SL) || sp > self.regs.read(SB) {
            return Err(self.exec_fault());
        }
        Ok(())
    }

    /// Validates the stack pointer when `dest` names it.
    fn guard_sp(&self, dest: u8) -> Result<(), Fault> {
        if usize::from(dest) == SP {
            self.check_sp()
        } else {
            Ok(())
        }
    }

    /// Whether a word operand at `addr` falls outside memory
    /// (`addr + 3 >= size`, matching the memory layer's comparison).
    pub(crate) fn word_oob(&self, addr: u32) -> bool {
        u64::from(addr) + 3 >= u64::from(self.bus.size())
    }

    /// Whether a byte operand at `addr` falls outside memory.
    pub(crate) fn byte_oob(&self, addr: u32) -> bool {
        addr >= self.bus.size()
    }
}
