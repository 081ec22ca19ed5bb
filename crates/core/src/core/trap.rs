//! Trap handling: the TRP instruction's I/O and control routines.
//!
//! Traps talk to the machine's [`Console`](crate::core::console::Console)
//! rather than the process streams, so a harness can script input and
//! capture output. Stream write failures are ignored; the emulated program
//! has no way to observe them.

use crate::common::constants::NUM_REGS;
use crate::common::error::Fault;
use crate::common::reg::NAMES;
use crate::core::machine::{Machine, Step};
use crate::isa::traps::{self, TRAP_REG};
use std::io::Write;

impl Machine {
    /// Executes a TRP instruction with the given immediate.
    pub(crate) fn trap(&mut self, code: u32) -> Result<Step, Fault> {
        match code {
            traps::HALT => return Ok(Step::Halt),

            traps::INT_OUT => {
                let value = self.regs.read(TRAP_REG) as i32;
                let _ = write!(self.console.output, "{value}");
                let _ = self.console.output.flush();
            }

            traps::INT_IN => {
                let value = self.console.read_int();
                self.regs.write(TRAP_REG, value as u32);
            }

            traps::CHAR_OUT => {
                let byte = self.regs.read(TRAP_REG) as u8;
                let _ = self.console.output.write_all(&[byte]);
                let _ = self.console.output.flush();
            }

            traps::CHAR_IN => {
                let byte = self.console.read_char();
                self.regs.write(TRAP_REG, u32::from(byte));
            }

            traps::STRING_OUT => {
                let addr = self.regs.read(TRAP_REG);
                if self.word_oob(addr) {
                    return Err(self.exec_fault());
                }
                let len = u32::from(self.bus.read_byte(addr));
                for i in 1..=len {
                    if u64::from(addr) + u64::from(i) >= u64::from(self.bus.size()) {
                        break;
                    }
                    let byte = self.bus.read_byte(addr.wrapping_add(i));
                    let _ = self.console.output.write_all(&[byte]);
                }
                let _ = self.console.output.flush();
                self.bus.end_burst();
            }

            traps::STRING_IN => {
                let addr = self.regs.read(TRAP_REG);
                if self.byte_oob(addr) {
                    return Err(self.exec_fault());
                }
                let mut line = self.console.read_line_bytes();
                if line.len() > 255 {
                    line.truncate(255);
                }
                self.bus.write_byte(addr, line.len() as u8);
                for (i, byte) in line.iter().enumerate() {
                    if u64::from(addr) + i as u64 + 1 >= u64::from(self.bus.size()) {
                        break;
                    }
                    self.bus.write_byte(addr.wrapping_add(i as u32 + 1), *byte);
                }
                if u64::from(addr) + line.len() as u64 + 1 < u64::from(self.bus.size()) {
                    self.bus.write_byte(addr.wrapping_add(line.len() as u32 + 1), 0);
                }
                self.bus.end_burst();
            }

            traps::PRINT_REG => {
                for idx in 0..NUM_REGS {
                    let _ = writeln!(self.console.output, "{}\t{}", NAMES[idx], self.regs.read(idx));
                }
                let _ = self.console.output.flush();
            }

            _ => return Err(self.exec_fault()),
        }

        Ok(Step::Continue)
    }
}
