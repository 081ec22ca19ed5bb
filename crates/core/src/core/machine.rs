//! The Machine: owning state and the fetch/step/run loop.
//!
//! A `Machine` is the single owning value for an execution: register file,
//! control registers, memory bus (with its cycle counter and optional
//! cache), and console. A harness constructs one, drives it with
//! [`Machine::step`] or [`Machine::run`], and inspects it afterwards;
//! nothing here touches the process (no exit, no globals).

use crate::cache::CacheModel;
use crate::common::constants::INSTRUCTION_BYTES;
use crate::common::error::{Fault, MachineError};
use crate::common::reg::{self, RegisterFile};
use crate::config::{CacheMode, EmuConfig};
use crate::core::console::Console;
use crate::mem::{MemoryBus, SystemMemory};

/// Outcome of a successfully executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Execution continues with the next instruction.
    Continue,
    /// A HALT trap was executed.
    Halt,
}

/// The five control registers holding the decoded current instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlRegs {
    /// Opcode byte.
    pub operation: u8,
    /// First operand byte (register index for most instructions).
    pub operand1: u8,
    /// Second operand byte.
    pub operand2: u8,
    /// Third operand byte.
    pub operand3: u8,
    /// 32-bit immediate (the instruction's second word).
    pub immediate: u32,
}

/// The emulated machine.
#[derive(Debug)]
pub struct Machine {
    pub(crate) regs: RegisterFile,
    pub(crate) ctrl: ControlRegs,
    pub(crate) bus: MemoryBus,
    pub(crate) console: Console,
}

impl Machine {
    /// Builds a machine from a configuration and a program image.
    ///
    /// Memory is allocated zero-filled at the configured size and the image
    /// is placed at offset 0. Registers initialize from the image: PC is
    /// the little-endian word at offset 0, SL and HP are the image size,
    /// SB and SP are the memory size, and everything else is zero.
    pub fn new(config: &EmuConfig, image: &[u8], console: Console) -> Result<Self, MachineError> {
        if image.len() as u64 > u64::from(config.mem_size) {
            return Err(MachineError::ImageTooLarge {
                image: image.len(),
                memory: config.mem_size,
            });
        }

        let mut memory = SystemMemory::new(config.mem_size)?;
        memory.load(0, image);

        let entry = match image {
            [a, b, c, d, ..] => u32::from_le_bytes([*a, *b, *c, *d]),
            _ => 0,
        };

        let mut regs = RegisterFile::new();
        regs.write(reg::PC, entry);
        regs.write(reg::SL, image.len() as u32);
        regs.write(reg::SB, config.mem_size);
        regs.write(reg::SP, config.mem_size);
        regs.write(reg::HP, image.len() as u32);

        let cache = config.cache.organization().map(CacheModel::new);

        Ok(Self {
            regs,
            ctrl: ControlRegs::default(),
            bus: MemoryBus::new(memory, cache),
            console,
        })
    }

    /// Reads the register at `idx`.
    pub fn reg(&self, idx: usize) -> u32 {
        self.regs.read(idx)
    }

    /// Writes the register at `idx`.
    pub fn set_reg(&mut self, idx: usize, value: u32) {
        self.regs.write(idx, value);
    }

    /// The control registers as decoded from the last fetch.
    pub fn ctrl(&self) -> &ControlRegs {
        &self.ctrl
    }

    /// Total memory cycles accumulated so far.
    pub fn mem_cycles(&self) -> u64 {
        self.bus.cycles()
    }

    /// The memory bus.
    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    /// Mutable access to the memory bus.
    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    /// Replaces the active cache. Takes effect at the next instruction.
    pub fn set_cache_mode(&mut self, mode: CacheMode) {
        self.bus.set_cache(mode.organization().map(CacheModel::new));
    }

    /// Runs one fetch/decode/execute round.
    pub fn step(&mut self) -> Result<Step, Fault> {
        self.fetch()?;
        self.decode()?;
        self.execute()
    }

    /// Runs until a HALT trap or a fault.
    pub fn run(&mut self) -> Result<(), Fault> {
        loop {
            match self.step()? {
                Step::Halt => return Ok(()),
                Step::Continue => {}
            }
        }
    }

    /// Fetches the two instruction words at PC and advances PC by 8.
    fn fetch(&mut self) -> Result<(), Fault> {
        let size = self.bus.size();
        let pc = self.regs.read(reg::PC);

        if size < INSTRUCTION_BYTES || pc > size - INSTRUCTION_BYTES {
            return Err(Fault::Fetch(pc.wrapping_sub(INSTRUCTION_BYTES)));
        }

        let first = self.bus.read_word(pc);
        let second = self.bus.read_word(pc + 4);
        self.bus.end_burst();

        self.ctrl = ControlRegs {
            operation: (first & 0xFF) as u8,
            operand1: ((first >> 8) & 0xFF) as u8,
            operand2: ((first >> 16) & 0xFF) as u8,
            operand3: ((first >> 24) & 0xFF) as u8,
            immediate: second,
        };

        log::trace!(
            "fetch at {pc:#x}: op={} operands=({}, {}, {}) imm={:#x}",
            self.ctrl.operation,
            self.ctrl.operand1,
            self.ctrl.operand2,
            self.ctrl.operand3,
            self.ctrl.immediate
        );

        self.regs.write(reg::PC, pc + INSTRUCTION_BYTES);
        Ok(())
    }

    /// Address reported for a fault on the current instruction.
    pub(crate) fn fault_address(&self) -> u32 {
        self.regs.read(reg::PC).wrapping_sub(INSTRUCTION_BYTES)
    }
}
