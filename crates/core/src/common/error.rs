//! Fault and Error Definitions.
//!
//! This module defines every failure surface of the emulator:
//! 1. **Pipeline faults:** Fatal fetch/decode/execute failures, carrying the
//!    address of the failing instruction.
//! 2. **Machine errors:** Construction-time failures (image too large,
//!    allocation failure).
//! 3. **Loader and configuration errors:** File I/O and selector validation.

use std::io;

use thiserror::Error;

/// A fatal fault raised by one of the three pipeline phases.
///
/// The payload is the address reported for the failing instruction: the
/// program counter minus the instruction width, computed at fault time.
/// A fetch fault occurs before the program counter advances, so its
/// reported address is eight below the faulting fetch address (wrapping
/// at zero).
///
/// The `Display` form is the exact diagnostic the front end prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// The program counter left the fetchable region.
    #[error("fINVALID INSTRUCTION AT: {0}")]
    Fetch(u32),
    /// The fetched instruction failed operand or opcode validation.
    #[error("dINVALID INSTRUCTION AT: {0}")]
    Decode(u32),
    /// A runtime invariant failed while executing the instruction.
    #[error("eINVALID INSTRUCTION AT: {0}")]
    Execute(u32),
}

impl Fault {
    /// Address of the instruction the fault is attributed to.
    pub fn address(self) -> u32 {
        match self {
            Self::Fetch(addr) | Self::Decode(addr) | Self::Execute(addr) => addr,
        }
    }
}

/// Backing-store allocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("memory allocation of {size} bytes failed")]
pub struct AllocError {
    /// Requested allocation size in bytes.
    pub size: u64,
}

/// Errors raised while constructing a [`crate::Machine`].
#[derive(Debug, Error)]
pub enum MachineError {
    /// The program image does not fit in the configured memory.
    #[error("program image of {image} bytes exceeds the {memory}-byte memory")]
    ImageTooLarge {
        /// Image size in bytes.
        image: usize,
        /// Configured memory size in bytes.
        memory: u32,
    },
    /// The backing store could not be allocated.
    #[error("failed to initialize memory")]
    Allocation(#[from] AllocError),
}

/// Errors raised while reading a program image from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("failed to read program file: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while validating emulator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The memory size was not a valid unsigned 32-bit byte count.
    #[error("Invalid memory configuration. Aborting.")]
    Memory,
    /// The cache selector was outside 0..=3.
    #[error("Invalid cache configuration. Aborting.")]
    Cache,
}
