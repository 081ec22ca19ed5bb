//! Byte-Addressable System Memory.
//!
//! A contiguous store of up to `u32::MAX` bytes with little-endian word
//! accessors. Out-of-range reads return zero and out-of-range writes are
//! dropped; the instruction core has already rejected illegal addresses by
//! the time traffic reaches this layer, so these checks are a last line of
//! defense rather than an error surface.
//!
//! Word accesses are rejected when the highest touched byte `addr + 3`
//! falls outside memory, i.e. for any `addr > N - 4`. Recorded cycle
//! counts depend on this comparison happening before anything is charged,
//! so it is kept exactly.

use crate::common::error::AllocError;
use crate::mem::buffer::MemoryBuffer;

/// Byte-addressable memory with little-endian word access.
#[derive(Debug)]
pub struct SystemMemory {
    buf: MemoryBuffer,
}

impl SystemMemory {
    /// Allocates `size` bytes of zero-filled memory.
    pub fn new(size: u32) -> Result<Self, AllocError> {
        Ok(Self {
            buf: MemoryBuffer::new(size as usize)?,
        })
    }

    /// Memory size in bytes.
    pub fn size(&self) -> u32 {
        self.buf.len() as u32
    }

    /// Reads the byte at `addr`, or 0 when `addr` is out of range.
    pub fn read_byte(&self, addr: u32) -> u8 {
        if addr >= self.size() {
            return 0;
        }
        self.buf.get(addr as usize)
    }

    /// Reads a little-endian word at `addr`, or 0 when `addr + 3 >= size`.
    pub fn read_word(&self, addr: u32) -> u32 {
        if u64::from(addr) + 3 >= u64::from(self.size()) {
            return 0;
        }
        let base = addr as usize;
        u32::from_le_bytes([
            self.buf.get(base),
            self.buf.get(base + 1),
            self.buf.get(base + 2),
            self.buf.get(base + 3),
        ])
    }

    /// Writes the byte at `addr`; dropped when `addr` is out of range.
    pub fn write_byte(&mut self, addr: u32, value: u8) {
        if addr >= self.size() {
            return;
        }
        self.buf.set(addr as usize, value);
    }

    /// Writes a little-endian word at `addr`; dropped when `addr + 3 >= size`.
    pub fn write_word(&mut self, addr: u32, value: u32) {
        if u64::from(addr) + 3 >= u64::from(self.size()) {
            return;
        }
        let base = addr as usize;
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.buf.set(base + i, byte);
        }
    }

    /// Places `bytes` at `offset`. The caller guarantees the range fits.
    pub fn load(&mut self, offset: u32, bytes: &[u8]) {
        self.buf.copy_from(offset as usize, bytes);
    }

    /// Views the whole memory as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_slice()
    }
}
