//! Program Image Loader.
//!
//! A program image is a flat byte array: the first little-endian word is
//! the initial program counter and the rest is code followed by data. The
//! loader only reads the bytes; placement, register initialization, and
//! the fits-in-memory check happen in [`Machine::new`](crate::Machine::new)
//! so in-memory images (tests) and on-disk images (CLI) share one path.

use std::fs;
use std::path::Path;

use crate::common::error::LoadError;

/// Reads a program image from disk.
pub fn load_program(path: &Path) -> Result<Vec<u8>, LoadError> {
    Ok(fs::read(path)?)
}
