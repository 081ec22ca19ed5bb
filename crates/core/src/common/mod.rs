//! Common types and constants shared across the emulator.
//!
//! This module collects the leaf definitions every other module builds on:
//! 1. **Constants:** Block geometry, instruction width, burst costs.
//! 2. **Errors:** Pipeline faults and machine/loader/config error types.
//! 3. **Registers:** The 22-entry register file and its named indices.

/// System-wide geometry and cost constants.
pub mod constants;
/// Fault and error definitions for all failure surfaces.
pub mod error;
/// Register file and register index constants.
pub mod reg;
