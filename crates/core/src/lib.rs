//! emu4380 core library.
//!
//! A cycle-accounting emulator for the emu4380 32-bit register machine:
//! 1. **Memory:** Byte-addressable zero-filled store with little-endian
//!    word access and non-fatal bounds handling.
//! 2. **Cache:** A 1 KiB write-back cache in three organizations
//!    (direct-mapped, fully associative, two-way set-associative) with LRU
//!    replacement and deterministic hit/miss/write-back timing.
//! 3. **Bus:** The facade charging either cache costs or the no-cache
//!    streaming-burst costs into the global memory-cycle counter.
//! 4. **Core:** 22-register file, fetch/decode/execute loop, trap I/O, and
//!    stack/heap discipline, all owned by a single [`Machine`] value.
//! 5. **Simulation:** Image loading and serde-backed configuration.

/// 1 KiB write-back cache engine and its three organizations.
pub mod cache;
/// Shared constants, errors, and the register file.
pub mod common;
/// Emulator configuration (memory size, cache mode).
pub mod config;
/// Instruction core: machine state, pipeline, traps, console.
pub mod core;
/// Instruction-set constants (opcodes, trap codes).
pub mod isa;
/// Memory subsystem: buffer, system memory, bus facade.
pub mod mem;
/// Simulation support: image loading.
pub mod sim;

/// Cache access outcome (hit flag and cycle components).
pub use crate::cache::AccessResult;
/// The cache engine.
pub use crate::cache::CacheModel;
/// Cache organization selector for [`CacheModel::new`].
pub use crate::cache::Organization;
/// Fatal pipeline fault with the failing instruction address.
pub use crate::common::error::Fault;
/// Machine construction errors.
pub use crate::common::error::MachineError;
/// Cache mode as configured (off or one of the three organizations).
pub use crate::config::CacheMode;
/// Root configuration type.
pub use crate::config::EmuConfig;
/// Swappable standard-stream pair for trap I/O.
pub use crate::core::console::Console;
/// The owning machine value; construct, drive with `step`/`run`, inspect.
pub use crate::core::{Machine, Step};
