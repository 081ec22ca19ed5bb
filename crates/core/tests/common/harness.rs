//! Machine test harness.
//!
//! `MachineBuilder` assembles a program image, scripts console input, and
//! captures console output through a shared buffer, yielding a ready
//! [`Machine`] plus a handle to everything it prints.

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use emu4380_core::{CacheMode, Console, EmuConfig, Machine};

/// Default entry point used by [`MachineBuilder::program`]: code starts
/// immediately after the 4-byte entry word.
pub const CODE_START: u32 = 4;

/// Cloneable byte sink capturing everything a program prints.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A built machine and the handle to its captured output.
pub struct TestMachine {
    pub machine: Machine,
    pub output: SharedOutput,
}

/// Builder for machines under test.
pub struct MachineBuilder {
    mem_size: u32,
    cache: CacheMode,
    image: Vec<u8>,
    input: Vec<u8>,
}

impl MachineBuilder {
    pub fn new() -> Self {
        Self {
            mem_size: 131_072,
            cache: CacheMode::Off,
            image: Vec::new(),
            input: Vec::new(),
        }
    }

    pub fn mem_size(mut self, size: u32) -> Self {
        self.mem_size = size;
        self
    }

    pub fn cache(mut self, mode: CacheMode) -> Self {
        self.cache = mode;
        self
    }

    /// Uses `image` verbatim as the program image.
    pub fn image(mut self, image: Vec<u8>) -> Self {
        self.image = image;
        self
    }

    /// Builds an image with entry point [`CODE_START`] and the given
    /// instructions laid out back to back.
    pub fn program(mut self, instructions: &[[u8; 8]]) -> Self {
        let mut image = CODE_START.to_le_bytes().to_vec();
        for instruction in instructions {
            image.extend_from_slice(instruction);
        }
        self.image = image;
        self
    }

    /// Appends raw data bytes after whatever the image already holds and
    /// returns the address the data landed at.
    pub fn data(mut self, bytes: &[u8]) -> (Self, u32) {
        let addr = self.image.len() as u32;
        self.image.extend_from_slice(bytes);
        (self, addr)
    }

    /// Scripts the program's standard input.
    pub fn input(mut self, text: &str) -> Self {
        self.input = text.as_bytes().to_vec();
        self
    }

    pub fn build(self) -> TestMachine {
        let _ = env_logger::builder().is_test(true).try_init();

        let output = SharedOutput::default();
        let console = Console::new(
            Box::new(Cursor::new(self.input)),
            Box::new(output.clone()),
        );
        let config = EmuConfig {
            mem_size: self.mem_size,
            cache: self.cache,
        };
        let machine = Machine::new(&config, &self.image, console).expect("machine construction");
        TestMachine { machine, output }
    }
}

impl Default for MachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
