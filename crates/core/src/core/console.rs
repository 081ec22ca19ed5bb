//! Console I/O Seam.
//!
//! The trap instructions read and write the standard streams. `Console`
//! boxes the two stream ends so a test can substitute in-memory buffers
//! and inspect what a program printed, while the CLI hands over the real
//! stdin/stdout.
//!
//! The integer and character readers follow formatted-extraction rules:
//! leading ASCII whitespace is skipped and one token (or one byte) is
//! consumed. Unparsable or exhausted input yields zero.

use std::io::{self, BufRead, Write};

/// Input/output stream pair for the trap instructions.
pub struct Console {
    pub(crate) input: Box<dyn BufRead>,
    pub(crate) output: Box<dyn Write>,
}

impl Console {
    /// Console over the given stream pair.
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self { input, output }
    }

    /// Console over the process standard streams.
    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdin().lock()), Box::new(io::stdout()))
    }

    /// Reads a signed decimal integer token; 0 on EOF or parse failure.
    pub(crate) fn read_int(&mut self) -> i32 {
        self.next_token().parse().unwrap_or(0)
    }

    /// Reads one non-whitespace byte; 0 on EOF.
    pub(crate) fn read_char(&mut self) -> u8 {
        self.skip_whitespace();
        match self.peek_byte() {
            Some(byte) => {
                self.input.consume(1);
                byte
            }
            None => 0,
        }
    }

    /// Reads one line as raw bytes, without the trailing newline.
    pub(crate) fn read_line_bytes(&mut self) -> Vec<u8> {
        let mut line = Vec::new();
        let _ = self.input.read_until(b'\n', &mut line);
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        line
    }

    fn next_token(&mut self) -> String {
        self.skip_whitespace();
        let mut token = String::new();
        while let Some(byte) = self.peek_byte() {
            if byte.is_ascii_whitespace() {
                break;
            }
            token.push(byte as char);
            self.input.consume(1);
        }
        token
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek_byte() {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.input.consume(1);
        }
    }

    fn peek_byte(&mut self) -> Option<u8> {
        match self.input.fill_buf() {
            Ok(buf) => buf.first().copied(),
            Err(_) => None,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
