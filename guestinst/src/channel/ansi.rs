//! Terminal escape sequence stripping.
//!
//! Console output from a booting guest is mostly plain text, but boot loaders
//! and installers like to redraw lines with cursor movement and colour codes.
//! Those sequences can land between the characters of a prompt, so they are
//! removed before any matching happens.

use vte::{Parser, Perform};

/// Streaming ANSI stripper.
///
/// Keeps parser state between calls, so a sequence split across two reads is
/// still removed.
pub struct AnsiStripper {
    parser: Parser,
}

impl AnsiStripper {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Strip escape sequences from `data`, appending the plain text to `out`.
    pub fn strip_into(&mut self, data: &[u8], out: &mut Vec<u8>) {
        let mut sink = PlainText { out };
        self.parser.advance(&mut sink, data);
    }

    /// Strip escape sequences from `data`.
    pub fn strip(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        self.strip_into(data, &mut out);
        out
    }
}

impl Default for AnsiStripper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnsiStripper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsiStripper").finish_non_exhaustive()
    }
}

/// Collects printable characters and the few control bytes prompts rely on.
struct PlainText<'a> {
    out: &'a mut Vec<u8>,
}

impl Perform for PlainText<'_> {
    fn print(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        // newline, carriage return, tab, backspace
        if matches!(byte, b'\n' | b'\r' | b'\t' | 0x08) {
            self.out.push(byte);
        }
    }
}
