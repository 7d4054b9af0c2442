//! Inbound line framing.

use heapless::{String, Vec};

use crate::error::CommandError;

/// Receive buffer size in bytes.
pub const LINE_CAPACITY: usize = 64;

/// One complete, trimmed inbound line.
pub type Line = String<LINE_CAPACITY>;

/// Accumulates bytes until `\n`.
///
/// `\r` is dropped, surrounding whitespace is trimmed and blank lines are
/// ignored. A line that does not fit is discarded up to its terminator and
/// reported once as [`CommandError::LineTooLong`].
#[derive(Debug)]
pub struct LineBuffer {
    buf: Vec<u8, LINE_CAPACITY>,
    overflowed: bool,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Process a single incoming byte. Returns `Some` when a line is complete.
    pub fn push(&mut self, byte: u8) -> Option<Result<Line, CommandError>> {
        match byte {
            b'\r' => None,
            b'\n' => {
                if self.overflowed {
                    self.overflowed = false;
                    self.buf.clear();
                    return Some(Err(CommandError::LineTooLong));
                }
                let result = self.take();
                self.buf.clear();
                result
            }
            _ => {
                if !self.overflowed && self.buf.push(byte).is_err() {
                    self.overflowed = true;
                    self.buf.clear();
                }
                None
            }
        }
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }

    /// Bytes of the partial line held so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no partial line is held.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty() && !self.overflowed
    }

    fn take(&self) -> Option<Result<Line, CommandError>> {
        let text = match core::str::from_utf8(&self.buf) {
            Ok(text) => text.trim(),
            Err(_) => return Some(Err(CommandError::InvalidEncoding)),
        };
        if text.is_empty() {
            return None;
        }

        let mut line = Line::new();
        match line.push_str(text) {
            Ok(()) => Some(Ok(line)),
            Err(()) => Some(Err(CommandError::LineTooLong)),
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
