//! Search and line utilities
//!
//! Everything here is expressed through logical positions only; none of it
//! knows where the gap is.
//!
//! Line boundaries: a `\n` belongs to the line it terminates. For the text
//! `"ab\ncd"` positions 0..=2 are line 0 (position 2 is the newline itself)
//! and positions 3..=5 are line 1.

use super::error::BufferError;
use super::gap::GapBuffer;

const NEWLINE: u8 = b'\n';

impl GapBuffer {
    fn check_position(&self, pos: usize) -> Result<(), BufferError> {
        let len = self.len();
        if pos > len {
            return Err(BufferError::InvalidPosition { position: pos, len });
        }
        Ok(())
    }

    /// First occurrence of `ch` at or after `from`
    pub fn find_char(&self, from: usize, ch: u8) -> Option<usize> {
        (from..self.len()).find(|&pos| self.byte_at(pos) == ch)
    }

    /// First occurrence of `needle` starting at or after `from`.
    ///
    /// An empty needle matches at `from` itself.
    pub fn find_string(&self, from: usize, needle: &[u8]) -> Option<usize> {
        let len = self.len();
        if from > len {
            return None;
        }
        if needle.is_empty() {
            return Some(from);
        }
        if needle.len() > len {
            return None;
        }
        (from..=len - needle.len()).find(|&start| {
            needle
                .iter()
                .enumerate()
                .all(|(i, &b)| self.byte_at(start + i) == b)
        })
    }

    /// Position of the first byte of the line containing `pos`
    pub fn line_start(&self, pos: usize) -> Result<usize, BufferError> {
        self.check_position(pos)?;
        let mut start = pos;
        while start > 0 && self.byte_at(start - 1) != NEWLINE {
            start -= 1;
        }
        Ok(start)
    }

    /// Position of the newline ending the line containing `pos`, or `len` on the last line.
    ///
    /// A position sitting on a newline is its own line end.
    pub fn line_end(&self, pos: usize) -> Result<usize, BufferError> {
        self.check_position(pos)?;
        Ok(self.find_char(pos, NEWLINE).unwrap_or_else(|| self.len()))
    }

    /// Number of lines; an empty buffer has one empty line
    pub fn line_count(&self) -> usize {
        self.bytes().filter(|&b| b == NEWLINE).count() + 1
    }

    /// Zero-based line number of `pos` (newlines strictly before it)
    pub fn line_number(&self, pos: usize) -> Result<usize, BufferError> {
        self.check_position(pos)?;
        Ok((0..pos).filter(|&i| self.byte_at(i) == NEWLINE).count())
    }
}
