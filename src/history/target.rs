//! The seam between the change tracker and the text it replays into

use crate::buffer::{BufferError, GapBuffer};

/// Anything the tracker can replay operations against.
///
/// Only the position/range contract is needed: insert bytes at a logical
/// position and delete a logical range.
pub trait EditTarget {
    type Error: std::fmt::Display;

    fn insert_at(&mut self, pos: usize, bytes: &[u8]) -> Result<(), Self::Error>;

    fn delete_span(&mut self, start: usize, end: usize) -> Result<(), Self::Error>;
}

impl EditTarget for GapBuffer {
    type Error = BufferError;

    fn insert_at(&mut self, pos: usize, bytes: &[u8]) -> Result<(), BufferError> {
        self.insert_bytes(pos, bytes)
    }

    fn delete_span(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        self.delete_range(start, end)
    }
}
