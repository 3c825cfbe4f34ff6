//! Errors reported by the gap buffer

/// Errors that can occur when reading or mutating a [`GapBuffer`](super::GapBuffer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Position lies past the end of the text
    InvalidPosition { position: usize, len: usize },
    /// Range is reversed or reaches past `limit` (text length or destination size)
    OutOfBounds {
        start: usize,
        end: usize,
        limit: usize,
    },
    /// Backing region could not be allocated
    AllocationFailed { requested: usize },
    /// Buffer rejects mutation
    ReadOnly,
    /// Operation needs at least one byte of text
    Empty,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPosition { position, len } => {
                write!(f, "invalid position {} (text length {})", position, len)
            }
            Self::OutOfBounds { start, end, limit } => {
                write!(f, "range {}..{} out of bounds (limit {})", start, end, limit)
            }
            Self::AllocationFailed { requested } => {
                write!(f, "failed to allocate {} bytes", requested)
            }
            Self::ReadOnly => write!(f, "buffer is read-only"),
            Self::Empty => write!(f, "buffer is empty"),
        }
    }
}

impl std::error::Error for BufferError {}
