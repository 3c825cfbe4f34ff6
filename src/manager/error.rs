//! Errors reported by the buffer manager

use super::managed::BufferId;

/// Errors that can occur when creating, finding or changing managed buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// No buffer with this id
    BufferNotFound(BufferId),
    /// No buffer with this name
    NameNotFound(String),
    /// Another buffer already uses this name
    BufferExists(String),
    /// Names must be non-empty
    InvalidName,
    /// A buffer cap was reached
    MaxBuffers { limit: usize },
    /// Storage for a new buffer could not be allocated
    AllocationFailed { requested: usize },
}

impl ManagerError {
    /// True for both lookup failures (by id or by name)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BufferNotFound(_) | Self::NameNotFound(_))
    }
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BufferNotFound(id) => write!(f, "buffer {} not found", id.0),
            Self::NameNotFound(name) => write!(f, "buffer '{}' not found", name),
            Self::BufferExists(name) => write!(f, "buffer '{}' already exists", name),
            Self::InvalidName => write!(f, "buffer name must not be empty"),
            Self::MaxBuffers { limit } => write!(f, "buffer limit of {} reached", limit),
            Self::AllocationFailed { requested } => {
                write!(f, "failed to allocate {} bytes for buffer", requested)
            }
        }
    }
}

impl std::error::Error for ManagerError {}
