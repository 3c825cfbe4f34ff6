//! Errors reported by the change tracker

/// Errors that can occur while recording or replaying history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Nothing left to undo
    NoUndo,
    /// Nothing left to redo
    NoRedo,
    /// Recorded text or history storage could not be allocated
    AllocationFailed { requested: usize },
    /// The target rejected a replayed operation (stale position, read-only, ...)
    InvalidState { operation_id: u64, reason: String },
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoUndo => write!(f, "nothing to undo"),
            Self::NoRedo => write!(f, "nothing to redo"),
            Self::AllocationFailed { requested } => {
                write!(f, "failed to allocate {} history entries", requested)
            }
            Self::InvalidState {
                operation_id,
                reason,
            } => write!(f, "replay of operation {} failed: {}", operation_id, reason),
        }
    }
}

impl std::error::Error for HistoryError {}
