//! Change tracking - undo/redo history built from recorded edit sequences
//!
//! The tracker only knows the [`EditTarget`] contract, never the gap buffer's
//! internals. Callers pair every buffer mutation with the matching `record_*`
//! call; the tracker never observes the buffer on its own.

mod error;
mod operation;
mod target;
mod tracker;

pub use error::HistoryError;
pub use operation::{ChangeOperation, ChangeSequence, Edit, OperationKind};
pub use target::EditTarget;
pub use tracker::{ChangeTracker, TrackerState};
