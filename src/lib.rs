//! Gapstore - gap-buffer text storage with undo history
//!
//! This crate provides the storage layer of a text editor: a byte gap buffer
//! with line queries, a change tracker that groups edits into undoable
//! sequences, and a manager that owns named and scratch buffers.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod dump;
pub mod history;
pub mod manager;
pub mod script;
pub mod tracing;

// Re-export commonly used types
pub use buffer::{BufferError, GapBuffer};
pub use config::{EngineConfig, HistoryConfig};
pub use history::{ChangeTracker, EditTarget, HistoryError};
pub use manager::{BufferFlags, BufferId, BufferManager, ManagedBuffer, ManagerError};
