//! Buffer manager - named and scratch buffers with switching and reclamation
//!
//! Each managed buffer pairs one gap buffer with one change tracker. Neither
//! exists outside a managed buffer; they are created and dropped with it.

mod error;
mod managed;
#[allow(clippy::module_inception)]
mod manager;

pub use error::ManagerError;
pub use managed::{BufferFlags, BufferId, ManagedBuffer};
pub use manager::BufferManager;
