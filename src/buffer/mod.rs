//! Gap buffer - the text container at the bottom of the engine
//!
//! A single mutable byte region with O(1)-amortized edits near the last edit
//! point, plus search and line utilities built on logical positions.

mod error;
mod gap;
mod lines;
mod stats;

pub use error::BufferError;
pub use gap::{GapBuffer, DEFAULT_INITIAL_CAPACITY, MIN_GAP_SIZE};
pub use stats::BufferStats;
