//! Diagnostic counters kept by every gap buffer
//!
//! None of these values affect correctness; they exist so hosts can see how a
//! buffer is being used (how often the gap travels, how often it grows).

use serde::Serialize;
use std::time::{Duration, Instant};

/// Usage counters for a single gap buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BufferStats {
    /// Successful insert calls
    pub insert_count: u64,
    /// Successful non-empty delete calls
    pub delete_count: u64,
    /// Gap relocations that actually moved bytes
    pub move_gap_count: u64,
    /// Time spent inside mutating operations
    pub total_op_time: Duration,
    /// Largest text length observed
    pub max_size: usize,
    /// Largest backing capacity observed
    pub max_capacity: usize,
    /// Number of region reallocations
    pub grow_count: u64,
}

impl BufferStats {
    pub(crate) fn record_time(&mut self, started: Instant) {
        self.total_op_time += started.elapsed();
    }

    /// Mean time per insert/delete, or zero before the first edit
    pub fn average_edit_time(&self) -> Duration {
        let edits = self.insert_count + self.delete_count;
        if edits == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_op_time.as_nanos() / u128::from(edits);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
