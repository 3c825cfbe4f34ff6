//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use gapstore::config::{EngineConfig, HistoryConfig};
use gapstore::{ChangeTracker, GapBuffer};

/// History config whose coalescing window never expires during a test
pub fn long_window() -> HistoryConfig {
    HistoryConfig {
        sequence_timeout_ms: 60_000,
        ..HistoryConfig::default()
    }
}

/// History config whose coalescing window expires almost immediately
pub fn short_window() -> HistoryConfig {
    HistoryConfig {
        sequence_timeout_ms: 1,
        ..HistoryConfig::default()
    }
}

pub fn engine_config(max_buffers: usize, max_scratch_buffers: usize) -> EngineConfig {
    EngineConfig {
        max_buffers,
        max_scratch_buffers,
        ..EngineConfig::default()
    }
}

/// Buffer contents as a String
pub fn text(buffer: &GapBuffer) -> String {
    String::from_utf8(buffer.contents()).unwrap()
}

/// Insert `s` at `pos` and record it, as an editor would on typing
pub fn type_at(buffer: &mut GapBuffer, tracker: &mut ChangeTracker, pos: usize, s: &str) {
    buffer.insert_str(pos, s).unwrap();
    tracker
        .record_insert(pos, s.as_bytes(), pos, pos + s.len())
        .unwrap();
}

/// Erase `[start, end)` and record it
pub fn erase(buffer: &mut GapBuffer, tracker: &mut ChangeTracker, start: usize, end: usize) {
    let removed = buffer.get_substring(start, end).unwrap();
    buffer.delete_range(start, end).unwrap();
    tracker.record_delete(start, &removed, end, start).unwrap();
}

/// Insert `s` at `pos` as its own undo step
pub fn commit_insert(buffer: &mut GapBuffer, tracker: &mut ChangeTracker, pos: usize, s: &str) {
    tracker.begin_sequence().unwrap();
    type_at(buffer, tracker, pos, s);
    tracker.end_sequence().unwrap();
}

/// Small deterministic generator for randomized edit sequences
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Uniform-ish value in `0..bound` (bound must be non-zero)
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_u64() % bound as u64) as usize
    }
}
