//! State dump for diagnostics
//!
//! Serializes a snapshot of the buffer manager to JSON: every buffer's
//! geometry, flags, history depth and usage counters.

use serde::Serialize;
use std::time::Instant;

use crate::buffer::BufferStats;
use crate::config::EngineConfig;
use crate::manager::{BufferFlags, BufferManager, ManagedBuffer};

#[derive(Debug, Serialize)]
pub struct ManagerDump {
    pub current: Option<u64>,
    pub buffer_count: usize,
    pub scratch_count: usize,
    pub config: EngineConfig,
    pub buffers: Vec<BufferDump>,
}

#[derive(Debug, Serialize)]
pub struct BufferDump {
    pub id: u64,
    pub name: Option<String>,
    pub display_name: String,
    pub flags: Vec<&'static str>,
    pub len: usize,
    pub capacity: usize,
    pub gap_position: usize,
    pub gap_len: usize,
    pub line_count: usize,
    pub access_count: u64,
    pub idle_ms: u64,
    pub history: HistoryDump,
    pub stats: BufferStats,
}

#[derive(Debug, Serialize)]
pub struct HistoryDump {
    pub undo_count: usize,
    pub redo_count: usize,
    pub operation_count: usize,
    pub pending_operations: usize,
    pub memory_bytes: usize,
}

fn flag_names(flags: BufferFlags) -> Vec<&'static str> {
    flags.iter_names().map(|(name, _)| name).collect()
}

impl ManagerDump {
    pub fn capture(manager: &BufferManager) -> Self {
        Self {
            current: manager.current_id().map(|id| id.0),
            buffer_count: manager.buffer_count(),
            scratch_count: manager.scratch_count(),
            config: manager.config().clone(),
            buffers: manager.iter().map(BufferDump::from_managed).collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

impl BufferDump {
    fn from_managed(managed: &ManagedBuffer) -> Self {
        let buffer = managed.buffer();
        let tracker = managed.tracker();
        Self {
            id: managed.id().0,
            name: managed.name().map(str::to_string),
            display_name: managed.display_name(),
            flags: flag_names(managed.flags()),
            len: buffer.len(),
            capacity: buffer.capacity(),
            gap_position: buffer.gap_position(),
            gap_len: buffer.gap_len(),
            line_count: buffer.line_count(),
            access_count: managed.access_count(),
            idle_ms: u64::try_from(managed.idle_for(Instant::now()).as_millis())
                .unwrap_or(u64::MAX),
            history: HistoryDump {
                undo_count: tracker.undo_count(),
                redo_count: tracker.redo_count(),
                operation_count: tracker.operation_count(),
                pending_operations: tracker.pending_operation_count(),
                memory_bytes: tracker.memory_usage(),
            },
            stats: buffer.stats().clone(),
        }
    }
}
