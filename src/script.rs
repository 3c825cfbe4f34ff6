//! Edit scripts - drive the engine the way an input processor would
//!
//! A script is a YAML list of steps. Each editing step mutates the current
//! buffer and records the matching operation in its tracker, so undo/redo in
//! a script behaves exactly as it would behind an interactive editor.
//!
//! ```yaml
//! steps:
//!   - op: create
//!     name: main
//!   - op: insert
//!     pos: 0
//!     text: "hello"
//!   - op: undo
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::buffer::{BufferError, GapBuffer};
use crate::manager::{BufferManager, ManagedBuffer};

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Create a named buffer
    Create { name: String },
    /// Create a scratch buffer
    Scratch,
    /// Make the named buffer current
    Switch { name: String },
    /// Rename the current buffer
    Rename { name: String },
    /// Delete the named buffer
    Delete { name: String },
    /// Insert text into the current buffer
    Insert { pos: usize, text: String },
    /// Remove `[start, end)` from the current buffer
    Erase { start: usize, end: usize },
    /// Replace `[start, end)` of the current buffer with text
    Replace {
        start: usize,
        end: usize,
        text: String,
    },
    /// Open an undo sequence on the current buffer
    Begin,
    /// Close the open undo sequence on the current buffer
    End,
    Undo,
    Redo,
    /// Toggle read-only mode on the current buffer
    ReadOnly { enabled: bool },
    /// Delete scratch buffers idle for longer than `max_age_ms`
    Cleanup { max_age_ms: u64 },
    /// Sleep, e.g. to let a coalescing window expire
    Pause { ms: u64 },
}

/// An ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Outcome of a script run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps applied
    pub steps: usize,
    /// Cursor after the last editing step
    pub cursor: usize,
}

fn current(manager: &mut BufferManager) -> Result<&mut ManagedBuffer> {
    manager.current_mut().context("no current buffer")
}

impl Script {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("invalid edit script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Apply every step in order, stopping at the first failure
    pub fn run(&self, manager: &mut BufferManager) -> Result<RunSummary> {
        let mut cursor = 0;
        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!(step = index + 1, ?step, "applying step");
            apply(step, manager, &mut cursor)
                .with_context(|| format!("step {} ({:?}) failed", index + 1, step))?;
        }
        Ok(RunSummary {
            steps: self.steps.len(),
            cursor,
        })
    }
}

/// Point the cursor at the end of whatever buffer is current now
fn sync_cursor(manager: &BufferManager, cursor: &mut usize) {
    *cursor = manager.current().map_or(0, |b| b.buffer().len());
}

/// Replace `[start, end)` of the current buffer with `text` and record it.
///
/// Pure inserts and pure deletes are recorded as such. If recording fails the
/// buffer is put back, so no unrecorded edit survives.
fn edit(
    managed: &mut ManagedBuffer,
    cursor: &mut usize,
    start: usize,
    end: usize,
    text: &[u8],
) -> Result<()> {
    let (buffer, tracker) = managed.parts_mut();
    let removed = buffer.get_substring(start, end)?;
    buffer.delete_range(start, end)?;
    if let Err(e) = buffer.insert_bytes(start, text) {
        buffer.insert_bytes(start, &removed)?;
        return Err(e.into());
    }

    let after = start + text.len();
    let recorded = if removed.is_empty() {
        tracker.record_insert(start, text, *cursor, after)
    } else if text.is_empty() {
        tracker.record_delete(start, &removed, *cursor, start)
    } else {
        tracker.record_replace(start, &removed, text, *cursor, after)
    };
    if let Err(e) = recorded {
        restore(buffer, start, &removed, text)?;
        return Err(e.into());
    }
    *cursor = after;
    Ok(())
}

/// Undo an edit that never reached the history
fn restore(
    buffer: &mut GapBuffer,
    start: usize,
    removed: &[u8],
    inserted: &[u8],
) -> Result<(), BufferError> {
    buffer.delete_range(start, start + inserted.len())?;
    buffer.insert_bytes(start, removed)
}

fn apply(step: &Step, manager: &mut BufferManager, cursor: &mut usize) -> Result<()> {
    let before = manager.current_id();
    match step {
        Step::Create { name } => {
            manager.create_buffer(name)?;
        }
        Step::Scratch => {
            manager.create_scratch()?;
        }
        Step::Switch { name } => {
            manager.switch_to_buffer_by_name(name)?;
            sync_cursor(manager, cursor);
        }
        Step::Rename { name } => {
            let id = manager.current_id().context("no current buffer")?;
            manager.rename_buffer(id, name)?;
        }
        Step::Delete { name } => {
            manager.delete_buffer_by_name(name)?;
        }
        Step::Insert { pos, text } => {
            edit(current(manager)?, cursor, *pos, *pos, text.as_bytes())?;
        }
        Step::Erase { start, end } => edit(current(manager)?, cursor, *start, *end, &[])?,
        Step::Replace { start, end, text } => {
            edit(current(manager)?, cursor, *start, *end, text.as_bytes())?;
        }
        Step::Begin => current(manager)?.tracker_mut().begin_sequence()?,
        Step::End => current(manager)?.tracker_mut().end_sequence()?,
        Step::Undo => *cursor = current(manager)?.undo()?,
        Step::Redo => *cursor = current(manager)?.redo()?,
        Step::ReadOnly { enabled } => current(manager)?.set_read_only(*enabled),
        Step::Cleanup { max_age_ms } => {
            manager.cleanup_scratch_buffers(Duration::from_millis(*max_age_ms));
        }
        Step::Pause { ms } => std::thread::sleep(Duration::from_millis(*ms)),
    }
    // Creation, deletion and cleanup can all hand `current` to another buffer
    if manager.current_id() != before {
        sync_cursor(manager, cursor);
    }
    Ok(())
}
