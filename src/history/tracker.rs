//! Change tracker - transactional undo/redo for one buffer
//!
//! Operations are recorded into an open (pending) sequence. Closing the
//! sequence commits it to a linear history; committing after an undo throws
//! away everything that was still redoable.
//!
//! History layout: `sequences[..applied]` can be undone, `sequences[applied..]`
//! can be redone. All committed operations sit in one arena in history order,
//! so dropping the oldest sequences or the redo tail is a single slice drain.

use std::time::Instant;

use super::error::HistoryError;
use super::operation::{ChangeOperation, ChangeSequence, Edit};
use super::target::EditTarget;
use crate::config::HistoryConfig;

/// What the tracker is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No sequence open
    Idle,
    /// A sequence is open and accepting operations
    Recording,
    /// An undo or redo is replaying; recording is suspended
    Replaying,
}

/// A sequence still being built
#[derive(Debug, Clone)]
struct PendingSequence {
    id: u64,
    started_at: Instant,
    operations: Vec<ChangeOperation>,
}

fn copy_text(text: &[u8]) -> Result<Vec<u8>, HistoryError> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(text.len())
        .map_err(|_| HistoryError::AllocationFailed {
            requested: text.len(),
        })?;
    copy.extend_from_slice(text);
    Ok(copy)
}

/// Undo/redo history for one buffer
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    sequences: Vec<ChangeSequence>,
    /// Operation arena; each sequence owns `operations[start..end]`
    operations: Vec<ChangeOperation>,
    /// Number of undoable sequences; `applied - 1` is the current sequence
    applied: usize,
    pending: Option<PendingSequence>,
    state: TrackerState,
    enabled: bool,
    /// Recorded text bytes held by committed sequences
    memory_usage: usize,
    next_operation_id: u64,
    next_sequence_id: u64,
    config: HistoryConfig,
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl ChangeTracker {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            sequences: Vec::new(),
            operations: Vec::new(),
            applied: 0,
            pending: None,
            state: TrackerState::Idle,
            enabled: true,
            memory_usage: 0,
            next_operation_id: 1,
            next_sequence_id: 1,
            config,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Suspend or resume recording. While disabled, `record_*` calls are ignored.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// Open a new sequence, closing any sequence that is still open
    pub fn begin_sequence(&mut self) -> Result<(), HistoryError> {
        if self.pending.is_some() {
            self.end_sequence()?;
        }
        self.open_sequence(Instant::now());
        Ok(())
    }

    fn open_sequence(&mut self, now: Instant) {
        let id = self.next_sequence_id;
        self.next_sequence_id += 1;
        self.pending = Some(PendingSequence {
            id,
            started_at: now,
            operations: Vec::new(),
        });
        self.state = TrackerState::Recording;
        tracing::trace!(sequence = id, "sequence opened");
    }

    /// Close the open sequence and commit it to history.
    ///
    /// Empty sequences are dropped. Committing discards the redo tail and
    /// then evicts the oldest sequences while the limits are exceeded.
    pub fn end_sequence(&mut self) -> Result<(), HistoryError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        self.state = TrackerState::Idle;

        if pending.operations.is_empty() {
            tracing::trace!(sequence = pending.id, "empty sequence discarded");
            return Ok(());
        }

        let count = pending.operations.len();
        if self.operations.try_reserve(count).is_err() || self.sequences.try_reserve(1).is_err() {
            // Keep the open sequence so the caller can retry or clear
            self.pending = Some(pending);
            self.state = TrackerState::Recording;
            return Err(HistoryError::AllocationFailed { requested: count });
        }

        self.discard_redo();

        let cost: usize = pending
            .operations
            .iter()
            .map(ChangeOperation::memory_cost)
            .sum();
        let start = self.operations.len();
        self.operations.extend(pending.operations);
        self.sequences.push(ChangeSequence {
            id: pending.id,
            start,
            end: self.operations.len(),
            started_at: pending.started_at,
            ended_at: Instant::now(),
        });
        self.applied = self.sequences.len();
        self.memory_usage += cost;

        tracing::debug!(
            sequence = pending.id,
            operations = count,
            bytes = cost,
            history = self.sequences.len(),
            "sequence committed"
        );

        self.enforce_limits();
        Ok(())
    }

    /// Drop every sequence after the current one
    fn discard_redo(&mut self) {
        if self.applied == self.sequences.len() {
            return;
        }
        let op_start = self.sequences[self.applied].start;
        let freed: usize = self.operations[op_start..]
            .iter()
            .map(ChangeOperation::memory_cost)
            .sum();
        let dropped = self.sequences.len() - self.applied;
        self.operations.truncate(op_start);
        self.sequences.truncate(self.applied);
        self.memory_usage -= freed;
        tracing::debug!(dropped, "redo history discarded");
    }

    /// Evict oldest-first until both limits hold; the current sequence always stays
    fn enforce_limits(&mut self) {
        let mut evict = 0;
        let mut remaining_memory = self.memory_usage;
        while self.applied - evict > 1
            && (self.sequences.len() - evict > self.config.max_sequences
                || remaining_memory > self.config.max_memory)
        {
            let seq = &self.sequences[evict];
            remaining_memory -= self.operations[seq.start..seq.end]
                .iter()
                .map(ChangeOperation::memory_cost)
                .sum::<usize>();
            evict += 1;
        }
        if evict == 0 {
            return;
        }

        let op_end = self.sequences[evict - 1].end;
        self.operations.drain(..op_end);
        self.sequences.drain(..evict);
        for seq in &mut self.sequences {
            seq.start -= op_end;
            seq.end -= op_end;
        }
        self.applied -= evict;
        self.memory_usage = remaining_memory;

        tracing::debug!(
            evicted = evict,
            history = self.sequences.len(),
            bytes = self.memory_usage,
            "oldest sequences evicted"
        );
    }

    /// Make sure an open sequence exists and is still inside the coalescing window
    fn prepare_recording(&mut self) -> Result<(), HistoryError> {
        let now = Instant::now();
        let expired = match &self.pending {
            Some(pending) => {
                now.duration_since(pending.started_at) > self.config.sequence_timeout()
            }
            None => {
                self.open_sequence(now);
                return Ok(());
            }
        };
        if expired {
            self.end_sequence()?;
            self.open_sequence(now);
        }
        Ok(())
    }

    fn record(
        &mut self,
        position: usize,
        edit: Edit,
        cursor_before: usize,
        cursor_after: usize,
    ) -> Result<(), HistoryError> {
        self.prepare_recording()?;
        let Some(pending) = self.pending.as_mut() else {
            return Ok(());
        };
        pending
            .operations
            .try_reserve(1)
            .map_err(|_| HistoryError::AllocationFailed { requested: 1 })?;

        let id = self.next_operation_id;
        self.next_operation_id += 1;
        tracing::trace!(operation = id, position, sequence = pending.id, "operation recorded");
        pending.operations.push(ChangeOperation {
            id,
            position,
            edit,
            cursor_before,
            cursor_after,
            timestamp: Instant::now(),
        });
        Ok(())
    }

    fn is_recording_allowed(&self) -> bool {
        self.enabled && self.state != TrackerState::Replaying
    }

    /// Record that `text` was (or is about to be) inserted at `position`
    pub fn record_insert(
        &mut self,
        position: usize,
        text: &[u8],
        cursor_before: usize,
        cursor_after: usize,
    ) -> Result<(), HistoryError> {
        if !self.is_recording_allowed() {
            return Ok(());
        }
        let text = copy_text(text)?;
        self.record(position, Edit::Insert { text }, cursor_before, cursor_after)
    }

    /// Record that `text` was (or is about to be) removed starting at `position`
    pub fn record_delete(
        &mut self,
        position: usize,
        text: &[u8],
        cursor_before: usize,
        cursor_after: usize,
    ) -> Result<(), HistoryError> {
        if !self.is_recording_allowed() {
            return Ok(());
        }
        let text = copy_text(text)?;
        self.record(position, Edit::Delete { text }, cursor_before, cursor_after)
    }

    /// Record that `deleted` at `position` was replaced by `inserted`
    pub fn record_replace(
        &mut self,
        position: usize,
        deleted: &[u8],
        inserted: &[u8],
        cursor_before: usize,
        cursor_after: usize,
    ) -> Result<(), HistoryError> {
        if !self.is_recording_allowed() {
            return Ok(());
        }
        let deleted = copy_text(deleted)?;
        let inserted = copy_text(inserted)?;
        self.record(
            position,
            Edit::Replace { deleted, inserted },
            cursor_before,
            cursor_after,
        )
    }

    // =========================================================================
    // Replay
    // =========================================================================

    /// Undo the current sequence against `target`, returning the cursor to restore.
    ///
    /// An open sequence is committed first so it is the one undone.
    pub fn undo<T: EditTarget + ?Sized>(&mut self, target: &mut T) -> Result<usize, HistoryError> {
        self.end_sequence()?;
        if self.applied == 0 {
            return Err(HistoryError::NoUndo);
        }
        let seq = &self.sequences[self.applied - 1];
        let (seq_id, start, end) = (seq.id, seq.start, seq.end);

        self.state = TrackerState::Replaying;
        let result = self.operations[start..end]
            .iter()
            .rev()
            .try_for_each(|op| {
                op.revert(&mut *target)
                    .map_err(|e| HistoryError::InvalidState {
                        operation_id: op.id,
                        reason: e.to_string(),
                    })
            });
        self.state = TrackerState::Idle;

        if let Err(e) = result {
            tracing::warn!(sequence = seq_id, "undo aborted: {}", e);
            return Err(e);
        }
        self.applied -= 1;
        tracing::debug!(sequence = seq_id, undo_left = self.applied, "undo");
        Ok(self.operations[start].cursor_before)
    }

    /// Redo the sequence after the current one, returning the cursor to restore
    pub fn redo<T: EditTarget + ?Sized>(&mut self, target: &mut T) -> Result<usize, HistoryError> {
        self.end_sequence()?;
        if self.applied == self.sequences.len() {
            return Err(HistoryError::NoRedo);
        }
        let seq = &self.sequences[self.applied];
        let (seq_id, start, end) = (seq.id, seq.start, seq.end);

        self.state = TrackerState::Replaying;
        let result = self.operations[start..end].iter().try_for_each(|op| {
            op.apply(&mut *target).map_err(|e| HistoryError::InvalidState {
                operation_id: op.id,
                reason: e.to_string(),
            })
        });
        self.state = TrackerState::Idle;

        if let Err(e) = result {
            tracing::warn!(sequence = seq_id, "redo aborted: {}", e);
            return Err(e);
        }
        self.applied += 1;
        tracing::debug!(sequence = seq_id, redo_left = self.redo_count(), "redo");
        Ok(self.operations[end - 1].cursor_after)
    }

    /// Forget all history. The buffer itself is left alone.
    pub fn clear(&mut self) {
        self.sequences.clear();
        self.operations.clear();
        self.pending = None;
        self.applied = 0;
        self.memory_usage = 0;
        self.state = TrackerState::Idle;
        tracing::debug!("history cleared");
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn pending_len(&self) -> usize {
        self.pending.as_ref().map_or(0, |p| p.operations.len())
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0 || self.pending_len() > 0
    }

    /// False while an open sequence holds operations, since committing it drops the redo tail
    pub fn can_redo(&self) -> bool {
        self.pending_len() == 0 && self.applied < self.sequences.len()
    }

    /// Committed sequences that can be undone
    pub fn undo_count(&self) -> usize {
        self.applied
    }

    /// Committed sequences that can be redone
    pub fn redo_count(&self) -> usize {
        self.sequences.len() - self.applied
    }

    /// Committed sequences retained in history
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Committed operations retained in history
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Operations recorded into the open sequence so far
    pub fn pending_operation_count(&self) -> usize {
        self.pending_len()
    }

    /// Bytes of recorded text held by committed sequences
    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    /// The sequence the next undo would revert
    pub fn current_sequence(&self) -> Option<&ChangeSequence> {
        self.applied.checked_sub(1).map(|i| &self.sequences[i])
    }

    /// Committed sequences, oldest first
    pub fn sequences(&self) -> &[ChangeSequence] {
        &self.sequences
    }

    /// Operations belonging to a committed sequence of this tracker
    pub fn operations_of(&self, sequence: &ChangeSequence) -> &[ChangeOperation] {
        &self.operations[sequence.start..sequence.end]
    }
}
