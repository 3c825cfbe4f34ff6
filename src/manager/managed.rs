//! A gap buffer and its change tracker, with identity and lifecycle metadata

use bitflags::bitflags;
use std::time::{Duration, Instant};

use crate::buffer::GapBuffer;
use crate::config::HistoryConfig;
use crate::history::{ChangeTracker, HistoryError};

/// Unique identifier for a managed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

bitflags! {
    /// Lifecycle and state flags of a managed buffer.
    ///
    /// Exactly one of `SCRATCH` and `PERSISTENT` is set. `READ_ONLY` and
    /// `MODIFIED` mirror the underlying gap buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u8 {
        /// Unnamed, eligible for age-based cleanup
        const SCRATCH = 0b0000_0001;
        /// Named, never cleaned up automatically
        const PERSISTENT = 0b0000_0010;
        const READ_ONLY = 0b0000_0100;
        const MODIFIED = 0b0000_1000;
    }
}

/// A buffer owned by the [`BufferManager`](super::BufferManager)
#[derive(Debug, Clone)]
pub struct ManagedBuffer {
    id: BufferId,
    name: Option<String>,
    kind: BufferFlags,
    buffer: GapBuffer,
    tracker: ChangeTracker,
    created_at: Instant,
    last_access: Instant,
    access_count: u64,
}

impl ManagedBuffer {
    pub(super) fn new(
        id: BufferId,
        name: Option<String>,
        buffer: GapBuffer,
        history: HistoryConfig,
    ) -> Self {
        let kind = if name.is_some() {
            BufferFlags::PERSISTENT
        } else {
            BufferFlags::SCRATCH
        };
        let now = Instant::now();
        Self {
            id,
            name,
            kind,
            buffer,
            tracker: ChangeTracker::new(history),
            created_at: now,
            last_access: now,
            access_count: 0,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for display: the buffer name, or `*scratch-<id>*` for scratch buffers
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("*scratch-{}*", self.id.0),
        }
    }

    pub fn is_scratch(&self) -> bool {
        self.kind.contains(BufferFlags::SCRATCH)
    }

    /// Current flags, including the gap buffer's read-only and modified state
    pub fn flags(&self) -> BufferFlags {
        let mut flags = self.kind;
        flags.set(BufferFlags::READ_ONLY, self.buffer.is_read_only());
        flags.set(BufferFlags::MODIFIED, self.buffer.is_modified());
        flags
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.buffer.set_read_only(read_only);
    }

    pub fn buffer(&self) -> &GapBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut GapBuffer {
        &mut self.buffer
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ChangeTracker {
        &mut self.tracker
    }

    /// Borrow the buffer and its tracker at the same time, for record+mutate pairs
    pub fn parts_mut(&mut self) -> (&mut GapBuffer, &mut ChangeTracker) {
        (&mut self.buffer, &mut self.tracker)
    }

    /// Undo the latest sequence, returning the cursor to restore
    pub fn undo(&mut self) -> Result<usize, HistoryError> {
        self.tracker.undo(&mut self.buffer)
    }

    /// Redo the next sequence, returning the cursor to restore
    pub fn redo(&mut self) -> Result<usize, HistoryError> {
        self.tracker.redo(&mut self.buffer)
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_access(&self) -> Instant {
        self.last_access
    }

    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Time since the buffer was last switched to (or created)
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_access)
    }

    pub(super) fn touch(&mut self) {
        self.last_access = Instant::now();
        self.access_count += 1;
    }

    pub(super) fn set_name(&mut self, name: String) {
        self.name = Some(name);
        self.kind = BufferFlags::PERSISTENT;
    }
}
