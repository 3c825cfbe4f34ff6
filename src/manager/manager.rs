//! Buffer manager - owns every managed buffer and tracks the current one

use std::time::{Duration, Instant};

use super::error::ManagerError;
use super::managed::{BufferId, ManagedBuffer};
use crate::buffer::{BufferError, GapBuffer};
use crate::config::EngineConfig;

/// Owns a collection of managed buffers in creation order.
///
/// Invariants: named buffers have unique names, and `current` (if set) is
/// the id of a live buffer in the collection.
#[derive(Debug, Clone)]
pub struct BufferManager {
    buffers: Vec<ManagedBuffer>,
    current: Option<BufferId>,
    next_id: u64,
    scratch_count: usize,
    config: EngineConfig,
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl BufferManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            buffers: Vec::new(),
            current: None,
            next_id: 1,
            scratch_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a new buffer ID
    fn next_buffer_id(&mut self) -> BufferId {
        let id = BufferId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: BufferId) -> Option<usize> {
        self.buffers.iter().position(|b| b.id() == id)
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.buffers.iter().position(|b| b.name() == Some(name))
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a named, persistent buffer.
    ///
    /// The new buffer only becomes current when no buffer is current yet.
    pub fn create_buffer(&mut self, name: &str) -> Result<BufferId, ManagerError> {
        if name.is_empty() {
            return Err(ManagerError::InvalidName);
        }
        if self.contains_name(name) {
            return Err(ManagerError::BufferExists(name.to_string()));
        }
        self.insert_new(Some(name.to_string()))
    }

    /// Create an unnamed scratch buffer
    pub fn create_scratch(&mut self) -> Result<BufferId, ManagerError> {
        if self.scratch_count >= self.config.max_scratch_buffers {
            return Err(ManagerError::MaxBuffers {
                limit: self.config.max_scratch_buffers,
            });
        }
        self.insert_new(None)
    }

    fn insert_new(&mut self, name: Option<String>) -> Result<BufferId, ManagerError> {
        if self.buffers.len() >= self.config.max_buffers {
            return Err(ManagerError::MaxBuffers {
                limit: self.config.max_buffers,
            });
        }

        let buffer = GapBuffer::with_capacity(self.config.initial_capacity).map_err(|e| match e {
            BufferError::AllocationFailed { requested } => {
                ManagerError::AllocationFailed { requested }
            }
            _ => ManagerError::AllocationFailed {
                requested: self.config.initial_capacity,
            },
        })?;
        self.buffers
            .try_reserve(1)
            .map_err(|_| ManagerError::AllocationFailed {
                requested: std::mem::size_of::<ManagedBuffer>(),
            })?;

        let id = self.next_buffer_id();
        let managed = ManagedBuffer::new(id, name, buffer, self.config.history.clone());
        if managed.is_scratch() {
            self.scratch_count += 1;
        }
        tracing::debug!(
            buffer = id.0,
            name = %managed.display_name(),
            total = self.buffers.len() + 1,
            "buffer created"
        );
        self.buffers.push(managed);

        if self.current.is_none() {
            self.current = Some(id);
        }
        Ok(id)
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    pub fn delete_buffer(&mut self, id: BufferId) -> Result<(), ManagerError> {
        let index = self.position(id).ok_or(ManagerError::BufferNotFound(id))?;
        self.remove_at(index);
        Ok(())
    }

    pub fn delete_buffer_by_name(&mut self, name: &str) -> Result<(), ManagerError> {
        let index = self
            .position_by_name(name)
            .ok_or_else(|| ManagerError::NameNotFound(name.to_string()))?;
        self.remove_at(index);
        Ok(())
    }

    /// Remove the buffer at `index`, handing `current` to the next neighbour,
    /// else the previous one
    fn remove_at(&mut self, index: usize) {
        let id = self.buffers[index].id();
        if self.current == Some(id) {
            let neighbour = self
                .buffers
                .get(index + 1)
                .or_else(|| index.checked_sub(1).and_then(|i| self.buffers.get(i)));
            self.current = neighbour.map(ManagedBuffer::id);
        }

        let removed = self.buffers.remove(index);
        if removed.is_scratch() {
            self.scratch_count -= 1;
        }
        tracing::debug!(
            buffer = id.0,
            name = %removed.display_name(),
            current = ?self.current.map(|c| c.0),
            "buffer deleted"
        );
    }

    /// Delete every scratch buffer that has not been accessed for longer than `max_age`.
    ///
    /// Returns the number of buffers removed.
    pub fn cleanup_scratch_buffers(&mut self, max_age: Duration) -> usize {
        let now = Instant::now();
        let stale: Vec<BufferId> = self
            .buffers
            .iter()
            .filter(|b| b.is_scratch() && b.idle_for(now) > max_age)
            .map(ManagedBuffer::id)
            .collect();

        for id in &stale {
            if let Some(index) = self.position(*id) {
                self.remove_at(index);
            }
        }
        if !stale.is_empty() {
            tracing::debug!(removed = stale.len(), "scratch buffers cleaned up");
        }
        stale.len()
    }

    // =========================================================================
    // Switching and renaming
    // =========================================================================

    /// Make `id` current and record the access
    pub fn switch_to_buffer(&mut self, id: BufferId) -> Result<(), ManagerError> {
        let index = self.position(id).ok_or(ManagerError::BufferNotFound(id))?;
        self.switch_to_index(index);
        Ok(())
    }

    pub fn switch_to_buffer_by_name(&mut self, name: &str) -> Result<BufferId, ManagerError> {
        let index = self
            .position_by_name(name)
            .ok_or_else(|| ManagerError::NameNotFound(name.to_string()))?;
        Ok(self.switch_to_index(index))
    }

    fn switch_to_index(&mut self, index: usize) -> BufferId {
        let managed = &mut self.buffers[index];
        managed.touch();
        let id = managed.id();
        self.current = Some(id);
        tracing::debug!(buffer = id.0, accesses = managed.access_count(), "switched buffer");
        id
    }

    /// Rename a buffer. Renaming a scratch buffer promotes it to persistent.
    pub fn rename_buffer(&mut self, id: BufferId, new_name: &str) -> Result<(), ManagerError> {
        let index = self.position(id).ok_or(ManagerError::BufferNotFound(id))?;
        if new_name.is_empty() {
            return Err(ManagerError::InvalidName);
        }
        if self
            .buffers
            .iter()
            .any(|b| b.id() != id && b.name() == Some(new_name))
        {
            return Err(ManagerError::BufferExists(new_name.to_string()));
        }

        let managed = &mut self.buffers[index];
        let was_scratch = managed.is_scratch();
        managed.set_name(new_name.to_string());
        if was_scratch {
            self.scratch_count -= 1;
        }
        tracing::debug!(buffer = id.0, name = new_name, promoted = was_scratch, "buffer renamed");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn current_id(&self) -> Option<BufferId> {
        self.current
    }

    pub fn current(&self) -> Option<&ManagedBuffer> {
        self.current.and_then(|id| self.buffer(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut ManagedBuffer> {
        let id = self.current?;
        self.buffer_mut(id)
    }

    pub fn buffer(&self, id: BufferId) -> Option<&ManagedBuffer> {
        self.buffers.iter().find(|b| b.id() == id)
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> Option<&mut ManagedBuffer> {
        self.buffers.iter_mut().find(|b| b.id() == id)
    }

    pub fn buffer_by_name(&self, name: &str) -> Option<&ManagedBuffer> {
        self.buffers.iter().find(|b| b.name() == Some(name))
    }

    pub fn buffer_by_name_mut(&mut self, name: &str) -> Option<&mut ManagedBuffer> {
        self.buffers.iter_mut().find(|b| b.name() == Some(name))
    }

    /// Ids of all buffers in creation order
    pub fn list_buffers(&self) -> Vec<BufferId> {
        self.buffers.iter().map(ManagedBuffer::id).collect()
    }

    /// All buffers in creation order
    pub fn iter(&self) -> impl Iterator<Item = &ManagedBuffer> {
        self.buffers.iter()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn scratch_count(&self) -> usize {
        self.scratch_count
    }

    pub fn named_count(&self) -> usize {
        self.buffers.len() - self.scratch_count
    }

    pub fn contains(&self, id: BufferId) -> bool {
        self.position(id).is_some()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.position_by_name(name).is_some()
    }
}
