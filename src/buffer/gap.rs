//! Gap buffer storage
//!
//! Text lives in one byte region split by a movable gap: `[0, gap_start)`
//! holds the text before the gap and `[gap_end, capacity)` the text after it.
//! Insertions and deletions happen at the gap, so edits near the previous edit
//! point only move the bytes between the old and new gap position.
//!
//! Positions in the public API are always logical (text) offsets. A logical
//! position `p < gap_start` lives at region index `p`; anything at or after
//! the gap lives at `p + gap_len`.

use std::time::Instant;

use super::error::BufferError;
use super::stats::BufferStats;

/// Capacity used by [`GapBuffer::new`]
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Gap size guaranteed after every growth and after seeding from text
pub const MIN_GAP_SIZE: usize = 64;

/// Geometric growth factor of 1.5, as a ratio
const GROWTH_NUMERATOR: usize = 3;
const GROWTH_DENOMINATOR: usize = 2;

/// Allocate a zeroed region, reporting failure instead of aborting
fn allocate_region(capacity: usize) -> Result<Vec<u8>, BufferError> {
    let mut region = Vec::new();
    region
        .try_reserve_exact(capacity)
        .map_err(|_| BufferError::AllocationFailed {
            requested: capacity,
        })?;
    region.resize(capacity, 0);
    Ok(region)
}

/// A byte-oriented gap buffer.
///
/// Invariant: `0 <= gap_start <= gap_end <= data.len()`.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Backing region: [pre-gap text | gap | post-gap text]
    data: Vec<u8>,
    /// First unused index of the region
    gap_start: usize,
    /// First used index after the gap
    gap_end: usize,
    read_only: bool,
    modified: bool,
    stats: BufferStats,
}

impl GapBuffer {
    /// Create an empty buffer with the default capacity.
    ///
    /// If the default region cannot be allocated the buffer starts with no
    /// capacity at all, and the first insert reports the allocation failure.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY).unwrap_or_else(|_| Self {
            data: Vec::new(),
            gap_start: 0,
            gap_end: 0,
            read_only: false,
            modified: false,
            stats: BufferStats::default(),
        })
    }

    /// Create an empty buffer whose whole region is gap
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        let data = allocate_region(capacity)?;
        Ok(Self {
            data,
            gap_start: 0,
            gap_end: capacity,
            read_only: false,
            modified: false,
            stats: BufferStats {
                max_capacity: capacity,
                ..BufferStats::default()
            },
        })
    }

    /// Create a buffer seeded with `text`, leaving [`MIN_GAP_SIZE`] bytes of gap after it
    pub fn from_text(text: &str) -> Result<Self, BufferError> {
        Self::from_bytes(text.as_bytes())
    }

    /// Byte-slice variant of [`GapBuffer::from_text`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BufferError> {
        let len = bytes.len();
        let capacity = len
            .checked_add(MIN_GAP_SIZE)
            .ok_or(BufferError::AllocationFailed { requested: len })?;
        let mut data = allocate_region(capacity)?;
        data[..len].copy_from_slice(bytes);
        Ok(Self {
            data,
            gap_start: len,
            gap_end: capacity,
            read_only: false,
            modified: false,
            stats: BufferStats {
                max_size: len,
                max_capacity: capacity,
                ..BufferStats::default()
            },
        })
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Logical text length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the backing region
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Current gap size
    #[inline]
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Logical position the gap currently sits at
    #[inline]
    pub fn gap_position(&self) -> usize {
        self.gap_start
    }

    /// Translate a logical position into a region index
    #[inline]
    fn physical(&self, pos: usize) -> usize {
        if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        }
    }

    /// Byte at a logical position already known to be `< len`
    #[inline]
    pub(super) fn byte_at(&self, pos: usize) -> u8 {
        self.data[self.physical(pos)]
    }

    /// The two live runs of text, before and after the gap
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (&self.data[..self.gap_start], &self.data[self.gap_end..])
    }

    // =========================================================================
    // Flags and statistics
    // =========================================================================

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Toggle read-only mode. Only gates later mutators.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Mark the current contents as clean
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn stats(&self) -> &BufferStats {
        &self.stats
    }

    fn check_writable(&self) -> Result<(), BufferError> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        Ok(())
    }

    // =========================================================================
    // Gap movement and growth
    // =========================================================================

    /// Move the gap so that it starts at logical position `pos`.
    ///
    /// Cost is proportional to the distance travelled, not to the buffer size.
    pub fn move_gap(&mut self, pos: usize) -> Result<(), BufferError> {
        let len = self.len();
        if pos > len {
            return Err(BufferError::InvalidPosition { position: pos, len });
        }
        let started = Instant::now();
        self.shift_gap(pos);
        self.stats.record_time(started);
        Ok(())
    }

    /// Relocate the gap; `pos` must already be validated against `len`
    fn shift_gap(&mut self, pos: usize) {
        if pos < self.gap_start {
            // [pos, gap_start) slides right into the tail of the gap
            let shift = self.gap_start - pos;
            self.data
                .copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
            self.stats.move_gap_count += 1;
        } else if pos > self.gap_start {
            // [gap_end, gap_end + shift) slides left into the head of the gap
            let shift = pos - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
            self.stats.move_gap_count += 1;
        }
    }

    /// Grow the region so it can hold at least `min_capacity` bytes.
    ///
    /// Growth is geometric (x1.5) and always leaves at least [`MIN_GAP_SIZE`]
    /// bytes of gap beyond `min_capacity`. The gap keeps its logical position.
    /// On allocation failure the buffer is left exactly as it was.
    pub fn ensure_capacity(&mut self, min_capacity: usize) -> Result<(), BufferError> {
        let old_capacity = self.data.len();
        if min_capacity <= old_capacity {
            return Ok(());
        }

        let overflow = BufferError::AllocationFailed {
            requested: min_capacity,
        };
        let grown = old_capacity
            .checked_mul(GROWTH_NUMERATOR)
            .ok_or_else(|| overflow.clone())?
            / GROWTH_DENOMINATOR;
        let padded = min_capacity
            .checked_add(MIN_GAP_SIZE)
            .ok_or(overflow)?;
        let new_capacity = grown.max(padded);
        let mut region = allocate_region(new_capacity)?;

        let tail_len = old_capacity - self.gap_end;
        let new_gap_end = new_capacity - tail_len;
        region[..self.gap_start].copy_from_slice(&self.data[..self.gap_start]);
        region[new_gap_end..].copy_from_slice(&self.data[self.gap_end..]);

        self.data = region;
        self.gap_end = new_gap_end;
        self.stats.grow_count += 1;
        self.stats.max_capacity = self.stats.max_capacity.max(new_capacity);

        tracing::trace!(
            old_capacity,
            new_capacity,
            grow_count = self.stats.grow_count,
            "gap buffer grew"
        );
        Ok(())
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert one byte at `pos`
    pub fn insert_char(&mut self, pos: usize, ch: u8) -> Result<(), BufferError> {
        self.insert_bytes(pos, &[ch])
    }

    /// Insert UTF-8 text at `pos`
    pub fn insert_str(&mut self, pos: usize, text: &str) -> Result<(), BufferError> {
        self.insert_bytes(pos, text.as_bytes())
    }

    /// Insert raw bytes at `pos` (`pos == len` appends)
    pub fn insert_bytes(&mut self, pos: usize, bytes: &[u8]) -> Result<(), BufferError> {
        let len = self.len();
        if pos > len {
            return Err(BufferError::InvalidPosition { position: pos, len });
        }
        self.check_writable()?;
        if bytes.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        if self.gap_len() < bytes.len() {
            let needed = len
                .checked_add(bytes.len())
                .ok_or(BufferError::AllocationFailed {
                    requested: bytes.len(),
                })?;
            self.ensure_capacity(needed)?;
        }
        self.shift_gap(pos);
        self.data[self.gap_start..self.gap_start + bytes.len()].copy_from_slice(bytes);
        self.gap_start += bytes.len();

        self.modified = true;
        self.stats.insert_count += 1;
        self.stats.max_size = self.stats.max_size.max(self.len());
        self.stats.record_time(started);
        Ok(())
    }

    /// Delete the byte at `pos`
    pub fn delete_char(&mut self, pos: usize) -> Result<(), BufferError> {
        if self.is_empty() {
            self.check_writable()?;
            return Err(BufferError::Empty);
        }
        self.delete_range(pos, pos + 1)
    }

    /// Delete the logical range `[start, end)`.
    ///
    /// The removed bytes are absorbed into the gap, not erased.
    pub fn delete_range(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        let len = self.len();
        if start > end || end > len {
            return Err(BufferError::OutOfBounds {
                start,
                end,
                limit: len,
            });
        }
        self.check_writable()?;
        if start == end {
            return Ok(());
        }

        let started = Instant::now();
        self.shift_gap(start);
        self.gap_end += end - start;

        self.modified = true;
        self.stats.delete_count += 1;
        self.stats.record_time(started);
        Ok(())
    }

    /// Remove all text, keeping the region
    pub fn clear(&mut self) -> Result<(), BufferError> {
        self.delete_range(0, self.len())
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Byte at logical position `pos` (`pos < len`)
    pub fn get_char(&self, pos: usize) -> Result<u8, BufferError> {
        let len = self.len();
        if len == 0 {
            return Err(BufferError::Empty);
        }
        if pos >= len {
            return Err(BufferError::InvalidPosition { position: pos, len });
        }
        Ok(self.byte_at(pos))
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), BufferError> {
        let len = self.len();
        if start > end || end > len {
            return Err(BufferError::OutOfBounds {
                start,
                end,
                limit: len,
            });
        }
        Ok(())
    }

    /// Copy `[start, end)` into `dest`, which must already be exactly `end - start` long
    fn copy_range(&self, start: usize, end: usize, dest: &mut [u8]) {
        let (front, back) = self.as_slices();
        let split = front.len();
        if end <= split {
            dest.copy_from_slice(&front[start..end]);
        } else if start >= split {
            dest.copy_from_slice(&back[start - split..end - split]);
        } else {
            let head = split - start;
            dest[..head].copy_from_slice(&front[start..]);
            dest[head..].copy_from_slice(&back[..end - split]);
        }
    }

    /// Copy of the text in `[start, end)`
    pub fn get_substring(&self, start: usize, end: usize) -> Result<Vec<u8>, BufferError> {
        self.check_range(start, end)?;
        let size = end - start;
        let mut out = Vec::new();
        out.try_reserve_exact(size)
            .map_err(|_| BufferError::AllocationFailed { requested: size })?;
        out.resize(size, 0);
        self.copy_range(start, end, &mut out);
        Ok(out)
    }

    /// Copy `[start, end)` into the front of `dest`, returning the byte count
    pub fn copy_substring_into(
        &self,
        start: usize,
        end: usize,
        dest: &mut [u8],
    ) -> Result<usize, BufferError> {
        self.check_range(start, end)?;
        let size = end - start;
        if dest.len() < size {
            return Err(BufferError::OutOfBounds {
                start: 0,
                end: size,
                limit: dest.len(),
            });
        }
        self.copy_range(start, end, &mut dest[..size]);
        Ok(size)
    }

    /// Copy of the whole text
    pub fn contents(&self) -> Vec<u8> {
        let (front, back) = self.as_slices();
        let mut out = Vec::with_capacity(front.len() + back.len());
        out.extend_from_slice(front);
        out.extend_from_slice(back);
        out
    }

    /// Copy the whole text into the front of `dest`, returning the byte count
    pub fn copy_contents_into(&self, dest: &mut [u8]) -> Result<usize, BufferError> {
        self.copy_substring_into(0, self.len(), dest)
    }

    /// Iterate over the text bytes in logical order
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let (front, back) = self.as_slices();
        front.iter().chain(back.iter()).copied()
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.contents()))
    }
}
