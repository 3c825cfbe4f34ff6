//! Recorded edits and the sequences that group them

use serde::Serialize;
use std::time::Instant;

use super::target::EditTarget;

/// Kind of a recorded edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Delete,
    Replace,
}

/// Text payload of a recorded edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// `text` was inserted at the operation's position
    Insert { text: Vec<u8> },
    /// `text` was removed starting at the operation's position
    Delete { text: Vec<u8> },
    /// `deleted` was replaced by `inserted` at the operation's position
    Replace { deleted: Vec<u8>, inserted: Vec<u8> },
}

/// One atomic edit record
#[derive(Debug, Clone)]
pub struct ChangeOperation {
    /// Monotonically increasing per tracker
    pub id: u64,
    /// Logical position the edit starts at
    pub position: usize,
    pub edit: Edit,
    pub cursor_before: usize,
    pub cursor_after: usize,
    pub timestamp: Instant,
}

impl ChangeOperation {
    pub fn kind(&self) -> OperationKind {
        match self.edit {
            Edit::Insert { .. } => OperationKind::Insert,
            Edit::Delete { .. } => OperationKind::Delete,
            Edit::Replace { .. } => OperationKind::Replace,
        }
    }

    /// Text the edit left in the buffer (inserted text; empty for deletes)
    pub fn inserted_text(&self) -> &[u8] {
        match &self.edit {
            Edit::Insert { text } => text,
            Edit::Delete { .. } => &[],
            Edit::Replace { inserted, .. } => inserted,
        }
    }

    /// Text the edit took out of the buffer (empty for inserts)
    pub fn deleted_text(&self) -> &[u8] {
        match &self.edit {
            Edit::Insert { .. } => &[],
            Edit::Delete { text } => text,
            Edit::Replace { deleted, .. } => deleted,
        }
    }

    /// Bytes of recorded text held by this operation
    pub fn memory_cost(&self) -> usize {
        self.inserted_text().len() + self.deleted_text().len()
    }

    /// Undo this edit against `target`
    pub(super) fn revert<T: EditTarget + ?Sized>(&self, target: &mut T) -> Result<(), T::Error> {
        let pos = self.position;
        match &self.edit {
            Edit::Insert { text } => target.delete_span(pos, pos + text.len()),
            Edit::Delete { text } => target.insert_at(pos, text),
            Edit::Replace { deleted, inserted } => {
                target.delete_span(pos, pos + inserted.len())?;
                target.insert_at(pos, deleted)
            }
        }
    }

    /// Re-apply this edit against `target`
    pub(super) fn apply<T: EditTarget + ?Sized>(&self, target: &mut T) -> Result<(), T::Error> {
        let pos = self.position;
        match &self.edit {
            Edit::Insert { text } => target.insert_at(pos, text),
            Edit::Delete { text } => target.delete_span(pos, pos + text.len()),
            Edit::Replace { deleted, inserted } => {
                target.delete_span(pos, pos + deleted.len())?;
                target.insert_at(pos, inserted)
            }
        }
    }
}

/// A committed group of operations, undone and redone as one step.
///
/// The operations themselves live in the tracker's arena; a sequence only
/// remembers which slice of it belongs to it.
#[derive(Debug, Clone)]
pub struct ChangeSequence {
    pub id: u64,
    pub(super) start: usize,
    pub(super) end: usize,
    pub started_at: Instant,
    pub ended_at: Instant,
}

impl ChangeSequence {
    pub fn operation_count(&self) -> usize {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(position: usize, edit: Edit) -> ChangeOperation {
        ChangeOperation {
            id: 1,
            position,
            edit,
            cursor_before: 0,
            cursor_after: 0,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_kind_and_texts() {
        let replace = op(
            2,
            Edit::Replace {
                deleted: b"old".to_vec(),
                inserted: b"new!".to_vec(),
            },
        );
        assert_eq!(replace.kind(), OperationKind::Replace);
        assert_eq!(replace.deleted_text(), b"old");
        assert_eq!(replace.inserted_text(), b"new!");
        assert_eq!(replace.memory_cost(), 7);

        let insert = op(0, Edit::Insert { text: b"ab".to_vec() });
        assert_eq!(insert.kind(), OperationKind::Insert);
        assert!(insert.deleted_text().is_empty());
    }

    #[test]
    fn test_replace_revert_and_apply() {
        let mut buf = crate::buffer::GapBuffer::from_text("say new! now").unwrap();
        let replace = op(
            4,
            Edit::Replace {
                deleted: b"old".to_vec(),
                inserted: b"new!".to_vec(),
            },
        );
        replace.revert(&mut buf).unwrap();
        assert_eq!(buf.to_string(), "say old now");
        replace.apply(&mut buf).unwrap();
        assert_eq!(buf.to_string(), "say new! now");
    }
}
