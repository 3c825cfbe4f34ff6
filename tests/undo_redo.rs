//! Undo/redo integration tests
//!
//! Drives a gap buffer and its change tracker the way an editor would:
//! mutate, record, then undo and redo whole sequences.

mod common;

use common::{commit_insert, erase, long_window, short_window, text, type_at};
use gapstore::config::HistoryConfig;
use gapstore::history::{ChangeTracker, HistoryError, OperationKind, TrackerState};
use gapstore::GapBuffer;
use std::time::Duration;

// ========================================================================
// Basic scenarios
// ========================================================================

#[test]
fn test_hello_world_undo_redo() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    commit_insert(&mut buf, &mut tracker, 0, "hello");
    commit_insert(&mut buf, &mut tracker, 5, " world");
    assert_eq!(text(&buf), "hello world");

    assert_eq!(tracker.undo(&mut buf), Ok(5));
    assert_eq!(text(&buf), "hello");
    assert_eq!(tracker.undo(&mut buf), Ok(0));
    assert_eq!(text(&buf), "");
    assert_eq!(tracker.undo(&mut buf), Err(HistoryError::NoUndo));

    assert_eq!(tracker.redo(&mut buf), Ok(5));
    assert_eq!(tracker.redo(&mut buf), Ok(11));
    assert_eq!(text(&buf), "hello world");
    assert_eq!(tracker.redo(&mut buf), Err(HistoryError::NoRedo));

    tracker.undo(&mut buf).unwrap();
    assert!(tracker.can_redo());
    erase(&mut buf, &mut tracker, 0, 5);
    assert_eq!(text(&buf), "");
    assert!(!tracker.can_redo());
}

#[test]
fn test_new_edit_discards_redo_history() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    commit_insert(&mut buf, &mut tracker, 0, "a");
    commit_insert(&mut buf, &mut tracker, 1, "b");
    commit_insert(&mut buf, &mut tracker, 2, "c");
    tracker.undo(&mut buf).unwrap();
    tracker.undo(&mut buf).unwrap();
    assert_eq!(tracker.redo_count(), 2);

    commit_insert(&mut buf, &mut tracker, 1, "z");
    assert_eq!(text(&buf), "az");
    assert_eq!(tracker.redo_count(), 0);
    assert_eq!(tracker.sequence_count(), 2);
    assert_eq!(tracker.redo(&mut buf), Err(HistoryError::NoRedo));
}

#[test]
fn test_undo_all_then_redo_all_round_trip() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    commit_insert(&mut buf, &mut tracker, 0, "fn main() {}\n");
    commit_insert(&mut buf, &mut tracker, 11, "\n    run();\n");
    tracker.begin_sequence().unwrap();
    erase(&mut buf, &mut tracker, 0, 3);
    type_at(&mut buf, &mut tracker, 0, "pub fn ");
    tracker.end_sequence().unwrap();
    let final_text = text(&buf);

    let mut snapshots = vec![final_text.clone()];
    while tracker.can_undo() {
        tracker.undo(&mut buf).unwrap();
        snapshots.push(text(&buf));
    }
    assert_eq!(text(&buf), "");

    snapshots.pop();
    while tracker.can_redo() {
        tracker.redo(&mut buf).unwrap();
        assert_eq!(Some(text(&buf)), snapshots.pop());
    }
    assert_eq!(text(&buf), final_text);
}

// ========================================================================
// Grouping
// ========================================================================

#[test]
fn test_explicit_sequence_undoes_as_one_step() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    tracker.begin_sequence().unwrap();
    for (i, ch) in "word".chars().enumerate() {
        type_at(&mut buf, &mut tracker, i, &ch.to_string());
    }
    tracker.end_sequence().unwrap();

    assert_eq!(tracker.undo_count(), 1);
    assert_eq!(tracker.operation_count(), 4);
    assert_eq!(tracker.undo(&mut buf), Ok(0));
    assert!(buf.is_empty());
}

#[test]
fn test_typing_within_window_coalesces() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    type_at(&mut buf, &mut tracker, 0, "a");
    type_at(&mut buf, &mut tracker, 1, "b");
    type_at(&mut buf, &mut tracker, 2, "c");
    assert_eq!(tracker.state(), TrackerState::Recording);
    assert_eq!(tracker.pending_operation_count(), 3);

    // Undo commits the open sequence, then reverts all of it
    assert_eq!(tracker.undo(&mut buf), Ok(0));
    assert_eq!(text(&buf), "");
    assert_eq!(tracker.redo_count(), 1);
}

#[test]
fn test_typing_across_window_splits_sequences() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(short_window());

    type_at(&mut buf, &mut tracker, 0, "a");
    std::thread::sleep(Duration::from_millis(10));
    type_at(&mut buf, &mut tracker, 1, "b");
    tracker.end_sequence().unwrap();

    assert_eq!(tracker.undo_count(), 2);
    tracker.undo(&mut buf).unwrap();
    assert_eq!(text(&buf), "a");
}

#[test]
fn test_replace_is_one_operation() {
    let mut buf = GapBuffer::from_text("let x = 1;").unwrap();
    let mut tracker = ChangeTracker::new(long_window());

    let old = buf.get_substring(4, 5).unwrap();
    buf.delete_range(4, 5).unwrap();
    buf.insert_str(4, "count").unwrap();
    tracker.record_replace(4, &old, b"count", 5, 9).unwrap();
    tracker.end_sequence().unwrap();
    assert_eq!(text(&buf), "let count = 1;");

    let seq = tracker.current_sequence().unwrap();
    let ops = tracker.operations_of(seq);
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind(), OperationKind::Replace);

    assert_eq!(tracker.undo(&mut buf), Ok(5));
    assert_eq!(text(&buf), "let x = 1;");
    assert_eq!(tracker.redo(&mut buf), Ok(9));
    assert_eq!(text(&buf), "let count = 1;");
}

// ========================================================================
// Limits
// ========================================================================

#[test]
fn test_max_sequences_evicts_oldest() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(HistoryConfig {
        max_sequences: 3,
        ..long_window()
    });

    for (i, s) in ["1", "2", "3", "4", "5"].iter().enumerate() {
        commit_insert(&mut buf, &mut tracker, i, s);
    }
    assert_eq!(tracker.sequence_count(), 3);

    while tracker.can_undo() {
        tracker.undo(&mut buf).unwrap();
    }
    // The two oldest insertions are no longer undoable
    assert_eq!(text(&buf), "12");
}

#[test]
fn test_max_memory_keeps_current_sequence() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(HistoryConfig {
        max_memory: 8,
        ..long_window()
    });

    commit_insert(&mut buf, &mut tracker, 0, "four");
    commit_insert(&mut buf, &mut tracker, 4, "0123456789");
    // Over budget, but the newest sequence is never evicted
    assert_eq!(tracker.sequence_count(), 1);
    assert_eq!(tracker.memory_usage(), 10);

    tracker.undo(&mut buf).unwrap();
    assert_eq!(text(&buf), "four");
}

// ========================================================================
// Failure and control
// ========================================================================

#[test]
fn test_stale_history_reports_invalid_state() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    commit_insert(&mut buf, &mut tracker, 0, "some text");
    // Edit behind the tracker's back so the recorded span no longer exists
    buf.clear().unwrap();

    let err = tracker.undo(&mut buf).unwrap_err();
    assert!(matches!(err, HistoryError::InvalidState { .. }));
    assert_eq!(tracker.state(), TrackerState::Idle);
    assert_eq!(tracker.undo_count(), 1);
}

#[test]
fn test_disabled_tracker_ignores_edits() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    tracker.set_enabled(false);
    type_at(&mut buf, &mut tracker, 0, "untracked");
    tracker.set_enabled(true);

    assert!(!tracker.can_undo());
    assert_eq!(tracker.undo(&mut buf), Err(HistoryError::NoUndo));
    assert_eq!(text(&buf), "untracked");
}

#[test]
fn test_clear_forgets_history_but_keeps_text() {
    let mut buf = GapBuffer::new();
    let mut tracker = ChangeTracker::new(long_window());

    commit_insert(&mut buf, &mut tracker, 0, "kept");
    tracker.clear();
    assert_eq!(tracker.sequence_count(), 0);
    assert_eq!(tracker.memory_usage(), 0);
    assert!(!tracker.can_undo());
    assert_eq!(text(&buf), "kept");
}
