//! Gap buffer integration tests
//!
//! Growth, gap movement across large texts, and the error contract.

mod common;

use common::text;
use gapstore::buffer::{BufferError, GapBuffer, MIN_GAP_SIZE};

// ========================================================================
// Growth
// ========================================================================

#[test]
fn test_growth_preserves_content_on_both_sides_of_gap() {
    let mut buf = GapBuffer::with_capacity(8).unwrap();
    buf.insert_str(0, "headtail").unwrap();
    // Park the gap in the middle, then force several reallocations
    for i in 0..200 {
        buf.insert_char(4 + i, b'x').unwrap();
    }
    let expected = format!("head{}tail", "x".repeat(200));
    assert_eq!(text(&buf), expected);
    assert!(buf.stats().grow_count > 0);
    assert!(buf.capacity() >= buf.len());
}

#[test]
fn test_ensure_capacity_keeps_minimum_gap() {
    let mut buf = GapBuffer::from_text("abc").unwrap();
    buf.ensure_capacity(buf.capacity() + 1).unwrap();
    assert!(buf.gap_len() >= MIN_GAP_SIZE);
    assert_eq!(text(&buf), "abc");
}

#[test]
fn test_ensure_capacity_below_current_is_noop() {
    let mut buf = GapBuffer::with_capacity(256).unwrap();
    buf.ensure_capacity(10).unwrap();
    assert_eq!(buf.capacity(), 256);
    assert_eq!(buf.stats().grow_count, 0);
}

#[test]
fn test_large_insert_in_one_call() {
    let big = "0123456789".repeat(10_000);
    let mut buf = GapBuffer::with_capacity(16).unwrap();
    buf.insert_str(0, &big).unwrap();
    assert_eq!(buf.len(), big.len());
    assert_eq!(text(&buf), big);
}

// ========================================================================
// Gap movement
// ========================================================================

#[test]
fn test_alternating_edits_at_both_ends() {
    let mut buf = GapBuffer::from_text("middle").unwrap();
    for _ in 0..50 {
        buf.insert_char(0, b'<').unwrap();
        let end = buf.len();
        buf.insert_char(end, b'>').unwrap();
    }
    let expected = format!("{}middle{}", "<".repeat(50), ">".repeat(50));
    assert_eq!(text(&buf), expected);
    assert!(buf.stats().move_gap_count > 0);
}

#[test]
fn test_move_gap_does_not_change_content() {
    let mut buf = GapBuffer::from_text("one\ntwo\nthree").unwrap();
    for pos in [0, 13, 5, 7, 2, 13, 0] {
        buf.move_gap(pos).unwrap();
        assert_eq!(buf.gap_position(), pos);
        assert_eq!(text(&buf), "one\ntwo\nthree");
    }
}

#[test]
fn test_reads_span_the_gap() {
    let mut buf = GapBuffer::from_text("abcdef").unwrap();
    buf.move_gap(3).unwrap();
    assert_eq!(buf.get_substring(1, 5).unwrap(), b"bcde");
    let (front, back) = buf.as_slices();
    assert_eq!(front, b"abc");
    assert_eq!(back, b"def");

    let mut dest = [0u8; 6];
    assert_eq!(buf.copy_contents_into(&mut dest).unwrap(), 6);
    assert_eq!(&dest, b"abcdef");
}

// ========================================================================
// Line queries on edited text
// ========================================================================

#[test]
fn test_line_queries_after_edits() {
    let mut buf = GapBuffer::from_text("alpha\ngamma").unwrap();
    buf.insert_str(6, "beta\n").unwrap();
    assert_eq!(text(&buf), "alpha\nbeta\ngamma");
    assert_eq!(buf.line_count(), 3);
    assert_eq!(buf.line_start(8).unwrap(), 6);
    assert_eq!(buf.line_end(8).unwrap(), 10);
    assert_eq!(buf.line_number(11).unwrap(), 2);
    assert_eq!(buf.find_string(0, b"gamma"), Some(11));
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_failed_operations_leave_buffer_unchanged() {
    let mut buf = GapBuffer::from_text("stable").unwrap();
    assert!(matches!(
        buf.insert_str(99, "x"),
        Err(BufferError::InvalidPosition { .. })
    ));
    assert!(matches!(
        buf.delete_range(4, 2),
        Err(BufferError::OutOfBounds { .. })
    ));
    assert!(matches!(
        buf.delete_range(0, 7),
        Err(BufferError::OutOfBounds { .. })
    ));
    assert_eq!(text(&buf), "stable");
    assert_eq!(buf.stats().insert_count, 0);
}

#[test]
fn test_read_only_blocks_mutation_but_not_reads() {
    let mut buf = GapBuffer::from_text("locked").unwrap();
    buf.clear_modified();
    buf.set_read_only(true);

    assert_eq!(buf.insert_char(0, b'x'), Err(BufferError::ReadOnly));
    assert_eq!(buf.delete_range(0, 2), Err(BufferError::ReadOnly));
    assert_eq!(buf.get_char(0), Ok(b'l'));
    assert!(!buf.is_modified());

    buf.set_read_only(false);
    buf.delete_range(0, 2).unwrap();
    assert_eq!(text(&buf), "cked");
    assert!(buf.is_modified());
}

#[test]
fn test_empty_buffer_errors() {
    let mut buf = GapBuffer::new();
    assert_eq!(buf.get_char(0), Err(BufferError::Empty));
    assert_eq!(buf.delete_char(0), Err(BufferError::Empty));
    assert_eq!(buf.line_count(), 1);
}
