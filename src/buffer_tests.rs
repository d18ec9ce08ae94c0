use super::*;
use crate::region::RegionKind;
use crate::source::MemSource;

fn buf(data: &[u8]) -> EditorBuffer {
    EditorBuffer::new("scratch", Box::new(MemSource::new(data.to_vec())))
}

fn read_view(b: &EditorBuffer) -> Vec<u8> {
    let mut seeker = b.read_seeker().unwrap();
    let mut out = Vec::new();
    seeker.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn fresh_buffer_is_not_dirty_and_matches_source() {
    let b = buf(b"abc");
    assert!(!b.is_dirty());
    assert_eq!(read_view(&b), b"abc");
    assert_eq!(b.size().unwrap(), 3);
}

#[test]
fn preview_is_visible_but_not_on_undo_stack() {
    let mut b = buf(b"abc");
    b.preview_change(Change::insert(0, b"X".to_vec()));
    assert_eq!(read_view(&b), b"Xabc");
    assert_eq!(b.undo_depth(), 0);
    assert!(b.is_dirty());
}

#[test]
fn commit_moves_preview_onto_undo_stack() {
    let mut b = buf(b"abc");
    b.preview_change(Change::insert(0, b"X".to_vec()));
    assert!(b.commit_change());
    assert_eq!(b.undo_depth(), 1);
    assert!(b.preview().is_none());
    assert_eq!(read_view(&b), b"Xabc");
}

#[test]
fn commit_without_preview_does_nothing() {
    let mut b = buf(b"abc");
    assert!(!b.commit_change());
    assert_eq!(b.undo_depth(), 0);
}

#[test]
fn commit_of_noop_preview_is_discarded() {
    let mut b = buf(b"abc");
    b.preview_change(Change::new(1, 0, vec![]));
    assert!(!b.commit_change());
    assert_eq!(b.undo_depth(), 0);
}

// Scenario 5 — undo after edit.
#[test]
fn undo_after_edit_restores_original_and_redo_reapplies() {
    let mut b = buf(b"abc");
    b.preview_change(Change::insert(0, b"X".to_vec()));
    b.commit_change();
    assert_eq!(read_view(&b), b"Xabc");

    assert!(b.undo());
    assert_eq!(read_view(&b), b"abc");
    assert!(!b.is_dirty());

    assert!(b.redo());
    assert_eq!(read_view(&b), b"Xabc");
}

#[test]
fn undo_redo_on_empty_stacks_return_false() {
    let mut b = buf(b"abc");
    assert!(!b.undo());
    assert!(!b.redo());
}

// Property 3 — undo/redo is a stack isomorphism: the view always equals
// applying exactly the changes currently on the undo stack.
#[test]
fn undo_redo_stack_isomorphism() {
    let mut b = buf(b"0123456789");
    b.preview_change(Change::new(0, 1, b"a".to_vec()));
    b.commit_change();
    b.preview_change(Change::new(1, 1, b"bc".to_vec()));
    b.commit_change();
    b.preview_change(Change::new(0, 2, b"ZY".to_vec()));
    b.commit_change();
    assert_eq!(read_view(&b), b"ZYc23456789");

    // Popping the top commit should leave the view as if only the first two
    // changes had ever been applied.
    b.undo();
    assert_eq!(read_view(&b), b"abc23456789");
    assert_eq!(b.undo_depth(), 2);

    b.undo();
    assert_eq!(read_view(&b), b"a123456789");
    assert_eq!(b.undo_depth(), 1);

    b.undo();
    assert_eq!(read_view(&b), b"0123456789");
    assert_eq!(b.undo_depth(), 0);
}

// Property 4 — committing after an undo discards the redo stack.
#[test]
fn commit_after_undo_discards_redo_stack() {
    let mut b = buf(b"abc");
    b.preview_change(Change::insert(0, b"X".to_vec()));
    b.commit_change();
    b.undo();
    assert_eq!(b.redo_depth(), 1);

    b.preview_change(Change::insert(0, b"Y".to_vec()));
    b.commit_change();
    assert_eq!(b.redo_depth(), 0);
}

#[test]
fn selection_range_is_ordered_regardless_of_which_moved() {
    let mut b = buf(b"0123456789");
    b.set_cursor(2).unwrap();
    b.move_selection_anchor(7).unwrap();
    assert_eq!(b.get_selection_range(), (2, 7));

    b.set_cursor(9).unwrap();
    b.move_selection_anchor(1).unwrap();
    assert_eq!(b.get_selection_range(), (1, 9));
}

#[test]
fn copy_selection_with_equal_cursor_and_anchor_copies_one_byte() {
    let mut b = buf(b"0123456789");
    b.set_cursor(4).unwrap();
    b.move_selection_anchor(4).unwrap();
    let n = b.copy_selection().unwrap();
    assert_eq!(n, 1);
    assert_eq!(b.clipboard(), b"4");
}

#[test]
fn copy_selection_reads_inclusive_range() {
    let mut b = buf(b"0123456789");
    b.set_cursor(2).unwrap();
    b.move_selection_anchor(5).unwrap();
    let n = b.copy_selection().unwrap();
    assert_eq!(n, 4);
    assert_eq!(b.clipboard(), b"2345");
}

#[test]
fn paste_is_preview_with_clipboard_data_then_commit() {
    let mut b = buf(b"0123456789");
    b.set_cursor(2).unwrap();
    b.move_selection_anchor(4).unwrap();
    b.copy_selection().unwrap();
    assert_eq!(b.clipboard(), b"234");

    b.set_cursor(0).unwrap();
    let clip = b.clipboard().to_vec();
    b.preview_change(Change::insert(0, clip));
    b.commit_change();
    assert_eq!(read_view(&b), b"2340123456789");
}

#[test]
fn set_cursor_out_of_range_errors_and_does_not_move() {
    let mut b = buf(&vec![0u8; 16]);
    b.set_cursor(5).unwrap();
    let err = b.set_cursor(0x20).unwrap_err();
    assert!(matches!(err, EditorError::OutOfRange { offset: 0x20, size: 16 }));
    assert_eq!(b.cursor(), 5);
}

#[test]
fn move_cursor_clamps_into_bounds() {
    let mut b = buf(b"abc");
    b.set_cursor(1).unwrap();
    b.move_cursor(-10).unwrap();
    assert_eq!(b.cursor(), 0);
    b.move_cursor(100).unwrap();
    assert_eq!(b.cursor(), 2); // size() - 1 for a 3-byte buffer
}

#[test]
fn move_cursor_on_empty_buffer_stays_at_zero() {
    let mut b = buf(b"");
    b.move_cursor(5).unwrap();
    assert_eq!(b.cursor(), 0);
}

// Property 7 — dirty regions cover exactly the bytes that originated in a
// change's data; a single insertion's dirty range matches its final
// position.
#[test]
fn dirty_region_matches_single_insertion() {
    let mut b = buf(b"0123456789");
    b.preview_change(Change::insert(3, b"XYZ".to_vec()));
    b.commit_change();

    let regions = b.get_regions();
    let dirty: Vec<_> = regions.iter().filter(|r| r.kind == RegionKind::Dirty).collect();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty[0].range, Range::new(3, 5));
}

#[test]
fn dirty_region_shift_accounts_for_later_earlier_changes() {
    // change1 inserts "Q" at position 5 of the source.
    // change2, committed after, inserts "XY" at position 2 of the view
    // produced by change1 — a position that precedes change1's own, so it
    // shifts change1's final-view start by its net +2 delta.
    let mut b = buf(b"0123456789");
    b.preview_change(Change::insert(5, b"Q".to_vec()));
    b.commit_change();
    b.preview_change(Change::insert(2, b"XY".to_vec()));
    b.commit_change();

    assert_eq!(read_view(&b), b"01XY234Q56789");

    let regions = b.get_regions();
    let dirty: Vec<_> = regions.iter().filter(|r| r.kind == RegionKind::Dirty).collect();
    assert_eq!(dirty.len(), 2);
    assert_eq!(dirty[0].range, Range::new(2, 3)); // "XY"
    assert_eq!(dirty[1].range, Range::new(7, 7)); // "Q", shifted from 5 to 7
}

#[test]
fn pure_deletion_contributes_no_dirty_range() {
    let mut b = buf(b"0123456789");
    b.preview_change(Change::delete(2, 3));
    b.commit_change();
    assert_eq!(read_view(&b), b"0156789");

    let regions = b.get_regions();
    assert!(regions.iter().all(|r| r.kind != RegionKind::Dirty));
}

#[test]
fn preview_contributes_a_dirty_range_too() {
    let mut b = buf(b"0123456789");
    b.preview_change(Change::insert(5, b"Z".to_vec()));
    let regions = b.get_regions();
    let dirty: Vec<_> = regions.iter().filter(|r| r.kind == RegionKind::Dirty).collect();
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty[0].range, Range::new(5, 5));
}

#[test]
fn regions_are_sorted_ascending_by_start() {
    let mut b = buf(b"0123456789");
    b.set_cursor(8).unwrap();
    b.move_selection_anchor(8).unwrap();
    b.preview_change(Change::insert(2, b"Z".to_vec()));
    b.commit_change();

    let regions = b.get_regions();
    let starts: Vec<u64> = regions.iter().map(|r| r.range.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn user_defined_regions_appear_in_get_regions_sorted_with_the_rest() {
    let mut b = buf(b"0123456789");
    b.set_cursor(8).unwrap();
    b.move_selection_anchor(8).unwrap();
    b.preview_change(Change::insert(2, b"Z".to_vec()));
    b.commit_change();
    b.add_region(Region::new(RegionKind::Highlight, Range::new(0, 1)));

    let regions = b.get_regions();
    let highlights: Vec<_> = regions.iter().filter(|r| r.kind == RegionKind::Highlight).collect();
    assert_eq!(highlights.len(), 1);
    assert_eq!(highlights[0].range, Range::new(0, 1));

    let starts: Vec<u64> = regions.iter().map(|r| r.range.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);

    b.clear_regions();
    assert!(b.get_regions().iter().all(|r| r.kind != RegionKind::Highlight));
}

#[test]
fn reload_clears_dirty_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reload.bin");
    std::fs::write(&path, b"hello").unwrap();

    let mut b = EditorBuffer::new(
        path.to_str().unwrap(),
        Box::new(crate::source::FileSource::new(&path)),
    );
    b.preview_change(Change::insert(0, b"X".to_vec()));
    b.commit_change();
    assert!(b.is_dirty());

    b.reload().unwrap();
    assert!(!b.is_dirty());
    assert_eq!(read_view(&b), b"hello");
}

#[test]
fn write_to_file_streams_full_logical_view() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bin");

    let mut b = buf(b"0123456789");
    b.preview_change(Change::insert(0, b"X".to_vec()));
    b.commit_change();

    let n = b.write_to_file(&out).unwrap();
    assert_eq!(n, 11);
    assert_eq!(std::fs::read(&out).unwrap(), b"X0123456789");
}

#[test]
fn save_atomically_replaces_file_and_leaves_backup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.bin");
    std::fs::write(&path, b"0123456789").unwrap();

    let mut b = EditorBuffer::new(
        path.to_str().unwrap(),
        Box::new(crate::source::FileSource::new(&path)),
    );
    b.preview_change(Change::new(0, 10, b"REPLACED!!".to_vec()));
    b.commit_change();

    let n = b.save(None).unwrap();
    assert_eq!(n, 10);
    assert_eq!(std::fs::read(&path).unwrap(), b"REPLACED!!");

    let backup = path.with_file_name("doc.bin~");
    assert_eq!(std::fs::read(&backup).unwrap(), b"0123456789");
}

#[test]
fn save_in_place_rejects_length_changing_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixed.bin");
    std::fs::write(&path, b"0123456789").unwrap();

    let mut b = EditorBuffer::new(
        path.to_str().unwrap(),
        Box::new(crate::source::FileSource::new(&path)),
    );
    b.preview_change(Change::insert(0, b"X".to_vec()));
    b.commit_change();

    let err = b.save_in_place().unwrap_err();
    assert!(matches!(err, EditorError::LengthChange));
}

#[test]
fn save_in_place_patches_file_without_renaming() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixed.bin");
    std::fs::write(&path, b"0123456789").unwrap();

    let mut b = EditorBuffer::new(
        path.to_str().unwrap(),
        Box::new(crate::source::FileSource::new(&path)),
    );
    b.preview_change(Change::new(2, 2, b"ZZ".to_vec()));
    b.commit_change();

    b.save_in_place().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"01ZZ456789");
}
