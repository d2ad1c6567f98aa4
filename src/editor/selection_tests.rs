use std::cmp::Ordering;

use super::*;

fn caret(indices: Vec<usize>, offset: usize) -> Caret {
    Caret::new(NodePath::from_indices(indices), offset)
}

#[test]
fn collapsed_selection_has_equal_ends() {
    let selection = Selection::collapsed(caret(vec![0], 3));
    assert!(selection.is_collapsed());
    assert_eq!(selection.anchor, selection.focus);
}

#[test]
fn ordered_swaps_a_backward_drag() {
    let selection = Selection::new(caret(vec![2], 0), caret(vec![0], 1));
    let (start, end) = selection.ordered();
    assert_eq!(start, caret(vec![0], 1));
    assert_eq!(end, caret(vec![2], 0));
}

#[test]
fn container_boundary_sorts_before_the_child_it_points_at() {
    let boundary = caret(vec![], 1);
    let inside_child = caret(vec![1, 0], 0);
    assert_eq!(boundary.order(&inside_child), Ordering::Less);
    assert_eq!(inside_child.order(&boundary), Ordering::Greater);

    let earlier_child = caret(vec![0], 2);
    assert_eq!(earlier_child.order(&boundary), Ordering::Less);
}

#[test]
fn same_path_carets_order_by_offset() {
    assert_eq!(caret(vec![0], 1).order(&caret(vec![0], 4)), Ordering::Less);
    assert_eq!(caret(vec![0], 4).order(&caret(vec![0], 4)), Ordering::Equal);
}

#[test]
fn restore_clamps_a_stale_offset() {
    let tree = parse_markup("ab");
    let mut tracker = SelectionTracker::new();
    tracker.snapshot(Some(&Selection::collapsed(caret(vec![0], 9))));
    let restored = tracker.restore(&tree);
    assert_eq!(restored, Selection::collapsed(caret(vec![0], 2)));
}

#[test]
fn restore_falls_back_when_the_path_is_gone() {
    let tree = parse_markup("ab");
    let mut tracker = SelectionTracker::new();
    tracker.snapshot(Some(&Selection::collapsed(caret(vec![5], 0))));
    let restored = tracker.restore(&tree);
    assert_eq!(restored, Selection::collapsed(caret(vec![0], 2)));
}

#[test]
fn restore_without_a_snapshot_lands_at_end_of_content() {
    let tree = parse_markup("hi<br>");
    let tracker = SelectionTracker::new();
    assert!(!tracker.has_snapshot());
    let restored = tracker.restore(&tree);
    assert_eq!(restored, Selection::collapsed(tree.end_caret()));
}

#[test]
fn snapshot_overwrites_the_previous_one() {
    let mut tracker = SelectionTracker::new();
    tracker.snapshot(Some(&Selection::collapsed(caret(vec![0], 1))));
    tracker.snapshot(None);
    assert!(!tracker.has_snapshot());
}

#[test]
fn restore_keeps_a_still_valid_range() {
    let tree = parse_markup("hello world");
    let mut tracker = SelectionTracker::new();
    let selection = Selection::new(caret(vec![0], 0), caret(vec![0], 5));
    tracker.snapshot(Some(&selection));
    assert_eq!(tracker.restore(&tree), selection);
}
