use super::*;

fn session(markup: &str) -> EditorSession {
    EditorSession::from_markup(markup)
}

fn caret_in_first_child(offset: usize) -> Caret {
    Caret::new(NodePath::root().child(0), offset)
}

fn place_caret(session: &mut EditorSession, caret: Caret) {
    session.set_selection(Selection::collapsed(caret));
}

#[test]
fn new_session_is_empty() {
    let session = EditorSession::new();
    assert_eq!(session.plain_text(), "");
    assert_eq!(session.caret(), Some(&Caret::new(NodePath::root(), 0)));
}

#[test]
fn typing_appends_text() {
    let mut session = EditorSession::new();
    assert!(session.insert_char('h'));
    assert!(session.insert_char('i'));
    assert_eq!(session.plain_text(), "hi");
    assert_eq!(session.to_markup(), "hi");
}

#[test]
fn caret_starts_at_end_of_loaded_content() {
    let session = session("hello");
    assert_eq!(session.caret(), Some(&caret_in_first_child(5)));
}

#[test]
fn insert_in_middle_of_text_run() {
    let mut session = session("helo");
    place_caret(&mut session, caret_in_first_child(3));
    assert!(session.insert_char('l'));
    assert_eq!(session.plain_text(), "hello");
    assert_eq!(session.caret(), Some(&caret_in_first_child(4)));
}

#[test]
fn typing_over_a_range_replaces_it() {
    let mut session = session("hello world");
    session.select_all();
    assert!(session.insert_char('x'));
    assert_eq!(session.plain_text(), "x");
}

#[test]
fn backspace_removes_previous_char() {
    let mut session = session("hello");
    assert!(session.backspace());
    assert_eq!(session.plain_text(), "hell");
}

#[test]
fn backspace_at_document_start_is_a_noop() {
    let mut session = session("hello");
    place_caret(&mut session, caret_in_first_child(0));
    assert!(!session.backspace());
    assert_eq!(session.plain_text(), "hello");
}

#[test]
fn backspace_deletes_a_ranged_selection() {
    let mut session = session("hello world");
    session.set_selection(Selection::new(
        caret_in_first_child(5),
        caret_in_first_child(11),
    ));
    assert!(session.backspace());
    assert_eq!(session.plain_text(), "hello");
}

#[test]
fn backspace_removes_a_line_break() {
    let mut session = session("a<br>b");
    place_caret(&mut session, Caret::new(NodePath::root().child(2), 0));
    assert!(session.backspace());
    assert_eq!(session.plain_text(), "ab");
    assert_eq!(session.to_markup(), "ab");
}

#[test]
fn line_break_splits_a_text_run() {
    let mut session = session("ab");
    place_caret(&mut session, caret_in_first_child(1));
    assert!(session.insert_line_break());
    assert_eq!(session.plain_text(), "a\nb");
    assert_eq!(session.to_markup(), "a<br>b");
    assert_eq!(session.caret(), Some(&Caret::new(NodePath::root(), 2)));
}

#[test]
fn paragraph_break_inserts_a_blank_line() {
    let mut session = session("ab");
    place_caret(&mut session, caret_in_first_child(1));
    assert!(session.insert_paragraph_break());
    assert_eq!(session.plain_text(), "a\n\nb");
    assert_eq!(session.to_markup(), "a<br><br>b");
    assert_eq!(session.caret(), Some(&Caret::new(NodePath::root(), 3)));
}

#[test]
fn move_right_steps_through_wrappers() {
    let mut session = session("a<b>b</b>c");
    session.move_to_start(false);
    assert!(session.move_right(false));
    assert_eq!(
        session.caret(),
        Some(&Caret::new(NodePath::from_indices(vec![1, 0]), 0))
    );
    assert!(session.move_right(false));
    assert_eq!(
        session.caret(),
        Some(&Caret::new(NodePath::from_indices(vec![2]), 0))
    );
}

#[test]
fn move_right_stops_at_end_of_content() {
    let mut session = session("ab");
    assert!(!session.move_right(false));
}

#[test]
fn move_left_collapses_a_range_to_its_start() {
    let mut session = session("hello");
    session.select_all();
    assert!(session.move_left(false));
    let selection = session.selection().cloned();
    assert_eq!(
        selection,
        Some(Selection::collapsed(caret_in_first_child(0)))
    );
}

#[test]
fn shift_movement_extends_the_selection() {
    let mut session = session("hello");
    session.move_to_start(false);
    assert!(session.move_right(true));
    assert!(session.move_right(true));
    let selection = session.selection().cloned().unwrap();
    assert_eq!(selection.anchor, caret_in_first_child(0));
    assert_eq!(selection.focus, caret_in_first_child(2));
    assert!(!selection.is_collapsed());
}

#[test]
fn move_to_end_jumps_to_end_of_content() {
    let mut session = session("hello<br>world");
    session.move_to_start(false);
    assert!(session.move_to_end(false));
    assert_eq!(
        session.caret(),
        Some(&Caret::new(NodePath::from_indices(vec![2]), 5))
    );

    session.move_to_start(false);
    assert!(session.move_to_end(true));
    let selection = session.selection().cloned().unwrap();
    assert_eq!(selection.anchor, caret_in_first_child(0));
    assert!(!selection.is_collapsed());
}

#[test]
fn restore_selection_revives_the_tracked_range() {
    let mut session = session("hello");
    let range = Selection::new(caret_in_first_child(0), caret_in_first_child(3));
    session.set_selection(range.clone());
    session.clear_selection();
    assert!(session.selection().is_none());

    let restored = session.restore_selection();
    assert_eq!(restored, range);
    assert_eq!(session.selection(), Some(&range));
}

#[test]
fn move_to_linear_places_the_caret_by_character_index() {
    let mut session = session("a<br><b>bc</b>");
    assert!(session.move_to_linear(2, false));
    assert_eq!(
        session.caret(),
        Some(&Caret::new(NodePath::from_indices(vec![2, 0]), 0))
    );
}

#[test]
fn load_markup_replaces_content_and_parks_caret_at_end() {
    let mut session = EditorSession::new();
    session.load_markup("<h2>Title</h2>");
    assert_eq!(session.plain_text(), "Title\n");
    assert_eq!(
        session.caret(),
        Some(&Caret::new(NodePath::from_indices(vec![0, 0]), 5))
    );
}

#[test]
fn counts_follow_the_derived_plain_text() {
    let session = session("Hello <b>world</b>");
    assert_eq!(session.word_count(), 2);
    assert_eq!(session.char_count(), 11);

    let empty = EditorSession::new();
    assert_eq!(empty.word_count(), 0);
    assert_eq!(empty.char_count(), 0);
}
