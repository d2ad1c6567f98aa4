use content::char_to_byte_idx;

mod content;
mod format;
mod markup;
mod selection;
mod tree;

pub use content::{char_count, word_count};
pub use format::{FormatKind, DEFAULT_HEADING_LABEL};
pub use markup::{parse_markup, to_markup};
pub use selection::{Selection, SelectionTracker};
pub use tree::{
    nodes_plain_text, Caret, DocumentTree, Element, ElementKind, FlatPos, Node, NodePath,
    PLACEHOLDER,
};

/// One editing session over one open document. Owns the tree, the
/// live selection, and the selection tracker; every mutating command
/// runs synchronously to completion and leaves a collapsed selection
/// plus a fresh tracker snapshot behind.
pub struct EditorSession {
    tree: DocumentTree,
    selection: Option<Selection>,
    tracker: SelectionTracker,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::from_tree(DocumentTree::new())
    }

    pub fn from_tree(tree: DocumentTree) -> Self {
        let mut session = Self {
            tree,
            selection: None,
            tracker: SelectionTracker::new(),
        };
        let end = session.tree.end_caret();
        session.selection = Some(Selection::collapsed(end));
        session.track_selection();
        session
    }

    pub fn from_markup(input: &str) -> Self {
        Self::from_tree(parse_markup(input))
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn caret(&self) -> Option<&Caret> {
        self.selection.as_ref().map(|sel| &sel.focus)
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.track_selection();
    }

    /// The surface lost focus: there is no live selection until the
    /// next tracked event, but the snapshot keeps what was selected.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Snapshots the current live selection, overwriting the previous
    /// snapshot. Called on every tracked input event and after every
    /// mutation.
    pub fn track_selection(&mut self) {
        self.tracker.snapshot(self.selection.as_ref());
    }

    /// Re-activates the tracked selection (or the end-of-content
    /// fallback) as the live one and returns it.
    pub fn restore_selection(&mut self) -> Selection {
        let selection = self.tracker.restore(&self.tree);
        self.selection = Some(selection.clone());
        selection
    }

    /// Full-content replacement, the "open file" path. Last writer
    /// wins; the caret lands at the end of the new content.
    pub fn replace_content(&mut self, tree: DocumentTree) {
        self.tree = tree;
        let end = self.tree.end_caret();
        self.selection = Some(Selection::collapsed(end));
        self.track_selection();
    }

    pub fn load_markup(&mut self, input: &str) {
        self.replace_content(parse_markup(input));
    }

    pub fn to_markup(&self) -> String {
        to_markup(&self.tree)
    }

    pub fn plain_text(&self) -> String {
        self.tree.plain_text()
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.plain_text())
    }

    pub fn char_count(&self) -> usize {
        char_count(&self.plain_text())
    }

    fn active_selection(&self) -> Selection {
        match &self.selection {
            Some(selection) => selection.clone(),
            None => self.tracker.restore(&self.tree),
        }
    }

    fn commit_caret(&mut self, caret: Caret) {
        self.selection = Some(Selection::collapsed(caret));
        self.track_selection();
    }

    /// Collapses the active selection, deleting its content first if
    /// it spans a range, and returns the caret left behind.
    fn collapse_for_edit(&mut self) -> Option<Caret> {
        let selection = self.active_selection();
        let (start, end) = selection.ordered();
        if selection.is_collapsed() {
            return Some(start);
        }
        let slot = self.tree.extract_range(&start, &end)?;
        Some(Caret::new(slot.container, slot.index))
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let Some(caret) = self.collapse_for_edit() else {
            return false;
        };
        let in_text = matches!(self.tree.node(&caret.path), Some(Node::Text(_)));
        let caret = if in_text {
            let Some(Node::Text(text)) = self.tree.node_mut(&caret.path) else {
                return false;
            };
            let at = char_to_byte_idx(text, caret.offset);
            text.insert(at, ch);
            Caret::new(caret.path, caret.offset + 1)
        } else {
            let Some(children) = self.tree.container_children_mut(&caret.path) else {
                return false;
            };
            let at = caret.offset.min(children.len());
            let appended = if at > 0 {
                match children.get_mut(at - 1) {
                    Some(Node::Text(text)) => {
                        text.push(ch);
                        Some(Caret::new(caret.path.child(at - 1), text.chars().count()))
                    }
                    _ => None,
                }
            } else {
                None
            };
            match appended {
                Some(caret) => caret,
                None => {
                    children.insert(at, Node::Text(ch.to_string()));
                    Caret::new(caret.path.child(at), 1)
                }
            }
        };
        self.commit_caret(caret);
        true
    }

    pub fn insert_line_break(&mut self) -> bool {
        let Some(caret) = self.collapse_for_edit() else {
            return false;
        };
        let Some(slot) = self.tree.extract_range(&caret, &caret) else {
            return false;
        };
        self.tree
            .insert_nodes(&slot.container, slot.index, vec![Node::LineBreak]);
        self.commit_caret(Caret::new(slot.container, slot.index + 1));
        true
    }

    /// Inserts a paragraph boundary, rendered as a blank line: two
    /// consecutive line breaks at the caret.
    pub fn insert_paragraph_break(&mut self) -> bool {
        let Some(caret) = self.collapse_for_edit() else {
            return false;
        };
        let Some(slot) = self.tree.extract_range(&caret, &caret) else {
            return false;
        };
        self.tree.insert_nodes(
            &slot.container,
            slot.index,
            vec![Node::LineBreak, Node::LineBreak],
        );
        self.commit_caret(Caret::new(slot.container, slot.index + 2));
        true
    }

    pub fn backspace(&mut self) -> bool {
        let selection = self.active_selection();
        if !selection.is_collapsed() {
            let (start, end) = selection.ordered();
            let Some(slot) = self.tree.extract_range(&start, &end) else {
                return false;
            };
            self.commit_caret(Caret::new(slot.container, slot.index));
            return true;
        }

        let focus = selection.focus;
        let linear = self.tree.linear_of(&focus);
        if linear == 0 {
            return false;
        }
        let prev = self.tree.caret_at_linear(linear - 1);

        if matches!(self.tree.node(&prev.path), Some(Node::Text(_))) {
            let emptied = {
                let Some(Node::Text(text)) = self.tree.node_mut(&prev.path) else {
                    return false;
                };
                let from = char_to_byte_idx(text, prev.offset);
                let to = char_to_byte_idx(text, prev.offset + 1);
                text.replace_range(from..to, "");
                text.is_empty()
            };
            let caret = if emptied {
                self.remove_node_at(&prev.path).unwrap_or(prev)
            } else {
                prev
            };
            self.commit_caret(caret);
            return true;
        }

        // Flat positions address line breaks through their container.
        let break_path = prev.path.child(prev.offset);
        if matches!(self.tree.node(&break_path), Some(Node::LineBreak)) {
            let caret = self.remove_node_at(&break_path).unwrap_or(prev);
            self.commit_caret(caret);
            return true;
        }
        false
    }

    /// Removes the node and, when that leaves a non-root wrapper
    /// empty, the wrapper too. Returns the caret at the removal site.
    fn remove_node_at(&mut self, path: &NodePath) -> Option<Caret> {
        let parent = path.parent()?;
        let idx = path.last()?;
        let children = self.tree.container_children_mut(&parent)?;
        if idx >= children.len() {
            return None;
        }
        children.remove(idx);
        if children.is_empty() && !parent.is_root() {
            return self.remove_node_at(&parent);
        }
        Some(Caret::new(parent, idx))
    }

    pub fn move_left(&mut self, extend: bool) -> bool {
        let selection = self.active_selection();
        if !extend && !selection.is_collapsed() {
            let (start, _) = selection.ordered();
            self.set_selection(Selection::collapsed(start));
            return true;
        }
        let linear = self.tree.linear_of(&selection.focus);
        if linear == 0 {
            return false;
        }
        let focus = self.tree.caret_at_linear(linear - 1);
        self.apply_move(selection, focus, extend)
    }

    pub fn move_right(&mut self, extend: bool) -> bool {
        let selection = self.active_selection();
        if !extend && !selection.is_collapsed() {
            let (_, end) = selection.ordered();
            self.set_selection(Selection::collapsed(end));
            return true;
        }
        let linear = self.tree.linear_of(&selection.focus);
        let focus = self.tree.caret_at_linear(linear + 1);
        if focus == selection.focus {
            return false;
        }
        self.apply_move(selection, focus, extend)
    }

    pub fn move_to_start(&mut self, extend: bool) -> bool {
        let selection = self.active_selection();
        let focus = self.tree.caret_at_linear(0);
        self.apply_move(selection, focus, extend)
    }

    pub fn move_to_end(&mut self, extend: bool) -> bool {
        let selection = self.active_selection();
        let focus = self.tree.end_caret();
        self.apply_move(selection, focus, extend)
    }

    pub fn select_all(&mut self) {
        let anchor = self.tree.caret_at_linear(0);
        let focus = self.tree.end_caret();
        self.set_selection(Selection::new(anchor, focus));
    }

    /// Places a collapsed caret at the given linear character index,
    /// or extends the current selection to it.
    pub fn move_to_linear(&mut self, linear: usize, extend: bool) -> bool {
        let selection = self.active_selection();
        let focus = self.tree.caret_at_linear(linear);
        self.apply_move(selection, focus, extend)
    }

    fn apply_move(&mut self, current: Selection, focus: Caret, extend: bool) -> bool {
        let anchor = if extend {
            current.anchor
        } else {
            focus.clone()
        };
        self.set_selection(Selection::new(anchor, focus));
        true
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;


#[cfg(test)]
#[path = "editor/selection_tests.rs"]
mod selection_tests;

#[cfg(test)]
#[path = "editor/content_tests.rs"]
mod content_tests;

#[cfg(test)]
#[path = "editor/markup_tests.rs"]
mod markup_tests;
