use tracing::warn;

use super::selection::Selection;
use super::tree::{
    normalize, nodes_plain_text, Caret, ElementKind, Node, NodePath, PLACEHOLDER,
};
use super::EditorSession;

/// Label inserted when a heading is created from a bare cursor.
pub const DEFAULT_HEADING_LABEL: &str = "Heading";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Heading,
}

impl FormatKind {
    pub fn element_kind(self) -> ElementKind {
        match self {
            FormatKind::Bold => ElementKind::Bold,
            FormatKind::Italic => ElementKind::Italic,
            FormatKind::Underline => ElementKind::Underline,
            FormatKind::Heading => ElementKind::Heading,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormatKind::Bold => "Bold",
            FormatKind::Italic => "Italic",
            FormatKind::Underline => "Underline",
            FormatKind::Heading => "Heading",
        }
    }
}

impl EditorSession {
    /// Applies or removes one formatting kind over the restored
    /// selection. Never fails outward: an unlocatable selection is a
    /// logged no-op and the content is left untouched. The selection
    /// is collapsed and re-snapshotted either way.
    pub fn apply_format(&mut self, kind: FormatKind) -> bool {
        let selection = self.tracker.restore(&self.tree);
        let caret = match kind {
            FormatKind::Heading => self.apply_heading(&selection),
            inline => self.toggle_inline(&selection, inline.element_kind()),
        };
        match caret {
            Some(caret) => {
                self.selection = Some(Selection::collapsed(caret));
                self.track_selection();
                true
            }
            None => {
                warn!(
                    kind = kind.label(),
                    "formatting action could not locate its selection, content left unchanged"
                );
                self.track_selection();
                false
            }
        }
    }

    /// Shared wrap/unwrap surgery for the inline kinds. Toggle-off is
    /// detected by walking the ancestor chain from the selection's
    /// common container; toggle-on wraps whatever range extraction
    /// detaches, falling back to a placeholder run for a bare cursor.
    fn toggle_inline(&mut self, selection: &Selection, kind: ElementKind) -> Option<Caret> {
        let (start, end) = selection.ordered();
        let common = self.tree.common_container(&start, &end)?;
        if let Some(wrapper) = self.tree.find_wrapper_ancestor(&common, kind) {
            return self.unwrap_element(&wrapper);
        }

        let extracted = self.tree.extract_range(&start, &end)?;
        let children = if extracted.nodes.is_empty() {
            vec![Node::placeholder()]
        } else {
            extracted.nodes
        };
        self.tree
            .insert_nodes(&extracted.container, extracted.index, vec![Node::element(kind, children)]);
        Some(Caret::new(extracted.container, extracted.index + 1))
    }

    /// Moves a wrapper's children into its parent in place, drops the
    /// wrapper, merges adjacent runs, and parks the caret at the end
    /// of the former parent's content.
    fn unwrap_element(&mut self, wrapper: &NodePath) -> Option<Caret> {
        let parent = wrapper.parent()?;
        let idx = wrapper.last()?;
        {
            let children = self.tree.container_children_mut(&parent)?;
            if !matches!(children.get(idx), Some(Node::Element(_))) {
                return None;
            }
            let Node::Element(el) = children.remove(idx) else {
                return None;
            };
            let mut offset = 0;
            for node in el.children {
                let node = match node {
                    Node::Text(text) => {
                        let kept: String = text.chars().filter(|ch| *ch != PLACEHOLDER).collect();
                        if kept.is_empty() {
                            continue;
                        }
                        Node::Text(kept)
                    }
                    other => other,
                };
                children.insert(idx + offset, node);
                offset += 1;
            }
            normalize(children);
        }
        Some(self.tree.end_caret_in(&parent))
    }

    fn apply_heading(&mut self, selection: &Selection) -> Option<Caret> {
        let (start, end) = selection.ordered();
        if !selection.is_collapsed() {
            let extracted = self.tree.extract_range(&start, &end)?;
            let text = nodes_plain_text(&extracted.nodes);
            let text = text.trim_end_matches('\n');
            if !text.is_empty() {
                // Heading text is re-created as a plain run; inline
                // formatting inside the selection is discarded.
                let heading = Node::element(ElementKind::Heading, vec![Node::text(text)]);
                self.tree
                    .insert_nodes(&extracted.container, extracted.index, vec![heading]);
                return Some(Caret::new(extracted.container, extracted.index + 1));
            }
            let slot = Caret::new(extracted.container, extracted.index);
            return self.heading_at_cursor(&slot);
        }
        self.heading_at_cursor(&start)
    }

    fn heading_at_cursor(&mut self, caret: &Caret) -> Option<Caret> {
        if let Some((path, ElementKind::Heading)) = self.nearest_element(caret) {
            return self.demote_heading(&path);
        }
        let slot = self.tree.extract_range(caret, caret)?;
        let heading = Node::element(
            ElementKind::Heading,
            vec![Node::text(DEFAULT_HEADING_LABEL)],
        );
        self.tree.insert_nodes(&slot.container, slot.index, vec![heading]);
        Some(Caret::new(slot.container, slot.index + 1))
    }

    /// Replaces a heading block with a plain run carrying its text,
    /// caret at the end of that run.
    fn demote_heading(&mut self, heading: &NodePath) -> Option<Caret> {
        let parent = heading.parent()?;
        let idx = heading.last()?;
        let children = self.tree.container_children_mut(&parent)?;
        let Node::Element(el) = children.get(idx)? else {
            return None;
        };
        let text = nodes_plain_text(&el.children);
        let text = text.trim_end_matches('\n').to_string();
        children.remove(idx);
        if text.is_empty() {
            return Some(Caret::new(parent, idx));
        }
        let len = text.chars().count();
        children.insert(idx, Node::Text(text));
        Some(Caret::new(parent.child(idx), len))
    }

    /// The deepest element enclosing the caret. A heading further up
    /// the chain does not count.
    fn nearest_element(&self, caret: &Caret) -> Option<(NodePath, ElementKind)> {
        for depth in (1..=caret.path.len()).rev() {
            let prefix = caret.path.prefix(depth);
            if let Some(Node::Element(el)) = self.tree.node(&prefix) {
                return Some((prefix, el.kind));
            }
        }
        None
    }
}
