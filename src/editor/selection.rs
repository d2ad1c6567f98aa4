use std::cmp::Ordering;

use super::tree::{Caret, DocumentTree};

/// An anchor/focus caret pair over the document tree. Collapsed when
/// both point at the same position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Caret,
    pub focus: Caret,
}

impl Selection {
    pub fn new(anchor: Caret, focus: Caret) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(caret: Caret) -> Self {
        Self {
            anchor: caret.clone(),
            focus: caret,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Start/end in document order, regardless of drag direction.
    pub fn ordered(&self) -> (Caret, Caret) {
        if self.anchor.order(&self.focus) == Ordering::Greater {
            (self.focus.clone(), self.anchor.clone())
        } else {
            (self.anchor.clone(), self.focus.clone())
        }
    }
}

/// Remembers what was selected the last time the surface reported a
/// selection. Formatting triggers steal focus before they run, so the
/// tracker is the only way to recover the range they should act on.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    snapshot: Option<Selection>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the stored snapshot with the current live selection,
    /// or records "no selection" when there is none.
    pub fn snapshot(&mut self, live: Option<&Selection>) {
        self.snapshot = live.cloned();
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Yields the snapshot clamped to the current tree. With no usable
    /// snapshot this falls back to a collapsed caret at the end of the
    /// content, so a formatting action always has something to act on.
    pub fn restore(&self, tree: &DocumentTree) -> Selection {
        if let Some(snapshot) = &self.snapshot {
            let anchor = tree.clamp_caret(&snapshot.anchor);
            let focus = tree.clamp_caret(&snapshot.focus);
            if let (Some(anchor), Some(focus)) = (anchor, focus) {
                return Selection::new(anchor, focus);
            }
        }
        Selection::collapsed(tree.end_caret())
    }
}
