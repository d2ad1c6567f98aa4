use std::cmp::Ordering;

use super::content::char_to_byte_idx;

/// Inserted into a wrapper that would otherwise be empty so it stays a
/// valid insertion point. Excluded from derived plain text.
pub const PLACEHOLDER: char = '\u{200B}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Bold,
    Italic,
    Underline,
    Heading,
    Paragraph,
}

impl ElementKind {
    pub fn is_block(self) -> bool {
        matches!(self, ElementKind::Heading | ElementKind::Paragraph)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(kind: ElementKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Element(Element),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn element(kind: ElementKind, children: Vec<Node>) -> Self {
        Node::Element(Element::new(kind, children))
    }

    pub fn placeholder() -> Self {
        Node::Text(PLACEHOLDER.to_string())
    }
}

/// Child-index path from the document root to a node. The empty path
/// addresses the root container itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePath {
    indices: Vec<usize>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_root(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn push(&mut self, idx: usize) {
        self.indices.push(idx);
    }

    pub fn pop(&mut self) {
        self.indices.pop();
    }

    pub fn child(&self, idx: usize) -> Self {
        let mut path = self.clone();
        path.push(idx);
        path
    }

    pub fn parent(&self) -> Option<Self> {
        if self.indices.is_empty() {
            return None;
        }
        Some(Self {
            indices: self.indices[..self.indices.len() - 1].to_vec(),
        })
    }

    pub fn last(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    pub fn prefix(&self, len: usize) -> Self {
        Self {
            indices: self.indices[..len.min(self.indices.len())].to_vec(),
        }
    }
}

/// A point inside the tree: a char offset when the path addresses a
/// text run, a child index when it addresses a container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caret {
    pub path: NodePath,
    pub offset: usize,
}

impl Caret {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Document order. A container boundary at child index `k` sits
    /// before everything inside child `k`.
    pub fn order(&self, other: &Caret) -> Ordering {
        let a = self.path.indices();
        let b = other.path.indices();
        let shared = a.len().min(b.len());
        for i in 0..shared {
            match a[i].cmp(&b[i]) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        match a.len().cmp(&b.len()) {
            Ordering::Equal => self.offset.cmp(&other.offset),
            Ordering::Less => self.offset.cmp(&b[shared]).then(Ordering::Less),
            Ordering::Greater => a[shared].cmp(&other.offset).then(Ordering::Greater),
        }
    }
}

/// The result of detaching a range: the extracted nodes plus the slot
/// (container path and child index) where the range used to sit.
#[derive(Debug)]
pub struct ExtractedRange {
    pub nodes: Vec<Node>,
    pub container: NodePath,
    pub index: usize,
}

/// A single visible character position, used for linear caret movement.
#[derive(Clone, Debug)]
pub struct FlatPos {
    pub caret: Caret,
    pub ch: char,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentTree {
    pub children: Vec<Node>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let (last, parents) = path.indices().split_last()?;
        let mut nodes = &self.children;
        for idx in parents {
            match nodes.get(*idx)? {
                Node::Element(el) => nodes = &el.children,
                _ => return None,
            }
        }
        nodes.get(*last)
    }

    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (last, parents) = path.indices().split_last()?;
        let mut nodes = &mut self.children;
        for idx in parents {
            match nodes.get_mut(*idx)? {
                Node::Element(el) => nodes = &mut el.children,
                _ => return None,
            }
        }
        nodes.get_mut(*last)
    }

    pub fn container_children(&self, path: &NodePath) -> Option<&Vec<Node>> {
        if path.is_root() {
            return Some(&self.children);
        }
        match self.node(path)? {
            Node::Element(el) => Some(&el.children),
            _ => None,
        }
    }

    pub fn container_children_mut(&mut self, path: &NodePath) -> Option<&mut Vec<Node>> {
        if path.is_root() {
            return Some(&mut self.children);
        }
        match self.node_mut(path)? {
            Node::Element(el) => Some(&mut el.children),
            _ => None,
        }
    }

    /// Clamps a possibly stale caret to the current tree. Returns
    /// `None` when the path no longer resolves at all.
    pub fn clamp_caret(&self, caret: &Caret) -> Option<Caret> {
        if caret.path.is_root() {
            return Some(Caret::new(
                NodePath::root(),
                caret.offset.min(self.children.len()),
            ));
        }
        match self.node(&caret.path)? {
            Node::Text(text) => Some(Caret::new(
                caret.path.clone(),
                caret.offset.min(text.chars().count()),
            )),
            Node::Element(el) => Some(Caret::new(
                caret.path.clone(),
                caret.offset.min(el.children.len()),
            )),
            Node::LineBreak => caret.path.parent().map(|parent| {
                let len = self
                    .container_children(&parent)
                    .map(Vec::len)
                    .unwrap_or_default();
                Caret::new(parent, caret.path.last().unwrap_or_default().min(len))
            }),
        }
    }

    pub fn end_caret(&self) -> Caret {
        self.end_caret_in(&NodePath::root())
    }

    /// Collapsed caret at the end of a container's content, descending
    /// into a trailing text run when one exists.
    pub fn end_caret_in(&self, container: &NodePath) -> Caret {
        let mut path = container.clone();
        loop {
            let Some(children) = self.container_children(&path) else {
                return Caret::new(NodePath::root(), self.children.len());
            };
            if children.is_empty() {
                return Caret::new(path, 0);
            }
            let last = children.len() - 1;
            match &children[last] {
                Node::Text(text) => {
                    path.push(last);
                    return Caret::new(path, text.chars().count());
                }
                Node::LineBreak => return Caret::new(path, children.len()),
                Node::Element(_) => path.push(last),
            }
        }
    }

    /// The deepest container shared by both carets.
    pub fn common_container(&self, a: &Caret, b: &Caret) -> Option<NodePath> {
        let pa = a.path.indices();
        let pb = b.path.indices();
        let mut shared = 0;
        while shared < pa.len() && shared < pb.len() && pa[shared] == pb[shared] {
            shared += 1;
        }
        let mut path = a.path.prefix(shared);
        loop {
            if path.is_root() {
                return Some(path);
            }
            match self.node(&path)? {
                Node::Element(_) => return Some(path),
                _ => path.pop(),
            }
        }
    }

    /// Walks the ancestor chain from `from` up to (not including) the
    /// root, looking for a wrapper of the given kind.
    pub fn find_wrapper_ancestor(&self, from: &NodePath, kind: ElementKind) -> Option<NodePath> {
        for depth in (1..=from.len()).rev() {
            let prefix = from.prefix(depth);
            if let Some(Node::Element(el)) = self.node(&prefix) {
                if el.kind == kind {
                    return Some(prefix);
                }
            }
        }
        None
    }

    /// Detaches everything between two (ordered) carets. A collapsed
    /// range extracts nothing but still yields the insertion slot,
    /// splitting a text run at the caret when necessary.
    pub fn extract_range(&mut self, start: &Caret, end: &Caret) -> Option<ExtractedRange> {
        if start.path == end.path {
            if let Some(Node::Text(_)) = self.node(&start.path) {
                return self.extract_within_text(start, end);
            }
        }
        let container = self.common_container(start, end)?;
        let depth = container.len();
        let children = self.container_children_mut(&container)?;

        // End first so the start point's indices stay valid.
        let tail = if end.path.len() == depth {
            let at = end.offset.min(children.len());
            children.split_off(at)
        } else {
            split_children(children, &end.path.indices()[depth..], end.offset)
        };
        let nodes = if start.path.len() == depth {
            let at = start.offset.min(children.len());
            children.split_off(at)
        } else {
            split_children(children, &start.path.indices()[depth..], start.offset)
        };
        let index = children.len();
        children.extend(tail);
        Some(ExtractedRange {
            nodes,
            container,
            index,
        })
    }

    fn extract_within_text(&mut self, start: &Caret, end: &Caret) -> Option<ExtractedRange> {
        let parent = start.path.parent()?;
        let idx = start.path.last()?;
        let children = self.container_children_mut(&parent)?;
        let Some(Node::Text(text)) = children.get_mut(idx) else {
            return None;
        };
        let from = char_to_byte_idx(text, start.offset);
        let to = char_to_byte_idx(text, end.offset.max(start.offset));
        let middle = text[from..to].to_string();
        let right = text[to..].to_string();
        text.truncate(from);
        let left_kept = from > 0;
        if !left_kept {
            children.remove(idx);
        }
        let index = idx + usize::from(left_kept);
        if !right.is_empty() {
            children.insert(index, Node::Text(right));
        }
        let nodes = if middle.is_empty() {
            Vec::new()
        } else {
            vec![Node::Text(middle)]
        };
        Some(ExtractedRange {
            nodes,
            container: parent,
            index,
        })
    }

    pub fn insert_nodes(&mut self, container: &NodePath, index: usize, nodes: Vec<Node>) -> bool {
        let Some(children) = self.container_children_mut(container) else {
            return false;
        };
        let at = index.min(children.len());
        for (offset, node) in nodes.into_iter().enumerate() {
            children.insert(at + offset, node);
        }
        true
    }

    pub fn plain_text(&self) -> String {
        nodes_plain_text(&self.children)
    }

    /// Every visible character with the caret addressing the position
    /// just before it, in document order.
    pub fn flat_positions(&self) -> Vec<FlatPos> {
        fn walk(nodes: &[Node], path: &mut NodePath, out: &mut Vec<FlatPos>) {
            for (idx, node) in nodes.iter().enumerate() {
                match node {
                    Node::Text(text) => {
                        for (offset, ch) in text.chars().enumerate() {
                            if ch == PLACEHOLDER {
                                continue;
                            }
                            out.push(FlatPos {
                                caret: Caret::new(path.child(idx), offset),
                                ch,
                            });
                        }
                    }
                    Node::LineBreak => out.push(FlatPos {
                        caret: Caret::new(path.clone(), idx),
                        ch: '\n',
                    }),
                    Node::Element(el) => {
                        path.push(idx);
                        walk(&el.children, path, out);
                        path.pop();
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &mut NodePath::root(), &mut out);
        out
    }

    pub fn linear_of(&self, caret: &Caret) -> usize {
        self.flat_positions()
            .iter()
            .take_while(|pos| pos.caret.order(caret) == Ordering::Less)
            .count()
    }

    pub fn caret_at_linear(&self, linear: usize) -> Caret {
        let flat = self.flat_positions();
        match flat.get(linear) {
            Some(pos) => pos.caret.clone(),
            None => self.end_caret(),
        }
    }
}

pub fn nodes_plain_text(nodes: &[Node]) -> String {
    fn push_plain(nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.extend(text.chars().filter(|ch| *ch != PLACEHOLDER)),
                Node::LineBreak => out.push('\n'),
                Node::Element(el) => {
                    push_plain(&el.children, out);
                    if el.kind.is_block() {
                        out.push('\n');
                    }
                }
            }
        }
    }
    let mut out = String::new();
    push_plain(nodes, &mut out);
    out
}

/// Merges adjacent text runs and drops empty runs and empty wrappers,
/// recursively. Placeholder-bearing wrappers survive: their run is not
/// empty.
pub fn normalize(nodes: &mut Vec<Node>) {
    let mut idx = 0;
    while idx < nodes.len() {
        if let Node::Element(el) = &mut nodes[idx] {
            normalize(&mut el.children);
        }
        let empty = match &nodes[idx] {
            Node::Text(text) => text.is_empty(),
            Node::Element(el) => el.children.is_empty(),
            Node::LineBreak => false,
        };
        if empty {
            nodes.remove(idx);
        } else {
            idx += 1;
        }
    }

    let mut i = 0;
    while i + 1 < nodes.len() {
        if matches!(
            (&nodes[i], &nodes[i + 1]),
            (Node::Text(_), Node::Text(_))
        ) {
            if let Node::Text(right) = nodes.remove(i + 1) {
                if let Node::Text(left) = &mut nodes[i] {
                    left.push_str(&right);
                }
            }
        } else {
            i += 1;
        }
    }
}

/// Splits a child list along a descent path at an offset, returning
/// the detached trailing nodes. Empty remainders created by the split
/// are dropped right away so the boundary index stays meaningful.
pub(crate) fn split_children(children: &mut Vec<Node>, path: &[usize], offset: usize) -> Vec<Node> {
    if path.is_empty() {
        let at = offset.min(children.len());
        return children.split_off(at);
    }
    let idx = path[0];
    if idx >= children.len() {
        return Vec::new();
    }
    let mut trailing = children.split_off(idx + 1);
    let mut carried: Option<Node> = None;
    let mut keep_head = true;
    match &mut children[idx] {
        Node::Text(text) => {
            if path.len() == 1 {
                let at = char_to_byte_idx(text, offset);
                let right = text.split_off(at);
                if !right.is_empty() {
                    carried = Some(Node::Text(right));
                }
                keep_head = !text.is_empty();
            }
        }
        Node::LineBreak => {
            if path.len() == 1 && offset == 0 {
                keep_head = false;
                carried = Some(Node::LineBreak);
            }
        }
        Node::Element(el) => {
            let tail = if path.len() == 1 {
                let at = offset.min(el.children.len());
                el.children.split_off(at)
            } else {
                split_children(&mut el.children, &path[1..], offset)
            };
            if !tail.is_empty() {
                carried = Some(Node::Element(Element::new(el.kind, tail)));
            }
            keep_head = !el.children.is_empty();
        }
    }
    if let Some(node) = carried {
        trailing.insert(0, node);
    }
    if !keep_head {
        children.pop();
    }
    trailing
}
