//! Serialized form of the document tree: a minimal HTML-like markup
//! used by the persistence layer. Parsing is lenient by contract --
//! any input is accepted, worst case as opaque text.

use super::tree::{normalize, DocumentTree, ElementKind, Node};

pub fn to_markup(tree: &DocumentTree) -> String {
    let mut out = String::new();
    write_nodes(&tree.children, &mut out);
    out
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => escape_into(text, out),
            Node::LineBreak => out.push_str("<br>"),
            Node::Element(el) => {
                let tag = tag_name(el.kind);
                out.push('<');
                out.push_str(tag);
                out.push('>');
                write_nodes(&el.children, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn tag_name(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Bold => "b",
        ElementKind::Italic => "i",
        ElementKind::Underline => "u",
        ElementKind::Heading => "h2",
        ElementKind::Paragraph => "p",
    }
}

fn kind_for_tag(name: &str) -> Option<ElementKind> {
    match name {
        "b" | "strong" => Some(ElementKind::Bold),
        "i" | "em" => Some(ElementKind::Italic),
        "u" => Some(ElementKind::Underline),
        "h1" | "h2" | "h3" => Some(ElementKind::Heading),
        "p" => Some(ElementKind::Paragraph),
        _ => None,
    }
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Parses markup back into a tree. Unknown tags are skipped, stray
/// closing tags ignored, unterminated tags and unrecognized entities
/// kept as literal text. Never fails.
pub fn parse_markup(input: &str) -> DocumentTree {
    let mut parser = Parser::default();
    let mut pos = 0;
    while pos < input.len() {
        let rest = &input[pos..];
        if rest.starts_with('<') {
            if let Some(end) = rest[1..].find('>') {
                parser.handle_tag(&rest[1..1 + end]);
                pos += end + 2;
                continue;
            }
            parser.text.push('<');
            pos += 1;
            continue;
        }
        if rest.starts_with('&') {
            if let Some((decoded, len)) = decode_entity(rest) {
                parser.text.push(decoded);
                pos += len;
                continue;
            }
            parser.text.push('&');
            pos += 1;
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        parser.text.push(ch);
        pos += ch.len_utf8();
    }
    parser.finish()
}

fn decode_entity(rest: &str) -> Option<(char, usize)> {
    const ENTITIES: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&#39;", '\''),
        ("&nbsp;", ' '),
    ];
    ENTITIES
        .iter()
        .find(|(name, _)| rest.starts_with(name))
        .map(|(name, ch)| (*ch, name.len()))
}

#[derive(Default)]
struct Parser {
    root: Vec<Node>,
    stack: Vec<(ElementKind, Vec<Node>)>,
    text: String,
}

impl Parser {
    fn handle_tag(&mut self, raw: &str) {
        let body = raw.trim().trim_end_matches('/').trim();
        if let Some(closer) = body.strip_prefix('/') {
            let name = closer.trim().to_ascii_lowercase();
            let Some(kind) = kind_for_tag(&name) else {
                return;
            };
            let Some(open_at) = self.stack.iter().rposition(|(k, _)| *k == kind) else {
                return;
            };
            self.flush_text();
            // Implicitly closes anything opened inside the match.
            while self.stack.len() > open_at {
                self.close_frame();
            }
            return;
        }
        let name = body
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name == "br" {
            self.flush_text();
            self.push_node(Node::LineBreak);
            return;
        }
        if let Some(kind) = kind_for_tag(&name) {
            self.flush_text();
            self.stack.push((kind, Vec::new()));
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        self.push_node(Node::Text(text));
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.root.push(node),
        }
    }

    fn close_frame(&mut self) {
        if let Some((kind, children)) = self.stack.pop() {
            self.push_node(Node::element(kind, children));
        }
    }

    fn finish(mut self) -> DocumentTree {
        self.flush_text();
        while !self.stack.is_empty() {
            self.close_frame();
        }
        let mut children = self.root;
        normalize(&mut children);
        DocumentTree::from_nodes(children)
    }
}
