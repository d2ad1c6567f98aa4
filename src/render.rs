use std::cmp::Ordering;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::editor::{Caret, DocumentTree, ElementKind, Node, NodePath, Selection, PLACEHOLDER};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    /// Caret boundaries per visual line, used for vertical movement
    /// and click targeting.
    pub caret_map: Vec<Vec<(u16, Caret)>>,
}

/// The caret on `line` closest to the wanted column, searching nearby
/// lines in the given vertical direction when the line has no
/// positions (blank separators).
pub fn caret_near(
    caret_map: &[Vec<(u16, Caret)>],
    line: usize,
    column: u16,
    step_down: bool,
) -> Option<Caret> {
    let mut current = line;
    loop {
        if let Some(row) = caret_map.get(current) {
            if let Some((_, caret)) = row.iter().min_by_key(|(col, _)| col.abs_diff(column)) {
                return Some(caret.clone());
            }
        }
        if step_down {
            current = current.checked_add(1).filter(|next| *next < caret_map.len())?;
        } else {
            current = current.checked_sub(1)?;
        }
    }
}

pub fn render_document(
    tree: &DocumentTree,
    width: usize,
    selection: Option<&Selection>,
    theme: &Theme,
) -> RenderResult {
    let mut renderer = Renderer::new(width.max(1) as u16, selection, theme);
    let mut path = NodePath::root();
    renderer.render_nodes(&tree.children, theme.text_style(), &mut path);
    renderer.finish()
}

struct Renderer<'a> {
    wrap_width: u16,
    theme: &'a Theme,
    focus: Option<Caret>,
    range: Option<(Caret, Caret)>,
    lines: Vec<Line<'static>>,
    caret_map: Vec<Vec<(u16, Caret)>>,
    current_row: Vec<(u16, Caret)>,
    spans: Vec<Span<'static>>,
    run: String,
    run_style: Style,
    col: u16,
    cursor: Option<CursorVisualPosition>,
    last_caret: Option<Caret>,
}

impl<'a> Renderer<'a> {
    fn new(wrap_width: u16, selection: Option<&Selection>, theme: &'a Theme) -> Self {
        let focus = selection.map(|sel| sel.focus.clone());
        let range = selection
            .filter(|sel| !sel.is_collapsed())
            .map(Selection::ordered);
        Self {
            wrap_width,
            theme,
            focus,
            range,
            lines: Vec::new(),
            caret_map: Vec::new(),
            current_row: Vec::new(),
            spans: Vec::new(),
            run: String::new(),
            run_style: Style::default(),
            col: 0,
            cursor: None,
            last_caret: None,
        }
    }

    fn render_nodes(&mut self, nodes: &[Node], style: Style, path: &mut NodePath) {
        for (idx, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(text) => {
                    for (offset, ch) in text.chars().enumerate() {
                        if ch == PLACEHOLDER {
                            continue;
                        }
                        self.push_char(ch, style, Caret::new(path.child(idx), offset));
                    }
                }
                Node::LineBreak => self.line_break(Caret::new(path.clone(), idx)),
                Node::Element(el) if el.kind.is_block() => {
                    self.break_line_if_content();
                    if !self.at_document_start() {
                        self.blank_line();
                    }
                    let block_style = if el.kind == ElementKind::Heading {
                        style
                            .fg(self.theme.heading_fg)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        style
                    };
                    path.push(idx);
                    self.render_nodes(&el.children, block_style, path);
                    path.pop();
                    self.break_line_if_content();
                }
                Node::Element(el) => {
                    let inline_style = match el.kind {
                        ElementKind::Bold => style.add_modifier(Modifier::BOLD),
                        ElementKind::Italic => style.add_modifier(Modifier::ITALIC),
                        ElementKind::Underline => style.add_modifier(Modifier::UNDERLINED),
                        _ => style,
                    };
                    path.push(idx);
                    self.render_nodes(&el.children, inline_style, path);
                    path.pop();
                }
            }
        }
    }

    fn push_char(&mut self, ch: char, style: Style, caret: Caret) {
        let width = UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
        if self.col > 0 && self.col + width > self.wrap_width {
            self.newline();
        }
        self.note_boundary(caret.clone());
        let style = if self.is_selected(&caret) {
            style.patch(self.theme.selection_style())
        } else {
            style
        };
        if style != self.run_style {
            self.flush_run();
            self.run_style = style;
        }
        self.run.push(ch);
        self.col += width;
        self.last_caret = Some(caret);
    }

    fn line_break(&mut self, caret: Caret) {
        self.note_boundary(caret.clone());
        self.last_caret = Some(caret);
        self.newline();
    }

    fn note_boundary(&mut self, caret: Caret) {
        if self.cursor.is_none() {
            if let Some(focus) = &self.focus {
                if focus.order(&caret) != Ordering::Greater {
                    self.cursor = Some(CursorVisualPosition {
                        line: self.lines.len(),
                        column: self.col,
                    });
                }
            }
        }
        self.current_row.push((self.col, caret));
    }

    fn is_selected(&self, caret: &Caret) -> bool {
        match &self.range {
            Some((start, end)) => {
                start.order(caret) != Ordering::Greater && caret.order(end) == Ordering::Less
            }
            None => false,
        }
    }

    fn newline(&mut self) {
        if let Some(last) = self.last_caret.take() {
            let after = Caret::new(last.path.clone(), last.offset + 1);
            self.note_boundary(after);
        }
        self.flush_run();
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
        self.caret_map.push(std::mem::take(&mut self.current_row));
        self.col = 0;
    }

    fn flush_run(&mut self) {
        if self.run.is_empty() {
            return;
        }
        let run = std::mem::take(&mut self.run);
        self.spans.push(Span::styled(run, self.run_style));
    }

    fn at_document_start(&self) -> bool {
        self.lines.is_empty() && self.line_is_empty()
    }

    fn line_is_empty(&self) -> bool {
        self.col == 0 && self.run.is_empty() && self.spans.is_empty() && self.current_row.is_empty()
    }

    fn break_line_if_content(&mut self) {
        if !self.line_is_empty() {
            self.newline();
        }
    }

    fn blank_line(&mut self) {
        self.newline();
    }

    fn finish(mut self) -> RenderResult {
        let end = CursorVisualPosition {
            line: self.lines.len(),
            column: self.col,
        };
        self.newline();
        let cursor = Some(self.cursor.unwrap_or(end));
        let total_lines = self.lines.len();
        RenderResult {
            lines: self.lines,
            cursor,
            total_lines,
            caret_map: self.caret_map,
        }
    }
}
