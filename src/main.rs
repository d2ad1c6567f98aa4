use std::{
    env, fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::Text,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info};

use scribe_tui::assistant;
use scribe_tui::editor::{EditorSession, FormatKind, Selection};
use scribe_tui::render::{self, render_document, CursorVisualPosition};
use scribe_tui::storage::{export_content, DocumentStore, DocumentSummary, ExportFormat};
use scribe_tui::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const AUTOSAVE_ID: &str = "autosave";
const DEFAULT_TITLE: &str = "Untitled Document";

fn main() -> Result<()> {
    let _log_guard = scribe_tui::logging::init(None)
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;
    run()
}

fn run() -> Result<()> {
    let doc_id = env::args().nth(1);
    let store = DocumentStore::open(data_dir()).context("failed to open document store")?;
    let mut app = App::new(store, doc_id);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn data_dir() -> PathBuf {
    if let Ok(dir) = env::var("SCRIBE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scribe")
        .join("documents")
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt);
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Format(FormatKind),
    Save,
    OpenList,
    Export,
    Grammar,
    Style,
    Ideas,
    Quit,
}

struct KeyBinding {
    modifiers: KeyModifiers,
    code: KeyCode,
    command: Command,
}

fn ctrl(ch: char, command: Command) -> KeyBinding {
    KeyBinding {
        modifiers: KeyModifiers::CONTROL,
        code: KeyCode::Char(ch),
        command,
    }
}

fn default_bindings() -> Vec<KeyBinding> {
    vec![
        ctrl('b', Command::Format(FormatKind::Bold)),
        ctrl('i', Command::Format(FormatKind::Italic)),
        ctrl('u', Command::Format(FormatKind::Underline)),
        ctrl('t', Command::Format(FormatKind::Heading)),
        ctrl('s', Command::Save),
        ctrl('o', Command::OpenList),
        ctrl('e', Command::Export),
        ctrl('g', Command::Grammar),
        ctrl('r', Command::Style),
        ctrl('n', Command::Ideas),
        ctrl('q', Command::Quit),
    ]
}

struct AssistantPanel {
    title: String,
    lines: Vec<String>,
}

enum Mode {
    Edit,
    DocumentList {
        entries: Vec<DocumentSummary>,
        state: ListState,
    },
}

/// Cursor and caret map of the most recently drawn frame, kept for
/// vertical movement and line-edge jumps.
struct FrameMap {
    cursor: Option<CursorVisualPosition>,
    caret_map: Vec<Vec<(u16, scribe_tui::editor::Caret)>>,
}

struct App {
    session: EditorSession,
    store: DocumentStore,
    theme: Theme,
    bindings: Vec<KeyBinding>,
    doc_id: String,
    doc_title: String,
    status: Option<(String, Instant)>,
    panel: Option<AssistantPanel>,
    mode: Mode,
    frame_map: Option<FrameMap>,
    scroll: usize,
    should_quit: bool,
}

impl App {
    fn new(store: DocumentStore, doc_id: Option<String>) -> Self {
        let mut app = Self {
            session: EditorSession::new(),
            store,
            theme: Theme::default(),
            bindings: default_bindings(),
            doc_id: AUTOSAVE_ID.to_string(),
            doc_title: DEFAULT_TITLE.to_string(),
            status: None,
            panel: None,
            mode: Mode::Edit,
            frame_map: None,
            scroll: 0,
            should_quit: false,
        };
        let requested = doc_id.unwrap_or_else(|| AUTOSAVE_ID.to_string());
        match app.store.load(&requested) {
            Ok(doc) => {
                app.session.load_markup(&doc.content);
                app.doc_id = doc.id;
                app.doc_title = doc.title;
            }
            Err(err) => {
                info!(id = %requested, %err, "starting with an empty document");
                app.doc_id = requested;
                app.set_status("New document");
            }
        }
        app
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn on_tick(&mut self) {
        if let Some((_, since)) = &self.status {
            if since.elapsed() >= STATUS_TIMEOUT {
                self.status = None;
            }
        }
    }

    /// Persists the serialized tree under the current id. Fire and
    /// forget: failures are logged and surfaced as a status line.
    fn autosave(&mut self) {
        let markup = self.session.to_markup();
        if let Err(err) = self.store.save(Some(&self.doc_id), &self.doc_title, &markup) {
            error!(%err, "autosave failed");
            self.set_status(format!("Autosave failed: {err}"));
        }
    }

    fn handle_event(&mut self, evt: Event) {
        let Event::Key(key) = evt else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if matches!(self.mode, Mode::Edit) {
            self.handle_edit_key(key);
        } else {
            self.handle_list_key(key);
        }
        // The moral equivalent of the mouseup/keyup/focus listeners:
        // every processed event refreshes the tracked selection.
        self.session.track_selection();
    }

    fn command_for(&self, key: &KeyEvent) -> Option<Command> {
        self.bindings
            .iter()
            .find(|binding| binding.code == key.code && key.modifiers.contains(binding.modifiers))
            .map(|binding| binding.command)
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if let Some(command) = self.command_for(&key) {
            self.run_command(command);
            return;
        }
        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.session.insert_char(ch) {
                    self.autosave();
                }
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                if self.session.insert_paragraph_break() {
                    self.autosave();
                }
            }
            KeyCode::Enter => {
                if self.session.insert_line_break() {
                    self.autosave();
                }
            }
            KeyCode::Backspace => {
                if self.session.backspace() {
                    self.autosave();
                }
            }
            KeyCode::Left => {
                self.session.move_left(extend);
            }
            KeyCode::Right => {
                self.session.move_right(extend);
            }
            KeyCode::Up => self.move_vertical(true, extend),
            KeyCode::Down => self.move_vertical(false, extend),
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.move_to_start(extend);
            }
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.session.move_to_end(extend);
            }
            KeyCode::Home => self.move_line_edge(true, extend),
            KeyCode::End => self.move_line_edge(false, extend),
            KeyCode::Esc => {
                // Closing the panel hands focus back to the editor.
                if self.panel.take().is_some() {
                    self.session.restore_selection();
                }
            }
            _ => {}
        }
    }

    fn run_command(&mut self, command: Command) {
        match command {
            Command::Format(kind) => {
                if self.session.apply_format(kind) {
                    self.autosave();
                    self.set_status(format!("{} applied", kind.label()));
                } else {
                    self.set_status(format!("{}: nothing to format", kind.label()));
                }
            }
            Command::Save => match self.store.save(
                Some(&self.doc_id),
                &self.doc_title,
                &self.session.to_markup(),
            ) {
                Ok(doc) => {
                    info!(id = %doc.id, "document saved");
                    self.set_status(format!("Saved {}", doc.id));
                }
                Err(err) => self.set_status(format!("Save failed: {err}")),
            },
            Command::OpenList => match self.store.list() {
                Ok(entries) => {
                    let mut state = ListState::default();
                    if !entries.is_empty() {
                        state.select(Some(0));
                    }
                    self.mode = Mode::DocumentList { entries, state };
                }
                Err(err) => self.set_status(format!("Listing failed: {err}")),
            },
            Command::Export => self.export_document(),
            Command::Grammar => {
                let report = assistant::check_grammar(&self.session.plain_text());
                let mut lines: Vec<String> = report
                    .issues
                    .iter()
                    .map(|issue| format!("{} (at character {})", issue.message, issue.position))
                    .collect();
                lines.extend(report.suggestions);
                if lines.is_empty() {
                    lines.push("No issues found.".to_string());
                }
                self.panel = Some(AssistantPanel {
                    title: "Grammar".to_string(),
                    lines,
                });
            }
            Command::Style => {
                let mut lines = assistant::style_suggestions(&self.session.plain_text());
                if lines.is_empty() {
                    lines.push("No suggestions.".to_string());
                }
                self.panel = Some(AssistantPanel {
                    title: "Style".to_string(),
                    lines,
                });
            }
            Command::Ideas => {
                let lines = assistant::writing_ideas(&self.session.plain_text(), "");
                self.panel = Some(AssistantPanel {
                    title: "Ideas".to_string(),
                    lines,
                });
            }
            Command::Quit => {
                self.autosave();
                self.should_quit = true;
            }
        }
    }

    fn export_document(&mut self) {
        let content = self.session.plain_text();
        let export_dir = self.store.data_dir().join("exports");
        if let Err(err) = fs::create_dir_all(&export_dir) {
            self.set_status(format!("Export failed: {err}"));
            return;
        }
        for format in [ExportFormat::Text, ExportFormat::Html, ExportFormat::Markdown] {
            let wrapped = export_content(&content, format);
            let path = export_dir.join(format!("{}.{}", self.doc_id, format.extension()));
            if let Err(err) = fs::write(&path, wrapped) {
                self.set_status(format!("Export failed: {err}"));
                return;
            }
        }
        self.set_status(format!("Exported to {}", export_dir.display()));
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let Mode::DocumentList { entries, state } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.mode = Mode::Edit,
            KeyCode::Up => {
                let len = entries.len();
                if len > 0 {
                    let current = state.selected().unwrap_or(0);
                    state.select(Some(current.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                let len = entries.len();
                if len > 0 {
                    let current = state.selected().unwrap_or(0);
                    state.select(Some((current + 1).min(len - 1)));
                }
            }
            KeyCode::Enter => {
                let selected = state.selected().and_then(|idx| entries.get(idx)).cloned();
                self.mode = Mode::Edit;
                if let Some(summary) = selected {
                    self.open_document(&summary.id);
                }
            }
            KeyCode::Delete => {
                let selected = state.selected().and_then(|idx| entries.get(idx)).cloned();
                if let Some(summary) = selected {
                    match self.store.delete(&summary.id) {
                        Ok(()) => self.set_status(format!("Deleted {}", summary.id)),
                        Err(err) => self.set_status(format!("Delete failed: {err}")),
                    }
                    match self.store.list() {
                        Ok(entries) => {
                            let mut state = ListState::default();
                            if !entries.is_empty() {
                                state.select(Some(0));
                            }
                            self.mode = Mode::DocumentList { entries, state };
                        }
                        Err(_) => self.mode = Mode::Edit,
                    }
                }
            }
            _ => {}
        }
    }

    fn open_document(&mut self, id: &str) {
        match self.store.load(id) {
            Ok(doc) => {
                self.session.load_markup(&doc.content);
                self.doc_id = doc.id;
                self.doc_title = doc.title;
                self.scroll = 0;
                self.set_status(format!("Opened {}", self.doc_id));
            }
            Err(err) => self.set_status(format!("Open failed: {err}")),
        }
    }

    fn move_vertical(&mut self, up: bool, extend: bool) {
        let Some(frame) = &self.frame_map else {
            return;
        };
        let Some(cursor) = frame.cursor else {
            return;
        };
        let target = if up {
            match cursor.line.checked_sub(1) {
                Some(line) => line,
                None => return,
            }
        } else {
            cursor.line + 1
        };
        if let Some(caret) = render::caret_near(&frame.caret_map, target, cursor.column, !up) {
            self.apply_focus(caret, extend);
        }
    }

    fn move_line_edge(&mut self, start: bool, extend: bool) {
        let Some(frame) = &self.frame_map else {
            return;
        };
        let Some(cursor) = frame.cursor else {
            return;
        };
        let Some(row) = frame.caret_map.get(cursor.line) else {
            return;
        };
        let entry = if start { row.first() } else { row.last() };
        if let Some((_, caret)) = entry {
            self.apply_focus(caret.clone(), extend);
        }
    }

    fn apply_focus(&mut self, focus: scribe_tui::editor::Caret, extend: bool) {
        let anchor = if extend {
            self.session
                .selection()
                .map(|sel| sel.anchor.clone())
                .unwrap_or_else(|| focus.clone())
        } else {
            focus.clone()
        };
        self.session.set_selection(Selection::new(anchor, focus));
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());
        let (editor_area, panel_area) = if self.panel.is_some() {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
                .split(chunks[0]);
            (halves[0], Some(halves[1]))
        } else {
            (chunks[0], None)
        };

        let result = render_document(
            self.session.tree(),
            editor_area.width as usize,
            self.session.selection(),
            &self.theme,
        );

        if let Some(cursor) = result.cursor {
            let height = editor_area.height as usize;
            if cursor.line < self.scroll {
                self.scroll = cursor.line;
            } else if height > 0 && cursor.line >= self.scroll + height {
                self.scroll = cursor.line + 1 - height;
            }
            let y = cursor.line.saturating_sub(self.scroll);
            if y < height {
                frame.set_cursor_position(Position {
                    x: editor_area.x + cursor.column,
                    y: editor_area.y + y as u16,
                });
            }
        }

        let paragraph = Paragraph::new(Text::from(result.lines.clone()))
            .style(self.theme.text_style())
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, editor_area);

        if let (Some(panel), Some(area)) = (&self.panel, panel_area) {
            let text: Vec<ratatui::text::Line> = panel
                .lines
                .iter()
                .map(|line| ratatui::text::Line::from(line.clone()))
                .collect();
            let widget = Paragraph::new(Text::from(text)).wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(ratatui::style::Style::default().fg(self.theme.panel_border_fg))
                    .title(panel.title.clone()),
            );
            frame.render_widget(widget, area);
        }

        self.draw_status_bar(frame, chunks[1]);

        if let Mode::DocumentList { entries, state } = &mut self.mode {
            let area = centered_rect(60, 60, frame.area());
            frame.render_widget(Clear, area);
            let items: Vec<ListItem> = if entries.is_empty() {
                vec![ListItem::new("(no saved documents)")]
            } else {
                entries
                    .iter()
                    .map(|entry| {
                        ListItem::new(format!(
                            "{}  {}  {}",
                            entry.id,
                            entry.title,
                            entry.updated_at.format("%Y-%m-%d %H:%M")
                        ))
                    })
                    .collect()
            };
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Open Document"),
                )
                .style(
                    ratatui::style::Style::default()
                        .fg(self.theme.menu_fg)
                        .bg(self.theme.menu_bg),
                )
                .highlight_style(
                    ratatui::style::Style::default().bg(self.theme.menu_selection_bg),
                );
            frame.render_stateful_widget(list, area, state);
        }

        self.frame_map = Some(FrameMap {
            cursor: result.cursor,
            caret_map: result.caret_map,
        });
    }

    fn draw_status_bar(&self, frame: &mut Frame, area: Rect) {
        let words = self.session.word_count();
        let chars = self.session.char_count();
        let left = match &self.status {
            Some((message, _)) => message.clone(),
            None => format!("{} [{}]", self.doc_title, self.doc_id),
        };
        let right = format!("{words} words  {chars} chars");
        let width = area.width as usize;
        let gap = width
            .saturating_sub(left.chars().count())
            .saturating_sub(right.chars().count());
        let line = format!("{left}{}{right}", " ".repeat(gap));
        let bar = Paragraph::new(line).style(self.theme.status_bar_style());
        frame.render_widget(bar, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
