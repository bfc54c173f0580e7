//! Terminal viewer: edit a buffer while the context panel and the directive
//! overlay follow the cursor.

use std::io::{Stdout, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use spellbook_markup_config::{Config, DirectiveCatalog};
use spellbook_markup_engine::{
    ContextAssembler, Debouncer, DirectiveTemplate, FormatEdit, FormatEngine, FormatParams,
    FormattingContext, HighlightKind, HighlightSpan, Highlighter, Operation, Selection,
};

/// How long the loop waits for input when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

const FKEY_OPERATIONS: [(u8, Operation); 12] = [
    (1, Operation::Bold),
    (2, Operation::Italic),
    (3, Operation::InlineCode),
    (4, Operation::Link),
    (5, Operation::Image),
    (6, Operation::Header1),
    (7, Operation::Header2),
    (8, Operation::Header3),
    (9, Operation::OrderedList),
    (10, Operation::UnorderedList),
    (11, Operation::CodeBlock),
    (12, Operation::Directive),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refresh {
    Context,
    Highlight,
}

struct App {
    path: PathBuf,
    text: String,
    cursor: usize,
    anchor: Option<usize>,
    assembler: ContextAssembler,
    engine: FormatEngine,
    highlighter: Highlighter,
    context: FormattingContext,
    context_refresh: Debouncer<Refresh>,
    highlight_refresh: Debouncer<Refresh>,
    catalog: DirectiveCatalog,
    catalog_index: Option<usize>,
    last_directive: Option<DirectiveTemplate>,
    status: String,
    dirty: bool,
    scroll: u16,
    should_quit: bool,
}

impl App {
    fn new(path: PathBuf, text: String, config: &Config, catalog: DirectiveCatalog) -> Self {
        let assembler = ContextAssembler::new(config.context.clone());
        let context = assembler.context(&text, Selection::cursor(0));
        let mut highlighter = Highlighter::new();
        highlighter.update(&text);

        Self {
            path,
            text,
            cursor: 0,
            anchor: None,
            assembler,
            engine: FormatEngine::new(config.format.clone()),
            highlighter,
            context,
            context_refresh: Debouncer::new(config.timing.context_debounce()),
            highlight_refresh: Debouncer::new(config.timing.highlight_debounce()),
            catalog,
            catalog_index: None,
            last_directive: None,
            status: String::new(),
            dirty: false,
            scroll: 0,
            should_quit: false,
        }
    }

    fn selection(&self) -> Selection {
        Selection::new(self.anchor.unwrap_or(self.cursor), self.cursor)
    }

    fn selected_directive(&self) -> Option<&DirectiveTemplate> {
        self.catalog_index
            .and_then(|i| self.catalog.directives.get(i))
    }

    fn cycle_directive(&mut self) {
        let count = self.catalog.directives.len();
        self.catalog_index = match self.catalog_index {
            None if count > 0 => Some(0),
            Some(i) if i + 1 < count => Some(i + 1),
            _ => None,
        };
        self.status = match self.selected_directive() {
            Some(template) => format!("Directive: {}", template.name),
            None => format!(
                "Directive: {} (default)",
                self.engine.options().default_directive
            ),
        };
    }

    fn text_changed(&mut self, now: Instant) {
        self.dirty = true;
        self.context_refresh.schedule(Refresh::Context, now);
        self.highlight_refresh.schedule(Refresh::Highlight, now);
    }

    fn cursor_moved(&mut self, now: Instant) {
        self.context_refresh.schedule(Refresh::Context, now);
    }

    /// Runs whatever refresh has come due.
    fn tick(&mut self, now: Instant) {
        if self.context_refresh.poll(now).is_some() {
            self.context = self.assembler.context(&self.text, self.selection());
        }
        if self.highlight_refresh.poll(now).is_some() {
            self.highlighter.update(&self.text);
        }
    }

    fn poll_timeout(&self, now: Instant) -> Duration {
        [
            self.context_refresh.time_left(now),
            self.highlight_refresh.time_left(now),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(IDLE_POLL)
    }

    fn set_edit(&mut self, edit: FormatEdit, now: Instant) {
        self.text = edit.text;
        self.cursor = edit.selection.end;
        self.anchor = (!edit.selection.is_collapsed()).then_some(edit.selection.start);
        self.text_changed(now);
    }

    fn apply(&mut self, operation: Operation, now: Instant) -> bool {
        let params = FormatParams {
            url: None,
            directive: self.selected_directive().cloned(),
            last_directive: self.last_directive.clone(),
        };

        match self
            .engine
            .apply(&self.text, self.selection(), operation, &params)
        {
            Ok(edit) => {
                if operation == Operation::Directive {
                    self.last_directive = Some(params.directive.unwrap_or_else(|| {
                        DirectiveTemplate::new(self.engine.options().default_directive.clone())
                    }));
                }
                self.set_edit(edit, now);
                self.status = format!("Applied {operation}");
                true
            }
            Err(reason) => {
                log::debug!("{reason}");
                self.status = reason.to_string();
                false
            }
        }
    }

    fn insert(&mut self, s: &str, now: Instant) {
        let sel = self.selection();
        self.text.replace_range(sel.start..sel.end, s);
        self.cursor = sel.start + s.len();
        self.anchor = None;
        self.text_changed(now);
    }

    fn delete(&mut self, forward: bool, now: Instant) {
        let sel = self.selection();
        let range = if !sel.is_collapsed() {
            sel.start..sel.end
        } else if forward {
            sel.start..next_char(&self.text, sel.start)
        } else {
            prev_char(&self.text, sel.start)..sel.start
        };
        if range.is_empty() {
            return;
        }
        self.cursor = range.start;
        self.text.replace_range(range, "");
        self.anchor = None;
        self.text_changed(now);
    }

    fn move_to(&mut self, target: usize, extend: bool, now: Instant) {
        if !extend {
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
        self.cursor = target;
        self.cursor_moved(now);
    }

    fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, &self.text)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.dirty = false;
        self.status = format!("Saved {}", self.path.display());
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => {
                if let Err(e) = self.save() {
                    log::warn!("{e:#}");
                    self.status = format!("{e:#}");
                }
            }
            KeyCode::Char('b') if ctrl => {
                self.apply(Operation::Bold, now);
            }
            KeyCode::Char('e') if ctrl => {
                self.apply(Operation::InlineCode, now);
            }
            KeyCode::Char('k') if ctrl => {
                self.apply(Operation::Link, now);
            }
            KeyCode::Char('r') if ctrl => {
                self.apply(Operation::QuickInsertDirective, now);
            }
            KeyCode::Char('d') if ctrl => self.cycle_directive(),
            KeyCode::F(n) => {
                if let Some((_, op)) = FKEY_OPERATIONS.iter().find(|(f, _)| *f == n) {
                    self.apply(*op, now);
                }
            }
            KeyCode::Esc => {
                if self.anchor.take().is_some() {
                    self.cursor_moved(now);
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Enter => {
                if !self.apply(Operation::ContinueList, now) {
                    self.status.clear();
                    self.insert("\n", now);
                }
            }
            KeyCode::Tab => self.insert("    ", now),
            KeyCode::Backspace => self.delete(false, now),
            KeyCode::Delete => self.delete(true, now),
            KeyCode::Left => self.move_to(prev_char(&self.text, self.cursor), shift, now),
            KeyCode::Right => self.move_to(next_char(&self.text, self.cursor), shift, now),
            KeyCode::Up => self.move_to(vertical(&self.text, self.cursor, false), shift, now),
            KeyCode::Down => self.move_to(vertical(&self.text, self.cursor, true), shift, now),
            KeyCode::Home => self.move_to(line_start(&self.text, self.cursor), shift, now),
            KeyCode::End => self.move_to(line_end(&self.text, self.cursor), shift, now),
            KeyCode::Char(c) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf), now);
            }
            _ => {}
        }
    }
}

fn prev_char(text: &str, i: usize) -> usize {
    text[..i].char_indices().next_back().map_or(0, |(j, _)| j)
}

fn next_char(text: &str, i: usize) -> usize {
    text[i..].chars().next().map_or(i, |c| i + c.len_utf8())
}

fn line_start(text: &str, i: usize) -> usize {
    text[..i].rfind('\n').map_or(0, |nl| nl + 1)
}

fn line_end(text: &str, i: usize) -> usize {
    text[i..].find('\n').map_or(text.len(), |nl| i + nl)
}

/// Byte offset `col` characters into the line starting at `start`, clamped
/// to the line end.
fn offset_at_column(text: &str, start: usize, col: usize) -> usize {
    let end = line_end(text, start);
    text[start..end]
        .char_indices()
        .nth(col)
        .map_or(end, |(j, _)| start + j)
}

/// Moves one line up or down, keeping the character column where possible.
fn vertical(text: &str, i: usize, down: bool) -> usize {
    let start = line_start(text, i);
    let col = text[start..i].chars().count();
    if down {
        let end = line_end(text, i);
        if end == text.len() {
            return text.len();
        }
        offset_at_column(text, end + 1, col)
    } else {
        if start == 0 {
            return 0;
        }
        offset_at_column(text, line_start(text, start - 1), col)
    }
}

/// Row and character column of `offset`.
fn row_col(text: &str, offset: usize) -> (usize, usize) {
    let start = line_start(text, offset);
    (
        text[..offset].matches('\n').count(),
        text[start..offset].chars().count(),
    )
}

fn kind_style(kind: HighlightKind) -> Style {
    match kind {
        HighlightKind::Plain => Style::default(),
        HighlightKind::SyntaxOpen => Style::default().fg(Color::Magenta),
        HighlightKind::Name => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        HighlightKind::Params => Style::default().fg(Color::Yellow),
        HighlightKind::SyntaxClose => Style::default().fg(Color::Magenta),
    }
}

/// Lines of `text` styled from the highlight spans, with the selection shown
/// reversed.
///
/// Spans may lag behind the text while a highlight refresh is pending, so
/// any boundary that no longer fits the text is ignored.
fn styled_lines(text: &str, spans: &[HighlightSpan], selection: Selection) -> Vec<Line<'static>> {
    let mut cuts: Vec<usize> = spans
        .iter()
        .flat_map(|s| [s.span.start, s.span.end])
        .chain([0, text.len(), selection.start, selection.end])
        .filter(|&b| b <= text.len() && text.is_char_boundary(b))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut lines = vec![Line::default()];
    let mut idx = 0;
    for w in cuts.windows(2) {
        let (a, b) = (w[0], w[1]);
        while idx < spans.len() && spans[idx].span.end <= a {
            idx += 1;
        }
        let kind = spans
            .get(idx)
            .filter(|s| s.span.start <= a)
            .map_or(HighlightKind::Plain, |s| s.kind);

        let mut style = kind_style(kind);
        if !selection.is_collapsed() && selection.start <= a && b <= selection.end {
            style = style.add_modifier(Modifier::REVERSED);
        }

        for (i, piece) in text[a..b].split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            if !piece.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.push_span(Span::styled(piece.to_string(), style));
            }
        }
    }
    lines
}

fn describe_context(ctx: &FormattingContext) -> Vec<String> {
    let mut block = Vec::new();
    if let Some(level) = ctx.header_level() {
        block.push(format!("heading {level}"));
    }
    if ctx.is_ordered_list {
        block.push("ordered list".to_string());
    }
    if ctx.is_unordered_list {
        block.push("bullet list".to_string());
    }
    if ctx.is_code_block {
        block.push("code block".to_string());
    }

    let inline: Vec<&str> = [
        (ctx.is_bold, "bold"),
        (ctx.is_italic, "italic"),
        (ctx.is_inline_code, "code"),
        (ctx.is_link, "link"),
        (ctx.is_image, "image"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();

    let directive = match &ctx.directive {
        Some(d) if d.is_within_opening_tag => format!("{} (editing opening tag)", d.block_name),
        Some(d) => format!(
            "{} (body offset {})",
            d.block_name,
            d.cursor_offset_in_content.unwrap_or_default()
        ),
        None => "none".to_string(),
    };

    vec![
        format!(
            "Selection {}..{}  line col {}",
            ctx.selection.start, ctx.selection.end, ctx.line.cursor_offset
        ),
        format!(
            "Block: {}",
            if block.is_empty() {
                "paragraph".to_string()
            } else {
                block.join(", ")
            }
        ),
        format!(
            "Inline: {}",
            if inline.is_empty() {
                "none".to_string()
            } else {
                inline.join(", ")
            }
        ),
        format!("Directive: {directive}"),
    ]
}

pub fn run(path: &Path, config: Config) -> Result<()> {
    let text = if path.exists() {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };
    let catalog = config.directive_catalog().unwrap_or_else(|e| {
        log::warn!("{e}");
        DirectiveCatalog::default()
    });
    let mut app = App::new(path.to_path_buf(), text, &config, catalog);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Instant::now());
        }
        app.tick(Instant::now());
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Keep the cursor row on screen
    let (row, col) = row_col(&app.text, app.cursor);
    let visible = chunks[0].height.saturating_sub(2).max(1) as usize;
    let row_u16 = u16::try_from(row).unwrap_or(u16::MAX);
    if row < app.scroll as usize {
        app.scroll = row_u16;
    } else if row >= app.scroll as usize + visible {
        app.scroll = u16::try_from(row + 1 - visible).unwrap_or(u16::MAX);
    }

    let title = format!(
        "{}{}",
        app.path.display(),
        if app.dirty { " [+]" } else { "" }
    );
    let editor = Paragraph::new(styled_lines(
        &app.text,
        app.highlighter.spans(),
        app.selection(),
    ))
    .block(Block::default().borders(Borders::ALL).title(title))
    .scroll((app.scroll, 0));
    f.render_widget(editor, chunks[0]);

    let x = chunks[0].x + 1 + u16::try_from(col).unwrap_or(u16::MAX);
    let y = chunks[0].y + 1 + row_u16.saturating_sub(app.scroll);
    f.set_cursor_position((x, y));

    let mut info: Vec<Line> = describe_context(&app.context)
        .into_iter()
        .map(Line::from)
        .collect();
    if !app.status.is_empty() {
        info.push(Line::from(Span::styled(
            app.status.clone(),
            Style::default().fg(Color::Green),
        )));
    }
    let panel = Paragraph::new(info).block(Block::default().borders(Borders::ALL).title("Context"));
    f.render_widget(panel, chunks[1]);

    let help = Line::from(vec![
        Span::raw("^S save | ^Q quit | "),
        Span::raw("F1-F5 bold/italic/code/link/image | F6-F8 H1-H3 | "),
        Span::raw("F9/F10 lists | F11 code block | F12 directive | ^D pick | ^R quick insert"),
    ]);
    f.render_widget(Paragraph::new(help), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spellbook_markup_engine::highlight_spans;

    fn app(text: &str) -> App {
        App::new(
            PathBuf::from("test.md"),
            text.to_string(),
            &Config::default(),
            DirectiveCatalog::default(),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vertical_motion_keeps_column() {
        let text = "abcd\nxy\nlonger";
        assert_eq!(vertical(text, 3, true), 7);
        assert_eq!(vertical(text, 7, true), 10);
        assert_eq!(vertical(text, 10, false), 7);
        assert_eq!(vertical(text, 2, false), 0);
        assert_eq!(vertical(text, 10, true), text.len());
    }

    #[test]
    fn char_motion_respects_multibyte() {
        let text = "aé";
        assert_eq!(next_char(text, 1), 3);
        assert_eq!(prev_char(text, 3), 1);
        assert_eq!(row_col("ab\néx", 5), (1, 1));
    }

    #[test]
    fn styled_lines_split_on_newlines() {
        let text = "{~ card ~}\nbody\n{~~}";
        let lines = styled_lines(text, &highlight_spans(text), Selection::cursor(0));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[1].content, "card");
        assert_eq!(lines[0].spans[1].style, kind_style(HighlightKind::Name));
        assert_eq!(lines[2].spans[0].style, kind_style(HighlightKind::SyntaxClose));
    }

    #[test]
    fn selection_is_reversed() {
        let text = "hello world";
        let lines = styled_lines(text, &highlight_spans(text), Selection::new(6, 11));
        assert_eq!(lines[0].spans[1].content, "world");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::REVERSED));
        assert!(!lines[0].spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn stale_spans_do_not_panic() {
        let old = "{~ é ~}";
        let spans = highlight_spans(old);
        let lines = styled_lines("é", &spans, Selection::cursor(0));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn context_refresh_is_debounced() {
        let mut app = app("plain");
        let t0 = Instant::now();
        app.move_to(5, false, t0);
        app.apply(Operation::Header1, t0);
        assert_eq!(app.text, "# plain");
        assert!(!app.context.is_header1);

        app.tick(t0 + Duration::from_millis(10));
        assert!(!app.context.is_header1);
        app.tick(t0 + Duration::from_millis(50));
        assert!(app.context.is_header1);
    }

    #[test]
    fn enter_continues_lists_and_falls_back_to_newline() {
        let mut app = app("- a");
        let t0 = Instant::now();
        app.move_to(3, false, t0);
        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.text, "- a\n- ");
        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.text, "- a\n");
        app.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(app.text, "- a\n\n");
    }

    #[test]
    fn quick_insert_reuses_last_directive() {
        let mut app = app("");
        let t0 = Instant::now();
        assert!(!app.apply(Operation::QuickInsertDirective, t0));
        assert!(app.apply(Operation::Directive, t0));
        assert_eq!(app.last_directive.as_ref().map(|d| d.name.as_str()), Some("SpellBlock"));
        assert_eq!(app.selection().slice(&app.text), "Content goes here");
    }

    #[test]
    fn typing_replaces_selection() {
        let mut app = app("hello");
        let t0 = Instant::now();
        app.move_to(5, true, t0);
        app.handle_key(key(KeyCode::Char('J')), t0);
        assert_eq!(app.text, "J");
        app.handle_key(key(KeyCode::Backspace), t0);
        assert_eq!(app.text, "");
    }

    #[test]
    fn describes_directive_body() {
        let text = "{~ card ~}Body{~~}";
        let ctx = spellbook_markup_engine::formatting_context(text, Selection::cursor(12));
        let lines = describe_context(&ctx);
        assert_eq!(lines[3], "Directive: card (body offset 2)");
        assert_eq!(lines[1], "Block: paragraph");
    }

    #[test]
    fn describes_link_under_cursor() {
        let text = "- see [docs](u)";
        let ctx = spellbook_markup_engine::formatting_context(text, Selection::cursor(8));
        let lines = describe_context(&ctx);
        assert_eq!(lines[1], "Block: bullet list");
        assert_eq!(lines[2], "Inline: link");
    }
}
