//! Explorer state and TUI event loop
//!
//! The explorer lists the visible rows of an [`ExplorerTree`], colors them
//! by strongly connected component and shows the interval of the selected
//! node in a side pane.

use std::io;
use std::ops::Range;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use super::tree::{ExplorerTree, FlattenedNode};

/// Guide columns drawn before deeper rows are elided.
const MAX_GUIDE_LEVELS: usize = 24;

/// Colors cycled through for multi-node components.
const COMPONENT_PALETTE: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Cyan,
    Color::Green,
    Color::Rgb(255, 165, 0),
    Color::Rgb(186, 85, 211),
];

/// Key hints shown in the status line
const KEY_HINTS: [(&str, &str); 8] = [
    ("/", "search"),
    ("j/k", "move"),
    ("d/u", "page"),
    ("g/G", "top/bottom"),
    ("enter", "toggle"),
    ("e/c", "expand/collapse all"),
    ("n", "next in component"),
    ("q", "quit"),
];

/// Window of rows that fits the list area
#[derive(Debug, Default, Clone, Copy)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    /// Scrolls just enough for `selected` to be visible and returns the
    /// rows to draw.
    pub fn follow(&mut self, selected: usize, total: usize) -> Range<usize> {
        if total == 0 || self.height == 0 {
            return 0..0;
        }
        if selected < self.offset {
            self.offset = selected;
        } else if selected >= self.offset + self.height {
            self.offset = selected + 1 - self.height;
        }
        self.offset = self.offset.min(total.saturating_sub(1));
        self.offset..(self.offset + self.height).min(total)
    }
}

/// Something the user asked the explorer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Down,
    Up,
    PageDown,
    PageUp,
    First,
    Last,
    Toggle,
    ExpandAll,
    CollapseAll,
    NextInComponent,
    StartSearch,
    Type(char),
    Backspace,
    ConfirmSearch,
    Cancel,
    Quit,
}

/// Maps a key press to an action; typing goes to the query while editing.
pub fn action_for(code: KeyCode, editing: bool) -> Option<Action> {
    let action = match (code, editing) {
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Enter, true) => Action::ConfirmSearch,
        (KeyCode::Backspace, true) => Action::Backspace,
        (KeyCode::Char(c), true) => Action::Type(c),
        (KeyCode::Down | KeyCode::Tab, true) => Action::Down,
        (KeyCode::Up | KeyCode::BackTab, true) => Action::Up,
        (KeyCode::Char('j') | KeyCode::Down, false) => Action::Down,
        (KeyCode::Char('k') | KeyCode::Up, false) => Action::Up,
        (KeyCode::Char('d') | KeyCode::PageDown, false) => Action::PageDown,
        (KeyCode::Char('u') | KeyCode::PageUp, false) => Action::PageUp,
        (KeyCode::Char('g') | KeyCode::Home, false) => Action::First,
        (KeyCode::Char('G') | KeyCode::End, false) => Action::Last,
        (KeyCode::Enter | KeyCode::Char(' '), false) => Action::Toggle,
        (KeyCode::Char('e'), false) => Action::ExpandAll,
        (KeyCode::Char('c'), false) => Action::CollapseAll,
        (KeyCode::Char('n'), false) => Action::NextInComponent,
        (KeyCode::Char('/'), false) => Action::StartSearch,
        (KeyCode::Char('q'), false) => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Explorer state
pub struct App {
    /// Title shown in the header
    pub title: String,
    pub tree: ExplorerTree,
    /// Visible rows of the tree
    pub rows: Vec<FlattenedNode>,
    /// Positions in `rows` matching the query, when one is set
    pub matches: Option<Vec<usize>>,
    /// Selected position in the listed rows
    pub selected: usize,
    /// Whether keys are typed into the query
    pub editing: bool,
    pub query: String,
    pub viewport: Viewport,
    pub should_quit: bool,
    list_state: ListState,
}

impl App {
    pub fn new(title: impl Into<String>, tree: ExplorerTree) -> Self {
        let mut app = Self {
            title: title.into(),
            tree,
            rows: Vec::new(),
            matches: None,
            selected: 0,
            editing: false,
            query: String::new(),
            viewport: Viewport::default(),
            should_quit: false,
            list_state: ListState::default(),
        };
        app.refresh();
        app
    }

    /// Number of rows currently listed
    pub fn listed_len(&self) -> usize {
        self.matches.as_ref().map_or(self.rows.len(), Vec::len)
    }

    /// Row at listed position `at`
    pub fn listed(&self, at: usize) -> Option<&FlattenedNode> {
        match &self.matches {
            Some(matches) => matches.get(at).and_then(|&r| self.rows.get(r)),
            None => self.rows.get(at),
        }
    }

    /// Selected row
    pub fn current(&self) -> Option<&FlattenedNode> {
        self.listed(self.selected)
    }

    /// Rebuilds rows and matches, keeping the selected node when it is
    /// still listed.
    fn refresh(&mut self) {
        let keep = self.current().map(|row| row.index);
        self.rows = self.tree.flatten();
        self.matches = (!self.query.is_empty()).then(|| {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| match_positions(&row.name, &self.query).is_some())
                .map(|(i, _)| i)
                .collect()
        });

        let total = self.listed_len();
        self.selected = keep
            .and_then(|index| (0..total).find(|&at| self.listed(at).is_some_and(|r| r.index == index)))
            .unwrap_or_else(|| self.selected.min(total.saturating_sub(1)));
    }

    fn move_to(&mut self, at: usize) {
        let total = self.listed_len();
        if total > 0 {
            self.selected = at.min(total - 1);
        }
    }

    pub fn apply(&mut self, action: Action) {
        let page = self.viewport.height.max(1);
        match action {
            Action::Down => self.move_to(self.selected + 1),
            Action::Up => self.move_to(self.selected.saturating_sub(1)),
            Action::PageDown => self.move_to(self.selected + page),
            Action::PageUp => self.move_to(self.selected.saturating_sub(page)),
            Action::First => self.move_to(0),
            Action::Last => self.move_to(usize::MAX),
            Action::Toggle => {
                if let Some(index) = self.current().map(|row| row.index) {
                    if self.tree.toggle(index) {
                        self.refresh();
                    }
                }
            }
            Action::ExpandAll => {
                self.tree.expand_all();
                self.refresh();
            }
            Action::CollapseAll => {
                self.tree.collapse_all();
                self.refresh();
            }
            Action::NextInComponent => self.select_next_in_component(),
            Action::StartSearch => self.editing = true,
            Action::Type(c) => {
                self.query.push(c);
                self.selected = 0;
                self.refresh();
            }
            Action::Backspace => {
                self.query.pop();
                self.refresh();
            }
            Action::ConfirmSearch => self.editing = false,
            Action::Cancel => {
                if self.editing || !self.query.is_empty() {
                    self.editing = false;
                    self.query.clear();
                    self.refresh();
                } else {
                    self.should_quit = true;
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    /// Selects the next listed row of the selected row's component,
    /// wrapping around. Nothing happens outside multi-node components.
    fn select_next_in_component(&mut self) {
        let Some(component) = self.current().filter(|r| r.in_cycle()).and_then(|r| r.component) else {
            return;
        };
        let total = self.listed_len();
        let next = (1..total)
            .map(|step| (self.selected + step) % total)
            .find(|&at| self.listed(at).is_some_and(|r| r.component == Some(component)));
        if let Some(at) = next {
            self.selected = at;
        }
    }
}

/// Character positions of `query` in `text` as a case-insensitive
/// subsequence, `None` when it does not occur.
fn match_positions(text: &str, query: &str) -> Option<Vec<usize>> {
    let mut wanted = query.chars().flat_map(char::to_lowercase).peekable();
    let mut positions = Vec::new();
    for (i, c) in text.chars().enumerate() {
        let Some(&q) = wanted.peek() else { break };
        if c.to_lowercase().eq(std::iter::once(q)) {
            positions.push(i);
            wanted.next();
        }
    }
    wanted.peek().is_none().then_some(positions)
}

/// Tree guides of the listed rows in `window`.
///
/// `rows` must be the unfiltered rows; the scan starts at the top so the
/// last-child flags of every ancestor are known. Levels beyond
/// `MAX_GUIDE_LEVELS` are collapsed into a single marker.
fn tree_guides(rows: &[FlattenedNode], window: Range<usize>) -> Vec<String> {
    let mut lasts: Vec<bool> = Vec::new();
    let mut guides = Vec::with_capacity(window.len());

    for (at, row) in rows.iter().enumerate().take(window.end) {
        if row.depth == 0 {
            lasts.clear();
        } else {
            lasts.truncate(row.depth - 1);
        }

        if at >= window.start && row.depth > 0 {
            let skipped = lasts.len().saturating_sub(MAX_GUIDE_LEVELS);
            let mut guide = String::new();
            if skipped > 0 {
                guide.push_str(&format!("⋯{} ", skipped));
            }
            for &last in &lasts[skipped..] {
                guide.push_str(if last { "    " } else { "│   " });
            }
            guide.push_str(if row.is_last_child { "└── " } else { "├── " });
            guides.push(guide);
        } else if at >= window.start {
            guides.push(String::new());
        }

        if row.depth > 0 {
            lasts.push(row.is_last_child);
        }
    }
    guides
}

/// Color of a row: members of a multi-node component share a palette
/// color, single-node components are gray and the synthetic root is white.
fn component_color(row: &FlattenedNode) -> Color {
    match row.component {
        Some(c) if row.in_cycle() => COMPONENT_PALETTE[c % COMPONENT_PALETTE.len()],
        Some(_) => Color::Gray,
        None => Color::White,
    }
}

/// Run the explorer until the user quits
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = action_for(key.code, app.editing) {
                app.apply(action);
            }
        }
    }
    Ok(())
}

fn render(frame: &mut Frame, app: &mut App) {
    let [body, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .areas(frame.area());
    let [list, detail] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .areas(body);

    render_rows(frame, app, list);
    render_detail(frame, app, detail);
    render_status(frame, app, status);
}

fn render_rows(frame: &mut Frame, app: &mut App, area: Rect) {
    app.viewport.height = (area.height as usize).saturating_sub(2);
    let total = app.listed_len();
    let window = app.viewport.follow(app.selected, total);

    // guides only make sense for the unfiltered tree
    let guides = match app.matches {
        None => tree_guides(&app.rows, window.clone()),
        Some(_) => vec![String::new(); window.len()],
    };

    let items: Vec<ListItem> = window
        .clone()
        .zip(guides)
        .filter_map(|(at, guide)| {
            let row = app.listed(at)?;
            let color = component_color(row);
            let hits = match_positions(&row.name, &app.query).unwrap_or_default();

            let mut spans = vec![
                Span::styled(guide, Style::default().fg(Color::DarkGray)),
                Span::styled(row.expansion_indicator(), Style::default().fg(Color::Yellow)),
            ];
            if row.in_cycle() {
                spans.push(Span::styled("[↻] ", Style::default().fg(color)));
            }
            spans.extend(row.name.chars().enumerate().map(|(i, c)| {
                let style = if hits.contains(&i) {
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                };
                Span::styled(c.to_string(), style)
            }));
            spans.push(Span::styled(row.detail(), Style::default().fg(Color::DarkGray)));
            Some(ListItem::new(Line::from(spans)))
        })
        .collect();

    let title = match &app.matches {
        Some(_) => format!(" {} | {} matches for /{} ", app.title, total, app.query),
        None => format!(" {} | {}-{} of {} ", app.title, window.start + 1, window.end, total),
    };
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    app.list_state
        .select((total > 0).then(|| app.selected.saturating_sub(window.start)));
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Yellow)),
            Span::raw(value),
        ])
    };

    let lines = match app.current().and_then(|row| Some((row, app.tree.get(row.index)?))) {
        Some((row, node)) => {
            let mut lines = vec![Line::from(Span::styled(
                row.name.clone(),
                Style::default().fg(component_color(row)).add_modifier(Modifier::BOLD),
            ))];
            if let Some(interval) = row.interval {
                lines.push(field("pre   ", interval.pre.to_string()));
                lines.push(field("post  ", interval.post.to_string()));
            }
            if let Some(component) = row.component {
                lines.push(field("scc   ", format!("#{} ({} nodes)", component, row.component_size)));
            }
            lines.push(field("depth ", row.depth.to_string()));
            lines.push(field("below ", node.descendants.to_string()));
            lines
        }
        None => vec![Line::from("no selection")],
    };

    let pane = Paragraph::new(lines).block(Block::default().title(" Node ").borders(Borders::ALL));
    frame.render_widget(pane, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.editing {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.query.clone()),
            Span::styled("_", Style::default().fg(Color::Yellow)),
            Span::styled("  enter keep  esc clear", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(
            KEY_HINTS
                .iter()
                .flat_map(|&(key, what)| {
                    [
                        Span::styled(key, Style::default().fg(Color::Yellow)),
                        Span::styled(format!(" {}  ", what), Style::default().fg(Color::DarkGray)),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    };
    frame.render_widget(Paragraph::new(line), area);
}
