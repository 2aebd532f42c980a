//! Built-in terminal list view, used instead of an external filter with `-t`.
//!
//! Draws on stderr so stdout stays untouched. Typing narrows the list
//! (case-insensitive substring match), Up/Down or Ctrl-P/Ctrl-N move the
//! cursor, Enter picks the highlighted line and Esc / Ctrl-C abort.

use std::io;

use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::error::BookmarkerError;
use crate::selector::Selector;

/// How a key press ended the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Picked(String),
    Aborted,
}

/// Filtering and cursor state of the list view, independent of the terminal.
#[derive(Debug, Clone)]
pub struct ListView {
    lines: Vec<String>,
    query: String,
    visible: Vec<usize>,
    state: ListState,
}

impl ListView {
    pub fn new(input: &str) -> Self {
        let lines: Vec<String> = input
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        let mut view = Self {
            lines,
            query: String::new(),
            visible: Vec::new(),
            state: ListState::default(),
        };
        view.refilter();
        view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn visible_lines(&self) -> Vec<&str> {
        self.visible.iter().map(|&i| self.lines[i].as_str()).collect()
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    pub fn move_up(&mut self) {
        if let Some(i) = self.state.selected() {
            self.state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn move_down(&mut self) {
        if let Some(i) = self.state.selected() {
            if i + 1 < self.visible.len() {
                self.state.select(Some(i + 1));
            }
        }
    }

    /// The highlighted line, if any line is visible.
    pub fn selected_line(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.visible.get(i))
            .map(|&i| self.lines[i].as_str())
    }

    /// Apply one key event. Returns `Some` once the view is finished.
    ///
    /// Plain characters always extend the query; cursor movement uses the
    /// arrow keys or Ctrl-P / Ctrl-N.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ListOutcome> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Some(ListOutcome::Aborted),
            KeyCode::Char('c') if ctrl => return Some(ListOutcome::Aborted),
            KeyCode::Enter => {
                return Some(match self.selected_line() {
                    Some(line) => ListOutcome::Picked(line.to_string()),
                    None => ListOutcome::Aborted,
                })
            }
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Char('p') if ctrl => self.move_up(),
            KeyCode::Char('n') if ctrl => self.move_down(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Backspace => self.pop_char(),
            KeyCode::Char(c) => self.push_char(c),
            _ => {}
        }
        None
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        self.state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(f.area());

        let prompt = Paragraph::new(format!("> {}", self.query)).block(
            Block::default()
                .title(format!(" bookmarks {}/{} ", self.visible.len(), self.lines.len()))
                .borders(Borders::ALL),
        );
        f.render_widget(prompt, chunks[0]);

        let items: Vec<ListItem> = self
            .visible
            .iter()
            .map(|&i| ListItem::new(self.lines[i].as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], &mut self.state);
    }
}

/// A [`Selector`] backed by the built-in list view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListSelector;

impl Selector for ListSelector {
    fn select(&self, input: &str) -> Result<String> {
        let mut view = ListView::new(input);

        let outcome = {
            let _guard = TerminalGuard::enter()?;
            let mut terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;
            run_view(&mut terminal, &mut view)?
        };

        match outcome {
            ListOutcome::Picked(line) => Ok(line),
            ListOutcome::Aborted => Err(BookmarkerError::NoSelection.into()),
        }
    }
}

/// Raw mode plus the alternate screen on stderr, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(io::stderr(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(io::stderr(), LeaveAlternateScreen).ok();
    }
}

fn run_view(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    view: &mut ListView,
) -> Result<ListOutcome> {
    loop {
        terminal.draw(|f| view.draw(f))?;

        if let Event::Key(key) = event::read()? {
            if let Some(outcome) = view.handle_key(key) {
                return Ok(outcome);
            }
        }
    }
}
