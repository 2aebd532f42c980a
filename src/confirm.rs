//! y/N confirmation before destructive actions.
//!
//! The answer is read as a single raw keypress from the controlling terminal.
//! Standard input is never consumed: crossterm falls back to `/dev/tty` when
//! stdin is not a terminal, so this works when bookmarker itself sits in a pipe.

use std::io::Write;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::BookmarkerError;

/// Asks the operator a yes/no question.
pub trait Confirmer {
    /// Show `prompt` and return `true` only for an explicit yes.
    fn read_confirmation(&self, prompt: &str) -> Result<bool>;
}

/// Whether a key counts as a yes. Only `y` and `Y` accept.
pub fn is_yes(key: char) -> bool {
    matches!(key, 'y' | 'Y')
}

/// Reads one keypress from the controlling terminal in raw mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn read_confirmation(&self, prompt: &str) -> Result<bool> {
        print!("{}: ", prompt);
        std::io::stdout()
            .flush()
            .map_err(|e| BookmarkerError::Confirmation(e.to_string()))?;

        enable_raw_mode().map_err(|e| BookmarkerError::Confirmation(e.to_string()))?;
        let key = read_key();
        // Restore the terminal before reporting anything.
        let restored = disable_raw_mode();
        println!();

        let key = key?;
        restored.map_err(|e| BookmarkerError::Confirmation(e.to_string()))?;
        log::debug!("confirmation key: {:?}", key);
        Ok(key.is_some_and(is_yes))
    }
}

/// Wait for the next key press. `None` for keys that are not characters
/// (Enter, Esc, arrows) and for Ctrl-C / Ctrl-D.
fn read_key() -> Result<Option<char>> {
    loop {
        let ev = event::read().map_err(|e| BookmarkerError::Confirmation(e.to_string()))?;
        if let Event::Key(key) = ev {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            return Ok(match key.code {
                KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
                KeyCode::Char(c) => Some(c),
                _ => None,
            });
        }
    }
}
