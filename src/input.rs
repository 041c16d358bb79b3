use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::Move;

/// A player command decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Move),
    Restart,
    Quit,
}

impl Command {
    /// Arrow keys move, `r` restarts, `q`/`Esc`/`Ctrl-C` quit. Everything
    /// else (including key releases and repeats) maps to `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Left => Some(Command::Move(Move::Left)),
            KeyCode::Right => Some(Command::Move(Move::Right)),
            KeyCode::Up => Some(Command::Move(Move::Up)),
            KeyCode::Down => Some(Command::Move(Move::Down)),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        }
    }
}
