//! Terminal frontend.
//!
//! Owns the only mutable [`GameState`] binding, feeds it key presses and
//! redraws after every state change. All game rules live in [`crate::game`].

use std::io::{self, Write};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use rand::Rng;
use tracing::debug;

use crate::engine::SIZE;
use crate::game::GameState;
use crate::input::Command;

const CELL_WIDTH: usize = 8;
const TITLE: &str = "2048 Game";
const HELP: &str = "arrows: move   r: restart game   q: quit";

/// Raw mode + alternate screen for as long as the guard lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(TerminalGuard { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run an interactive game until the player quits. Returns the final state.
pub fn run<R: Rng + ?Sized>(rng: &mut R) -> anyhow::Result<GameState> {
    let _guard = TerminalGuard::enter().context("failed to set up terminal")?;
    let mut out = io::stdout();
    let mut state = GameState::new(rng);
    let mut show_game_over = false;
    draw(&mut out, &state, show_game_over)?;

    loop {
        let key = match event::read().context("failed to read terminal event")? {
            Event::Key(key) => key,
            Event::Resize(..) => {
                draw(&mut out, &state, show_game_over)?;
                continue;
            }
            _ => continue,
        };
        match Command::from_key(key) {
            None => continue,
            Some(Command::Quit) => break,
            Some(Command::Restart) => {
                state = state.restart(rng);
                show_game_over = false;
            }
            Some(Command::Move(dir)) => {
                let outcome = state.step(dir, rng);
                if !outcome.moved {
                    continue;
                }
                state = outcome.state;
                show_game_over |= outcome.game_over;
            }
        }
        draw(&mut out, &state, show_game_over)?;
    }
    debug!(score = state.score, moves = state.moves, "quit");
    Ok(state)
}

fn draw<W: Write>(out: &mut W, state: &GameState, show_game_over: bool) -> anyhow::Result<()> {
    queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    queue!(out, SetAttribute(Attribute::Bold), Print(TITLE), SetAttribute(Attribute::Reset))?;

    let top = 2u16;
    for (r, row) in state.board.rows().iter().enumerate() {
        // Each board row is three terminal lines tall so tiles read as blocks.
        for sub in 0..3u16 {
            queue!(out, cursor::MoveTo(0, top + r as u16 * 3 + sub))?;
            for &value in row {
                let (fg, bg) = tile_colors(value);
                let text = if sub == 1 { tile_label(value) } else { " ".repeat(CELL_WIDTH - 1) };
                queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg), Print(text), ResetColor, Print(" "))?;
            }
        }
    }

    let below = top + SIZE as u16 * 3 + 1;
    queue!(out, cursor::MoveTo(0, below), Print(format!("Score: {}", state.score)))?;
    queue!(out, cursor::MoveTo(0, below + 1), Print(HELP))?;
    if show_game_over {
        queue!(
            out,
            cursor::MoveTo(0, below + 3),
            SetForegroundColor(Color::Red),
            SetAttribute(Attribute::Bold),
            Print("Game Over!"),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Centered label for a tile; blank for an empty cell.
fn tile_label(value: u32) -> String {
    if value == 0 {
        " ".repeat(CELL_WIDTH - 1)
    } else {
        format!("{:^width$}", value, width = CELL_WIDTH - 1)
    }
}

fn tile_colors(value: u32) -> (Color, Color) {
    match value {
        0 => (Color::DarkGrey, Color::Grey),
        2 | 4 => (Color::Black, Color::Yellow),
        8 | 16 | 32 | 64 => (Color::Black, Color::DarkYellow),
        _ => (Color::White, Color::DarkRed),
    }
}
