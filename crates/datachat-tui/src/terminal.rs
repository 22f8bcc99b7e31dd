//! Owns the terminal for the lifetime of the chat screen.
//!
//! `TerminalGuard::enter` switches to raw mode and the alternate screen and
//! turns on bracketed paste (pasted paths) and mouse capture (wheel scroll).
//! Dropping the guard undoes all of it. A panic hook does the same so a
//! crash never leaves the shell in raw mode.

use std::io::{self, Stdout};
use std::panic;
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Size;
use ratatui::{Frame, Terminal};

type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// RAII handle over the configured terminal.
pub struct TerminalGuard {
    terminal: ChatTerminal,
    active: bool,
}

impl TerminalGuard {
    /// Takes over stdout.
    ///
    /// # Errors
    /// Returns an error if raw mode or the alternate screen can't be entered.
    pub fn enter() -> Result<Self> {
        PANIC_HOOK.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                let _ = leave();
                previous(info);
            }));
        });

        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(
            stdout,
            EnterAlternateScreen,
            EnableBracketedPaste,
            EnableMouseCapture
        ) {
            let _ = leave();
            return Err(err).context("Failed to enter alternate screen");
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = leave();
                return Err(err).context("Failed to create terminal");
            }
        };

        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn size(&self) -> Result<Size> {
        self.terminal.size().context("Failed to read terminal size")
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render).context("Failed to draw frame")?;
        Ok(())
    }

    /// Hands the terminal back to the shell. Safe to call twice.
    ///
    /// # Errors
    /// Returns an error if the alternate screen or raw mode can't be left.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.terminal.show_cursor().ok();
        leave()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn leave() -> Result<()> {
    // Capture modes go off while still in raw mode.
    execute!(
        io::stdout(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )
    .context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")
}
