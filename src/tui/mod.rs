use crate::app::state::AppState;
use crate::playback::PlaybackState;
use crate::queue::Queue;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};

pub mod theme;
pub mod widgets;

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

pub struct TerminalGuard {
    terminal: TuiTerminal,
}

impl TerminalGuard {
    pub fn enter(mouse: bool) -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
        if mouse {
            execute!(stdout, EnableMouseCapture).context("enable mouse capture")?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("create terminal")?;

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut TuiTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort cleanup; don't panic in Drop.
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
    }
}

/// What every widget reads: UI state plus the coordinator's snapshot.
pub struct View<'a> {
    pub app: &'a AppState,
    pub playback: &'a PlaybackState,
    pub queue: &'a Queue,
}

pub fn draw(
    terminal: &mut TuiTerminal,
    state: &mut AppState,
    playback: &PlaybackState,
    queue: &Queue,
) -> anyhow::Result<()> {
    if let Some(toast) = &state.toast
        && toast.is_expired()
    {
        state.toast = None;
    }

    let view = View {
        app: state,
        playback,
        queue,
    };
    terminal
        .draw(|f| widgets::root::render(f, &view))
        .context("terminal draw")?;
    Ok(())
}
