//! Root layout widget - orchestrates main layout structure

use crate::app::state::Screen;
use crate::tui::View;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use super::{chat, help, now_playing, player_page, queue, sidebar, titled_block, track_list};

/// Main layout structure:
/// ┌──────────┬─────────────────────────────────────────┐
/// │  Menu    │           Main Content                  │
/// │          │     (Search/Player/Queue/Chat/Help)     │
/// │  Search  │                                         │
/// │  Player  │                                         │
/// │  Queue   │                                         │
/// │  Chat    │                                         │
/// │  Help    │                                         │
/// ├──────────┴──────────────────┬──────────────────────┤
/// │        Mini player          │   Lyrics (toggle)    │
/// └─────────────────────────────┴──────────────────────┘
///
/// Minimized: no sidebar and a one-line player.
pub fn render(frame: &mut Frame, view: &View) {
    let root = frame.area();
    let minimized = view.app.minimized;

    let bar_height = if minimized { 3 } else { 7 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(bar_height)])
        .split(root);

    let content_area = if view.app.show_sidebar() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(30)])
            .split(rows[0]);
        sidebar::render(frame, view, cols[0]);
        cols[1]
    } else {
        rows[0]
    };
    render_main_content(frame, view, content_area);

    if view.app.show_lyrics {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        now_playing::render(frame, view, cols[0]);
        now_playing::render_lyrics_panel(frame, view, cols[1]);
    } else {
        now_playing::render(frame, view, rows[1]);
    }
}

fn render_main_content(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let title = match view.app.screen {
        Screen::Search => format!(" {} Search ", icons.search),
        Screen::Player => format!(" {} Now Playing ", icons.music),
        Screen::Queue => format!(" {} Queue ({}) ", icons.queue, view.queue.len()),
        Screen::Chat => format!(" {} Mood Chat ", icons.chat),
        Screen::Help => format!(" {} Keybinds ", icons.help),
    };

    let main = titled_block(&theme, title, false);
    let inner = main.inner(area);
    frame.render_widget(main, area);

    match view.app.screen {
        Screen::Search => {
            let sub = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(3)])
                .split(inner);
            track_list::render_search_box(frame, view.app, sub[0]);
            track_list::render(frame, view, sub[1]);
        }
        Screen::Player => player_page::render(frame, view, inner),
        Screen::Queue => queue::render(frame, view, inner),
        Screen::Chat => chat::render(frame, view.app, inner),
        Screen::Help => help::render(frame, inner),
    }
}
