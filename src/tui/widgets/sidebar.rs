//! Screen switcher. Each entry shows its number key and a live badge.

use crate::app::state::Screen;
use crate::tui::View;
use crate::tui::theme::{LoadingSpinner, Theme, get_theme};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use super::titled_block;

pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let current = view.app.screen;

    let items: Vec<ListItem> = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, &screen)| entry(&theme, view, screen, i + 1, screen == current))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(current.index()));

    let list = List::new(items)
        .block(titled_block(&theme, " Menu ".to_string(), false))
        .highlight_style(
            Style::default()
                .fg(theme.palette.on_accent)
                .bg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn entry(theme: &Theme, view: &View, screen: Screen, key: usize, active: bool) -> ListItem<'static> {
    let icons = &theme.icons;
    let (marker, label_style) = if active {
        (icons.selected, Style::default().fg(theme.palette.accent).add_modifier(Modifier::BOLD))
    } else {
        (icons.unselected, Style::default().fg(theme.palette.text))
    };
    let dim = Style::default().fg(theme.palette.dim);
    let glyph = match screen {
        Screen::Search => icons.search,
        Screen::Player => icons.music,
        Screen::Queue => icons.queue,
        Screen::Chat => icons.chat,
        Screen::Help => icons.help,
    };

    let mut spans = vec![
        Span::styled(format!("{marker} {glyph} "), dim),
        Span::styled(screen.label(), label_style),
        Span::styled(format!(" {key}"), dim),
    ];
    if let Some(b) = badge(view, screen, theme) {
        spans.push(Span::styled(format!("  {b}"), Style::default().fg(theme.palette.soft)));
    }
    ListItem::new(Line::from(spans))
}

/// Short live status for a screen, if it has anything to say.
fn badge(view: &View, screen: Screen, theme: &Theme) -> Option<String> {
    match screen {
        Screen::Search if view.app.search.loading => Some(LoadingSpinner::frame(view.app.tick).to_string()),
        Screen::Search => (!view.app.search.results.is_empty()).then(|| view.app.search.results.len().to_string()),
        Screen::Player => view.playback.current.as_ref().map(|_| {
            let icon = if view.playback.is_playing { theme.icons.play } else { theme.icons.pause };
            icon.to_string()
        }),
        Screen::Queue => (!view.queue.is_empty()).then(|| view.queue.len().to_string()),
        Screen::Chat if view.app.chat.pending => Some(LoadingSpinner::frame(view.app.tick).to_string()),
        Screen::Chat | Screen::Help => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::AppState;
    use crate::playback::PlaybackState;
    use crate::queue::Queue;
    use crate::service::models::Track;

    #[test]
    fn badges_follow_live_state() {
        let theme = get_theme();
        let mut app = AppState::new();
        let mut playback = PlaybackState::default();
        let mut queue = Queue::new();

        {
            let view = View { app: &app, playback: &playback, queue: &queue };
            for screen in Screen::ALL {
                assert_eq!(badge(&view, screen, &theme), None, "{screen:?}");
            }
        }

        app.search.results = vec![Track::new("a", "A"), Track::new("b", "B")];
        playback.current = Some(Track::new("a", "A"));
        playback.is_playing = true;
        queue.enqueue(Track::new("b", "B"));

        let view = View { app: &app, playback: &playback, queue: &queue };
        assert_eq!(badge(&view, Screen::Search, &theme).as_deref(), Some("2"));
        assert_eq!(badge(&view, Screen::Player, &theme).as_deref(), Some(theme.icons.play));
        assert_eq!(badge(&view, Screen::Queue, &theme).as_deref(), Some("1"));
    }
}
