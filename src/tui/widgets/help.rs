//! Help screen showing keybindings

use crate::tui::theme::{Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

pub fn render(frame: &mut Frame, area: Rect) {
    let theme = get_theme();

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = vec![
        section_header("Navigation", &theme),
        keybind("j / Down", "Move down", &theme),
        keybind("k / Up", "Move up", &theme),
        keybind("g / G", "Top / bottom", &theme),
        keybind("Ctrl+d / u", "Page down / up", &theme),
        keybind("Tab", "Next screen", &theme),
        keybind("1-5", "Go to screen", &theme),
        keybind("?", "This help", &theme),
        Line::default(),
        section_header("Playback", &theme),
        keybind("Enter", "Play selected", &theme),
        keybind("Space", "Play / pause", &theme),
        keybind("n", "Next in queue", &theme),
        keybind("+ / -", "Volume up / down", &theme),
        keybind("M", "Mute", &theme),
        keybind("] / [", "Seek 10s", &theme),
    ];
    frame.render_widget(Paragraph::new(left).wrap(Wrap { trim: false }), cols[0]);

    let right = vec![
        section_header("Search & Chat", &theme),
        keybind("/ or i", "Focus input", &theme),
        keybind("Enter", "Submit", &theme),
        keybind("Ctrl+u", "Clear input", &theme),
        keybind("Esc / Down", "Focus list", &theme),
        keybind("a", "Add result to queue", &theme),
        Line::default(),
        section_header("Layout", &theme),
        keybind("y", "Toggle lyrics panel", &theme),
        keybind("m", "Minimize player", &theme),
        keybind("c", "Clear queue (Queue)", &theme),
        Line::default(),
        section_header("General", &theme),
        keybind("q / Ctrl+c", "Quit", &theme),
    ];
    frame.render_widget(Paragraph::new(right).wrap(Wrap { trim: false }), cols[1]);
}

fn section_header(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("━━ {title} ━━"),
        Style::default()
            .fg(theme.palette.accent)
            .add_modifier(Modifier::BOLD),
    ))
}

fn keybind(key: &str, desc: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{key:12}"),
            Style::default()
                .fg(theme.palette.soft)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.palette.text)),
    ])
}
