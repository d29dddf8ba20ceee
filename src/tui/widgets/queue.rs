//! Queue screen widget - tracks waiting to play after the current one

use crate::tui::View;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::truncate_str;

pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(area)[1];

    let queue = view.queue;
    let secondary = Style::default().fg(theme.palette.dim);

    if queue.is_empty() {
        let empty = Line::from(vec![
            Span::styled("Queue is empty. ", secondary),
            Span::styled("Press a on a search result to add it here.", secondary),
        ]);
        frame.render_widget(Paragraph::new(empty), padded);
        return;
    }

    let header = Line::from(vec![
        Span::styled(format!("{} tracks", queue.len()), secondary),
        Span::raw("  "),
        Span::styled(
            match &view.playback.current {
                Some(t) => format!("{} after {}", icons.next, t.title),
                None => format!("{} up next", icons.next),
            },
            secondary,
        ),
    ]);

    let cursor = view.app.queue_cursor;
    let visible_height = padded.height.saturating_sub(3) as usize; // header, gap, hints
    let max_width = padded.width.saturating_sub(7) as usize;

    let mut lines: Vec<Line> = vec![header, Line::default()];
    for (i, track) in queue
        .iter()
        .enumerate()
        .skip(cursor.scroll_offset)
        .take(visible_height)
    {
        let is_selected = i == cursor.selected;
        let is_head = i == 0;

        let style = if is_selected {
            Style::default()
                .fg(theme.palette.text)
                .bg(theme.palette.cursor_bg)
                .add_modifier(Modifier::BOLD)
        } else if is_head {
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.palette.text)
        };
        let prefix = if is_head { icons.next } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!("{prefix} "), Style::default().fg(theme.palette.accent)),
            Span::styled(format!("{:>3}. ", i + 1), secondary),
            Span::styled(truncate_str(&track.display_line(), max_width), style),
        ]));
    }

    let remaining = (padded.height as usize).saturating_sub(lines.len());
    if remaining > 0 {
        lines.extend(std::iter::repeat_n(Line::default(), remaining - 1));
        lines.push(Line::from(Span::styled("Enter: Play next  c: Clear", secondary)));
    }

    frame.render_widget(Paragraph::new(lines), padded);
}
