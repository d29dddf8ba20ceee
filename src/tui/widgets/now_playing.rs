//! Mini player for the bottom bar, plus the optional lyrics panel beside it.

use crate::app::state::{Toast, ToastKind};
use crate::playback::{Phase, PlaybackState};
use crate::tui::View;
use crate::tui::theme::{Icons, LoadingSpinner, Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::{format_time, titled_block, truncate_str};

pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = titled_block(&theme, format!(" {} Player ", icons.music), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
        .split(inner)[1];

    if view.app.minimized {
        render_compact(frame, view, &theme, padded);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Artist
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
            Constraint::Min(0),    // Toast or status
        ])
        .split(padded);

    let pb = view.playback;
    let content_width = padded.width.saturating_sub(1) as usize;

    let title = pb
        .current
        .as_ref()
        .map(|t| t.title.as_str())
        .unwrap_or("Not playing");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_str(title, content_width),
            Style::default()
                .fg(theme.palette.text)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );

    let mut artist_spans = vec![Span::styled(
        truncate_str(
            pb.current.as_ref().map(|t| t.artist_or_unknown()).unwrap_or(""),
            content_width.saturating_sub(14),
        ),
        Style::default().fg(theme.palette.dim),
    )];
    if let Some(label) = phase_note(pb.phase, view.app.tick) {
        artist_spans.push(Span::raw("  "));
        artist_spans.push(Span::styled(label, Style::default().fg(theme.palette.phase(pb.phase))));
    }
    frame.render_widget(Paragraph::new(Line::from(artist_spans)), rows[1]);

    let bar = progress_bar(rows[2].width as usize, pb.progress(), icons);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(bar, Style::default().fg(theme.palette.accent)))),
        rows[2],
    );

    frame.render_widget(Paragraph::new(controls_line(pb, view.queue.len(), &theme)), rows[3]);

    let footer = match &view.app.toast {
        Some(toast) => toast_line(toast, &theme, content_width),
        None => Line::from(Span::styled(
            truncate_str(&view.app.status, content_width),
            Style::default().fg(theme.palette.dim),
        )),
    };
    frame.render_widget(Paragraph::new(footer), rows[4]);
}

/// Single line: state icon, title, time, volume.
fn render_compact(frame: &mut Frame, view: &View, theme: &Theme, area: Rect) {
    let icons = &theme.icons;
    let pb = view.playback;

    if let Some(toast) = &view.app.toast {
        frame.render_widget(Paragraph::new(toast_line(toast, theme, area.width as usize)), area);
        return;
    }

    let state_icon = if pb.is_playing { icons.play } else { icons.pause };
    let time = format!(
        " {}/{} {} {}%",
        format_time(pb.position),
        format_time(pb.duration),
        volume_icon(pb, icons),
        (pb.volume * 100.0).round() as u32
    );
    let title = pb
        .current
        .as_ref()
        .map(|t| t.display_line())
        .unwrap_or_else(|| "Not playing".to_string());
    let room = (area.width as usize).saturating_sub(time.chars().count() + 3);

    let line = Line::from(vec![
        Span::styled(state_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(truncate_str(&title, room), Style::default().fg(theme.palette.text)),
        Span::styled(time, Style::default().fg(theme.palette.dim)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_lyrics_panel(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let block = titled_block(&theme, format!(" {} Lyrics ", theme.icons.lyrics), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pb = view.playback;
    if pb.current.is_none() {
        frame.render_widget(
            Paragraph::new("Nothing selected")
                .style(Style::default().fg(theme.palette.dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }
    if pb.lyrics_loading {
        frame.render_widget(
            Paragraph::new(format!("{} Loading lyrics...", LoadingSpinner::frame(view.app.tick)))
                .style(Style::default().fg(theme.palette.dim))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    frame.render_widget(
        Paragraph::new(pb.lyrics.as_str())
            .style(Style::default().fg(theme.palette.text))
            .wrap(Wrap { trim: true })
            .scroll((view.app.lyrics_scroll, 0)),
        inner,
    );
}

fn phase_note(phase: Phase, tick: u64) -> Option<String> {
    match phase {
        Phase::Loading => Some(format!("{} {}", LoadingSpinner::frame(tick), phase.label())),
        Phase::Unplayable => Some(phase.label().to_string()),
        Phase::Empty | Phase::Ready => None,
    }
}

fn volume_icon(pb: &PlaybackState, icons: &Icons) -> &'static str {
    if pb.is_muted() {
        icons.volume_mute
    } else if pb.volume < 0.5 {
        icons.volume_low
    } else {
        icons.volume_high
    }
}

pub(crate) fn controls_line(pb: &PlaybackState, queued: usize, theme: &Theme) -> Line<'static> {
    let icons = &theme.icons;
    let play_icon = if pb.is_playing { icons.pause } else { icons.play };
    let secondary = Style::default().fg(theme.palette.dim);

    let mut spans = vec![
        Span::styled(
            format!("{}/{}", format_time(pb.position), format_time(pb.duration)),
            secondary,
        ),
        Span::raw("  "),
        Span::styled(play_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(icons.next, secondary),
        Span::raw("  "),
        Span::styled(volume_icon(pb, icons), secondary),
        Span::raw(" "),
        Span::styled(format!("{}%", (pb.volume * 100.0).round() as u32), secondary),
    ];
    if queued > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("{} {queued}", icons.queue), secondary));
    }
    Line::from(spans)
}

fn toast_line(toast: &Toast, theme: &Theme, width: usize) -> Line<'static> {
    let icons = &theme.icons;
    let (prefix, color) = match toast.kind {
        ToastKind::Success => (icons.success, theme.palette.playing),
        ToastKind::Error => (icons.error, theme.palette.error),
    };
    Line::from(vec![
        Span::styled(format!("{prefix} "), Style::default().fg(color)),
        Span::styled(
            truncate_str(&toast.message, width.saturating_sub(3)),
            Style::default().fg(color),
        ),
    ])
}

pub(crate) fn progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_has_fixed_width() {
        let icons = Icons::nerd();
        for ratio in [0.0, 0.3, 1.0] {
            assert_eq!(progress_bar(20, ratio, &icons).chars().count(), 20);
        }
        assert!(progress_bar(2, 0.5, &icons).is_empty());
        assert!(progress_bar(10, 0.0, &icons).starts_with(icons.progress_head));
    }

    #[test]
    fn phase_notes_only_when_not_ready() {
        assert!(phase_note(Phase::Ready, 0).is_none());
        assert_eq!(phase_note(Phase::Unplayable, 0).as_deref(), Some("Unplayable"));
        assert!(phase_note(Phase::Loading, 0).unwrap().ends_with("Loading"));
    }
}
