//! Full player page: track header, progress and scrollable lyrics.

use crate::playback::Phase;
use crate::tui::View;
use crate::tui::theme::{LoadingSpinner, get_theme};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::now_playing::{controls_line, progress_bar};
use super::truncate_str;

const ART_WIDTH: u16 = 9;

pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;
    let pb = view.playback;

    let Some(track) = &pb.current else {
        frame.render_widget(
            Paragraph::new("Nothing playing. Pick a track from Search or Chat.")
                .style(Style::default().fg(theme.palette.dim))
                .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header
            Constraint::Length(1), // Gap
            Constraint::Min(1),    // Lyrics
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(ART_WIDTH + 2), Constraint::Min(10)])
        .split(rows[0]);

    // No image protocol in the terminal; a glyph stands in for the thumbnail.
    let art_style = if track.thumbnail_url.is_some() {
        Style::default().fg(theme.palette.accent)
    } else {
        Style::default().fg(theme.palette.border)
    };
    let art = vec![
        Line::default(),
        Line::from(Span::styled(format!("   {}", icons.music), art_style)),
        Line::default(),
    ];
    frame.render_widget(Paragraph::new(art), header[0]);

    let info_width = header[1].width as usize;
    let phase_text = match pb.phase {
        Phase::Loading => format!("{} {}", LoadingSpinner::frame(view.app.tick), pb.phase.label()),
        Phase::Unplayable => format!("{} {}", icons.error, pb.phase.label()),
        Phase::Empty | Phase::Ready if pb.is_playing => "Playing".to_string(),
        Phase::Empty | Phase::Ready => "Paused".to_string(),
    };
    let phase_span = Span::styled(phase_text, Style::default().fg(theme.palette.phase(pb.phase)));

    let info = vec![
        Line::from(Span::styled(
            truncate_str(&track.title, info_width),
            Style::default()
                .fg(theme.palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_str(track.artist_or_unknown(), info_width),
            Style::default().fg(theme.palette.dim),
        )),
        Line::from(phase_span),
        Line::from(Span::styled(
            progress_bar(info_width.saturating_sub(1), pb.progress(), icons),
            Style::default().fg(theme.palette.accent),
        )),
        controls_line(pb, view.queue.len(), &theme),
    ];
    frame.render_widget(Paragraph::new(info), header[1]);

    let lyrics = if pb.lyrics_loading {
        Paragraph::new(format!("{} Loading lyrics...", LoadingSpinner::frame(view.app.tick)))
            .style(Style::default().fg(theme.palette.dim))
    } else {
        Paragraph::new(pb.lyrics.as_str())
            .style(Style::default().fg(theme.palette.text))
            .wrap(Wrap { trim: true })
            .scroll((view.app.lyrics_scroll, 0))
    };
    frame.render_widget(lyrics.alignment(Alignment::Center), rows[2]);
}
