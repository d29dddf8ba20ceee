//! Search box and result list with virtual scrolling

use crate::app::state::{AppState, Focus};
use crate::tui::View;
use crate::tui::theme::{LoadingSpinner, Theme, get_theme};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use super::{format_time, titled_block, truncate_str};

/// Render the search input box
pub fn render_search_box(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let is_focused = state.focus == Focus::Input;

    let block = titled_block(&theme, " Query ".to_string(), is_focused);

    let prompt = if state.search.loading {
        format!("{} {}", state.search.query, LoadingSpinner::frame(state.tick))
    } else {
        let cursor = if is_focused { "▏" } else { "" };
        format!("{}{}", state.search.query, cursor)
    };

    let p = Paragraph::new(Line::from(prompt))
        .style(Style::default().fg(theme.palette.text))
        .block(block);
    frame.render_widget(p, area);
}

/// Render the result list (called within an existing block area)
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let theme = get_theme();
    let search = &view.app.search;

    if search.loading && search.results.is_empty() {
        let loading = Paragraph::new(format!("{} Searching...", LoadingSpinner::frame(view.app.tick)))
            .style(Style::default().fg(theme.palette.dim));
        frame.render_widget(loading, area);
        return;
    }

    if search.results.is_empty() {
        let msg = match &search.last_query {
            Some(q) => format!("No results for \"{q}\""),
            None => "Search for music above".to_string(),
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(theme.palette.dim)),
            area,
        );
        return;
    }

    let visible_height = area.height as usize;
    let width = area.width.saturating_sub(2) as usize;
    let query = search
        .last_query
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(str::to_lowercase);
    let current_id = view.playback.current.as_ref().map(|t| t.id.as_str());

    let offset = search.cursor.scroll_offset;
    let items: Vec<ListItem> = search
        .results
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_height)
        .map(|(i, track)| {
            let is_selected = i == search.cursor.selected;
            let is_current = current_id == Some(track.id.as_str());
            let base_style = if is_selected || is_current {
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.text)
            };

            let duration = track
                .duration_secs
                .map(|d| format!(" {}", format_time(d as f64)))
                .unwrap_or_default();
            let marker = if is_current { theme.icons.music } else { " " };
            let room = width.saturating_sub(duration.chars().count() + 2);
            let label = truncate_str(&track.display_line(), room);

            let mut spans = vec![Span::styled(format!("{marker} "), base_style)];
            match &query {
                Some(q) => spans.extend(highlight_text(&label, q, base_style, &theme)),
                None => spans.push(Span::styled(label, base_style)),
            }
            spans.push(Span::styled(
                duration,
                Style::default().fg(theme.palette.dim),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(search.cursor.selected.saturating_sub(offset)));

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(theme.palette.on_accent)
                .bg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(theme.icons.selected);

    frame.render_stateful_widget(list, area, &mut list_state);

    // Scroll position in the top-right corner
    if search.results.len() > visible_height {
        let pos_text = format!("{}/{}", search.cursor.selected + 1, search.results.len());
        let pos_len = pos_text.len() as u16;
        let pos_x = area.x + area.width.saturating_sub(pos_len);
        if pos_x > area.x {
            frame.render_widget(
                Paragraph::new(pos_text).style(Style::default().fg(theme.palette.dim)),
                Rect::new(pos_x, area.y, pos_len, 1),
            );
        }
    }
}

/// Highlight query words inside `text`.
fn highlight_text(text: &str, query: &str, base_style: Style, theme: &Theme) -> Vec<Span<'static>> {
    let lower_text = text.to_lowercase();
    // Lowercasing can change byte lengths outside ASCII; offsets would no longer line up.
    if lower_text.len() != text.len() {
        return vec![Span::styled(text.to_string(), base_style)];
    }

    let highlight_style = base_style.bg(theme.palette.soft);
    let mut matches: Vec<(usize, usize)> = Vec::new();
    let lower_query = query.to_lowercase();
    for word in lower_query.split_whitespace() {
        let mut from = 0;
        while let Some(start) = lower_text[from..].find(word) {
            let start = from + start;
            let end = start + word.len();
            matches.push((start, end));
            from = end;
        }
    }
    matches.sort_unstable();

    let mut spans = Vec::new();
    let mut last_end = 0;
    for (start, end) in matches {
        if start < last_end || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        if start > last_end {
            spans.push(Span::styled(text[last_end..start].to_string(), base_style));
        }
        spans.push(Span::styled(text[start..end].to_string(), highlight_style));
        last_end = end;
    }
    if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn highlights_every_query_word_in_order() {
        let theme = get_theme();
        let spans = highlight_text("Bad Guy - Billie Eilish", "billie bad", Style::default(), &theme);
        assert_eq!(pieces(&spans), vec!["Bad", " Guy - ", "Billie", " Eilish"]);
    }

    #[test]
    fn query_case_is_ignored() {
        let theme = get_theme();
        let spans = highlight_text("Bad Guy - Billie Eilish", "Billie", Style::default(), &theme);
        assert_eq!(pieces(&spans), vec!["Bad Guy - ", "Billie", " Eilish"]);
    }

    #[test]
    fn leaves_text_whole_without_matches() {
        let theme = get_theme();
        let spans = highlight_text("Yellow - Coldplay", "adele", Style::default(), &theme);
        assert_eq!(pieces(&spans), vec!["Yellow - Coldplay"]);
    }
}
