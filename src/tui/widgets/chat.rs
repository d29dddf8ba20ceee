//! Mood chat: conversation history, pickable suggestions and the input line.

use crate::app::state::{AppState, ChatMessage, Focus, Speaker};
use crate::tui::theme::{LoadingSpinner, Theme, get_theme};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::{titled_block, truncate_str};

const MAX_SUGGESTION_ROWS: u16 = 7;

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let chat = &state.chat;
    let suggestions = chat.suggestions();

    let suggestion_rows = if suggestions.is_empty() {
        0
    } else {
        (suggestions.len() as u16).min(MAX_SUGGESTION_ROWS) + 2
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(suggestion_rows),
            Constraint::Length(3),
        ])
        .split(area);

    render_history(frame, state, &theme, rows[0]);

    if !suggestions.is_empty() {
        let focused = state.focus == Focus::List;
        let block = titled_block(&theme, " Suggestions (Enter to play) ".to_string(), focused);
        let width = rows[1].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = suggestions
            .iter()
            .map(|s| {
                ListItem::new(Line::from(Span::styled(
                    truncate_str(&s.label(), width),
                    Style::default().fg(theme.palette.text),
                )))
            })
            .collect();

        let mut list_state = ListState::default();
        if focused {
            list_state.select(Some(chat.cursor.selected));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(theme.palette.on_accent)
                    .bg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(theme.icons.selected);
        frame.render_stateful_widget(list, rows[1], &mut list_state);
    }

    let focused = state.focus == Focus::Input;
    let prompt = if focused {
        format!("{}▏", chat.input)
    } else if chat.input.is_empty() {
        "Tell me how you feel...".to_string()
    } else {
        chat.input.clone()
    };
    let input_style = if focused || !chat.input.is_empty() {
        Style::default().fg(theme.palette.text)
    } else {
        Style::default().fg(theme.palette.dim)
    };
    frame.render_widget(
        Paragraph::new(prompt)
            .style(input_style)
            .block(titled_block(&theme, " Message ".to_string(), focused)),
        rows[2],
    );
}

fn render_history(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let chat = &state.chat;
    let mut lines: Vec<Line> = Vec::new();
    for msg in &chat.messages {
        lines.extend(message_lines(msg, theme));
        lines.push(Line::default());
    }
    if chat.pending {
        lines.push(Line::from(Span::styled(
            format!("{} thinking...", LoadingSpinner::frame(state.tick)),
            Style::default().fg(theme.palette.dim),
        )));
    }

    // Stick to the bottom of the conversation.
    let width = area.width.max(1) as usize;
    let total: usize = lines.iter().map(|l| wrapped_height(l.width(), width)).sum();
    let scroll = total.saturating_sub(area.height as usize);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
}

fn message_lines(msg: &ChatMessage, theme: &Theme) -> Vec<Line<'static>> {
    let (who, who_style) = match msg.from {
        Speaker::User => (
            "You",
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Speaker::Bot => (
            "Bot",
            Style::default()
                .fg(theme.palette.soft)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let mut lines = Vec::new();
    for (i, text) in msg.text.lines().enumerate() {
        let label = if i == 0 { format!("{who}: ") } else { "     ".to_string() };
        lines.push(Line::from(vec![
            Span::styled(label, who_style),
            Span::styled(text.to_string(), Style::default().fg(theme.palette.text)),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(format!("{who}:"), who_style)));
    }
    for s in &msg.suggestions {
        lines.push(Line::from(Span::styled(
            format!("     {} {}", theme.icons.bullet, s.label()),
            Style::default().fg(theme.palette.dim),
        )));
    }
    lines
}

fn wrapped_height(line_width: usize, width: usize) -> usize {
    line_width.div_ceil(width).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::Suggestion;

    #[test]
    fn wrapped_height_counts_empty_lines() {
        assert_eq!(wrapped_height(0, 10), 1);
        assert_eq!(wrapped_height(10, 10), 1);
        assert_eq!(wrapped_height(11, 10), 2);
    }

    #[test]
    fn message_lines_list_suggestions_under_text() {
        let theme = get_theme();
        let msg = ChatMessage {
            from: Speaker::Bot,
            text: "Here you go\nEnjoy".to_string(),
            suggestions: vec![Suggestion::new("Happy", Some("Pharrell Williams"))],
        };
        let lines = message_lines(&msg, &theme);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].to_string().contains("Happy - Pharrell Williams"));
    }
}
