pub mod chat;
pub mod help;
pub mod now_playing;
pub mod player_page;
pub mod queue;
pub mod root;
pub mod sidebar;
pub mod track_list;

use crate::tui::theme::Theme;
use ratatui::{
    style::Style,
    widgets::{Block, Borders},
};

/// Bordered block with the theme's border set and an accented title.
pub(crate) fn titled_block(theme: &Theme, title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        theme.palette.accent
    } else {
        theme.palette.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(border))
        .title(title)
        .title_style(Style::default().fg(theme.palette.accent))
}

pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

/// `mm:ss`, or `h:mm:ss` past an hour.
pub(crate) fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_str("abc", 3), "abc");
        assert_eq!(truncate_str("abcdef", 2), "ab");
        assert_eq!(truncate_str("abc", 0), "");
    }

    #[test]
    fn formats_times() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.9), "01:05");
        assert_eq!(format_time(3725.0), "1:02:05");
        assert_eq!(format_time(f64::NAN), "00:00");
    }
}
