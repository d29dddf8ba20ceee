//! Nerd Font icons for TUI display
//! Requires a Nerd Font to be installed (https://www.nerdfonts.com)

/// Icon set using Nerd Font glyphs
#[derive(Debug, Clone)]
pub struct Icons {
    // Playback controls
    pub play: &'static str,
    pub pause: &'static str,
    pub next: &'static str,

    // Volume
    pub volume_mute: &'static str,
    pub volume_low: &'static str,
    pub volume_high: &'static str,

    // Navigation
    pub search: &'static str,
    pub queue: &'static str,
    pub chat: &'static str,
    pub help: &'static str,

    // Status
    pub success: &'static str,
    pub error: &'static str,

    // Music
    pub music: &'static str,
    pub lyrics: &'static str,

    // Selection
    pub selected: &'static str,
    pub unselected: &'static str,

    // Progress bar
    pub progress_full: &'static str,
    pub progress_empty: &'static str,
    pub progress_head: &'static str,

    pub bullet: &'static str,
}

impl Icons {
    /// Nerd Font icon set
    pub const fn nerd() -> Self {
        Self {
            play: "\u{f04b}",        // nf-fa-play
            pause: "\u{f04c}",       // nf-fa-pause
            next: "\u{f051}",        // nf-fa-step_forward

            volume_mute: "\u{f026}", // nf-fa-volume_off
            volume_low: "\u{f027}",  // nf-fa-volume_down
            volume_high: "\u{f028}", // nf-fa-volume_up

            search: "\u{f002}",      // nf-fa-search
            queue: "\u{f03a}",       // nf-fa-list
            chat: "\u{f086}",        // nf-fa-comments
            help: "\u{f059}",        // nf-fa-question_circle

            success: "\u{f00c}",     // nf-fa-check
            error: "\u{f00d}",       // nf-fa-times

            music: "\u{f001}",       // nf-fa-music
            lyrics: "\u{f15c}",      // nf-fa-file_text_o

            selected: "\u{f054}",    // nf-fa-chevron_right
            unselected: " ",

            progress_full: "━",
            progress_empty: "─",
            progress_head: "●",

            bullet: "•",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}

/// Loading spinner frames
pub struct LoadingSpinner;

impl LoadingSpinner {
    /// Braille-based smooth spinner
    pub const BRAILLE: [&'static str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

    pub fn frame(tick: u64) -> &'static str {
        let idx = (tick / 4) as usize % Self::BRAILLE.len();
        Self::BRAILLE[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_advances_every_four_ticks() {
        assert_eq!(LoadingSpinner::frame(0), LoadingSpinner::frame(3));
        assert_ne!(LoadingSpinner::frame(3), LoadingSpinner::frame(4));
        assert_eq!(LoadingSpinner::frame(32), LoadingSpinner::frame(0));
    }
}
