//! Grayscale colors by role. Red is kept for tracks that cannot play.

use crate::playback::Phase;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    /// Keys, speaker names and in-progress notes.
    pub soft: Color,
    /// Behind query words matched in a title.
    pub match_bg: Color,
    pub cursor_bg: Color,
    /// Foreground on an `accent` background.
    pub on_accent: Color,
    pub border: Color,
    pub playing: Color,
    pub error: Color,
}

const fn gray(level: u8) -> Color {
    Color::Rgb(level, level, level)
}

impl Palette {
    pub const MONO: Self = Self {
        text: gray(0xff),
        dim: gray(0x88),
        accent: gray(0xff),
        soft: gray(0xc8),
        match_bg: gray(0x58),
        cursor_bg: gray(0x30),
        on_accent: gray(0x00),
        border: gray(0x40),
        playing: gray(0xff),
        error: Color::Rgb(0xe0, 0x6c, 0x75),
    };

    /// Color of the phase label next to the current track.
    pub fn phase(&self, phase: Phase) -> Color {
        match phase {
            Phase::Loading => self.soft,
            Phase::Unplayable => self.error,
            Phase::Empty | Phase::Ready => self.dim,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::MONO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unplayable_is_colored() {
        let p = Palette::MONO;
        assert_eq!(p.phase(Phase::Unplayable), p.error);
        for phase in [Phase::Empty, Phase::Loading, Phase::Ready] {
            let Color::Rgb(r, g, b) = p.phase(phase) else {
                panic!("rgb expected");
            };
            assert!(r == g && g == b, "{phase:?} should be gray");
        }
    }
}
