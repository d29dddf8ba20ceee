//! Grayscale palette, Nerd Font glyphs and rounded borders.

pub mod icons;
pub mod palette;

pub use icons::{Icons, LoadingSpinner};
pub use palette::Palette;

use ratatui::symbols::border;

#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

impl Theme {
    pub fn border_set(&self) -> border::Set<'static> {
        border::ROUNDED
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::MONO,
            icons: Icons::nerd(),
        }
    }
}

/// There is one theme; widgets fetch it per frame.
pub fn get_theme() -> Theme {
    Theme::default()
}
