//! Color definitions for the dusk theme.

use ratatui::style::Color;

/// Named colors used across the widgets. Widgets never hardcode RGB values.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    /// Terminal background.
    pub bg: Color,
    /// Background for the row under the cursor.
    pub raised: Color,
    /// Default text.
    pub text: Color,
    /// De-emphasized text (hints, timestamps, already-sung lyrics).
    pub dim: Color,
    /// Primary accent, used for the active lyric line and focused borders.
    pub accent: Color,
    /// Softer accent for secondary highlights such as match underlays.
    pub accent_soft: Color,
    /// Unfocused borders and separators.
    pub frame: Color,
    /// Playing-state marker.
    pub active: Color,
    /// Error toasts and failure badges.
    pub danger: Color,
}

impl Palette {
    /// Near-black backdrop with amber accents.
    pub const DUSK: Self = Self {
        bg: Color::Rgb(0, 0, 0),
        raised: Color::Rgb(42, 42, 51),
        text: Color::Rgb(230, 230, 230),
        dim: Color::Rgb(138, 138, 148),
        accent: Color::Rgb(224, 175, 104),
        accent_soft: Color::Rgb(122, 97, 58),
        frame: Color::Rgb(59, 59, 69),
        active: Color::Rgb(158, 206, 106),
        danger: Color::Rgb(247, 118, 142),
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::DUSK
    }
}
