//! Theme plumbing. One fixed theme for now; widgets go through
//! [`Theme::current`] so a configurable theme can slot in later.

pub mod icons;
pub mod palette;

pub use icons::{spinner_frame, Icons};
pub use palette::Palette;

use once_cell::sync::Lazy;
use ratatui::symbols::border;

#[derive(Debug, Clone)]
pub struct Theme {
    pub palette: Palette,
    pub icons: Icons,
}

static DUSK: Lazy<Theme> = Lazy::new(|| Theme {
    palette: Palette::DUSK,
    icons: Icons::material(),
});

impl Theme {
    pub fn current() -> &'static Theme {
        &DUSK
    }

    pub fn border_set(&self) -> border::Set<'static> {
        border::ROUNDED
    }
}
