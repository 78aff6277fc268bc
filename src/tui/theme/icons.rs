//! Glyphs for the TUI. Most come from the Material Design range of a
//! Nerd Font v3 (https://www.nerdfonts.com); a few are plain Unicode so
//! the lyric views stay readable without a patched font.

#[derive(Debug, Clone)]
pub struct Icons {
    pub play: &'static str,
    pub pause: &'static str,
    pub skip_back: &'static str,
    pub skip_fwd: &'static str,
    pub repeat_all: &'static str,
    pub repeat_one: &'static str,
    pub shuffle: &'static str,
    pub vol_off: &'static str,
    pub vol_low: &'static str,
    pub vol_high: &'static str,
    pub search: &'static str,
    pub lyrics: &'static str,
    pub queue: &'static str,
    pub help: &'static str,
    pub ok: &'static str,
    pub alert: &'static str,
    pub chevron: &'static str,
    /// Plain Unicode on purpose, shown inline with lyric text.
    pub note: &'static str,
    pub bullet: &'static str,
    pub bar_filled: &'static str,
    pub bar_empty: &'static str,
    pub bar_knob: &'static str,
}

impl Icons {
    pub const fn material() -> Self {
        Self {
            play: "\u{f040a}",      // md-play
            pause: "\u{f03e4}",     // md-pause
            skip_back: "\u{f04ae}", // md-skip_previous
            skip_fwd: "\u{f04ad}",  // md-skip_next
            repeat_all: "\u{f0456}", // md-repeat
            repeat_one: "\u{f0458}", // md-repeat_once
            shuffle: "\u{f049d}",   // md-shuffle
            vol_off: "\u{f0581}",   // md-volume_off
            vol_low: "\u{f0580}",   // md-volume_medium
            vol_high: "\u{f057e}",  // md-volume_high
            search: "\u{f0349}",    // md-magnify
            lyrics: "\u{f09a8}",    // md-script_text
            queue: "\u{f0411}",     // md-playlist_play
            help: "\u{f0625}",      // md-help_circle_outline
            ok: "\u{f012c}",        // md-check
            alert: "\u{f0026}",     // md-alert
            chevron: "\u{f0142}",   // md-chevron_right
            note: "♪",
            bullet: "·",
            bar_filled: "━",
            bar_empty: "┄",
            bar_knob: "◆",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::material()
    }
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Pick a spinner frame from the app tick counter. The tick advances once
/// per handled event, so the divisor keeps the animation from strobing
/// while mpv position updates stream in.
pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick / 3) as usize % SPINNER_FRAMES.len()]
}
