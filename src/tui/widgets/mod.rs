//! Screen widgets plus the small text helpers they share.

pub mod help;
pub mod lyrics;
pub mod now_playing;
pub mod queue;
pub mod root;
pub mod search;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Inset an area by one column on each side.
pub fn gutter(area: Rect) -> Rect {
    let [_, middle, _] = Layout::horizontal([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);
    middle
}

/// Shorten `s` to at most `max` characters, ending in an ellipsis when
/// anything was cut. Counts chars, not bytes, so wide titles stay intact.
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Format seconds as `m:ss`. Anything non-finite or non-positive reads
/// as `0:00` so a missing duration never renders garbage.
pub fn format_clock(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = secs as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Paint `text` right-aligned in the top row of `area`, on top of
/// whatever was rendered there before.
pub fn corner_tag(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let width = text.chars().count() as u16;
    if width == 0 || area.width <= width || area.height == 0 {
        return;
    }
    let x = area.x + area.width - width;
    frame.render_widget(
        Paragraph::new(text.to_string()).style(style),
        Rect::new(x, area.y, width, 1),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(60.0), "1:00");
        assert_eq!(format_clock(185.0), "3:05");
        assert_eq!(format_clock(3725.0), "62:05");
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(-4.0), "0:00");
    }

    #[test]
    fn test_ellipsize_keeps_short_strings() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("exactly", 7), "exactly");
    }

    #[test]
    fn test_ellipsize_truncates_long_strings() {
        assert_eq!(ellipsize("a longer title", 8), "a longe…");
        assert_eq!(ellipsize("abcdef", 3), "abc");
        assert_eq!(ellipsize("naïve résumé here", 6), "naïve…");
    }
}
