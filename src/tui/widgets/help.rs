//! Help screen: the key tables, rendered in two columns.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::state::AppState;
use crate::tui::theme::Theme;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const LEFT: &[Section] = &[
    (
        "Navigation",
        &[
            ("j / Down", "Move down"),
            ("k / Up", "Move up"),
            ("g / G", "Top / bottom"),
            ("Ctrl+d, PgDn", "Page down"),
            ("Ctrl+u, PgUp", "Page up"),
            ("Tab / S-Tab", "Next / previous screen"),
            ("1-4", "Jump to screen"),
            ("f", "Toggle lyrics view"),
            ("? / F1", "This screen"),
        ],
    ),
    (
        "Playback",
        &[
            ("Enter", "Play selected track"),
            ("Space", "Toggle pause"),
            ("x", "Stop"),
            ("n / p", "Next / previous track"),
            ("= / +", "Volume up"),
            ("- / _", "Volume down"),
            ("m", "Toggle mute"),
            ("] / [", "Seek 10s forward / back"),
            ("R", "Cycle repeat mode"),
        ],
    ),
];

const RIGHT: &[Section] = &[
    (
        "Search",
        &[
            ("/ or i", "Back to the query box"),
            ("Enter", "Search now"),
            ("Ctrl+u", "Clear input"),
            ("Down", "Focus results"),
            ("a", "Add result to queue"),
        ],
    ),
    (
        "Queue",
        &[
            ("d / Del", "Remove track"),
            ("c", "Clear queue"),
            ("s", "Toggle shuffle"),
            ("K / J", "Move track up / down"),
        ],
    ),
    (
        "Lyrics",
        &[
            ("j / k", "Scroll manually"),
            ("Ctrl+r", "Refetch lyrics"),
            ("Esc / f", "Back to search"),
        ],
    ),
    (
        "General",
        &[
            ("q", "Quit"),
            ("Ctrl+r / F5", "Refresh current screen"),
        ],
    ),
];

pub fn render(frame: &mut Frame, _state: &AppState, area: Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    frame.render_widget(column(LEFT), left);
    frame.render_widget(column(RIGHT), right);
}

fn column(sections: &[Section]) -> Paragraph<'static> {
    let theme = Theme::current();
    let mut lines: Vec<Line> = Vec::new();

    for (i, (title, binds)) in sections.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            format!("━━ {title} ━━"),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )));
        for (keys, what) in *binds {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{keys:13}"),
                    Style::default()
                        .fg(theme.palette.accent_soft)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*what, Style::default().fg(theme.palette.text)),
            ]));
        }
    }

    Paragraph::new(lines).wrap(Wrap { trim: false })
}
