//! Lyrics screen: the full sheet, following playback when synced.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::state::AppState;
use crate::lyrics::follow::centered_offset;
use crate::tui::theme::{spinner_frame, Theme};

use super::{corner_tag, ellipsize, gutter};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = Theme::current();
    let padded = gutter(area);

    if state.current.is_none() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nothing playing. Pick a track on the Search screen.",
                Style::default().fg(theme.palette.dim),
            )),
            padded,
        );
        return;
    }

    let [header, sheet] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(3)]).areas(padded);
    draw_header(frame, state, header);
    draw_sheet(frame, state, sheet);
}

fn draw_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = Theme::current();
    let dim = Style::default().fg(theme.palette.dim);

    let label = state.current.as_ref().map(|t| t.label()).unwrap_or_default();

    let badge = if state.lyrics_loading {
        Span::styled(format!("{} fetching", spinner_frame(state.tick)), dim)
    } else {
        match &state.lyrics {
            Some(l) if l.synced => {
                Span::styled("synced", Style::default().fg(theme.palette.accent))
            }
            Some(_) => Span::styled("plain text", dim),
            None => Span::styled("no lyrics", dim),
        }
    };

    let max_width = (area.width as usize).saturating_sub(16);
    let line = Line::from(vec![
        Span::styled(
            ellipsize(&label, max_width),
            Style::default()
                .fg(theme.palette.text)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        badge,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_sheet(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = Theme::current();
    let dim = Style::default().fg(theme.palette.dim);
    let height = area.height as usize;

    if state.lyrics_loading && state.lyrics.is_none() {
        frame.render_widget(
            Paragraph::new(format!("{} Fetching lyrics...", spinner_frame(state.tick))).style(dim),
            area,
        );
        return;
    }

    let total = state.lyrics.as_ref().map_or(0, |l| l.lines.len());
    if total == 0 {
        frame.render_widget(Paragraph::new("No lyrics available").style(dim), area);
        return;
    }

    let active = state.sync_state().active_index;

    // A newly active line re-centers the view; manual scrolling holds
    // until the next line change.
    if let Some(target) = state.follow.take_pending() {
        state.lyrics_scroll = centered_offset(target, height, total);
    }
    state.lyrics_scroll = state.lyrics_scroll.min(total.saturating_sub(height));

    let Some(lyrics) = &state.lyrics else {
        return;
    };
    let scroll = state.lyrics_scroll;
    let max_width = (area.width as usize).saturating_sub(4);

    let mut rows: Vec<Line> = Vec::with_capacity(height);
    for (i, line) in lyrics.lines.iter().enumerate().skip(scroll).take(height) {
        let is_active = active == Some(i);
        let sung = active.is_some_and(|a| i < a);

        let style = if is_active {
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else if sung {
            dim
        } else {
            Style::default().fg(theme.palette.text)
        };
        let prefix = if is_active {
            format!("{} ", theme.icons.note)
        } else {
            "  ".to_string()
        };

        rows.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(ellipsize(&line.text, max_width), style),
        ]));
    }

    // Hints at the bottom when there is room.
    if rows.len() < height {
        for _ in 0..(height - rows.len()).saturating_sub(1) {
            rows.push(Line::default());
        }
        rows.push(Line::from(Span::styled(
            "j/k: Scroll  g/G: Top/Bottom  Ctrl+r: Refetch  Esc: Back",
            dim,
        )));
    }

    frame.render_widget(Paragraph::new(rows), area);

    if total > height {
        let shown = active.map_or(scroll + 1, |a| a + 1);
        corner_tag(frame, area, &format!("{shown}/{total}"), dim);
    }
}
