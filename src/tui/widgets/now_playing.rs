//! Compact player panel for the bottom bar.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::state::{AppState, RepeatMode, ToastKind};
use crate::tui::theme::Theme;

use super::{ellipsize, format_clock, gutter};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = Theme::current();
    let icons = &theme.icons;
    let dim = Style::default().fg(theme.palette.dim);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.frame))
        .title(format!(" {} Player ", icons.note))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = gutter(inner);
    let [title_row, artist_row, bar_row, controls_row, note_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(padded);

    let width = padded.width as usize;

    let title = state
        .current
        .as_ref()
        .map(|t| t.title.as_str())
        .unwrap_or("Not playing");
    frame.render_widget(
        Paragraph::new(Span::styled(
            ellipsize(title, width),
            Style::default()
                .fg(theme.palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        title_row,
    );

    let artist = state
        .current
        .as_ref()
        .map(|t| t.artist.as_str())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Span::styled(ellipsize(artist, width), dim)),
        artist_row,
    );

    let ratio = if state.current.is_some() && state.duration_secs > 0.0 {
        (state.elapsed_secs / state.duration_secs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    frame.render_widget(
        Paragraph::new(progress_line(bar_row.width as usize, ratio)),
        bar_row,
    );

    frame.render_widget(Paragraph::new(controls_line(state)), controls_row);

    // Toasts take the note row; otherwise the latest status shows there.
    if let Some(toast) = &state.toast
        && !toast.expired()
    {
        let (icon, color) = match toast.kind {
            ToastKind::Info => (icons.ok, theme.palette.active),
            ToastKind::Error => (icons.alert, theme.palette.danger),
        };
        let line = Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(
                ellipsize(&toast.text, width.saturating_sub(2)),
                Style::default().fg(color),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), note_row);
    } else if !state.status.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(ellipsize(&state.status, width), dim)),
            note_row,
        );
    }
}

/// Progress bar with a knob marking the playhead.
fn progress_line(width: usize, ratio: f64) -> Line<'static> {
    let theme = Theme::current();
    let icons = &theme.icons;
    if width < 3 {
        return Line::default();
    }
    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let rest = width.saturating_sub(filled + 1);
    Line::from(vec![
        Span::styled(
            icons.bar_filled.repeat(filled),
            Style::default().fg(theme.palette.accent),
        ),
        Span::styled(icons.bar_knob, Style::default().fg(theme.palette.accent)),
        Span::styled(
            icons.bar_empty.repeat(rest),
            Style::default().fg(theme.palette.frame),
        ),
    ])
}

/// `elapsed / total` clock, transport icons, volume, and mode badges.
fn controls_line(state: &AppState) -> Line<'static> {
    let theme = Theme::current();
    let icons = &theme.icons;
    let dim = Style::default().fg(theme.palette.dim);
    let badge = Style::default().fg(theme.palette.accent_soft);

    let state_icon = if state.paused { icons.play } else { icons.pause };

    let volume = state.effective_volume();
    let vol_icon = if state.muted || volume == 0 {
        icons.vol_off
    } else if volume < 50 {
        icons.vol_low
    } else {
        icons.vol_high
    };

    let mut spans = vec![
        Span::styled(
            format!(
                "{} / {}",
                format_clock(state.elapsed_secs),
                format_clock(state.duration_secs)
            ),
            dim,
        ),
        Span::raw("  "),
        Span::styled(icons.skip_back, dim),
        Span::raw(" "),
        Span::styled(state_icon, Style::default().fg(theme.palette.active)),
        Span::raw(" "),
        Span::styled(icons.skip_fwd, dim),
        Span::raw("  "),
        Span::styled(vol_icon, dim),
        Span::raw(" "),
        Span::styled(format!("{volume}%"), dim),
    ];

    match state.repeat {
        RepeatMode::Off => {}
        RepeatMode::All => {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(icons.repeat_all, badge));
        }
        RepeatMode::One => {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(icons.repeat_one, badge));
        }
    }
    if state.queue.is_shuffled() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(icons.shuffle, badge));
    }

    Line::from(spans)
}
