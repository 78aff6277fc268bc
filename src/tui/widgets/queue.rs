//! Queue screen: insertion-ordered track list with the playing row marked.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::state::AppState;
use crate::tui::theme::Theme;

use super::{ellipsize, format_clock, gutter};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = Theme::current();
    let icons = &theme.icons;
    let dim = Style::default().fg(theme.palette.dim);

    let padded = gutter(area);

    if state.queue.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Queue is empty. Press a on a search result to add it here.",
                dim,
            )),
            padded,
        );
        return;
    }

    let [header_row, _, list_area, hints_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(padded);

    let shuffle_badge = if state.queue.is_shuffled() {
        Span::styled(
            format!("{} shuffle", icons.shuffle),
            Style::default().fg(theme.palette.accent),
        )
    } else {
        Span::styled(format!("{} shuffle", icons.shuffle), dim)
    };
    let header = Line::from(vec![
        Span::styled(format!("{} tracks", state.queue.len()), dim),
        Span::raw("  "),
        shuffle_badge,
    ]);
    frame.render_widget(Paragraph::new(header), header_row);

    let height = list_area.height as usize;
    state.queue_view.scroll_to_cursor(height);

    let playing = state.queue.current_index();
    let max_title = (list_area.width as usize).saturating_sub(8);

    let mut rows: Vec<Line> = Vec::with_capacity(height);
    for (i, track) in state
        .queue_view
        .tracks
        .iter()
        .enumerate()
        .skip(state.queue_view.offset)
        .take(height)
    {
        let is_playing = playing == Some(i);
        let selected = i == state.queue_view.cursor;

        let marker = if is_playing {
            Span::styled(
                format!("{} ", icons.play),
                Style::default().fg(theme.palette.accent),
            )
        } else {
            Span::raw("  ")
        };

        let title_style = if selected {
            Style::default()
                .fg(theme.palette.text)
                .bg(theme.palette.raised)
                .add_modifier(Modifier::BOLD)
        } else if is_playing {
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.palette.text)
        };

        let mut spans = vec![
            marker,
            Span::styled(format!("{:>3}. ", i + 1), dim),
            Span::styled(ellipsize(&track.title, max_title), title_style),
        ];
        if !track.artist.is_empty() {
            spans.push(Span::styled(format!("  {}", track.artist), dim));
        }
        if let Some(secs) = track.duration_seconds {
            spans.push(Span::styled(
                format!("  [{}]", format_clock(secs as f64)),
                dim,
            ));
        }
        rows.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(rows), list_area);

    let sep = format!(" {} ", icons.bullet);
    let hints =
        ["Enter play", "d remove", "c clear", "s shuffle", "K/J move"].join(sep.as_str());
    frame.render_widget(Paragraph::new(Span::styled(hints, dim)), hints_row);
}
