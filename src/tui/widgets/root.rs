//! Top-level layout: the active screen above, the player bar below.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::state::{AppState, Screen};
use crate::tui::theme::Theme;

use super::{ellipsize, gutter, help, lyrics, now_playing, queue, search};

/// Rows taken by the bottom bar, borders included.
const BAR_ROWS: u16 = 7;

/// ┌─────────────────────────────────────────────────────┐
/// │                  Active screen                      │
/// │            (search / lyrics / queue / help)         │
/// ├────────────────────┬────────────────────────────────┤
/// │       Player       │           Lyric strip          │
/// └────────────────────┴────────────────────────────────┘
///
/// The bottom bar hides itself during playback once input has been
/// idle for a while, leaving the screen full-height.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let show_bar = state.show_player_bar(Instant::now());
    let bar_rows = if show_bar { BAR_ROWS } else { 0 };

    let [content, bar] =
        Layout::vertical([Constraint::Min(8), Constraint::Length(bar_rows)]).areas(frame.area());

    draw_screen(frame, state, content);

    if show_bar {
        let [player, strip] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(bar);
        now_playing::render(frame, state, player);
        draw_lyric_strip(frame, state, strip);
    }
}

fn screen_title(screen: Screen) -> String {
    let icons = &Theme::current().icons;
    match screen {
        Screen::Search => format!(" {} Search ", icons.search),
        Screen::Lyrics => format!(" {} Lyrics ", icons.lyrics),
        Screen::Queue => format!(" {} Queue ", icons.queue),
        Screen::Help => format!(" {} Keybinds ", icons.help),
    }
}

fn draw_screen(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = Theme::current();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.frame))
        .title(screen_title(state.screen))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state.screen {
        Screen::Search => {
            let [query, list] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(inner);
            search::render_query_box(frame, state, query);
            search::render(frame, state, list);
        }
        Screen::Lyrics => lyrics::render(frame, state, inner),
        Screen::Queue => queue::render(frame, state, inner),
        Screen::Help => help::render(frame, state, inner),
    }
}

/// The line being sung with one line of context on either side.
fn draw_lyric_strip(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = Theme::current();
    let dim = Style::default().fg(theme.palette.dim);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.frame))
        .title(format!(" {} Lyrics ", theme.icons.lyrics))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = gutter(inner);

    let lines = state
        .lyrics
        .as_ref()
        .map(|l| l.lines.as_slice())
        .unwrap_or_default();
    if lines.is_empty() {
        let text = if state.lyrics_loading {
            "Loading..."
        } else {
            "No lyrics available"
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, dim))).alignment(Alignment::Center),
            padded,
        );
        return;
    }

    // Unsynced lyrics pin the window to the top of the sheet.
    let active = state.sync_state().active_index;
    let anchor = active.unwrap_or(0);

    let max_width = padded.width.saturating_sub(4) as usize;
    let start = anchor.saturating_sub(1);
    let end = (anchor + 2).min(lines.len());

    let mut rows: Vec<Line> = Vec::with_capacity(3);
    for (i, line) in lines.iter().enumerate().take(end).skip(start) {
        let is_active = active == Some(i);
        let style = if is_active {
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            dim
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

    // Center the three rows vertically.
    let pad = (padded.height as usize).saturating_sub(rows.len()) / 2;
    let mut centered: Vec<Line> = vec![Line::default(); pad];
    centered.extend(rows);

    frame.render_widget(Paragraph::new(centered), padded);
}
