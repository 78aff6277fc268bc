//! Search screen: query box on top, result list underneath.

use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::state::{AppState, SearchPane};
use crate::tui::theme::{spinner_frame, Theme};

use super::{corner_tag, format_clock};

pub fn render_query_box(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = Theme::current();
    let focused = state.search_pane == SearchPane::Query;
    let border = if focused {
        theme.palette.accent
    } else {
        theme.palette.frame
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(border))
        .title(" Query ")
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);

    let prompt = if state.results.loading {
        format!("{} {}", state.query, spinner_frame(state.tick))
    } else {
        state.query.clone()
    };
    frame.render_widget(
        Paragraph::new(Line::from(prompt))
            .style(Style::default().fg(theme.palette.text))
            .block(block),
        area,
    );

    // Park the real terminal cursor at the end of the input.
    if focused && !state.results.loading && inner.width > 0 {
        let x = inner.x + (state.query.chars().count() as u16).min(inner.width - 1);
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = Theme::current();
    let dim = Style::default().fg(theme.palette.dim);

    if state.results.loading {
        frame.render_widget(
            Paragraph::new(format!("{} Searching...", spinner_frame(state.tick))).style(dim),
            area,
        );
        return;
    }

    if state.results.tracks.is_empty() {
        let text = if state.results.loaded {
            "No results. Try a different query."
        } else {
            "Search for music above"
        };
        frame.render_widget(Paragraph::new(text).style(dim), area);
        return;
    }

    let height = area.height as usize;
    state.results.scroll_to_cursor(height);

    // Highlight against the query these results answer, not whatever is
    // being typed right now.
    let query = state.active_query.as_deref().unwrap_or("");

    let mut rows: Vec<Line> = Vec::with_capacity(height);
    for (i, track) in state
        .results
        .tracks
        .iter()
        .enumerate()
        .skip(state.results.offset)
        .take(height)
    {
        let selected = i == state.results.cursor;
        let base = if selected {
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.palette.text)
        };
        let marker = if selected {
            Span::styled(
                format!("{} ", theme.icons.chevron),
                Style::default().fg(theme.palette.accent),
            )
        } else {
            Span::raw("  ")
        };

        let mut spans = vec![marker];
        spans.extend(highlight_title(&track.title, query, base));
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

    frame.render_widget(Paragraph::new(rows), area);

    if state.results.tracks.len() > height {
        let tag = format!("{}/{}", state.results.cursor + 1, state.results.tracks.len());
        corner_tag(frame, area, &tag, dim);
    }
}

/// Split `text` into spans with query words underlaid.
fn highlight_title<'a>(text: &'a str, query: &str, base: Style) -> Vec<Span<'a>> {
    let hit = base.bg(Theme::current().palette.accent_soft);

    let mut marks: Vec<(usize, usize)> = Vec::new();
    for word in query.split_whitespace() {
        let mut from = 0;
        while let Some((start, end)) = find_ci(text, word, from) {
            marks.push((start, end));
            from = end;
        }
    }
    marks.sort_unstable();

    let mut spans = Vec::new();
    let mut last = 0;
    for (start, end) in marks {
        // Overlapping word hits keep the earlier mark.
        if start < last {
            continue;
        }
        if start > last {
            spans.push(Span::styled(&text[last..start], base));
        }
        spans.push(Span::styled(&text[start..end], hit));
        last = end;
    }
    if last < text.len() {
        spans.push(Span::styled(&text[last..], base));
    }

    if spans.is_empty() {
        vec![Span::styled(text, base)]
    } else {
        spans
    }
}

/// Byte range of the first case-insensitive occurrence of `needle` in
/// `haystack` at or after `from`. Walks chars and accumulates their
/// widths, so the returned range always sits on char boundaries even
/// when lowercasing changes a character's byte length.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<(usize, usize)> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    for (offset, _) in haystack[from..].char_indices() {
        let start = from + offset;
        let mut rest = haystack[start..].chars();
        let mut end = start;
        let mut matched = true;
        for nc in needle.chars() {
            match rest.next() {
                Some(hc) if hc.to_lowercase().eq(nc.to_lowercase()) => end += hc.len_utf8(),
                _ => {
                    matched = false;
                    break;
                }
            }
        }
        if matched {
            return Some((start, end));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ci_is_case_insensitive() {
        assert_eq!(find_ci("Hello World", "world", 0), Some((6, 11)));
        assert_eq!(find_ci("Hello World", "o", 5), Some((7, 8)));
        assert_eq!(find_ci("Hello", "xyz", 0), None);
        assert_eq!(find_ci("Hello", "", 0), None);
    }

    #[test]
    fn test_find_ci_multibyte_boundaries() {
        // Dotted capital I lowercases to two chars, so byte offsets in a
        // lowercased copy would not line up with the original text.
        let text = "İstanbul Pop";
        let (start, end) = find_ci(text, "pop", 0).unwrap();
        assert_eq!(&text[start..end], "Pop");

        assert_eq!(find_ci("Rosé", "rosé", 0), Some((0, 5)));
        assert_eq!(find_ci("ab", "abc", 0), None);
    }

    #[test]
    fn test_highlight_title_spans_reassemble() {
        let spans = highlight_title("Señor Blues (Live)", "señor blues", Style::default());
        let joined: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(joined, "Señor Blues (Live)");
        assert!(spans.len() > 1);
    }

    #[test]
    fn test_highlight_title_without_match_is_one_span() {
        let spans = highlight_title("Some Title", "zzz", Style::default());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content.as_ref(), "Some Title");
    }
}
