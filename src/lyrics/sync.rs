//! Active-line lookup for synchronized lyrics
//!
//! Maps a playback position onto the line being sung at that instant.
//! The lookup is a pure function of the line list and the position, so
//! it works the same for normal playback, seeks in either direction,
//! and repeated queries at one position.

use super::parser::LyricLine;

/// Which lyric line is active at some playback position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncState<'a> {
    /// The active line, if any
    #[allow(dead_code)]
    pub active_line: Option<&'a LyricLine>,
    /// Index of the active line within the list
    pub active_index: Option<usize>,
}

impl SyncState<'_> {
    /// No line active (before the first line, or no lyrics at all)
    pub fn none() -> SyncState<'static> {
        SyncState {
            active_line: None,
            active_index: None,
        }
    }
}

/// Find the line active at `current_secs`.
///
/// A line is active from its own start time up to (but not including)
/// the next line's start time; the last line stays active for the rest
/// of the track. Before the first start time no line is active.
pub fn locate_active_line(lines: &[LyricLine], current_secs: f64) -> SyncState<'_> {
    // Duplicate start times: exactly at the shared instant the earliest
    // duplicate is active; any greater time selects the last one. A
    // last-match scan would flip that boundary, so this scans forward.
    let found = lines.iter().enumerate().find(|&(i, line)| {
        current_secs >= line.start_secs
            && lines
                .get(i + 1)
                .is_none_or(|next| current_secs < next.start_secs)
    });

    match found {
        Some((i, line)) => SyncState {
            active_line: Some(line),
            active_index: Some(i),
        },
        None => SyncState::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_lines(starts: &[f64]) -> Vec<LyricLine> {
        starts
            .iter()
            .enumerate()
            .map(|(i, &s)| LyricLine::new(i.to_string(), s, format!("line {i}")))
            .collect()
    }

    #[test]
    fn test_empty_lines_yields_none() {
        let state = locate_active_line(&[], 42.0);
        assert_eq!(state.active_index, None);
        assert!(state.active_line.is_none());
    }

    #[test]
    fn test_before_first_line_yields_none() {
        let lines = make_lines(&[5.0, 15.0]);
        assert_eq!(locate_active_line(&lines, 0.0).active_index, None);
        assert_eq!(locate_active_line(&lines, 4.999).active_index, None);
        assert_eq!(locate_active_line(&lines, -1.0).active_index, None);
    }

    #[test]
    fn test_last_line_active_until_end() {
        let lines = make_lines(&[0.0, 5.0, 15.0]);
        assert_eq!(locate_active_line(&lines, 15.0).active_index, Some(2));
        assert_eq!(locate_active_line(&lines, 100.0).active_index, Some(2));
        assert_eq!(locate_active_line(&lines, 1e9).active_index, Some(2));
    }

    #[test]
    fn test_boundary_table() {
        let lines = make_lines(&[0.0, 5.0, 15.0]);
        assert_eq!(locate_active_line(&lines, -1.0).active_index, None);
        assert_eq!(locate_active_line(&lines, 0.0).active_index, Some(0));
        assert_eq!(locate_active_line(&lines, 4.9).active_index, Some(0));
        assert_eq!(locate_active_line(&lines, 5.0).active_index, Some(1));
        assert_eq!(locate_active_line(&lines, 14.9).active_index, Some(1));
        assert_eq!(locate_active_line(&lines, 100.0).active_index, Some(2));
    }

    #[test]
    fn test_returns_matching_line_reference() {
        let lines = make_lines(&[0.0, 5.0]);
        let state = locate_active_line(&lines, 6.0);
        assert_eq!(state.active_index, Some(1));
        let line = state.active_line.unwrap();
        assert_eq!(line.text, "line 1");
        assert_eq!(line.start_secs, 5.0);
    }

    #[test]
    fn test_duplicate_start_times() {
        let lines = make_lines(&[10.0, 10.0]);
        // At the shared instant the earlier duplicate wins.
        assert_eq!(locate_active_line(&lines, 10.0).active_index, Some(0));
        // Past it the later one takes over.
        assert_eq!(locate_active_line(&lines, 10.01).active_index, Some(1));
    }

    #[test]
    fn test_sweep_is_monotonic_and_changes_only_at_starts() {
        let lines = make_lines(&[0.0, 3.5, 7.0, 12.0]);
        let mut prev: Option<usize> = None;

        // Integer tenths avoid float accumulation across the sweep.
        for tenths in -10..=200 {
            let t = tenths as f64 / 10.0;
            let idx = locate_active_line(&lines, t).active_index;

            if let (Some(p), Some(i)) = (prev, idx) {
                assert!(i >= p, "index went backwards at t={t}");
            }
            if idx != prev
                && let Some(i) = idx
            {
                assert_eq!(
                    t, lines[i].start_secs,
                    "index changed away from a start time"
                );
            }
            prev = idx;
        }
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let lines = make_lines(&[0.0, 5.0, 15.0]);
        for t in [0.0, 2.5, 5.0, 9.9, 15.0, 60.0] {
            let first = locate_active_line(&lines, t).active_index;
            let second = locate_active_line(&lines, t).active_index;
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_backward_seek_needs_no_history() {
        let lines = make_lines(&[0.0, 5.0, 15.0]);
        assert_eq!(locate_active_line(&lines, 20.0).active_index, Some(2));
        // Jumping back resolves from scratch.
        assert_eq!(locate_active_line(&lines, 1.0).active_index, Some(0));
        assert_eq!(locate_active_line(&lines, 20.0).active_index, Some(2));
    }
}
