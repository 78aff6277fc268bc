use std::time::{Duration, Instant};

use crate::app::timers::{Debounce, IdleTimer};
use crate::lyrics::follow::ScrollFollow;
use crate::lyrics::sync::{locate_active_line, SyncState};
use crate::lyrics::ParsedLyrics;
use crate::queue::Queue;
use crate::search::Track;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Search,
    Lyrics,
    Queue,
    Help,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Search, Screen::Lyrics, Screen::Queue, Screen::Help];

    fn offset(self, by: isize) -> Self {
        let pos = Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(pos + by).rem_euclid(len) as usize]
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    /// Stable name used when persisting the last visited screen.
    pub fn name(self) -> &'static str {
        match self {
            Screen::Search => "search",
            Screen::Lyrics => "lyrics",
            Screen::Queue => "queue",
            Screen::Help => "help",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Which half of the search screen has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPane {
    Query,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

impl RepeatMode {
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::Off => "Repeat off",
            RepeatMode::All => "Repeat all",
            RepeatMode::One => "Repeat one",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// Short-lived notification shown in the player bar.
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    at: Instant,
}

impl Toast {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Info,
            at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Error,
            at: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.at.elapsed() > TOAST_TTL
    }
}

/// Cursor, scroll offset, and backing tracks for one scrollable list.
///
/// Cursor moves never touch the offset; the widget calls
/// [`ListView::scroll_to_cursor`] with the real viewport height at
/// render time, which is the only place that height is known.
#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub tracks: Vec<Track>,
    pub cursor: usize,
    pub offset: usize,
    pub loading: bool,
    pub loaded: bool,
}

impl ListView {
    fn last(&self) -> usize {
        self.tracks.len().saturating_sub(1)
    }

    pub fn cursor_up(&mut self, step: usize) {
        self.cursor = self.cursor.saturating_sub(step);
    }

    pub fn cursor_down(&mut self, step: usize) {
        if !self.tracks.is_empty() {
            self.cursor = (self.cursor + step).min(self.last());
        }
    }

    pub fn jump_top(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn jump_bottom(&mut self) {
        self.cursor = self.last();
    }

    pub fn under_cursor(&self) -> Option<&Track> {
        self.tracks.get(self.cursor)
    }

    /// Replace the backing tracks and put the cursor back at the top.
    pub fn fill(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.cursor = 0;
        self.offset = 0;
        self.loading = false;
        self.loaded = true;
    }

    /// Clamp the offset so the cursor row is inside a `height`-row
    /// viewport, scrolling as little as possible.
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 || self.tracks.is_empty() {
            self.offset = 0;
            return;
        }
        self.offset = self.offset.min(self.tracks.len().saturating_sub(height));
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = 0;
        self.offset = 0;
        self.loading = false;
        self.loaded = false;
    }
}

pub struct AppState {
    pub quit: bool,
    /// Bumped once per handled event; drives spinner frames.
    pub tick: u64,
    pub screen: Screen,

    // Search
    pub query: String,
    /// The query we most recently dispatched; results for anything else
    /// are stale and get dropped.
    pub active_query: Option<String>,
    pub search_pane: SearchPane,
    pub search_debounce: Debounce,
    pub results: ListView,

    // Queue
    pub queue: Queue,
    pub queue_view: ListView,

    // Playback
    pub current: Option<Track>,
    pub paused: bool,
    pub elapsed_secs: f64,
    pub duration_secs: f64,
    pub volume: u8,
    pub muted: bool,
    pub repeat: RepeatMode,

    // Lyrics
    pub lyrics: Option<ParsedLyrics>,
    /// Video id the lyrics fields belong to.
    pub lyrics_for: Option<String>,
    pub lyrics_loading: bool,
    pub follow: ScrollFollow,
    pub lyrics_scroll: usize,

    // Idle detection for auto-hiding the player bar
    pub idle: IdleTimer,
    pub idle_wake: Debounce,

    pub toast: Option<Toast>,
    pub status: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            quit: false,
            tick: 0,
            screen: Screen::Search,
            query: String::new(),
            active_query: None,
            search_pane: SearchPane::Query,
            search_debounce: Debounce::default(),
            results: ListView::default(),
            queue: Queue::new(),
            queue_view: ListView::default(),
            current: None,
            paused: false,
            elapsed_secs: 0.0,
            duration_secs: 0.0,
            volume: 80,
            muted: false,
            repeat: RepeatMode::default(),
            lyrics: None,
            lyrics_for: None,
            lyrics_loading: false,
            follow: ScrollFollow::default(),
            lyrics_scroll: 0,
            idle: IdleTimer::new(Duration::from_secs(4)),
            idle_wake: Debounce::default(),
            toast: None,
            status: String::new(),
        }
    }

    /// Which lyric line is active at the current playback position.
    /// Unsynced lyrics never have an active line.
    pub fn sync_state(&self) -> SyncState<'_> {
        match &self.lyrics {
            Some(l) if l.synced => locate_active_line(&l.lines, self.elapsed_secs),
            _ => SyncState::none(),
        }
    }

    /// Player bar visibility: hidden only while actively playing with
    /// no recent input.
    pub fn show_player_bar(&self, now: Instant) -> bool {
        self.current.is_none() || self.paused || !self.idle.is_idle(now)
    }

    /// Volume actually sent to the player (zero while muted).
    pub fn effective_volume(&self) -> u8 {
        if self.muted { 0 } else { self.volume }
    }

    /// Mirror the queue into its view, keeping the cursor in range.
    pub fn refresh_queue_view(&mut self) {
        let cursor = self.queue_view.cursor.min(self.queue.len().saturating_sub(1));
        self.queue_view.tracks = self.queue.tracks().to_vec();
        self.queue_view.cursor = cursor;
        self.queue_view.loaded = true;
    }

    /// The list the current screen scrolls. Lyrics scrolling is handled
    /// separately since it is a text sheet, not a track list.
    pub fn screen_view_mut(&mut self) -> &mut ListView {
        match self.screen {
            Screen::Queue => &mut self.queue_view,
            _ => &mut self.results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                video_id: format!("id{i}"),
                title: format!("Track {i}"),
                artist: "Artist".into(),
                duration_seconds: None,
                thumbnail_url: None,
            })
            .collect()
    }

    #[test]
    fn test_screen_cycle_round_trips() {
        for screen in Screen::ALL {
            assert_eq!(screen.next().prev(), screen);
            assert_eq!(Screen::from_name(screen.name()), Some(screen));
        }
        assert_eq!(Screen::from_name("bogus"), None);
    }

    #[test]
    fn test_repeat_mode_cycle() {
        let m = RepeatMode::Off;
        assert_eq!(m.cycled(), RepeatMode::All);
        assert_eq!(m.cycled().cycled(), RepeatMode::One);
        assert_eq!(m.cycled().cycled().cycled(), RepeatMode::Off);
    }

    #[test]
    fn test_list_view_scrolls_to_cursor() {
        let mut view = ListView::default();
        view.fill(dummy_tracks(20));

        view.cursor = 12;
        view.scroll_to_cursor(10);
        assert_eq!(view.offset, 3);

        view.cursor = 2;
        view.scroll_to_cursor(10);
        assert_eq!(view.offset, 2);
    }

    #[test]
    fn test_list_view_offset_clamps_when_list_shrinks() {
        let mut view = ListView::default();
        view.fill(dummy_tracks(30));
        view.cursor = 29;
        view.scroll_to_cursor(10);
        assert_eq!(view.offset, 20);

        view.tracks.truncate(12);
        view.cursor = 11;
        view.scroll_to_cursor(10);
        assert_eq!(view.offset, 2);
    }

    #[test]
    fn test_fill_resets_cursor_and_offset() {
        let mut view = ListView::default();
        view.fill(dummy_tracks(50));
        view.cursor = 40;
        view.scroll_to_cursor(10);
        assert!(view.offset > 0);

        view.fill(dummy_tracks(5));
        assert_eq!(view.cursor, 0);
        assert_eq!(view.offset, 0);
        assert!(view.loaded);
    }

    #[test]
    fn test_sync_state_requires_synced_lyrics() {
        let mut state = AppState::new();
        state.elapsed_secs = 10.0;
        assert!(state.sync_state().active_index.is_none());

        state.lyrics = Some(ParsedLyrics::parse_plain("la la"));
        assert!(state.sync_state().active_index.is_none());

        state.lyrics = Some(ParsedLyrics::parse("[00:05.00]la"));
        assert_eq!(state.sync_state().active_index, Some(0));
    }

    #[test]
    fn test_player_bar_hides_only_when_playing_and_idle() {
        let mut state = AppState::new();
        let now = Instant::now();
        let later = now + Duration::from_secs(10);
        state.idle.reset(now);

        // Nothing playing: always visible.
        assert!(state.show_player_bar(later));

        state.current = dummy_tracks(1).pop();
        assert!(state.show_player_bar(now));
        assert!(!state.show_player_bar(later));

        // Paused playback keeps the bar up.
        state.paused = true;
        assert!(state.show_player_bar(later));
    }
}
