//! Application core: event loop, action handling, and the async
//! dispatch of searches, lyrics fetches, and player commands.

pub mod actions;
pub mod events;
pub mod state;
pub mod timers;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use lru::LruCache;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::input;
use crate::lyrics::{LyricsClient, ParsedLyrics, provider};
use crate::player::MpvHandle;
use crate::search::{SearchClient, Track};
use crate::storage::{self, Storage};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, NetworkEvent, PlayerEvent, TimerEvent};
use state::{AppState, RepeatMode, Screen, SearchPane, Toast};

/// Cached search results older than this are refetched.
const SEARCH_CACHE_TTL_SECS: i64 = 24 * 60 * 60;

/// Previous restarts the current track past this position; before it,
/// the queue steps back.
const PREV_RESTART_THRESHOLD_SECS: f64 = 3.0;

const DB_FILE: &str = "cache.sqlite3";
const VOLUME_STEP: u8 = 5;
const SEEK_STEP_SECS: f64 = 10.0;
const PAGE_STEP: usize = 10;

pub struct App {
    cfg: Config,
    config_path: PathBuf,
    state: AppState,
    search_client: SearchClient,
    lyrics_client: LyricsClient,
    /// Lyrics shown this session, keyed by video id
    lyrics_hot: LruCache<String, ParsedLyrics>,
    mpv: Option<MpvHandle>,
}

impl App {
    pub fn new(cfg: Config, config_path: PathBuf) -> anyhow::Result<Self> {
        let search_client = SearchClient::new(cfg.search.api_key.clone());
        let lyrics_client = match cfg.lyrics.base_url.as_deref() {
            Some(url) => LyricsClient::with_base_url(url),
            None => LyricsClient::new(),
        };
        // Fail early if the cache database cannot be created.
        let _ = Storage::open(&cfg.paths.data_dir.join(DB_FILE))?;

        let mut state = AppState::new();
        state.volume = cfg.player.volume;
        state.idle = timers::IdleTimer::new(Duration::from_secs(cfg.ui.idle_secs));
        if let Some(name) = &cfg.ui.last_screen
            && let Some(screen) = Screen::from_name(name)
        {
            state.screen = screen;
        }

        Ok(Self {
            cfg,
            config_path,
            state,
            search_client,
            lyrics_client,
            lyrics_hot: LruCache::new(const { NonZeroUsize::new(32).unwrap() }),
            mpv: None,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_reader(tx.clone());
        // No render ticker: the UI redraws after input, timer, network,
        // and player events only.

        // Start the mpv backend, best-effort.
        let mpv_log = self.cfg.paths.data_dir.join("mpv.log");
        match MpvHandle::spawn(
            tx.clone(),
            self.cfg.player.audio_device.as_deref(),
            Some(&mpv_log),
        )
        .await
        {
            Ok(handle) => self.mpv = Some(handle),
            Err(e) => {
                self.state.toast = Some(Toast::error(format!("mpv disabled: {e:#}")));
                self.mpv = None;
            }
        }

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            match ev {
                Event::Input(ie) => {
                    self.touch_idle(&tx);
                    if let Some(action) = input::translate(&self.state, ie) {
                        self.on_action(action, &tx).await;
                    }
                }
                Event::Player(pe) => self.on_player(pe, &tx).await,
                Event::Network(ne) => self.on_network(ne),
                Event::Timer(te) => self.on_timer(te, &tx),
            }

            if self.state.quit {
                break;
            }
            self.state.tick = self.state.tick.wrapping_add(1);
            tui::draw(terminal, &mut self.state)?;
        }

        self.store_session();
        Ok(())
    }

    /// Any input resets the idle clock and schedules the wakeup that
    /// will eventually hide the player bar again.
    fn touch_idle(&mut self, tx: &mpsc::Sender<Event>) {
        self.state.idle.reset(Instant::now());
        let seq = self.state.idle_wake.arm();
        let timeout = self.state.idle.timeout();
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(Event::Timer(TimerEvent::IdleFire { seq })).await;
        });
    }

    fn arm_debounce(&mut self, tx: &mpsc::Sender<Event>) {
        let seq = self.state.search_debounce.arm();
        let delay = Duration::from_millis(self.cfg.search.debounce_ms);
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::Timer(TimerEvent::SearchQuiet { seq })).await;
        });
    }

    /// Volume and last screen persist across runs.
    fn store_session(&mut self) {
        self.cfg.player.volume = self.state.volume;
        self.cfg.ui.last_screen = Some(self.state.screen.name().to_string());
        let _ = crate::config::persist(&self.cfg, Some(&self.config_path));
    }

    fn on_timer(&mut self, te: TimerEvent, tx: &mpsc::Sender<Event>) {
        match te {
            TimerEvent::SearchQuiet { seq } => {
                if !self.state.search_debounce.is_current(seq) {
                    return;
                }
                if self.state.query.trim().is_empty() {
                    self.state.results.clear();
                    self.state.active_query = None;
                    self.state.status.clear();
                } else {
                    self.dispatch_search(tx);
                }
            }
            TimerEvent::IdleFire { seq } => {
                // Only the wakeup from the latest reset can cross the
                // idle deadline; stale ones land while still active.
                // The draw after this event re-evaluates bar visibility.
                if self.state.idle_wake.is_current(seq) {
                    self.state.idle_wake.cancel();
                }
            }
        }
    }

    async fn on_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::SubmitSearch => {
                self.state.search_debounce.cancel();
                if !self.state.query.trim().is_empty() {
                    self.state.search_pane = SearchPane::Results;
                }
                self.dispatch_search(tx);
            }
            Action::QueryChar(_) | Action::QueryBackspace | Action::QueryClear => {
                self.apply(action);
                self.arm_debounce(tx);
            }
            Action::Refetch => match self.state.screen {
                Screen::Search => self.dispatch_search(tx),
                Screen::Lyrics => {
                    if let Some(track) = self.state.current.clone() {
                        self.lyrics_hot.pop(&track.video_id);
                        self.dispatch_lyrics(&track, tx, true);
                    }
                }
                _ => {}
            },
            Action::PlaySelected => self.play_selected(tx).await,
            Action::TogglePause => {
                if let Some(mpv) = &self.mpv
                    && let Err(e) = mpv.toggle_pause().await
                {
                    self.state.status = format!("mpv error: {e:#}");
                }
            }
            Action::Stop => {
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.stop().await;
                }
                self.state.current = None;
                self.state.paused = false;
                self.state.elapsed_secs = 0.0;
                self.state.duration_secs = 0.0;
                self.state.lyrics = None;
                self.state.lyrics_for = None;
                self.state.lyrics_loading = false;
                self.state.follow.reset();
                // With nothing playing the bar stays up.
                self.state.idle.cancel();
                self.state.status = "Stopped".into();
            }
            Action::NextTrack => self.skip_next(tx).await,
            Action::PrevTrack => self.skip_prev(tx).await,
            Action::VolumeUp => {
                self.state.muted = false;
                self.state.volume = self.state.volume.saturating_add(VOLUME_STEP).min(100);
                self.push_volume().await;
            }
            Action::VolumeDown => {
                self.state.muted = false;
                self.state.volume = self.state.volume.saturating_sub(VOLUME_STEP);
                self.push_volume().await;
            }
            Action::ToggleMute => {
                self.state.muted = !self.state.muted;
                self.push_volume().await;
                self.state.status = if self.state.muted {
                    "Muted".into()
                } else {
                    format!("Volume: {}", self.state.volume)
                };
            }
            Action::SeekForward => {
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.seek_relative(SEEK_STEP_SECS).await;
                }
            }
            Action::SeekBack => {
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.seek_relative(-SEEK_STEP_SECS).await;
                }
            }
            Action::CycleRepeat => {
                self.state.repeat = self.state.repeat.cycled();
                self.state.status = self.state.repeat.label().into();
            }
            Action::ToggleShuffle => {
                self.state.queue.toggle_shuffle();
                self.state.status = if self.state.queue.is_shuffled() {
                    "Shuffle on".into()
                } else {
                    "Shuffle off".into()
                };
            }
            Action::EnqueueSelected => {
                if let Some(track) = self.state.results.under_cursor().cloned() {
                    self.state.toast = Some(Toast::info(format!("Queued: {}", track.title)));
                    self.state.queue.push(track);
                    self.state.refresh_queue_view();
                }
            }
            Action::RemoveFromQueue => {
                let idx = self.state.queue_view.cursor;
                if idx < self.state.queue.len() {
                    self.state.queue.remove(idx);
                    self.state.refresh_queue_view();
                }
            }
            Action::ClearQueue => {
                self.state.queue.clear();
                self.state.refresh_queue_view();
                self.state.status = "Queue cleared".into();
            }
            Action::MoveTrackUp => {
                let idx = self.state.queue_view.cursor;
                if idx > 0 {
                    self.state.queue.reorder(idx, idx - 1);
                    self.state.refresh_queue_view();
                    self.state.queue_view.cursor = idx - 1;
                }
            }
            Action::MoveTrackDown => {
                let idx = self.state.queue_view.cursor;
                if idx + 1 < self.state.queue.len() {
                    self.state.queue.reorder(idx, idx + 1);
                    self.state.refresh_queue_view();
                    self.state.queue_view.cursor = idx + 1;
                }
            }
            _ => self.apply(action),
        }
    }

    /// Pure state transitions, no I/O and no spawned tasks.
    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.quit = true,
            Action::NextScreen => self.enter_screen(self.state.screen.next()),
            Action::PrevScreen => self.enter_screen(self.state.screen.prev()),
            Action::SetScreen(screen) => self.enter_screen(screen),
            Action::FocusQuery => self.state.search_pane = SearchPane::Query,
            Action::FocusResults => self.state.search_pane = SearchPane::Results,
            // Cursor moves never scroll here; the widgets clamp the
            // offset against the real viewport height at render time.
            Action::CursorUp => {
                if self.state.screen == Screen::Lyrics {
                    self.state.lyrics_scroll = self.state.lyrics_scroll.saturating_sub(1);
                } else {
                    self.state.screen_view_mut().cursor_up(1);
                }
            }
            Action::CursorDown => {
                if self.state.screen == Screen::Lyrics {
                    self.state.lyrics_scroll = self.state.lyrics_scroll.saturating_add(1);
                } else {
                    self.state.screen_view_mut().cursor_down(1);
                }
            }
            Action::CursorTop => {
                if self.state.screen == Screen::Lyrics {
                    self.state.lyrics_scroll = 0;
                } else {
                    self.state.screen_view_mut().jump_top();
                }
            }
            Action::CursorBottom => {
                if self.state.screen == Screen::Lyrics {
                    // Clamped to the last page at render.
                    self.state.lyrics_scroll = self.lyrics_len();
                } else {
                    self.state.screen_view_mut().jump_bottom();
                }
            }
            Action::PageUp => {
                if self.state.screen == Screen::Lyrics {
                    self.state.lyrics_scroll = self.state.lyrics_scroll.saturating_sub(PAGE_STEP);
                } else {
                    self.state.screen_view_mut().cursor_up(PAGE_STEP);
                }
            }
            Action::PageDown => {
                if self.state.screen == Screen::Lyrics {
                    self.state.lyrics_scroll =
                        (self.state.lyrics_scroll + PAGE_STEP).min(self.lyrics_len());
                } else {
                    self.state.screen_view_mut().cursor_down(PAGE_STEP);
                }
            }
            Action::QueryChar(c) => self.state.query.push(c),
            Action::QueryBackspace => {
                self.state.query.pop();
            }
            Action::QueryClear => self.state.query.clear(),
            // The draw after any event repaints everything already.
            Action::Redraw => {}
            // Player, queue, and network actions run in on_action.
            _ => {}
        }
    }

    fn enter_screen(&mut self, screen: Screen) {
        self.state.screen = screen;
        match screen {
            Screen::Search => self.state.search_pane = SearchPane::Query,
            Screen::Queue => self.state.refresh_queue_view(),
            _ => {}
        }
    }

    fn lyrics_len(&self) -> usize {
        self.state.lyrics.as_ref().map_or(0, |l| l.lines.len())
    }

    async fn push_volume(&mut self) {
        if let Some(mpv) = &self.mpv {
            let _ = mpv.set_volume(self.state.effective_volume()).await;
        }
    }

    async fn play_selected(&mut self, tx: &mpsc::Sender<Event>) {
        match self.state.screen {
            Screen::Search => {
                if self.state.results.tracks.is_empty() {
                    return;
                }
                // Play in the context of the whole result list, so
                // next/previous walk what the user was looking at.
                let tracks = self.state.results.tracks.clone();
                let start = self.state.results.cursor;
                self.state.queue.load(tracks, start);
                self.state.refresh_queue_view();
                if let Some(track) = self.state.queue.current().cloned() {
                    self.play_track(track, tx).await;
                }
            }
            Screen::Queue => {
                self.state.queue.jump_to(self.state.queue_view.cursor);
                if let Some(track) = self.state.queue.current().cloned() {
                    self.play_track(track, tx).await;
                }
            }
            _ => {}
        }
    }

    async fn play_track(&mut self, track: Track, tx: &mpsc::Sender<Event>) {
        self.state.current = Some(track.clone());
        self.state.paused = false;
        self.state.elapsed_secs = 0.0;
        // The search API has no durations; mpv reports one on load.
        self.state.duration_secs = track.duration_seconds.map(f64::from).unwrap_or(0.0);

        self.dispatch_lyrics(&track, tx, false);

        if let Some(mpv) = &self.mpv {
            let _ = mpv.set_volume(self.state.effective_volume()).await;
            match mpv.load_url(&track.watch_url()).await {
                Ok(()) => {
                    let _ = mpv.set_paused(false).await;
                    self.state.status = format!("Playing: {}", track.title);
                }
                Err(e) => {
                    self.state.status = format!("mpv load failed: {e:#}");
                }
            }
        } else {
            self.state.status = "mpv not available".into();
        }
    }

    async fn skip_next(&mut self, tx: &mpsc::Sender<Event>) {
        if let Some(track) = self.state.queue.step_next().cloned() {
            self.play_track(track, tx).await;
            return;
        }
        if self.state.repeat == RepeatMode::All && !self.state.queue.is_empty() {
            self.state.queue.jump_to(self.state.queue.restart_index());
            if let Some(track) = self.state.queue.current().cloned() {
                self.play_track(track, tx).await;
                return;
            }
        }
        self.state.status = "End of queue".into();
    }

    async fn skip_prev(&mut self, tx: &mpsc::Sender<Event>) {
        // Well into a track, Previous restarts it instead.
        if self.state.elapsed_secs > PREV_RESTART_THRESHOLD_SECS {
            if let Some(mpv) = &self.mpv {
                let _ = mpv.seek_absolute(0.0).await;
            }
            self.state.elapsed_secs = 0.0;
            return;
        }
        if let Some(track) = self.state.queue.step_back().cloned() {
            self.play_track(track, tx).await;
        } else if let Some(mpv) = &self.mpv {
            let _ = mpv.seek_absolute(0.0).await;
            self.state.elapsed_secs = 0.0;
        }
    }

    async fn on_player(&mut self, pe: PlayerEvent, tx: &mpsc::Sender<Event>) {
        match pe {
            PlayerEvent::Started => self.state.paused = false,
            PlayerEvent::Paused => self.state.paused = true,
            PlayerEvent::Position { seconds } => {
                self.state.elapsed_secs = seconds;
                let active = self.state.sync_state().active_index;
                self.state.follow.observe(active);
            }
            PlayerEvent::Duration { seconds } => self.state.duration_secs = seconds,
            PlayerEvent::Ended => {
                self.state.elapsed_secs = 0.0;
                self.state.duration_secs = 0.0;

                if self.state.repeat == RepeatMode::One
                    && let Some(track) = self.state.current.clone()
                {
                    self.state.status = format!("Repeating: {}", track.title);
                    self.play_track(track, tx).await;
                    return;
                }

                if let Some(track) = self.state.queue.step_next().cloned() {
                    self.play_track(track, tx).await;
                    return;
                }

                if self.state.repeat == RepeatMode::All && !self.state.queue.is_empty() {
                    self.state.queue.jump_to(self.state.queue.restart_index());
                    if let Some(track) = self.state.queue.current().cloned() {
                        self.play_track(track, tx).await;
                        return;
                    }
                }

                // Nothing left to play. mpv sits idle, so mark the
                // state paused and keep the bar visible.
                self.state.paused = true;
                self.state.idle.cancel();
                self.state.status = "Playback ended".into();
            }
            PlayerEvent::Error(e) => self.state.status = format!("Player error: {e}"),
        }
    }

    fn on_network(&mut self, ne: NetworkEvent) {
        match ne {
            NetworkEvent::SearchDone { query, tracks } => {
                // Results that raced a newer query are stale.
                if self.state.active_query.as_deref() != Some(query.as_str()) {
                    return;
                }
                self.state.results.fill(tracks);
                self.state.status = format!("{} results", self.state.results.tracks.len());
            }
            NetworkEvent::LyricsReady { video_id, lyrics } => {
                self.lyrics_hot.put(video_id.clone(), lyrics.clone());
                if self.state.lyrics_for.as_deref() == Some(video_id.as_str()) {
                    self.state.lyrics = Some(lyrics);
                    self.state.lyrics_loading = false;
                    self.state.follow.reset();
                    self.state.lyrics_scroll = 0;
                }
            }
            NetworkEvent::LyricsMissing { video_id } => {
                if self.state.lyrics_for.as_deref() == Some(video_id.as_str()) {
                    self.state.lyrics = None;
                    self.state.lyrics_loading = false;
                }
            }
        }
    }

    fn dispatch_search(&mut self, tx: &mpsc::Sender<Event>) {
        let query = self.state.query.trim().to_string();
        if query.is_empty() {
            self.state.status = "Type a query first".into();
            return;
        }
        self.state.results.loading = true;
        self.state.active_query = Some(query.clone());
        self.state.status = format!("Searching: {query}");

        let client = self.search_client.clone();
        // Demo results are never cached, so keyless mode always goes
        // through the client.
        let use_cache = client.has_api_key();
        let cache = self.cache();
        let tx = tx.clone();

        tokio::spawn(async move {
            let now = storage::now_unix();

            if use_cache
                && let Some((json, ts)) = cache.load_search(&query).await
                && now - ts <= SEARCH_CACHE_TTL_SECS
                && let Ok(tracks) = serde_json::from_str::<Vec<Track>>(&json)
            {
                let _ = tx
                    .send(Event::Network(NetworkEvent::SearchDone { query, tracks }))
                    .await;
                return;
            }

            let tracks = client.search(&query).await;
            if use_cache && let Ok(json) = serde_json::to_string(&tracks) {
                cache.store_search(&query, &json, now).await;
            }
            let _ = tx
                .send(Event::Network(NetworkEvent::SearchDone { query, tracks }))
                .await;
        });
    }

    fn dispatch_lyrics(&mut self, track: &Track, tx: &mpsc::Sender<Event>, force: bool) {
        if !force && self.state.lyrics_for.as_deref() == Some(track.video_id.as_str()) {
            return;
        }

        self.state.lyrics = None;
        self.state.lyrics_loading = true;
        self.state.lyrics_for = Some(track.video_id.clone());
        self.state.follow.reset();
        self.state.lyrics_scroll = 0;

        // Lyrics shown earlier this session skip sqlite and the network.
        if !force && let Some(lyrics) = self.lyrics_hot.get(&track.video_id).cloned() {
            self.state.lyrics = Some(lyrics);
            self.state.lyrics_loading = false;
            return;
        }

        let cache = self.cache();
        let client = self.lyrics_client.clone();
        let artist = track.artist.clone();
        let title = track.title.clone();
        let video_id = track.video_id.clone();
        let tx = tx.clone();

        tokio::spawn(async move {
            if !force && let Some((lrc, synced)) = cache.load_lyrics(&video_id).await {
                let lyrics = if synced {
                    ParsedLyrics::parse(&lrc)
                } else {
                    ParsedLyrics::parse_plain(&lrc)
                };
                let _ = tx
                    .send(Event::Network(NetworkEvent::LyricsReady { video_id, lyrics }))
                    .await;
                return;
            }

            // The built-in sample stands in when the provider is
            // unreachable; only real fetches are cached.
            let fetched = match client.get_lyrics(&artist, &title).await {
                Ok(Some(text)) => Some((ParsedLyrics::parse(&text), true)),
                Ok(None) => None,
                Err(e) => {
                    tracing::debug!("lyrics fetch failed, serving sample: {e:#}");
                    Some((provider::fallback_lyrics(&artist, &title), false))
                }
            };

            match fetched {
                Some((lyrics, cacheable)) => {
                    if cacheable {
                        cache
                            .store_lyrics(
                                &video_id,
                                &lyrics.to_lrc(),
                                lyrics.synced,
                                storage::now_unix(),
                            )
                            .await;
                    }
                    let _ = tx
                        .send(Event::Network(NetworkEvent::LyricsReady { video_id, lyrics }))
                        .await;
                }
                None => {
                    let _ = tx
                        .send(Event::Network(NetworkEvent::LyricsMissing { video_id }))
                        .await;
                }
            }
        });
    }

    fn cache(&self) -> CacheHandle {
        CacheHandle {
            path: self.cfg.paths.data_dir.join(DB_FILE),
        }
    }
}

/// Async access to the sqlite cache: open per operation on the blocking
/// pool. Cache misses and cache write failures are not worth surfacing.
#[derive(Clone)]
struct CacheHandle {
    path: PathBuf,
}

impl CacheHandle {
    fn open(&self) -> anyhow::Result<Storage> {
        Storage::open(&self.path)
    }

    async fn load_search(&self, query: &str) -> Option<(String, i64)> {
        let h = self.clone();
        let query = query.to_string();
        tokio::task::spawn_blocking(move || h.open()?.load_search(&query))
            .await
            .ok()?
            .ok()?
    }

    async fn store_search(&self, query: &str, json: &str, now: i64) {
        let h = self.clone();
        let query = query.to_string();
        let json = json.to_string();
        let _ =
            tokio::task::spawn_blocking(move || h.open()?.store_search(&query, &json, now)).await;
    }

    async fn load_lyrics(&self, video_id: &str) -> Option<(String, bool)> {
        let h = self.clone();
        let video_id = video_id.to_string();
        tokio::task::spawn_blocking(move || h.open()?.load_lyrics(&video_id))
            .await
            .ok()?
            .ok()?
    }

    async fn store_lyrics(&self, video_id: &str, lrc: &str, synced: bool, now: i64) {
        let h = self.clone();
        let video_id = video_id.to_string();
        let lrc = lrc.to_string();
        let _ = tokio::task::spawn_blocking(move || {
            h.open()?.store_lyrics(&video_id, &lrc, synced, now)
        })
        .await;
    }
}
