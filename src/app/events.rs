use crate::lyrics::ParsedLyrics;
use crate::search::Track;

/// Everything the main loop wakes up for flows through one channel as
/// an `Event`, so there is a single consumer and no render ticker.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Network(NetworkEvent),
    Timer(TimerEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Started,
    Paused,
    Position { seconds: f64 },
    Duration { seconds: f64 },
    Ended,
    Error(String),
}

/// A timer wakeup carries the sequence number it was armed with, so a
/// wakeup from a superseded arm can be told apart and dropped.
#[derive(Debug, Clone)]
pub enum TimerEvent {
    /// The typing pause elapsed; fire the pending search.
    SearchQuiet { seq: u64 },
    /// The idle deadline may have passed; re-evaluate bar visibility.
    IdleFire { seq: u64 },
}

/// Completions from spawned fetch tasks. There is no failure variant:
/// search and lyrics both degrade to built-in content instead.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    SearchDone { query: String, tracks: Vec<Track> },
    LyricsReady { video_id: String, lyrics: ParsedLyrics },
    LyricsMissing { video_id: String },
}
