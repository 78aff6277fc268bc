//! Keyboard and mouse handling
//!
//! A blocking reader task forwards crossterm events into the app
//! channel; [`translate`] turns them into actions using per-screen key
//! tables that fall through to a shared set.

use std::time::Duration;

use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use tokio::sync::mpsc;

use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, Screen, SearchPane};

/// Forward terminal events to the app. Runs on the blocking pool since
/// crossterm's poll/read are synchronous.
pub fn spawn_reader(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if !event::poll(Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            let forwarded = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => Some(InputEvent::Key(k)),
                Ok(CtEvent::Mouse(m)) => Some(InputEvent::Mouse(m)),
                Ok(CtEvent::Resize(..)) => Some(InputEvent::Resize),
                _ => None,
            };
            if let Some(ev) = forwarded
                && tx.blocking_send(Event::Input(ev)).is_err()
            {
                break;
            }
        }
    });
}

/// Map one input event to an action under the current state.
pub fn translate(state: &AppState, ev: InputEvent) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Redraw),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp => Some(Action::CursorUp),
            MouseEventKind::ScrollDown => Some(Action::CursorDown),
            _ => None,
        },
        InputEvent::Key(k) => match state.screen {
            Screen::Search if state.search_pane == SearchPane::Query => query_keys(state, k),
            Screen::Search => results_keys(k),
            Screen::Lyrics => lyrics_keys(k),
            Screen::Queue => queue_keys(k),
            Screen::Help => help_keys(k),
        },
    }
}

/// While the query has focus almost every key is text, so only a few
/// controls are carved out and nothing falls through to the shared set.
fn query_keys(state: &AppState, k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextScreen),
        KeyCode::BackTab => Some(Action::PrevScreen),
        KeyCode::Enter => Some(Action::SubmitSearch),
        KeyCode::Backspace => Some(Action::QueryBackspace),
        KeyCode::Down if !state.results.tracks.is_empty() => Some(Action::FocusResults),
        KeyCode::F(5) => Some(Action::Refetch),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::QueryClear)
        }
        // Ctrl/Alt chords must not type into the query.
        KeyCode::Char(c) if !k.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(Action::QueryChar(c))
        }
        _ => None,
    }
}

fn results_keys(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc | KeyCode::Char('/') | KeyCode::Char('i') => Some(Action::FocusQuery),
        KeyCode::Enter => Some(Action::PlaySelected),
        KeyCode::Char('a') => Some(Action::EnqueueSelected),
        _ => shared_keys(k),
    }
}

fn lyrics_keys(k: KeyEvent) -> Option<Action> {
    match k.code {
        // f toggles the lyrics sheet closed again
        KeyCode::Esc | KeyCode::Char('f') => Some(Action::SetScreen(Screen::Search)),
        _ => shared_keys(k),
    }
}

fn queue_keys(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Enter => Some(Action::PlaySelected),
        // Plain d removes; Ctrl+d still pages via the shared set.
        KeyCode::Char('d') if k.modifiers.is_empty() => Some(Action::RemoveFromQueue),
        KeyCode::Delete => Some(Action::RemoveFromQueue),
        KeyCode::Char('c') if k.modifiers.is_empty() => Some(Action::ClearQueue),
        KeyCode::Char('s') => Some(Action::ToggleShuffle),
        KeyCode::Char('K') => Some(Action::MoveTrackUp),
        KeyCode::Char('J') => Some(Action::MoveTrackDown),
        _ => shared_keys(k),
    }
}

fn help_keys(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::Quit),
        _ => shared_keys(k),
    }
}

/// Bindings that behave the same on every screen (except the query).
fn shared_keys(k: KeyEvent) -> Option<Action> {
    let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),

        KeyCode::Tab => Some(Action::NextScreen),
        KeyCode::BackTab => Some(Action::PrevScreen),
        KeyCode::Char('1') => Some(Action::SetScreen(Screen::Search)),
        KeyCode::Char('2') => Some(Action::SetScreen(Screen::Lyrics)),
        KeyCode::Char('3') => Some(Action::SetScreen(Screen::Queue)),
        KeyCode::Char('4') => Some(Action::SetScreen(Screen::Help)),
        KeyCode::Char('f') => Some(Action::SetScreen(Screen::Lyrics)),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Action::SetScreen(Screen::Help)),

        KeyCode::Up | KeyCode::Char('k') => Some(Action::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::CursorDown),
        KeyCode::Char('g') => Some(Action::CursorTop),
        KeyCode::Char('G') => Some(Action::CursorBottom),
        KeyCode::Char('d') if ctrl => Some(Action::PageDown),
        KeyCode::Char('u') if ctrl => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),

        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('n') => Some(Action::NextTrack),
        KeyCode::Char('p') => Some(Action::PrevTrack),
        KeyCode::Char('m') => Some(Action::ToggleMute),
        KeyCode::Char('=' | '+') => Some(Action::VolumeUp),
        KeyCode::Char('-' | '_') => Some(Action::VolumeDown),
        KeyCode::Char(']') => Some(Action::SeekForward),
        KeyCode::Char('[') => Some(Action::SeekBack),
        KeyCode::Char('R') => Some(Action::CycleRepeat),

        KeyCode::Char('r') if ctrl => Some(Action::Refetch),
        KeyCode::F(5) => Some(Action::Refetch),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> InputEvent {
        InputEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_query_pane_captures_text() {
        let state = AppState::new();
        assert_eq!(
            translate(&state, key(KeyCode::Char('m'))),
            Some(Action::QueryChar('m'))
        );
        assert_eq!(
            translate(&state, key(KeyCode::Enter)),
            Some(Action::SubmitSearch)
        );
    }

    #[test]
    fn test_query_pane_rejects_modified_chars() {
        let state = AppState::new();
        assert_eq!(translate(&state, ctrl('u')), Some(Action::QueryClear));
        // Unbound chords must not type into the query.
        assert_eq!(translate(&state, ctrl('z')), None);
    }

    #[test]
    fn test_results_pane_keys() {
        let mut state = AppState::new();
        state.search_pane = SearchPane::Results;
        assert_eq!(
            translate(&state, key(KeyCode::Char('a'))),
            Some(Action::EnqueueSelected)
        );
        assert_eq!(
            translate(&state, key(KeyCode::Char('m'))),
            Some(Action::ToggleMute)
        );
        assert_eq!(
            translate(&state, key(KeyCode::Enter)),
            Some(Action::PlaySelected)
        );
        assert_eq!(translate(&state, key(KeyCode::Esc)), Some(Action::FocusQuery));
    }

    #[test]
    fn test_lyrics_screen_toggles_back() {
        let mut state = AppState::new();
        state.screen = Screen::Lyrics;
        assert_eq!(
            translate(&state, key(KeyCode::Char('f'))),
            Some(Action::SetScreen(Screen::Search))
        );
        assert_eq!(
            translate(&state, key(KeyCode::Char('j'))),
            Some(Action::CursorDown)
        );
    }

    #[test]
    fn test_queue_screen_keys() {
        let mut state = AppState::new();
        state.screen = Screen::Queue;
        assert_eq!(
            translate(&state, key(KeyCode::Char('d'))),
            Some(Action::RemoveFromQueue)
        );
        assert_eq!(
            translate(&state, key(KeyCode::Char('s'))),
            Some(Action::ToggleShuffle)
        );
        // Ctrl+d pages instead of removing.
        assert_eq!(translate(&state, ctrl('d')), Some(Action::PageDown));
    }
}
