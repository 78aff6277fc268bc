//! Playback queue
//!
//! Owns the ordered track list and the index currently playing. Shuffle
//! is a permutation laid over the list; `tracks` itself never moves, so
//! the queue screen always shows insertion order and turning shuffle
//! off lands back in it.

use rand::seq::SliceRandom;

use crate::search::Track;

#[derive(Debug, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    /// Index into `tracks` currently playing.
    playing: Option<usize>,
    /// Play-order permutation of `0..tracks.len()` while shuffle is on.
    shuffled: Option<Vec<usize>>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.playing?)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playing
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled.is_some()
    }

    /// Append without touching what is playing.
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
        if self.is_shuffled() {
            self.reshuffle();
        }
    }

    /// Replace the whole queue and start playing at `start`.
    ///
    /// Playing a search result loads the full result list, so that
    /// next/previous walk the results the user was looking at.
    pub fn load(&mut self, tracks: Vec<Track>, start: usize) {
        self.tracks = tracks;
        self.playing = if self.tracks.is_empty() {
            None
        } else {
            Some(start.min(self.tracks.len() - 1))
        };
        if self.is_shuffled() {
            self.reshuffle();
        }
    }

    pub fn remove(&mut self, index: usize) {
        if index >= self.tracks.len() {
            return;
        }
        self.tracks.remove(index);
        // Removing the playing track leaves the index on its successor,
        // clamped back when it was the last one.
        self.playing = match self.playing {
            Some(_) if self.tracks.is_empty() => None,
            Some(p) if index < p => Some(p - 1),
            Some(p) => Some(p.min(self.tracks.len() - 1)),
            None => None,
        };
        if self.is_shuffled() {
            self.reshuffle();
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.playing = None;
        self.shuffled = None;
    }

    /// Move a track to a new position; the playing index follows the
    /// track it pointed at.
    pub fn reorder(&mut self, from: usize, to: usize) {
        if from == to || from >= self.tracks.len() || to >= self.tracks.len() {
            return;
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        self.playing = self.playing.map(|p| {
            if p == from {
                to
            } else if from < p && p <= to {
                p - 1
            } else if to <= p && p < from {
                p + 1
            } else {
                p
            }
        });
        if self.is_shuffled() {
            self.reshuffle();
        }
    }

    pub fn toggle_shuffle(&mut self) {
        if self.is_shuffled() {
            self.shuffled = None;
        } else {
            self.reshuffle();
        }
    }

    pub fn jump_to(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.playing = Some(index);
        }
    }

    /// Step to the next track in play order. `None` means the order is
    /// exhausted; the playing index stays put so repeat-all can restart
    /// from [`Queue::restart_index`].
    pub fn step_next(&mut self) -> Option<&Track> {
        let next = self.next_of(self.playing?)?;
        self.playing = Some(next);
        self.tracks.get(next)
    }

    /// Step to the previous track in play order, `None` at the front.
    pub fn step_back(&mut self) -> Option<&Track> {
        let prev = self.prev_of(self.playing?)?;
        self.playing = Some(prev);
        self.tracks.get(prev)
    }

    /// Where play order begins: the shuffled head, or track zero.
    pub fn restart_index(&self) -> usize {
        self.shuffled
            .as_ref()
            .and_then(|order| order.first().copied())
            .unwrap_or(0)
    }

    fn next_of(&self, from: usize) -> Option<usize> {
        match &self.shuffled {
            Some(order) => {
                let pos = order.iter().position(|&i| i == from)?;
                order.get(pos + 1).copied()
            }
            None => (from + 1 < self.tracks.len()).then_some(from + 1),
        }
    }

    fn prev_of(&self, from: usize) -> Option<usize> {
        match &self.shuffled {
            Some(order) => {
                let pos = order.iter().position(|&i| i == from)?;
                pos.checked_sub(1).map(|p| order[p])
            }
            None => from.checked_sub(1),
        }
    }

    /// Fresh permutation with the playing track pinned at the front, so
    /// it is not revisited by the new order.
    fn reshuffle(&mut self) {
        let mut order: Vec<usize> = (0..self.tracks.len()).collect();
        order.shuffle(&mut rand::rng());
        if let Some(p) = self.playing
            && let Some(pos) = order.iter().position(|&i| i == p)
        {
            order.swap(0, pos);
        }
        self.shuffled = Some(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(n: usize) -> Track {
        Track {
            video_id: format!("v{n}"),
            title: format!("Track {n}"),
            artist: "Artist".into(),
            duration_seconds: Some(120),
            thumbnail_url: None,
        }
    }

    fn tracks(n: usize) -> Vec<Track> {
        (0..n).map(track).collect()
    }

    #[test]
    fn test_load_clamps_start_index() {
        let mut q = Queue::new();
        q.load(tracks(3), 10);
        assert_eq!(q.current_index(), Some(2));

        q.load(Vec::new(), 0);
        assert_eq!(q.current_index(), None);
        assert!(q.current().is_none());
    }

    #[test]
    fn test_step_next_stops_at_end() {
        let mut q = Queue::new();
        q.load(tracks(3), 0);
        assert_eq!(q.step_next().unwrap().video_id, "v1");
        assert_eq!(q.step_next().unwrap().video_id, "v2");
        assert!(q.step_next().is_none());
        // Exhausted order keeps pointing at the last track.
        assert_eq!(q.current_index(), Some(2));
    }

    #[test]
    fn test_step_back_stops_at_front() {
        let mut q = Queue::new();
        q.load(tracks(3), 2);
        assert_eq!(q.step_back().unwrap().video_id, "v1");
        assert_eq!(q.step_back().unwrap().video_id, "v0");
        assert!(q.step_back().is_none());
        assert_eq!(q.current_index(), Some(0));
    }

    #[test]
    fn test_push_keeps_playing_index() {
        let mut q = Queue::new();
        q.load(tracks(2), 1);
        q.push(track(9));
        assert_eq!(q.len(), 3);
        assert_eq!(q.current().unwrap().video_id, "v1");
        assert_eq!(q.step_next().unwrap().video_id, "v9");
    }

    #[test]
    fn test_remove_adjusts_playing_index() {
        let mut q = Queue::new();
        q.load(tracks(4), 2);

        // Removing before the playing track shifts it down.
        q.remove(0);
        assert_eq!(q.current().unwrap().video_id, "v2");
        assert_eq!(q.current_index(), Some(1));

        // Removing the playing track lands on its successor.
        q.remove(1);
        assert_eq!(q.current().unwrap().video_id, "v3");

        // Removing the playing last track clamps back.
        q.remove(1);
        assert_eq!(q.current().unwrap().video_id, "v1");

        q.remove(0);
        assert_eq!(q.current_index(), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut q = Queue::new();
        q.load(tracks(2), 0);
        q.toggle_shuffle();

        q.clear();
        assert!(q.is_empty());
        assert!(q.current_index().is_none());
        assert!(!q.is_shuffled());
    }

    #[test]
    fn test_reorder_follows_playing_track() {
        let mut q = Queue::new();
        q.load(tracks(4), 1);

        q.reorder(1, 3);
        assert_eq!(q.current().unwrap().video_id, "v1");
        assert_eq!(q.current_index(), Some(3));

        // Moving another track across the playing one shifts it.
        q.reorder(0, 3);
        assert_eq!(q.current().unwrap().video_id, "v1");
        assert_eq!(q.current_index(), Some(2));
    }

    #[test]
    fn test_shuffle_visits_every_track_once() {
        let mut q = Queue::new();
        q.load(tracks(8), 0);
        q.toggle_shuffle();
        assert!(q.is_shuffled());

        let mut seen = vec![q.current_index().unwrap()];
        while q.step_next().is_some() {
            seen.push(q.current_index().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_pins_playing_track_first() {
        let mut q = Queue::new();
        q.load(tracks(6), 4);
        q.toggle_shuffle();
        assert_eq!(q.restart_index(), 4);
        // Stepping back from the pinned head goes nowhere.
        assert!(q.step_back().is_none());

        q.toggle_shuffle();
        assert!(!q.is_shuffled());
        assert_eq!(q.restart_index(), 0);
    }
}
