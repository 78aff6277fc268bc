//! Auto-scroll follow for the lyrics view
//!
//! Tracks the active line reported by playback and, whenever it moves
//! to a different line, queues one scroll request so the view can keep
//! the singer centered. Manual scrolling stays untouched between those
//! requests.

/// Remembers the last active line and queues a scroll when it changes
#[derive(Debug, Default)]
pub struct ScrollFollow {
    last_index: Option<usize>,
    pending: Option<usize>,
}

impl ScrollFollow {
    /// Feed the current active index. Returns true when it differs from
    /// the previous observation. Only a transition onto a real line
    /// queues a scroll target.
    pub fn observe(&mut self, active_index: Option<usize>) -> bool {
        if active_index == self.last_index {
            return false;
        }
        self.last_index = active_index;
        if let Some(i) = active_index {
            self.pending = Some(i);
        }
        true
    }

    /// Take the queued scroll target, if a line change produced one.
    pub fn take_pending(&mut self) -> Option<usize> {
        self.pending.take()
    }

    /// Forget everything, for when new lyrics replace the old ones.
    pub fn reset(&mut self) {
        self.last_index = None;
        self.pending = None;
    }

    #[allow(dead_code)]
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }
}

/// Scroll offset that keeps `target` centered in a window of
/// `visible_height` rows over `total` rows, clamped to the list bounds.
pub fn centered_offset(target: usize, visible_height: usize, total: usize) -> usize {
    if visible_height == 0 || total <= visible_height {
        return 0;
    }
    target
        .saturating_sub(visible_height / 2)
        .min(total - visible_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_queues_on_change_only() {
        let mut follow = ScrollFollow::default();

        assert!(follow.observe(Some(0)));
        assert_eq!(follow.take_pending(), Some(0));

        // Same line again: nothing new.
        assert!(!follow.observe(Some(0)));
        assert_eq!(follow.take_pending(), None);

        assert!(follow.observe(Some(1)));
        assert_eq!(follow.take_pending(), Some(1));
    }

    #[test]
    fn test_observe_none_records_but_does_not_queue() {
        let mut follow = ScrollFollow::default();
        follow.observe(Some(3));
        follow.take_pending();

        assert!(follow.observe(None));
        assert_eq!(follow.take_pending(), None);
        assert_eq!(follow.last_index(), None);

        // Coming back to the same line still counts as a change.
        assert!(follow.observe(Some(3)));
        assert_eq!(follow.take_pending(), Some(3));
    }

    #[test]
    fn test_pending_is_consumed_once() {
        let mut follow = ScrollFollow::default();
        follow.observe(Some(5));
        assert_eq!(follow.take_pending(), Some(5));
        assert_eq!(follow.take_pending(), None);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut follow = ScrollFollow::default();
        follow.observe(Some(7));
        follow.reset();
        assert_eq!(follow.last_index(), None);
        assert_eq!(follow.take_pending(), None);
        // First observation after reset counts as a change again.
        assert!(follow.observe(Some(7)));
    }

    #[test]
    fn test_centered_offset_short_list() {
        // Everything fits: no scrolling.
        assert_eq!(centered_offset(3, 10, 5), 0);
        assert_eq!(centered_offset(0, 10, 10), 0);
        assert_eq!(centered_offset(2, 0, 50), 0);
    }

    #[test]
    fn test_centered_offset_centers_target() {
        // Window of 10 over 100 lines: target 50 sits at row 5.
        assert_eq!(centered_offset(50, 10, 100), 45);
        assert_eq!(centered_offset(7, 5, 100), 5);
    }

    #[test]
    fn test_centered_offset_clamps_at_edges() {
        assert_eq!(centered_offset(0, 10, 100), 0);
        assert_eq!(centered_offset(2, 10, 100), 0);
        // Near the end the window pins to the last page.
        assert_eq!(centered_offset(99, 10, 100), 90);
        assert_eq!(centered_offset(97, 10, 100), 90);
    }
}
