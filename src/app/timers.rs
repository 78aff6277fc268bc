//! Debounce and idle timers
//!
//! Both are sequence- or deadline-based rather than task-based: timer
//! tasks just sleep and report back with the sequence number they were
//! armed with, and stale wakeups are ignored. Nothing here needs to be
//! cancelled across threads.

use std::time::{Duration, Instant};

/// Coalesces rapid re-arms so only the latest scheduled wakeup counts
#[derive(Debug, Default)]
pub struct Debounce {
    seq: u64,
}

impl Debounce {
    /// Start a new debounce window, invalidating earlier ones.
    /// The returned sequence number identifies this window's wakeup.
    pub fn arm(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Whether a wakeup with this sequence number is still the latest
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.seq
    }

    /// Invalidate any outstanding wakeup without scheduling a new one
    pub fn cancel(&mut self) {
        self.seq += 1;
    }
}

/// Tracks how long it has been since the user last did anything
#[derive(Debug)]
pub struct IdleTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// Record activity at `now`, pushing the idle deadline out
    pub fn reset(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    /// Drop the pending deadline; the timer cannot fire again until the
    /// next reset.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True once the timeout has elapsed without a reset. Never idle
    /// before the first recorded activity.
    pub fn is_idle(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| now >= d)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_latest_wins() {
        let mut d = Debounce::default();
        let first = d.arm();
        let second = d.arm();
        assert!(!d.is_current(first));
        assert!(d.is_current(second));
    }

    #[test]
    fn test_debounce_cancel_invalidates() {
        let mut d = Debounce::default();
        let seq = d.arm();
        d.cancel();
        assert!(!d.is_current(seq));
    }

    #[test]
    fn test_idle_timer_deadline() {
        let start = Instant::now();
        let mut t = IdleTimer::new(Duration::from_secs(4));

        // Not idle before any activity is recorded.
        assert!(!t.is_idle(start + Duration::from_secs(100)));

        t.reset(start);
        assert!(!t.is_idle(start));
        assert!(!t.is_idle(start + Duration::from_millis(3999)));
        assert!(t.is_idle(start + Duration::from_secs(4)));
    }

    #[test]
    fn test_idle_timer_reset_pushes_deadline() {
        let start = Instant::now();
        let mut t = IdleTimer::new(Duration::from_secs(4));
        t.reset(start);
        t.reset(start + Duration::from_secs(3));

        assert!(!t.is_idle(start + Duration::from_secs(4)));
        assert!(t.is_idle(start + Duration::from_secs(7)));
    }

    #[test]
    fn test_idle_timer_cancel_disarms() {
        let start = Instant::now();
        let mut t = IdleTimer::new(Duration::from_secs(4));
        t.reset(start);
        t.cancel();

        assert!(!t.is_idle(start + Duration::from_secs(100)));

        // A later reset arms it again.
        t.reset(start + Duration::from_secs(100));
        assert!(t.is_idle(start + Duration::from_secs(104)));
    }
}
