//! Debounced scheduling of recomputations.
//!
//! Hosts re-run the context query and the highlight pass after the buffer
//! goes quiet. `Debouncer` holds at most one pending task; scheduling again
//! replaces it and restarts the quiet window. Time is passed in, never read,
//! so callers drive it from their own event loop.

use std::time::{Duration, Instant};

/// Default quiet window for overlay and context refreshes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending task; it becomes due `delay` after `now`.
    pub fn schedule(&mut self, task: T, now: Instant) {
        self.pending = Some((task, now + self.delay));
    }

    /// Takes the pending task if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, due)) if now >= due => self.pending.take().map(|(task, _)| task),
            _ => None,
        }
    }

    /// Drops the pending task, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(task, _)| task)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending task becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Time left until the pending task is due, zero if already due.
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_after_quiet_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50 * MS);
        d.schedule("refresh", t0);
        assert_eq!(d.poll(t0 + 49 * MS), None);
        assert_eq!(d.poll(t0 + 50 * MS), Some("refresh"));
        assert_eq!(d.poll(t0 + 100 * MS), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn rescheduling_replaces_and_restarts() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50 * MS);
        d.schedule(1, t0);
        d.schedule(2, t0 + 30 * MS);
        assert_eq!(d.poll(t0 + 60 * MS), None);
        assert_eq!(d.deadline(), Some(t0 + 80 * MS));
        assert_eq!(d.poll(t0 + 80 * MS), Some(2));
    }

    #[test]
    fn cancel_drops_pending_task() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.schedule('x', t0);
        assert_eq!(d.cancel(), Some('x'));
        assert_eq!(d.poll(t0 + DEFAULT_DEBOUNCE), None);
        assert_eq!(d.deadline(), None);
    }

    #[test]
    fn time_left_saturates() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(10 * MS);
        d.schedule((), t0);
        assert_eq!(d.time_left(t0 + 4 * MS), Some(6 * MS));
        assert_eq!(d.time_left(t0 + 40 * MS), Some(Duration::ZERO));
    }
}
