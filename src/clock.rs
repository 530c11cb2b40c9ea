//! Tick counting, tick-keyed deferred work, and wall-clock frame pacing.

use std::time::{Duration, Instant};

/// Monotonic frame counter. One tick is one simulated frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct Clock {
    tick: u64,
}

impl Clock {
    pub fn now(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Deferred items keyed by the tick they become due.
///
/// Replaces timer callbacks: nothing fires unless the owner drains it, and
/// `clear` cancels everything at once.
#[derive(Debug, Clone)]
pub struct Schedule<T> {
    entries: Vec<(u64, T)>,
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_at(&mut self, due: u64, item: T) {
        self.entries.push((due, item));
    }

    pub fn push_after(&mut self, now: u64, delay: u64, item: T) {
        self.push_at(now + delay, item);
    }

    /// Removes and returns every item due at or before `now`, earliest first.
    /// Items sharing a due tick come out in insertion order.
    pub fn drain_due(&mut self, now: u64) -> Vec<T> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for (at, item) in self.entries.drain(..) {
            if at <= now {
                due.push((at, item));
            } else {
                pending.push((at, item));
            }
        }
        self.entries = pending;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, item)| item).collect()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|(_, item)| keep(item));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sleeps out the remainder of each frame.
pub struct FramePacer {
    frame: Duration,
    started: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        let fps = fps.max(1);
        Self {
            frame: Duration::from_secs_f64(1.0 / fps as f64),
            started: Instant::now(),
        }
    }

    pub fn begin(&mut self) {
        self.started = Instant::now();
    }

    pub fn wait(&self) {
        let elapsed = self.started.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
    }

    /// Time left in the current frame, used as the input poll timeout.
    pub fn remaining(&self) -> Duration {
        self.frame.saturating_sub(self.started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_by_one() {
        let mut clock = Clock::default();
        assert_eq!(clock.now(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
    }

    #[test]
    fn drain_returns_only_due_items_in_order() {
        let mut s = Schedule::new();
        s.push_at(10, "late");
        s.push_at(3, "early");
        s.push_at(3, "early-second");
        s.push_at(20, "future");

        assert!(s.drain_due(2).is_empty());
        assert_eq!(s.drain_due(10), vec!["early", "early-second", "late"]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.drain_due(100), vec!["future"]);
        assert!(s.is_empty());
    }

    #[test]
    fn clear_cancels_pending_items() {
        let mut s = Schedule::new();
        s.push_after(5, 6, 1);
        s.push_after(5, 60, 2);
        s.clear();
        assert!(s.drain_due(u64::MAX).is_empty());
    }

    #[test]
    fn retain_drops_matching_items() {
        let mut s = Schedule::new();
        s.push_at(1, 'a');
        s.push_at(1, 'b');
        s.retain(|c| *c != 'a');
        assert_eq!(s.drain_due(1), vec!['b']);
    }
}
