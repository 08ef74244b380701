// src/debounce.rs
use std::time::{Duration, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(180);

/// Collapses bursts of input into a single save, fired `delay` after the
/// last event. Time is passed in so callers and tests control the clock.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Drop any pending deadline and arm a fresh one.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once per armed deadline, when it has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn burst_fires_once_after_last_event() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();

        d.schedule(t0);
        assert!(!d.poll(t0 + ms(50)));
        d.schedule(t0 + ms(50));
        assert!(!d.poll(t0 + ms(100)));
        d.schedule(t0 + ms(100));

        assert!(!d.poll(t0 + ms(230)));
        assert!(!d.poll(t0 + ms(279)));
        assert!(d.poll(t0 + ms(280)));
        assert!(!d.poll(t0 + ms(281)));
        assert!(!d.is_pending());
    }

    #[test]
    fn idle_never_fires() {
        let mut d = Debouncer::new(ms(10));
        let now = Instant::now();
        assert!(!d.poll(now + ms(1000)));
        assert_eq!(d.remaining(now), None);
    }

    #[test]
    fn remaining_counts_down() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.schedule(t0);
        assert_eq!(d.remaining(t0 + ms(80)), Some(ms(100)));
        assert_eq!(d.remaining(t0 + ms(500)), Some(Duration::ZERO));
    }
}
