//! Time-window debouncing for sampled lines

use std::time::{Duration, Instant};

/// A sampled digital level that only changes after the raw input has held the
/// new value for `window`.
#[derive(Debug, Clone)]
pub struct Debounced {
    stable: bool,
    candidate: bool,
    since: Instant,
    window: Duration,
}

impl Debounced {
    pub fn new(level: bool, window: Duration, now: Instant) -> Self {
        Self {
            stable: level,
            candidate: level,
            since: now,
            window,
        }
    }

    /// Feed a raw sample and return the debounced level.
    pub fn update(&mut self, level: bool, now: Instant) -> bool {
        if level != self.candidate {
            self.candidate = level;
            self.since = now;
        }

        if self.candidate != self.stable
            && now.saturating_duration_since(self.since) >= self.window
        {
            self.stable = self.candidate;
        }

        self.stable
    }

    pub fn level(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_change_accepted_after_window() {
        let t0 = Instant::now();
        let mut line = Debounced::new(true, ms(30), t0);

        assert!(line.update(false, t0 + ms(1)));
        assert!(line.update(false, t0 + ms(20)));
        assert!(!line.update(false, t0 + ms(31)));
        assert!(!line.level());
    }

    #[test]
    fn test_glitch_shorter_than_window_is_ignored() {
        let t0 = Instant::now();
        let mut line = Debounced::new(true, ms(30), t0);

        line.update(false, t0 + ms(1));
        line.update(true, t0 + ms(5));
        line.update(false, t0 + ms(10));

        // Only 25 ms since the last flip.
        assert!(line.update(false, t0 + ms(35)));
        assert!(!line.update(false, t0 + ms(40)));
    }

    #[test]
    fn test_zero_window_follows_input() {
        let t0 = Instant::now();
        let mut line = Debounced::new(false, Duration::ZERO, t0);

        assert!(line.update(true, t0));
        assert!(!line.update(false, t0));
    }
}
