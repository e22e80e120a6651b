//! Trailing-edge debounce for layout measurement.
//!
//! Every request restarts the quiet window; the measurement fires once the
//! window elapses without further requests. A burst of auto-scroll steps
//! therefore yields a single re-measurement.

use std::time::{Duration, Instant};

/// Default quiet window.
pub const DEFAULT_MEASURE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Coalesces measurement requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureDebouncer {
    quiet: Duration,
    last_request: Option<Instant>,
}

impl MeasureDebouncer {
    /// Debouncer with the given quiet window.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_request: None,
        }
    }

    /// Ask for a measurement at `now`.
    pub fn request(&mut self, now: Instant) {
        self.last_request = Some(now);
    }

    /// True exactly once per burst, when the quiet window has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_request {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                self.last_request = None;
                true
            }
            _ => false,
        }
    }

    /// A request is waiting for its window to close.
    pub fn is_pending(&self) -> bool {
        self.last_request.is_some()
    }

    /// Drop any pending request.
    pub fn cancel(&mut self) {
        self.last_request = None;
    }
}

impl Default for MeasureDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_MEASURE_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn idle_debouncer_never_fires() {
        let mut d = MeasureDebouncer::default();
        assert!(!d.poll(Instant::now()));
    }

    #[test]
    fn burst_coalesces_into_one_measurement() {
        let start = Instant::now();
        let mut d = MeasureDebouncer::new(100 * MS);

        let mut fired = 0;
        for i in 0..10 {
            let now = start + i * 20 * MS;
            d.request(now);
            if d.poll(now) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0, "nothing fires while requests keep arriving");

        let last = start + 180 * MS;
        assert!(!d.poll(last + 99 * MS));
        assert!(d.poll(last + 100 * MS));
        assert!(!d.poll(last + 200 * MS), "fires once per burst");
    }

    #[test]
    fn cancel_drops_pending_request() {
        let now = Instant::now();
        let mut d = MeasureDebouncer::new(10 * MS);
        d.request(now);
        assert!(d.is_pending());

        d.cancel();
        assert!(!d.poll(now + 50 * MS));
    }
}
