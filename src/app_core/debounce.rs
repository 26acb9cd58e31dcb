//! Single-slot cancellable deadline for debounced search.
//!
//! Time is supplied by the runtime as a monotonic `Duration` since an
//! arbitrary origin (native: `Instant::elapsed`, web: `performance.now()`),
//! which keeps this type usable on wasm32 where `Instant` is unavailable.

use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the deadline `delay` after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the pending deadline has passed.
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Fires immediately if anything is pending.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Time left until the pending deadline, for sizing event-poll timeouts.
    pub fn time_until_due(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_fires_after_delay() {
        let mut debouncer = Debouncer::default();
        debouncer.schedule(ms(1000));

        assert!(!debouncer.fire_if_due(ms(1149)));
        assert!(debouncer.fire_if_due(ms(1150)));
        assert!(!debouncer.fire_if_due(ms(2000)));
    }

    #[test]
    fn test_reschedule_replaces_deadline() {
        let mut debouncer = Debouncer::default();
        debouncer.schedule(ms(0));
        debouncer.schedule(ms(100));

        assert!(!debouncer.fire_if_due(ms(200)));
        assert!(debouncer.fire_if_due(ms(250)));
    }

    #[test]
    fn test_cancel_and_flush() {
        let mut debouncer = Debouncer::new(ms(50));
        debouncer.schedule(ms(0));
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.flush());

        debouncer.schedule(ms(0));
        assert!(debouncer.flush());
        assert!(!debouncer.fire_if_due(ms(100)));
    }

    #[test]
    fn test_time_until_due() {
        let mut debouncer = Debouncer::new(ms(150));
        assert_eq!(debouncer.time_until_due(ms(0)), None);

        debouncer.schedule(ms(10));
        assert_eq!(debouncer.time_until_due(ms(60)), Some(ms(100)));
        assert_eq!(debouncer.time_until_due(ms(500)), Some(Duration::ZERO));
    }
}
