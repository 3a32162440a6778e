use std::time::{Duration, Instant};

/// Holds back the most recent value until `delay` passes without a newer one.
///
/// The UI loop polls it on every tick; no timer task is involved.
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if now < due {
            return None;
        }
        self.flush()
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn releases_after_quiet_period() {
        let start = Instant::now();
        let mut d = Debounce::new(DELAY);
        d.push("a", start);
        assert_eq!(d.poll(start + Duration::from_millis(299)), None);
        assert_eq!(d.poll(start + DELAY), Some("a"));
        assert_eq!(d.poll(start + DELAY * 2), None);
    }

    #[test]
    fn newer_value_restarts_the_delay() {
        let start = Instant::now();
        let mut d = Debounce::new(DELAY);
        d.push("a", start);
        d.push("ab", start + Duration::from_millis(200));
        assert_eq!(d.poll(start + DELAY), None);
        assert_eq!(d.poll(start + Duration::from_millis(500)), Some("ab"));
    }

    #[test]
    fn flush_skips_the_wait() {
        let mut d = Debounce::new(DELAY);
        d.push(1, Instant::now());
        assert_eq!(d.flush(), Some(1));
        assert_eq!(d.flush(), None);
    }
}
