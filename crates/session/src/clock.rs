//! Injectable time source for the session guard.

use std::sync::{Arc, Mutex};

use tokio::time::{Duration, Instant};

/// Monotonic time source used by the guard.
///
/// All timestamps go through this trait so tests and embedding shells can
/// substitute controlled time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Clock backed by the tokio runtime clock.
///
/// Under `tokio::time::pause` this follows the mocked time, so paused-time
/// tests stay coherent with the guard's timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock for harnesses that step time themselves.
///
/// Advancing does not wake a sleeping guard task; the new time is picked
/// up at the task's next scheduled wake.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock lock poisoned")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_clock_advances_on_demand() {
        let clock = ManualClock::new(Instant::now());
        let before = clock.now();

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now() - before, Duration::from_secs(5));

        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - before, Duration::from_millis(5250));
    }

    #[tokio::test]
    async fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(Instant::now());
        let other = clock.clone();

        clock.advance(Duration::from_secs(1));
        assert_eq!(other.now(), clock.now());
    }
}
