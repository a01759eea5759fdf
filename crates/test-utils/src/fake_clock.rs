use chrono::NaiveDateTime;
use timeblock::clock::Clock;

/// A clock slaved to the tokio timeline.
///
/// Under `#[tokio::test(start_paused = true)]` the tokio clock advances
/// virtually; reading the real wall clock there would leave planning and
/// armed timers on different timelines. `SimClock` reports
/// `base + tokio-elapsed`, keeping both consistent.
#[derive(Debug, Clone)]
pub struct SimClock {
    base: NaiveDateTime,
    started: tokio::time::Instant,
}

impl SimClock {
    /// Must be constructed inside the test's tokio runtime.
    pub fn new(base: NaiveDateTime) -> Self {
        Self { base, started: tokio::time::Instant::now() }
    }
}

impl Clock for SimClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = self.started.elapsed();
        self.base + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero())
    }
}
