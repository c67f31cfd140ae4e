//! Fixed-interval tick driver anchored to a clock.
//!
//! The driver never re-arms a timer. It counts how many whole intervals
//! have passed since its anchor, so a late wake-up yields several due ticks
//! instead of shifting every later tick.

use std::time::Duration;

use tranquil_core::Clock;

/// Emits ticks at `anchor`, `anchor + interval`, `anchor + 2 * interval`, ...
///
/// ```rust
/// use std::time::Duration;
/// use tranquil_breath::IntervalDriver;
/// use tranquil_core::ManualClock;
///
/// let clock = ManualClock::new();
/// let mut driver = IntervalDriver::new(clock.clone(), Duration::from_secs(1));
///
/// assert_eq!(driver.due(), 1); // the tick at the anchor
/// clock.advance(Duration::from_millis(2500));
/// assert_eq!(driver.due(), 2);
/// assert_eq!(driver.due(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalDriver<C> {
    clock: C,
    interval: Duration,
    anchor: Duration,
    emitted: u64,
}

impl<C: Clock> IntervalDriver<C> {
    /// Anchor a driver at the clock's current time.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn new(clock: C, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "tick interval must be > 0");
        let anchor = clock.now();
        Self {
            clock,
            interval,
            anchor,
            emitted: 0,
        }
    }

    /// Number of ticks that became due since the last call.
    pub fn due(&mut self) -> u64 {
        let elapsed = self.clock.now().saturating_sub(self.anchor);
        let total = (elapsed.as_nanos() / self.interval.as_nanos()) as u64 + 1;
        let due = total.saturating_sub(self.emitted);
        self.emitted = self.emitted.max(total);
        due
    }

    /// Clock time at which the next tick becomes due.
    pub fn next_deadline(&self) -> Duration {
        let offset = self.interval.as_nanos() * u128::from(self.emitted);
        self.anchor + Duration::from_nanos(offset as u64)
    }

    /// Time left until the next tick, zero if one is already due.
    pub fn until_next(&self) -> Duration {
        self.next_deadline().saturating_sub(self.clock.now())
    }

    /// Re-anchor at the current time; the next [`due`](Self::due) yields
    /// the tick at the new anchor.
    pub fn restart(&mut self) {
        self.anchor = self.clock.now();
        self.emitted = 0;
    }

    /// Tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks emitted since the last restart.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}
