use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A source of logical ticks: whole seconds elapsed since the source's epoch.
///
/// This abstraction allows you to plug in the real clock or a mocked time
/// source in tests.
///
/// # Example
///
/// ```
/// use oneid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_tick(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_tick(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the number of whole seconds since the epoch.
    fn current_tick(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_tick(&self) -> u64 {
        (**self).current_tick()
    }
}

/// A monotonic time source counting seconds from an epoch.
///
/// The clock captures `Instant::now()` at construction together with how far
/// the wall clock was past the epoch at that moment. Ticks are that fixed
/// offset plus the monotonic time elapsed since, so they never go backward
/// even if the system clock is adjusted.
///
/// [`MonotonicClock::default`] puts the epoch at construction time, so the
/// first tick is `0`. Use [`MonotonicClock::with_epoch`] to anchor ticks to a
/// fixed instant shared by several processes instead.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch: Duration,
    offset: u64, // seconds between the epoch and `start`
}

impl Default for MonotonicClock {
    fn default() -> Self {
        let start = Instant::now();
        Self {
            start,
            epoch: unix_now(),
            offset: 0,
        }
    }
}

impl MonotonicClock {
    /// Constructs a clock using `epoch` (a duration since 1970-01-01 UTC) as
    /// tick zero.
    ///
    /// An epoch in the future is treated as "now": ticks start at zero and
    /// count up from construction.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use oneid::{MonotonicClock, TimeSource};
    ///
    /// // Wednesday, January 1, 2025 00:00:00 UTC
    /// let clock = MonotonicClock::with_epoch(Duration::from_secs(1_735_689_600));
    /// assert!(clock.current_tick() > 0);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        let start = Instant::now();
        let offset = unix_now().saturating_sub(epoch).as_secs();
        Self {
            start,
            epoch,
            offset,
        }
    }

    /// The epoch as a duration since 1970-01-01 UTC.
    pub fn epoch(&self) -> Duration {
        self.epoch
    }
}

impl TimeSource for MonotonicClock {
    fn current_tick(&self) -> u64 {
        self.offset + self.start.elapsed().as_secs()
    }
}

fn unix_now() -> Duration {
    // A clock set before 1970 is reported as the unix epoch itself.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clock_starts_at_zero() {
        let clock = MonotonicClock::default();
        assert!(clock.current_tick() <= 1);
        assert!(clock.epoch() > Duration::ZERO);
    }

    #[test]
    fn historical_epoch_offsets_ticks() {
        let now = unix_now();
        let clock = MonotonicClock::with_epoch(now - Duration::from_secs(3600));
        let tick = clock.current_tick();
        assert!((3599..=3601).contains(&tick), "tick = {tick}");
    }

    #[test]
    fn future_epoch_saturates() {
        let clock = MonotonicClock::with_epoch(unix_now() + Duration::from_secs(3600));
        assert!(clock.current_tick() <= 1);
    }

    #[test]
    fn ticks_never_decrease() {
        let clock = MonotonicClock::default();
        let mut last = clock.current_tick();
        for _ in 0..10_000 {
            let tick = clock.current_tick();
            assert!(tick >= last);
            last = tick;
        }
    }
}
