use core::fmt;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::{debug, instrument};

use crate::{
    env::EnvIds,
    error::Result,
    generator::{
        GeneratorState,
        mutex::{Mutex, MutexGuard, lock},
        state::Advance,
    },
    id::OneId,
    layout::BitLayout,
    time::{MonotonicClock, TimeSource},
};

/// A lock-based identifier generator suitable for multi-threaded use.
///
/// Pairs an immutable [`BitLayout`] with a [`GeneratorState`] behind a mutex.
/// Every call to [`generate`] holds the lock for the whole
/// read-compare-advance-pack step, so no two calls observe the same
/// `(tick, sequence)` pair. Share it by reference or behind an `Arc`.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never blocks beyond the lock, never fails
/// - ✅ One implementation for every [`OneId`] width
///
/// [`generate`]: LockOneIdGenerator::generate
pub struct LockOneIdGenerator<ID, T>
where
    ID: OneId,
    T: TimeSource,
{
    layout: BitLayout<ID>,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<GeneratorState>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<GeneratorState>,
    time: T,
}

impl<ID> LockOneIdGenerator<ID, MonotonicClock>
where
    ID: OneId,
{
    /// Builds a layout from the requested widths (see [`BitLayout::new`]) and
    /// pairs it with fresh state and a clock whose epoch is now.
    ///
    /// # Example
    /// ```
    /// use oneid::{LockOneIdGenerator, MonotonicClock};
    ///
    /// // Horizontal scaling: up to 1024 servers with 32 processes each.
    /// let generator = LockOneIdGenerator::<u64, MonotonicClock>::with_bits(10, 5, 24);
    /// let a = generator.generate(7, 3);
    /// let b = generator.generate(7, 3);
    /// assert_ne!(a, b);
    /// ```
    pub fn with_bits(server_bits: u32, process_bits: u32, sequence_bits: u32) -> Self {
        Self::new(
            BitLayout::new(server_bits, process_bits, sequence_bits),
            MonotonicClock::default(),
        )
    }

    /// The clock's epoch as a duration since 1970-01-01 UTC.
    pub fn epoch(&self) -> Duration {
        self.time.epoch()
    }
}

impl<ID> Default for LockOneIdGenerator<ID, MonotonicClock>
where
    ID: OneId,
{
    fn default() -> Self {
        Self::new(BitLayout::default(), MonotonicClock::default())
    }
}

impl<ID, T> LockOneIdGenerator<ID, T>
where
    ID: OneId,
    T: TimeSource,
{
    /// Creates a generator with the state at tick zero, sequence zero.
    pub fn new(layout: BitLayout<ID>, time: T) -> Self {
        Self::from_components(layout, 0, 0, time)
    }

    /// Creates a generator whose state starts at the given tick and sequence.
    ///
    /// Useful for restoring a known position or for forcing edge cases. A
    /// sequence larger than the layout allows is clamped to
    /// [`BitLayout::max_sequence`].
    pub fn from_components(layout: BitLayout<ID>, last_tick: u64, sequence: u64, time: T) -> Self {
        let state = Mutex::new(GeneratorState::new(
            last_tick,
            sequence.min(layout.max_sequence()),
        ));
        Self {
            layout,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            time,
        }
    }

    /// Generates the next identifier for `server_id` and `process_id`.
    ///
    /// - A non-positive `server_id` is replaced by `1`.
    /// - A non-positive `process_id` is replaced by the OS process id.
    ///
    /// Ids wider than their field are masked to it (see [`BitLayout::pack`]).
    ///
    /// # Example
    /// ```
    /// use oneid::{LockOneIdGenerator, MonotonicClock};
    ///
    /// let generator = LockOneIdGenerator::<i64, MonotonicClock>::default();
    /// let id = generator.generate(0, 0);
    /// assert!(id > 0);
    /// assert_eq!(generator.layout().decompose(id).server_id, 1);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self, server_id: ID, process_id: ID) -> ID {
        let server_id = if server_id <= ID::ZERO {
            ID::ONE
        } else {
            server_id
        };
        let process_id = if process_id <= ID::ZERO {
            ID::from_pid(std::process::id())
        } else {
            process_id
        };

        let mut state = self.lock_state();
        let now = self.time.current_tick();
        match state.advance(now, self.layout.max_sequence()) {
            Advance::Saturated => Self::cold_saturated(now, state.last_tick()),
            Advance::Incremented | Advance::Rolled => {}
        }

        self.layout.pack(
            state.last_tick(),
            server_id.to_u64(),
            process_id.to_u64(),
            state.sequence(),
        )
    }

    #[cold]
    #[inline(never)]
    fn cold_saturated(_now: u64, _tick: u64) {
        #[cfg(feature = "tracing")]
        debug!(
            now = _now,
            tick = _tick,
            width = ID::NAME,
            "sequence exhausted, logical clock advanced"
        );
    }

    /// Generates an identifier from the `SERVER_ID` and `PROCESS_ID`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is missing or does not parse as
    /// this width, if the server id is below one, or if the process id is
    /// negative. See [`EnvIds::from_env`].
    pub fn generate_from_env(&self) -> Result<ID> {
        let ids = EnvIds::<ID>::from_env()?;
        Ok(self.generate(ids.server_id, ids.process_id))
    }

    fn lock_state(&self) -> MutexGuard<'_, GeneratorState> {
        #[cfg(feature = "cache-padded")]
        {
            lock(&*self.state)
        }
        #[cfg(not(feature = "cache-padded"))]
        {
            lock(&self.state)
        }
    }

    pub fn layout(&self) -> &BitLayout<ID> {
        &self.layout
    }

    /// A copy of the current state.
    pub fn state(&self) -> GeneratorState {
        *self.lock_state()
    }

    pub fn time(&self) -> &T {
        &self.time
    }
}

impl<ID, T> fmt::Debug for LockOneIdGenerator<ID, T>
where
    ID: OneId,
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockOneIdGenerator")
            .field("layout", &self.layout)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
