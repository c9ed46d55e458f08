/// The mutable half of a generator: the tick of the last issued id and how
/// many ids were issued within it.
///
/// Starts at `(0, 0)` and is never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GeneratorState {
    last_tick: u64,
    sequence: u64,
}

/// How [`GeneratorState::advance`] moved the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Same tick, next sequence.
    Incremented,
    /// The sequence space of the tick ran out; the logical clock moved one
    /// tick ahead of the time source.
    Saturated,
    /// The time source moved past the last tick.
    Rolled,
}

impl GeneratorState {
    pub const fn new(last_tick: u64, sequence: u64) -> Self {
        Self {
            last_tick,
            sequence,
        }
    }

    pub const fn last_tick(&self) -> u64 {
        self.last_tick
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Moves the state to the next `(tick, sequence)` pair given the time
    /// source reading `now`.
    ///
    /// Never waits: when `max_sequence` is exceeded the tick is advanced
    /// regardless of `now`, so under sustained load the logical clock can run
    /// ahead of real time.
    pub(crate) fn advance(&mut self, now: u64, max_sequence: u64) -> Advance {
        if now <= self.last_tick {
            self.sequence += 1;
            if self.sequence > max_sequence {
                self.sequence = 0;
                // Packing masks the tick, so wrapping matches the id.
                self.last_tick = self.last_tick.wrapping_add(1);
                return Advance::Saturated;
            }
            Advance::Incremented
        } else {
            self.sequence = 0;
            self.last_tick = now;
            Advance::Rolled
        }
    }
}
