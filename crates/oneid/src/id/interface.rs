use core::fmt;
use core::hash::Hash;
use core::num::ParseIntError;
use core::str::FromStr;

use crate::{generator::LockOneIdGenerator, time::MonotonicClock};

/// A primitive integer that can carry a packed identifier.
///
/// The trait pins down everything that differs between widths: how many bits
/// the integer can hold, how many of them the [`BitLayout`] distributes
/// between server, process and sequence, and the defaults and minimums the
/// layout calculator falls back to. All packing arithmetic is done in `u64`;
/// implementors only convert in and out of that domain.
///
/// Implemented for `u32`, `u64` and `i64`.
///
/// The tick field is masked to whatever the layout leaves over, so ids repeat
/// once the logical tick passes [`BitLayout::max_timestamp`]. The default
/// `u32` layout keeps only 5 tick bits: with the rolling epoch of
/// [`MonotonicClock::default`] its ids start repeating 32 seconds after the
/// clock is created.
///
/// [`MonotonicClock::default`]: crate::MonotonicClock
/// [`BitLayout::max_timestamp`]: crate::BitLayout::max_timestamp
/// [`BitLayout`]: crate::BitLayout
pub trait OneId:
    Copy
    + Clone
    + Default
    + fmt::Debug
    + fmt::Display
    + Ord
    + PartialOrd
    + Eq
    + PartialEq
    + Hash
    + Send
    + Sync
    + FromStr<Err = ParseIntError>
    + 'static
{
    /// Name of the primitive, used in error messages.
    const NAME: &'static str;

    /// Zero value (non-positive ids are coerced away from it)
    const ZERO: Self;

    /// One value (the server id substituted for non-positive input)
    const ONE: Self;

    /// Number of low-order bits an identifier may occupy. For signed widths
    /// this excludes the sign bit so every id is non-negative.
    const PAYLOAD_BITS: u32;

    /// Bits shared by the server, process and sequence fields. The tick takes
    /// the remaining `PAYLOAD_BITS - TOTAL_BITS`.
    const TOTAL_BITS: u32;

    const DEFAULT_SERVER_BITS: u32;
    const DEFAULT_PROCESS_BITS: u32;
    const DEFAULT_SEQUENCE_BITS: u32;

    const MIN_SERVER_BITS: u32 = 1;
    const MIN_PROCESS_BITS: u32 = 1;
    const MIN_SEQUENCE_BITS: u32;

    /// Widens a non-negative value into the packing domain.
    ///
    /// Callers coerce non-positive inputs before calling this, so the result
    /// for negative values is unspecified.
    fn to_u64(self) -> u64;

    /// Narrows a packed value, keeping the low [`Self::PAYLOAD_BITS`].
    fn from_u64(raw: u64) -> Self;

    /// Converts an operating system process id into this width.
    fn from_pid(pid: u32) -> Self {
        Self::from_u64(u64::from(pid))
    }

    /// Lossless widening used when reporting rejected values.
    fn to_i128(self) -> i128;

    /// The process-wide generator of this width, built on first access with
    /// the default layout and a clock anchored at that moment.
    ///
    /// Prefer owning a generator and passing it around; this exists for
    /// call sites that only want a drop-in default.
    fn default_generator() -> &'static LockOneIdGenerator<Self, MonotonicClock>;
}

/// Returns a mask selecting the low `bits` bits.
pub(crate) const fn bit_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}
