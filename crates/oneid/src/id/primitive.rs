use std::sync::OnceLock;

use crate::{
    generator::LockOneIdGenerator,
    id::{OneId, bit_mask},
    layout::BitLayout,
    time::MonotonicClock,
};

/// Implements [`OneId`] for a primitive integer.
///
/// Each expansion owns its own lazily-initialized default generator and
/// checks the width constants at compile time.
macro_rules! impl_one_id {
    (
        $ty:ty,
        payload_bits: $payload:expr,
        total_bits: $total:expr,
        defaults: (server: $server:expr, process: $process:expr, sequence: $sequence:expr),
        min_sequence_bits: $min_sequence:expr $(,)?
    ) => {
        impl OneId for $ty {
            const NAME: &'static str = stringify!($ty);
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const PAYLOAD_BITS: u32 = $payload;
            const TOTAL_BITS: u32 = $total;
            const DEFAULT_SERVER_BITS: u32 = $server;
            const DEFAULT_PROCESS_BITS: u32 = $process;
            const DEFAULT_SEQUENCE_BITS: u32 = $sequence;
            const MIN_SEQUENCE_BITS: u32 = $min_sequence;

            #[allow(clippy::cast_sign_loss, clippy::cast_lossless)]
            fn to_u64(self) -> u64 {
                self as u64
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            fn from_u64(raw: u64) -> Self {
                (raw & bit_mask(Self::PAYLOAD_BITS)) as $ty
            }

            fn to_i128(self) -> i128 {
                i128::from(self)
            }

            fn default_generator() -> &'static LockOneIdGenerator<Self, MonotonicClock> {
                static GENERATOR: OnceLock<LockOneIdGenerator<$ty, MonotonicClock>> =
                    OnceLock::new();
                GENERATOR.get_or_init(|| {
                    LockOneIdGenerator::new(BitLayout::default(), MonotonicClock::default())
                })
            }
        }

        // The defaults must fill the layout exactly, respect the minimums,
        // and leave at least one bit for the tick.
        const _: () = {
            assert!($server + $process + $sequence == $total);
            assert!($sequence >= $min_sequence);
            assert!($server >= 1 && $process >= 1);
            assert!($total < $payload);
            assert!($payload <= <$ty>::BITS);
        };
    };
}

// 5 tick bits: ids wrap every 32 ticks.
impl_one_id!(
    u32,
    payload_bits: 32,
    total_bits: 27,
    defaults: (server: 10, process: 5, sequence: 12),
    min_sequence_bits: 12,
);

impl_one_id!(
    u64,
    payload_bits: 64,
    total_bits: 39,
    defaults: (server: 10, process: 5, sequence: 24),
    min_sequence_bits: 24,
);

impl_one_id!(
    i64,
    payload_bits: 63,
    total_bits: 39,
    defaults: (server: 10, process: 5, sequence: 24),
    min_sequence_bits: 12,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_width_never_sets_the_sign_bit() {
        assert_eq!(i64::from_u64(u64::MAX), i64::MAX);
        assert!(i64::from_u64(1 << 63) >= 0);
    }

    #[test]
    fn narrow_width_truncates_to_payload() {
        assert_eq!(u32::from_u64(u64::from(u32::MAX) + 2), 1);
        assert_eq!(u64::from_u64(u64::MAX), u64::MAX);
    }

    #[test]
    fn pid_conversion_is_lossless() {
        assert_eq!(u32::from_pid(u32::MAX), u32::MAX);
        assert_eq!(u64::from_pid(4242), 4242);
        assert_eq!(i64::from_pid(u32::MAX), i64::from(u32::MAX));
    }

    #[test]
    fn default_generator_is_a_singleton() {
        let a = u64::default_generator();
        let b = u64::default_generator();
        assert!(core::ptr::eq(a, b));
        assert_eq!(*a.layout(), BitLayout::<u64>::default());
    }
}
