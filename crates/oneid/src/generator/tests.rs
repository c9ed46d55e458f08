use std::collections::HashSet;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};
use std::thread::scope;

use crate::{BitLayout, GeneratorState, LockOneIdGenerator, MonotonicClock, OneId, TimeSource};

#[derive(Clone, Default)]
struct MockTime {
    tick: Arc<AtomicU64>,
}

impl MockTime {
    fn at(tick: u64) -> Self {
        Self {
            tick: Arc::new(AtomicU64::new(tick)),
        }
    }

    fn set(&self, tick: u64) {
        self.tick.store(tick, Ordering::SeqCst);
    }
}

impl TimeSource for MockTime {
    fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::SeqCst)
    }
}

fn run_never_zero<ID: OneId>() {
    let generator = LockOneIdGenerator::<ID, MonotonicClock>::default();
    for server in 1..=64u32 {
        let id = generator.generate(ID::from_u64(u64::from(server)), ID::ZERO);
        assert_ne!(id, ID::ZERO, "zero id for server {server}");
    }
}

fn run_zero_server_id_is_coerced<ID: OneId>() {
    let generator = LockOneIdGenerator::<ID, MonotonicClock>::default();
    let id = generator.generate(ID::ZERO, ID::ONE);
    assert_ne!(id, ID::ZERO);
    assert_eq!(generator.layout().decompose(id).server_id, 1);
}

fn run_zero_process_id_uses_pid<ID: OneId>() {
    let generator = LockOneIdGenerator::<ID, MonotonicClock>::default();
    let layout = *generator.layout();
    let id = generator.generate(ID::ONE, ID::ZERO);
    assert_eq!(
        layout.decompose(id).process_id,
        u64::from(std::process::id()) & layout.max_process_id()
    );
}

fn run_sequence_increments_within_same_tick<ID: OneId>() {
    let generator = LockOneIdGenerator::<ID, _>::new(BitLayout::default(), MockTime::at(0));
    let layout = *generator.layout();

    let id1 = layout.decompose(generator.generate(ID::ONE, ID::ONE));
    let id2 = layout.decompose(generator.generate(ID::ONE, ID::ONE));
    let id3 = layout.decompose(generator.generate(ID::ONE, ID::ONE));

    // Fresh state sits at tick 0, so the first call is "not newer".
    assert_eq!((id1.timestamp, id1.sequence), (0, 1));
    assert_eq!((id2.timestamp, id2.sequence), (0, 2));
    assert_eq!((id3.timestamp, id3.sequence), (0, 3));
}

fn run_newer_tick_resets_sequence<ID: OneId>() {
    let time = MockTime::at(0);
    let generator = LockOneIdGenerator::<ID, _>::new(BitLayout::default(), time.clone());
    generator.generate(ID::ONE, ID::ONE);
    generator.generate(ID::ONE, ID::ONE);

    time.set(5);
    let id = generator.generate(ID::ONE, ID::ONE);
    let parts = generator.layout().decompose(id);
    assert_eq!((parts.timestamp, parts.sequence), (5, 0));
    assert_eq!(generator.state().last_tick(), 5);
}

fn run_tick_rollover<ID: OneId>() {
    let layout = BitLayout::<ID>::default();
    let generator =
        LockOneIdGenerator::from_components(layout, 3, layout.max_sequence(), MockTime::at(3));

    let id = generator.generate(ID::ONE, ID::ONE);
    let state = generator.state();
    assert_eq!(state.last_tick(), 4);
    assert_eq!(state.sequence(), 0);

    let parts = layout.decompose(id);
    assert_eq!((parts.timestamp, parts.sequence), (4, 0));
}

fn run_tick_rollover_at_u64_max<ID: OneId>() {
    let layout = BitLayout::<ID>::default();
    let generator = LockOneIdGenerator::from_components(
        layout,
        u64::MAX,
        layout.max_sequence(),
        MockTime::at(0),
    );

    let id = generator.generate(ID::ONE, ID::ONE);
    assert_eq!(generator.state(), GeneratorState::new(0, 0));

    let parts = layout.decompose(id);
    assert_eq!((parts.timestamp, parts.sequence), (0, 0));
    assert_eq!((parts.server_id, parts.process_id), (1, 1));
}

fn run_ids_increase_within_process<ID: OneId>() {
    let layout = BitLayout::<ID>::default();
    let generator = LockOneIdGenerator::new(layout, MockTime::at(1));
    let total = layout.max_sequence() * 2 + 10;

    let mut last = generator.generate(ID::ONE, ID::ONE);
    for _ in 0..total.min(1 << 16) {
        let id = generator.generate(ID::ONE, ID::ONE);
        assert!(id > last, "{id} <= {last}");
        last = id;
    }
}

fn run_no_duplicates<ID: OneId>(count: usize) {
    let generator = LockOneIdGenerator::<ID, MonotonicClock>::default();
    let mut seen = HashSet::with_capacity(count);
    for _ in 0..count {
        let id = generator.generate(ID::ONE, ID::ZERO);
        assert!(seen.insert(id), "duplicate id {id}");
    }
    assert_eq!(seen.len(), count);
}

fn run_no_duplicates_across_servers<ID: OneId>(per_server: usize) {
    let generator = LockOneIdGenerator::<ID, MonotonicClock>::default();
    let mut seen = HashSet::with_capacity(per_server * 8);
    for server in 1..=8u64 {
        for _ in 0..per_server {
            let id = generator.generate(ID::from_u64(server), ID::ONE);
            assert!(seen.insert(id), "duplicate id {id} for server {server}");
        }
    }
}

fn run_no_duplicates_threaded<ID: OneId>(ids_per_thread: usize) {
    let threads = num_cpus::get().clamp(2, 16);
    let total = threads * ids_per_thread;

    let generator = Arc::new(LockOneIdGenerator::<ID, MonotonicClock>::default());
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(total)));

    scope(|s| {
        for _ in 0..threads {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let ids: Vec<ID> = (0..ids_per_thread)
                    .map(|_| generator.generate(ID::ONE, ID::ZERO))
                    .collect();
                let mut seen = seen_ids.lock().unwrap();
                for id in ids {
                    assert!(seen.insert(id), "duplicate id {id}");
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, total, "Expected {total} unique IDs");
}

fn run_oversized_ids_are_masked<ID: OneId>() {
    let generator = LockOneIdGenerator::<ID, _>::new(BitLayout::default(), MockTime::at(2));
    let layout = *generator.layout();
    let server = layout.max_server_id() + 1 + 5;
    let process = layout.max_process_id() + 1 + 3;

    let id = generator.generate(ID::from_u64(server), ID::from_u64(process));
    let parts = layout.decompose(id);
    assert_eq!(parts.server_id, 5);
    assert_eq!(parts.process_id, 3);
    assert_eq!(parts.timestamp, 2);
}

macro_rules! generator_tests {
    ($($name:ident => $ty:ty, $count:expr);* $(;)?) => {
        $(
            mod $name {
                use super::*;

                #[test]
                fn never_zero() {
                    run_never_zero::<$ty>();
                }

                #[test]
                fn zero_server_id_is_coerced() {
                    run_zero_server_id_is_coerced::<$ty>();
                }

                #[test]
                fn zero_process_id_uses_pid() {
                    run_zero_process_id_uses_pid::<$ty>();
                }

                #[test]
                fn sequence_increments_within_same_tick() {
                    run_sequence_increments_within_same_tick::<$ty>();
                }

                #[test]
                fn newer_tick_resets_sequence() {
                    run_newer_tick_resets_sequence::<$ty>();
                }

                #[test]
                fn tick_rollover() {
                    run_tick_rollover::<$ty>();
                }

                #[test]
                fn tick_rollover_at_u64_max() {
                    run_tick_rollover_at_u64_max::<$ty>();
                }

                #[test]
                fn ids_increase_within_process() {
                    run_ids_increase_within_process::<$ty>();
                }

                #[test]
                fn no_duplicates() {
                    run_no_duplicates::<$ty>($count);
                }

                #[test]
                fn no_duplicates_across_servers() {
                    run_no_duplicates_across_servers::<$ty>($count / 8);
                }

                #[test]
                fn no_duplicates_threaded() {
                    run_no_duplicates_threaded::<$ty>($count / 16);
                }

                #[test]
                fn oversized_ids_are_masked() {
                    run_oversized_ids_are_masked::<$ty>();
                }
            }
        )*
    };
}

generator_tests! {
    width_u32 => u32, 50_000;
    width_u64 => u64, 200_000;
    width_i64 => i64, 200_000;
}

#[test]
fn signed_ids_are_never_negative() {
    let layout = BitLayout::<i64>::default();
    let generator = LockOneIdGenerator::from_components(
        layout,
        layout.max_timestamp(),
        0,
        MockTime::at(layout.max_timestamp()),
    );
    for _ in 0..1_000 {
        assert!(generator.generate(i64::MAX, i64::MAX) >= 0);
    }
}

#[test]
fn default_generator_is_shared() {
    let a = crate::default_generator::<u64>().generate(3, 0);
    let b = crate::default_generator::<u64>().generate(3, 0);
    assert_ne!(a, b);
}

#[test]
fn with_bits_applies_layout() {
    let generator = LockOneIdGenerator::<u32, MonotonicClock>::with_bits(2, 3, 0);
    let layout = generator.layout();
    assert_eq!(layout.server_bits(), 2);
    assert_eq!(layout.process_bits(), 3);
    assert_eq!(layout.sequence_bits(), 22);
    assert!(generator.epoch() > core::time::Duration::ZERO);
}

#[test]
fn u32_ids_repeat_after_tick_space_wraps() {
    let layout = BitLayout::<u32>::default();
    assert_eq!(layout.max_timestamp(), 31);

    let first = LockOneIdGenerator::new(layout, MockTime::at(1)).generate(1, 1);
    let second = LockOneIdGenerator::new(layout, MockTime::at(33)).generate(1, 1);

    assert_eq!(first, second);
    assert_eq!(layout.decompose(second).timestamp, 1);
}
