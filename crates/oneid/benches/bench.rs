use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use oneid::{BitLayout, LockOneIdGenerator, MonotonicClock, OneId, TimeSource};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    tick: u64,
}

impl TimeSource for FixedMockTime {
    fn current_tick(&self) -> u64 {
        self.tick
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks the single-threaded hot path against a frozen clock, which
/// also exercises sequence exhaustion on narrow layouts.
fn bench_generate<ID: OneId>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("mock/{}", ID::NAME));
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator =
                    LockOneIdGenerator::new(BitLayout::<ID>::default(), FixedMockTime { tick: 1 });
                for _ in 0..TOTAL_IDS {
                    black_box(generator.generate(ID::ONE, ID::ONE));
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks contended generation with the real clock.
fn bench_generate_threaded<ID: OneId>(c: &mut Criterion, threads: usize) {
    let mut group = c.benchmark_group(format!("mono/threads/{threads}/{}", ID::NAME));
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let generator = Arc::new(LockOneIdGenerator::<ID, MonotonicClock>::default());
            let barrier = Arc::new(Barrier::new(threads + 1));

            let start = scope(|s| {
                for _ in 0..threads {
                    let generator = Arc::clone(&generator);
                    let barrier = Arc::clone(&barrier);
                    s.spawn(move || {
                        barrier.wait();
                        for _ in 0..iters {
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.generate(ID::ONE, ID::ZERO));
                            }
                        }
                    });
                }
                barrier.wait();
                Instant::now()
            });
            start.elapsed()
        });
    });

    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_generate::<u32>(c);
    bench_generate::<u64>(c);
    bench_generate::<i64>(c);

    for threads in [1, 2, 4, 8] {
        bench_generate_threaded::<u64>(c, threads);
    }
}

criterion_group!(bench_group, benches);
criterion_main!(bench_group);
