use std::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use flip_core::board::SlotBoard;
use flip_core::{CounterCfg, build_counter, diff, solve};

// Pairs that exercise growth, shrink and carries across many positions
fn value_pairs() -> Vec<(u64, u64)> {
    let mut state = 0x9E37_79B9_u64;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..256)
        .map(|_| (next() % 10_000_000_000, next() % 10_000_000_000))
        .collect()
}

fn bench_diff(c: &mut Criterion) {
    let pairs = value_pairs();
    c.bench_function("diff_random_pairs", |b| {
        b.iter(|| {
            for &(old, new) in &pairs {
                black_box(diff(black_box(old), black_box(new)));
            }
        })
    });
    c.bench_function("diff_carry_chain", |b| {
        b.iter(|| black_box(diff(black_box(999_999_999), black_box(1_000_000_000))))
    });
}

fn bench_solve(c: &mut Criterion) {
    c.bench_function("solve_exact_first_try", |b| {
        b.iter(|| black_box(solve(black_box(37), black_box(10_000), black_box(1000))))
    });
    c.bench_function("solve_exhausts_search", |b| {
        b.iter(|| black_box(solve(black_box(1234), black_box(60_000), black_box(10))))
    });
}

fn bench_auto_run(c: &mut Criterion) {
    let cfg = CounterCfg {
        value: 0,
        increment: 7,
        pace_ms: 50,
        auto: true,
    };
    c.bench_function("auto_count_one_minute_virtual", |b| {
        b.iter_batched(
            || build_counter(SlotBoard::new(), cfg, None, false).unwrap(),
            |mut counter| {
                counter.advance_by(Duration::from_secs(60));
                black_box(counter.value())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_diff, bench_solve, bench_auto_run);
criterion_main!(benches);
