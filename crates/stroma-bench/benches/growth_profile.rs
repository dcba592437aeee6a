//! Criterion benchmarks for the growth engine: sequential and banded
//! sweeps over a fixed generation count, the same measurement loop as the
//! `speedup` example driver.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stroma_bench::seeded_colony;

const SIZE: u32 = 128;
const GENERATIONS: u32 = 40;

/// Benchmark: full growth run from a centre seed at several pool sizes.
fn bench_growth_by_worker_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth_profile");
    for workers in [1usize, 2, 4] {
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &workers,
            |b, &workers| {
                b.iter(|| {
                    let mut tumour = seeded_colony(SIZE, workers);
                    tumour.execute(GENERATIONS);
                    black_box(tumour.occupied_cells())
                });
            },
        );
    }
    group.finish();
}

/// Benchmark: the sequential sweep alone, the baseline every banded
/// configuration is compared against.
fn bench_sequential_sweep(c: &mut Criterion) {
    c.bench_function("sequential_sweep_128", |b| {
        b.iter(|| {
            let mut tumour = seeded_colony(SIZE, 1);
            tumour.execute(GENERATIONS);
            black_box(tumour.occupied_cells())
        });
    });
}

criterion_group!(
    benches,
    bench_growth_by_worker_count,
    bench_sequential_sweep
);
criterion_main!(benches);
