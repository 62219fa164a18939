//! Criterion benchmarks for Fourier–Motzkin elimination.
//! Sizes: n in {2, 3, 4} variables with `extra` random rows on top of the box.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use polyproj::fm::{eliminate, project_out, FmCfg};
use polyproj::sample::{random_bounded_system, SystemToken};

fn bench_eliminate(c: &mut Criterion) {
    let mut group = c.benchmark_group("fm");
    let cfg = FmCfg::default();
    for &extra in &[0usize, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::new("eliminate_n3", extra), &extra, |b, &extra| {
            b.iter_batched(
                || random_bounded_system(3, extra, 1.0, SystemToken::new(41, extra as u64)),
                |sys| {
                    let _res = eliminate(sys, 0, cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    // full projection to one variable; growth is quadratic per step
    for &n in &[2usize, 3, 4] {
        group.bench_with_input(BenchmarkId::new("project_to_1d", n), &n, |b, &n| {
            let labels: Vec<usize> = (1..n).collect();
            b.iter_batched(
                || random_bounded_system(n, 2, 1.0, SystemToken::new(42, n as u64)),
                |sys| {
                    let _res = project_out(sys, &labels, cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_eliminate);
criterion_main!(benches);
