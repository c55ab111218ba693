//! Benchmarks for random matrix generation
//!
//! Run with: cargo bench --bench datagen
//! For the larger shapes: BENCH_TIER=large cargo bench --bench datagen
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use datagen::datagen::compute_nnz_per_block;
use datagen::{
    generate_sample, generate_sequence, rand_matrix, DatagenConfig, MatrixBlock,
    RandomMatrixDescriptor,
};
use std::hint::black_box;
use std::time::Duration;

/// Benchmark tier controlled by environment variable
fn get_bench_tier() -> String {
    std::env::var("BENCH_TIER").unwrap_or_else(|_| "quick".to_string())
}

fn matrix_size() -> usize {
    if get_bench_tier() == "large" {
        5000
    } else {
        1000
    }
}

/// Dense and sparse generation across thread counts
fn bench_rand_threads(c: &mut Criterion) {
    let n = matrix_size();
    let mut group = c.benchmark_group("rand_threads");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let max_threads = num_cpus::get();
    for (label, sparsity) in [("dense", 0.9), ("sparse", 0.01)] {
        let desc = RandomMatrixDescriptor::uniform(n, n, 1000, 1000, sparsity, 0.0, 1.0).unwrap();
        for k in [1, 2, 4, 8].into_iter().filter(|&k| k <= max_threads) {
            let config = DatagenConfig::default().with_seed(42).with_threads(k);
            group.bench_with_input(
                BenchmarkId::new(format!("{}_{}x{}", label, n, n), k),
                &config,
                |b, config| b.iter(|| black_box(rand_matrix(&desc, config).unwrap())),
            );
        }
    }
    group.finish();
}

/// Value distributions at fixed shape and sparsity
fn bench_distributions(c: &mut Criterion) {
    let n = matrix_size();
    let mut group = c.benchmark_group("distributions");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let config = DatagenConfig::default().with_seed(7);
    for (pdf, params) in [("uniform", None), ("normal", None), ("poisson", Some("3"))] {
        let desc = config.descriptor(pdf, n, n, 0.5, 0.0, 1.0, params).unwrap();
        group.bench_function(pdf, |b| b.iter(|| black_box(rand_matrix(&desc, &config).unwrap())));
    }
    group.finish();
}

/// Non-zero estimation alone, in both estimator regimes
fn bench_nnz_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("nnz_per_block");
    for (label, sparsity) in [("proportional", 0.3), ("ultra_sparse", 0.000001)] {
        group.bench_function(label, |b| {
            b.iter(|| {
                let total: u64 = compute_nnz_per_block(100_000, 100_000, 100, 100, sparsity, Some(1))
                    .unwrap()
                    .sum();
                black_box(total)
            })
        });
    }
    group.finish();
}

fn bench_seq_and_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_sample");
    let mut out = MatrixBlock::new(0, 0, false);
    group.bench_function("seq_1m", |b| {
        b.iter(|| generate_sequence(&mut out, 1.0, 1_000_000.0, 1.0).unwrap())
    });
    group.bench_function("sample_no_replace_1k_of_1m", |b| {
        b.iter(|| generate_sample(&mut out, 1_000_000, 1000, false, Some(3)).unwrap())
    });
    group.bench_function("sample_replace_100k", |b| {
        b.iter(|| generate_sample(&mut out, 1_000_000, 100_000, true, Some(3)).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rand_threads,
    bench_distributions,
    bench_nnz_estimation,
    bench_seq_and_sample
);
criterion_main!(benches);
