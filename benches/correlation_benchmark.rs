//! Benchmark of Pearson vs Spearman correlation matrices
//!
//! Run with: cargo bench --bench correlation_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand::SeedableRng;

use valuater::pipeline::{compute_correlation, Column, CorrelationMethod, Dataset};

/// Generate synthetic house data with controlled characteristics
fn generate_test_dataset(n_rows: usize, n_features: usize, seed: u64) -> Dataset {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut features: Vec<Vec<f64>> = Vec::with_capacity(n_features);
    for i in 0..n_features {
        let feature_type = i % 4; // Cycle through different distributions

        let values: Vec<f64> = match feature_type {
            0 => (0..n_rows).map(|_| rng.gen::<f64>() * 100.0).collect(),
            1 => {
                // Skewed, like lot areas
                (0..n_rows)
                    .map(|_| {
                        let v = rng.gen::<f64>();
                        (v * v * v) * 100.0
                    })
                    .collect()
            }
            2 => {
                // Integer grades with many ties, like quality ratings
                (0..n_rows).map(|_| rng.gen_range(1..=10) as f64).collect()
            }
            _ => {
                // Correlated with an earlier feature
                let base = &features[i - 3];
                base.iter()
                    .map(|v| v + rng.gen::<f64>() * 10.0 - 5.0)
                    .collect()
            }
        };
        features.push(values);
    }

    let price: Vec<f64> = (0..n_rows)
        .map(|r| {
            features.iter().step_by(3).map(|f| f[r]).sum::<f64>() * 1_000.0
                + rng.gen::<f64>() * 5_000.0
        })
        .collect();

    let mut columns: Vec<Column> = features
        .into_iter()
        .enumerate()
        .map(|(i, values)| Column::numeric(format!("feature_{}", i), values))
        .collect();
    columns.push(Column::numeric("SalePrice", price));

    Dataset::new(columns).expect("Failed to create Dataset")
}

/// Both methods for varying column counts; counts straddle the pairwise/matrix switch
fn benchmark_correlation_by_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_columns");
    group.sample_size(30);

    let n_rows = 5_000;
    let column_counts = [8, 14, 25, 50, 100];

    for n_cols in column_counts {
        let ds = generate_test_dataset(n_rows, n_cols, 42);

        group.throughput(Throughput::Elements(((n_cols * (n_cols + 1)) / 2) as u64));

        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            group.bench_with_input(
                BenchmarkId::new(method.to_string().to_lowercase(), n_cols),
                &ds,
                |b, ds| {
                    b.iter(|| {
                        let _ = compute_correlation(black_box(ds), black_box("SalePrice"), method);
                    });
                },
            );
        }
    }

    group.finish();
}

/// Both methods for varying row counts
fn benchmark_correlation_by_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_by_rows");
    group.sample_size(20);

    let n_cols = 40;
    let row_counts = [1_000, 5_000, 20_000, 100_000];

    for n_rows in row_counts {
        let ds = generate_test_dataset(n_rows, n_cols, 42);

        group.throughput(Throughput::Elements(n_rows as u64));

        for method in [CorrelationMethod::Pearson, CorrelationMethod::Spearman] {
            group.bench_with_input(
                BenchmarkId::new(method.to_string().to_lowercase(), n_rows),
                &ds,
                |b, ds| {
                    b.iter(|| {
                        let _ = compute_correlation(black_box(ds), black_box("SalePrice"), method);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_correlation_by_columns,
    benchmark_correlation_by_rows
);
criterion_main!(benches);
