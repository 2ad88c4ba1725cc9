//! Criterion benchmarks for senscraft_core scenario engines
//!
//! Run with: cargo bench -p senscraft_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ndarray::{Array2, array};
use senscraft_core::alternative::{CandidateValues, discrete_modification};
use senscraft_core::compromise::{HqOptions, hq_compromise};
use senscraft_core::criteria::weights_grid;
use senscraft_core::model::{IndexSpec, Indexes};

fn create_matrix(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| ((i * 7 + j * 3) % 11) as f64 + 1.0)
}

fn bench_discrete_modification(c: &mut Criterion) {
    let matrix = create_matrix(20, 6);
    let values = CandidateValues::PerColumn(vec![vec![1.0, 2.5, 4.0, 8.0]; 6]);
    let groups = Indexes::from(vec![
        IndexSpec::Group(vec![0, 1, 2]),
        IndexSpec::Group(vec![3, 4, 5]),
    ]);

    c.bench_function("discrete_all_single", |b| {
        b.iter(|| discrete_modification(black_box(&matrix), black_box(&values), &Indexes::All))
    });
    c.bench_function("discrete_grouped", |b| {
        b.iter(|| discrete_modification(black_box(&matrix), black_box(&values), &groups))
    });
}

fn bench_weights_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("weights_grid");

    for criteria in [3, 5, 7].iter() {
        group.bench_with_input(
            BenchmarkId::new("criteria", criteria),
            criteria,
            |b, &n| b.iter(|| weights_grid(black_box(n), black_box(0.05), 3)),
        );
    }

    group.finish();
}

fn bench_hq_compromise(c: &mut Criterion) {
    let rankings = array![
        [2.0, 2.0, 2.0],
        [3.0, 4.0, 5.0],
        [1.0, 1.0, 4.0],
        [4.0, 3.0, 1.0],
        [7.0, 5.0, 7.0],
        [8.0, 8.0, 8.0],
        [5.0, 6.0, 3.0],
        [6.0, 7.0, 6.0]
    ];
    let options = HqOptions::default();

    c.bench_function("hq_compromise_8x3", |b| {
        b.iter(|| hq_compromise(black_box(&rankings), black_box(&options)))
    });
}

criterion_group!(
    benches,
    bench_discrete_modification,
    bench_weights_grid,
    bench_hq_compromise
);
criterion_main!(benches);
