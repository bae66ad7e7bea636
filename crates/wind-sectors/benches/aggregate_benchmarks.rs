//! Benchmarks for wind-sector aggregation.
//!
//! Run with: cargo bench --package wind-sectors --bench aggregate_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array2, Array3};
use rand::Rng;
use wind_common::{GriddedTimeSeries, SectorSpec, Statistic, WIND_SPEED_FIELD};
use wind_sectors::{aggregate, count_wind_days, nan_percentile, AggregateRequest, CountRequest};

/// Random winds and temperatures on a `rows x cols` grid.
fn generate_series(n_times: usize, rows: usize, cols: usize) -> GriddedTimeSeries {
    let mut rng = rand::thread_rng();
    let shape = (n_times, rows, cols);
    let u = Array3::from_shape_simple_fn(shape, || rng.gen_range(-15.0f32..15.0));
    let v = Array3::from_shape_simple_fn(shape, || rng.gen_range(-15.0f32..15.0));
    let t2 = Array3::from_shape_simple_fn(shape, || rng.gen_range(270.0f32..310.0));

    GriddedTimeSeries::new(u, v, Array2::zeros((rows, cols)), Array2::zeros((rows, cols)))
        .and_then(|s| s.with_field("T2", t2))
        .expect("valid benchmark series")
}

// =============================================================================
// AGGREGATION BENCHMARKS
// =============================================================================

fn bench_aggregate_mean(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_mean");
    group.sample_size(20);

    for &size in &[16usize, 64, 128] {
        let n_times = 365;
        let series = generate_series(n_times, size, size);
        let request = AggregateRequest::new(SectorSpec::quadrants());
        group.throughput(Throughput::Elements((n_times * size * size) as u64));
        group.bench_with_input(BenchmarkId::new("quadrants", size), &series, |b, series| {
            b.iter(|| aggregate(black_box(series), &request).unwrap())
        });
    }

    group.finish();
}

fn bench_aggregate_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_options");
    group.sample_size(20);
    let series = generate_series(365, 64, 64);

    let cases = [
        ("median", AggregateRequest::default().statistic(Statistic::median())),
        ("min_speed", AggregateRequest::default().min_speed(2.0)),
        ("heatwave", AggregateRequest::default().heatwave_filter(true)),
        ("wind_speed", AggregateRequest::default().field(WIND_SPEED_FIELD)),
    ];
    for (name, request) in cases {
        group.bench_function(name, |b| b.iter(|| aggregate(black_box(&series), &request).unwrap()));
    }

    group.finish();
}

fn bench_count(c: &mut Criterion) {
    let series = generate_series(365, 64, 64);
    let request = CountRequest::default();
    c.bench_function("count_wind_days_64", |b| {
        b.iter(|| count_wind_days(black_box(&series), &request).unwrap())
    });
}

// =============================================================================
// REDUCTION BENCHMARKS
// =============================================================================

fn bench_percentile(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let samples: Vec<f64> = (0..3650).map(|_| rng.gen_range(270.0..310.0)).collect();
    c.bench_function("nan_percentile_3650", |b| {
        b.iter(|| nan_percentile(black_box(&samples), 95.0))
    });
}

criterion_group!(
    benches,
    bench_aggregate_mean,
    bench_aggregate_options,
    bench_count,
    bench_percentile
);
criterion_main!(benches);
