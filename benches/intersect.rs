//! Benchmarks for curve evaluation and intersection.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bezium::{evaluate_multi, subdivide_nodes, CurveIntersector};

fn bench_evaluate_multi(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_multi");

    let nodes = vec![0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 4.0, 0.0];

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("batch", count), &count, |b, &count| {
            let params: Vec<f64> = (0..count).map(|i| i as f64 / count as f64).collect();
            b.iter(|| evaluate_multi(2, black_box(&nodes), black_box(&params)))
        });
    }

    group.finish();
}

fn bench_subdivide(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivide_nodes");

    let cubic = vec![0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 4.0, 0.0];
    group.bench_function("cubic", |b| {
        b.iter(|| subdivide_nodes(2, black_box(&cubic)))
    });

    // Degree 9 exercises the Pascal-row path.
    let mut high: Vec<f64> = Vec::new();
    for i in 0..10 {
        high.push(i as f64);
        high.push(((i * i) % 7) as f64);
    }
    group.bench_function("degree_9", |b| b.iter(|| subdivide_nodes(2, black_box(&high))));

    group.finish();
}

fn bench_intersect(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve_intersections");

    let arch = vec![0.0, 0.0, 0.5, 1.0, 1.0, 0.0];
    let line = vec![0.0, 0.25, 1.0, 0.25];
    group.bench_function("quadratic_line", |b| {
        let mut engine = CurveIntersector::new();
        b.iter(|| engine.intersect(black_box(&arch), black_box(&line)).unwrap())
    });

    let first = vec![0.0, 0.0, 2.0, 4.0, 4.0, 0.0];
    let second = vec![0.0, 2.0, 2.0, -2.0, 4.0, 2.0];
    group.bench_function("crossing_quadratics", |b| {
        let mut engine = CurveIntersector::new();
        b.iter(|| engine.intersect(black_box(&first), black_box(&second)).unwrap())
    });

    let lines = (vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 1.0, 1.0, 0.0]);
    group.bench_function("two_lines", |b| {
        let mut engine = CurveIntersector::new();
        b.iter(|| engine.intersect(black_box(&lines.0), black_box(&lines.1)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_multi,
    bench_subdivide,
    bench_intersect
);
criterion_main!(benches);
