//! Benchmarks for k-d tree construction and queries

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spatialstats_algorithms::index::{KdTree, Point};

fn scattered(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Point::new((t * 12.9898).sin() * 1000.0, (t * 78.233).cos() * 1000.0)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("kdtree_build");

    for n in [1_000, 10_000, 100_000].iter() {
        let points = scattered(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| KdTree::build(black_box(&points)))
        });
    }

    group.finish();
}

fn bench_knn(c: &mut Criterion) {
    let mut group = c.benchmark_group("kdtree_knn");
    let points = scattered(100_000);
    let tree = KdTree::build(&points);

    for k in [1, 8, 32].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(k), k, |b, &k| {
            b.iter(|| {
                for q in points.iter().step_by(100) {
                    black_box(tree.knn(*q, k));
                }
            })
        });
    }

    group.finish();
}

fn bench_radius(c: &mut Criterion) {
    let mut group = c.benchmark_group("kdtree_radius");
    let points = scattered(100_000);
    let tree = KdTree::build(&points);

    for r in [5.0, 20.0, 50.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(r), r, |b, &r| {
            b.iter(|| {
                for q in points.iter().step_by(100) {
                    black_box(tree.radius_search(*q, r));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_knn, bench_radius);
criterion_main!(benches);
