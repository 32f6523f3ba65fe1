use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use setlist::cluster::{Clustering, Dbscan, Kmeans};
use setlist::sweep::ElbowSweep;

fn random_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.random::<f64>() * 10.0).collect())
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let data = random_points(1000, 3, 42);
    c.bench_function("kmeans_1000x3_k8", |b| {
        b.iter(|| {
            let model = Kmeans::new(8).with_seed(42);
            black_box(model.fit_predict(black_box(&data)).unwrap())
        })
    });
}

fn bench_dbscan(c: &mut Criterion) {
    let data = random_points(500, 3, 42);
    c.bench_function("dbscan_500x3", |b| {
        b.iter(|| {
            let model = Dbscan::new(0.5, 5);
            black_box(model.fit(black_box(&data)).unwrap())
        })
    });
}

fn bench_elbow_sweep(c: &mut Criterion) {
    let data = random_points(300, 3, 42);
    c.bench_function("elbow_sweep_300x3_k2_10", |b| {
        b.iter(|| {
            let sweep = ElbowSweep::new(2, 10).with_seed(42);
            black_box(sweep.run(black_box(&data)).unwrap())
        })
    });
}

criterion_group!(benches, bench_kmeans, bench_dbscan, bench_elbow_sweep);
criterion_main!(benches);
