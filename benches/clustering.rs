use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use spectral_clump::cluster::{Clustering, Kmeans};
use spectral_clump::spectral::{FixedK, LaplacianKind, SimilarityMatrix, SpectralClustering};

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    // Generate synthetic data
    let mut rng = StdRng::seed_from_u64(42);
    let n = 1000;
    let d = 16;
    let k = 10;

    let data: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f64>()).collect())
        .collect();

    group.bench_function("fit_predict_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(k).with_max_iter(10).with_seed(42);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn bench_spectral(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral");

    // Four noisy blobs in the plane, turned into a sparse Gaussian graph.
    let mut rng = StdRng::seed_from_u64(7);
    let centers = [(0.0, 0.0), (6.0, 0.0), (0.0, 6.0), (6.0, 6.0)];
    let points: Vec<Vec<f64>> = (0..120)
        .map(|i| {
            let (cx, cy) = centers[i % centers.len()];
            vec![cx + rng.random::<f64>() - 0.5, cy + rng.random::<f64>() - 0.5]
        })
        .collect();
    let similarity = SimilarityMatrix::gaussian(&points, 1.0, 1e-4).unwrap();

    for kind in [LaplacianKind::Unnormalized, LaplacianKind::SymmetricNormalized] {
        let sc = SpectralClustering::new(Kmeans::new(4).with_seed(42))
            .with_laplacian(kind)
            .with_selection(FixedK::new(4));
        group.bench_function(format!("cluster_n120_{kind:?}"), |b| {
            b.iter(|| sc.cluster(black_box(&similarity)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_spectral);
criterion_main!(benches);
