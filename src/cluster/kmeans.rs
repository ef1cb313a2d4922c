//! K-means: k-means++ seeding followed by Lloyd iterations.
//!
//! The fitted model is a set of centroids, so k-means is the model-producing
//! kind of [`SpatialClusterer`]: points are labeled by nearest centroid, and
//! any new point can be labeled the same way through [`HardAssigner`].
//!
//! ## References
//!
//! Arthur, Vassilvitskii (2007). "k-means++: The Advantages of Careful Seeding." SODA.

use super::traits::{Clustering, HardAssigner, SpatialClusterer, SpatialClusters};
use super::util::{check_dims, nearest, squared_euclidean};
use crate::error::{Error, Result};
use rand::prelude::*;

/// K-means clustering configuration.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    max_iter: usize,
    tol: f64,
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a k-means clusterer for `k` clusters.
    ///
    /// Defaults: `max_iter = 300`, `tol = 1e-9`, unseeded.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            tol: 1e-9,
            seed: None,
        }
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Stop once no centroid moves more than `tol` (Euclidean).
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Seed the k-means++ initialization for reproducible results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit centroids to `data`.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let n = data.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        let d = check_dims(data)?;

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let mut centroids = seed_plus_plus(data, self.k, rng.as_mut());
        let mut labels = vec![0usize; n];
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            let mut changed = iter == 0;
            for (label, point) in labels.iter_mut().zip(data) {
                let (c, _) = nearest(point, &centroids);
                if *label != c {
                    *label = c;
                    changed = true;
                }
            }

            let mut sums = vec![vec![0.0; d]; self.k];
            let mut counts = vec![0usize; self.k];
            for (&label, point) in labels.iter().zip(data) {
                counts[label] += 1;
                for (s, x) in sums[label].iter_mut().zip(point) {
                    *s += x;
                }
            }

            let mut max_shift = 0.0f64;
            for ((centroid, sum), &count) in centroids.iter_mut().zip(sums).zip(&counts) {
                // An empty cluster keeps its previous centroid.
                if count == 0 {
                    continue;
                }
                let updated: Vec<f64> = sum.into_iter().map(|s| s / count as f64).collect();
                max_shift = max_shift.max(squared_euclidean(centroid, &updated).sqrt());
                *centroid = updated;
            }

            if !changed || max_shift <= self.tol {
                break;
            }
        }

        // Final labels against the final centroids.
        let mut inertia = 0.0;
        for (label, point) in labels.iter_mut().zip(data) {
            let (c, dist) = nearest(point, &centroids);
            *label = c;
            inertia += dist;
        }

        Ok(KmeansFit {
            centroids,
            labels,
            iterations,
            inertia,
        })
    }
}

/// k-means++: first centroid uniformly, the rest proportional to squared
/// distance from the nearest centroid chosen so far.
fn seed_plus_plus(data: &[Vec<f64>], k: usize, rng: &mut dyn RngCore) -> Vec<Vec<f64>> {
    let n = data.len();
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(data[rng.random_range(0..n)].clone());

    let mut dist: Vec<f64> = data
        .iter()
        .map(|p| squared_euclidean(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = dist.iter().sum();
        let next = if total > 0.0 {
            let threshold = rng.random::<f64>() * total;
            let mut cumsum = 0.0;
            let mut chosen = None;
            for (i, &di) in dist.iter().enumerate() {
                if di <= 0.0 {
                    continue;
                }
                cumsum += di;
                chosen = Some(i);
                if cumsum >= threshold {
                    break;
                }
            }
            chosen.unwrap_or(0)
        } else {
            // Every point coincides with a centroid already.
            rng.random_range(0..n)
        };

        let c = data[next].clone();
        for (di, p) in dist.iter_mut().zip(data) {
            *di = di.min(squared_euclidean(p, &c));
        }
        centroids.push(c);
    }
    centroids
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(8)
    }
}

/// A fitted k-means model.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    centroids: Vec<Vec<f64>>,
    labels: Vec<usize>,
    iterations: usize,
    inertia: f64,
}

impl KmeansFit {
    /// Cluster centers.
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Labels of the training points.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Lloyd iterations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Sum of squared distances from each training point to its centroid.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Label new points by nearest centroid.
    pub fn predict(&self, data: &[Vec<f64>]) -> Vec<usize> {
        self.hard_assign_all(data)
    }
}

impl HardAssigner for KmeansFit {
    fn hard_assign(&self, point: &[f64]) -> usize {
        nearest(point, &self.centroids).0
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

impl SpatialClusterer for Kmeans {
    fn cluster(&self, data: &[Vec<f64>]) -> Result<SpatialClusters> {
        Ok(SpatialClusters::Model(Box::new(self.fit(data)?)))
    }

    fn cluster_count_hint(&self) -> Option<usize> {
        Some(self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.2],
            vec![0.2, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 4.9],
            vec![4.9, 5.1],
        ]
    }

    #[test]
    fn separates_two_blobs() {
        let labels = Kmeans::new(2).with_seed(7).fit_predict(&blobs()).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn seeded_fit_is_reproducible() {
        let a = Kmeans::new(3).with_seed(42).fit(&blobs()).unwrap();
        let b = Kmeans::new(3).with_seed(42).fit(&blobs()).unwrap();
        assert_eq!(a.labels(), b.labels());
        assert_eq!(a.centroids(), b.centroids());
    }

    #[test]
    fn model_assigns_new_points() {
        let fit = Kmeans::new(2).with_seed(1).fit(&blobs()).unwrap();
        let near_origin = fit.hard_assign(&[0.05, 0.05]);
        let far = fit.hard_assign(&[5.05, 5.0]);
        assert_eq!(near_origin, fit.labels()[0]);
        assert_eq!(far, fit.labels()[3]);
        assert_eq!(fit.predict(&blobs()), fit.labels());
        assert!(fit.inertia() < 0.2);
        assert!(fit.iterations() >= 1);
    }

    #[test]
    fn identical_points_share_a_cluster() {
        let data = vec![vec![1.0, 1.0]; 5];
        let labels = Kmeans::new(2).with_seed(3).fit_predict(&data).unwrap();
        assert!(labels.iter().all(|&l| l == labels[0]));
    }

    #[test]
    fn rejects_bad_parameters() {
        let data = blobs();
        assert!(matches!(
            Kmeans::new(0).fit(&data),
            Err(Error::InvalidParameter { name: "k", .. })
        ));
        assert!(matches!(
            Kmeans::new(7).fit(&data),
            Err(Error::InvalidClusterCount {
                requested: 7,
                n_items: 6
            })
        ));
        assert!(matches!(Kmeans::new(1).fit(&[]), Err(Error::EmptyInput)));
        assert!(Kmeans::new(1)
            .fit(&[vec![0.0, 1.0], vec![1.0]])
            .is_err());
        assert!(Kmeans::new(1).with_max_iter(0).fit(&data).is_err());
    }

    #[test]
    fn spatial_output_is_a_model() {
        let clusters = Kmeans::new(2).with_seed(5).cluster(&blobs()).unwrap();
        assert!(matches!(clusters, SpatialClusters::Model(_)));
        assert_eq!(Kmeans::new(4).cluster_count_hint(), Some(4));
    }
}
