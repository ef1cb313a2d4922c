//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! A point with at least `min_pts` points (itself included) within `epsilon`
//! is a core point. Clusters are the connected components of core points,
//! plus border points reachable from them; everything else is noise.
//!
//! DBSCAN labels the rows it was trained on and has no model to query
//! afterwards, so it is the index-producing kind of [`SpatialClusterer`].
//! Behind a spectral embedding, `epsilon` is a distance between unit vectors
//! and therefore lies in `(0, 2]`.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use super::traits::{Clustering, SpatialClusterer, SpatialClusters};
use super::util::{check_dims, squared_euclidean};
use crate::error::{Error, Result};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification.
    min_pts: usize,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points (including the point itself) to form a dense region.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    fn check(&self, data: &[Vec<f64>]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be positive",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidParameter {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        check_dims(data)?;
        Ok(())
    }

    /// Neighbors of every point within epsilon (excluding the point itself).
    fn neighborhoods(&self, data: &[Vec<f64>]) -> Vec<Vec<usize>> {
        let eps_sq = self.epsilon * self.epsilon;
        let n = data.len();
        let mut out = vec![Vec::new(); n];
        for i in 0..n {
            for j in (i + 1)..n {
                if squared_euclidean(&data[i], &data[j]) <= eps_sq {
                    out[i].push(j);
                    out[j].push(i);
                }
            }
        }
        out
    }

    /// Cluster ids in order of discovery, `None` for noise.
    fn label(&self, data: &[Vec<f64>]) -> Result<(Vec<Option<usize>>, usize)> {
        self.check(data)?;
        let neighbors = self.neighborhoods(data);
        let is_core = |i: usize| neighbors[i].len() + 1 >= self.min_pts;

        let n = data.len();
        let mut labels: Vec<Option<usize>> = vec![None; n];
        let mut n_clusters = 0;

        for seed in 0..n {
            if labels[seed].is_some() || !is_core(seed) {
                continue;
            }
            let id = n_clusters;
            n_clusters += 1;
            labels[seed] = Some(id);

            // Noise is never final until every core point has expanded, so a
            // border point reached later is still claimed here.
            let mut frontier = vec![seed];
            while let Some(p) = frontier.pop() {
                for &q in &neighbors[p] {
                    if labels[q].is_some() {
                        continue;
                    }
                    labels[q] = Some(id);
                    if is_core(q) {
                        frontier.push(q);
                    }
                }
            }
        }

        Ok((labels, n_clusters))
    }

    /// Fit and predict, returning labels where noise is marked as `None`.
    pub fn fit_predict_with_noise(&self, data: &[Vec<f64>]) -> Result<Vec<Option<usize>>> {
        Ok(self.label(data)?.0)
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    /// Noise points are gathered into one extra cluster after the real ones,
    /// so the labels form a partition.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        let (labels, n_clusters) = self.label(data)?;
        Ok(labels
            .into_iter()
            .map(|l| l.unwrap_or(n_clusters))
            .collect())
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

impl SpatialClusterer for Dbscan {
    fn cluster(&self, data: &[Vec<f64>]) -> Result<SpatialClusters> {
        Ok(SpatialClusters::Indexed(self.fit_predict(data)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit vectors bunched around two orthogonal directions, like a
    /// two-block spectral embedding.
    fn two_directions() -> Vec<Vec<f64>> {
        let mut data = Vec::new();
        for t in [0.0f64, 0.05, -0.05, 0.02] {
            data.push(vec![t.cos(), t.sin()]);
        }
        for t in [0.0f64, 0.05, -0.05, 0.02] {
            data.push(vec![-t.sin(), t.cos()]);
        }
        data
    }

    #[test]
    fn separates_embedding_directions() {
        let labels = Dbscan::new(0.3, 3).fit_predict(&two_directions()).unwrap();
        assert!(labels[..4].iter().all(|&l| l == labels[0]));
        assert!(labels[4..].iter().all(|&l| l == labels[4]));
        assert_ne!(labels[0], labels[4]);
        // Clusters are numbered in discovery order.
        assert_eq!(labels[0], 0);
        assert_eq!(labels[4], 1);
    }

    #[test]
    fn outlier_is_noise() {
        let mut data = two_directions();
        data.push(vec![-1.0, 0.0]);
        let dbscan = Dbscan::new(0.3, 3);

        let with_noise = dbscan.fit_predict_with_noise(&data).unwrap();
        assert!(with_noise[8].is_none());
        assert!(with_noise[..8].iter().all(Option::is_some));

        // In the partition form, noise becomes the cluster after the real ones.
        let labels = dbscan.fit_predict(&data).unwrap();
        assert_eq!(labels[8], 2);
    }

    #[test]
    fn border_point_reached_after_being_visited() {
        // Point 0 is visited first and is not core; point 1 is core and
        // reaches it.
        let data = vec![vec![0.0], vec![0.9], vec![1.5], vec![1.8]];
        let labels = Dbscan::new(1.0, 3).fit_predict_with_noise(&data).unwrap();
        assert!(labels.iter().all(|l| *l == Some(0)), "{labels:?}");
    }

    #[test]
    fn all_noise_when_sparse() {
        let data = vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![0.0, 10.0]];
        let labels = Dbscan::new(0.5, 2).fit_predict_with_noise(&data).unwrap();
        assert!(labels.iter().all(Option::is_none));
        // Everything lands in the single noise cluster.
        assert_eq!(Dbscan::new(0.5, 2).fit_predict(&data).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn rejects_bad_input() {
        let data = vec![vec![0.0, 0.0]];
        assert!(Dbscan::new(0.0, 3).fit_predict(&data).is_err());
        assert!(Dbscan::new(-1.0, 3).fit_predict(&data).is_err());
        assert!(Dbscan::new(0.5, 0).fit_predict(&data).is_err());
        assert!(Dbscan::new(0.5, 2).fit_predict(&[]).is_err());
        assert!(Dbscan::new(0.5, 2)
            .fit_predict(&[vec![0.0], vec![0.0, 1.0]])
            .is_err());
    }

    #[test]
    fn spatial_output_is_indexed() {
        let clusters = Dbscan::new(0.3, 3).cluster(&two_directions()).unwrap();
        match clusters {
            SpatialClusters::Indexed(labels) => assert_eq!(labels.len(), 8),
            other => panic!("expected indexed clusters, got {other:?}"),
        }
        assert_eq!(Dbscan::default().cluster_count_hint(), None);
    }
}
