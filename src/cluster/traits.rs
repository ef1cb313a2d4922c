use crate::error::Result;

/// Common interface for hard clustering algorithms (one label per point).
pub trait Clustering {
    /// Fit the model (if needed) and return one cluster label per input point.
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters dynamically (e.g. DBSCAN),
    /// this returns 0.
    fn n_clusters(&self) -> usize;
}

/// A fitted spatial model that maps any point to one cluster.
pub trait HardAssigner: std::fmt::Debug + Send + Sync {
    /// Cluster index for `point`.
    fn hard_assign(&self, point: &[f64]) -> usize;

    /// Cluster index for every row of `data`.
    fn hard_assign_all(&self, data: &[Vec<f64>]) -> Vec<usize> {
        data.iter().map(|p| self.hard_assign(p)).collect()
    }
}

/// What a [`SpatialClusterer`] hands back after training on some rows.
#[derive(Debug)]
pub enum SpatialClusters {
    /// Membership of each training row, in row order.
    Indexed(Vec<usize>),
    /// A geometric model; training rows must be assigned through it.
    Model(Box<dyn HardAssigner>),
}

/// Clusterer that can sit behind the spectral embedding.
pub trait SpatialClusterer: std::fmt::Debug + Send + Sync {
    /// Train on `data` (one row per item).
    fn cluster(&self, data: &[Vec<f64>]) -> Result<SpatialClusters>;

    /// Number of clusters this clusterer is configured for, if fixed.
    fn cluster_count_hint(&self) -> Option<usize> {
        None
    }
}
