//! Turning clusterer output into one assignment per item.

use crate::cluster::{SpatialClusterer, SpatialClusters};
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Cluster id per item. Ids are contiguous from 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    n_clusters: usize,
}

impl ClusterAssignment {
    /// Relabel arbitrary ids so they are contiguous, numbered by first
    /// appearance.
    pub fn from_labels(labels: &[usize]) -> Self {
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let labels: Vec<usize> = labels
            .iter()
            .map(|&l| {
                let next = remap.len();
                *remap.entry(l).or_insert(next)
            })
            .collect();
        Self {
            n_clusters: remap.len(),
            labels,
        }
    }

    /// Cluster id of every item.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Cluster id of item `i`.
    pub fn get(&self, i: usize) -> Option<usize> {
        self.labels.get(i).copied()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no items were assigned.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct clusters.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Members of each cluster, indexed by cluster id, in item order.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_clusters];
        for (i, &l) in self.labels.iter().enumerate() {
            out[l].push(i);
        }
        out
    }

    /// Take the label vector.
    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }
}

/// Cluster the embedding rows and collect one label per row.
///
/// Index-producing clusterers report membership directly; model-producing
/// ones are queried row by row.
pub fn assign(rows: &[Vec<f64>], clusterer: &dyn SpatialClusterer) -> Result<ClusterAssignment> {
    let labels = match clusterer.cluster(rows)? {
        SpatialClusters::Indexed(labels) => {
            if labels.len() != rows.len() {
                return Err(Error::DimensionMismatch {
                    expected: rows.len(),
                    found: labels.len(),
                });
            }
            labels
        }
        SpatialClusters::Model(model) => model.hard_assign_all(rows),
    };
    Ok(ClusterAssignment::from_labels(&labels))
}
