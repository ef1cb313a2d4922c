//! How many eigenvectors to keep, and in which order.

use super::eigen::Direction;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Indices of `values` sorted along `direction`.
///
/// The sort is stable, so equal eigenvalues keep the solver's emission order
/// and repeated runs give the same permutation.
pub fn sorted_order(values: &[f64], direction: Direction) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    match direction {
        Direction::Smallest => order.sort_by(|&a, &b| values[a].total_cmp(&values[b])),
        Direction::Largest => order.sort_by(|&a, &b| values[b].total_cmp(&values[a])),
    }
    order
}

/// Policy deciding how many eigenvectors form the embedding.
///
/// Implementations must return a count in `1..=total_dimension` from
/// [`choose_count`](EigenSelector::choose_count) once
/// [`validate`](EigenSelector::validate) has accepted the dimension.
pub trait EigenSelector: std::fmt::Debug + Send + Sync {
    /// Reject parameters that cannot work for an `total_dimension`-item graph.
    fn validate(&self, total_dimension: usize) -> Result<()>;

    /// How many eigenpairs the solver has to produce for this policy.
    fn eigenpairs_needed(&self, total_dimension: usize) -> usize;

    /// Pick the eigenvector count from eigenvalues in solver order.
    ///
    /// The result must lie in `1..=total_dimension`; the embedding rejects
    /// anything else.
    fn choose_count(&self, eigenvalues: &[f64], direction: Direction, total_dimension: usize) -> usize;
}

/// Always keep `k` eigenvectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedK {
    /// Number of eigenvectors.
    pub k: usize,
}

impl FixedK {
    /// Keep exactly `k` eigenvectors.
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl EigenSelector for FixedK {
    fn validate(&self, total_dimension: usize) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > total_dimension {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: total_dimension,
            });
        }
        Ok(())
    }

    fn eigenpairs_needed(&self, total_dimension: usize) -> usize {
        self.k.min(total_dimension)
    }

    fn choose_count(&self, _eigenvalues: &[f64], _direction: Direction, total_dimension: usize) -> usize {
        self.k.clamp(1, total_dimension.max(1))
    }
}

/// Keep the count that sits before the largest jump in the sorted spectrum.
///
/// With eigenvalues sorted along the Laplacian's direction, candidate `k`
/// scores the gap `|λ(k+1) - λ(k)|`. The largest gap for `k` in
/// `min_k..=max_k` wins; ties go to the smaller `k`, and a flat spectrum yields
/// `min_k`. Gaps are compared against each other only, so the choice does not
/// change when every similarity is scaled by the same factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eigengap {
    /// Smallest admissible count.
    pub min_k: usize,
    /// Largest admissible count.
    pub max_k: usize,
}

impl Eigengap {
    /// Search counts in `min_k..=max_k`.
    pub fn new(min_k: usize, max_k: usize) -> Self {
        Self { min_k, max_k }
    }
}

impl Default for Eigengap {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl EigenSelector for Eigengap {
    fn validate(&self, total_dimension: usize) -> Result<()> {
        if self.min_k == 0 {
            return Err(Error::InvalidParameter {
                name: "min_k",
                message: "must be at least 1",
            });
        }
        if self.max_k < self.min_k {
            return Err(Error::InvalidParameter {
                name: "max_k",
                message: "must be at least min_k",
            });
        }
        if self.min_k > total_dimension {
            return Err(Error::InvalidClusterCount {
                requested: self.min_k,
                n_items: total_dimension,
            });
        }
        Ok(())
    }

    fn eigenpairs_needed(&self, total_dimension: usize) -> usize {
        self.max_k.saturating_add(1).min(total_dimension)
    }

    fn choose_count(&self, eigenvalues: &[f64], direction: Direction, total_dimension: usize) -> usize {
        let floor = self.min_k.clamp(1, total_dimension.max(1));
        let sorted: Vec<f64> = sorted_order(eigenvalues, direction)
            .into_iter()
            .map(|i| eigenvalues[i])
            .collect();

        // Candidate k needs sorted[k] (the (k+1)-th eigenvalue) to measure its gap.
        let hi = self.max_k.min(total_dimension).min(sorted.len().saturating_sub(1));
        if hi < floor {
            return floor;
        }

        let mut best = floor;
        let mut best_gap = 0.0;
        for k in floor..=hi {
            let gap = (sorted[k] - sorted[k - 1]).abs();
            if gap > best_gap {
                best_gap = gap;
                best = k;
            }
        }
        best
    }
}
