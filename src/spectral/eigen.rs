//! Eigenpairs and the eigensolver seam.
//!
//! The pipeline only needs "some eigenpairs of this Laplacian, in whatever
//! order the solver likes"; ordering and selection happen afterwards (see
//! [`super::selection`]). [`JacobiSolver`] is the bundled implementation. It is
//! dense (O(n²) memory, O(n³) per sweep), which suits the graph sizes spectral
//! clustering is usually run on; larger problems should plug in an iterative
//! solver through [`Eigensolver`].

use super::laplacian::Laplacian;
use super::selection::sorted_order;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Which end of the spectrum carries cluster structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Ascending eigenvalues.
    Smallest,
    /// Descending eigenvalues.
    Largest,
}

/// One eigenvalue with a borrowed view of its eigenvector.
#[derive(Clone, Copy, Debug)]
pub struct EigenPair<'a> {
    /// Eigenvalue (real part).
    pub value: f64,
    /// Eigenvector, one entry per item.
    pub vector: &'a [f64],
}

/// Eigenpairs in solver-native order.
#[derive(Clone, Debug, Default)]
pub struct Eigenpairs {
    values: Vec<f64>,
    vectors: Vec<Vec<f64>>,
}

impl Eigenpairs {
    /// Wrap solver output. `values[i]` belongs to `vectors[i]`.
    pub fn new(values: Vec<f64>, vectors: Vec<Vec<f64>>) -> Result<Self> {
        if values.len() != vectors.len() {
            return Err(Error::DimensionMismatch {
                expected: values.len(),
                found: vectors.len(),
            });
        }
        if let Some(first) = vectors.first() {
            if let Some(bad) = vectors.iter().find(|v| v.len() != first.len()) {
                return Err(Error::DimensionMismatch {
                    expected: first.len(),
                    found: bad.len(),
                });
            }
        }
        Ok(Self { values, vectors })
    }

    /// Number of eigenpairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the solver returned nothing.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Eigenvalues in solver order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Length of each eigenvector.
    pub fn vector_len(&self) -> usize {
        self.vectors.first().map_or(0, Vec::len)
    }

    /// Pairs in solver order.
    pub fn iter(&self) -> impl Iterator<Item = EigenPair<'_>> + '_ {
        self.values
            .iter()
            .zip(&self.vectors)
            .map(|(&value, vector)| EigenPair { value, vector })
    }

    /// Pairs sorted along `direction`, ties kept in solver order.
    ///
    /// Only the index permutation is computed up front; eigenvectors are
    /// borrowed as the iterator advances, so `take(k)` touches k of them.
    pub fn iter_sorted(&self, direction: Direction) -> impl Iterator<Item = EigenPair<'_>> + '_ {
        sorted_order(&self.values, direction)
            .into_iter()
            .map(move |i| EigenPair {
                value: self.values[i],
                vector: &self.vectors[i],
            })
    }
}

/// Computes eigenpairs of a Laplacian.
pub trait Eigensolver: std::fmt::Debug + Send + Sync {
    /// Return at least `count` eigenpairs of `laplacian`, favoring the
    /// `direction` end of the spectrum, in any order.
    ///
    /// Returning fewer than `count` pairs is allowed; the caller treats it as a
    /// numerical failure.
    fn solve(&self, laplacian: &Laplacian, direction: Direction, count: usize) -> Result<Eigenpairs>;
}

/// Cyclic Jacobi rotations on the dense symmetric form of the Laplacian.
///
/// Returns the full spectrum in diagonal order (unsorted).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JacobiSolver {
    /// Maximum number of full sweeps over the upper triangle.
    pub max_sweeps: usize,
    /// Convergence threshold on the off-diagonal Frobenius norm, relative to
    /// the matrix norm.
    pub tolerance: f64,
}

impl Default for JacobiSolver {
    fn default() -> Self {
        Self {
            max_sweeps: 100,
            tolerance: 1e-12,
        }
    }
}

impl JacobiSolver {
    /// Create a solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep limit.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Set the relative convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

fn off_diagonal_norm(a: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    for (i, row) in a.iter().enumerate() {
        for &x in &row[i + 1..] {
            sum += x * x;
        }
    }
    (2.0 * sum).sqrt()
}

fn rotate(a: &mut [Vec<f64>], v: &mut [Vec<f64>], p: usize, q: usize) {
    let apq = a[p][q];
    let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
    let t = if theta.abs() > 1e150 {
        0.5 / theta
    } else {
        let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
        sign / (theta.abs() + (theta * theta + 1.0).sqrt())
    };
    let c = 1.0 / (t * t + 1.0).sqrt();
    let s = t * c;

    let n = a.len();
    for k in 0..n {
        let akp = a[k][p];
        let akq = a[k][q];
        a[k][p] = c * akp - s * akq;
        a[k][q] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[p][k];
        let aqk = a[q][k];
        a[p][k] = c * apk - s * aqk;
        a[q][k] = s * apk + c * aqk;
    }
    a[p][q] = 0.0;
    a[q][p] = 0.0;
    for row in v.iter_mut() {
        let vkp = row[p];
        let vkq = row[q];
        row[p] = c * vkp - s * vkq;
        row[q] = s * vkp + c * vkq;
    }
}

impl Eigensolver for JacobiSolver {
    fn solve(&self, laplacian: &Laplacian, _direction: Direction, count: usize) -> Result<Eigenpairs> {
        let n = laplacian.dim();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.max_sweeps == 0 {
            return Err(Error::InvalidParameter {
                name: "max_sweeps",
                message: "must be at least 1",
            });
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be finite and non-negative",
            });
        }

        let form = laplacian.symmetric_form();
        let mut a = form.matrix.to_dense();
        let scale = a
            .iter()
            .flatten()
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt()
            .max(f64::MIN_POSITIVE);
        if let Some((row, col)) = form.matrix.first_asymmetry(1e-9 * scale) {
            return Err(Error::NotSymmetric { row, col });
        }

        let mut v: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let mut row = vec![0.0; n];
                row[i] = 1.0;
                row
            })
            .collect();

        let target = self.tolerance * scale;
        let mut converged = off_diagonal_norm(&a) <= target;
        let mut sweeps = 0;
        while !converged && sweeps < self.max_sweeps {
            for p in 0..n {
                for q in (p + 1)..n {
                    if a[p][q] != 0.0 {
                        rotate(&mut a, &mut v, p, q);
                    }
                }
            }
            sweeps += 1;
            let off = off_diagonal_norm(&a);
            trace!(sweep = sweeps, off_diagonal = off, "jacobi sweep");
            converged = off <= target;
        }

        if !converged {
            return Err(Error::NumericalFailure {
                reason: format!(
                    "Jacobi rotations did not converge after {} sweeps (off-diagonal norm {:.3e})",
                    self.max_sweeps,
                    off_diagonal_norm(&a)
                ),
                requested: count,
                dimension: n,
                laplacian: laplacian.kind(),
            });
        }
        debug!(n, sweeps, "jacobi converged");

        let values: Vec<f64> = (0..n).map(|i| a[i][i]).collect();
        let vectors: Vec<Vec<f64>> = (0..n)
            .map(|col| {
                let mut vector: Vec<f64> = v.iter().map(|row| row[col]).collect();
                if let Some(back) = &form.back_scale {
                    for (x, s) in vector.iter_mut().zip(back) {
                        *x *= s;
                    }
                    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
                    if norm > 0.0 {
                        vector.iter_mut().for_each(|x| *x /= norm);
                    }
                }
                vector
            })
            .collect();

        Eigenpairs::new(values, vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::{LaplacianKind, SimilarityMatrix};

    fn residual(l: &Laplacian, value: f64, vector: &[f64]) -> f64 {
        let lv = l.matrix().mul_vec(vector);
        lv.iter()
            .zip(vector)
            .map(|(a, b)| (a - value * b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    fn two_triangles() -> SimilarityMatrix {
        let mut t = Vec::new();
        for block in [[0, 1, 2], [3, 4, 5]] {
            for &i in &block {
                for &j in &block {
                    if i != j {
                        t.push((i, j, 1.0));
                    }
                }
            }
        }
        SimilarityMatrix::from_triplets(6, 6, t).unwrap()
    }

    #[test]
    fn jacobi_solves_unnormalized_laplacian() {
        let l = LaplacianKind::Unnormalized.build(&two_triangles()).unwrap();
        let pairs = JacobiSolver::new().solve(&l, Direction::Smallest, 2).unwrap();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs.vector_len(), 6);
        for pair in pairs.iter() {
            assert!(residual(&l, pair.value, pair.vector) < 1e-8);
        }
        let sorted: Vec<f64> = pairs.iter_sorted(Direction::Smallest).map(|p| p.value).collect();
        let expected = [0.0, 0.0, 3.0, 3.0, 3.0, 3.0];
        for (got, want) in sorted.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{sorted:?}");
        }
    }

    #[test]
    fn random_walk_eigenvectors_are_mapped_back() {
        let w = SimilarityMatrix::from_triplets(
            3,
            3,
            vec![(0, 1, 1.0), (1, 0, 1.0), (1, 2, 2.0), (2, 1, 2.0), (0, 2, 0.5), (2, 0, 0.5)],
        )
        .unwrap();
        let l = LaplacianKind::RandomWalk.build(&w).unwrap();
        let pairs = JacobiSolver::new().solve(&l, Direction::Smallest, 3).unwrap();
        for pair in pairs.iter() {
            assert!(residual(&l, pair.value, pair.vector) < 1e-8);
        }
        // The constant vector has eigenvalue zero for I - D^-1 W.
        let first = pairs.iter_sorted(Direction::Smallest).next().unwrap();
        assert!(first.value.abs() < 1e-10);
        let c = first.vector[0];
        assert!(first.vector.iter().all(|x| (x - c).abs() < 1e-8));
    }

    #[test]
    fn asymmetric_input_is_rejected() {
        let w = SimilarityMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, 2.0)]).unwrap();
        let l = LaplacianKind::Unnormalized.build(&w).unwrap();
        let err = JacobiSolver::new().solve(&l, Direction::Smallest, 1).unwrap_err();
        assert!(matches!(err, Error::NotSymmetric { .. }));
    }

    /// Path 0-1-2-3-4-5 with distinct edge weights.
    fn weighted_path() -> SimilarityMatrix {
        let mut t = Vec::new();
        for (i, w) in [1.0, 2.0, 3.0, 4.0, 5.0].into_iter().enumerate() {
            t.push((i, i + 1, w));
            t.push((i + 1, i, w));
        }
        SimilarityMatrix::from_triplets(6, 6, t).unwrap()
    }

    #[test]
    fn too_few_sweeps_is_a_numerical_failure() {
        let l = LaplacianKind::Unnormalized.build(&weighted_path()).unwrap();
        let err = JacobiSolver::new()
            .with_max_sweeps(1)
            .with_tolerance(0.0)
            .solve(&l, Direction::Smallest, 2)
            .unwrap_err();
        match err {
            Error::NumericalFailure {
                requested,
                dimension,
                laplacian,
                ..
            } => {
                assert_eq!(requested, 2);
                assert_eq!(dimension, 6);
                assert_eq!(laplacian, LaplacianKind::Unnormalized);
            }
            other => panic!("expected NumericalFailure, got {other:?}"),
        }

        // The same matrix converges given room.
        let pairs = JacobiSolver::new().solve(&l, Direction::Smallest, 2).unwrap();
        for pair in pairs.iter() {
            assert!(residual(&l, pair.value, pair.vector) < 1e-8);
        }
    }

    #[test]
    fn sorted_iteration_is_stable_and_lazy() {
        let pairs = Eigenpairs::new(
            vec![2.0, 1.0, 2.0, 0.5],
            vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]],
        )
        .unwrap();
        let asc: Vec<f64> = pairs
            .iter_sorted(Direction::Smallest)
            .map(|p| p.vector[0])
            .collect();
        assert_eq!(asc, vec![3.0, 1.0, 0.0, 2.0]);
        let desc: Vec<f64> = pairs
            .iter_sorted(Direction::Largest)
            .take(2)
            .map(|p| p.vector[0])
            .collect();
        assert_eq!(desc, vec![0.0, 2.0]);
    }

    #[test]
    fn mismatched_pairs_are_rejected() {
        assert!(Eigenpairs::new(vec![1.0], vec![]).is_err());
        assert!(Eigenpairs::new(vec![1.0, 2.0], vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }
}
