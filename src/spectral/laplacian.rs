//! Graph Laplacians.
//!
//! Given a similarity matrix `W` with degree matrix `D = diag(rowsum(W))`:
//!
//! | Variant              | Matrix                    | Signal in |
//! |----------------------|---------------------------|-----------|
//! | `Unnormalized`       | `D - W`                   | smallest  |
//! | `SymmetricNormalized`| `I - D^-1/2 W D^-1/2`     | smallest  |
//! | `RandomWalk`         | `I - D^-1 W`              | smallest  |
//! | `NormalizedAffinity` | `D^-1/2 W D^-1/2`         | largest   |
//!
//! The last one is the complement of the symmetric-normalized Laplacian: the
//! spectra are related by `λ ↦ 1 - λ` and the eigenvectors coincide, so reading
//! its largest eigenvalues recovers the same embedding.
//!
//! Every variant except `Unnormalized` divides by the degree, so a node with
//! zero degree is a [`Error::DegenerateGraph`] and negative weights are
//! rejected.

use super::eigen::Direction;
use super::matrix::{CsrMatrix, SimilarityMatrix};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Which graph Laplacian to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaplacianKind {
    /// `L = D - W`.
    #[default]
    Unnormalized,
    /// `L = I - D^-1/2 W D^-1/2` (Ng, Jordan, Weiss).
    SymmetricNormalized,
    /// `L = I - D^-1 W` (Shi, Malik). Not symmetric in general.
    RandomWalk,
    /// `D^-1/2 W D^-1/2`, read from the largest eigenvalues.
    NormalizedAffinity,
}

impl LaplacianKind {
    /// End of the spectrum where cluster structure lives for this variant.
    pub fn direction(self) -> Direction {
        match self {
            LaplacianKind::Unnormalized
            | LaplacianKind::SymmetricNormalized
            | LaplacianKind::RandomWalk => Direction::Smallest,
            LaplacianKind::NormalizedAffinity => Direction::Largest,
        }
    }

    /// Whether the built matrix is symmetric whenever `W` is.
    pub fn preserves_symmetry(self) -> bool {
        !matches!(self, LaplacianKind::RandomWalk)
    }

    fn needs_degrees(self) -> bool {
        !matches!(self, LaplacianKind::Unnormalized)
    }

    /// Build this Laplacian from a similarity matrix.
    pub fn build(self, similarity: &SimilarityMatrix) -> Result<Laplacian> {
        let w = similarity.as_csr();
        let n = w.dim();
        let degrees = similarity.degrees();

        if self.needs_degrees() {
            if let Some((row, col, value)) = w.triplets().find(|&(_, _, v)| v < 0.0) {
                return Err(Error::InvalidEntry {
                    row,
                    col,
                    value,
                    reason: "negative weight breaks degree normalization",
                });
            }
            if let Some(node) = degrees.iter().position(|&d| d <= 0.0) {
                return Err(Error::DegenerateGraph {
                    node,
                    dimension: n,
                    laplacian: self,
                });
            }
        }

        let inv_sqrt: Vec<f64> = degrees.iter().map(|d| 1.0 / d.sqrt()).collect();

        let mut rows: Vec<Vec<(usize, f64)>> = Vec::with_capacity(n);
        for i in 0..n {
            let diagonal = match self {
                LaplacianKind::Unnormalized => degrees[i],
                LaplacianKind::SymmetricNormalized | LaplacianKind::RandomWalk => 1.0,
                LaplacianKind::NormalizedAffinity => 0.0,
            };

            let mut row: Vec<(usize, f64)> = Vec::with_capacity(w.row(i).count() + 1);
            let mut diagonal_placed = false;
            for (j, wij) in w.row(i) {
                let scaled = match self {
                    LaplacianKind::Unnormalized => -wij,
                    LaplacianKind::SymmetricNormalized => -wij * inv_sqrt[i] * inv_sqrt[j],
                    LaplacianKind::RandomWalk => -wij / degrees[i],
                    LaplacianKind::NormalizedAffinity => wij * inv_sqrt[i] * inv_sqrt[j],
                };
                if !diagonal_placed && j >= i {
                    if j == i {
                        row.push((i, diagonal + scaled));
                        diagonal_placed = true;
                        continue;
                    }
                    row.push((i, diagonal));
                    diagonal_placed = true;
                }
                row.push((j, scaled));
            }
            if !diagonal_placed {
                row.push((i, diagonal));
            }
            rows.push(row);
        }

        Ok(Laplacian {
            kind: self,
            matrix: CsrMatrix::from_rows(rows),
            degrees,
        })
    }
}

/// A Laplacian together with the degrees it was built from.
#[derive(Clone, Debug)]
pub struct Laplacian {
    kind: LaplacianKind,
    matrix: CsrMatrix,
    degrees: Vec<f64>,
}

/// A symmetric matrix with the same spectrum as a [`Laplacian`].
///
/// Eigenvectors of `matrix` are mapped back to eigenvectors of the Laplacian
/// by multiplying entry `i` with `back_scale[i]` (identity when `None`).
#[derive(Clone, Debug)]
pub struct SymmetricForm<'a> {
    /// The symmetric matrix to decompose.
    pub matrix: Cow<'a, CsrMatrix>,
    /// Per-row factor applied to eigenvectors of `matrix`.
    pub back_scale: Option<Vec<f64>>,
}

impl Laplacian {
    /// Variant this Laplacian was built as.
    pub fn kind(&self) -> LaplacianKind {
        self.kind
    }

    /// Spectrum end holding cluster structure.
    pub fn direction(&self) -> Direction {
        self.kind.direction()
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    /// The Laplacian matrix.
    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// Weighted node degrees of the source graph.
    pub fn degrees(&self) -> &[f64] {
        &self.degrees
    }

    /// A symmetric matrix sharing this Laplacian's eigenvalues.
    ///
    /// For the random-walk Laplacian this is `D^1/2 L D^-1/2 = I - D^-1/2 W D^-1/2`,
    /// whose eigenvectors `u` give `v = D^-1/2 u`. Other variants are returned
    /// as-is.
    pub fn symmetric_form(&self) -> SymmetricForm<'_> {
        if self.kind != LaplacianKind::RandomWalk {
            return SymmetricForm {
                matrix: Cow::Borrowed(&self.matrix),
                back_scale: None,
            };
        }

        let sqrt_d: Vec<f64> = self.degrees.iter().map(|d| d.sqrt()).collect();
        let rows = (0..self.dim())
            .map(|i| {
                self.matrix
                    .row(i)
                    .map(|(j, v)| (j, sqrt_d[i] * v / sqrt_d[j]))
                    .collect()
            })
            .collect();
        SymmetricForm {
            matrix: Cow::Owned(CsrMatrix::from_rows(rows)),
            back_scale: Some(sqrt_d.iter().map(|s| 1.0 / s).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path3() -> SimilarityMatrix {
        // 0 -- 1 -- 2, weights 1 and 2
        SimilarityMatrix::from_triplets(
            3,
            3,
            vec![(0, 1, 1.0), (1, 0, 1.0), (1, 2, 2.0), (2, 1, 2.0)],
        )
        .unwrap()
    }

    #[test]
    fn unnormalized_is_degree_minus_weight() {
        let l = LaplacianKind::Unnormalized.build(&path3()).unwrap();
        let dense = l.matrix().to_dense();
        assert_eq!(
            dense,
            vec![
                vec![1.0, -1.0, 0.0],
                vec![-1.0, 3.0, -2.0],
                vec![0.0, -2.0, 2.0],
            ]
        );
        // Rows of D - W sum to zero.
        for s in l.matrix().row_sums() {
            assert!(s.abs() < 1e-12);
        }
        assert!(l.matrix().is_symmetric(1e-12));
    }

    #[test]
    fn self_loops_fold_into_diagonal() {
        let w = SimilarityMatrix::from_triplets(
            2,
            2,
            vec![(0, 0, 1.0), (0, 1, 1.0), (1, 0, 1.0)],
        )
        .unwrap();
        let l = LaplacianKind::Unnormalized.build(&w).unwrap();
        assert_eq!(l.matrix().get(0, 0), 1.0);
        assert_eq!(l.matrix().get(1, 1), 1.0);
    }

    #[test]
    fn symmetric_normalized_has_unit_diagonal() {
        let l = LaplacianKind::SymmetricNormalized.build(&path3()).unwrap();
        for i in 0..3 {
            assert!((l.matrix().get(i, i) - 1.0).abs() < 1e-12);
        }
        let expected = -1.0 / (1.0f64 * 3.0).sqrt();
        assert!((l.matrix().get(0, 1) - expected).abs() < 1e-12);
        assert!(l.matrix().is_symmetric(1e-12));
    }

    #[test]
    fn random_walk_rows_sum_to_zero() {
        let l = LaplacianKind::RandomWalk.build(&path3()).unwrap();
        for s in l.matrix().row_sums() {
            assert!(s.abs() < 1e-12);
        }
        assert!(!l.matrix().is_symmetric(1e-12));

        let sym = l.symmetric_form();
        assert!(sym.matrix.is_symmetric(1e-12));
        let expected = LaplacianKind::SymmetricNormalized.build(&path3()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert!((sym.matrix.get(i, j) - expected.matrix().get(i, j)).abs() < 1e-12);
            }
        }
        assert!(sym.back_scale.is_some());
    }

    #[test]
    fn normalized_affinity_complements_symmetric() {
        let a = LaplacianKind::NormalizedAffinity.build(&path3()).unwrap();
        let l = LaplacianKind::SymmetricNormalized.build(&path3()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let identity = if i == j { 1.0 } else { 0.0 };
                assert!((a.matrix().get(i, j) - (identity - l.matrix().get(i, j))).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn directions_are_fixed() {
        assert_eq!(LaplacianKind::Unnormalized.direction(), Direction::Smallest);
        assert_eq!(LaplacianKind::SymmetricNormalized.direction(), Direction::Smallest);
        assert_eq!(LaplacianKind::RandomWalk.direction(), Direction::Smallest);
        assert_eq!(LaplacianKind::NormalizedAffinity.direction(), Direction::Largest);
    }

    #[test]
    fn isolated_node_is_degenerate_for_normalized_variants() {
        let w = SimilarityMatrix::from_triplets(3, 3, vec![(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
        assert!(LaplacianKind::Unnormalized.build(&w).is_ok());
        for kind in [
            LaplacianKind::SymmetricNormalized,
            LaplacianKind::RandomWalk,
            LaplacianKind::NormalizedAffinity,
        ] {
            match kind.build(&w) {
                Err(Error::DegenerateGraph {
                    node,
                    dimension,
                    laplacian,
                }) => {
                    assert_eq!(node, 2);
                    assert_eq!(dimension, 3);
                    assert_eq!(laplacian, kind);
                }
                other => panic!("expected DegenerateGraph, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_weights_rejected_by_normalized_variants() {
        let w = SimilarityMatrix::from_triplets(
            2,
            2,
            vec![(0, 1, -1.0), (1, 0, -1.0), (0, 0, 3.0), (1, 1, 3.0)],
        )
        .unwrap();
        assert!(LaplacianKind::Unnormalized.build(&w).is_ok());
        assert!(matches!(
            LaplacianKind::SymmetricNormalized.build(&w),
            Err(Error::InvalidEntry { .. })
        ));
    }

    #[test]
    fn kind_round_trips_through_serde() {
        let json = serde_json::to_string(&LaplacianKind::RandomWalk).unwrap();
        assert_eq!(json, "\"random_walk\"");
        let back: LaplacianKind = serde_json::from_str("\"normalized_affinity\"").unwrap();
        assert_eq!(back, LaplacianKind::NormalizedAffinity);
    }
}
