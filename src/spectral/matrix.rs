//! Sparse square matrices and the similarity graph input.

use crate::cluster::util::squared_euclidean;
use crate::error::{Error, Result};

/// Square matrix in compressed sparse row layout.
///
/// Column indices within each row are strictly increasing, and no explicit
/// zeros are stored.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    dim: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Build from per-row entries. Each row must already be sorted by column
    /// with no duplicates.
    pub(crate) fn from_rows(rows: Vec<Vec<(usize, f64)>>) -> Self {
        let dim = rows.len();
        let nnz = rows.iter().map(Vec::len).sum();
        let mut indptr = Vec::with_capacity(dim + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        indptr.push(0);
        for row in rows {
            for (j, v) in row {
                if v != 0.0 {
                    indices.push(j);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            dim,
            indptr,
            indices,
            values,
        }
    }

    /// Number of rows (= number of columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored nonzero entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Nonzero entries of row `i` as `(column, value)`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.indptr[i]..self.indptr[i + 1];
        self.indices[span.clone()]
            .iter()
            .copied()
            .zip(self.values[span].iter().copied())
    }

    /// Entry `(i, j)`, zero when not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let span = self.indptr[i]..self.indptr[i + 1];
        match self.indices[span.clone()].binary_search(&j) {
            Ok(pos) => self.values[span.start + pos],
            Err(_) => 0.0,
        }
    }

    /// All stored entries as `(row, column, value)`, row-major.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.dim).flat_map(move |i| self.row(i).map(move |(j, v)| (i, j, v)))
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.dim).map(|i| self.row(i).map(|(_, v)| v).sum()).collect()
    }

    /// Dense row-major copy.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut out = vec![vec![0.0; self.dim]; self.dim];
        for (i, j, v) in self.triplets() {
            out[i][j] = v;
        }
        out
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.dim);
        (0..self.dim)
            .map(|i| self.row(i).map(|(j, v)| v * x[j]).sum())
            .collect()
    }

    /// First `(i, j)` with `|a_ij - a_ji| > tol`, if any.
    pub fn first_asymmetry(&self, tol: f64) -> Option<(usize, usize)> {
        // Checking stored entries of both orientations covers pairs where only
        // one side is stored.
        self.triplets()
            .find(|&(i, j, v)| (v - self.get(j, i)).abs() > tol)
            .map(|(i, j, _)| (i, j))
    }

    /// Whether the matrix equals its transpose within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.first_asymmetry(tol).is_none()
    }
}

/// Pairwise nonnegative affinities between `n` items.
///
/// Always square and finite. Symmetry is not enforced here; the eigensolver
/// checks it on the Laplacian it is given.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix {
    inner: CsrMatrix,
}

impl SimilarityMatrix {
    /// Build from `(row, column, value)` triples.
    ///
    /// Duplicate coordinates are summed and entries that end up zero are
    /// dropped.
    pub fn from_triplets<I>(rows: usize, cols: usize, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, f64)>,
    {
        if rows != cols {
            return Err(Error::NotSquare { rows, cols });
        }
        if rows == 0 {
            return Err(Error::EmptyInput);
        }

        let mut per_row: Vec<Vec<(usize, f64)>> = vec![Vec::new(); rows];
        for (row, col, value) in triplets {
            if row >= rows || col >= cols {
                return Err(Error::InvalidEntry {
                    row,
                    col,
                    value,
                    reason: "index out of bounds",
                });
            }
            if !value.is_finite() {
                return Err(Error::InvalidEntry {
                    row,
                    col,
                    value,
                    reason: "weight must be finite",
                });
            }
            per_row[row].push((col, value));
        }

        for row in &mut per_row {
            row.sort_by_key(|&(j, _)| j);
            row.dedup_by(|later, earlier| {
                if later.0 == earlier.0 {
                    earlier.1 += later.1;
                    true
                } else {
                    false
                }
            });
        }

        Ok(Self {
            inner: CsrMatrix::from_rows(per_row),
        })
    }

    /// Build from dense rows; zeros are treated as missing edges.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        for row in rows {
            if row.len() != n {
                return Err(Error::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
        }
        Self::from_triplets(
            n,
            n,
            rows.iter().enumerate().flat_map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v != 0.0)
                    .map(move |(j, &v)| (i, j, v))
            }),
        )
    }

    /// Gaussian kernel affinities between points: `exp(-||xi - xj||² / (2σ²))`.
    ///
    /// Self-similarities are omitted and weights below `threshold` are dropped,
    /// which keeps the graph sparse.
    pub fn gaussian(points: &[Vec<f64>], sigma: f64, threshold: f64) -> Result<Self> {
        let n = points.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "sigma",
                message: "must be positive and finite",
            });
        }
        let d = points[0].len();
        for p in points {
            if p.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: p.len(),
                });
            }
        }

        let scale = 2.0 * sigma * sigma;
        let mut triplets = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let w = (-squared_euclidean(&points[i], &points[j]) / scale).exp();
                if w > 0.0 && w >= threshold {
                    triplets.push((i, j, w));
                    triplets.push((j, i, w));
                }
            }
        }
        Self::from_triplets(n, n, triplets)
    }

    /// Number of items.
    pub fn dim(&self) -> usize {
        self.inner.dim()
    }

    /// Entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner.get(i, j)
    }

    /// Weighted degree (row sum) of every node.
    pub fn degrees(&self) -> Vec<f64> {
        self.inner.row_sums()
    }

    /// Underlying sparse storage.
    pub fn as_csr(&self) -> &CsrMatrix {
        &self.inner
    }
}
