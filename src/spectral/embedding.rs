//! Spectral embedding: retained eigenvectors as per-item coordinates.

use super::eigen::Eigensolver;
use super::laplacian::Laplacian;
use super::selection::EigenSelector;
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Items embedded in the space spanned by the retained eigenvectors.
///
/// Row `i` is item `i`, column `c` the `c`-th retained eigenvector. Rows have
/// unit L2 norm, except rows listed in [`zero_rows`](Embedding::zero_rows),
/// which had no mass in any retained eigenvector and are left all-zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    eigenvalues: Vec<f64>,
    rows: Vec<Vec<f64>>,
    zero_rows: Vec<usize>,
}

impl Embedding {
    /// Retained eigenvalues, in selection order.
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// Row-normalized coordinates, one row per item.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Items whose row could not be normalized.
    pub fn zero_rows(&self) -> &[usize] {
        &self.zero_rows
    }

    /// Number of embedded items.
    pub fn n_items(&self) -> usize {
        self.rows.len()
    }

    /// Number of retained eigenvectors.
    pub fn dim(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Split into `(eigenvalues, rows)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<Vec<f64>>) {
        (self.eigenvalues, self.rows)
    }
}

/// Build the embedding of `laplacian`.
///
/// The solver runs once; the selector sees the full eigenvalue sequence to
/// pick `k`, then the first `k` pairs along the Laplacian's direction become
/// the columns.
pub fn embed(
    laplacian: &Laplacian,
    selector: &dyn EigenSelector,
    solver: &dyn Eigensolver,
) -> Result<Embedding> {
    let n = laplacian.dim();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    let kind = laplacian.kind();
    let selection_error = |source: Error| Error::EigenSelection {
        laplacian: kind,
        dimension: n,
        source: Box::new(source),
    };
    selector.validate(n).map_err(selection_error)?;

    let direction = laplacian.direction();
    let needed = selector.eigenpairs_needed(n);
    let pairs = solver.solve(laplacian, direction, needed)?;
    if !pairs.is_empty() && pairs.vector_len() != n {
        return Err(Error::NumericalFailure {
            reason: format!("solver returned eigenvectors of length {}", pairs.vector_len()),
            requested: needed,
            dimension: n,
            laplacian: kind,
        });
    }

    let k = selector.choose_count(pairs.values(), direction, n);
    if k == 0 {
        return Err(selection_error(Error::InvalidParameter {
            name: "k",
            message: "selection policy chose zero eigenvectors",
        }));
    }
    if k > n {
        return Err(selection_error(Error::InvalidClusterCount {
            requested: k,
            n_items: n,
        }));
    }
    debug!(k, n, laplacian = ?kind, "selected embedding dimension");
    if pairs.len() < k {
        return Err(Error::NumericalFailure {
            reason: format!("solver returned only {} eigenpairs", pairs.len()),
            requested: k,
            dimension: n,
            laplacian: kind,
        });
    }

    let mut rows = vec![vec![0.0; k]; n];
    let mut row_norm_sq = vec![0.0; n];
    let mut eigenvalues = Vec::with_capacity(k);
    for (col, pair) in pairs.iter_sorted(direction).take(k).enumerate() {
        if !pair.value.is_finite() || pair.vector.iter().any(|x| !x.is_finite()) {
            return Err(Error::NumericalFailure {
                reason: format!("eigenpair {col} is not finite"),
                requested: k,
                dimension: n,
                laplacian: kind,
            });
        }
        eigenvalues.push(pair.value);
        for (i, &x) in pair.vector.iter().enumerate() {
            rows[i][col] = x;
            row_norm_sq[i] += x * x;
        }
    }
    debug!(?eigenvalues, "retained eigenvalues");

    let mut zero_rows = Vec::new();
    for (i, (row, &sq)) in rows.iter_mut().zip(&row_norm_sq).enumerate() {
        if sq > 0.0 {
            let norm = sq.sqrt();
            row.iter_mut().for_each(|x| *x /= norm);
        } else {
            zero_rows.push(i);
        }
    }
    if !zero_rows.is_empty() {
        warn!(
            count = zero_rows.len(),
            "embedding rows with zero norm left unnormalized"
        );
    }

    Ok(Embedding {
        eigenvalues,
        rows,
        zero_rows,
    })
}
