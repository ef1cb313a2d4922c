#[inline]
pub(crate) fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Index of the closest centroid and its squared distance.
///
/// Ties go to the lower index.
pub(crate) fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_euclidean(point, c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// Validate a dataset and return its dimensionality.
pub(crate) fn check_dims(data: &[Vec<f64>]) -> crate::error::Result<usize> {
    use crate::error::Error;

    let first = data.first().ok_or(Error::EmptyInput)?;
    let d = first.len();
    if d == 0 {
        return Err(Error::InvalidParameter {
            name: "dimension",
            message: "must be at least 1",
        });
    }
    for p in data {
        if p.len() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                found: p.len(),
            });
        }
    }
    Ok(d)
}
