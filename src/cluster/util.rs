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

#[inline]
pub(crate) fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Check that every point shares the dimensionality of the first one.
pub(crate) fn check_dims(data: &[Vec<f64>]) -> crate::error::Result<usize> {
    let dim = data.first().map_or(0, Vec::len);
    for point in data {
        if point.len() != dim {
            return Err(crate::error::Error::DimensionMismatch {
                expected: dim,
                found: point.len(),
            });
        }
    }
    Ok(dim)
}
