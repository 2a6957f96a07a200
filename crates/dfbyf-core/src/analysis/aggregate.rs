use ndarray::{Array1, Array2, Axis};
use tracing::warn;

use crate::consts::LOW_ACTIVITY_RANGE_FRACTION;
use crate::error::{DfbyfError, Result};

/// Element-wise mean of equally shaped matrices.
pub fn mean_matrices(matrices: &[Array2<f64>]) -> Result<Array2<f64>> {
    let first = matrices.first().ok_or(DfbyfError::EmptySequence)?;
    let expected = first.dim();

    let mut sum = Array2::<f64>::zeros(expected);
    for (index, matrix) in matrices.iter().enumerate() {
        if matrix.dim() != expected {
            return Err(DfbyfError::MatrixShapeMismatch {
                index,
                expected,
                actual: matrix.dim(),
            });
        }
        sum += matrix;
    }

    sum /= matrices.len() as f64;
    Ok(sum)
}

fn row_max(row: ndarray::ArrayView1<'_, f64>) -> f64 {
    row.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Peak-relative thresholding applied to every row independently.
///
/// With `M` the row maximum, `M * fraction` is subtracted from each element
/// and the result is clamped as `min(max(x, 0), M)`. The upper bound is the
/// row maximum before subtraction.
pub fn threshold_rows(matrix: &Array2<f64>, fraction: f64) -> Array2<f64> {
    let mut out = matrix.clone();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let max = row_max(row.view());
        let thres = max * fraction;
        row.mapv_inplace(|v| (v - thres).max(0.0).min(max));
    }
    out
}

/// Min-max scale a series to [0, 1].
///
/// Flat series, and series whose range is under 1% of their maximum, are
/// reported as inactive and replaced with zeros.
pub fn normalize_unit_range(series: &Array1<f64>) -> Array1<f64> {
    let (a, b) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = b - a;

    if series.is_empty() {
        return Array1::zeros(0);
    }
    if range == 0.0 || range / b < LOW_ACTIVITY_RANGE_FRACTION {
        warn!(min = a, max = b, "This ROI does not show much activity, ignoring");
        return Array1::zeros(series.len());
    }
    series.mapv(|v| (v - a) / range)
}
