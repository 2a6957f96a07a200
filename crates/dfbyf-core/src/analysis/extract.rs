use ndarray::{Array1, Array2};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::consts::{DEFAULT_BASELINE_FRAMES, PARALLEL_ROI_THRESHOLD};
use crate::error::Result;
use crate::frame::Frame;
use crate::io::frames::check_frame_shapes;
use crate::roi::{CircleMask, Roi};

use super::aggregate::normalize_unit_range;

/// Parameters of the per-ROI df/f computation.
#[derive(Clone, Copy, Debug)]
pub struct ExtractParams {
    /// Number of leading samples whose median is the baseline.
    pub baseline_frames: usize,
    /// Min-max scale each df/f series to [0, 1] after baseline correction.
    pub normalize: bool,
}

impl Default for ExtractParams {
    fn default() -> Self {
        Self {
            baseline_frames: DEFAULT_BASELINE_FRAMES,
            normalize: false,
        }
    }
}

/// Mean of a frame's pixels under the mask.
///
/// Returns 0.0 for an empty mask.
pub fn masked_mean(frame: &Frame, mask: &CircleMask) -> f64 {
    if mask.is_empty() {
        return 0.0;
    }
    let sum: f64 = mask
        .indices()
        .iter()
        .map(|&(row, col)| frame.data[[row, col]] as f64)
        .sum();
    sum / mask.len() as f64
}

/// Raw masked-mean intensity of one ROI across all frames.
///
/// Every frame is evaluated independently against the same mask.
pub fn roi_mean_series(roi: &Roi, frames: &[Frame]) -> Result<Array1<f64>> {
    check_frame_shapes(frames)?;
    let mask = CircleMask::new(roi, frames[0].dim());
    if mask.is_empty() {
        warn!(
            column = roi.column,
            row = roi.row,
            radius = roi.radius,
            "ROI lies outside the frame, series is all zeros"
        );
    }
    Ok(frames.iter().map(|f| masked_mean(f, &mask)).collect())
}

/// Median of the first `window` samples (all samples if fewer).
///
/// An even count averages the two middle values. Returns `None` for an
/// empty series.
pub fn baseline(raw: &Array1<f64>, window: usize) -> Option<f64> {
    let n = window.min(raw.len());
    if n == 0 {
        return None;
    }
    let mut values: Vec<f64> = raw.iter().take(n).copied().collect();
    Some(compute_median(&mut values))
}

fn compute_median(values: &mut [f64]) -> f64 {
    let n = values.len();
    let mid = n / 2;
    if n % 2 == 1 {
        *values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b)).1
    } else {
        values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        let upper = values[mid];
        let lower = values[..mid]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        (lower + upper) / 2.0
    }
}

/// Relative change against the baseline: `(raw - b) / b`.
///
/// A non-positive baseline leaves the series untouched.
pub fn df_by_f(raw: &Array1<f64>, window: usize) -> Array1<f64> {
    match baseline(raw, window) {
        Some(b) if b > 0.0 => raw.mapv(|v| (v - b) / b),
        other => {
            debug!(baseline = ?other, "Non-positive baseline, keeping raw series");
            raw.clone()
        }
    }
}

/// df/f series of one ROI over a frame sequence.
pub fn compute_df_by_f(roi: &Roi, frames: &[Frame], params: &ExtractParams) -> Result<Array1<f64>> {
    let raw = roi_mean_series(roi, frames)?;
    let series = df_by_f(&raw, params.baseline_frames);
    if params.normalize {
        Ok(normalize_unit_range(&series))
    } else {
        Ok(series)
    }
}

/// df/f matrix of a frame sequence: one row per ROI, one column per frame.
///
/// ROIs are processed in parallel once there are enough of them; each row is
/// independent so the result does not depend on scheduling.
pub fn dfbyf_matrix(rois: &[Roi], frames: &[Frame], params: &ExtractParams) -> Result<Array2<f64>> {
    dfbyf_matrix_with_progress(rois, frames, params, |_| {})
}

/// Like [`dfbyf_matrix`], calling `on_row` once per finished ROI.
pub fn dfbyf_matrix_with_progress<F>(
    rois: &[Roi],
    frames: &[Frame],
    params: &ExtractParams,
    on_row: F,
) -> Result<Array2<f64>>
where
    F: Fn(usize) + Sync,
{
    check_frame_shapes(frames)?;
    let n_frames = frames.len();

    let rows: Vec<Array1<f64>> = if rois.len() >= PARALLEL_ROI_THRESHOLD {
        rois.par_iter()
            .enumerate()
            .map(|(i, roi)| {
                let row = compute_df_by_f(roi, frames, params);
                on_row(i);
                row
            })
            .collect::<Result<_>>()?
    } else {
        rois.iter()
            .enumerate()
            .map(|(i, roi)| {
                let row = compute_df_by_f(roi, frames, params);
                on_row(i);
                row
            })
            .collect::<Result<_>>()?
    };

    let mut matrix = Array2::<f64>::zeros((rois.len(), n_frames));
    for (mut dst, src) in matrix.rows_mut().into_iter().zip(rows) {
        dst.assign(&src);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(compute_median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(compute_median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(compute_median(&mut [7.0]), 7.0);
    }
}
