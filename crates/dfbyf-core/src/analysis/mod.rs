//! df/f extraction and cross-file aggregation.

pub mod aggregate;
pub mod extract;

pub use aggregate::{mean_matrices, normalize_unit_range, threshold_rows};
pub use extract::{
    baseline, compute_df_by_f, df_by_f, dfbyf_matrix, dfbyf_matrix_with_progress, masked_mean,
    roi_mean_series, ExtractParams,
};
