use std::path::PathBuf;

use ndarray::Array2;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisStage {
    LoadingRois,
    Reading,
    Extracting,
    Aggregating,
    Writing,
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadingRois => write!(f, "Loading ROIs"),
            Self::Reading => write!(f, "Reading frames"),
            Self::Extracting => write!(f, "Computing df/f"),
            Self::Aggregating => write!(f, "Averaging"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Result of one analysis run.
#[derive(Clone, Debug)]
pub struct AnalysisOutput {
    /// Averaged, thresholded df/f matrix (rows = ROIs, columns = frames).
    pub matrix: Array2<f64>,
    /// Image files that contributed to the average, in processing order.
    pub input_files: Vec<PathBuf>,
    pub data_path: PathBuf,
    pub plot_path: PathBuf,
}

impl AnalysisOutput {
    pub fn file_count(&self) -> usize {
        self.input_files.len()
    }

    pub fn roi_count(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn frame_count(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage (e.g. ROI count), if known.
    fn begin_stage(&self, _stage: AnalysisStage, _total_items: Option<usize>) {}

    /// `items_done` work items of the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_analysis` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
