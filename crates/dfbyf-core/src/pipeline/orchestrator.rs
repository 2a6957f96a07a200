use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{info, warn};

use crate::analysis::{dfbyf_matrix_with_progress, mean_matrices, threshold_rows};
use crate::error::Result;
use crate::io::dat::write_dat;
use crate::io::frames::{collect_input_files, read_frames};
use crate::io::heatmap::render_heatmap;
use crate::roi::load_rois;

use super::config::AnalysisConfig;
use super::types::{AnalysisOutput, AnalysisStage, NoOpReporter, ProgressReporter};

/// Output file locations for a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub data: PathBuf,
    pub plot: PathBuf,
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// `{prefix}_dfbyf_avg_{n}.dat` and `{prefix}_df_by_f_avg_{n}.png`.
pub fn output_paths(prefix: &Path, file_count: usize) -> OutputPaths {
    OutputPaths {
        data: with_suffix(prefix, &format!("_dfbyf_avg_{}.dat", file_count)),
        plot: with_suffix(prefix, &format!("_df_by_f_avg_{}.png", file_count)),
    }
}

/// Run the full analysis.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutput> {
    run_analysis_reported(config, &NoOpReporter)
}

/// Run the full analysis with a thread-safe progress reporter.
pub fn run_analysis_reported(
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> Result<AnalysisOutput> {
    config.validate()?;

    reporter.begin_stage(AnalysisStage::LoadingRois, None);
    let rois = load_rois(&config.roi_file)?;
    reporter.finish_stage();
    if rois.is_empty() {
        warn!(path = %config.roi_file.display(), "ROI file contains no ROIs");
    }
    info!(count = rois.len(), "Loaded ROIs");

    let input_files = collect_input_files(&config.input)?;
    let params = config.analysis.extract_params();

    let mut matrices = Vec::with_capacity(input_files.len());
    for file in &input_files {
        info!(file = %file.display(), "Computing df/f");

        reporter.begin_stage(AnalysisStage::Reading, None);
        let frames = read_frames(file)?;
        reporter.finish_stage();
        info!(frames = frames.len(), "Frames decoded");

        reporter.begin_stage(AnalysisStage::Extracting, Some(rois.len()));
        let done = AtomicUsize::new(0);
        let matrix = dfbyf_matrix_with_progress(&rois, &frames, &params, |_| {
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.advance(n);
        })?;
        reporter.finish_stage();

        matrices.push(matrix);
    }

    reporter.begin_stage(AnalysisStage::Aggregating, None);
    let mean = mean_matrices(&matrices)?;
    let matrix = threshold_rows(&mean, config.analysis.threshold_fraction);
    reporter.finish_stage();

    reporter.begin_stage(AnalysisStage::Writing, Some(2));
    let paths = output_paths(config.output_prefix(&input_files), input_files.len());

    write_dat(&matrix, &paths.data)?;
    info!(path = %paths.data.display(), "Wrote df/f data");
    reporter.advance(1);

    render_heatmap(&matrix, &paths.plot, config.frame_rate, &config.plot)?;
    info!(path = %paths.plot.display(), "Saved df/f heatmap");
    reporter.advance(2);
    reporter.finish_stage();

    Ok(AnalysisOutput {
        matrix,
        input_files,
        data_path: paths.data,
        plot_path: paths.plot,
    })
}
