use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::ExtractParams;
use crate::consts::{DEFAULT_BASELINE_FRAMES, DEFAULT_FRAME_RATE, DEFAULT_THRESHOLD_FRACTION};
use crate::error::{DfbyfError, Result};
use crate::io::heatmap::HeatmapStyle;

/// Everything one analysis run needs, built once and handed to the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Image file, or directory of `.tif`/`.tiff` files.
    pub input: PathBuf,
    /// ROI CSV file.
    pub roi_file: PathBuf,
    /// Output path prefix; defaults to the last input file.
    #[serde(default)]
    pub outfile: Option<PathBuf>,
    /// Frames per second, used for the time axis.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Verbosity level (0 = info).
    #[serde(default)]
    pub debug: u8,
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub plot: HeatmapStyle,
}

fn default_frame_rate() -> f64 {
    DEFAULT_FRAME_RATE
}

impl AnalysisConfig {
    pub fn new(input: impl Into<PathBuf>, roi_file: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            roi_file: roi_file.into(),
            outfile: None,
            frame_rate: DEFAULT_FRAME_RATE,
            debug: 0,
            analysis: AnalysisParams::default(),
            plot: HeatmapStyle::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(DfbyfError::InvalidConfig(format!(
                "frame rate must be positive, got {}",
                self.frame_rate
            )));
        }
        self.analysis.validate()?;
        self.plot.validate()
    }

    /// Prefix for output files: the explicit outfile, else the last input.
    pub fn output_prefix<'a>(&'a self, input_files: &'a [PathBuf]) -> &'a Path {
        self.outfile
            .as_deref()
            .or_else(|| input_files.last().map(PathBuf::as_path))
            .unwrap_or(self.input.as_path())
    }
}

/// Tunables of the df/f computation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Leading frames whose median is the baseline.
    pub baseline_frames: usize,
    /// Fraction of each ROI's peak removed by thresholding.
    pub threshold_fraction: f64,
    /// Min-max normalize each ROI series after baseline correction.
    pub normalize: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            baseline_frames: DEFAULT_BASELINE_FRAMES,
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
            normalize: false,
        }
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<()> {
        if self.baseline_frames == 0 {
            return Err(DfbyfError::InvalidConfig(
                "baseline_frames must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold_fraction) {
            return Err(DfbyfError::InvalidConfig(format!(
                "threshold_fraction must be within [0, 1], got {}",
                self.threshold_fraction
            )));
        }
        Ok(())
    }

    pub fn extract_params(&self) -> ExtractParams {
        ExtractParams {
            baseline_frames: self.baseline_frames,
            normalize: self.normalize,
        }
    }
}

/// Optional TOML settings file layered under command-line flags.
///
/// ```toml
/// frame_rate = 20.0
///
/// [analysis]
/// baseline_frames = 49
/// threshold_fraction = 0.5
///
/// [plot]
/// width = 1600
/// height = 900
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub frame_rate: Option<f64>,
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub plot: HeatmapStyle,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| DfbyfError::InvalidConfig(e.to_string()))
    }
}
