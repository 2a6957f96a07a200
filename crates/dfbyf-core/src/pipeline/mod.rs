pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{output_paths, run_analysis, run_analysis_reported, OutputPaths};
pub use types::{AnalysisOutput, AnalysisStage, ProgressReporter};
