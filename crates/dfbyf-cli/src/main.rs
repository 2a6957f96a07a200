mod progress;
mod summary;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dfbyf_core::consts::DEFAULT_FRAME_RATE;
use dfbyf_core::pipeline::config::{AnalysisConfig, SettingsFile};
use dfbyf_core::pipeline::run_analysis_reported;
use tracing_subscriber::EnvFilter;

use progress::BarReporter;

#[derive(Parser)]
#[command(
    name = "dfbyf",
    about = "Plot df/f of circular ROIs with 50% max thresholding"
)]
#[command(version)]
struct Cli {
    /// Input file or directory (tif files are supported)
    #[arg(short, long)]
    input: PathBuf,

    /// ROI file (csv)
    #[arg(short, long)]
    roifile: PathBuf,

    /// Debug level (0 = info, 1 = debug, 2+ = trace)
    #[arg(short, long, default_value_t = 0)]
    debug: u8,

    /// Output file path prefix
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Frames per second [default: 10]
    #[arg(long = "frame_rate", visible_alias = "frame-rate")]
    frame_rate: Option<f64>,

    /// Settings file (TOML) for analysis and plot parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of leading frames whose median is the baseline
    #[arg(long)]
    baseline_frames: Option<usize>,

    /// Fraction of each ROI's peak removed by thresholding (0-1)
    #[arg(long)]
    threshold: Option<f64>,

    /// Min-max normalize each ROI series, zeroing inactive ROIs
    #[arg(long)]
    normalize: bool,
}

/// `-fr` is a two-letter short flag, which clap cannot declare; map it to
/// the long form before parsing. Accepts `-fr 20`, `-fr=20` and `-fr20`.
fn rewrite_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut out = Vec::new();
    for arg in args {
        match arg.to_str().and_then(|s| s.strip_prefix("-fr")) {
            Some("") => out.push(OsString::from("--frame_rate")),
            Some(value) => {
                out.push(OsString::from("--frame_rate"));
                out.push(OsString::from(value.strip_prefix('=').unwrap_or(value)));
            }
            None => out.push(arg),
        }
    }
    out
}

fn build_config(cli: &Cli) -> Result<AnalysisConfig> {
    let settings = match cli.config {
        Some(ref path) => SettingsFile::load(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?,
        None => SettingsFile::default(),
    };

    let mut config = AnalysisConfig::new(&cli.input, &cli.roifile);
    config.outfile = cli.outfile.clone();
    config.debug = cli.debug;
    config.frame_rate = cli
        .frame_rate
        .or(settings.frame_rate)
        .unwrap_or(DEFAULT_FRAME_RATE);
    config.analysis = settings.analysis;
    config.plot = settings.plot;

    if let Some(n) = cli.baseline_frames {
        config.analysis.baseline_frames = n;
    }
    if let Some(t) = cli.threshold {
        config.analysis.threshold_fraction = t;
    }
    if cli.normalize {
        config.analysis.normalize = true;
    }

    config.validate().context("Invalid analysis settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse_from(rewrite_args(std::env::args_os()));

    let level = match cli.debug {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();

    let config = build_config(&cli)?;
    tracing::debug!(?config, "Resolved configuration");
    summary::print_config_summary(&config);

    let reporter = BarReporter::new()?;
    let output = run_analysis_reported(&config, &reporter).with_context(|| {
        format!(
            "df/f analysis failed for {} with ROIs from {}",
            config.input.display(),
            config.roi_file.display()
        )
    })?;
    reporter.finish();

    summary::print_output_summary(&output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(rewrite_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn test_short_frame_rate_flag() {
        let cli = parse(&["dfbyf", "-i", "stack.tif", "-r", "rois.csv", "-fr", "20"]);
        assert_eq!(cli.frame_rate, Some(20.0));
    }

    #[test]
    fn test_attached_frame_rate_forms() {
        let cli = parse(&["dfbyf", "-i", "a.tif", "-r", "r.csv", "-fr=12.5"]);
        assert_eq!(cli.frame_rate, Some(12.5));
        let cli = parse(&["dfbyf", "-i", "a.tif", "-r", "r.csv", "-fr7"]);
        assert_eq!(cli.frame_rate, Some(7.0));
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["dfbyf", "--input", "dir", "--roifile", "rois.csv"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.frame_rate, DEFAULT_FRAME_RATE);
        assert_eq!(config.debug, 0);
        assert!(config.outfile.is_none());
        assert_eq!(config.analysis.baseline_frames, 49);
    }

    #[test]
    fn test_flag_overrides() {
        let cli = parse(&[
            "dfbyf",
            "-i",
            "a.tif",
            "-r",
            "r.csv",
            "-o",
            "out/run1",
            "--frame-rate",
            "5",
            "--threshold",
            "0.25",
            "--normalize",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.outfile, Some(PathBuf::from("out/run1")));
        assert_eq!(config.frame_rate, 5.0);
        assert_eq!(config.analysis.threshold_fraction, 0.25);
        assert!(config.analysis.normalize);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let cli = parse(&["dfbyf", "-i", "a.tif", "-r", "r.csv", "--threshold", "2"]);
        assert!(build_config(&cli).is_err());
    }
}
