/// Number of leading frames whose median forms the df/f baseline.
pub const DEFAULT_BASELINE_FRAMES: usize = 49;

/// Fraction of each ROI's peak subtracted during thresholding (50% max).
pub const DEFAULT_THRESHOLD_FRACTION: f64 = 0.5;

/// Default acquisition rate in frames per second.
pub const DEFAULT_FRAME_RATE: f64 = 10.0;

/// A series whose (max - min) / max falls below this is reported as inactive
/// by min-max normalization.
pub const LOW_ACTIVITY_RANGE_FRACTION: f64 = 1e-2;

/// Minimum ROI count to extract ROI rows with Rayon.
pub const PARALLEL_ROI_THRESHOLD: usize = 4;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Default heatmap canvas size in pixels.
pub const DEFAULT_PLOT_WIDTH: u32 = 1200;
pub const DEFAULT_PLOT_HEIGHT: u32 = 800;

/// Height of the horizontal color scale strip below the heatmap.
pub const COLOR_BAR_HEIGHT: u32 = 110;

/// Extensions picked up when the input is a directory.
pub const TIFF_EXTENSIONS: [&str; 2] = ["tif", "tiff"];
