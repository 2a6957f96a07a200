use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DfbyfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Invalid ROI file, line {line}: {message}")]
    RoiParse { line: usize, message: String },

    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("No .tif/.tiff files found in {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("Empty frame sequence")]
    EmptySequence,

    #[error("Frame {index} is {actual_height}x{actual_width}, expected {height}x{width}")]
    FrameShapeMismatch {
        index: usize,
        height: usize,
        width: usize,
        actual_height: usize,
        actual_width: usize,
    },

    #[error("Matrix {index} has shape {actual:?}, expected {expected:?}")]
    MatrixShapeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, DfbyfError>;
