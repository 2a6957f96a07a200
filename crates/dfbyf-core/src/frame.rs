use ndarray::Array2;

/// A single grayscale image frame.
/// Pixel values are raw sample intensities (not rescaled).
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Position of the frame within its source file
    pub index: usize,
}

impl Frame {
    pub fn new(data: Array2<f32>, index: usize) -> Self {
        Self { data, index }
    }

    /// Shape as `(height, width)`.
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}
