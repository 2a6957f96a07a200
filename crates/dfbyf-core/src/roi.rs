use std::path::Path;

use tracing::info;

use crate::error::{DfbyfError, Result};

/// A circular region of interest.
///
/// Field order follows the ROI CSV columns: `column, row, radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roi {
    pub column: f64,
    pub row: f64,
    pub radius: f64,
}

impl Roi {
    pub fn new(column: f64, row: f64, radius: f64) -> Self {
        Self {
            column,
            row,
            radius,
        }
    }
}

/// Read ROIs from a CSV file, sorted ascending by row coordinate.
pub fn load_rois(path: &Path) -> Result<Vec<Roi>> {
    info!(path = %path.display(), "Reading ROIs");
    let contents = std::fs::read_to_string(path)?;
    parse_rois(&contents)
}

/// Parse ROI CSV text.
///
/// The first line is a header. Text after `#` is ignored and blank lines are
/// skipped. Each remaining line needs at least three numeric fields; any
/// further fields are ignored.
pub fn parse_rois(contents: &str) -> Result<Vec<Roi>> {
    let mut rois = Vec::new();

    for (line_idx, raw_line) in contents.lines().enumerate().skip(1) {
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        if line.trim().is_empty() {
            continue;
        }

        let line_no = line_idx + 1;
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(DfbyfError::RoiParse {
                line: line_no,
                message: format!("expected at least 3 fields, found {}", fields.len()),
            });
        }

        let mut values = [0.0f64; 3];
        for (value, field) in values.iter_mut().zip(&fields) {
            *value = field.parse().map_err(|_| DfbyfError::RoiParse {
                line: line_no,
                message: format!("'{}' is not a number", field),
            })?;
        }

        rois.push(Roi::new(values[0], values[1], values[2]));
    }

    // Stable: ROIs on the same row keep file order.
    rois.sort_by(|a, b| a.row.total_cmp(&b.row));
    Ok(rois)
}

/// Pixel footprint of a filled circle, clipped to a frame shape.
///
/// The circle center is `x = roi.row`, `y = roi.column` in image
/// coordinates, i.e. array index `[roi.column, roi.row]`. Center and radius
/// are truncated to integers.
#[derive(Clone, Debug)]
pub struct CircleMask {
    indices: Vec<(usize, usize)>,
    shape: (usize, usize),
}

impl CircleMask {
    pub fn new(roi: &Roi, shape: (usize, usize)) -> Self {
        let (h, w) = shape;
        let cx = roi.row.trunc() as i64;
        let cy = roi.column.trunc() as i64;
        let r = roi.radius.trunc() as i64;

        let mut indices = Vec::new();
        if r >= 0 {
            let r2 = r * r;
            let y0 = (cy - r).max(0);
            let y1 = (cy + r).min(h as i64 - 1);
            let x0 = (cx - r).max(0);
            let x1 = (cx + r).min(w as i64 - 1);
            for y in y0..=y1 {
                let dy = y - cy;
                for x in x0..=x1 {
                    let dx = x - cx;
                    if dx * dx + dy * dy <= r2 {
                        indices.push((y as usize, x as usize));
                    }
                }
            }
        }

        Self { indices, shape }
    }

    /// In-frame pixel positions as `(row, col)` array indices.
    pub fn indices(&self) -> &[(usize, usize)] {
        &self.indices
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.indices.contains(&(row, col))
    }
}
