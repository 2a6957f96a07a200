use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::error::Result;

/// Write a matrix as comma-delimited text, one matrix row per line.
///
/// Values use fixed 18-digit scientific notation with a signed, at least
/// two-digit exponent (`1.500000000000000000e+00`).
pub fn write_dat(matrix: &Array2<f64>, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in matrix.rows() {
        let line = row
            .iter()
            .map(|&v| format_scientific(v))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Format a value as `d.dddddddddddddddddde±XX`.
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    // Rust renders `1.5e0` / `1.5e-7`; only the exponent needs reshaping.
    let formatted = format!("{:.18e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}
