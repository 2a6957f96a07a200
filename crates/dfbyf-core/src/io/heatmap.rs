use std::path::Path;

use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{COLOR_BAR_HEIGHT, DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH};
use crate::error::{DfbyfError, Result};

/// Canvas size of the rendered heatmap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapStyle {
    pub width: u32,
    pub height: u32,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
        }
    }
}

impl HeatmapStyle {
    /// The canvas must have room for the color scale strip below the grid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(DfbyfError::InvalidConfig(
                "plot width must be positive".into(),
            ));
        }
        if self.height <= COLOR_BAR_HEIGHT {
            return Err(DfbyfError::InvalidConfig(format!(
                "plot height must exceed {} px, got {}",
                COLOR_BAR_HEIGHT, self.height
            )));
        }
        Ok(())
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> DfbyfError {
    DfbyfError::Plot(e.to_string())
}

/// Black → red → yellow → white colormap, `t` in [0, 1].
pub fn hot_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let ramp = |lo: f64, hi: f64| (((t - lo) / (hi - lo)).clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(ramp(0.0, 0.365079), ramp(0.365079, 0.746032), ramp(0.746032, 1.0))
}

/// Finite (min, max) of a matrix, or `(0, 0)` when it has no finite values.
fn value_range(matrix: &Array2<f64>) -> (f64, f64) {
    let (lo, hi) = matrix
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        (0.0, 0.0)
    } else {
        (lo, hi)
    }
}

/// Render a df/f matrix (rows = ROIs, columns = frames) as a PNG heatmap.
///
/// The x axis is time in seconds (`column / frame_rate`), the y axis is the
/// ROI index counted from the top. A horizontal color scale sits below the
/// plot.
pub fn render_heatmap(
    matrix: &Array2<f64>,
    path: &Path,
    frame_rate: f64,
    style: &HeatmapStyle,
) -> Result<()> {
    if frame_rate <= 0.0 || !frame_rate.is_finite() {
        return Err(DfbyfError::InvalidConfig(format!(
            "frame rate must be positive, got {}",
            frame_rate
        )));
    }
    style.validate()?;

    let (n_rois, n_frames) = matrix.dim();
    let x_max = (n_frames.max(1) as f64) / frame_rate;
    let y_max = n_rois.max(1) as f64;
    let (v_min, v_max) = value_range(matrix);
    let span = v_max - v_min;
    let normalize = |v: f64| if span > 0.0 { (v - v_min) / span } else { 0.0 };

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let (plot_area, bar_area) = root.split_vertically(style.height - COLOR_BAR_HEIGHT);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(20)
        .margin_top(50)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .draw_series(matrix.indexed_iter().map(|((roi, frame), &v)| {
            let x0 = frame as f64 / frame_rate;
            let x1 = (frame + 1) as f64 / frame_rate;
            let y1 = y_max - roi as f64;
            Rectangle::new([(x0, y1 - 1.0), (x1, y1)], hot_color(normalize(v)).filled())
        }))
        .map_err(plot_err)?;

    let scale = ColorScale::layout(&bar_area);
    scale.draw_gradient(&bar_area)?;

    // Text needs a system font; the cells and scale are kept without it.
    let annotated = (|| -> Result<()> {
        // ROI 0 is drawn at the top, so labels count down from y_max.
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Time (sec)")
            .y_desc("# roi")
            .x_labels(x_max.ceil() as usize + 1)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.0}", y_max - v))
            .draw()
            .map_err(plot_err)?;

        let (plot_width, _) = plot_area.dim_in_pixel();
        plot_area
            .draw_text(
                "df/f in ROIs",
                &TextStyle::from(("sans-serif", 24).into_font()).color(&BLACK),
                (plot_width as i32 / 2 - 60, 15),
            )
            .map_err(plot_err)?;

        scale.draw_labels(&bar_area, v_min, v_max)
    })();
    if let Err(e) = annotated {
        warn!(error = %e, "Heatmap labels could not be drawn");
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Pixel placement of the horizontal color scale inside its strip.
struct ColorScale {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl ColorScale {
    fn layout(area: &DrawingArea<BitMapBackend<'_>, Shift>) -> Self {
        let (width_px, _) = area.dim_in_pixel();
        Self {
            left: 80,
            right: (width_px as i32).saturating_sub(40),
            top: 15,
            bottom: 45,
        }
    }

    fn usable(&self) -> i32 {
        self.right - self.left
    }

    fn draw_gradient(&self, area: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()> {
        let usable = self.usable();
        if usable <= 1 {
            return Ok(());
        }
        for i in 0..usable {
            let frac = i as f64 / (usable - 1) as f64;
            area.draw(&Rectangle::new(
                [(self.left + i, self.top), (self.left + i + 1, self.bottom)],
                hot_color(frac).filled(),
            ))
            .map_err(plot_err)?;
        }
        area.draw(&Rectangle::new(
            [(self.left, self.top), (self.right, self.bottom)],
            BLACK.stroke_width(1),
        ))
        .map_err(plot_err)?;
        Ok(())
    }

    fn draw_labels(
        &self,
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        v_min: f64,
        v_max: f64,
    ) -> Result<()> {
        let usable = self.usable();
        if usable <= 1 {
            return Ok(());
        }
        let label_count = 5;
        let label_style = TextStyle::from(("sans-serif", 16).into_font()).color(&BLACK);
        for i in 0..label_count {
            let frac = i as f64 / (label_count - 1) as f64;
            let value = v_min + (v_max - v_min) * frac;
            let x = self.left + (frac * (usable - 1) as f64) as i32;
            area.draw_text(&format!("{:.2}", value), &label_style, (x - 12, self.bottom + 8))
                .map_err(plot_err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_color_endpoints() {
        assert_eq!(hot_color(0.0), RGBColor(0, 0, 0));
        assert_eq!(hot_color(1.0), RGBColor(255, 255, 255));
        let mid = hot_color(0.5);
        assert_eq!(mid.0, 255);
        assert_eq!(mid.2, 0);
    }

    #[test]
    fn test_value_range_ignores_nan() {
        let m = Array2::from_shape_vec((1, 3), vec![f64::NAN, -1.0, 2.0]).unwrap();
        assert_eq!(value_range(&m), (-1.0, 2.0));
    }
}
