use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;
use tiff::encoder::{colortype, TiffEncoder};

use dfbyf_core::frame::Frame;

/// `count` frames of size `h x w`, every pixel set to `value`.
pub fn constant_frames(h: usize, w: usize, count: usize, value: f32) -> Vec<Frame> {
    (0..count)
        .map(|i| Frame::new(Array2::from_elem((h, w), value), i))
        .collect()
}

/// Frames built from a per-frame intensity list, uniform within each frame.
pub fn frames_from_levels(h: usize, w: usize, levels: &[f32]) -> Vec<Frame> {
    levels
        .iter()
        .enumerate()
        .map(|(i, &v)| Frame::new(Array2::from_elem((h, w), v), i))
        .collect()
}

/// Write a multi-page 16-bit grayscale TIFF, one page per entry of `pages`.
///
/// Each page is `h x w` in row-major order.
pub fn write_tiff_stack(path: &Path, w: u32, h: u32, pages: &[Vec<u16>]) {
    let file = File::create(path).expect("create tiff");
    let mut writer = BufWriter::new(file);
    let mut encoder = TiffEncoder::new(&mut writer).expect("tiff encoder");
    for page in pages {
        encoder
            .write_image::<colortype::Gray16>(w, h, page)
            .expect("write tiff page");
    }
    drop(encoder);
    writer.flush().expect("flush tiff");
}

/// Write an ROI CSV with a header line.
pub fn write_roi_csv(path: &Path, rows: &[(f64, f64, f64)]) {
    let mut contents = String::from("column,row,radius\n");
    for (c, r, rad) in rows {
        contents.push_str(&format!("{},{},{}\n", c, r, rad));
    }
    std::fs::write(path, contents).expect("write roi csv");
}
