use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use num_traits::AsPrimitive;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;
use tracing::{debug, info};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, TIFF_EXTENSIONS};
use crate::error::{DfbyfError, Result};
use crate::frame::Frame;

fn has_tiff_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            TIFF_EXTENSIONS
                .iter()
                .any(|ext| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Resolve the input path into the list of image files to process.
///
/// A directory yields its `.tif`/`.tiff` files (not recursive), sorted by
/// path. Any other path is returned as-is.
pub fn collect_input_files(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && has_tiff_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(DfbyfError::NoInputFiles(input.to_path_buf()));
    }
    info!(count = files.len(), dir = %input.display(), "Found image files");
    Ok(files)
}

/// Decode every frame of an image file, in file order.
///
/// TIFF files are read page by page; other formats are decoded with the
/// `image` crate as a single frame.
pub fn read_frames(path: &Path) -> Result<Vec<Frame>> {
    let frames = if has_tiff_extension(path) {
        read_tiff_frames(path)?
    } else {
        vec![load_image(path)?]
    };

    check_frame_shapes(&frames)?;
    debug!(path = %path.display(), frames = frames.len(), "Decoded frames");
    Ok(frames)
}

/// Ensure a sequence is non-empty and every frame shares the first one's shape.
pub fn check_frame_shapes(frames: &[Frame]) -> Result<()> {
    let first = frames.first().ok_or(DfbyfError::EmptySequence)?;
    let (height, width) = first.dim();
    for (index, frame) in frames.iter().enumerate().skip(1) {
        let (actual_height, actual_width) = frame.dim();
        if (actual_height, actual_width) != (height, width) {
            return Err(DfbyfError::FrameShapeMismatch {
                index,
                height,
                width,
                actual_height,
                actual_width,
            });
        }
    }
    Ok(())
}

/// Read all pages of a (possibly multi-page) TIFF stack.
pub fn read_tiff_frames(path: &Path) -> Result<Vec<Frame>> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;

    let mut frames = Vec::new();
    loop {
        let (width, height) = decoder.dimensions()?;
        let color_type = decoder.colortype()?;
        let page = decoder.read_image()?;
        let data = match page {
            DecodingResult::U8(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::U16(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::U32(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::U64(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::I8(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::I16(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::I32(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::I64(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::F32(buf) => page_to_array(&buf, width, height, color_type)?,
            DecodingResult::F64(buf) => page_to_array(&buf, width, height, color_type)?,
            #[allow(unreachable_patterns)]
            _ => {
                return Err(DfbyfError::UnsupportedSampleFormat(format!(
                    "{:?} page {} in {}",
                    color_type,
                    frames.len(),
                    path.display()
                )))
            }
        };
        frames.push(Frame::new(data, frames.len()));

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    Ok(frames)
}

/// Convert one decoded TIFF page into an intensity array.
///
/// Gray samples are kept as-is; RGB(A) pages are reduced to luminance and
/// extra channels (alpha) are dropped.
fn page_to_array<T: AsPrimitive<f32>>(
    buf: &[T],
    width: u32,
    height: u32,
    color_type: ColorType,
) -> Result<Array2<f32>> {
    let channels = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(DfbyfError::UnsupportedSampleFormat(format!(
                "{:?} color type",
                other
            )))
        }
    };

    let (w, h) = (width as usize, height as usize);
    let expected = w * h * channels;
    if buf.len() < expected {
        return Err(DfbyfError::UnsupportedSampleFormat(format!(
            "page buffer holds {} samples, expected {}",
            buf.len(),
            expected
        )));
    }

    let pixels: Vec<f32> = buf[..expected]
        .chunks_exact(channels)
        .map(|px| match channels {
            1 | 2 => px[0].as_(),
            _ => {
                LUMINANCE_R * px[0].as_() + LUMINANCE_G * px[1].as_() + LUMINANCE_B * px[2].as_()
            }
        })
        .collect();

    Array2::from_shape_vec((h, w), pixels)
        .map_err(|e| DfbyfError::UnsupportedSampleFormat(e.to_string()))
}

/// Load a non-TIFF raster as a single 16-bit luminance frame.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32;
        }
    }

    Ok(Frame::new(data, 0))
}
