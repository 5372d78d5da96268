use std::path::Path;

use image::{DynamicImage, ImageFormat, Luma, Rgb};
use ndarray::Array3;

use crate::buffer::{ImageBuffer, SampleDtype};
use crate::error::{ProcyonError, Result};

/// Load an image preserving its sample dtype and channel layout.
///
/// Luma8/Rgb8 decode as U8, Luma16/Rgb16 as U16, float TIFF as F32; alpha
/// channels are dropped. Anything else falls back to a 16-bit RGB decode.
pub fn load_image(path: &Path) -> Result<ImageBuffer> {
    let img = image::open(path).map_err(|source| ProcyonError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let buffer = match img {
        DynamicImage::ImageLuma8(gray) => {
            let (w, h) = gray.dimensions();
            from_samples(h, w, 1, SampleDtype::U8, |row, col, _| {
                gray.get_pixel(col as u32, row as u32).0[0] as f32
            })
        }
        DynamicImage::ImageLuma16(gray) => {
            let (w, h) = gray.dimensions();
            from_samples(h, w, 1, SampleDtype::U16, |row, col, _| {
                gray.get_pixel(col as u32, row as u32).0[0] as f32
            })
        }
        DynamicImage::ImageRgb8(rgb) => {
            let (w, h) = rgb.dimensions();
            from_samples(h, w, 3, SampleDtype::U8, |row, col, c| {
                rgb.get_pixel(col as u32, row as u32).0[c] as f32
            })
        }
        DynamicImage::ImageRgb16(rgb) => {
            let (w, h) = rgb.dimensions();
            from_samples(h, w, 3, SampleDtype::U16, |row, col, c| {
                rgb.get_pixel(col as u32, row as u32).0[c] as f32
            })
        }
        DynamicImage::ImageRgb32F(rgb) => {
            let (w, h) = rgb.dimensions();
            from_samples(h, w, 3, SampleDtype::F32, |row, col, c| {
                rgb.get_pixel(col as u32, row as u32).0[c]
            })
        }
        other => {
            let rgb = other.to_rgb16();
            let (w, h) = rgb.dimensions();
            from_samples(h, w, 3, SampleDtype::U16, |row, col, c| {
                rgb.get_pixel(col as u32, row as u32).0[c] as f32
            })
        }
    };

    Ok(buffer)
}

fn from_samples(
    h: u32,
    w: u32,
    channels: usize,
    dtype: SampleDtype,
    sample: impl Fn(usize, usize, usize) -> f32,
) -> ImageBuffer {
    let mut data = Array3::<f32>::zeros((h as usize, w as usize, channels));
    for row in 0..h as usize {
        for col in 0..w as usize {
            for c in 0..channels {
                data[[row, col, c]] = sample(row, col, c);
            }
        }
    }
    ImageBuffer::new(data, dtype)
}

/// Save a buffer preserving its dtype, choosing format from the extension
/// (PNG for .png, TIFF otherwise — TIFF is the lossless interchange format).
pub fn save_image(buffer: &ImageBuffer, path: &Path) -> Result<()> {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => ImageFormat::Png,
        _ => ImageFormat::Tiff,
    };

    let h = buffer.height();
    let w = buffer.width();

    match (buffer.dtype, buffer.channels()) {
        (SampleDtype::U8, 1) => {
            let pixels: Vec<u8> = buffer
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 255.0) as u8)
                .collect();
            let img = image::ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w as u32, h as u32, pixels)
                .expect("buffer size matches dimensions");
            img.save_with_format(path, format)?;
        }
        (SampleDtype::U8, 3) => {
            let pixels: Vec<u8> = buffer
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 255.0) as u8)
                .collect();
            let img = image::ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(w as u32, h as u32, pixels)
                .expect("buffer size matches dimensions");
            img.save_with_format(path, format)?;
        }
        (SampleDtype::U16, 1) => {
            let pixels: Vec<u16> = buffer
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 65_535.0) as u16)
                .collect();
            let img =
                image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
                    .expect("buffer size matches dimensions");
            img.save_with_format(path, format)?;
        }
        (SampleDtype::U16, 3) => {
            let pixels: Vec<u16> = buffer
                .data
                .iter()
                .map(|&v| v.round().clamp(0.0, 65_535.0) as u16)
                .collect();
            let img = image::ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
                .expect("buffer size matches dimensions");
            img.save_with_format(path, format)?;
        }
        // Float buffers go out as 32-bit float TIFF; a mono float buffer is
        // replicated across RGB since the encoder has no float gray layout.
        (SampleDtype::F32, 1) => {
            let mut pixels = Vec::with_capacity(h * w * 3);
            for &v in buffer.data.iter() {
                pixels.extend_from_slice(&[v, v, v]);
            }
            let img = image::ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(w as u32, h as u32, pixels)
                .expect("buffer size matches dimensions");
            img.save_with_format(path, ImageFormat::Tiff)?;
        }
        (SampleDtype::F32, 3) => {
            let pixels: Vec<f32> = buffer.data.iter().copied().collect();
            let img = image::ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(w as u32, h as u32, pixels)
                .expect("buffer size matches dimensions");
            img.save_with_format(path, ImageFormat::Tiff)?;
        }
        (_, c) => return Err(ProcyonError::UnsupportedChannelLayout(c)),
    }

    Ok(())
}
