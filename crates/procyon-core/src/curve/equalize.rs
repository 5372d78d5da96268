use ndarray::Array3;

use crate::buffer::ImageBuffer;
use crate::consts::{EPSILON, EQUALIZE_LEVELS, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::curve::sample_range;
use crate::error::{ProcyonError, Result};

// YCbCr chroma constants matching the BT.601 conversion the original
// processing chain used.
const CR_SCALE: f32 = 0.713;
const CB_SCALE: f32 = 0.564;
const R_FROM_CR: f32 = 1.403;
const G_FROM_CR: f32 = 0.714;
const G_FROM_CB: f32 = 0.344;
const B_FROM_CB: f32 = 1.773;
const CHROMA_OFFSET: f32 = 128.0;

/// Histogram equalization in an 8-bit intensity domain.
///
/// Mono buffers are equalized directly; 3-channel buffers are converted to
/// YCbCr, only the luma channel is equalized, and the result is recomposed.
/// Either way the output is rescaled into the source value range and dtype.
pub(crate) fn equalize(image: &ImageBuffer) -> Result<ImageBuffer> {
    let (min_val, max_val) = sample_range(&image.data);
    let range = max_val - min_val;
    if range.abs() < EPSILON {
        return Ok(image.clone());
    }

    let out = match image.channels() {
        1 => equalize_mono(image, min_val, range),
        3 => equalize_color(image, min_val, range),
        c => return Err(ProcyonError::UnsupportedChannelLayout(c)),
    };

    Ok(ImageBuffer::new(out, image.dtype).quantized())
}

fn equalize_mono(image: &ImageBuffer, min_val: f32, range: f32) -> Array3<f32> {
    let levels: Vec<u8> = image
        .data
        .iter()
        .map(|&v| to_eight_bit(v, min_val, range))
        .collect();
    let lut = equalization_lut(&levels);

    let mut out = image.data.clone();
    for (o, &l) in out.iter_mut().zip(levels.iter()) {
        *o = lut[l as usize] / 255.0 * range + min_val;
    }
    out
}

fn equalize_color(image: &ImageBuffer, min_val: f32, range: f32) -> Array3<f32> {
    let (h, w, _) = image.data.dim();

    // First pass: 8-bit luma for the histogram.
    let mut luma = vec![0u8; h * w];
    for row in 0..h {
        for col in 0..w {
            let r = to_eight_bit(image.data[[row, col, 0]], min_val, range) as f32;
            let g = to_eight_bit(image.data[[row, col, 1]], min_val, range) as f32;
            let b = to_eight_bit(image.data[[row, col, 2]], min_val, range) as f32;
            let y = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
            luma[row * w + col] = y.round().clamp(0.0, 255.0) as u8;
        }
    }
    let lut = equalization_lut(&luma);

    // Second pass: remap luma, keep chroma, recompose RGB.
    let mut out = Array3::<f32>::zeros((h, w, 3));
    for row in 0..h {
        for col in 0..w {
            let r = to_eight_bit(image.data[[row, col, 0]], min_val, range) as f32;
            let g = to_eight_bit(image.data[[row, col, 1]], min_val, range) as f32;
            let b = to_eight_bit(image.data[[row, col, 2]], min_val, range) as f32;
            let y = LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b;
            let cr = (r - y) * CR_SCALE + CHROMA_OFFSET;
            let cb = (b - y) * CB_SCALE + CHROMA_OFFSET;

            let y_eq = lut[luma[row * w + col] as usize];
            let r_eq = y_eq + R_FROM_CR * (cr - CHROMA_OFFSET);
            let g_eq = y_eq - G_FROM_CR * (cr - CHROMA_OFFSET) - G_FROM_CB * (cb - CHROMA_OFFSET);
            let b_eq = y_eq + B_FROM_CB * (cb - CHROMA_OFFSET);

            out[[row, col, 0]] = r_eq.clamp(0.0, 255.0) / 255.0 * range + min_val;
            out[[row, col, 1]] = g_eq.clamp(0.0, 255.0) / 255.0 * range + min_val;
            out[[row, col, 2]] = b_eq.clamp(0.0, 255.0) / 255.0 * range + min_val;
        }
    }
    out
}

fn to_eight_bit(v: f32, min_val: f32, range: f32) -> u8 {
    ((v - min_val) / range * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Classic CDF-based equalization lookup table over 8-bit levels.
fn equalization_lut(levels: &[u8]) -> Vec<f32> {
    let mut histogram = [0usize; EQUALIZE_LEVELS];
    for &l in levels {
        histogram[l as usize] += 1;
    }

    let total = levels.len();
    let mut cdf = [0usize; EQUALIZE_LEVELS];
    let mut acc = 0usize;
    for (i, &count) in histogram.iter().enumerate() {
        acc += count;
        cdf[i] = acc;
    }
    let cdf_min = cdf
        .iter()
        .copied()
        .find(|&c| c > 0)
        .unwrap_or(0);

    // Caller has already excluded degenerate buffers, so total > cdf_min
    // whenever more than one level is populated.
    let denom = (total - cdf_min).max(1) as f64;
    cdf.iter()
        .map(|&c| ((c.saturating_sub(cdf_min)) as f64 / denom * 255.0).round() as f32)
        .collect()
}
