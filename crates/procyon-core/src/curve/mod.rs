pub mod equalize;
pub mod piecewise;
pub mod spline;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::consts::{EPSILON, PARALLEL_SAMPLE_THRESHOLD};
use crate::error::{ProcyonError, Result};

pub use piecewise::PiecewiseParams;
pub use spline::{ControlPoint, ControlPointSet, NaturalCubicSpline};

/// Tone-curve mapping applied to a whole image buffer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveMethod {
    /// `alpha*(n-0.5) + 0.5 + beta` on normalized intensities, clipped.
    Linear { alpha: f32, beta: f32 },
    /// `1 / (1 + exp(-gain*(n-cutoff)))` on normalized intensities.
    Sigmoid { gain: f32, cutoff: f32 },
    /// `n^gamma` on normalized intensities.
    Gamma { gamma: f32 },
    /// 8-bit histogram equalization (luma channel for color images).
    Equalize,
    /// Natural cubic spline through normalized control points.
    CubicSpline(ControlPointSet),
    /// Three-segment linear stretch in the source intensity domain.
    PiecewiseLinear(PiecewiseParams),
}

/// Apply a tone curve, returning a new buffer with the input's dtype and shape.
pub fn apply(image: &ImageBuffer, method: &CurveMethod) -> Result<ImageBuffer> {
    if image.is_empty() {
        return Err(ProcyonError::EmptyImage);
    }

    match method {
        CurveMethod::Equalize => equalize::equalize(image),
        CurveMethod::PiecewiseLinear(params) => piecewise::piecewise_stretch(image, params),
        _ => apply_normalized(image, method),
    }
}

/// Common path for the methods that operate on [0,1]-normalized intensities:
/// normalize against the buffer's own min/max, map, rescale, re-quantize.
fn apply_normalized(image: &ImageBuffer, method: &CurveMethod) -> Result<ImageBuffer> {
    let (min_val, max_val) = sample_range(&image.data);
    let range = max_val - min_val;

    // Degenerate dynamic range: rescaling by a zero range would restore the
    // constant value anyway, so skip the pixel work entirely.
    if range.abs() < EPSILON {
        return Ok(image.clone());
    }

    let mapped = match method {
        CurveMethod::Linear { alpha, beta } => {
            let (alpha, beta) = (*alpha, *beta);
            map_samples(&image.data, move |v| {
                let n = (v - min_val) / range;
                let f = (alpha * (n - 0.5) + 0.5 + beta).clamp(0.0, 1.0);
                f * range + min_val
            })
        }
        CurveMethod::Sigmoid { gain, cutoff } => {
            let (gain, cutoff) = (*gain, *cutoff);
            map_samples(&image.data, move |v| {
                let n = (v - min_val) / range;
                let f = 1.0 / (1.0 + (-gain * (n - cutoff)).exp());
                f * range + min_val
            })
        }
        CurveMethod::Gamma { gamma } => {
            let gamma = *gamma;
            map_samples(&image.data, move |v| {
                let n = (v - min_val) / range;
                n.powf(gamma) * range + min_val
            })
        }
        CurveMethod::CubicSpline(points) => {
            // Spline coefficients are shared across the whole image: fit once,
            // evaluate per sample.
            let spline = NaturalCubicSpline::fit(points);
            map_samples(&image.data, move |v| {
                let n = (v - min_val) / range;
                spline.evaluate(n).clamp(0.0, 1.0) * range + min_val
            })
        }
        CurveMethod::Equalize | CurveMethod::PiecewiseLinear(_) => {
            unreachable!("equalize and piecewise are handled by apply")
        }
    };

    Ok(ImageBuffer::new(mapped, image.dtype).quantized())
}

/// Min and max over every sample in the buffer. Caller guarantees non-empty.
pub(crate) fn sample_range(data: &Array3<f32>) -> (f32, f32) {
    data.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

/// Map every sample through `f`, in parallel for large buffers.
pub(crate) fn map_samples(
    data: &Array3<f32>,
    f: impl Fn(f32) -> f32 + Send + Sync,
) -> Array3<f32> {
    let mut out = data.clone();
    if out.len() >= PARALLEL_SAMPLE_THRESHOLD {
        out.par_mapv_inplace(&f);
    } else {
        out.mapv_inplace(&f);
    }
    out
}
