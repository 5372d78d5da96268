use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::curve::map_samples;
use crate::error::{ProcyonError, Result};

/// Breakpoints of the three-segment contrast stretch: `(r1, s1)` and
/// `(r2, s2)` in the source intensity domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseParams {
    pub r1: f32,
    pub s1: f32,
    pub r2: f32,
    pub s2: f32,
}

impl PiecewiseParams {
    /// Reject breakpoints that would divide by zero, before any pixel work.
    pub fn validate(&self) -> Result<()> {
        if self.r1 <= 0.0 {
            return Err(ProcyonError::InvalidCurveConfig(format!(
                "piecewise breakpoint r1 must be positive, got {}",
                self.r1
            )));
        }
        if self.r2 <= self.r1 {
            return Err(ProcyonError::InvalidCurveConfig(format!(
                "piecewise breakpoints must satisfy r2 > r1, got r1={} r2={}",
                self.r1, self.r2
            )));
        }
        Ok(())
    }
}

/// Three-segment linear mapping applied per sample in the source intensity
/// domain (no normalization). The ceiling is the dtype's maximum value.
pub(crate) fn piecewise_stretch(
    image: &ImageBuffer,
    params: &PiecewiseParams,
) -> Result<ImageBuffer> {
    params.validate()?;

    let PiecewiseParams { r1, s1, r2, s2 } = *params;
    let ceiling = image.dtype.max_value();

    let lower_slope = s1 / r1;
    let mid_slope = (s2 - s1) / (r2 - r1);
    // When r2 sits at (or above) the ceiling the upper segment is unreachable
    // for in-range samples; a zero slope keeps the expression finite.
    let upper_slope = if ceiling > r2 {
        (ceiling - s2) / (ceiling - r2)
    } else {
        0.0
    };

    let mapped = map_samples(&image.data, move |p| {
        if p <= r1 {
            lower_slope * p
        } else if p <= r2 {
            mid_slope * (p - r1) + s1
        } else {
            upper_slope * (p - r2) + s2
        }
    });

    Ok(ImageBuffer::new(mapped, image.dtype).quantized())
}
