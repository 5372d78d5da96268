use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Storage type of the original image samples.
///
/// Buffers always hold `f32` internally; the dtype records what the samples
/// were decoded from, so curve output can be re-quantized losslessly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleDtype {
    U8,
    U16,
    F32,
}

impl SampleDtype {
    /// Largest representable sample value (1.0 for float buffers).
    pub fn max_value(self) -> f32 {
        match self {
            Self::U8 => 255.0,
            Self::U16 => 65_535.0,
            Self::F32 => 1.0,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Self::F32)
    }
}

/// A single image in memory.
///
/// Sample data is stored row-major, shape = (height, width, channels), with
/// values in the dtype's native range (0..=255 for U8, 0..=65535 for U16).
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    pub data: Array3<f32>,
    pub dtype: SampleDtype,
}

impl ImageBuffer {
    pub fn new(data: Array3<f32>, dtype: SampleDtype) -> Self {
        Self { data, dtype }
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snap samples back onto the dtype's representable grid.
    ///
    /// Integer dtypes are rounded and clipped to their range; float buffers
    /// pass through unclipped.
    pub fn quantized(mut self) -> Self {
        if self.dtype.is_integer() {
            let max = self.dtype.max_value();
            self.data.mapv_inplace(|v| v.round().clamp(0.0, max));
        }
        self
    }
}
