/// Minimum sample count (h*w*c) to use Rayon parallelism for per-sample maps.
pub const PARALLEL_SAMPLE_THRESHOLD: usize = 65_536;

/// Small epsilon for degenerate dynamic-range detection.
pub const EPSILON: f32 = 1e-10;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of intensity levels used for histogram equalization (8-bit domain).
pub const EQUALIZE_LEVELS: usize = 256;

/// Default crop margin as a fraction of each dimension, removed per side.
pub const DEFAULT_CROP_MARGIN: f32 = 0.07;

/// Host-side name of the starless intermediate used around star recombination.
pub const STARLESS_RESULT: &str = "starless_result";

/// Host-side name of the stretched star-mask intermediate.
pub const STARMASK_RESULT: &str = "starmask_result";

/// File-name prefix the star-separation tool gives the companion star mask.
pub const STARMASK_PREFIX: &str = "starmask_";
