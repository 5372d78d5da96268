use ndarray::Array3;

use procyon_core::buffer::{ImageBuffer, SampleDtype};
use procyon_core::io::image_io::save_image;

/// Build a mono buffer from row-major sample values.
pub fn make_mono(h: usize, w: usize, values: &[f32], dtype: SampleDtype) -> ImageBuffer {
    assert_eq!(values.len(), h * w, "value count must match dimensions");
    let data = Array3::from_shape_vec((h, w, 1), values.to_vec()).unwrap();
    ImageBuffer::new(data, dtype)
}

/// Build a gray RGB buffer (all three channels equal) from row-major values.
pub fn make_gray_rgb(h: usize, w: usize, values: &[f32], dtype: SampleDtype) -> ImageBuffer {
    assert_eq!(values.len(), h * w, "value count must match dimensions");
    let mut data = Array3::<f32>::zeros((h, w, 3));
    for row in 0..h {
        for col in 0..w {
            for c in 0..3 {
                data[[row, col, c]] = values[row * w + col];
            }
        }
    }
    ImageBuffer::new(data, dtype)
}

/// Write a buffer into `dir` under `name` and return the full path.
///
/// The file lives as long as the caller keeps the temp dir alive.
pub fn write_test_image(
    dir: &tempfile::TempDir,
    name: &str,
    buffer: &ImageBuffer,
) -> std::path::PathBuf {
    let path = dir.path().join(name);
    save_image(buffer, &path).expect("write test image");
    path
}
