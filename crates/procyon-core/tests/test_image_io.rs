mod common;

use approx::assert_relative_eq;
use common::{make_gray_rgb, make_mono};
use ndarray::Array3;
use procyon_core::buffer::{ImageBuffer, SampleDtype};
use procyon_core::error::ProcyonError;
use procyon_core::io::image_io::{load_image, save_image};

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn test_roundtrip_mono_u8_png() {
    let input = make_mono(2, 2, &[0.0, 64.0, 128.0, 255.0], SampleDtype::U8);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mono.png");

    save_image(&input, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.dtype, SampleDtype::U8);
    assert_eq!((loaded.height(), loaded.width(), loaded.channels()), (2, 2, 1));
    assert_eq!(loaded.data, input.data);
}

#[test]
fn test_roundtrip_rgb_u8_tiff() {
    let input = make_gray_rgb(2, 2, &[10.0, 20.0, 30.0, 40.0], SampleDtype::U8);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rgb.tif");

    save_image(&input, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.dtype, SampleDtype::U8);
    assert_eq!(loaded.channels(), 3);
    assert_eq!(loaded.data, input.data);
}

#[test]
fn test_roundtrip_mono_u16_tiff() {
    let input = make_mono(2, 2, &[0.0, 256.0, 32_768.0, 65_535.0], SampleDtype::U16);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mono16.tif");

    save_image(&input, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.dtype, SampleDtype::U16);
    assert_eq!(loaded.data, input.data);
}

#[test]
fn test_roundtrip_rgb_f32_tiff() {
    let data = Array3::from_shape_fn((2, 2, 3), |(row, col, c)| {
        (row * 6 + col * 3 + c) as f32 / 11.0
    });
    let input = ImageBuffer::new(data, SampleDtype::F32);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("float.tif");

    save_image(&input, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    assert_eq!(loaded.dtype, SampleDtype::F32);
    for (a, b) in loaded.data.iter().zip(input.data.iter()) {
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }
}

// ---------------------------------------------------------------------------
// Saving quantizes out-of-grid samples
// ---------------------------------------------------------------------------

#[test]
fn test_save_rounds_and_clamps_u8() {
    let input = make_mono(2, 2, &[-3.0, 0.4, 100.6, 300.0], SampleDtype::U8);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clamped.png");

    save_image(&input, &path).unwrap();
    let loaded = load_image(&path).unwrap();

    let flat: Vec<f32> = loaded.data.iter().copied().collect();
    assert_eq!(flat, vec![0.0, 0.0, 101.0, 255.0]);
}

// ---------------------------------------------------------------------------
// Failure modes
// ---------------------------------------------------------------------------

#[test]
fn test_load_missing_file_reports_path() {
    let err = load_image(std::path::Path::new("/nonexistent/image.tif")).unwrap_err();
    match err {
        ProcyonError::ImageLoad { path, .. } => {
            assert_eq!(path, std::path::PathBuf::from("/nonexistent/image.tif"));
        }
        other => panic!("expected ImageLoad, got {other:?}"),
    }
}

#[test]
fn test_save_rejects_two_channel_buffer() {
    let data = Array3::<f32>::zeros((2, 2, 2));
    let input = ImageBuffer::new(data, SampleDtype::U8);
    let dir = tempfile::tempdir().unwrap();
    let err = save_image(&input, &dir.path().join("bad.png")).unwrap_err();
    assert!(matches!(err, ProcyonError::UnsupportedChannelLayout(2)));
}
