use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcyonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load image {path}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image format error: {0}")]
    ImageFormat(#[from] image::ImageError),

    #[error("Empty image buffer")]
    EmptyImage,

    #[error("Invalid curve configuration: {0}")]
    InvalidCurveConfig(String),

    #[error("Equalize supports 1 or 3 channels, got {0}")]
    UnsupportedChannelLayout(usize),

    #[error("Host connection error: {0}")]
    HostConnection(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Step {step} failed: {message}")]
    Step { step: String, message: String },
}

pub type Result<T> = std::result::Result<T, ProcyonError>;
