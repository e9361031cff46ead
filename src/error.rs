use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("Failed to decode pixel data: {0}")]
    PixelData(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    /// Folder paths are persisted one per line, so line breaks cannot be stored.
    #[error("Folder path cannot be registered: {}", .0.display())]
    InvalidFolder(PathBuf),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
