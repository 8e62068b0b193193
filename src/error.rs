//! Error types for the chroma-key-removal crate.

/// Errors that can occur during background removal and compositing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A color string could not be parsed as `#rrggbb` hex.
    #[error("invalid hex color: {0:?}")]
    InvalidColor(String),

    /// A removal method name could not be parsed.
    #[error("unknown removal method: {0:?}")]
    UnknownMethod(String),

    /// An error occurred during image processing (decode, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
