//! Unified error type for brandkit.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The source image does not exist.
    #[error("source image not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding, transforming or encoding an image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An external tool could not be run or exited unsuccessfully.
    #[error("{tool} failed: {message}")]
    Tool {
        /// The program name.
        tool: String,
        /// What went wrong.
        message: String,
    },

    /// The selected backend cannot express the requested operation.
    #[error("{backend} cannot {operation}")]
    Unsupported {
        /// The backend name.
        backend: String,
        /// Short description of the operation.
        operation: String,
    },
}
