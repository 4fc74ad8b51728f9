//! Error types for backend operations.

use std::path::PathBuf;
use thiserror::Error;

use super::ImageId;
use crate::wire::WireError;

/// Errors that can occur while loading, saving or exporting annotations.
#[derive(Error, Debug)]
pub enum BackendError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Annotation payload could not be read
    #[error("Invalid annotation payload: {0}")]
    Wire(#[from] WireError),

    /// No image with this id is known
    #[error("Image not found: {id}")]
    ImageNotFound {
        /// The requested image id
        id: ImageId,
    },

    /// Image file could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File is not an accepted image type
    #[error("Unsupported image {path:?}: {reason}")]
    UnsupportedImage {
        /// The rejected file
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// Image dimensions required but not available
    #[error("Image dimensions required for format '{format}' but not available for image {image}")]
    MissingDimensions {
        /// The format requiring dimensions
        format: String,
        /// The image missing dimensions
        image: ImageId,
    },

    /// Export destination could not be used
    #[error("Invalid export destination: {path:?}")]
    InvalidDestination {
        /// The rejected path
        path: PathBuf,
    },

    /// The remote side rejected or failed the request
    #[error("Request failed: {message}")]
    Transport {
        /// Description of the failure
        message: String,
    },
}

impl BackendError {
    /// Create a transport error with a message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create an unsupported image error.
    pub fn unsupported_image(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedImage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing dimensions error.
    pub fn missing_dimensions(format: impl Into<String>, image: ImageId) -> Self {
        Self::MissingDimensions {
            format: format.into(),
            image,
        }
    }
}
