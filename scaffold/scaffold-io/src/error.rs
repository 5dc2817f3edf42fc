//! Error types for region document I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for region document I/O.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing region documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown file format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// The document is structurally invalid.
    #[error("invalid document content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// The document's model data is inconsistent.
    #[error(transparent)]
    Model(#[from] scaffold_types::ModelError),

    /// JSON syntax or structure error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
