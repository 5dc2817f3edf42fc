//! Error types for the embedder.

use thiserror::Error;

/// Result type for embedder operations.
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Errors that can occur while configuring or running a
/// [`DataEmbedder`](crate::DataEmbedder).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmbedError {
    /// A document could not be read or written.
    #[error(transparent)]
    Io(#[from] scaffold_io::IoError),

    /// A model inconsistency, e.g. merging mismatched documents.
    #[error(transparent)]
    Model(#[from] scaffold_types::ModelError),

    /// A field evaluation or location search failed.
    #[error(transparent)]
    Field(#[from] scaffold_field::FieldError),

    /// A settings document could not be parsed or written.
    #[error("invalid settings document: {0}")]
    Settings(#[from] serde_json::Error),

    /// An operation needs loaded documents; call `load` first.
    #[error("documents not loaded")]
    NotLoaded,

    /// The output was requested before it was generated.
    #[error("output not generated")]
    NotGenerated,

    /// A referenced field does not exist in the loaded documents.
    #[error("field '{name}' not found")]
    FieldNotFound {
        /// The missing field name.
        name: String,
    },

    /// A referenced group does not exist in the group catalog.
    #[error("no group of name '{name}'")]
    GroupNotFound {
        /// The missing group name.
        name: String,
    },

    /// A required coordinates field was never resolved.
    #[error("no coordinates field resolved for the {region} region")]
    MissingCoordinatesField {
        /// Which region lacks a coordinates field.
        region: &'static str,
    },
}
