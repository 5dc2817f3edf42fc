//! Error types for field evaluation.

use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur during field evaluation and location search.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FieldError {
    /// An element location references an element outside the mesh.
    #[error("element index {element} out of bounds for {element_count} elements")]
    ElementOutOfBounds {
        /// The offending element index.
        element: u32,
        /// Number of elements in the mesh.
        element_count: usize,
    },

    /// The host mesh has no elements to search.
    #[error("host mesh has no elements")]
    EmptyHostMesh,

    /// The field is inconsistent with the mesh it is evaluated over.
    #[error(transparent)]
    Model(#[from] scaffold_types::ModelError),
}
