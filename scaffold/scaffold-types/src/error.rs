//! Error types for model construction and merging.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur when building or merging model regions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// An element references a node outside the mesh's node pool.
    #[error("element node index {node} out of bounds for {node_count} nodes")]
    NodeOutOfBounds {
        /// The offending node index.
        node: u32,
        /// Number of nodes in the mesh.
        node_count: usize,
    },

    /// An element has the wrong number of nodes for its shape.
    #[error("{shape} element needs {expected} nodes, got {got}")]
    ElementArity {
        /// The element shape name.
        shape: &'static str,
        /// Required node count for the shape.
        expected: usize,
        /// Node count supplied.
        got: usize,
    },

    /// A field has an invalid number of components.
    #[error("field '{name}' has {components} components, expected 1 to 3")]
    InvalidComponentCount {
        /// The field name.
        name: String,
        /// The component count supplied.
        components: usize,
    },

    /// A field's value count does not match the owning node or point pool.
    #[error("field '{name}' has {actual} values, expected {expected}")]
    FieldLength {
        /// The field name.
        name: String,
        /// Expected value count.
        expected: usize,
        /// Actual value count.
        actual: usize,
    },

    /// A field with the same name already exists in the region.
    #[error("field '{name}' already exists")]
    DuplicateField {
        /// The duplicated field name.
        name: String,
    },

    /// A group with the same name already exists in the region.
    #[error("group '{name}' already exists")]
    DuplicateGroup {
        /// The duplicated group name.
        name: String,
    },

    /// A referenced field was not found.
    #[error("field '{name}' not found")]
    FieldNotFound {
        /// The missing field name.
        name: String,
    },

    /// Two regions cannot be merged because their meshes differ.
    #[error("cannot merge regions: {reason}")]
    TopologyMismatch {
        /// Description of the mismatch.
        reason: String,
    },
}
