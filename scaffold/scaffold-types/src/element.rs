//! Finite element shapes and elements.

use std::fmt;

/// The shape of a finite element.
///
/// Shapes determine the element's dimension, its node count, and the
/// interpolation basis used by field evaluation.
///
/// # Example
///
/// ```
/// use scaffold_types::ElementShape;
///
/// assert_eq!(ElementShape::Hexahedron.dimension(), 3);
/// assert_eq!(ElementShape::Hexahedron.node_count(), 8);
/// assert_eq!(ElementShape::from_token("triangle"), Some(ElementShape::Triangle));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementShape {
    /// A 1D line element with 2 nodes.
    Line,
    /// A 2D simplex element with 3 nodes.
    Triangle,
    /// A 2D tensor-product element with 4 nodes.
    Quad,
    /// A 3D simplex element with 4 nodes.
    Tetrahedron,
    /// A 3D tensor-product element with 8 nodes.
    Hexahedron,
}

impl ElementShape {
    /// Get the topological dimension of the shape (1-3).
    #[inline]
    #[must_use]
    pub const fn dimension(self) -> u8 {
        match self {
            Self::Line => 1,
            Self::Triangle | Self::Quad => 2,
            Self::Tetrahedron | Self::Hexahedron => 3,
        }
    }

    /// Get the number of nodes the shape interpolates over.
    #[inline]
    #[must_use]
    pub const fn node_count(self) -> usize {
        match self {
            Self::Line => 2,
            Self::Triangle => 3,
            Self::Quad | Self::Tetrahedron => 4,
            Self::Hexahedron => 8,
        }
    }

    /// Whether the shape's reference domain is a simplex.
    ///
    /// Simplex local coordinates satisfy `xi_i >= 0` and `sum(xi) <= 1`;
    /// tensor-product local coordinates live in the unit box.
    #[inline]
    #[must_use]
    pub const fn is_simplex(self) -> bool {
        matches!(self, Self::Triangle | Self::Tetrahedron)
    }

    /// Get the stable lowercase token used in serialized documents.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Triangle => "triangle",
            Self::Quad => "quad",
            Self::Tetrahedron => "tetrahedron",
            Self::Hexahedron => "hexahedron",
        }
    }

    /// Parse a shape from its serialized token.
    ///
    /// Returns `None` for unrecognized tokens.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "line" => Some(Self::Line),
            "triangle" => Some(Self::Triangle),
            "quad" => Some(Self::Quad),
            "tetrahedron" => Some(Self::Tetrahedron),
            "hexahedron" => Some(Self::Hexahedron),
            _ => None,
        }
    }
}

impl fmt::Display for ElementShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A finite element: a shape plus the node indices it interpolates over.
///
/// Node ordering follows the crate convention (see the crate docs): simplex
/// shapes list the origin node first, tensor-product shapes use lexicographic
/// local-coordinate order.
///
/// # Example
///
/// ```
/// use scaffold_types::{Element, ElementShape};
///
/// let element = Element::new(ElementShape::Triangle, vec![0, 1, 2]);
/// assert_eq!(element.shape, ElementShape::Triangle);
/// assert_eq!(element.nodes.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The element's shape.
    pub shape: ElementShape,
    /// Node indices, `shape.node_count()` of them.
    pub nodes: Vec<u32>,
}

impl Element {
    /// Create a new element.
    ///
    /// Arity and node bounds are validated when the element is added to a
    /// [`FeMesh`](crate::FeMesh), not here.
    #[inline]
    #[must_use]
    pub const fn new(shape: ElementShape, nodes: Vec<u32>) -> Self {
        Self { shape, nodes }
    }

    /// Get the element's topological dimension.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> u8 {
        self.shape.dimension()
    }
}
