//! Element locations.

/// A location within an element: the element index plus local coordinates.
///
/// The `xi` components beyond the element's dimension are zero. Local
/// coordinates live in the element's reference domain: the unit box for
/// tensor-product shapes, the unit simplex for triangles and tetrahedra.
///
/// # Example
///
/// ```
/// use scaffold_field::ElementLocation;
///
/// let location = ElementLocation::new(3, [0.5, 0.25, 0.0]);
/// assert_eq!(location.element, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementLocation {
    /// Index of the element in its mesh.
    pub element: u32,
    /// Local coordinates within the element's reference domain.
    pub xi: [f64; 3],
}

impl ElementLocation {
    /// Create a new element location.
    #[inline]
    #[must_use]
    pub const fn new(element: u32, xi: [f64; 3]) -> Self {
        Self { element, xi }
    }
}
