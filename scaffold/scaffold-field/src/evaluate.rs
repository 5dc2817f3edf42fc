//! Field evaluation at element locations.

use nalgebra::Point3;
use scaffold_types::{FeMesh, NodeField};

use crate::basis::shape_weights;
use crate::error::{FieldError, FieldResult};
use crate::location::ElementLocation;

/// Interpolate a node field at an element location.
///
/// Components beyond the field's count are zero.
///
/// # Errors
///
/// Returns [`FieldError::ElementOutOfBounds`] if the location's element is
/// not in the mesh, or a length error if the field does not cover the mesh's
/// node pool.
///
/// # Example
///
/// ```
/// use scaffold_field::{evaluate_field, ElementLocation};
/// use scaffold_types::{Element, ElementShape, FeMesh, NodeField};
///
/// let mut mesh = FeMesh::new(2);
/// mesh.add_element(Element::new(ElementShape::Line, vec![0, 1])).unwrap();
/// let field = NodeField::from_values(
///     "temperature", 1, false,
///     vec![[10.0, 0.0, 0.0], [30.0, 0.0, 0.0]],
/// ).unwrap();
///
/// let value = evaluate_field(&mesh, &field, &ElementLocation::new(0, [0.5, 0.0, 0.0]));
/// assert!((value.unwrap()[0] - 20.0).abs() < 1e-12);
/// ```
pub fn evaluate_field(
    mesh: &FeMesh,
    field: &NodeField,
    location: &ElementLocation,
) -> FieldResult<[f64; 3]> {
    field.validate_len(mesh.node_count())?;
    let element = mesh
        .element(location.element)
        .ok_or(FieldError::ElementOutOfBounds {
            element: location.element,
            element_count: mesh.element_count(),
        })?;

    let weights = shape_weights(element.shape, location.xi);
    let mut value = [0.0; 3];
    for (i, &node) in element.nodes.iter().enumerate() {
        let v = field.value(node as usize).unwrap_or_default();
        value[0] += weights[i] * v[0];
        value[1] += weights[i] * v[1];
        value[2] += weights[i] * v[2];
    }
    Ok(value)
}

/// Interpolate a coordinate field at an element location, as a point.
///
/// # Errors
///
/// Same as [`evaluate_field`].
pub fn evaluate_point(
    mesh: &FeMesh,
    field: &NodeField,
    location: &ElementLocation,
) -> FieldResult<Point3<f64>> {
    let v = evaluate_field(mesh, field, location)?;
    Ok(Point3::new(v[0], v[1], v[2]))
}
