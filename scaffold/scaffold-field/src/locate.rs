//! Nearest-location search over a host mesh.

use std::cmp::Ordering;

use nalgebra::{Matrix3, Point3, Vector3};
use scaffold_types::{Aabb, Element, ElementShape, FeMesh, NodeField};
use tracing::debug;

use crate::basis::{clamp_xi, shape_weight_derivatives, shape_weights, MAX_ELEMENT_NODES};
use crate::error::{FieldError, FieldResult};
use crate::location::ElementLocation;

const MAX_NEWTON_ITERATIONS: usize = 48;
const STEP_TOLERANCE: f64 = 1e-12;
const MAX_STEP: f64 = 0.5;

/// The result of a nearest-location search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoundLocation {
    /// The element location nearest to the query point.
    pub location: ElementLocation,
    /// The host coordinates at that location.
    pub point: Point3<f64>,
    /// Distance from the query point to `point`.
    ///
    /// Zero (to tolerance) for points inside the host; positive for points
    /// projected onto the host boundary.
    pub distance: f64,
}

/// Nearest-location search over a host mesh's coordinate field.
///
/// The locator searches the elements of the mesh's highest dimension. Each
/// element's node positions bound it (multilinear interpolation stays inside
/// the nodes' convex hull), so candidates are culled and visited in order of
/// bounding-box distance.
///
/// Per element, the nearest local coordinates are found in closed form for
/// lines and triangles, and by clamped Gauss-Newton iteration from several
/// fixed starts for quadrilaterals, tetrahedra, and hexahedra.
///
/// # Example
///
/// ```
/// use scaffold_field::HostLocator;
/// use scaffold_types::{Element, ElementShape, FeMesh, NodeField, Point3};
///
/// let mut mesh = FeMesh::new(3);
/// mesh.add_element(Element::new(ElementShape::Triangle, vec![0, 1, 2])).unwrap();
/// let field = NodeField::from_values(
///     "coordinates", 3, true,
///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
/// ).unwrap();
///
/// let locator = HostLocator::new(&mesh, &field).unwrap();
/// let found = locator.find_nearest(&Point3::new(0.25, 0.25, 1.0)).unwrap();
/// assert!((found.distance - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct HostLocator<'a> {
    mesh: &'a FeMesh,
    field: &'a NodeField,
    candidates: Vec<(u32, Aabb)>,
}

impl<'a> HostLocator<'a> {
    /// Build a locator over the mesh's highest-dimension elements.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmptyHostMesh`] if the mesh has no elements, or
    /// a length error if the field does not cover the mesh's node pool.
    pub fn new(mesh: &'a FeMesh, field: &'a NodeField) -> FieldResult<Self> {
        field.validate_len(mesh.node_count())?;
        let dimension = mesh.max_dimension().ok_or(FieldError::EmptyHostMesh)?;

        let mut candidates = Vec::new();
        for (index, element) in mesh.elements_of_dimension(dimension) {
            let mut bounds = Aabb::empty();
            for &node in &element.nodes {
                if let Some(point) = field.point(node as usize) {
                    bounds.expand_to_include(&point);
                }
            }
            candidates.push((index, bounds));
        }

        debug!(
            elements = candidates.len(),
            dimension,
            field = field.name(),
            "host locator built"
        );
        Ok(Self {
            mesh,
            field,
            candidates,
        })
    }

    /// Get the number of candidate elements the locator searches.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.candidates.len()
    }

    /// Find the element location nearest to a query point.
    ///
    /// Returns `None` only when the locator has no candidate elements, which
    /// [`HostLocator::new`] rules out for non-empty meshes.
    #[must_use]
    pub fn find_nearest(&self, point: &Point3<f64>) -> Option<FoundLocation> {
        // visit candidates nearest-bounds first; index breaks ties so the
        // search order is deterministic
        let mut order: Vec<(f64, u32)> = self
            .candidates
            .iter()
            .map(|(index, bounds)| (bounds.distance_squared_to(point), *index))
            .collect();
        order.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        let mut best: Option<(f64, ElementLocation, Point3<f64>)> = None;
        for (bound_distance_sq, index) in order {
            if let Some((best_distance_sq, _, _)) = best {
                if bound_distance_sq > best_distance_sq {
                    break;
                }
            }
            let Some(element) = self.mesh.element(index) else {
                continue;
            };
            let (xi, nearest) = self.nearest_on_element(element, point);
            let distance_sq = (nearest - point).norm_squared();
            if best.is_none_or(|(d, _, _)| distance_sq < d) {
                best = Some((distance_sq, ElementLocation::new(index, xi), nearest));
            }
        }

        best.map(|(distance_sq, location, nearest)| FoundLocation {
            location,
            point: nearest,
            distance: distance_sq.sqrt(),
        })
    }

    fn element_points(&self, element: &Element) -> [Point3<f64>; MAX_ELEMENT_NODES] {
        let mut points = [Point3::origin(); MAX_ELEMENT_NODES];
        for (i, &node) in element.nodes.iter().enumerate() {
            if let Some(point) = self.field.point(node as usize) {
                points[i] = point;
            }
        }
        points
    }

    fn nearest_on_element(&self, element: &Element, point: &Point3<f64>) -> ([f64; 3], Point3<f64>) {
        let points = self.element_points(element);
        match element.shape {
            ElementShape::Line => nearest_on_segment(point, points[0], points[1]),
            ElementShape::Triangle => {
                let (xi2, nearest) = closest_point_triangle(point, points[0], points[1], points[2]);
                ([xi2[0], xi2[1], 0.0], nearest)
            }
            shape => newton_nearest(shape, &points, point),
        }
    }
}

fn nearest_on_segment(p: &Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> ([f64; 3], Point3<f64>) {
    let ab = b - a;
    let length_sq = ab.norm_squared();
    let t = if length_sq < f64::EPSILON {
        0.0
    } else {
        ((p - a).dot(&ab) / length_sq).clamp(0.0, 1.0)
    };
    ([t, 0.0, 0.0], Point3::from(a.coords + ab * t))
}

/// Closest point on a triangle, with its barycentric-derived local
/// coordinates `(xi1, xi2)` for the second and third nodes.
#[allow(clippy::many_single_char_names)]
fn closest_point_triangle(
    p: &Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> ([f64; 2], Point3<f64>) {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ([0.0, 0.0], a);
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return ([1.0, 0.0], b);
    }

    let vc = d1.mul_add(d4, -(d3 * d2));
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return ([v, 0.0], Point3::from(a.coords + ab * v));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return ([0.0, 1.0], c);
    }

    let vb = d5.mul_add(d2, -(d1 * d6));
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return ([0.0, w], Point3::from(a.coords + ac * w));
    }

    let va = d3.mul_add(d6, -(d5 * d4));
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return ([1.0 - w, w], Point3::from(b.coords + (c - b) * w));
    }

    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    ([v, w], Point3::from(a.coords + ab * v + ac * w))
}

fn newton_starts(shape: ElementShape) -> Vec<[f64; 3]> {
    match shape {
        ElementShape::Quad => vec![
            [0.5, 0.5, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ],
        ElementShape::Tetrahedron => vec![
            [0.25, 0.25, 0.25],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        _ => vec![
            [0.5, 0.5, 0.5],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ],
    }
}

fn interpolate(
    shape: ElementShape,
    points: &[Point3<f64>; MAX_ELEMENT_NODES],
    xi: [f64; 3],
) -> Point3<f64> {
    let weights = shape_weights(shape, xi);
    let mut coords = Vector3::zeros();
    for (i, point) in points.iter().enumerate().take(shape.node_count()) {
        coords += point.coords * weights[i];
    }
    Point3::from(coords)
}

/// Clamped Gauss-Newton search for the nearest local coordinates.
///
/// Runs from several fixed starts and keeps the best converged result; the
/// start list and iteration cap are fixed so results are deterministic.
fn newton_nearest(
    shape: ElementShape,
    points: &[Point3<f64>; MAX_ELEMENT_NODES],
    target: &Point3<f64>,
) -> ([f64; 3], Point3<f64>) {
    let dim = shape.dimension() as usize;
    let mut best_xi = [0.0; 3];
    let mut best_point = interpolate(shape, points, best_xi);
    let mut best_distance_sq = (best_point - target).norm_squared();

    for start in newton_starts(shape) {
        let mut xi = clamp_xi(shape, start);
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let position = interpolate(shape, points, xi);
            let residual = target - position;

            let derivatives = shape_weight_derivatives(shape, xi);
            let mut jacobian = [Vector3::zeros(); 3];
            for (i, point) in points.iter().enumerate().take(shape.node_count()) {
                for j in 0..dim {
                    jacobian[j] += point.coords * derivatives[i][j];
                }
            }

            let Some(step) = solve_normal_equations(&jacobian, dim, &residual) else {
                break;
            };

            let mut limited = step;
            let norm = (limited[0].powi(2) + limited[1].powi(2) + limited[2].powi(2)).sqrt();
            if norm > MAX_STEP {
                let scale = MAX_STEP / norm;
                limited = [limited[0] * scale, limited[1] * scale, limited[2] * scale];
            }

            let next = clamp_xi(
                shape,
                [xi[0] + limited[0], xi[1] + limited[1], xi[2] + limited[2]],
            );
            let moved = (next[0] - xi[0]).powi(2)
                + (next[1] - xi[1]).powi(2)
                + (next[2] - xi[2]).powi(2);
            xi = next;
            if moved < STEP_TOLERANCE * STEP_TOLERANCE {
                break;
            }
        }

        let position = interpolate(shape, points, xi);
        let distance_sq = (position - target).norm_squared();
        if distance_sq < best_distance_sq {
            best_distance_sq = distance_sq;
            best_xi = xi;
            best_point = position;
        }
    }

    (best_xi, best_point)
}

/// Solve `(J^T J) dxi = J^T r` for `dim` unknowns.
///
/// Returns `None` when the normal matrix is singular (degenerate element).
fn solve_normal_equations(
    jacobian: &[Vector3<f64>; 3],
    dim: usize,
    residual: &Vector3<f64>,
) -> Option<[f64; 3]> {
    match dim {
        2 => {
            let n00 = jacobian[0].dot(&jacobian[0]);
            let n01 = jacobian[0].dot(&jacobian[1]);
            let n11 = jacobian[1].dot(&jacobian[1]);
            let b0 = jacobian[0].dot(residual);
            let b1 = jacobian[1].dot(residual);
            let det = n00.mul_add(n11, -(n01 * n01));
            if det.abs() < 1e-30 {
                return None;
            }
            Some([
                n11.mul_add(b0, -(n01 * b1)) / det,
                n00.mul_add(b1, -(n01 * b0)) / det,
                0.0,
            ])
        }
        3 => {
            let normal = Matrix3::from_fn(|r, c| jacobian[r].dot(&jacobian[c]));
            let rhs = Vector3::new(
                jacobian[0].dot(residual),
                jacobian[1].dot(residual),
                jacobian[2].dot(residual),
            );
            let inverse = normal.try_inverse()?;
            let step = inverse * rhs;
            Some([step.x, step.y, step.z])
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scaffold_types::Element;

    /// Two unit cubes side by side along x: nodes on the {0,1,2}x{0,1}x{0,1}
    /// lattice, identity coordinates.
    fn two_cube_host() -> (FeMesh, NodeField) {
        let mut field = NodeField::new("coordinates", 3, true).unwrap();
        let mut node = |x: f64, y: f64, z: f64| field.push_value([x, y, z]);
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..3 {
                    node(f64::from(x), f64::from(y), f64::from(z));
                }
            }
        }
        let index = |x: u32, y: u32, z: u32| z * 6 + y * 3 + x;
        let mut mesh = FeMesh::new(12);
        for cube in 0..2 {
            let nodes = vec![
                index(cube, 0, 0),
                index(cube + 1, 0, 0),
                index(cube, 1, 0),
                index(cube + 1, 1, 0),
                index(cube, 0, 1),
                index(cube + 1, 0, 1),
                index(cube, 1, 1),
                index(cube + 1, 1, 1),
            ];
            mesh.add_element(Element::new(ElementShape::Hexahedron, nodes))
                .unwrap();
        }
        (mesh, field)
    }

    #[test]
    fn interior_point_found_exactly() {
        let (mesh, field) = two_cube_host();
        let locator = HostLocator::new(&mesh, &field).unwrap();

        let found = locator.find_nearest(&Point3::new(0.5, 0.5, 0.5)).unwrap();
        assert_eq!(found.location.element, 0);
        assert!(found.distance < 1e-9);
        assert!((found.location.xi[0] - 0.5).abs() < 1e-9);

        let found = locator.find_nearest(&Point3::new(1.5, 0.25, 0.75)).unwrap();
        assert_eq!(found.location.element, 1);
        assert!((found.location.xi[0] - 0.5).abs() < 1e-9);
        assert!((found.location.xi[1] - 0.25).abs() < 1e-9);
        assert!((found.location.xi[2] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn exterior_point_projects_to_boundary() {
        let (mesh, field) = two_cube_host();
        let locator = HostLocator::new(&mesh, &field).unwrap();

        let found = locator.find_nearest(&Point3::new(2.5, 0.5, 0.5)).unwrap();
        assert_eq!(found.location.element, 1);
        assert!((found.distance - 0.5).abs() < 1e-9);
        assert!((found.location.xi[0] - 1.0).abs() < 1e-9);
        assert!((found.point.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn search_is_deterministic() {
        let (mesh, field) = two_cube_host();
        let locator = HostLocator::new(&mesh, &field).unwrap();
        let query = Point3::new(1.0, 0.3, 0.7);

        let first = locator.find_nearest(&query).unwrap();
        for _ in 0..5 {
            let again = locator.find_nearest(&query).unwrap();
            assert_eq!(first.location, again.location);
        }
    }

    #[test]
    fn triangle_host_projection() {
        let mut mesh = FeMesh::new(3);
        mesh.add_element(Element::new(ElementShape::Triangle, vec![0, 1, 2]))
            .unwrap();
        let field = NodeField::from_values(
            "coordinates",
            3,
            true,
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
        )
        .unwrap();
        let locator = HostLocator::new(&mesh, &field).unwrap();

        // above the interior: straight projection down
        let found = locator.find_nearest(&Point3::new(0.5, 0.5, 1.0)).unwrap();
        assert!((found.distance - 1.0).abs() < 1e-9);
        assert!((found.location.xi[0] - 0.25).abs() < 1e-9);
        assert!((found.location.xi[1] - 0.25).abs() < 1e-9);

        // beyond a vertex: clamps to it
        let found = locator.find_nearest(&Point3::new(3.0, -1.0, 0.0)).unwrap();
        assert!((found.point.x - 2.0).abs() < 1e-9);
        assert!((found.location.xi[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn line_host_projection() {
        let mut mesh = FeMesh::new(2);
        mesh.add_element(Element::new(ElementShape::Line, vec![0, 1]))
            .unwrap();
        let field = NodeField::from_values(
            "coordinates",
            3,
            true,
            vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0]],
        )
        .unwrap();
        let locator = HostLocator::new(&mesh, &field).unwrap();

        let found = locator.find_nearest(&Point3::new(1.0, 2.0, 0.0)).unwrap();
        assert!((found.location.xi[0] - 0.25).abs() < 1e-9);
        assert!((found.distance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn only_highest_dimension_searched() {
        // a hex with a stray line element: the line is ignored
        let mut mesh = FeMesh::new(9);
        let field = NodeField::from_values(
            "coordinates",
            3,
            true,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 0.0, 1.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [50.0, 0.0, 0.0],
            ],
        )
        .unwrap();
        mesh.add_element(Element::new(
            ElementShape::Hexahedron,
            vec![0, 1, 2, 3, 4, 5, 6, 7],
        ))
        .unwrap();
        mesh.add_element(Element::new(ElementShape::Line, vec![7, 8]))
            .unwrap();

        let locator = HostLocator::new(&mesh, &field).unwrap();
        assert_eq!(locator.element_count(), 1);
        let found = locator.find_nearest(&Point3::new(40.0, 0.0, 0.0)).unwrap();
        assert_eq!(found.location.element, 0);
    }

    #[test]
    fn empty_mesh_rejected() {
        let mesh = FeMesh::new(0);
        let field = NodeField::new("coordinates", 3, true).unwrap();
        let err = HostLocator::new(&mesh, &field).unwrap_err();
        assert!(matches!(err, FieldError::EmptyHostMesh));
    }

    #[test]
    fn sheared_hex_interior() {
        // hex sheared in x by z: x' = x + 0.5 z; Newton must still recover xi
        let mut mesh = FeMesh::new(8);
        mesh.add_element(Element::new(
            ElementShape::Hexahedron,
            vec![0, 1, 2, 3, 4, 5, 6, 7],
        ))
        .unwrap();
        let field = NodeField::from_values(
            "coordinates",
            3,
            true,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.5, 0.0, 1.0],
                [1.5, 0.0, 1.0],
                [0.5, 1.0, 1.0],
                [1.5, 1.0, 1.0],
            ],
        )
        .unwrap();
        let locator = HostLocator::new(&mesh, &field).unwrap();

        // xi (0.5, 0.5, 0.5) maps to (0.75, 0.5, 0.5) under the shear
        let found = locator.find_nearest(&Point3::new(0.75, 0.5, 0.5)).unwrap();
        assert!(found.distance < 1e-8);
        approx::assert_relative_eq!(found.location.xi[0], 0.5, epsilon = 1e-6);
        approx::assert_relative_eq!(found.location.xi[1], 0.5, epsilon = 1e-6);
        approx::assert_relative_eq!(found.location.xi[2], 0.5, epsilon = 1e-6);
    }
}
