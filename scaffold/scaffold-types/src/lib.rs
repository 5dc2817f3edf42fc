//! Core finite element model types for ScaffoldEmbed.
//!
//! This crate provides the foundational types for scaffold and data models:
//!
//! - [`ElementShape`] and [`Element`] - Finite elements of dimension 1-3
//! - [`FeMesh`] - An element mesh over a shared node pool
//! - [`NodeField`] - A named field with per-node values
//! - [`StringField`] - A named field with per-point string labels
//! - [`Group`] - A named subset of elements, nodes, and data points
//! - [`Region`] - One loaded model document: mesh, fields, points, groups
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Node Ordering
//!
//! Tensor-product elements (quadrilaterals and hexahedra) list their nodes in
//! lexicographic order of local coordinates: xi1 varies fastest, then xi2,
//! then xi3. Simplex elements (triangles and tetrahedra) list the origin node
//! first, followed by the node at the end of each local axis.
//!
//! # Example
//!
//! ```
//! use scaffold_types::{Element, ElementShape, FeMesh, NodeField};
//!
//! // A single line element over two nodes
//! let mut mesh = FeMesh::new(2);
//! mesh.add_element(Element::new(ElementShape::Line, vec![0, 1])).unwrap();
//!
//! let mut coordinates = NodeField::new("coordinates", 3, true).unwrap();
//! coordinates.push_value([0.0, 0.0, 0.0]);
//! coordinates.push_value([1.0, 0.0, 0.0]);
//!
//! assert_eq!(mesh.element_count(), 1);
//! assert_eq!(mesh.max_dimension(), Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod element;
mod error;
mod field;
mod group;
mod mesh;
mod region;

pub use bounds::Aabb;
pub use element::{Element, ElementShape};
pub use error::{ModelError, ModelResult};
pub use field::{NodeField, StringField};
pub use group::Group;
pub use mesh::FeMesh;
pub use region::Region;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
