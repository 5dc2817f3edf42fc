//! Field evaluation and nearest-location search for ScaffoldEmbed.
//!
//! This crate is the geometric engine behind embedding: it interpolates
//! [`NodeField`](scaffold_types::NodeField)s within finite elements and finds
//! the element location nearest to a query point.
//!
//! - [`ElementLocation`] - An element index plus local `xi` coordinates
//! - [`evaluate_field`] - Interpolate a field at an element location
//! - [`HostLocator`] - Nearest-location search over a host mesh's
//!   coordinate field, with AABB culling
//!
//! A material coordinate is obtained by finding a point's location on the
//! host's *fitted* coordinate field, then evaluating the host's *material*
//! coordinate field at that location. Both halves live here; the policy of
//! which points to embed lives in `scaffold-embed`.
//!
//! # Determinism
//!
//! Searches are deterministic: candidate elements are visited in a fixed
//! order and iterative refinement uses fixed starts and iteration caps, so
//! repeated runs over unchanged inputs return identical locations. Material
//! coordinates assigned from them are therefore stable until the fitted
//! field itself changes.
//!
//! # Example
//!
//! ```
//! use scaffold_field::{evaluate_field, ElementLocation, HostLocator};
//! use scaffold_types::{Element, ElementShape, FeMesh, NodeField, Point3};
//!
//! // One unit line element with coordinates along x
//! let mut mesh = FeMesh::new(2);
//! mesh.add_element(Element::new(ElementShape::Line, vec![0, 1])).unwrap();
//! let field = NodeField::from_values(
//!     "coordinates", 3, true,
//!     vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
//! ).unwrap();
//!
//! let locator = HostLocator::new(&mesh, &field).unwrap();
//! let found = locator.find_nearest(&Point3::new(0.5, 1.0, 0.0)).unwrap();
//!
//! assert_eq!(found.location.element, 0);
//! assert!((found.location.xi[0] - 0.25).abs() < 1e-9);
//! assert!((found.distance - 1.0).abs() < 1e-9);
//!
//! let x = evaluate_field(&mesh, &field, &found.location).unwrap();
//! assert!((x[0] - 0.5).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod basis;
mod error;
mod evaluate;
mod locate;
mod location;

pub use basis::{clamp_xi, shape_weight_derivatives, shape_weights, MAX_ELEMENT_NODES};
pub use error::{FieldError, FieldResult};
pub use evaluate::{evaluate_field, evaluate_point};
pub use locate::{FoundLocation, HostLocator};
pub use location::ElementLocation;
