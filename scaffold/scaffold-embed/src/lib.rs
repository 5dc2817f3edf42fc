//! Material coordinate embedding of annotated data in fitted scaffolds.
//!
//! A *scaffold* is a finite element model with a permanent **material
//! coordinate** field over its interior. Digitized data (points, contours,
//! sub-models) is captured relative to a *fitted* state of the same
//! scaffold. This crate assigns each selected data point a material
//! coordinate: the point is located on the scaffold's fitted coordinate
//! field, and the material field is evaluated at that location. Material
//! coordinates are permanent; they stay meaningful across refits because
//! they live in the scaffold's own parameterization.
//!
//! The client workflow is driven by [`DataEmbedder`]:
//!
//! 1. construct over the scaffold, fitted geometry, and data documents;
//! 2. optionally [`decode_settings`](DataEmbedder::decode_settings);
//! 3. [`load`](DataEmbedder::load): coordinate fields, the marker group,
//!    and the annotated group catalog are discovered;
//! 4. adjust the selection with
//!    [`group_set_embed`](DataEmbedder::group_set_embed);
//! 5. [`generate_output`](DataEmbedder::generate_output): an output region
//!    with the original data coordinates and the computed material
//!    coordinates side by side.
//!
//! Groups whose names also exist on the host model (fitting contours,
//! fiducial markers) are excluded from embedding by default, as is the
//! marker group itself; marker points are clustered by their annotation
//! name into point groups of their own.
//!
//! The geometric machinery (basis evaluation, nearest-location search)
//! lives in `scaffold-field`; document I/O in `scaffold-io`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod catalog;
mod discovery;
mod embedder;
mod error;
mod output;
mod settings;

pub use embedder::DataEmbedder;
pub use error::{EmbedError, EmbedResult};
pub use settings::{EmbedderSettings, GroupInfo};

// Re-export the model type the API hands back
pub use scaffold_types::Region;
