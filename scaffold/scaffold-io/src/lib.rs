//! Region document I/O for ScaffoldEmbed.
//!
//! This crate loads and saves [`Region`](scaffold_types::Region) documents.
//! Documents are JSON with an explicit wire schema, so the on-disk format is
//! decoupled from the in-memory types: a document lists its node pool size,
//! fields, elements, data points, and groups.
//!
//! # Example
//!
//! ```no_run
//! use scaffold_io::{load_region, save_region};
//!
//! let region = load_region("scaffold.json").unwrap();
//! save_region(&region, "copy.json").unwrap();
//! ```
//!
//! # Format Detection
//!
//! Formats are detected from the file extension. Unrecognized extensions are
//! reported as [`IoError::UnknownFormat`]; missing files as
//! [`IoError::FileNotFound`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod json;

pub use error::{IoError, IoResult};
pub use json::{read_region, write_region};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use scaffold_types::Region;

/// Supported region document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RegionFormat {
    /// JSON region document.
    Json,
}

impl RegionFormat {
    /// Detect the format from a file path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownFormat`] for unrecognized extensions.
    pub fn from_path(path: impl AsRef<Path>) -> IoResult<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            _ => Err(IoError::UnknownFormat { extension }),
        }
    }
}

/// Load a region document from a file, detecting the format from the
/// extension.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist,
/// [`IoError::UnknownFormat`] for unrecognized extensions, and content
/// errors per [`read_region`].
///
/// # Example
///
/// ```no_run
/// use scaffold_io::load_region;
///
/// let region = load_region("data.json").unwrap();
/// println!("{} groups", region.groups().count());
/// ```
pub fn load_region(path: impl AsRef<Path>) -> IoResult<Region> {
    let path = path.as_ref();
    RegionFormat::from_path(path)?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    read_region(BufReader::new(file))
}

/// Save a region document to a file, detecting the format from the
/// extension.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] for unrecognized extensions, and I/O
/// errors per [`write_region`].
pub fn save_region(region: &Region, path: impl AsRef<Path>) -> IoResult<()> {
    let path = path.as_ref();
    RegionFormat::from_path(path)?;
    let file = File::create(path)?;
    write_region(region, BufWriter::new(file))
}
