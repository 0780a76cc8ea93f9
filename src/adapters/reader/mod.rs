//! Map document readers
//!
//! The export pipeline only needs one operation from a reader: turn a path
//! into a [`Map`] or fail. [`TmxReader`] implements it for TMX files.

pub mod tmx;

use crate::domain::{Map, ReadError};
use std::path::Path;

pub use tmx::TmxReader;

/// Reader trait for map documents
pub trait MapReader {
    /// Loads the map stored at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid map.
    fn read_map(&self, path: &Path) -> Result<Map, ReadError>;
}
