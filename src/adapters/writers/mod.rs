//! Map writer plugins
//!
//! Every export format is a [`MapWriter`]: a stateless object that declares
//! the formats it produces through a [`NameFilterSet`] and serializes a
//! borrowed [`Map`] to a target path. Writers are collected into a
//! [`WriterRegistry`] once at startup and never change afterwards.

pub mod csv;
pub mod factory;
pub mod json;
pub mod lua;
pub mod registry;

use crate::domain::{Map, NameFilterSet, WriteError};
use std::path::Path;

pub use self::csv::CsvWriter;
pub use factory::{builtin_writer_names, create_writer_registry};
pub use json::JsonWriter;
pub use lua::LuaWriter;
pub use registry::{WriterDescriptor, WriterRegistry};

/// Format writer trait
///
/// Implementations must not keep the map or any part of it beyond the call
/// to [`MapWriter::write`]; the caller releases the map right after.
pub trait MapWriter: Send + Sync {
    /// Short unique name, e.g. `"json"`
    fn name(&self) -> &str;

    /// Formats this writer produces
    ///
    /// Called once, when the writer is registered.
    fn name_filters(&self) -> NameFilterSet;

    /// Writes `map` to `target`
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be represented in this format or
    /// the output cannot be written.
    fn write(&self, map: &Map, target: &Path) -> Result<(), WriteError>;
}
