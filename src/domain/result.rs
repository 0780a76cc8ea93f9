//! Result type alias for mapexport

use super::errors::MapExportError;

/// Result type alias for mapexport operations outside a single export
///
/// ```
/// use mapexport::domain::{MapExportError, Result};
///
/// fn check_writer_name(name: &str) -> Result<()> {
///     if name.is_empty() {
///         return Err(MapExportError::Validation("writer name is empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(check_writer_name("json").is_ok());
/// assert!(check_writer_name("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, MapExportError>;
