//! Error context extension trait
//!
//! Like `anyhow::Context`, but keeps [`MapExportError`] as the error type so
//! library code never has to box its errors.
//!
//! ```rust
//! use mapexport::domain::Result;
//! use mapexport::domain::context::ResultExt;
//!
//! fn read_config(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read configuration file {path}"))
//! }
//! ```

use crate::domain::errors::MapExportError;
use crate::domain::result::Result;

/// Adds `.with_context()` to results
pub trait ResultExt<T> {
    /// Prefixes the error with the output of `f`, evaluated only on error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<MapExportError>,
{
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            MapExportError::Other(format!("{}: {base_error}", f()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(MapExportError::Configuration("bad level".to_string()));
        let err = result
            .with_context(|| "Failed to load configuration")
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("Failed to load configuration: "));
        assert!(msg.contains("bad level"));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let called = Cell::new(false);
        let result: Result<i32> = Ok(42);
        let value = result
            .with_context(|| {
                called.set(true);
                "never"
            })
            .unwrap();

        assert_eq!(value, 42);
        assert!(!called.get());
    }

    #[test]
    fn test_context_on_io_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = result.with_context(|| "Reading mapexport.toml").unwrap_err();
        assert!(matches!(err, MapExportError::Other(_)));
        assert!(err.to_string().contains("no such file"));
    }
}
