//! Domain error types
//!
//! This module defines the error hierarchy for mapexport. Export failures use a
//! flat taxonomy ([`ExportErrorKind`]); reader and writer failures are kept as
//! sources so they show up in logs without leaking into the exit status.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main mapexport error type
///
/// Used for everything outside the export pipeline itself: configuration,
/// registry setup, logging initialization.
#[derive(Debug, Error)]
pub enum MapExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Export pipeline errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// An error wrapped with context
    #[error("{0}")]
    Other(String),
}

/// The five ways a single export can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportErrorKind {
    /// Fewer than two path arguments were supplied
    MalformedRequest,
    /// No writer matches the format hint or target suffix
    NoMatchingFormat,
    /// More than one writer matches the target suffix
    AmbiguousFormat,
    /// The source map could not be loaded
    SourceLoadFailed,
    /// The chosen writer reported a failure
    WriteFailed,
}

impl ExportErrorKind {
    /// Stable identifier, used in structured logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportErrorKind::MalformedRequest => "malformed_request",
            ExportErrorKind::NoMatchingFormat => "no_matching_format",
            ExportErrorKind::AmbiguousFormat => "ambiguous_format",
            ExportErrorKind::SourceLoadFailed => "source_load_failed",
            ExportErrorKind::WriteFailed => "write_failed",
        }
    }
}

impl fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export pipeline errors
///
/// Every variant is terminal for a single export invocation.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Not enough arguments to build a request
    #[error("Export syntax is export [format] <source map> <target file> ({reason})")]
    MalformedRequest { reason: String },

    /// No writer matched
    #[error("No exporter found for target file: {}", .target.display())]
    NoMatchingFormat {
        target: PathBuf,
        format_hint: Option<String>,
    },

    /// Several writers matched the bare suffix
    #[error(
        "Non-unique file extension. Can't determine correct export format \
         (suffix '{suffix}' matches: {})",
        .candidates.join(", ")
    )]
    AmbiguousFormat {
        suffix: String,
        candidates: Vec<String>,
    },

    /// The reader could not produce a map
    #[error("Failed to load source map {}: {source}", .path.display())]
    SourceLoadFailed {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    /// The writer failed
    #[error("Failed to export map to target file {}: {source}", .target.display())]
    WriteFailed {
        writer: String,
        target: PathBuf,
        #[source]
        source: WriteError,
    },
}

impl ExportError {
    /// Creates a malformed request error
    pub fn malformed(reason: impl Into<String>) -> Self {
        ExportError::MalformedRequest {
            reason: reason.into(),
        }
    }

    /// The flat kind of this error
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::MalformedRequest { .. } => ExportErrorKind::MalformedRequest,
            ExportError::NoMatchingFormat { .. } => ExportErrorKind::NoMatchingFormat,
            ExportError::AmbiguousFormat { .. } => ExportErrorKind::AmbiguousFormat,
            ExportError::SourceLoadFailed { .. } => ExportErrorKind::SourceLoadFailed,
            ExportError::WriteFailed { .. } => ExportErrorKind::WriteFailed,
        }
    }
}

/// Errors raised while reading a map document
#[derive(Debug, Error)]
pub enum ReadError {
    /// The file could not be opened or read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML is not well-formed
    #[error("XML parse error: {0}")]
    Xml(String),

    /// The document is well-formed but not a valid map
    #[error("invalid map: {0}")]
    InvalidMap(String),

    /// Layer data uses an encoding or compression we cannot decode
    #[error("unsupported layer data: {0}")]
    Unsupported(String),

    /// Layer data could not be decoded
    #[error("corrupt layer data: {0}")]
    Decode(String),
}

impl ReadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ReadError::InvalidMap(msg.into())
    }
}

/// Errors raised by a format writer
#[derive(Debug, Error)]
pub enum WriteError {
    /// The target (or a sibling output file) could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The map could not be serialized in this format
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The map has nothing this format can represent
    #[error("{0}")]
    Unsupported(String),
}

impl From<serde_json::Error> for WriteError {
    fn from(err: serde_json::Error) -> Self {
        WriteError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for WriteError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return WriteError::Serialization(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => WriteError::Io(io),
            other => WriteError::Serialization(format!("{other:?}")),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MapExportError {
    fn from(err: std::io::Error) -> Self {
        MapExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MapExportError {
    fn from(err: serde_json::Error) -> Self {
        MapExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MapExportError {
    fn from(err: toml::de::Error) -> Self {
        MapExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
