//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output on stderr
//! - Configurable log levels, overridable through `RUST_LOG`
//! - An optional JSON log file with rotation
//!
//! # Example
//!
//! ```no_run
//! use mapexport::logging::init_logging;
//! use mapexport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(writer = "json", "Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a failed export with its error kind
///
/// # Example
///
/// ```no_run
/// use mapexport::log_export_failure;
/// use mapexport::domain::ExportError;
///
/// let error = ExportError::malformed("missing target");
/// log_export_failure!(&error);
/// ```
#[macro_export]
macro_rules! log_export_failure {
    ($error:expr) => {
        tracing::error!(
            kind = %$error.kind(),
            error = %$error,
            source = ?std::error::Error::source($error).map(|s| s.to_string()),
            "Export failed"
        );
    };
}
