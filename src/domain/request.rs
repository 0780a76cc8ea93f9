//! Export request
//!
//! Built from the positional tokens that follow the export command:
//! `[format] <source> <target>`. Two tokens are source and target; three or
//! more put the format hint first.

use super::errors::ExportError;
use std::path::{Path, PathBuf};

/// Validated, immutable export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    format_hint: Option<String>,
    source: PathBuf,
    target: PathBuf,
}

impl ExportRequest {
    /// Creates a request from its parts
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` if either path is empty.
    pub fn new(
        format_hint: Option<String>,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Result<Self, ExportError> {
        let source = source.into();
        let target = target.into();

        if source.as_os_str().is_empty() {
            return Err(ExportError::malformed("source path is empty"));
        }
        if target.as_os_str().is_empty() {
            return Err(ExportError::malformed("target path is empty"));
        }

        Ok(Self {
            format_hint,
            source,
            target,
        })
    }

    /// Builds a request from positional command-line tokens
    ///
    /// Tokens beyond the third are ignored.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` when fewer than two tokens are given.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ExportError> {
        match args {
            [] | [_] => Err(ExportError::malformed(format!(
                "expected at least 2 path arguments, got {}",
                args.len()
            ))),
            [source, target] => Self::new(None, source.as_ref(), target.as_ref()),
            [hint, source, target, rest @ ..] => {
                if !rest.is_empty() {
                    tracing::warn!(
                        ignored = rest.len(),
                        "Ignoring extra export arguments"
                    );
                }
                Self::new(
                    Some(hint.as_ref().to_string()),
                    source.as_ref(),
                    target.as_ref(),
                )
            }
        }
    }

    pub fn format_hint(&self) -> Option<&str> {
        self.format_hint.as_deref()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }
}
