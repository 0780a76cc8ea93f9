//! Writer resolution
//!
//! Picks the one writer that should produce a target file, either by an
//! explicit format hint matched against filter labels, or by the target's
//! complete suffix matched against filter patterns.

use crate::adapters::writers::WriterDescriptor;
use crate::domain::{ExportError, NameFilterEntry};
use std::path::Path;

/// The writer chosen for a target, and the filter entry that selected it
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'r> {
    pub descriptor: &'r WriterDescriptor,
    pub filter: &'r NameFilterEntry,
}

/// Everything after the first `.` of the final path segment
///
/// `maps/level.tar.gz` gives `tar.gz`; a name without a dot gives `""`.
pub fn complete_suffix(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split_once('.').map(|(_, suffix)| suffix.to_string()))
        .unwrap_or_default()
}

/// Resolves the writer for `target`
///
/// With a `hint`, the first descriptor in registration order that has a
/// filter labelled `hint` (ignoring case) wins and the target is not
/// inspected. Without one, every descriptor with a pattern containing the
/// target's complete suffix is a candidate and there must be exactly one.
///
/// # Errors
///
/// - [`ExportError::NoMatchingFormat`] when nothing matches
/// - [`ExportError::AmbiguousFormat`] when the suffix matches several writers
pub fn resolve_writer<'r>(
    descriptors: &'r [WriterDescriptor],
    target: &Path,
    hint: Option<&str>,
) -> Result<Resolution<'r>, ExportError> {
    let no_match = || ExportError::NoMatchingFormat {
        target: target.to_path_buf(),
        format_hint: hint.map(str::to_string),
    };

    if let Some(hint) = hint {
        let resolution = descriptors
            .iter()
            .find_map(|descriptor| {
                descriptor
                    .filters()
                    .find_label(hint)
                    .map(|filter| Resolution { descriptor, filter })
            })
            .ok_or_else(no_match)?;

        tracing::debug!(
            hint,
            writer = %resolution.descriptor.name(),
            "Resolved writer by format hint"
        );
        return Ok(resolution);
    }

    let suffix = complete_suffix(target);
    let candidates: Vec<Resolution<'r>> = descriptors
        .iter()
        .filter_map(|descriptor| {
            descriptor
                .filters()
                .find_suffix(&suffix)
                .map(|filter| Resolution { descriptor, filter })
        })
        .collect();

    match candidates.as_slice() {
        [] => Err(no_match()),
        [resolution] => {
            tracing::debug!(
                suffix = %suffix,
                writer = %resolution.descriptor.name(),
                "Resolved writer by target suffix"
            );
            Ok(*resolution)
        }
        _ => {
            let names: Vec<String> = candidates
                .iter()
                .map(|c| c.descriptor.name().to_string())
                .collect();
            tracing::debug!(suffix = %suffix, candidates = ?names, "Target suffix is ambiguous");
            Err(ExportError::AmbiguousFormat {
                suffix,
                candidates: names,
            })
        }
    }
}
