//! Export coordinator - orchestrates a single export
//!
//! The workflow is: build the request, resolve the writer, load the source
//! map, invoke the writer, release the map, report. Every step is fallible
//! and the first failure ends the export with its [`ExportError`].

use crate::adapters::reader::{MapReader, TmxReader};
use crate::adapters::writers::{create_writer_registry, WriterRegistry};
use crate::config::MapExportConfig;
use crate::core::export::summary::ExportSummary;
use crate::core::resolve::resolve_writer;
use crate::domain::{ExportError, ExportRequest, Result};
use chrono::Utc;
use std::time::Instant;

/// Per-invocation export options
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Resolve and load, but do not write the target
    pub dry_run: bool,
}

/// Export coordinator
///
/// Owns the writer registry, which is never modified once the coordinator
/// exists, and the reader used to load source maps.
pub struct ExportCoordinator {
    registry: WriterRegistry,
    reader: Box<dyn MapReader>,
}

impl ExportCoordinator {
    /// Create a coordinator from an already populated registry
    pub fn new(registry: WriterRegistry, reader: Box<dyn MapReader>) -> Self {
        Self { registry, reader }
    }

    /// Create a coordinator with the built-in writers and the TMX reader
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in writer fails registration.
    pub fn from_config(config: &MapExportConfig) -> Result<Self> {
        let registry = create_writer_registry(&config.plugins)?;
        Ok(Self::new(registry, Box::new(TmxReader::new())))
    }

    pub fn registry(&self) -> &WriterRegistry {
        &self.registry
    }

    /// Export from raw command-line tokens: `[format] <source> <target>`
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MalformedRequest`] for fewer than two tokens,
    /// otherwise whatever [`ExportCoordinator::export`] returns.
    pub fn export_args<S: AsRef<str>>(
        &self,
        args: &[S],
        options: ExportOptions,
    ) -> std::result::Result<ExportSummary, ExportError> {
        let request = ExportRequest::from_args(args)?;
        self.export(&request, options)
    }

    /// Execute an export
    ///
    /// The loaded map is released before this returns, on success and on
    /// every failure after it was loaded.
    ///
    /// # Errors
    ///
    /// - [`ExportError::NoMatchingFormat`] / [`ExportError::AmbiguousFormat`]
    ///   from writer resolution
    /// - [`ExportError::SourceLoadFailed`] if the reader fails
    /// - [`ExportError::WriteFailed`] if the writer fails
    pub fn export(
        &self,
        request: &ExportRequest,
        options: ExportOptions,
    ) -> std::result::Result<ExportSummary, ExportError> {
        let start_time = Instant::now();

        tracing::info!(
            source = %request.source().display(),
            target = %request.target().display(),
            format = request.format_hint().unwrap_or("-"),
            dry_run = options.dry_run,
            "Starting export"
        );

        let resolution = resolve_writer(
            self.registry.descriptors(),
            request.target(),
            request.format_hint(),
        )?;
        let descriptor = resolution.descriptor;

        let map = self.reader.read_map(request.source()).map_err(|source| {
            ExportError::SourceLoadFailed {
                path: request.source().to_path_buf(),
                source,
            }
        })?;

        let layer_count = map.layers.len();
        let tileset_count = map.tilesets().len();

        let written = if options.dry_run {
            tracing::info!(writer = %descriptor.name(), "Dry run - skipping write");
            Ok(())
        } else {
            tracing::debug!(writer = %descriptor.name(), "Invoking writer");
            descriptor.writer().write(&map, request.target())
        };
        drop(map);

        written.map_err(|source| ExportError::WriteFailed {
            writer: descriptor.name().to_string(),
            target: request.target().to_path_buf(),
            source,
        })?;

        Ok(ExportSummary {
            writer: descriptor.name().to_string(),
            filter_label: resolution.filter.label().to_string(),
            source: request.source().to_path_buf(),
            target: request.target().to_path_buf(),
            layer_count,
            tileset_count,
            duration: start_time.elapsed(),
            dry_run: options.dry_run,
            completed_at: Utc::now(),
        })
    }
}
