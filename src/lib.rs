// mapexport - Tile map export tool
// Copyright (c) 2026 mapexport Contributors
// Licensed under the MIT License

//! # mapexport - Tile map export tool
//!
//! mapexport reads TMX tile maps and writes them out in other formats. Each
//! output format is a writer plugin that declares the file types it produces;
//! an export picks exactly one writer, either by name or by the target file's
//! suffix, and fails loudly when the choice is missing or ambiguous.
//!
//! ## Overview
//!
//! This library provides:
//! - **Reading** TMX maps, with external tilesets and every standard layer
//!   data encoding
//! - **Resolving** the writer for a target file
//! - **Writing** Tiled JSON, Lua and CSV output
//! - **Releasing** the loaded map on every exit path
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Writer resolution and export orchestration
//! - [`adapters`] - Map reader and writer plugins
//! - [`domain`] - Map model, filters, requests and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mapexport::config::load_config_or_default;
//! use mapexport::core::export::{ExportCoordinator, ExportOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default(None)?;
//!     let coordinator = ExportCoordinator::from_config(&config)?;
//!
//!     // Format picked from the ".lua" suffix
//!     let summary = coordinator.export_args(&["town.tmx", "town.lua"], ExportOptions::default())?;
//!     println!("Exported {} layers with {}", summary.layer_count, summary.writer);
//!
//!     // Format named explicitly; the target suffix is not consulted
//!     coordinator.export_args(&["Json files", "town.tmx", "town.map"], ExportOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Export failures are [`domain::ExportError`]s, each with a flat
//! [`domain::ExportErrorKind`]. Everything else (configuration, registry
//! setup, logging) uses [`domain::MapExportError`].
//!
//! ## Logging
//!
//! mapexport uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(writer = "json", target = "town.json", "Export completed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
