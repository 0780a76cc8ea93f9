//! Core export logic for mapexport.
//!
//! # Modules
//!
//! - [`resolve`] - Picks the writer for a target file
//! - [`export`] - Export orchestration and reporting
//!
//! # Export Workflow
//!
//! 1. **Request**: Build an [`ExportRequest`](crate::domain::ExportRequest)
//!    from `[format] <source> <target>`
//! 2. **Resolve**: Select exactly one writer by format hint or target suffix
//! 3. **Load**: Read the source map
//! 4. **Write**: Hand the map to the writer
//! 5. **Release**: Drop the map, whatever the writer returned
//! 6. **Report**: Return an [`ExportSummary`](export::ExportSummary) or the
//!    first [`ExportError`](crate::domain::ExportError)
//!
//! # Example
//!
//! ```rust,no_run
//! use mapexport::config::MapExportConfig;
//! use mapexport::core::export::{ExportCoordinator, ExportOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = ExportCoordinator::from_config(&MapExportConfig::default())?;
//! let summary = coordinator.export_args(&["town.tmx", "town.json"], ExportOptions::default())?;
//!
//! println!("Wrote {} with {}", summary.target.display(), summary.writer);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod resolve;
