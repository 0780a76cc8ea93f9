//! Export orchestration
//!
//! This module provides the export pipeline for mapexport:
//! - Coordination of a single export ([`ExportCoordinator`])
//! - Summary and reporting ([`ExportSummary`])

pub mod coordinator;
pub mod summary;

pub use coordinator::{ExportCoordinator, ExportOptions};
pub use summary::ExportSummary;
