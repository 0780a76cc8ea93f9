//! Export command implementation
//!
//! This module implements the `export` command, which converts one map to
//! the format selected by an optional format name or the target's suffix.

use crate::config::MapExportConfig;
use crate::core::export::{ExportCoordinator, ExportOptions, ExportSummary};
use crate::log_export_failure;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Dry run mode - load the map and pick a writer without writing the target
    #[arg(long)]
    pub dry_run: bool,

    /// Print the export summary as JSON
    #[arg(long)]
    pub json: bool,

    /// [FORMAT] <SOURCE> <TARGET>
    #[arg(value_name = "ARGS")]
    pub files: Vec<String>,
}

impl ExportArgs {
    /// Execute the export command
    ///
    /// Returns exit code 0 on success and 1 for any export failure.
    pub fn execute(&self, config: &MapExportConfig) -> anyhow::Result<i32> {
        let coordinator = ExportCoordinator::from_config(config)?;
        let options = ExportOptions {
            dry_run: self.dry_run,
        };

        let summary = match coordinator.export_args(&self.files, options) {
            Ok(summary) => summary,
            Err(e) => {
                log_export_failure!(&e);
                eprintln!("{e}");
                return Ok(1);
            }
        };

        summary.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        Ok(0)
    }
}

fn print_summary(summary: &ExportSummary) {
    if summary.dry_run {
        println!("DRY RUN - {} was not written", summary.target.display());
    } else {
        println!("Exported {}", summary.target.display());
    }
    println!("  Source: {}", summary.source.display());
    println!("  Format: {} ({})", summary.filter_label, summary.writer);
    println!("  Layers: {}", summary.layer_count);
    println!("  Tilesets: {}", summary.tileset_count);
    println!("  Duration: {:.3}s", summary.duration.as_secs_f64());
}
