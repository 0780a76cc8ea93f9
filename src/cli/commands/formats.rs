//! Formats command implementation
//!
//! Lists every registered writer with the name filters it declares. The
//! filter label is what `export` accepts as its optional FORMAT argument.

use crate::adapters::writers::{create_writer_registry, WriterRegistry};
use crate::config::MapExportConfig;
use clap::Args;

/// Arguments for the formats command
#[derive(Args, Debug)]
pub struct FormatsArgs {}

impl FormatsArgs {
    /// Execute the formats command
    pub fn execute(&self, config: &MapExportConfig) -> anyhow::Result<i32> {
        let registry = create_writer_registry(&config.plugins)?;

        if registry.is_empty() {
            println!("No writers registered (all disabled in configuration)");
            return Ok(0);
        }

        for line in format_lines(&registry) {
            println!("{line}");
        }
        Ok(0)
    }
}

fn format_lines(registry: &WriterRegistry) -> Vec<String> {
    let width = registry
        .iter()
        .map(|d| d.name().len())
        .max()
        .unwrap_or_default();

    registry
        .iter()
        .flat_map(|descriptor| {
            descriptor
                .filters()
                .iter()
                .map(move |entry| format!("{:<width$}  {entry}", descriptor.name()))
        })
        .collect()
}
