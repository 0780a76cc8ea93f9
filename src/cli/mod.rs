//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for mapexport using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mapexport - Tile map export tool
#[derive(Parser, Debug)]
#[command(name = "mapexport")]
#[command(version, about, long_about = None)]
#[command(author = "mapexport Contributors")]
pub struct Cli {
    /// Path to configuration file [default: mapexport.toml, if present]
    #[arg(short, long, env = "MAPEXPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MAPEXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a map: export [FORMAT] <SOURCE> <TARGET>
    #[command(visible_alias = "export-map")]
    Export(commands::export::ExportArgs),

    /// List registered writers and the formats they produce
    Formats(commands::formats::FormatsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
