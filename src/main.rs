// mapexport - Tile map export tool
// Copyright (c) 2026 mapexport Contributors
// Licensed under the MIT License

use mapexport::cli::{Cli, Commands};
use mapexport::config::{load_config_or_default, MapExportConfig};
use mapexport::logging::init_logging;
use clap::Parser;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    process::exit(run(&cli));
}

/// Runs the command and returns the process exit code
///
/// The logging guard lives in this scope so that buffered log lines are
/// flushed before `process::exit`.
fn run(cli: &Cli) -> i32 {
    let loaded = load_config_or_default(cli.config.as_deref());

    let defaults = MapExportConfig::default();
    let config = loaded.as_ref().unwrap_or(&defaults);
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.application.log_level);

    let _guard = match init_logging(log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return 2;
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "mapexport - Tile map export tool");

    let result = match (&cli.command, &loaded) {
        (Commands::ValidateConfig(args), _) => args.execute(cli.config.as_deref(), &loaded),
        (_, Err(e)) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("{e}");
            Ok(2)
        }
        (Commands::Export(args), Ok(config)) => args.execute(config),
        (Commands::Formats(args), Ok(config)) => args.execute(config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            1
        }
    }
}
