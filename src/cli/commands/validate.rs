//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the mapexport configuration file.

use crate::config::{MapExportConfig, DEFAULT_CONFIG_FILE};
use crate::domain::Result;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Report on the configuration loaded at startup
    ///
    /// Returns exit code 0 for a valid configuration and 2 otherwise.
    pub fn execute(
        &self,
        config_path: Option<&Path>,
        loaded: &Result<MapExportConfig>,
    ) -> anyhow::Result<i32> {
        let source = match config_path {
            Some(path) => path.display().to_string(),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => DEFAULT_CONFIG_FILE.to_string(),
            None => "built-in defaults".to_string(),
        };
        tracing::info!(source = %source, "Validating configuration");
        println!("Validating configuration: {source}");

        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                println!("Configuration is invalid");
                println!("  Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        if config.plugins.disabled.is_empty() {
            println!("  Disabled Writers: none");
        } else {
            println!("  Disabled Writers: {}", config.plugins.disabled.join(", "));
        }
        if config.logging.local_enabled {
            println!(
                "  Log File: {} (rotation: {})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  Log File: disabled");
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MapExportError;

    #[test]
    fn test_valid_config_exit_code() {
        let loaded = Ok(MapExportConfig::default());
        let code = ValidateArgs {}
            .execute(Some(Path::new("mapexport.toml")), &loaded)
            .unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_invalid_config_exit_code() {
        let loaded = Err(MapExportError::Configuration("bad level".to_string()));
        let code = ValidateArgs {}.execute(None, &loaded).unwrap();
        assert_eq!(code, 2);
    }
}
