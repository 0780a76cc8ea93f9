//! Configuration management for mapexport.
//!
//! # Overview
//!
//! mapexport reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MAPEXPORT_*` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`PluginsConfig`] - Built-in writers to leave out of the registry
//! - [`LoggingConfig`] - Optional JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [plugins]
//! disabled = ["lua"]
//!
//! [logging]
//! local_enabled = true
//! local_path = "${HOME}/.local/state/mapexport"
//! local_rotation = "daily"
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use mapexport::config::load_config;
//!
//! # fn example() {
//! match load_config("mapexport.toml") {
//!     Ok(config) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{ApplicationConfig, LoggingConfig, MapExportConfig, PluginsConfig};
