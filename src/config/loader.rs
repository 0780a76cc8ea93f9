//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MapExportConfig;
use crate::domain::context::ResultExt;
use crate::domain::errors::MapExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mapexport.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into MapExportConfig
/// 4. Applies environment variable overrides (MAPEXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - Environment variable substitution fails
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use mapexport::config::loader::load_config;
///
/// let config = load_config("mapexport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MapExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MapExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let contents = substitute_env_vars(&contents)?;
    let mut config: MapExportConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Loads `path` if given, else `mapexport.toml` if it exists, else defaults
///
/// Environment overrides and validation apply to the defaults too.
///
/// # Errors
///
/// Returns an error if an explicitly named file is missing, or for any of
/// the reasons listed on [`load_config`].
pub fn load_config_or_default(path: Option<&Path>) -> Result<MapExportConfig> {
    if let Some(path) = path {
        return load_config(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return load_config(default_path);
    }

    let mut config = MapExportConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &MapExportConfig) -> Result<()> {
    config.validate().map_err(|e| {
        MapExportError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
pub(crate) fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MapExportError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed_line = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|m| m == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MapExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the MAPEXPORT_* prefix
///
/// Variables follow the pattern `MAPEXPORT_<SECTION>_<KEY>`, for example
/// `MAPEXPORT_APPLICATION_LOG_LEVEL`. `lookup` returns the value of a
/// variable, or `None` when it is unset.
///
/// # Errors
///
/// Returns an error if a boolean override is not `true` or `false`
pub(crate) fn apply_env_overrides<F>(config: &mut MapExportConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    // Application overrides
    if let Some(val) = lookup("MAPEXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Plugin overrides
    if let Some(val) = lookup("MAPEXPORT_PLUGINS_DISABLED") {
        config.plugins.disabled = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    // Logging overrides
    if let Some(val) = lookup("MAPEXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.trim().parse().map_err(|_| {
            MapExportError::Configuration(format!(
                "MAPEXPORT_LOGGING_LOCAL_ENABLED must be true or false, got '{val}'"
            ))
        })?;
    }
    if let Some(val) = lookup("MAPEXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = lookup("MAPEXPORT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
