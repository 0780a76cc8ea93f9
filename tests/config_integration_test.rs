//! Integration tests for configuration loading and validation
//!
//! Tests touching environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use mapexport::adapters::writers::create_writer_registry;
use mapexport::config::{load_config, load_config_or_default};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("MAPEXPORT_APPLICATION_LOG_LEVEL");
    std::env::remove_var("MAPEXPORT_PLUGINS_DISABLED");
    std::env::remove_var("MAPEXPORT_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("MAPEXPORT_LOGGING_LOCAL_PATH");
    std::env::remove_var("MAPEXPORT_LOGGING_LOCAL_ROTATION");
    std::env::remove_var("TEST_MAPEXPORT_LOG_DIR");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[plugins]
disabled = ["lua"]

[logging]
local_enabled = true
local_path = "/var/log/mapexport"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.plugins.disabled, vec!["lua"]);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_path, "/var/log/mapexport");
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "warn");
    assert!(config.plugins.disabled.is_empty());
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_MAPEXPORT_LOG_DIR", "/tmp/mapexport-logs");

    let temp_file = write_config(
        r#"
[logging]
local_enabled = true
local_path = "${TEST_MAPEXPORT_LOG_DIR}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.logging.local_path, "/tmp/mapexport-logs");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[logging]
local_path = "${TEST_MAPEXPORT_LOG_DIR}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_MAPEXPORT_LOG_DIR"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("MAPEXPORT_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("MAPEXPORT_PLUGINS_DISABLED", "csv,json");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[plugins]
disabled = ["lua"]
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    // Verify env var overrides took effect
    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.plugins.disabled, vec!["csv", "json"]);

    cleanup_env_vars();
}

#[test]
fn test_invalid_override_fails_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("MAPEXPORT_LOGGING_LOCAL_ROTATION", "weekly");

    let temp_file = write_config("");
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("weekly"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "loud"
"#,
    );
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid log_level 'loud'"));

    let temp_file = write_config(
        r#"
[plugins]
disabled = ["png"]
"#,
    );
    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Unknown writer 'png'"));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let result = load_config_or_default(Some(std::path::Path::new("does-not-exist.toml")));
    assert!(result.is_err());
}

#[test]
fn test_disabled_plugins_shape_registry() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[plugins]
disabled = ["LUA"]
"#,
    );
    let config = load_config(temp_file.path()).expect("Failed to load config");
    let registry = create_writer_registry(&config.plugins).unwrap();

    assert_eq!(registry.names(), vec!["json", "csv"]);
}
