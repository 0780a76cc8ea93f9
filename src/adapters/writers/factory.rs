//! Writer registry factory
//!
//! This module builds the registry of built-in writers from configuration.

use super::{CsvWriter, JsonWriter, LuaWriter, MapWriter, WriterRegistry};
use crate::config::schema::PluginsConfig;
use crate::domain::Result;

/// Names of the built-in writers, in registration order
pub fn builtin_writer_names() -> &'static [&'static str] {
    &["json", "lua", "csv"]
}

fn builtin_writers() -> Vec<Box<dyn MapWriter>> {
    vec![
        Box::new(JsonWriter),
        Box::new(LuaWriter),
        Box::new(CsvWriter),
    ]
}

/// Create the writer registry based on the configuration
///
/// Every built-in writer is registered unless its name appears in
/// `plugins.disabled`.
///
/// # Errors
///
/// Returns an error if a writer fails registration.
pub fn create_writer_registry(config: &PluginsConfig) -> Result<WriterRegistry> {
    let mut registry = WriterRegistry::new();

    for writer in builtin_writers() {
        if config.is_disabled(writer.name()) {
            tracing::info!(writer = %writer.name(), "Writer disabled by configuration");
            continue;
        }
        registry.register_boxed(writer)?;
    }

    tracing::debug!(writers = ?registry.names(), "Writer registry ready");
    Ok(registry)
}
