//! Registry of loaded writers
//!
//! The registry keeps writers in registration order. That order is what the
//! resolver walks, so it decides which writer wins a format hint shared by
//! several of them.

use super::MapWriter;
use crate::domain::errors::MapExportError;
use crate::domain::{NameFilterSet, Result};
use std::fmt;

/// A registered writer together with the filters it declared
pub struct WriterDescriptor {
    writer: Box<dyn MapWriter>,
    filters: NameFilterSet,
}

impl WriterDescriptor {
    /// Snapshots the writer's filters and validates them
    ///
    /// # Errors
    ///
    /// Returns a validation error if the writer has no name or its filters
    /// are unusable (see [`NameFilterSet::validate`]).
    pub fn new(writer: Box<dyn MapWriter>) -> Result<Self> {
        if writer.name().trim().is_empty() {
            return Err(MapExportError::Validation(
                "writer name cannot be empty".to_string(),
            ));
        }

        let filters = writer.name_filters();
        filters.validate().map_err(|e| {
            MapExportError::Validation(format!("writer '{}': {e}", writer.name()))
        })?;

        Ok(Self { writer, filters })
    }

    pub fn name(&self) -> &str {
        self.writer.name()
    }

    pub fn filters(&self) -> &NameFilterSet {
        &self.filters
    }

    pub fn writer(&self) -> &dyn MapWriter {
        self.writer.as_ref()
    }
}

impl fmt::Debug for WriterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterDescriptor")
            .field("name", &self.name())
            .field("filters", &self.filters)
            .finish()
    }
}

/// Ordered, append-only collection of writers
#[derive(Debug, Default)]
pub struct WriterRegistry {
    descriptors: Vec<WriterDescriptor>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a writer
    ///
    /// # Errors
    ///
    /// Returns a validation error if the writer's filters are invalid or a
    /// writer with the same name (case-insensitive) is already registered.
    pub fn register<W: MapWriter + 'static>(&mut self, writer: W) -> Result<()> {
        self.register_boxed(Box::new(writer))
    }

    /// Registers an already boxed writer
    ///
    /// # Errors
    ///
    /// See [`WriterRegistry::register`].
    pub fn register_boxed(&mut self, writer: Box<dyn MapWriter>) -> Result<()> {
        let descriptor = WriterDescriptor::new(writer)?;

        if self.get(descriptor.name()).is_some() {
            return Err(MapExportError::Validation(format!(
                "a writer named '{}' is already registered",
                descriptor.name()
            )));
        }

        tracing::debug!(
            writer = %descriptor.name(),
            filters = descriptor.filters().len(),
            "Registered map writer"
        );
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// All descriptors, in registration order
    pub fn descriptors(&self) -> &[WriterDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriterDescriptor> {
        self.descriptors.iter()
    }

    /// Looks a writer up by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&WriterDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(WriterDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
