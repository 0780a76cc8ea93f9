//! Export summary and reporting
//!
//! An [`ExportSummary`] exists only for exports that succeeded (or dry runs
//! that would have written); failures are reported through
//! [`ExportError`](crate::domain::ExportError) instead.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

/// Summary of a single export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Name of the writer that produced the target
    pub writer: String,

    /// Label of the filter that selected the writer
    pub filter_label: String,

    pub source: PathBuf,
    pub target: PathBuf,

    /// Number of layers in the exported map
    pub layer_count: usize,

    /// Number of tilesets the map held while it was loaded
    pub tileset_count: usize,

    /// Wall time from resolution to release
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Whether the write step was skipped
    pub dry_run: bool,

    pub completed_at: DateTime<Utc>,
}

impl ExportSummary {
    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            writer = %self.writer,
            filter = %self.filter_label,
            source = %self.source.display(),
            target = %self.target.display(),
            layers = self.layer_count,
            tilesets = self.tileset_count,
            duration_ms = self.duration.as_millis() as u64,
            dry_run = self.dry_run,
            "Export completed"
        );
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ExportSummary {
        ExportSummary {
            writer: "json".to_string(),
            filter_label: "Json files".to_string(),
            source: PathBuf::from("town.tmx"),
            target: PathBuf::from("town.json"),
            layer_count: 3,
            tileset_count: 2,
            duration: Duration::from_millis(1500),
            dry_run: false,
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_serializes_duration_in_millis() {
        let value = serde_json::to_value(summary()).unwrap();
        assert_eq!(value["duration_ms"], 1500);
        assert_eq!(value["writer"], "json");
        assert_eq!(value["target"], "town.json");
        assert!(value.get("duration").is_none());
    }
}
