//! CSV map writer
//!
//! Writes each tile layer as a grid of tileset-local tile ids, `-1` for
//! empty cells. The first tile layer goes to the target path; every further
//! layer goes next to it as `<stem>_<layer>.<ext>`.

use super::MapWriter;
use crate::domain::{Map, NameFilterSet, TileLayer, WriteError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Writes tile layers as CSV grids
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvWriter;

impl MapWriter for CsvWriter {
    fn name(&self) -> &str {
        "csv"
    }

    fn name_filters(&self) -> NameFilterSet {
        NameFilterSet::new().with_entry("CSV files", ["*.csv"])
    }

    fn write(&self, map: &Map, target: &Path) -> Result<(), WriteError> {
        let layers: Vec<&TileLayer> = map.tile_layers().collect();
        if layers.is_empty() {
            return Err(WriteError::Unsupported(
                "map has no tile layers to export as CSV".to_string(),
            ));
        }

        // A name clash must fail before any file is created
        let mut seen = HashSet::new();
        let mut outputs = Vec::with_capacity(layers.len());
        for (index, layer) in layers.into_iter().enumerate() {
            let path = if index == 0 {
                target.to_path_buf()
            } else {
                layer_path(target, &layer.name)
            };
            if !seen.insert(path.clone()) {
                return Err(WriteError::Unsupported(format!(
                    "layer '{}' would overwrite {}",
                    layer.name,
                    path.display()
                )));
            }
            outputs.push((layer, path));
        }

        for (layer, path) in outputs {
            tracing::debug!(layer = %layer.name, path = %path.display(), "Writing CSV layer");
            write_layer(map, layer, &path)?;
        }

        Ok(())
    }
}

fn write_layer(map: &Map, layer: &TileLayer, path: &Path) -> Result<(), WriteError> {
    let mut out = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in layer.rows() {
        out.write_record(row.iter().map(|&gid| match map.local_tile_id(gid) {
            Some(id) => id.to_string(),
            None => "-1".to_string(),
        }))?;
    }
    out.flush()?;
    Ok(())
}

/// `dir/out.csv` + `"walls"` becomes `dir/out_walls.csv`
fn layer_path(target: &Path, layer_name: &str) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let safe_name: String = layer_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let file_name = match target.extension() {
        Some(ext) => format!("{stem}_{safe_name}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{safe_name}"),
    };
    target.with_file_name(file_name)
}
