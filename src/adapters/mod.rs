//! Map readers and format writers for mapexport.
//!
//! - [`reader`] - Loads map documents ([`reader::MapReader`], TMX)
//! - [`writers`] - Format writer plugins and their registry
//!
//! # Design Pattern
//!
//! Both sides sit behind traits so the export pipeline never depends on a
//! concrete format. Tests substitute their own implementations.
//!
//! ```rust,no_run
//! use mapexport::adapters::reader::{MapReader, TmxReader};
//! use mapexport::adapters::writers::{JsonWriter, MapWriter};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let map = TmxReader::new().read_map(Path::new("town.tmx"))?;
//! JsonWriter.write(&map, Path::new("town.json"))?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writers;
