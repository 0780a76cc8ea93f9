//! Domain models and types for mapexport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Map document model** ([`Map`], [`Tileset`], [`Layer`])
//! - **Name filters** declared by writers ([`NameFilterSet`])
//! - **Export requests** ([`ExportRequest`])
//! - **Sub-resource accounting** ([`ResourceLedger`])
//! - **Error types** ([`MapExportError`], [`ExportError`], [`ReadError`], [`WriteError`])
//! - **Result type alias** ([`Result`])
//!
//! # Ownership
//!
//! A [`Map`] owns its tilesets. Writers only ever see `&Map`; the export
//! coordinator owns the map and drops it once the write attempt is over.
//!
//! ```rust
//! use mapexport::domain::{Map, Orientation, ResourceLedger, Tileset};
//!
//! let ledger = ResourceLedger::new();
//! let mut map = Map::new(Orientation::Orthogonal, 10, 10, 32, 32);
//! map.add_tileset(Tileset::new(1, "terrain", 32, 32).with_lease(ledger.acquire()));
//! assert_eq!(ledger.live(), 1);
//!
//! drop(map);
//! assert_eq!(ledger.live(), 0);
//! ```

pub mod context;
pub mod errors;
pub mod filters;
pub mod map;
pub mod request;
pub mod resources;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExportError, ExportErrorKind, MapExportError, ReadError, WriteError};
pub use filters::{NameFilterEntry, NameFilterSet};
pub use map::{
    Layer, Map, MapObject, ObjectGroup, Orientation, Properties, RenderOrder, TileLayer, Tileset,
    TilesetImage,
};
pub use request::ExportRequest;
pub use resources::{ResourceLease, ResourceLedger};
pub use result::Result;
