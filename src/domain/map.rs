//! Tile map document model
//!
//! A [`Map`] is what a reader produces and a writer consumes. It owns its
//! tilesets; dropping the map releases them, together with any
//! [`ResourceLease`] they carry.

use super::resources::ResourceLease;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Bit set on a gid when the tile is flipped horizontally
pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
/// Bit set on a gid when the tile is flipped vertically
pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
/// Bit set on a gid when the tile is flipped anti-diagonally
pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;

const FLIP_MASK: u32 = FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY;

/// Strips the flip flags from a gid
pub fn strip_flip_flags(gid: u32) -> u32 {
    gid & !FLIP_MASK
}

/// Custom properties, sorted by name
pub type Properties = BTreeMap<String, String>;

/// Map projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Orthogonal => "orthogonal",
            Orientation::Isometric => "isometric",
            Orientation::Staggered => "staggered",
            Orientation::Hexagonal => "hexagonal",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orthogonal" => Ok(Orientation::Orthogonal),
            "isometric" => Ok(Orientation::Isometric),
            "staggered" => Ok(Orientation::Staggered),
            "hexagonal" => Ok(Orientation::Hexagonal),
            other => Err(format!("unknown orientation '{other}'")),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which tiles are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderOrder::RightDown => "right-down",
            RenderOrder::RightUp => "right-up",
            RenderOrder::LeftDown => "left-down",
            RenderOrder::LeftUp => "left-up",
        }
    }
}

impl FromStr for RenderOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right-down" => Ok(RenderOrder::RightDown),
            "right-up" => Ok(RenderOrder::RightUp),
            "left-down" => Ok(RenderOrder::LeftDown),
            "left-up" => Ok(RenderOrder::LeftUp),
            other => Err(format!("unknown render order '{other}'")),
        }
    }
}

/// Image backing a tileset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetImage {
    /// Path as written in the document, relative to it
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// A tileset owned by a map
#[derive(Debug)]
pub struct Tileset {
    pub first_gid: u32,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub image: Option<TilesetImage>,
    /// External `.tsx` file this tileset was loaded from, if any
    pub source: Option<PathBuf>,
    pub properties: Properties,
    lease: Option<ResourceLease>,
}

impl Tileset {
    /// Creates a tileset with no image and no properties
    pub fn new(first_gid: u32, name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            first_gid,
            name: name.into(),
            tile_width,
            tile_height,
            spacing: 0,
            margin: 0,
            tile_count: 0,
            columns: 0,
            image: None,
            source: None,
            properties: Properties::new(),
            lease: None,
        }
    }

    /// Attaches a lease that is returned when the tileset is dropped
    pub fn with_lease(mut self, lease: ResourceLease) -> Self {
        self.lease = Some(lease);
        self
    }

    /// Whether a lease is attached
    pub fn is_leased(&self) -> bool {
        self.lease.is_some()
    }
}

/// Grid of gids
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub visible: bool,
    pub properties: Properties,
    /// Row-major gids, flip flags included; `0` is an empty cell
    pub tiles: Vec<u32>,
}

impl TileLayer {
    /// Creates a fully opaque, visible layer holding `tiles` in row-major order
    pub fn new(name: impl Into<String>, width: u32, height: u32, tiles: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            opacity: 1.0,
            visible: true,
            properties: Properties::new(),
            tiles,
        }
    }

    /// Gid at `(x, y)`, or `None` outside the layer
    pub fn gid_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles
            .get((y as usize) * (self.width as usize) + x as usize)
            .copied()
    }

    /// Rows of gids, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}

/// A placed object
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub gid: Option<u32>,
    pub visible: bool,
    pub properties: Properties,
}

impl MapObject {
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id,
            name: String::new(),
            kind: String::new(),
            x,
            y,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            gid: None,
            visible: true,
            properties: Properties::new(),
        }
    }
}

/// Layer of free-standing objects
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub opacity: f32,
    pub visible: bool,
    pub properties: Properties,
    pub objects: Vec<MapObject>,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            visible: true,
            properties: Properties::new(),
            objects: Vec::new(),
        }
    }
}

/// A map layer
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Tiles(TileLayer),
    Objects(ObjectGroup),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Tiles(layer) => &layer.name,
            Layer::Objects(group) => &group.name,
        }
    }
}

/// A loaded tile map
#[derive(Debug)]
pub struct Map {
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub properties: Properties,
    pub layers: Vec<Layer>,
    tilesets: Vec<Tileset>,
}

impl Map {
    /// Creates an empty map
    pub fn new(
        orientation: Orientation,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            orientation,
            render_order: RenderOrder::default(),
            width,
            height,
            tile_width,
            tile_height,
            properties: Properties::new(),
            layers: Vec::new(),
            tilesets: Vec::new(),
        }
    }

    /// Takes ownership of a tileset
    pub fn add_tileset(&mut self, tileset: Tileset) {
        self.tilesets.push(tileset);
        self.tilesets.sort_by_key(|t| t.first_gid);
    }

    /// Owned tilesets, ordered by first gid
    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Tiles(tiles) => Some(tiles),
            Layer::Objects(_) => None,
        })
    }

    pub fn object_groups(&self) -> impl Iterator<Item = &ObjectGroup> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Objects(group) => Some(group),
            Layer::Tiles(_) => None,
        })
    }

    /// Tileset a gid belongs to: the one with the greatest `first_gid <= gid`
    ///
    /// Flip flags are ignored. Returns `None` for the empty gid `0` or when
    /// no tileset covers it.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        let gid = strip_flip_flags(gid);
        if gid == 0 {
            return None;
        }
        self.tilesets.iter().rev().find(|t| t.first_gid <= gid)
    }

    /// Tileset-local id of a gid, or `None` for an empty cell
    pub fn local_tile_id(&self, gid: u32) -> Option<u32> {
        self.tileset_for_gid(gid)
            .map(|tileset| strip_flip_flags(gid) - tileset.first_gid)
    }
}
