//! JSON map writer
//!
//! Produces the Tiled JSON map layout: map attributes at the top level,
//! embedded tilesets, and a `layers` array whose entries are tagged
//! `tilelayer` or `objectgroup`.

use super::MapWriter;
use crate::domain::{
    Layer, Map, MapObject, NameFilterSet, ObjectGroup, Properties, TileLayer, Tileset, WriteError,
};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const FORMAT_VERSION: f64 = 1.0;

/// Writes maps as Tiled JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl MapWriter for JsonWriter {
    fn name(&self) -> &str {
        "json"
    }

    fn name_filters(&self) -> NameFilterSet {
        NameFilterSet::new().with_entry("Json files", ["*.json"])
    }

    fn write(&self, map: &Map, target: &Path) -> Result<(), WriteError> {
        let file = File::create(target)?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &JsonMap::from(map))?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonMap<'a> {
    version: f64,
    orientation: &'static str,
    renderorder: &'static str,
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    properties: &'a Properties,
    tilesets: Vec<JsonTileset<'a>>,
    layers: Vec<JsonLayer<'a>>,
}

impl<'a> From<&'a Map> for JsonMap<'a> {
    fn from(map: &'a Map) -> Self {
        Self {
            version: FORMAT_VERSION,
            orientation: map.orientation.as_str(),
            renderorder: map.render_order.as_str(),
            width: map.width,
            height: map.height,
            tilewidth: map.tile_width,
            tileheight: map.tile_height,
            properties: &map.properties,
            tilesets: map.tilesets().iter().map(JsonTileset::from).collect(),
            layers: map.layers.iter().map(JsonLayer::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonTileset<'a> {
    firstgid: u32,
    name: &'a str,
    tilewidth: u32,
    tileheight: u32,
    spacing: u32,
    margin: u32,
    tilecount: u32,
    columns: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    imagewidth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    imageheight: Option<u32>,
    properties: &'a Properties,
}

impl<'a> From<&'a Tileset> for JsonTileset<'a> {
    fn from(tileset: &'a Tileset) -> Self {
        let image = tileset.image.as_ref();
        Self {
            firstgid: tileset.first_gid,
            name: &tileset.name,
            tilewidth: tileset.tile_width,
            tileheight: tileset.tile_height,
            spacing: tileset.spacing,
            margin: tileset.margin,
            tilecount: tileset.tile_count,
            columns: tileset.columns,
            image: image.map(|i| i.source.as_str()),
            imagewidth: image.map(|i| i.width),
            imageheight: image.map(|i| i.height),
            properties: &tileset.properties,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonLayer<'a> {
    TileLayer {
        name: &'a str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        opacity: f32,
        visible: bool,
        properties: &'a Properties,
        data: &'a [u32],
    },
    ObjectGroup {
        name: &'a str,
        opacity: f32,
        visible: bool,
        properties: &'a Properties,
        objects: Vec<JsonObject<'a>>,
    },
}

impl<'a> From<&'a Layer> for JsonLayer<'a> {
    fn from(layer: &'a Layer) -> Self {
        match layer {
            Layer::Tiles(TileLayer {
                name,
                width,
                height,
                opacity,
                visible,
                properties,
                tiles,
            }) => JsonLayer::TileLayer {
                name,
                x: 0,
                y: 0,
                width: *width,
                height: *height,
                opacity: *opacity,
                visible: *visible,
                properties,
                data: tiles,
            },
            Layer::Objects(ObjectGroup {
                name,
                opacity,
                visible,
                properties,
                objects,
            }) => JsonLayer::ObjectGroup {
                name,
                opacity: *opacity,
                visible: *visible,
                properties,
                objects: objects.iter().map(JsonObject::from).collect(),
            },
        }
    }
}

#[derive(Serialize)]
struct JsonObject<'a> {
    id: u32,
    name: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rotation: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    gid: Option<u32>,
    visible: bool,
    properties: &'a Properties,
}

impl<'a> From<&'a MapObject> for JsonObject<'a> {
    fn from(object: &'a MapObject) -> Self {
        Self {
            id: object.id,
            name: &object.name,
            kind: &object.kind,
            x: object.x,
            y: object.y,
            width: object.width,
            height: object.height,
            rotation: object.rotation,
            gid: object.gid,
            visible: object.visible,
            properties: &object.properties,
        }
    }
}
