//! Lua map writer
//!
//! Emits the map as a single Lua table returned from a chunk, so that a game
//! can load it with `dofile` or `require`:
//!
//! ```lua
//! return {
//!   version = "1.1",
//!   luaversion = "5.1",
//!   orientation = "orthogonal",
//!   ...
//! }
//! ```

use super::MapWriter;
use crate::domain::{Layer, Map, MapObject, NameFilterSet, Properties, Tileset, WriteError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes maps as Lua tables
#[derive(Debug, Clone, Copy, Default)]
pub struct LuaWriter;

impl MapWriter for LuaWriter {
    fn name(&self) -> &str {
        "lua"
    }

    fn name_filters(&self) -> NameFilterSet {
        NameFilterSet::new().with_entry("Lua files", ["*.lua"])
    }

    fn write(&self, map: &Map, target: &Path) -> Result<(), WriteError> {
        let file = File::create(target)?;
        let mut lua = LuaTableWriter::new(BufWriter::new(file));
        write_map(&mut lua, map)?;
        lua.finish()?;
        Ok(())
    }
}

fn write_map<W: Write>(lua: &mut LuaTableWriter<W>, map: &Map) -> io::Result<()> {
    lua.start_return_table()?;
    lua.string("version", "1.1")?;
    lua.string("luaversion", "5.1")?;
    lua.string("orientation", map.orientation.as_str())?;
    lua.string("renderorder", map.render_order.as_str())?;
    lua.integer("width", map.width.into())?;
    lua.integer("height", map.height.into())?;
    lua.integer("tilewidth", map.tile_width.into())?;
    lua.integer("tileheight", map.tile_height.into())?;
    write_properties(lua, &map.properties)?;

    lua.start_table(Some("tilesets"))?;
    for tileset in map.tilesets() {
        write_tileset(lua, tileset)?;
    }
    lua.end_table()?;

    lua.start_table(Some("layers"))?;
    for layer in &map.layers {
        write_layer(lua, layer)?;
    }
    lua.end_table()?;

    lua.end_return_table()
}

fn write_properties<W: Write>(lua: &mut LuaTableWriter<W>, properties: &Properties) -> io::Result<()> {
    if properties.is_empty() {
        return lua.raw_entry("properties", "{}");
    }
    lua.start_table(Some("properties"))?;
    for (name, value) in properties {
        lua.string(name, value)?;
    }
    lua.end_table()
}

fn write_tileset<W: Write>(lua: &mut LuaTableWriter<W>, tileset: &Tileset) -> io::Result<()> {
    lua.start_table(None)?;
    lua.string("name", &tileset.name)?;
    lua.integer("firstgid", tileset.first_gid.into())?;
    lua.integer("tilewidth", tileset.tile_width.into())?;
    lua.integer("tileheight", tileset.tile_height.into())?;
    lua.integer("spacing", tileset.spacing.into())?;
    lua.integer("margin", tileset.margin.into())?;
    if let Some(image) = &tileset.image {
        lua.string("image", &image.source)?;
        lua.integer("imagewidth", image.width.into())?;
        lua.integer("imageheight", image.height.into())?;
    }
    lua.integer("tilecount", tileset.tile_count.into())?;
    write_properties(lua, &tileset.properties)?;
    lua.end_table()
}

fn write_layer<W: Write>(lua: &mut LuaTableWriter<W>, layer: &Layer) -> io::Result<()> {
    lua.start_table(None)?;
    match layer {
        Layer::Tiles(tiles) => {
            lua.string("type", "tilelayer")?;
            lua.string("name", &tiles.name)?;
            lua.integer("x", 0)?;
            lua.integer("y", 0)?;
            lua.integer("width", tiles.width.into())?;
            lua.integer("height", tiles.height.into())?;
            lua.boolean("visible", tiles.visible)?;
            lua.number("opacity", tiles.opacity.into())?;
            write_properties(lua, &tiles.properties)?;
            lua.string("encoding", "lua")?;
            lua.start_table(Some("data"))?;
            for row in tiles.rows() {
                let line: Vec<String> = row.iter().map(u32::to_string).collect();
                lua.raw_line(&format!("{},", line.join(", ")))?;
            }
            lua.end_table()?;
        }
        Layer::Objects(group) => {
            lua.string("type", "objectgroup")?;
            lua.string("name", &group.name)?;
            lua.boolean("visible", group.visible)?;
            lua.number("opacity", group.opacity.into())?;
            write_properties(lua, &group.properties)?;
            lua.start_table(Some("objects"))?;
            for object in &group.objects {
                write_object(lua, object)?;
            }
            lua.end_table()?;
        }
    }
    lua.end_table()
}

fn write_object<W: Write>(lua: &mut LuaTableWriter<W>, object: &MapObject) -> io::Result<()> {
    lua.start_table(None)?;
    lua.integer("id", object.id.into())?;
    lua.string("name", &object.name)?;
    lua.string("type", &object.kind)?;
    lua.string("shape", "rectangle")?;
    lua.number("x", object.x)?;
    lua.number("y", object.y)?;
    lua.number("width", object.width)?;
    lua.number("height", object.height)?;
    lua.number("rotation", object.rotation)?;
    if let Some(gid) = object.gid {
        lua.integer("gid", gid.into())?;
    }
    lua.boolean("visible", object.visible)?;
    write_properties(lua, &object.properties)?;
    lua.end_table()
}

/// Indenting writer for nested Lua table constructors
///
/// Every entry is terminated by a comma, which Lua accepts before a closing
/// brace.
struct LuaTableWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> LuaTableWriter<W> {
    fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    fn start_return_table(&mut self) -> io::Result<()> {
        writeln!(self.out, "return {{")?;
        self.depth = 1;
        Ok(())
    }

    fn end_return_table(&mut self) -> io::Result<()> {
        self.depth = 0;
        writeln!(self.out, "}}")
    }

    fn start_table(&mut self, key: Option<&str>) -> io::Result<()> {
        match key {
            Some(key) => self.raw_line(&format!("{} = {{", lua_key(key)))?,
            None => self.raw_line("{")?,
        }
        self.depth += 1;
        Ok(())
    }

    fn end_table(&mut self) -> io::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.raw_line("},")
    }

    fn string(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.raw_entry(key, &lua_string(value))
    }

    fn integer(&mut self, key: &str, value: i64) -> io::Result<()> {
        self.raw_entry(key, &value.to_string())
    }

    fn number(&mut self, key: &str, value: f64) -> io::Result<()> {
        self.raw_entry(key, &lua_number(value))
    }

    fn boolean(&mut self, key: &str, value: bool) -> io::Result<()> {
        self.raw_entry(key, if value { "true" } else { "false" })
    }

    fn raw_entry(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.raw_line(&format!("{} = {},", lua_key(key), value))
    }

    fn raw_line(&mut self, line: &str) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(b"  ")?;
        }
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")
    }

    fn finish(mut self) -> io::Result<()> {
        self.out.flush()
    }
}

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// Bare identifier when possible, `["..."]` otherwise
fn lua_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_identifier && !LUA_KEYWORDS.contains(&key) {
        key.to_string()
    } else {
        format!("[{}]", lua_string(key))
    }
}

fn lua_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\0' => quoted.push_str("\\0"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn lua_number(value: f64) -> String {
    if value.is_nan() {
        "0/0".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "math.huge".to_string()
        } else {
            "-math.huge".to_string()
        }
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
