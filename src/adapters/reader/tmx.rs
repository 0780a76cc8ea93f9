//! TMX map reader
//!
//! Reads the XML map format: `<map>` with `<properties>`, `<tileset>`
//! (inline or external `.tsx`), `<layer>` and `<objectgroup>` children.
//! Layer data may be plain XML `<tile>` elements, CSV, or base64 with
//! optional zlib/gzip compression. Elements we do not model are skipped.

use super::MapReader;
use crate::domain::map::{
    Layer, Map, MapObject, ObjectGroup, Orientation, Properties, TileLayer, Tileset, TilesetImage,
};
use crate::domain::{ReadError, ResourceLedger};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Reader for `.tmx` files
#[derive(Debug, Clone, Default)]
pub struct TmxReader {
    ledger: Option<ResourceLedger>,
}

impl TmxReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a lease from `ledger` to every tileset the reader creates
    pub fn with_ledger(ledger: ResourceLedger) -> Self {
        Self {
            ledger: Some(ledger),
        }
    }

    /// Parses a TMX document held in memory
    ///
    /// External tilesets are resolved relative to `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed, the root is not `<map>`,
    /// required attributes are missing or layer data cannot be decoded.
    pub fn parse(&self, input: &[u8], base_dir: &Path) -> Result<Map, ReadError> {
        let mut parser = Parser::new(input);
        let root = parser.root("map")?;
        self.read_map_element(&mut parser, &root, base_dir)
    }

    fn read_map_element<'a>(
        &self,
        parser: &mut Parser<'a>,
        element: &Element<'a>,
        base_dir: &Path,
    ) -> Result<Map, ReadError> {
        let attrs = element.attrs()?;

        if attrs.flag("infinite", false)? {
            return Err(ReadError::Unsupported(
                "infinite maps are not supported".to_string(),
            ));
        }

        let orientation = match attrs.get("orientation") {
            Some(value) => value.parse::<Orientation>().map_err(ReadError::invalid)?,
            None => Orientation::default(),
        };
        let tile_width: u32 = attrs.required("tilewidth")?;
        let tile_height: u32 = attrs.required("tileheight")?;
        if tile_width == 0 || tile_height == 0 {
            return Err(ReadError::invalid("tile size must be positive"));
        }

        let mut map = Map::new(
            orientation,
            attrs.required("width")?,
            attrs.required("height")?,
            tile_width,
            tile_height,
        );
        if let Some(order) = attrs.get("renderorder") {
            map.render_order = order.parse().map_err(ReadError::invalid)?;
        }

        parser.children(element, |parser, child| {
            if child.is("properties") {
                map.properties = read_properties(parser, &child)?;
            } else if child.is("tileset") {
                let tileset = self.read_tileset_ref(parser, &child, base_dir)?;
                map.add_tileset(tileset);
            } else if child.is("layer") {
                map.layers.push(Layer::Tiles(read_tile_layer(parser, &child)?));
            } else if child.is("objectgroup") {
                map.layers
                    .push(Layer::Objects(read_object_group(parser, &child)?));
            } else {
                parser.skip(&child)?;
            }
            Ok(())
        })?;

        Ok(map)
    }

    fn read_tileset_ref<'a>(
        &self,
        parser: &mut Parser<'a>,
        element: &Element<'a>,
        base_dir: &Path,
    ) -> Result<Tileset, ReadError> {
        let attrs = element.attrs()?;
        let first_gid: u32 = attrs.parse_or("firstgid", 1)?;
        if first_gid == 0 {
            return Err(ReadError::invalid("tileset firstgid must be at least 1"));
        }

        let tileset = match attrs.get("source") {
            Some(source) => {
                parser.skip(element)?;
                read_external_tileset(first_gid, &base_dir.join(source))?
            }
            None => read_tileset_body(parser, element, &attrs, first_gid)?,
        };

        Ok(match &self.ledger {
            Some(ledger) => tileset.with_lease(ledger.acquire()),
            None => tileset,
        })
    }
}

impl MapReader for TmxReader {
    fn read_map(&self, path: &Path) -> Result<Map, ReadError> {
        let bytes = std::fs::read(path).map_err(|e| ReadError::io(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let map = self.parse(&bytes, base_dir)?;

        tracing::debug!(
            path = %path.display(),
            layers = map.layers.len(),
            tilesets = map.tilesets().len(),
            "Loaded TMX map"
        );
        Ok(map)
    }
}

fn read_external_tileset(first_gid: u32, path: &Path) -> Result<Tileset, ReadError> {
    let bytes = std::fs::read(path).map_err(|e| ReadError::io(path, e))?;
    let mut parser = Parser::new(&bytes);
    let root = parser.root("tileset")?;
    let attrs = root.attrs()?;

    let mut tileset = read_tileset_body(&mut parser, &root, &attrs, first_gid)?;
    tileset.source = Some(path.to_path_buf());
    Ok(tileset)
}

fn read_tileset_body<'a>(
    parser: &mut Parser<'a>,
    element: &Element<'a>,
    attrs: &Attrs,
    first_gid: u32,
) -> Result<Tileset, ReadError> {
    let mut tileset = Tileset::new(
        first_gid,
        attrs.string("name"),
        attrs.required("tilewidth")?,
        attrs.required("tileheight")?,
    );
    tileset.spacing = attrs.parse_or("spacing", 0)?;
    tileset.margin = attrs.parse_or("margin", 0)?;
    tileset.tile_count = attrs.parse_or("tilecount", 0)?;
    tileset.columns = attrs.parse_or("columns", 0)?;

    parser.children(element, |parser, child| {
        if child.is("image") {
            let image = child.attrs()?;
            tileset.image = Some(TilesetImage {
                source: image.required("source")?,
                width: image.parse_or("width", 0)?,
                height: image.parse_or("height", 0)?,
            });
            parser.skip(&child)?;
        } else if child.is("properties") {
            tileset.properties = read_properties(parser, &child)?;
        } else {
            parser.skip(&child)?;
        }
        Ok(())
    })?;

    derive_grid(&mut tileset)?;
    Ok(tileset)
}

/// Fills in `columns`/`tile_count` from the image size when not declared
fn derive_grid(tileset: &mut Tileset) -> Result<(), ReadError> {
    let (image_width, image_height) = match &tileset.image {
        Some(image) => (image.width, image.height),
        None => return Ok(()),
    };
    let overflow = || ReadError::invalid(format!("tileset '{}' grid is too large", tileset.name));

    let stride_x = tileset
        .tile_width
        .checked_add(tileset.spacing)
        .ok_or_else(overflow)?;
    let stride_y = tileset
        .tile_height
        .checked_add(tileset.spacing)
        .ok_or_else(overflow)?;
    if stride_x == 0 || stride_y == 0 {
        return Ok(());
    }

    let margins = tileset.margin.checked_mul(2).ok_or_else(overflow)?;
    let span_x = image_width.checked_add(tileset.spacing).ok_or_else(overflow)?;
    let span_y = image_height.checked_add(tileset.spacing).ok_or_else(overflow)?;
    let columns = span_x.saturating_sub(margins) / stride_x;
    let rows = span_y.saturating_sub(margins) / stride_y;

    if tileset.columns == 0 {
        tileset.columns = columns;
    }
    if tileset.tile_count == 0 {
        tileset.tile_count = columns.checked_mul(rows).ok_or_else(overflow)?;
    }
    Ok(())
}

fn read_tile_layer<'a>(parser: &mut Parser<'a>, element: &Element<'a>) -> Result<TileLayer, ReadError> {
    let attrs = element.attrs()?;
    let name = attrs.string("name");
    let width: u32 = attrs.required("width")?;
    let height: u32 = attrs.required("height")?;
    let opacity = attrs.parse_or("opacity", 1.0)?;
    let visible = attrs.flag("visible", true)?;

    let mut properties = Properties::new();
    let mut tiles = None;
    parser.children(element, |parser, child| {
        if child.is("properties") {
            properties = read_properties(parser, &child)?;
        } else if child.is("data") {
            tiles = Some(read_layer_data(parser, &child)?);
        } else {
            parser.skip(&child)?;
        }
        Ok(())
    })?;

    let tiles =
        tiles.ok_or_else(|| ReadError::invalid(format!("layer '{name}' has no <data> element")))?;
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| ReadError::invalid(format!("layer '{name}' is {width}x{height} tiles")))?;
    if tiles.len() != expected {
        return Err(ReadError::Decode(format!(
            "layer '{name}' has {} tiles, expected {expected}",
            tiles.len()
        )));
    }

    let mut layer = TileLayer::new(name, width, height, tiles);
    layer.opacity = opacity;
    layer.visible = visible;
    layer.properties = properties;
    Ok(layer)
}

fn read_layer_data<'a>(parser: &mut Parser<'a>, element: &Element<'a>) -> Result<Vec<u32>, ReadError> {
    let attrs = element.attrs()?;
    let mut text = String::new();
    let mut gids = Vec::new();

    if !element.empty {
        loop {
            let child = match parser.next()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(|e| ReadError::Xml(e.to_string()))?);
                    continue;
                }
                Event::CData(c) => {
                    text.push_str(&String::from_utf8_lossy(&c));
                    continue;
                }
                Event::Start(start) => Element { start, empty: false },
                Event::Empty(start) => Element { start, empty: true },
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof("data")),
                _ => continue,
            };

            if child.is("tile") {
                gids.push(child.attrs()?.parse_or("gid", 0)?);
            } else if child.is("chunk") {
                return Err(ReadError::Unsupported(
                    "chunked layer data is not supported".to_string(),
                ));
            }
            parser.skip(&child)?;
        }
    }

    match (attrs.get("encoding"), attrs.get("compression")) {
        (Some("base64"), compression) => decode_base64(&text, compression),
        (_, Some(compression)) => Err(ReadError::Unsupported(format!(
            "compression '{compression}' requires base64 encoding"
        ))),
        (None, None) => Ok(gids),
        (Some("csv"), None) => decode_csv(&text),
        (Some(other), None) => Err(ReadError::Unsupported(format!("encoding '{other}'"))),
    }
}

fn decode_csv(text: &str) -> Result<Vec<u32>, ReadError> {
    text.split(',')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            cell.parse::<u32>()
                .map_err(|_| ReadError::Decode(format!("invalid gid '{cell}' in CSV data")))
        })
        .collect()
}

fn decode_base64(text: &str, compression: Option<&str>) -> Result<Vec<u32>, ReadError> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let raw = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| ReadError::Decode(format!("invalid base64: {e}")))?;

    let bytes = match compression {
        None => raw,
        Some("zlib") => inflate(ZlibDecoder::new(raw.as_slice()))?,
        Some("gzip") => inflate(GzDecoder::new(raw.as_slice()))?,
        Some(other) => {
            return Err(ReadError::Unsupported(format!("compression '{other}'")));
        }
    };

    if bytes.len() % 4 != 0 {
        return Err(ReadError::Decode(format!(
            "layer data length {} is not a multiple of 4",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn inflate<R: Read>(mut decoder: R) -> Result<Vec<u8>, ReadError> {
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ReadError::Decode(format!("decompression failed: {e}")))?;
    Ok(out)
}

fn read_object_group<'a>(
    parser: &mut Parser<'a>,
    element: &Element<'a>,
) -> Result<ObjectGroup, ReadError> {
    let attrs = element.attrs()?;
    let mut group = ObjectGroup::new(attrs.string("name"));
    group.opacity = attrs.parse_or("opacity", 1.0)?;
    group.visible = attrs.flag("visible", true)?;

    parser.children(element, |parser, child| {
        if child.is("properties") {
            group.properties = read_properties(parser, &child)?;
        } else if child.is("object") {
            group.objects.push(read_object(parser, &child)?);
        } else {
            parser.skip(&child)?;
        }
        Ok(())
    })?;

    Ok(group)
}

fn read_object<'a>(parser: &mut Parser<'a>, element: &Element<'a>) -> Result<MapObject, ReadError> {
    let attrs = element.attrs()?;
    let mut object = MapObject::new(
        attrs.parse_or("id", 0)?,
        attrs.parse_or("x", 0.0)?,
        attrs.parse_or("y", 0.0)?,
    );
    object.name = attrs.string("name");
    object.kind = match attrs.get("type") {
        Some(kind) => kind.to_string(),
        None => attrs.string("class"),
    };
    object.width = attrs.parse_or("width", 0.0)?;
    object.height = attrs.parse_or("height", 0.0)?;
    object.rotation = attrs.parse_or("rotation", 0.0)?;
    object.gid = attrs.optional("gid")?;
    object.visible = attrs.flag("visible", true)?;

    parser.children(element, |parser, child| {
        if child.is("properties") {
            object.properties = read_properties(parser, &child)?;
        } else {
            parser.skip(&child)?;
        }
        Ok(())
    })?;

    Ok(object)
}

fn read_properties<'a>(parser: &mut Parser<'a>, element: &Element<'a>) -> Result<Properties, ReadError> {
    let mut properties = Properties::new();

    parser.children(element, |parser, child| {
        if child.is("property") {
            let attrs = child.attrs()?;
            let name: String = attrs.required("name")?;
            // Multi-line string values live in the element text instead
            let value = match attrs.get("value") {
                Some(value) => {
                    parser.skip(&child)?;
                    value.to_string()
                }
                None => parser.text(&child)?,
            };
            properties.insert(name, value);
        } else {
            parser.skip(&child)?;
        }
        Ok(())
    })?;

    Ok(properties)
}

fn unexpected_eof(inside: &str) -> ReadError {
    ReadError::Xml(format!("unexpected end of document inside <{inside}>"))
}

/// An element start tag, and whether it was self-closing
struct Element<'a> {
    start: BytesStart<'a>,
    empty: bool,
}

impl Element<'_> {
    fn is(&self, name: &str) -> bool {
        self.start.name().as_ref() == name.as_bytes()
    }

    fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    fn attrs(&self) -> Result<Attrs, ReadError> {
        let mut values = HashMap::new();
        for attr in self.start.attributes() {
            let attr = attr.map_err(|e| ReadError::Xml(format!("attribute error: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ReadError::Xml(format!("attribute '{key}': {e}")))?
                .into_owned();
            values.insert(key, value);
        }
        Ok(Attrs {
            element: self.name(),
            values,
        })
    }
}

/// Attributes of one element with typed accessors
struct Attrs {
    element: String,
    values: HashMap<String, String>,
}

impl Attrs {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    fn required<T: FromStr>(&self, key: &str) -> Result<T, ReadError> {
        match self.get(key) {
            Some(value) => self.parse(key, value),
            None => Err(ReadError::invalid(format!(
                "<{}> is missing required attribute '{key}'",
                self.element
            ))),
        }
    }

    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ReadError> {
        Ok(self.optional(key)?.unwrap_or(default))
    }

    fn optional<T: FromStr>(&self, key: &str) -> Result<Option<T>, ReadError> {
        self.get(key).map(|value| self.parse(key, value)).transpose()
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, ReadError> {
        match self.get(key) {
            None => Ok(default),
            Some("1") | Some("true") => Ok(true),
            Some("0") | Some("false") => Ok(false),
            Some(other) => Err(ReadError::invalid(format!(
                "<{}> attribute '{key}' must be 0 or 1, got '{other}'",
                self.element
            ))),
        }
    }

    fn parse<T: FromStr>(&self, key: &str, value: &str) -> Result<T, ReadError> {
        value.trim().parse().map_err(|_| {
            ReadError::invalid(format!(
                "<{}> attribute '{key}' has invalid value '{value}'",
                self.element
            ))
        })
    }
}

/// Pull parser over an in-memory document
struct Parser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);
        Self { reader }
    }

    fn next(&mut self) -> Result<Event<'a>, ReadError> {
        self.reader.read_event().map_err(|e| {
            ReadError::Xml(format!("at position {}: {e}", self.reader.error_position()))
        })
    }

    /// Advances to the root element and checks its name
    fn root(&mut self, expected: &str) -> Result<Element<'a>, ReadError> {
        let element = loop {
            match self.next()? {
                Event::Start(start) => break Element { start, empty: false },
                Event::Empty(start) => break Element { start, empty: true },
                Event::Eof => {
                    return Err(ReadError::invalid(format!(
                        "document has no <{expected}> element"
                    )));
                }
                _ => {}
            }
        };

        if !element.is(expected) {
            return Err(ReadError::invalid(format!(
                "expected <{expected}> root element, found <{}>",
                element.name()
            )));
        }
        Ok(element)
    }

    /// Calls `visit` for each direct child of `parent`
    ///
    /// `visit` must consume the child it is given, either by parsing it or
    /// by calling [`Parser::skip`].
    fn children<F>(&mut self, parent: &Element<'a>, mut visit: F) -> Result<(), ReadError>
    where
        F: FnMut(&mut Self, Element<'a>) -> Result<(), ReadError>,
    {
        if parent.empty {
            return Ok(());
        }
        loop {
            match self.next()? {
                Event::Start(start) => visit(self, Element { start, empty: false })?,
                Event::Empty(start) => visit(self, Element { start, empty: true })?,
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(unexpected_eof(&parent.name())),
                _ => {}
            }
        }
    }

    /// Text content of `element`; nested elements are skipped
    fn text(&mut self, element: &Element<'a>) -> Result<String, ReadError> {
        let mut text = String::new();
        if element.empty {
            return Ok(text);
        }
        loop {
            match self.next()? {
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(|e| ReadError::Xml(e.to_string()))?)
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(start) => self.skip(&Element { start, empty: false })?,
                Event::End(_) => return Ok(text),
                Event::Eof => return Err(unexpected_eof(&element.name())),
                _ => {}
            }
        }
    }

    /// Consumes `element` and everything inside it
    fn skip(&mut self, element: &Element<'a>) -> Result<(), ReadError> {
        if !element.empty {
            self.reader
                .read_to_end(element.start.name())
                .map_err(|e| ReadError::Xml(e.to_string()))?;
        }
        Ok(())
    }
}
