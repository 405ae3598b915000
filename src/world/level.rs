//! Level loading and saving
//!
//! Levels are plain-text `key=value` files split into `[SECTION]`s:
//! one `[TERRAIN]` block, an `[OBJECTS]` summary, then one `[OBJECT_<id>]`
//! block per object. Floats are written with two decimals.
//!
//! Reading is lenient: unknown sections and keys are skipped, malformed
//! values are logged and ignored. Only an impossible terrain size is fatal.
//! Parsing produces a [`LevelDocument`]; applying it to a session (asset
//! resolution, id allocation) is the editor's job.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

use crate::asset::AssetCache;
use crate::math::Vec3;
use super::object::{EditorObject, LightKind, ObjectId, ObjectProperties, ObjectType};
use super::terrain::{Terrain, BLEND_LAYERS};

/// Capacity limits shared by the editor and the level reader
pub mod limits {
    /// Maximum number of live objects
    pub const MAX_OBJECTS: usize = 1024;
    /// Maximum terrain cells per side
    pub const MAX_TERRAIN_SIZE: usize = 128;
    /// Maximum number of cached assets
    pub const MAX_ASSETS: usize = 512;
    /// Default undo depth
    pub const MAX_UNDO: usize = 100;
    /// Maximum number of selected objects
    pub const MAX_SELECTION: usize = 64;
}

/// First line of every level file
pub const FILE_HEADER: &str = "# Endor Level File v1.0";

/// Error type for level loading and saving
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// `[TERRAIN]` contents as read from disk; absent keys stay `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainRecord {
    pub size: Option<usize>,
    pub scale: Option<f32>,
    /// Texture path per blend layer
    pub textures: [Option<String>; BLEND_LAYERS],
    pub texture_scales: [Option<f32>; BLEND_LAYERS],
    /// Row-major `z * size + x`
    pub heights: Option<Vec<f32>>,
}

/// One `[OBJECT_<id>]` block
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// Fully parsed object, carrying the id from the section header
    pub object: EditorObject,
    /// Model path to resolve through the asset cache
    pub asset_path: Option<String>,
}

/// Parsed level file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelDocument {
    pub terrain: TerrainRecord,
    /// `count=` from `[OBJECTS]` (informational)
    pub declared_count: Option<usize>,
    /// Objects in file order
    pub objects: Vec<ObjectRecord>,
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

fn fmt_vec3(v: Vec3) -> String {
    format!("{:.2},{:.2},{:.2}", v.x, v.y, v.z)
}

fn flag(b: bool) -> u8 {
    u8::from(b)
}

/// Write a level. Asset references are written as the cached filename;
/// references the cache cannot resolve are left out.
pub fn write_level<'a, W, I>(out: &mut W, terrain: &Terrain, objects: I, assets: &AssetCache) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a EditorObject>,
{
    let objects: Vec<&EditorObject> = objects.into_iter().collect();

    writeln!(out, "{}", FILE_HEADER)?;
    writeln!(out, "# Generated by Endor Level Editor")?;
    writeln!(out)?;

    writeln!(out, "[TERRAIN]")?;
    writeln!(out, "size={}", terrain.size())?;
    writeln!(out, "scale={:.2}", terrain.scale())?;
    for (i, layer) in terrain.layers().iter().enumerate() {
        if let Some(filename) = layer.asset.and_then(|id| assets.filename(id)) {
            writeln!(out, "texture{}={}", i, filename)?;
            writeln!(out, "texture{}_scale={:.2}", i, layer.scale)?;
        }
    }
    let heights: Vec<String> = terrain.heights().iter().map(|h| format!("{:.2}", h)).collect();
    writeln!(out, "heights={}", heights.join(","))?;
    writeln!(out)?;

    writeln!(out, "[OBJECTS]")?;
    writeln!(out, "count={}", objects.len())?;

    for obj in objects {
        writeln!(out)?;
        writeln!(out, "[OBJECT_{}]", obj.id)?;
        writeln!(out, "type={}", obj.object_type().code())?;
        writeln!(out, "name={}", obj.name)?;
        writeln!(out, "position={}", fmt_vec3(obj.position))?;
        writeln!(out, "rotation={}", fmt_vec3(obj.rotation))?;
        writeln!(out, "scale={}", fmt_vec3(obj.scale))?;
        writeln!(out, "visible={}", flag(obj.visible))?;
        writeln!(out, "locked={}", flag(obj.locked))?;
        if let Some(filename) = obj.asset.and_then(|id| assets.filename(id)) {
            writeln!(out, "asset={}", filename)?;
        }

        match &obj.properties {
            ObjectProperties::Light(light) => {
                writeln!(out, "light_color={}", fmt_vec3(light.color))?;
                writeln!(out, "light_intensity={:.2}", light.intensity)?;
                writeln!(out, "light_range={:.2}", light.range)?;
                writeln!(out, "light_type={}", light.light_kind.code())?;
            }
            ObjectProperties::Trigger(trigger) => {
                let (a, b) = (trigger.bounds_min, trigger.bounds_max);
                writeln!(out, "trigger_bounds={:.2},{:.2},{:.2},{:.2},{:.2},{:.2}", a.x, a.y, a.z, b.x, b.y, b.z)?;
                writeln!(out, "trigger_script={}", trigger.script)?;
                writeln!(out, "trigger_once={}", flag(trigger.trigger_once))?;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Write a level to `path`, replacing any existing file
pub fn save_level<'a, P, I>(path: P, terrain: &Terrain, objects: I, assets: &AssetCache) -> Result<(), LevelError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a EditorObject>,
{
    let mut out = io::BufWriter::new(File::create(path)?);
    write_level(&mut out, terrain, objects, assets)?;
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    Terrain,
    Objects,
    /// Index into `LevelDocument::objects`
    Object(usize),
    Unknown,
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring malformed value for '{}': {:?}", key, value);
            None
        }
    }
}

fn parse_floats(key: &str, value: &str, expected: usize) -> Option<Vec<f32>> {
    let parsed: Result<Vec<f32>, _> = value.split(',').map(|s| s.trim().parse::<f32>()).collect();
    match parsed {
        Ok(values) if values.len() == expected => Some(values),
        _ => {
            log::warn!("ignoring malformed value for '{}': {:?}", key, value);
            None
        }
    }
}

fn parse_vec3(key: &str, value: &str) -> Option<Vec3> {
    parse_floats(key, value, 3).map(|v| Vec3::new(v[0], v[1], v[2]))
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    parse_num::<i32>(key, value).map(|v| v != 0)
}

/// `[OBJECT_<id>]` -> id
fn object_section_id(header: &str) -> Option<ObjectId> {
    header.strip_prefix("[OBJECT_")?.strip_suffix(']')?.trim().parse().ok()
}

fn apply_terrain_key(terrain: &mut TerrainRecord, key: &str, value: &str) -> Result<(), LevelError> {
    match key {
        "size" => {
            if let Some(size) = parse_num::<i64>(key, value) {
                if size < 1 || size > limits::MAX_TERRAIN_SIZE as i64 {
                    return Err(LevelError::Validation(format!(
                        "terrain size {} outside 1..={}", size, limits::MAX_TERRAIN_SIZE
                    )));
                }
                terrain.size = Some(size as usize);
            }
        }
        "scale" => {
            match parse_num::<f32>(key, value) {
                Some(s) if s.is_finite() && s > 0.0 => terrain.scale = Some(s),
                Some(s) => log::warn!("ignoring non-positive terrain scale {}", s),
                None => {}
            }
        }
        "heights" => {
            // Bad entries become 0 so later cells stay in place
            let heights = value
                .split(',')
                .map(|s| match s.trim().parse::<f32>() {
                    Ok(h) if h.is_finite() => h,
                    _ => {
                        log::warn!("ignoring malformed height {:?}", s);
                        0.0
                    }
                })
                .collect();
            terrain.heights = Some(heights);
        }
        _ => {
            if let Some(rest) = key.strip_prefix("texture") {
                let (layer, is_scale) = match rest.strip_suffix("_scale") {
                    Some(layer) => (layer, true),
                    None => (rest, false),
                };
                match layer.parse::<usize>() {
                    Ok(i) if i < BLEND_LAYERS => {
                        if is_scale {
                            if let Some(s) = parse_num::<f32>(key, value) {
                                terrain.texture_scales[i] = Some(s);
                            }
                        } else {
                            terrain.textures[i] = Some(value.to_string());
                        }
                    }
                    _ => log::debug!("skipping terrain key '{}'", key),
                }
            } else {
                log::debug!("skipping terrain key '{}'", key);
            }
        }
    }
    Ok(())
}

fn apply_object_key(record: &mut ObjectRecord, key: &str, value: &str) {
    let obj = &mut record.object;
    match key {
        "type" => {
            if let Some(code) = parse_num::<i32>(key, value) {
                match ObjectType::from_code(code) {
                    Some(t) => obj.properties = ObjectProperties::defaults_for(t, obj.position),
                    None => log::warn!("ignoring unknown object type {} on object {}", code, obj.id),
                }
            }
        }
        "name" => obj.name = value.to_string(),
        "position" => {
            if let Some(v) = parse_vec3(key, value) {
                obj.position = v;
            }
        }
        "rotation" => {
            if let Some(v) = parse_vec3(key, value) {
                obj.rotation = v;
            }
        }
        "scale" => {
            if let Some(v) = parse_vec3(key, value) {
                obj.scale = v;
            }
        }
        "visible" => {
            if let Some(b) = parse_flag(key, value) {
                obj.visible = b;
            }
        }
        "locked" => {
            if let Some(b) = parse_flag(key, value) {
                obj.locked = b;
            }
        }
        "asset" => record.asset_path = Some(value.to_string()),
        _ if key.starts_with("light_") => {
            let ObjectProperties::Light(light) = &mut obj.properties else {
                log::warn!("ignoring '{}' on non-light object {}", key, obj.id);
                return;
            };
            match key {
                "light_color" => {
                    if let Some(c) = parse_vec3(key, value) {
                        light.color = c;
                    }
                }
                "light_intensity" => {
                    if let Some(v) = parse_num(key, value) {
                        light.intensity = v;
                    }
                }
                "light_range" => {
                    if let Some(v) = parse_num(key, value) {
                        light.range = v;
                    }
                }
                "light_type" => {
                    match parse_num::<i32>(key, value).map(|c| (c, LightKind::from_code(c))) {
                        Some((_, Some(kind))) => light.light_kind = kind,
                        Some((c, None)) => log::warn!("ignoring unknown light type {}", c),
                        None => {}
                    }
                }
                _ => log::debug!("skipping object key '{}'", key),
            }
        }
        _ if key.starts_with("trigger_") => {
            let ObjectProperties::Trigger(trigger) = &mut obj.properties else {
                log::warn!("ignoring '{}' on non-trigger object {}", key, obj.id);
                return;
            };
            match key {
                "trigger_bounds" => {
                    if let Some(b) = parse_floats(key, value, 6) {
                        trigger.bounds_min = Vec3::new(b[0], b[1], b[2]);
                        trigger.bounds_max = Vec3::new(b[3], b[4], b[5]);
                    }
                }
                "trigger_script" => trigger.script = value.to_string(),
                "trigger_once" => {
                    if let Some(b) = parse_flag(key, value) {
                        trigger.trigger_once = b;
                    }
                }
                _ => log::debug!("skipping object key '{}'", key),
            }
        }
        _ => log::debug!("skipping object key '{}'", key),
    }
}

/// Parse a level from any line source
pub fn parse_level<R: BufRead>(reader: R) -> Result<LevelDocument, LevelError> {
    let mut doc = LevelDocument::default();
    let mut section = Section::None;

    for line in reader.lines() {
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(line.as_str());
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = if line == "[TERRAIN]" {
                Section::Terrain
            } else if line == "[OBJECTS]" {
                Section::Objects
            } else if line.starts_with("[OBJECT_") {
                match object_section_id(line) {
                    Some(id) if id > 0 && id < ObjectId::MAX => {
                        doc.objects.push(ObjectRecord {
                            object: EditorObject::new(id, ObjectType::StaticMesh, Vec3::ZERO),
                            asset_path: None,
                        });
                        Section::Object(doc.objects.len() - 1)
                    }
                    _ => {
                        log::warn!("skipping object section with bad id: {}", line);
                        Section::Unknown
                    }
                }
            } else {
                log::debug!("skipping unknown section {}", line);
                Section::Unknown
            };
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        match section {
            Section::Terrain => apply_terrain_key(&mut doc.terrain, key, value)?,
            Section::Objects => {
                if key == "count" {
                    doc.declared_count = parse_num(key, value);
                }
            }
            Section::Object(index) => apply_object_key(&mut doc.objects[index], key, value),
            Section::None | Section::Unknown => {}
        }
    }

    if let Some(count) = doc.declared_count {
        if count != doc.objects.len() {
            log::warn!("level declares {} objects but contains {}", count, doc.objects.len());
        }
    }

    Ok(doc)
}

/// Open and parse a level file
pub fn read_level<P: AsRef<Path>>(path: P) -> Result<LevelDocument, LevelError> {
    let file = File::open(path)?;
    parse_level(BufReader::new(file))
}
