use crate::trigger::{DoorDirection, PickupKind, TriggerType};
use crate::inventory::InventoryItem;
use glam::{Vec2, Vec3};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Raised while parsing a raw map. Always fatal; nothing is mutated before
/// parsing succeeds.
#[derive(Debug, Error)]
pub enum MapFormatError {
    #[error("unable to load map due to missing or invalid {0} parameter")]
    MissingField(&'static str),
    #[error("{array} has {found} rows, expected {expected}")]
    RowCount { array: &'static str, found: usize, expected: usize },
    #[error("{array} row {row} has {found} columns, expected {expected}")]
    RowWidth { array: &'static str, row: usize, found: usize, expected: usize },
    #[error("unknown sector type {value} at ({x}, {y})")]
    UnknownSectorType { value: i64, x: usize, y: usize },
    #[error("{array} has a non-numeric cell at ({x}, {y})")]
    InvalidCell { array: &'static str, x: usize, y: usize },
    #[error("invalid light colour {value:?} at ({x}, {y})")]
    InvalidLightColour { value: String, x: usize, y: usize },
    #[error("invalid entity declaration {name:?}: {reason}")]
    InvalidEntity { name: String, reason: String },
    #[error("duplicate entity name {0:?}")]
    DuplicateEntity(String),
    #[error("map is not a JSON object")]
    NotAnObject,
    #[error("map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorType {
    None,
    Open,
    Wall,
}

impl SectorType {
    fn from_raw(value: i64, x: usize, y: usize) -> Result<Self, MapFormatError> {
        match value {
            0 => Ok(SectorType::None),
            1 => Ok(SectorType::Open),
            2 => Ok(SectorType::Wall),
            other => Err(MapFormatError::UnknownSectorType { value: other, x, y }),
        }
    }
}

/// One cell of the level grid. Created once at load time, owned by the
/// level data for the lifetime of the level.
#[derive(Debug, Clone, Copy)]
pub struct Sector {
    pub x: usize,
    pub y: usize,
    pub kind: SectorType,
    pub light: Vec3,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GridPoint {
    pub x: f32,
    pub y: f32,
}

impl From<GridPoint> for Vec2 {
    fn from(p: GridPoint) -> Vec2 {
        Vec2::new(p.x, p.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "EntityType.Pawn")]
    Pawn,
    #[serde(rename = "EntityType.Pickup")]
    Pickup,
    #[serde(rename = "EntityType.Door")]
    Door,
    #[serde(rename = "EntityType.PlayerSpawner")]
    PlayerSpawner,
    #[serde(rename = "EntityType.EnemySpawner")]
    EnemySpawner,
    #[serde(rename = "EntityType.Trigger")]
    Trigger,
    #[serde(rename = "EntityType.DamageTrigger")]
    DamageTrigger,
}

/// One entry of the map's `entities` array. Only `name`, `type` and
/// `gridPosition` are universal; the rest is the kind-specific payload the
/// entity factory interprets.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub grid_position: GridPoint,
    #[serde(default)]
    pub pickup_type: Option<PickupKind>,
    #[serde(default)]
    pub item: Option<InventoryItem>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sprite_texture_path: Option<String>,
    #[serde(default)]
    pub trigger_type: Option<TriggerType>,
    #[serde(default)]
    pub size: Option<GridPoint>,
    #[serde(default)]
    pub max_trigger_count: Option<u32>,
    #[serde(default)]
    pub triggerables: Vec<String>,
    #[serde(default)]
    pub interval: Option<f32>,
    #[serde(default)]
    pub amount: Option<f32>,
    #[serde(default)]
    pub affects_enemy_pawns: Option<bool>,
    #[serde(default)]
    pub enemy_type: Option<String>,
    #[serde(default)]
    pub required_item: Option<InventoryItem>,
    #[serde(default)]
    pub direction: Option<DoorDirection>,
}

/// Parsed, validated map. Immutable once built; the level reads it for the
/// rest of its lifetime.
#[derive(Debug)]
pub struct LevelData {
    pub width: usize,
    pub length: usize,
    pub tilemap_path: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spawn_position: Vec2,
    sectors: Vec<Vec<Sector>>,
    pub wall_texture_ids: Vec<Vec<i32>>,
    pub floor_texture_ids: Vec<Vec<i32>>,
    pub ceiling_texture_ids: Vec<Vec<i32>>,
    pub entities: BTreeMap<String, EntityDeclaration>,
}

impl LevelData {
    /// Parses a raw JSON map. Required fields are checked eagerly, in a
    /// fixed order, and the first missing or malformed one aborts the
    /// parse with its name.
    pub fn parse(raw: &str) -> Result<Self, MapFormatError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self, MapFormatError> {
        let root = value.as_object().ok_or(MapFormatError::NotAnObject)?;

        let spawn = root
            .get("spawnPosition")
            .and_then(|v| {
                let x = v.get("x")?.as_f64()?;
                let y = v.get("y")?.as_f64()?;
                Some(Vec2::new(x as f32, y as f32))
            })
            .ok_or(MapFormatError::MissingField("spawnPosition"))?;

        let width = root
            .get("width")
            .and_then(|v| v.as_u64())
            .ok_or(MapFormatError::MissingField("width"))? as usize;
        let length = root
            .get("length")
            .and_then(|v| v.as_u64())
            .ok_or(MapFormatError::MissingField("length"))? as usize;
        let tilemap_path = root
            .get("tilemap")
            .and_then(|v| v.as_str())
            .ok_or(MapFormatError::MissingField("tilemap"))?
            .to_string();
        let tile_width = root
            .get("tileWidth")
            .and_then(|v| v.as_u64())
            .ok_or(MapFormatError::MissingField("tileWidth"))? as u32;
        let tile_height = root
            .get("tileHeight")
            .and_then(|v| v.as_u64())
            .ok_or(MapFormatError::MissingField("tileHeight"))? as u32;

        let sector_types = grid_cells(root, "sectorTypes", width, length, |v, x, y| {
            let raw = v
                .as_i64()
                .ok_or(MapFormatError::InvalidCell { array: "sectorTypes", x, y })?;
            SectorType::from_raw(raw, x, y)
        })?;
        let light_colours = grid_cells(root, "lightColors", width, length, |v, x, y| {
            let raw = v.as_str().ok_or_else(|| MapFormatError::InvalidLightColour {
                value: v.to_string(),
                x,
                y,
            })?;
            parse_hex_colour(raw).ok_or_else(|| MapFormatError::InvalidLightColour {
                value: raw.to_string(),
                x,
                y,
            })
        })?;
        let wall_texture_ids = tile_id_grid(root, "wallTextureIDs", width, length)?;
        let floor_texture_ids = tile_id_grid(root, "floorTextureIDs", width, length)?;
        let ceiling_texture_ids = tile_id_grid(root, "ceilingTextureIDs", width, length)?;

        let mut sectors = Vec::with_capacity(length);
        for y in 0..length {
            let mut row = Vec::with_capacity(width);
            for x in 0..width {
                row.push(Sector { x, y, kind: sector_types[y][x], light: light_colours[y][x] });
            }
            sectors.push(row);
        }

        let raw_entities = root
            .get("entities")
            .and_then(|v| v.as_array())
            .ok_or(MapFormatError::MissingField("entities"))?;
        let mut entities = BTreeMap::new();
        for raw in raw_entities {
            let name = raw
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("<unnamed>")
                .to_string();
            let declaration: EntityDeclaration =
                serde_json::from_value(raw.clone()).map_err(|err| MapFormatError::InvalidEntity {
                    name: name.clone(),
                    reason: err.to_string(),
                })?;
            if entities.insert(declaration.name.clone(), declaration).is_some() {
                return Err(MapFormatError::DuplicateEntity(name));
            }
        }

        Ok(Self {
            width,
            length,
            tilemap_path,
            tile_width,
            tile_height,
            spawn_position: spawn,
            sectors,
            wall_texture_ids,
            floor_texture_ids,
            ceiling_texture_ids,
            entities,
        })
    }

    /// Bounds-checked cell lookup; `None` is the edge sentinel.
    pub fn sector_at(&self, x: i64, y: i64) -> Option<&Sector> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.length {
            return None;
        }
        Some(&self.sectors[y as usize][x as usize])
    }

    pub fn sector_north(&self, sector: &Sector) -> Option<&Sector> {
        self.sector_at(sector.x as i64, sector.y as i64 - 1)
    }

    pub fn sector_south(&self, sector: &Sector) -> Option<&Sector> {
        self.sector_at(sector.x as i64, sector.y as i64 + 1)
    }

    pub fn sector_east(&self, sector: &Sector) -> Option<&Sector> {
        self.sector_at(sector.x as i64 + 1, sector.y as i64)
    }

    pub fn sector_west(&self, sector: &Sector) -> Option<&Sector> {
        self.sector_at(sector.x as i64 - 1, sector.y as i64)
    }

    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.iter().flat_map(|row| row.iter())
    }

    pub fn light_at(&self, x: i64, y: i64) -> Vec3 {
        self.sector_at(x, y).map(|s| s.light).unwrap_or(Vec3::ONE)
    }
}

fn grid_cells<T>(
    root: &serde_json::Map<String, serde_json::Value>,
    key: &'static str,
    width: usize,
    length: usize,
    mut cell: impl FnMut(&serde_json::Value, usize, usize) -> Result<T, MapFormatError>,
) -> Result<Vec<Vec<T>>, MapFormatError> {
    let rows = root
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or(MapFormatError::MissingField(key))?;
    if rows.len() != length {
        return Err(MapFormatError::RowCount { array: key, found: rows.len(), expected: length });
    }
    let mut out = Vec::with_capacity(length);
    for (y, row) in rows.iter().enumerate() {
        let cells = row
            .as_array()
            .ok_or(MapFormatError::RowWidth { array: key, row: y, found: 0, expected: width })?;
        if cells.len() != width {
            return Err(MapFormatError::RowWidth {
                array: key,
                row: y,
                found: cells.len(),
                expected: width,
            });
        }
        let mut parsed = Vec::with_capacity(width);
        for (x, value) in cells.iter().enumerate() {
            parsed.push(cell(value, x, y)?);
        }
        out.push(parsed);
    }
    Ok(out)
}

fn tile_id_grid(
    root: &serde_json::Map<String, serde_json::Value>,
    key: &'static str,
    width: usize,
    length: usize,
) -> Result<Vec<Vec<i32>>, MapFormatError> {
    grid_cells(root, key, width, length, |v, x, y| {
        v.as_i64().map(|id| id as i32).ok_or(MapFormatError::InvalidCell { array: key, x, y })
    })
}

fn parse_hex_colour(raw: &str) -> Option<Vec3> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
}
