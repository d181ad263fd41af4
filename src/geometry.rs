use crate::map::{LevelData, Sector, SectorType};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// Which way a wall face points: toward the open cell that justified it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    pub fn offset(self) -> Vec2 {
        match self {
            Facing::North => Vec2::new(0.0, -0.5),
            Facing::South => Vec2::new(0.0, 0.5),
            Facing::East => Vec2::new(0.5, 0.0),
            Facing::West => Vec2::new(-0.5, 0.0),
        }
    }
}

/// One vertical wall face, one grid cell wide, lit by the open cell the
/// viewer stands in.
#[derive(Debug, Clone)]
pub struct WallFacing {
    pub cell: (usize, usize),
    pub facing: Facing,
    pub tile_id: i32,
    pub light: Vec3,
}

impl WallFacing {
    /// World-space center of the face, on the boundary between the wall
    /// cell and its open neighbour.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.cell.0 as f32, self.cell.1 as f32) + self.facing.offset()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatKind {
    Floor,
    Ceiling,
}

#[derive(Debug, Clone)]
pub struct FlatSurface {
    pub cell: (usize, usize),
    pub kind: FlatKind,
    pub tile_id: i32,
    pub light: Vec3,
}

/// All render-facing surface decisions for a map, ready for a mesh builder.
#[derive(Default)]
pub struct SectorSurfaces {
    pub walls: Vec<WallFacing>,
    pub floors: Vec<FlatSurface>,
    pub ceilings: Vec<FlatSurface>,
}

/// Walks the grid and decides which surfaces exist. A WALL cell grows one
/// facing per axis-adjacent OPEN neighbour; an OPEN cell grows exactly one
/// floor and one ceiling keyed to its own tile ids.
pub fn build_surfaces(data: &LevelData) -> SectorSurfaces {
    let mut surfaces = SectorSurfaces::default();
    for sector in data.sectors() {
        match sector.kind {
            SectorType::Wall => {
                let tile_id = data.wall_texture_ids[sector.y][sector.x];
                for (facing, neighbour) in open_neighbours(data, sector) {
                    surfaces.walls.push(WallFacing {
                        cell: (sector.x, sector.y),
                        facing,
                        tile_id,
                        light: neighbour.light,
                    });
                }
            }
            SectorType::Open => {
                surfaces.floors.push(FlatSurface {
                    cell: (sector.x, sector.y),
                    kind: FlatKind::Floor,
                    tile_id: data.floor_texture_ids[sector.y][sector.x],
                    light: sector.light,
                });
                surfaces.ceilings.push(FlatSurface {
                    cell: (sector.x, sector.y),
                    kind: FlatKind::Ceiling,
                    tile_id: data.ceiling_texture_ids[sector.y][sector.x],
                    light: sector.light,
                });
            }
            SectorType::None => {}
        }
    }
    surfaces
}

fn open_neighbours<'a>(
    data: &'a LevelData,
    sector: &Sector,
) -> SmallVec<[(Facing, &'a Sector); 4]> {
    let mut neighbours = SmallVec::new();
    if let Some(south) = data.sector_south(sector) {
        if south.kind == SectorType::Open {
            neighbours.push((Facing::South, south));
        }
    }
    if let Some(north) = data.sector_north(sector) {
        if north.kind == SectorType::Open {
            neighbours.push((Facing::North, north));
        }
    }
    if let Some(east) = data.sector_east(sector) {
        if east.kind == SectorType::Open {
            neighbours.push((Facing::East, east));
        }
    }
    if let Some(west) = data.sector_west(sector) {
        if west.kind == SectorType::Open {
            neighbours.push((Facing::West, west));
        }
    }
    neighbours
}

/// Tilemap texture metadata reported by the collaborator once the texture
/// is decoded. The simulation only needs it to translate tile indices into
/// source rectangles.
#[derive(Debug, Clone, Copy)]
pub struct TilemapInfo {
    pub texture_width: u32,
    pub texture_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl TilemapInfo {
    pub fn tiles_wide(&self) -> u32 {
        self.texture_width / self.tile_width
    }

    pub fn tiles_high(&self) -> u32 {
        self.texture_height / self.tile_height
    }
}

/// Pixel-space source rectangle inside the tilemap texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Maps a tile index to its source rectangle; -1 means untextured.
pub fn tile_source_rect(tile_id: i32, tilemap: &TilemapInfo) -> Option<TileRect> {
    if tile_id < 0 || tilemap.tiles_wide() == 0 {
        return None;
    }
    let id = tile_id as u32;
    let col = id % tilemap.tiles_wide();
    let row = id / tilemap.tiles_wide();
    Some(TileRect {
        x: col * tilemap.tile_width,
        y: row * tilemap.tile_height,
        width: tilemap.tile_width,
        height: tilemap.tile_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_rects_wrap_by_row() {
        let tilemap =
            TilemapInfo { texture_width: 128, texture_height: 64, tile_width: 32, tile_height: 32 };
        assert_eq!(
            tile_source_rect(5, &tilemap),
            Some(TileRect { x: 32, y: 32, width: 32, height: 32 })
        );
        assert_eq!(tile_source_rect(-1, &tilemap), None);
    }
}
