use oni_citadel::geometry::{build_surfaces, Facing};
use oni_citadel::map::{LevelData, SectorType};
use serde_json::json;

/// Open interior surrounded by a wall border, with optional extra wall
/// cells and per-cell light overrides.
fn map_with(
    width: usize,
    length: usize,
    extra_walls: &[(usize, usize)],
    lights: &[(usize, usize, &str)],
) -> LevelData {
    let mut sector_types = Vec::new();
    for y in 0..length {
        let mut row = Vec::new();
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == length - 1;
            let wall = border || extra_walls.contains(&(x, y));
            row.push(if wall { 2 } else { 1 });
        }
        sector_types.push(row);
    }
    let mut light_colours = vec![vec!["#FFFFFF".to_string(); width]; length];
    for &(x, y, colour) in lights {
        light_colours[y][x] = colour.to_string();
    }
    let map = json!({
        "spawnPosition": { "x": 1.0, "y": 1.0 },
        "width": width,
        "length": length,
        "tilemap": "assets/textures/tilemap.png",
        "tileWidth": 32,
        "tileHeight": 32,
        "sectorTypes": sector_types,
        "lightColors": light_colours,
        "wallTextureIDs": vec![vec![7; width]; length],
        "floorTextureIDs": vec![vec![3; width]; length],
        "ceilingTextureIDs": vec![vec![4; width]; length],
        "entities": [],
    });
    LevelData::parse(&map.to_string()).expect("map should parse")
}

fn open_neighbour_count(data: &LevelData, x: usize, y: usize) -> usize {
    let sector = *data.sector_at(x as i64, y as i64).unwrap();
    [
        data.sector_north(&sector),
        data.sector_south(&sector),
        data.sector_east(&sector),
        data.sector_west(&sector),
    ]
    .into_iter()
    .flatten()
    .filter(|neighbour| neighbour.kind == SectorType::Open)
    .count()
}

#[test]
fn every_wall_grows_one_facing_per_open_neighbour() {
    let data = map_with(5, 5, &[], &[]);
    let surfaces = build_surfaces(&data);

    for sector in data.sectors() {
        if sector.kind != SectorType::Wall {
            continue;
        }
        let facings = surfaces
            .walls
            .iter()
            .filter(|facing| facing.cell == (sector.x, sector.y))
            .count();
        assert_eq!(
            facings,
            open_neighbour_count(&data, sector.x, sector.y),
            "wall at ({}, {})",
            sector.x,
            sector.y
        );
    }

    // 3x3 open interior inside a 5x5 border: three walls per side face
    // inward, corners face nothing.
    assert_eq!(surfaces.walls.len(), 12);
}

#[test]
fn freestanding_wall_pillar_faces_all_four_ways() {
    let data = map_with(7, 7, &[(3, 3)], &[]);
    let surfaces = build_surfaces(&data);
    let facings: Vec<Facing> = surfaces
        .walls
        .iter()
        .filter(|facing| facing.cell == (3, 3))
        .map(|facing| facing.facing)
        .collect();
    assert_eq!(facings.len(), 4);
    for expected in [Facing::North, Facing::South, Facing::East, Facing::West] {
        assert!(facings.contains(&expected), "missing {expected:?} facing");
    }
}

#[test]
fn open_sectors_grow_exactly_one_floor_and_ceiling() {
    let data = map_with(5, 5, &[], &[]);
    let surfaces = build_surfaces(&data);
    let open_count = data.sectors().filter(|s| s.kind == SectorType::Open).count();
    assert_eq!(surfaces.floors.len(), open_count);
    assert_eq!(surfaces.ceilings.len(), open_count);
    for floor in &surfaces.floors {
        assert_eq!(floor.tile_id, 3);
        let matching =
            surfaces.floors.iter().filter(|other| other.cell == floor.cell).count();
        assert_eq!(matching, 1);
    }
    for ceiling in &surfaces.ceilings {
        assert_eq!(ceiling.tile_id, 4);
    }
}

#[test]
fn wall_facings_take_light_from_the_open_neighbour() {
    // The open cell at (1, 1) is red; the wall west of it should show a
    // red facing toward it, while the wall's own light stays untouched.
    let data = map_with(5, 5, &[], &[(1, 1, "#FF0000")]);
    let surfaces = build_surfaces(&data);
    let facing = surfaces
        .walls
        .iter()
        .find(|facing| facing.cell == (0, 1) && facing.facing == Facing::East)
        .expect("west border wall should face the open cell");
    assert!((facing.light.x - 1.0).abs() < 1e-6);
    assert_eq!(facing.light.y, 0.0);
    assert_eq!(facing.light.z, 0.0);

    let floor = surfaces
        .floors
        .iter()
        .find(|floor| floor.cell == (1, 1))
        .expect("open cell has a floor");
    assert_eq!(floor.light.y, 0.0);
}

#[test]
fn facing_centers_sit_on_the_shared_cell_boundary() {
    let data = map_with(5, 5, &[], &[]);
    let surfaces = build_surfaces(&data);
    let facing = surfaces
        .walls
        .iter()
        .find(|facing| facing.cell == (1, 0) && facing.facing == Facing::South)
        .expect("north border wall faces south into the interior");
    let center = facing.center();
    assert_eq!(center.x, 1.0);
    assert_eq!(center.y, 0.5);
}
