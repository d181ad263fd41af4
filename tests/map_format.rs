use oni_citadel::map::{LevelData, MapFormatError, SectorType};
use serde_json::json;

fn base_map() -> serde_json::Value {
    let width = 4;
    let length = 3;
    let mut sector_types = Vec::new();
    for y in 0..length {
        let mut row = Vec::new();
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == length - 1;
            row.push(if border { 2 } else { 1 });
        }
        sector_types.push(row);
    }
    json!({
        "spawnPosition": { "x": 1.0, "y": 1.0 },
        "width": width,
        "length": length,
        "tilemap": "assets/textures/tilemap.png",
        "tileWidth": 32,
        "tileHeight": 32,
        "sectorTypes": sector_types,
        "lightColors": vec![vec!["#FFFFFF"; width]; length],
        "wallTextureIDs": vec![vec![0; width]; length],
        "floorTextureIDs": vec![vec![1; width]; length],
        "ceilingTextureIDs": vec![vec![2; width]; length],
        "entities": [],
    })
}

#[test]
fn valid_map_parses() {
    let data = LevelData::parse(&base_map().to_string()).expect("map should parse");
    assert_eq!(data.width, 4);
    assert_eq!(data.length, 3);
    assert_eq!(data.tile_width, 32);
    assert_eq!(data.spawn_position.x, 1.0);
    assert_eq!(data.sector_at(0, 0).unwrap().kind, SectorType::Wall);
    assert_eq!(data.sector_at(1, 1).unwrap().kind, SectorType::Open);
}

#[test]
fn missing_required_fields_fail_by_name_in_order() {
    for field in ["spawnPosition", "width", "length", "tilemap", "tileWidth", "tileHeight"] {
        let mut map = base_map();
        map.as_object_mut().unwrap().remove(field);
        let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
        match err {
            MapFormatError::MissingField(name) => assert_eq!(name, field),
            other => panic!("expected MissingField({field}), got {other:?}"),
        }
    }

    // Validation is ordered: with several fields missing, the first one in
    // the fixed order is the one reported.
    let mut map = base_map();
    map.as_object_mut().unwrap().remove("tilemap");
    map.as_object_mut().unwrap().remove("width");
    let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
    assert!(matches!(err, MapFormatError::MissingField("width")));
}

#[test]
fn truncated_sector_row_is_rejected() {
    let mut map = base_map();
    map["sectorTypes"][2] = json!([2, 2, 2]);
    let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
    match err {
        MapFormatError::RowWidth { array, row, found, expected } => {
            assert_eq!(array, "sectorTypes");
            assert_eq!(row, 2);
            assert_eq!(found, 3);
            assert_eq!(expected, 4);
        }
        other => panic!("expected RowWidth, got {other:?}"),
    }
}

#[test]
fn missing_sector_row_is_rejected() {
    let mut map = base_map();
    map["wallTextureIDs"] = json!(vec![vec![0; 4]; 2]);
    let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
    assert!(matches!(
        err,
        MapFormatError::RowCount { array: "wallTextureIDs", found: 2, expected: 3 }
    ));
}

#[test]
fn malformed_light_colour_is_rejected() {
    let mut map = base_map();
    map["lightColors"][1][2] = json!("FF00FF");
    let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
    match err {
        MapFormatError::InvalidLightColour { x, y, .. } => {
            assert_eq!((x, y), (2, 1));
        }
        other => panic!("expected InvalidLightColour, got {other:?}"),
    }
}

#[test]
fn unknown_sector_type_is_rejected() {
    let mut map = base_map();
    map["sectorTypes"][1][1] = json!(7);
    let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
    assert!(matches!(err, MapFormatError::UnknownSectorType { value: 7, x: 1, y: 1 }));
}

#[test]
fn duplicate_entity_names_are_rejected() {
    let mut map = base_map();
    map["entities"] = json!([
        {
            "name": "start",
            "type": "EntityType.PlayerSpawner",
            "gridPosition": { "x": 1.0, "y": 1.0 },
        },
        {
            "name": "start",
            "type": "EntityType.PlayerSpawner",
            "gridPosition": { "x": 2.0, "y": 1.0 },
        },
    ]);
    let err = LevelData::parse(&map.to_string()).expect_err("parse should fail");
    assert!(matches!(err, MapFormatError::DuplicateEntity(_)));
}

#[test]
fn maps_load_from_disk_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("arena.json");
    std::fs::write(&path, base_map().to_string()).expect("write map");
    let raw = std::fs::read_to_string(&path).expect("read map");
    let data = LevelData::parse(&raw).expect("map should parse");
    assert_eq!(data.tilemap_path, "assets/textures/tilemap.png");
    assert_eq!(data.entities.len(), 0);
}

#[test]
fn adjacency_is_bounds_checked_on_every_edge() {
    let data = LevelData::parse(&base_map().to_string()).expect("map should parse");
    assert!(data.sector_at(-1, 0).is_none());
    assert!(data.sector_at(0, -1).is_none());
    assert!(data.sector_at(4, 0).is_none());
    assert!(data.sector_at(0, 3).is_none());

    let corner = *data.sector_at(0, 0).unwrap();
    assert!(data.sector_north(&corner).is_none());
    assert!(data.sector_west(&corner).is_none());
    assert_eq!(data.sector_south(&corner).unwrap().y, 1);
    assert_eq!(data.sector_east(&corner).unwrap().x, 1);
}
