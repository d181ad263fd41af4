use oni_citadel::events::GameEvent;
use oni_citadel::geometry::TilemapInfo;
use oni_citadel::inventory::InventoryItem;
use oni_citadel::Game;
use serde_json::json;

fn demo_map() -> String {
    let width = 5;
    let length = 5;
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
        "entities": [
            {
                "name": "start",
                "type": "EntityType.PlayerSpawner",
                "gridPosition": { "x": 2.0, "y": 2.0 },
            },
            {
                "name": "onload",
                "type": "EntityType.Trigger",
                "gridPosition": { "x": 2.0, "y": 2.0 },
                "triggerType": "TriggerType.LevelLoaded",
                "triggerables": ["start"],
            },
        ],
    })
    .to_string()
}

#[test]
fn start_new_resets_services_and_loads_the_level() {
    let mut game = Game::new();
    game.services_mut().inventory.add_item(InventoryItem::RedKey, 1);

    game.start_new(&demo_map()).expect("new game should start");
    // new_game wiped the key; the default loadout armed the pistol.
    assert!(!game.services().inventory.has_item(InventoryItem::RedKey));
    assert!(game.services().inventory.has_item(InventoryItem::Pistol));
    assert_eq!(game.services().inventory.item_count(InventoryItem::PistolAmmo), 50);

    assert!(!game.level().unwrap().is_loaded());
    game.on_tilemap_ready(TilemapInfo {
        texture_width: 256,
        texture_height: 256,
        tile_width: 32,
        tile_height: 32,
    });
    assert!(game.level().unwrap().is_loaded());

    let events = game.update(0.016);
    assert!(events.iter().any(|event| matches!(event, GameEvent::LevelLoaded)));
    assert!(events.iter().any(|event| matches!(event, GameEvent::PawnSpawned { .. })));
    assert_eq!(game.level().unwrap().pawns().len(), 1);
}

#[test]
fn malformed_maps_abort_start_new() {
    let mut game = Game::new();
    let err = game.start_new("{\"width\": 3}").expect_err("start should fail");
    assert!(err.to_string().contains("failed to parse map"));
    assert!(game.level().is_none());
}

#[test]
fn loading_a_saved_game_is_explicitly_unimplemented() {
    let mut game = Game::new();
    let err = game.load_existing().expect_err("load_existing should fail");
    assert!(err.to_string().contains("not yet implemented"));
}
