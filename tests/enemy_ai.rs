use glam::Vec2;
use oni_citadel::events::GameEvent;
use oni_citadel::geometry::TilemapInfo;
use oni_citadel::level::Level;
use oni_citadel::map::LevelData;
use oni_citadel::pawn::{EnemyKind, EnemyState, PawnKind};
use oni_citadel::services::GameServices;
use serde_json::json;

fn open_map(width: usize, length: usize, extra_walls: &[(usize, usize)]) -> String {
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
                "gridPosition": { "x": 1.0, "y": 1.0 },
            },
        ],
    })
    .to_string()
}

fn load_level(raw: &str, services: &mut GameServices) -> Level {
    let data = LevelData::parse(raw).expect("map should parse");
    let mut level = Level::new(data);
    level.load().expect("level should load");
    level.on_tilemap_ready(
        TilemapInfo { texture_width: 256, texture_height: 256, tile_width: 32, tile_height: 32 },
        services,
    );
    level
}

#[test]
fn enemy_aggroes_when_the_player_comes_inside_the_radius() {
    // A long corridor: the enemy starts 20 cells from the player, well
    // outside its aggro radius of 10.
    let mut services = GameServices::new();
    let mut level = load_level(&open_map(25, 3, &[]), &mut services);
    level.add_and_spawn_pawn(PawnKind::Player, 1.0, 1.0);
    level.add_and_spawn_pawn(PawnKind::Enemy(EnemyKind::MaskedSamurai), 21.0, 1.0);
    level.update(0.1, &mut services);

    let enemy = level.pawns()[1];
    assert!(!level.enemy_brain(enemy).unwrap().aggroed);
    assert_eq!(level.pawn_speed(enemy), Some(1.0));

    level.update(0.1, &mut services);
    assert!(!level.enemy_brain(enemy).unwrap().aggroed);

    // Teleport the player to 9 cells away; the next think-step aggroes
    // and switches to the aggroed speed.
    let player = level.player_pawn().unwrap();
    level.set_pawn_position(player, Vec2::new(12.0, 1.0));
    level.update(0.1, &mut services);
    let brain = level.enemy_brain(enemy).unwrap();
    assert!(brain.aggroed);
    assert_eq!(level.pawn_speed(enemy), Some(3.0));
}

#[test]
fn aggro_is_one_way_even_when_the_player_retreats() {
    let mut services = GameServices::new();
    let mut level = load_level(&open_map(25, 3, &[]), &mut services);
    level.add_and_spawn_pawn(PawnKind::Player, 1.0, 1.0);
    level.add_and_spawn_pawn(PawnKind::Enemy(EnemyKind::MaskedSamurai), 5.0, 1.0);
    level.update(0.1, &mut services);

    let enemy = level.pawns()[1];
    level.update(0.1, &mut services);
    assert!(level.enemy_brain(enemy).unwrap().aggroed);

    let player = level.player_pawn().unwrap();
    level.set_pawn_position(player, Vec2::new(23.0, 1.0));
    for _ in 0..20 {
        level.update(0.1, &mut services);
    }
    assert!(level.enemy_brain(enemy).unwrap().aggroed);
}

#[test]
fn damage_aggroes_floors_at_zero_and_death_fires_once() {
    let mut services = GameServices::new();
    let mut level = load_level(&open_map(9, 3, &[]), &mut services);
    level.add_and_spawn_pawn(PawnKind::Enemy(EnemyKind::MaskedSamurai), 6.0, 1.0);
    level.update(0.1, &mut services);
    let enemy = level.pawns()[0];
    services.events.drain();

    level.apply_damage(enemy, 10.0, &mut services);
    let brain = level.enemy_brain(enemy).unwrap();
    assert!(brain.aggroed);
    assert_eq!(brain.health, 20.0);
    assert_eq!(level.pawn_speed(enemy), Some(3.0));

    // Overkill clamps at zero and kills exactly once.
    level.apply_damage(enemy, 500.0, &mut services);
    let brain = level.enemy_brain(enemy).unwrap();
    assert_eq!(brain.health, 0.0);
    assert_eq!(brain.state, EnemyState::Dead);

    level.apply_damage(enemy, 10.0, &mut services);
    let brain = level.enemy_brain(enemy).unwrap();
    assert_eq!(brain.health, 0.0);

    let deaths = services
        .events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::PawnDied { .. }))
        .count();
    assert_eq!(deaths, 1);
}

#[test]
fn clear_line_of_sight_in_attack_range_turns_to_attacking() {
    let mut services = GameServices::new();
    let mut level = load_level(&open_map(9, 3, &[]), &mut services);
    level.add_and_spawn_pawn(PawnKind::Player, 1.0, 1.0);
    level.add_and_spawn_pawn(PawnKind::Enemy(EnemyKind::MaskedSamurai), 5.0, 1.0);
    level.update(0.1, &mut services);
    let enemy = level.pawns()[1];

    // Distance 4 is inside both the aggro radius and the attack range;
    // once the idle timer elapses the enemy faces the player and attacks.
    for _ in 0..11 {
        level.update(0.1, &mut services);
    }
    let brain = level.enemy_brain(enemy).unwrap();
    assert!(brain.aggroed);
    assert_eq!(brain.state, EnemyState::Attacking);

    services.events.drain();
    level.update(0.1, &mut services);
    let attacks = services
        .events
        .drain()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::EnemyAttack { .. }))
        .count();
    assert!(attacks > 0);
}

#[test]
fn blocked_line_of_sight_walks_instead_of_attacking() {
    // A wall pillar at (3, 1) blocks the only straight line between the
    // enemy at (5, 1) and the player at (1, 1).
    let mut services = GameServices::new();
    let mut level = load_level(&open_map(9, 4, &[(3, 1)]), &mut services);
    level.add_and_spawn_pawn(PawnKind::Player, 1.0, 1.0);
    level.add_and_spawn_pawn(PawnKind::Enemy(EnemyKind::MaskedSamurai), 5.0, 1.0);
    level.update(0.1, &mut services);
    let enemy = level.pawns()[1];

    level.apply_damage(enemy, 1.0, &mut services);
    assert!(level.enemy_brain(enemy).unwrap().aggroed);

    // Let the idle timer elapse; with no line of sight the enemy must
    // wander rather than attack.
    for _ in 0..11 {
        level.update(0.1, &mut services);
        let state = level.enemy_brain(enemy).unwrap().state;
        assert_ne!(state, EnemyState::Attacking);
    }
    assert_eq!(level.enemy_brain(enemy).unwrap().state, EnemyState::Walking);
}

#[test]
fn dead_enemies_stop_thinking() {
    let mut services = GameServices::new();
    let mut level = load_level(&open_map(9, 3, &[]), &mut services);
    level.add_and_spawn_pawn(PawnKind::Player, 1.0, 1.0);
    level.add_and_spawn_pawn(PawnKind::Enemy(EnemyKind::MaskedSamurai), 5.0, 1.0);
    level.update(0.1, &mut services);
    let enemy = level.pawns()[1];

    level.apply_damage(enemy, 100.0, &mut services);
    assert_eq!(level.enemy_brain(enemy).unwrap().state, EnemyState::Dead);

    for _ in 0..20 {
        level.update(0.1, &mut services);
    }
    assert_eq!(level.enemy_brain(enemy).unwrap().state, EnemyState::Dead);
    assert_eq!(level.enemy_brain(enemy).unwrap().state_time, 0.0);
}
