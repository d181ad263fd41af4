use crate::inventory::InventoryItem;
use crate::level::LevelLoadError;
use crate::map::{EntityDeclaration, EntityKind, LevelData};
use crate::pawn::EnemyKind;
use crate::physics::PhysicsWorld;
use crate::scene::{ObjectMask, SceneGraph, SceneObject};
use crate::trigger::{
    DamageZone, Door, DoorDirection, DoorId, Pickup, PickupKind, Trigger, TriggerPayload,
    TriggerType, Triggerable, TriggerableKind,
};
use glam::Vec2;
use std::collections::HashMap;

const DEFAULT_TRIGGER_SIZE: Vec2 = Vec2::new(1.0, 1.0);
const PICKUP_SIZE: Vec2 = Vec2::new(0.5, 0.5);

/// Everything entity processing produces for the level to own. Spatial
/// trigger indices double as their `TriggerId`s.
pub struct ProcessedEntities {
    pub triggers: Vec<Trigger>,
    pub load_triggers: Vec<Trigger>,
    pub doors: Vec<Door>,
    pub standalone: Vec<Triggerable>,
}

/// Interprets every declaration in the map, wiring triggers to concrete
/// triggerables. Fails fatally on dangling references, unknown sub-kinds
/// or a map with no reachable player spawner.
pub fn process_entities(
    data: &LevelData,
    physics: &mut PhysicsWorld,
    scene: &mut SceneGraph,
) -> Result<ProcessedEntities, LevelLoadError> {
    let mut out = ProcessedEntities {
        triggers: Vec::new(),
        load_triggers: Vec::new(),
        doors: Vec::new(),
        standalone: Vec::new(),
    };
    let mut door_ids: HashMap<&str, DoorId> = HashMap::new();
    let mut player_spawner_found = false;

    // Doors first, so trigger wiring can reference them by name.
    for declaration in data.entities.values() {
        if declaration.kind != EntityKind::Door {
            continue;
        }
        let id = DoorId(out.doors.len());
        let position = Vec2::from(declaration.grid_position);
        let (body, collider) = physics.insert_door_body(position, id);
        let sprite = declaration
            .sprite_texture_path
            .clone()
            .unwrap_or_else(|| "assets/textures/door.png".to_string());
        scene.add(
            scene.root(),
            ObjectMask::LEVEL_GEOMETRY,
            SceneObject::DoorPanel { door: id },
            position,
        );
        out.doors.push(Door::new(
            &declaration.name,
            position,
            declaration.direction.unwrap_or(DoorDirection::NorthSouth),
            declaration.required_item,
            sprite,
            body,
            collider,
        ));
        door_ids.insert(declaration.name.as_str(), id);
    }

    for declaration in data.entities.values() {
        match declaration.kind {
            EntityKind::Door => {}
            EntityKind::Pawn => {
                eprintln!(
                    "[entity] ignoring pre-placed pawn declaration '{}'",
                    declaration.name
                );
            }
            EntityKind::PlayerSpawner => {
                player_spawner_found = true;
                out.standalone.push(Triggerable::new(
                    &declaration.name,
                    TriggerableKind::PlayerSpawner {
                        spawn_position: Some(Vec2::from(declaration.grid_position)),
                    },
                ));
            }
            EntityKind::EnemySpawner => {
                let enemy = resolve_enemy_kind(declaration)?;
                out.standalone.push(Triggerable::new(
                    &declaration.name,
                    TriggerableKind::EnemySpawner {
                        enemy,
                        spawn_position: Some(Vec2::from(declaration.grid_position)),
                    },
                ));
            }
            EntityKind::Pickup => {
                out.triggers.push(build_pickup(declaration)?);
            }
            EntityKind::DamageTrigger => {
                let position = Vec2::from(declaration.grid_position);
                let size = declaration.size.map(Vec2::from).unwrap_or(DEFAULT_TRIGGER_SIZE);
                let trigger = Trigger::new(
                    &declaration.name,
                    position,
                    size,
                    TriggerType::PlayerPawnEnter,
                    declaration.max_trigger_count.unwrap_or(0),
                )
                .with_payload(TriggerPayload::Damage(DamageZone::new(
                    declaration.interval.unwrap_or(1.0),
                    declaration.amount.unwrap_or(5.0),
                    declaration.affects_enemy_pawns.unwrap_or(false),
                )));
                out.triggers.push(trigger);
            }
            EntityKind::Trigger => {
                let position = Vec2::from(declaration.grid_position);
                let size = declaration.size.map(Vec2::from).unwrap_or(DEFAULT_TRIGGER_SIZE);
                let trigger_type =
                    declaration.trigger_type.unwrap_or(TriggerType::PawnEnter);
                let mut trigger = Trigger::new(
                    &declaration.name,
                    position,
                    size,
                    trigger_type,
                    declaration.max_trigger_count.unwrap_or(0),
                );
                for target in &declaration.triggerables {
                    let triggerable =
                        resolve_triggerable(data, &declaration.name, target, &door_ids)?;
                    if matches!(triggerable.kind, TriggerableKind::PlayerSpawner { .. }) {
                        player_spawner_found = true;
                    }
                    trigger.add_triggerable(triggerable);
                }
                if trigger_type == TriggerType::LevelLoaded {
                    out.load_triggers.push(trigger);
                } else {
                    out.triggers.push(trigger);
                }
            }
        }
    }

    if !player_spawner_found {
        return Err(LevelLoadError::MissingPlayerSpawner);
    }
    Ok(out)
}

fn resolve_enemy_kind(declaration: &EntityDeclaration) -> Result<EnemyKind, LevelLoadError> {
    let raw = declaration.enemy_type.as_deref().ok_or_else(|| {
        LevelLoadError::UnknownEnemyKind {
            spawner: declaration.name.clone(),
            kind: "<missing>".to_string(),
        }
    })?;
    match raw {
        "EnemyType.MaskedSamurai" => Ok(EnemyKind::MaskedSamurai),
        other => Err(LevelLoadError::UnknownEnemyKind {
            spawner: declaration.name.clone(),
            kind: other.to_string(),
        }),
    }
}

fn resolve_triggerable(
    data: &LevelData,
    trigger_name: &str,
    target: &str,
    door_ids: &HashMap<&str, DoorId>,
) -> Result<Triggerable, LevelLoadError> {
    let declaration = data.entities.get(target).ok_or_else(|| {
        LevelLoadError::UnresolvedTriggerable {
            trigger: trigger_name.to_string(),
            name: target.to_string(),
        }
    })?;
    match declaration.kind {
        EntityKind::PlayerSpawner => Ok(Triggerable::new(
            target,
            TriggerableKind::PlayerSpawner {
                spawn_position: Some(Vec2::from(declaration.grid_position)),
            },
        )),
        EntityKind::EnemySpawner => {
            let enemy = resolve_enemy_kind(declaration)?;
            Ok(Triggerable::new(
                target,
                TriggerableKind::EnemySpawner {
                    enemy,
                    spawn_position: Some(Vec2::from(declaration.grid_position)),
                },
            ))
        }
        EntityKind::Door => {
            let id = door_ids[target];
            Ok(Triggerable::new(target, TriggerableKind::Door(id)))
        }
        other => Err(LevelLoadError::NotTriggerable {
            trigger: trigger_name.to_string(),
            name: target.to_string(),
            kind: format!("{other:?}"),
        }),
    }
}

fn build_pickup(declaration: &EntityDeclaration) -> Result<Trigger, LevelLoadError> {
    let kind = match declaration.pickup_type {
        Some(kind) => kind,
        None if declaration.item.is_some() => PickupKind::Item,
        None => {
            return Err(LevelLoadError::PickupMissingItem(declaration.name.clone()));
        }
    };
    let (item, count, message, sprite) = match kind {
        PickupKind::Health => (
            InventoryItem::Health,
            declaration.count.unwrap_or(25),
            "You picked some health.".to_string(),
            "assets/textures/health_pickup.png".to_string(),
        ),
        PickupKind::Armor => (
            InventoryItem::Armor,
            declaration.count.unwrap_or(50),
            "You picked some armor.".to_string(),
            "assets/textures/armor_pickup.png".to_string(),
        ),
        PickupKind::Weapon => {
            let item = declaration
                .item
                .ok_or_else(|| LevelLoadError::PickupMissingItem(declaration.name.clone()))?;
            let (message, sprite) = match item {
                InventoryItem::Shotgun => (
                    "You got the shotgun!".to_string(),
                    "assets/textures/shotgun_pickup.png".to_string(),
                ),
                other => return Err(LevelLoadError::UnsupportedWeaponPickup(other)),
            };
            (item, declaration.count.unwrap_or(1), message, sprite)
        }
        PickupKind::Item => {
            let item = declaration
                .item
                .ok_or_else(|| LevelLoadError::PickupMissingItem(declaration.name.clone()))?;
            let message = format!("You picked up the {item}.");
            (item, declaration.count.unwrap_or(1), message, "assets/textures/pickup.png".to_string())
        }
    };
    let message = declaration.message.clone().unwrap_or(message);
    let sprite = declaration.sprite_texture_path.clone().unwrap_or(sprite);
    let pickup = Pickup {
        kind,
        item,
        count,
        message,
        sprite_texture_path: sprite,
        taken: false,
        scene_node: None,
    };
    Ok(Trigger::new(
        &declaration.name,
        Vec2::from(declaration.grid_position),
        PICKUP_SIZE,
        TriggerType::PlayerPawnEnter,
        1,
    )
    .with_payload(TriggerPayload::Pickup(pickup)))
}
