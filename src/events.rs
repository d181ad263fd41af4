use crate::inventory::InventoryItem;
use crate::weapons::{WeaponKind, WeaponState};
use bevy_ecs::prelude::Entity;
use std::fmt;

/// Everything the simulation wants the outer game loop to know about,
/// delivered synchronously in push order and drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelLoaded,
    ShowMessage { text: String },
    SoundEffect { name: &'static str },
    HealthChanged { value: f32 },
    ArmorChanged { value: f32 },
    PlayerDied,
    WeaponPickedUp { item: InventoryItem },
    WeaponStateChanged { kind: WeaponKind, from: WeaponState, to: WeaponState },
    PawnSpawned { entity: Entity },
    PawnDied { entity: Entity },
    EnemyAttack { entity: Entity },
}

impl GameEvent {
    pub fn message(text: impl Into<String>) -> Self {
        GameEvent::ShowMessage { text: text.into() }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::LevelLoaded => write!(f, "LevelLoaded"),
            GameEvent::ShowMessage { text } => write!(f, "ShowMessage {text}"),
            GameEvent::SoundEffect { name } => write!(f, "SoundEffect {name}"),
            GameEvent::HealthChanged { value } => write!(f, "HealthChanged value={value}"),
            GameEvent::ArmorChanged { value } => write!(f, "ArmorChanged value={value}"),
            GameEvent::PlayerDied => write!(f, "PlayerDied"),
            GameEvent::WeaponPickedUp { item } => write!(f, "WeaponPickedUp item={item}"),
            GameEvent::WeaponStateChanged { kind, from, to } => {
                write!(f, "WeaponStateChanged kind={kind:?} from={from:?} to={to:?}")
            }
            GameEvent::PawnSpawned { entity } => write!(f, "PawnSpawned entity={}", entity.index()),
            GameEvent::PawnDied { entity } => write!(f, "PawnDied entity={}", entity.index()),
            GameEvent::EnemyAttack { entity } => write!(f, "EnemyAttack entity={}", entity.index()),
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
