use crate::events::GameEvent;
use crate::inventory::InventoryItem;
use crate::level::PendingSpawn;
use crate::pawn::{EnemyKind, PawnKind};
use crate::physics::PhysicsWorld;
use crate::scene::SceneNodeId;
use crate::services::GameServices;
use bevy_ecs::prelude::Entity;
use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
use serde::Deserialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoorId(pub usize);

/// When a trigger fires. Wire names match the level editor's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TriggerType {
    #[serde(rename = "TriggerType.LevelLoaded")]
    LevelLoaded,
    #[serde(rename = "TriggerType.PawnEnter")]
    PawnEnter,
    #[serde(rename = "TriggerType.PlayerPawnEnter")]
    PlayerPawnEnter,
    #[serde(rename = "TriggerType.EnemyPawnEnter")]
    EnemyPawnEnter,
    #[serde(rename = "TriggerType.Pickup")]
    Pickup,
}

impl TriggerType {
    /// Whether a pawn of this kind attempting entry should re-attempt
    /// activation. Every pawn still joins the overlap set either way
    /// (damage zones care about enemies inside a player-gated region).
    pub fn admits(self, pawn: PawnKind) -> bool {
        match self {
            TriggerType::LevelLoaded => false,
            TriggerType::PawnEnter => true,
            TriggerType::PlayerPawnEnter | TriggerType::Pickup => pawn.is_player(),
            TriggerType::EnemyPawnEnter => pawn.is_enemy(),
        }
    }
}

/// Bounded activation counter shared by triggers and their triggerables.
/// `max == 0` means unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationGate {
    count: u32,
    max: u32,
}

impl ActivationGate {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    pub fn armed(&self) -> bool {
        self.max == 0 || self.count < self.max
    }

    pub fn record(&mut self) {
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PickupKind {
    #[serde(rename = "PickupType.Item")]
    Item,
    #[serde(rename = "PickupType.Weapon")]
    Weapon,
    #[serde(rename = "PickupType.Health")]
    Health,
    #[serde(rename = "PickupType.Armor")]
    Armor,
}

/// A pickup's effect when the player walks over it.
#[derive(Debug)]
pub struct Pickup {
    pub kind: PickupKind,
    pub item: InventoryItem,
    pub count: u32,
    pub message: String,
    pub sprite_texture_path: String,
    pub taken: bool,
    pub scene_node: Option<SceneNodeId>,
}

impl Pickup {
    fn collect(&mut self, services: &mut GameServices) -> bool {
        match self.kind {
            PickupKind::Health => {
                if services.player.is_health_full(false) {
                    services.events.push(GameEvent::message("Your health is full."));
                    return false;
                }
                self.taken = true;
                services.events.push(GameEvent::SoundEffect { name: "pickup" });
                services.events.push(GameEvent::message(self.message.clone()));
                services.player.add_health(self.count as f32, false, &mut services.events);
                true
            }
            PickupKind::Armor => {
                if services.player.is_armor_full(false) {
                    services.events.push(GameEvent::message("Your armor is full."));
                    return false;
                }
                self.taken = true;
                services.events.push(GameEvent::SoundEffect { name: "pickup" });
                services.events.push(GameEvent::message(self.message.clone()));
                services.player.add_armor(self.count as f32, false, &mut services.events);
                true
            }
            PickupKind::Weapon => {
                if !services.inventory.add_item(self.item, self.count) {
                    services
                        .events
                        .push(GameEvent::message("You cannot carry any more of those."));
                    return false;
                }
                self.taken = true;
                services.events.push(GameEvent::WeaponPickedUp { item: self.item });
                services.events.push(GameEvent::message(self.message.clone()));
                true
            }
            PickupKind::Item => {
                if !services.inventory.add_item(self.item, self.count) {
                    services
                        .events
                        .push(GameEvent::message("You cannot carry any more of those."));
                    return false;
                }
                self.taken = true;
                services.events.push(GameEvent::SoundEffect { name: "pickup" });
                services.events.push(GameEvent::message(self.message.clone()));
                true
            }
        }
    }
}

/// Interval damage applied to whatever stands inside the region.
#[derive(Debug, Clone, Copy)]
pub struct DamageZone {
    pub interval: f32,
    pub amount: f32,
    pub affects_enemy_pawns: bool,
    elapsed: f32,
}

impl DamageZone {
    pub fn new(interval: f32, amount: f32, affects_enemy_pawns: bool) -> Self {
        Self { interval, amount, affects_enemy_pawns, elapsed: 0.0 }
    }
}

#[derive(Debug)]
pub enum TriggerPayload {
    None,
    Pickup(Pickup),
    Damage(DamageZone),
}

/// Damage the level should route this tick, produced by a damage zone's
/// interval expiring.
#[derive(Debug)]
pub struct DamageTick {
    pub amount: f32,
    pub affects_enemy_pawns: bool,
    pub pawns: Vec<Entity>,
}

/// Mutable level state a trigger activation is allowed to touch. Spawning
/// goes through the deferred queue, never straight into the roster.
pub struct ActivationCtx<'a> {
    pub services: &'a mut GameServices,
    pub spawns: &'a mut VecDeque<PendingSpawn>,
    pub doors: &'a mut [Door],
    pub physics: &'a mut PhysicsWorld,
}

#[derive(Debug, Clone)]
pub enum TriggerableKind {
    PlayerSpawner { spawn_position: Option<Vec2> },
    EnemySpawner { enemy: EnemyKind, spawn_position: Option<Vec2> },
    Door(DoorId),
}

/// One behaviour a trigger owns. Carries its own activation gate,
/// orthogonal to the owning trigger's.
#[derive(Debug)]
pub struct Triggerable {
    pub name: String,
    gate: ActivationGate,
    pub kind: TriggerableKind,
}

impl Triggerable {
    pub fn new(name: impl Into<String>, kind: TriggerableKind) -> Self {
        Self { name: name.into(), gate: ActivationGate::default(), kind }
    }

    pub fn with_max_count(mut self, max: u32) -> Self {
        self.gate = ActivationGate::new(max);
        self
    }

    fn fire(&mut self, trigger_position: Vec2, ctx: &mut ActivationCtx) -> bool {
        if !self.gate.armed() {
            // Spent behaviours stop having an effect but do not block the
            // owning trigger from counting the activation.
            return true;
        }
        let fired = match &self.kind {
            TriggerableKind::PlayerSpawner { spawn_position } => {
                let position = spawn_position.unwrap_or(trigger_position);
                ctx.spawns.push_back(PendingSpawn { kind: PawnKind::Player, position });
                true
            }
            TriggerableKind::EnemySpawner { enemy, spawn_position } => {
                let position = spawn_position.unwrap_or(trigger_position);
                ctx.spawns.push_back(PendingSpawn { kind: PawnKind::Enemy(*enemy), position });
                true
            }
            TriggerableKind::Door(id) => {
                let door = &mut ctx.doors[id.0];
                door.trigger(ctx.services, ctx.physics)
            }
        };
        if fired {
            self.gate.record();
        }
        fired
    }
}

/// A spatial activation region owning an ordered list of triggerables.
/// LevelLoaded triggers have no sensor body and fire once wiring is done.
pub struct Trigger {
    name: String,
    position: Vec2,
    size: Vec2,
    kind: TriggerType,
    gate: ActivationGate,
    pawns_inside: Vec<Entity>,
    triggerables: Vec<Triggerable>,
    payload: TriggerPayload,
    body: Option<(RigidBodyHandle, ColliderHandle)>,
}

impl Trigger {
    pub fn new(
        name: impl Into<String>,
        position: Vec2,
        size: Vec2,
        kind: TriggerType,
        max_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            size,
            kind,
            gate: ActivationGate::new(max_count),
            pawns_inside: Vec::new(),
            triggerables: Vec::new(),
            payload: TriggerPayload::None,
            body: None,
        }
    }

    pub fn with_payload(mut self, payload: TriggerPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn add_triggerable(&mut self, triggerable: Triggerable) {
        self.triggerables.push(triggerable);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn trigger_type(&self) -> TriggerType {
        self.kind
    }

    pub fn activation_count(&self) -> u32 {
        self.gate.count()
    }

    pub fn pawns_inside(&self) -> &[Entity] {
        &self.pawns_inside
    }

    pub fn pickup(&self) -> Option<&Pickup> {
        match &self.payload {
            TriggerPayload::Pickup(pickup) => Some(pickup),
            _ => None,
        }
    }

    pub fn set_pickup_scene_node(&mut self, node: SceneNodeId) {
        if let TriggerPayload::Pickup(pickup) = &mut self.payload {
            pickup.scene_node = Some(node);
        }
    }

    pub fn set_body(&mut self, body: RigidBodyHandle, collider: ColliderHandle) {
        self.body = Some((body, collider));
    }

    pub fn body(&self) -> Option<(RigidBodyHandle, ColliderHandle)> {
        self.body
    }

    /// Contact-resolution entry: the pawn joins the overlap set, and every
    /// entry re-attempts activation, not just the first.
    pub fn on_pawn_enter(
        &mut self,
        pawn: Entity,
        pawn_kind: PawnKind,
        ctx: &mut ActivationCtx,
    ) -> bool {
        if self.kind == TriggerType::LevelLoaded {
            return false;
        }
        if !self.pawns_inside.contains(&pawn) {
            self.pawns_inside.push(pawn);
        }
        if self.kind.admits(pawn_kind) {
            self.activate(ctx)
        } else {
            false
        }
    }

    pub fn on_pawn_leave(&mut self, pawn: Entity) {
        if self.kind == TriggerType::LevelLoaded {
            return;
        }
        self.pawns_inside.retain(|p| *p != pawn);
    }

    pub fn on_level_loaded(&mut self, ctx: &mut ActivationCtx) {
        if self.kind == TriggerType::LevelLoaded {
            self.activate(ctx);
        }
    }

    /// Attempts one activation. The count increments only when every owned
    /// triggerable fired (a trigger with none always counts), and the
    /// return value reports exactly that.
    pub fn activate(&mut self, ctx: &mut ActivationCtx) -> bool {
        if !self.gate.armed() {
            eprintln!(
                "[trigger] '{}' cannot be activated more than {} times",
                self.name,
                self.gate.max()
            );
            return false;
        }
        let mut all_fired = true;
        match &mut self.payload {
            TriggerPayload::Pickup(pickup) => {
                if !pickup.collect(ctx.services) {
                    all_fired = false;
                }
            }
            _ => {
                for triggerable in &mut self.triggerables {
                    if !triggerable.fire(self.position, ctx) {
                        all_fired = false;
                    }
                }
            }
        }
        if all_fired {
            self.gate.record();
        }
        all_fired
    }

    /// Advances a damage payload; returns the damage the level should
    /// route when the interval elapsed this tick.
    pub fn tick_damage(&mut self, dt: f32) -> Option<DamageTick> {
        let TriggerPayload::Damage(zone) = &mut self.payload else {
            return None;
        };
        zone.elapsed += dt;
        if zone.elapsed < zone.interval {
            return None;
        }
        zone.elapsed = 0.0;
        Some(DamageTick {
            amount: zone.amount,
            affects_enemy_pawns: zone.affects_enemy_pawns,
            pawns: self.pawns_inside.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DoorDirection {
    NorthSouth,
    EastWest,
}

const DOOR_RATE: f32 = 2.0;
const DOOR_OPEN_LIFT: f32 = 1.0;
const DOOR_HOLD_TIME: f32 = 5.0;

/// A sliding door panel. The solid body is switched off the moment the
/// door starts opening and back on once it has fully closed.
pub struct Door {
    name: String,
    grid_position: Vec2,
    direction: DoorDirection,
    required_item: Option<InventoryItem>,
    sprite_texture_path: String,
    state: DoorState,
    lift: f32,
    open_time: f32,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl Door {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        grid_position: Vec2,
        direction: DoorDirection,
        required_item: Option<InventoryItem>,
        sprite_texture_path: impl Into<String>,
        body: RigidBodyHandle,
        collider: ColliderHandle,
    ) -> Self {
        Self {
            name: name.into(),
            grid_position,
            direction,
            required_item,
            sprite_texture_path: sprite_texture_path.into(),
            state: DoorState::Closed,
            lift: 0.0,
            open_time: 0.0,
            body,
            collider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid_position(&self) -> Vec2 {
        self.grid_position
    }

    pub fn direction(&self) -> DoorDirection {
        self.direction
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn lift(&self) -> f32 {
        self.lift
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn collider(&self) -> ColliderHandle {
        self.collider
    }

    pub fn sprite_texture_path(&self) -> &str {
        &self.sprite_texture_path
    }

    pub fn trigger(&mut self, services: &mut GameServices, physics: &mut PhysicsWorld) -> bool {
        if matches!(self.state, DoorState::Closed | DoorState::Closing) {
            if self.state == DoorState::Closed {
                if let Some(item) = self.required_item {
                    if !services.inventory.has_item(item) {
                        services.events.push(GameEvent::message(format!("You need the {item}!")));
                        return false;
                    }
                }
                services.events.push(GameEvent::SoundEffect { name: "doorOpen" });
                physics.set_body_enabled(self.body, false);
            }
            self.state = DoorState::Opening;
        }
        true
    }

    pub fn update(&mut self, dt: f32, services: &mut GameServices, physics: &mut PhysicsWorld) {
        match self.state {
            DoorState::Opening => {
                self.lift += DOOR_RATE * dt;
                if self.lift >= DOOR_OPEN_LIFT {
                    self.lift = DOOR_OPEN_LIFT;
                    self.state = DoorState::Open;
                }
            }
            DoorState::Closing => {
                self.lift -= DOOR_RATE * dt;
                if self.lift <= 0.0 {
                    self.lift = 0.0;
                    self.state = DoorState::Closed;
                    physics.set_body_enabled(self.body, true);
                }
            }
            DoorState::Open => {
                self.open_time += dt;
                if self.open_time >= DOOR_HOLD_TIME {
                    self.state = DoorState::Closing;
                    self.open_time = 0.0;
                    services.events.push(GameEvent::SoundEffect { name: "doorOpen" });
                }
            }
            DoorState::Closed => {}
        }
    }
}
