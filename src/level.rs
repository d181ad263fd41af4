use crate::entity::process_entities;
use crate::events::GameEvent;
use crate::geometry::{build_surfaces, SectorSurfaces, TilemapInfo};
use crate::inventory::InventoryItem;
use crate::map::{LevelData, MapFormatError, SectorType};
use crate::pawn::{
    find_clip, velocity_from_intent, Animator, EnemyBrain, EnemyState, IntentFlags, MoveIntent,
    MoveSpeed, PawnBody, PawnKind, SceneProxy, SpriteNode, Transform, PLAYER_MOVE_SPEED,
};
use crate::physics::{ColliderTag, ContactEvent, PhysicsWorld};
use crate::scene::{ObjectMask, SceneGraph, SceneNodeId, SceneObject};
use crate::services::GameServices;
use crate::trigger::{ActivationCtx, Door, DoorId, Trigger, TriggerId, Triggerable};
use bevy_ecs::prelude::{Entity, World};
use glam::{Vec2, Vec3};
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;
use thiserror::Error;

/// Raised while turning parsed map data into a live level. Always fatal;
/// the world is left in its pre-load state.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error(transparent)]
    Map(#[from] MapFormatError),
    #[error("trigger {trigger:?} references unknown triggerable {name:?}")]
    UnresolvedTriggerable { trigger: String, name: String },
    #[error("trigger {trigger:?} references {name:?}, which is a {kind} and cannot be triggered")]
    NotTriggerable { trigger: String, name: String, kind: String },
    #[error("map declares no reachable player spawner")]
    MissingPlayerSpawner,
    #[error("spawner {spawner:?} declares unknown enemy kind {kind:?}")]
    UnknownEnemyKind { spawner: String, kind: String },
    #[error("pickup {0:?} declares no item")]
    PickupMissingItem(String),
    #[error("unsupported item in weapon pickup: {0}")]
    UnsupportedWeaponPickup(InventoryItem),
    #[error("not yet implemented: {0}")]
    NotImplemented(&'static str),
}

/// A queued pawn-creation request. Materialized at the head of the next
/// tick, never while a physics step might be in flight.
#[derive(Debug, Clone, Copy)]
pub struct PendingSpawn {
    pub kind: PawnKind,
    pub position: Vec2,
}

/// The aggregate root: owns the map data, the physics world, the pawn
/// roster, the trigger graph and the per-tick update order.
pub struct Level {
    data: LevelData,
    surfaces: SectorSurfaces,
    tilemap: Option<TilemapInfo>,
    physics: PhysicsWorld,
    world: World,
    scene: SceneGraph,
    pawns: Vec<Entity>,
    pending_spawns: VecDeque<PendingSpawn>,
    triggers: Vec<Trigger>,
    load_triggers: Vec<Trigger>,
    doors: Vec<Door>,
    standalone: Vec<Triggerable>,
    player_pawn: Option<Entity>,
    is_loaded: bool,
    torn_down: bool,
}

impl Level {
    pub fn new(data: LevelData) -> Self {
        Self {
            data,
            surfaces: SectorSurfaces::default(),
            tilemap: None,
            physics: PhysicsWorld::new(),
            world: World::new(),
            scene: SceneGraph::new(),
            pawns: Vec::new(),
            pending_spawns: VecDeque::new(),
            triggers: Vec::new(),
            load_triggers: Vec::new(),
            doors: Vec::new(),
            standalone: Vec::new(),
            player_pawn: None,
            is_loaded: false,
            torn_down: false,
        }
    }

    /// Builds collision and processes entity declarations. The level is
    /// not playable until the tilemap completion arrives; see
    /// [`Level::on_tilemap_ready`].
    pub fn load(&mut self) -> Result<(), LevelLoadError> {
        for sector in self.data.sectors() {
            if sector.kind == SectorType::Wall {
                self.physics.insert_wall(Vec2::new(sector.x as f32, sector.y as f32));
            }
        }
        let root = self.scene.root();
        self.scene.add(root, ObjectMask::LEVEL_GEOMETRY, SceneObject::SurfaceBatch, Vec2::ZERO);

        let processed = process_entities(&self.data, &mut self.physics, &mut self.scene)?;
        for trigger in processed.triggers {
            self.register_trigger(trigger);
        }
        for trigger in processed.load_triggers {
            self.register_load_trigger(trigger);
        }
        self.doors = processed.doors;
        self.standalone = processed.standalone;
        self.physics.refresh_queries();
        Ok(())
    }

    /// Completion handler for the collaborator's asynchronous tilemap
    /// load. Tolerated as a no-op when it lands after `unload`.
    pub fn on_tilemap_ready(&mut self, tilemap: TilemapInfo, services: &mut GameServices) {
        if self.torn_down {
            eprintln!("[level] tilemap completion arrived after unload, ignoring");
            return;
        }
        if self.is_loaded {
            return;
        }
        self.tilemap = Some(tilemap);
        self.surfaces = build_surfaces(&self.data);
        self.is_loaded = true;
        services.events.push(GameEvent::LevelLoaded);
        for index in 0..self.load_triggers.len() {
            let trigger = &mut self.load_triggers[index];
            let mut ctx = ActivationCtx {
                services: &mut *services,
                spawns: &mut self.pending_spawns,
                doors: &mut self.doors,
                physics: &mut self.physics,
            };
            trigger.on_level_loaded(&mut ctx);
        }
        // Load-time spawns materialize right away; no step is in flight.
        self.drain_spawn_queue(services);
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Tears the level down. Trigger, door and pawn bodies go with the
    /// physics world; late async completions are ignored from here on.
    pub fn unload(&mut self) {
        self.is_loaded = false;
        self.torn_down = true;
        self.physics = PhysicsWorld::new();
        self.world = World::new();
        self.scene.clear();
        self.pawns.clear();
        self.pending_spawns.clear();
        self.triggers.clear();
        self.load_triggers.clear();
        self.doors.clear();
        self.standalone.clear();
        self.player_pawn = None;
        self.surfaces = SectorSurfaces::default();
        self.tilemap = None;
    }

    /// One simulation tick: drain deferred spawns, step physics, resolve
    /// contacts, update pawns, then triggers, then standalone entities.
    pub fn update(&mut self, dt: f32, services: &mut GameServices) {
        if !self.is_loaded {
            return;
        }
        self.drain_spawn_queue(services);
        self.physics.step(dt);
        for event in self.physics.drain_contact_events() {
            self.resolve_contact(event, services);
        }
        self.sync_transforms();
        let roster = self.pawns.clone();
        for entity in roster {
            self.update_pawn(entity, dt, services);
        }
        self.update_triggers(dt, services);
        for index in 0..self.doors.len() {
            self.doors[index].update(dt, &mut *services, &mut self.physics);
        }
    }

    /// Queues a pawn. It joins the roster at the head of the next tick,
    /// after exactly one `update`, never synchronously.
    pub fn add_and_spawn_pawn(&mut self, kind: PawnKind, x: f32, y: f32) {
        self.pending_spawns.push_back(PendingSpawn { kind, position: Vec2::new(x, y) });
    }

    pub fn register_trigger(&mut self, mut trigger: Trigger) -> TriggerId {
        let id = TriggerId(self.triggers.len());
        let (body, collider) =
            self.physics.insert_trigger_sensor(trigger.position(), trigger.size(), id);
        trigger.set_body(body, collider);
        if let Some(pickup) = trigger.pickup() {
            let texture_path = pickup.sprite_texture_path.clone();
            let node = self.scene.add(
                self.scene.root(),
                ObjectMask::SPRITE,
                SceneObject::Sprite { texture_path },
                trigger.position(),
            );
            trigger.set_pickup_scene_node(node);
        }
        self.triggers.push(trigger);
        id
    }

    pub fn register_load_trigger(&mut self, trigger: Trigger) {
        self.load_triggers.push(trigger);
    }

    pub fn get_color_for_position(&self, x: f32, y: f32) -> Vec3 {
        self.data.light_at(x as i64, y as i64)
    }

    /// Recursive mask-filtered scene query used by ray casts and the
    /// renderer.
    pub fn get_children(&self, mask: ObjectMask) -> Vec<SceneNodeId> {
        self.scene.get_children(mask)
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn data(&self) -> &LevelData {
        &self.data
    }

    pub fn surfaces(&self) -> &SectorSurfaces {
        &self.surfaces
    }

    pub fn tilemap(&self) -> Option<TilemapInfo> {
        self.tilemap
    }

    /// Spawners declared outside any trigger's ownership; tracked so they
    /// are destroyed with the level.
    pub fn standalone_entities(&self) -> &[Triggerable] {
        &self.standalone
    }

    pub fn pawns(&self) -> &[Entity] {
        &self.pawns
    }

    pub fn player_pawn(&self) -> Option<Entity> {
        self.player_pawn
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(id.0)
    }

    pub fn triggers(&self) -> impl Iterator<Item = (TriggerId, &Trigger)> {
        self.triggers.iter().enumerate().map(|(index, trigger)| (TriggerId(index), trigger))
    }

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id.0)
    }

    pub fn doors(&self) -> impl Iterator<Item = (DoorId, &Door)> {
        self.doors.iter().enumerate().map(|(index, door)| (DoorId(index), door))
    }

    pub fn pawn_kind(&self, pawn: Entity) -> Option<PawnKind> {
        self.world.get::<PawnKind>(pawn).copied()
    }

    pub fn pawn_position(&self, pawn: Entity) -> Option<Vec2> {
        self.world.get::<Transform>(pawn).map(|t| t.translation)
    }

    pub fn pawn_rotation(&self, pawn: Entity) -> Option<f32> {
        self.world.get::<Transform>(pawn).map(|t| t.rotation)
    }

    pub fn enemy_brain(&self, pawn: Entity) -> Option<EnemyBrain> {
        self.world.get::<EnemyBrain>(pawn).copied()
    }

    pub fn pawn_speed(&self, pawn: Entity) -> Option<f32> {
        self.world.get::<MoveSpeed>(pawn).map(|s| s.0)
    }

    /// Raises movement intent on a pawn; the input collaborator steers the
    /// player through this.
    pub fn with_pawn_intent(&mut self, pawn: Entity, steer: impl FnOnce(&mut MoveIntent)) {
        if let Some(mut intent) = self.world.get_mut::<MoveIntent>(pawn) {
            steer(&mut intent);
        }
    }

    /// Repositions a pawn's physics body directly (respawns, teleports).
    pub fn set_pawn_position(&mut self, pawn: Entity, position: Vec2) {
        if let Some(body) = self.world.get::<PawnBody>(pawn).copied() {
            self.physics.set_body_translation(body.body, position);
        }
        if let Some(mut transform) = self.world.get_mut::<Transform>(pawn) {
            transform.translation = position;
        }
    }

    /// Contact-resolution entry for a pawn entering a trigger region.
    /// Returns whether the trigger counted an activation.
    pub fn on_pawn_enter(
        &mut self,
        id: TriggerId,
        pawn: Entity,
        services: &mut GameServices,
    ) -> bool {
        let Some(kind) = self.world.get::<PawnKind>(pawn).copied() else {
            return false;
        };
        let Some(trigger) = self.triggers.get_mut(id.0) else {
            return false;
        };
        let mut ctx = ActivationCtx {
            services,
            spawns: &mut self.pending_spawns,
            doors: &mut self.doors,
            physics: &mut self.physics,
        };
        trigger.on_pawn_enter(pawn, kind, &mut ctx)
    }

    pub fn on_pawn_leave(&mut self, id: TriggerId, pawn: Entity) {
        if let Some(trigger) = self.triggers.get_mut(id.0) {
            trigger.on_pawn_leave(pawn);
        }
    }

    /// Routes damage to whatever the entity is: player health goes through
    /// the armor-first rule, enemies through their brain. Dead pawns
    /// ignore further damage.
    pub fn apply_damage(&mut self, pawn: Entity, amount: f32, services: &mut GameServices) {
        if self.player_pawn == Some(pawn) {
            let GameServices { player, events, .. } = services;
            player.remove_health(amount, events);
            return;
        }
        let Some(brain) = self.world.get::<EnemyBrain>(pawn).copied() else {
            return;
        };
        if brain.is_dead() {
            return;
        }
        let mut brain = brain;
        // Damaging an enemy always makes it hostile.
        brain.aggroed = true;
        if let Some(mut speed) = self.world.get_mut::<MoveSpeed>(pawn) {
            speed.0 = brain.tuning.aggroed_speed;
        }
        brain.health = (brain.health - amount).max(0.0);
        if brain.health == 0.0 {
            brain.state = EnemyState::Dead;
            brain.state_time = 0.0;
            self.set_enemy_animation(pawn, "die");
            if let Some(body) = self.world.get::<PawnBody>(pawn).copied() {
                self.physics.set_body_enabled(body.body, false);
            }
            services.events.push(GameEvent::PawnDied { entity: pawn });
        }
        if let Some(mut slot) = self.world.get_mut::<EnemyBrain>(pawn) {
            *slot = brain;
        }
    }

    /// Fires one hitscan ray from a pawn along its facing. Walls and
    /// closed doors stop the ray, dead pawns let it pass, the first live
    /// enemy takes the damage.
    pub fn hitscan(&mut self, shooter: Entity, spread: f32, damage: f32, services: &mut GameServices) {
        let Some(transform) = self.world.get::<Transform>(shooter).copied() else {
            return;
        };
        let jitter =
            if spread > 0.0 { rand::thread_rng().gen_range(-spread..spread) } else { 0.0 };
        let angle = transform.rotation + jitter;
        let direction = Vec2::new(-angle.sin(), -angle.cos());
        let exclude = self.world.get::<PawnBody>(shooter).map(|b| b.collider);
        let hits = self.physics.ray_hits(transform.translation, direction, 100.0, exclude);
        for (handle, _) in hits {
            match self.physics.tag(handle) {
                Some(ColliderTag::Pawn(target)) => {
                    let live_enemy =
                        self.world.get::<EnemyBrain>(target).map(|b| !b.is_dead()).unwrap_or(false);
                    if live_enemy {
                        self.apply_damage(target, damage, services);
                        return;
                    }
                }
                Some(ColliderTag::Wall) | Some(ColliderTag::Door(_)) => return,
                _ => {}
            }
        }
    }

    fn drain_spawn_queue(&mut self, services: &mut GameServices) {
        while let Some(spawn) = self.pending_spawns.pop_front() {
            let entity = self.materialize_pawn(spawn, services);
            self.pawns.push(entity);
        }
    }

    fn materialize_pawn(&mut self, spawn: PendingSpawn, services: &mut GameServices) -> Entity {
        let entity = match spawn.kind {
            PawnKind::Player => self
                .world
                .spawn((
                    Transform::at(spawn.position),
                    MoveIntent::default(),
                    MoveSpeed(PLAYER_MOVE_SPEED),
                    PawnKind::Player,
                ))
                .id(),
            PawnKind::Enemy(kind) => {
                let brain = EnemyBrain::new(kind);
                self.world
                    .spawn((
                        Transform::at(spawn.position),
                        MoveIntent::default(),
                        MoveSpeed(brain.tuning.speed),
                        PawnKind::Enemy(kind),
                        brain,
                        Animator::new("idle"),
                    ))
                    .id()
            }
        };
        let (body, collider) = self.physics.spawn_pawn_body(spawn.position, entity);
        self.world.entity_mut(entity).insert(PawnBody { body, collider });
        let node = self.scene.add(
            self.scene.root(),
            ObjectMask::RAY_COLLISION,
            SceneObject::PawnProxy { pawn: entity },
            spawn.position,
        );
        self.world.entity_mut(entity).insert(SceneProxy(node));
        if let PawnKind::Enemy(kind) = spawn.kind {
            let sprite = self.scene.add(
                self.scene.root(),
                ObjectMask::SPRITE,
                SceneObject::Sprite { texture_path: kind.tuning().sprite_texture.to_string() },
                spawn.position,
            );
            self.world.entity_mut(entity).insert(SpriteNode(sprite));
        }
        if spawn.kind == PawnKind::Player {
            self.player_pawn = Some(entity);
        }
        services.events.push(GameEvent::PawnSpawned { entity });
        entity
    }

    fn resolve_contact(&mut self, event: ContactEvent, services: &mut GameServices) {
        let a_sensor = self.physics.is_sensor(event.a);
        let b_sensor = self.physics.is_sensor(event.b);
        // Sensor-sensor and solid-solid pairs carry no trigger semantics.
        if a_sensor == b_sensor {
            return;
        }
        let (sensor, solid) = if a_sensor { (event.a, event.b) } else { (event.b, event.a) };
        let trigger = match self.physics.tag(sensor) {
            Some(ColliderTag::Trigger(id)) => id,
            _ => {
                eprintln!("[level] contact with a sensor that has no owning trigger, dropping");
                return;
            }
        };
        let pawn = match self.physics.tag(solid) {
            Some(ColliderTag::Pawn(entity)) => entity,
            _ => return,
        };
        if event.started {
            self.on_pawn_enter(trigger, pawn, services);
        } else {
            self.on_pawn_leave(trigger, pawn);
        }
    }

    fn sync_transforms(&mut self) {
        let roster = self.pawns.clone();
        for entity in roster {
            let Some(body) = self.world.get::<PawnBody>(entity).copied() else {
                continue;
            };
            let Some(position) = self.physics.body_translation(body.body) else {
                continue;
            };
            if let Some(mut transform) = self.world.get_mut::<Transform>(entity) {
                transform.translation = position;
            }
            if let Some(proxy) = self.world.get::<SceneProxy>(entity).copied() {
                self.scene.set_position(proxy.0, position);
            }
            if let Some(sprite) = self.world.get::<SpriteNode>(entity).copied() {
                self.scene.set_position(sprite.0, position);
            }
        }
    }

    fn update_pawn(&mut self, entity: Entity, dt: f32, services: &mut GameServices) {
        let Some(intent) = self.world.get::<MoveIntent>(entity).copied() else {
            return;
        };
        let speed = self.world.get::<MoveSpeed>(entity).map(|s| s.0).unwrap_or(0.0);
        let mut rotation = self.world.get::<Transform>(entity).map(|t| t.rotation).unwrap_or(0.0);
        if intent.flags.contains(IntentFlags::TURNING) {
            rotation -= intent.turn_amount * dt;
            if let Some(mut transform) = self.world.get_mut::<Transform>(entity) {
                transform.rotation = rotation;
            }
        }
        let velocity = velocity_from_intent(&intent, rotation, speed);
        if let Some(body) = self.world.get::<PawnBody>(entity).copied() {
            self.physics.set_linvel(body.body, velocity);
        }
        if let Some(mut slot) = self.world.get_mut::<MoveIntent>(entity) {
            slot.clear();
        }

        if let (Some(PawnKind::Enemy(kind)), Some(animator)) = (
            self.world.get::<PawnKind>(entity).copied(),
            self.world.get::<Animator>(entity).copied(),
        ) {
            if let Some(clip) = find_clip(kind, animator.clip) {
                let mut animator = animator;
                animator.advance(dt, clip);
                if let Some(mut slot) = self.world.get_mut::<Animator>(entity) {
                    *slot = animator;
                }
            }
        }

        if matches!(self.world.get::<PawnKind>(entity).copied(), Some(PawnKind::Enemy(_))) {
            self.enemy_think(entity, dt, services);
        }
    }

    fn enemy_think(&mut self, entity: Entity, dt: f32, services: &mut GameServices) {
        let Some(brain) = self.world.get::<EnemyBrain>(entity).copied() else {
            return;
        };
        if brain.is_dead() {
            return;
        }
        let mut brain = brain;
        brain.state_time += dt;

        let position = self.pawn_position(entity);
        let player_position = self.player_pawn.and_then(|player| self.pawn_position(player));
        let (Some(position), Some(player_position)) = (position, player_position) else {
            self.store_brain(entity, brain);
            return;
        };
        let tuning = brain.tuning;

        if brain.aggroed {
            match brain.state {
                EnemyState::Idle if brain.state_time >= tuning.idle_state_time => {
                    if self.has_player_los(entity) {
                        let away = (position - player_position).normalize_or_zero();
                        self.set_pawn_rotation(entity, away.x.atan2(away.y));
                        if position.distance(player_position) <= tuning.attack_range {
                            self.change_state(entity, &mut brain, EnemyState::Attacking);
                        } else {
                            self.change_state(entity, &mut brain, EnemyState::Walking);
                        }
                    } else {
                        let heading = rand::thread_rng().gen_range(0.0..TAU);
                        self.set_pawn_rotation(entity, heading);
                        self.change_state(entity, &mut brain, EnemyState::Walking);
                    }
                }
                EnemyState::Walking => {
                    if brain.state_time >= tuning.walk_state_time {
                        self.change_state(entity, &mut brain, EnemyState::Idle);
                    } else {
                        self.with_pawn_intent(entity, |intent| intent.move_forward());
                    }
                }
                EnemyState::Attacking => {
                    if brain.state_time >= tuning.attack_state_time {
                        self.change_state(entity, &mut brain, EnemyState::Idle);
                    } else {
                        // Attack hook; weapon behaviour lives with collaborators.
                        services.events.push(GameEvent::EnemyAttack { entity });
                    }
                }
                _ => {}
            }
        } else if position.distance(player_position) < tuning.aggro_radius {
            // One-way: aggro never resets within a spawn's lifetime.
            brain.aggroed = true;
            if let Some(mut speed) = self.world.get_mut::<MoveSpeed>(entity) {
                speed.0 = tuning.aggroed_speed;
            }
        } else {
            match brain.state {
                EnemyState::Idle => {
                    // Idles twice as long while nothing has its attention.
                    if brain.state_time >= tuning.idle_state_time * 2.0 {
                        let heading = rand::thread_rng().gen_range(0.0..TAU);
                        self.set_pawn_rotation(entity, heading);
                        self.change_state(entity, &mut brain, EnemyState::Walking);
                    }
                }
                EnemyState::Walking => {
                    if brain.state_time >= tuning.walk_state_time {
                        self.change_state(entity, &mut brain, EnemyState::Idle);
                    } else {
                        self.with_pawn_intent(entity, |intent| intent.move_forward());
                    }
                }
                _ => {}
            }
        }
        self.store_brain(entity, brain);
    }

    /// Ray walk toward the player: other pawns neither block nor satisfy,
    /// sensors are invisible, open doors pass (their bodies are disabled),
    /// anything solid and unexpected blocks.
    fn has_player_los(&self, enemy: Entity) -> bool {
        let Some(player) = self.player_pawn else {
            return false;
        };
        let (Some(from), Some(to)) = (self.pawn_position(enemy), self.pawn_position(player)) else {
            return false;
        };
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return true;
        }
        let direction = delta / distance;
        let exclude = self.world.get::<PawnBody>(enemy).map(|b| b.collider);
        for (handle, _) in self.physics.ray_hits(from, direction, distance + 0.5, exclude) {
            match self.physics.tag(handle) {
                Some(ColliderTag::Pawn(hit)) if hit == player => return true,
                Some(ColliderTag::Pawn(_)) => continue,
                Some(ColliderTag::Trigger(_)) => continue,
                Some(ColliderTag::Wall) | Some(ColliderTag::Door(_)) | None => return false,
            }
        }
        true
    }

    fn change_state(&mut self, entity: Entity, brain: &mut EnemyBrain, state: EnemyState) {
        brain.state = state;
        brain.state_time = 0.0;
        let clip = match state {
            EnemyState::Idle => "idle",
            EnemyState::Walking => "walk",
            EnemyState::Attacking => "fire",
            EnemyState::Dead => "die",
        };
        self.set_enemy_animation(entity, clip);
    }

    fn set_enemy_animation(&mut self, entity: Entity, clip: &'static str) {
        let Some(PawnKind::Enemy(kind)) = self.world.get::<PawnKind>(entity).copied() else {
            return;
        };
        if find_clip(kind, clip).is_none() {
            eprintln!("[pawn] no animation named '{clip}' for {kind:?}");
            return;
        }
        if let Some(mut animator) = self.world.get_mut::<Animator>(entity) {
            animator.set_clip(clip);
        }
    }

    fn set_pawn_rotation(&mut self, entity: Entity, rotation: f32) {
        if let Some(mut transform) = self.world.get_mut::<Transform>(entity) {
            transform.rotation = rotation;
        }
    }

    fn store_brain(&mut self, entity: Entity, brain: EnemyBrain) {
        if let Some(mut slot) = self.world.get_mut::<EnemyBrain>(entity) {
            *slot = brain;
        }
    }

    fn update_triggers(&mut self, dt: f32, services: &mut GameServices) {
        for index in 0..self.triggers.len() {
            let Some(tick) = self.triggers[index].tick_damage(dt) else {
                continue;
            };
            for pawn in tick.pawns {
                let is_enemy = matches!(
                    self.world.get::<PawnKind>(pawn).copied(),
                    Some(PawnKind::Enemy(_))
                );
                if is_enemy && !tick.affects_enemy_pawns {
                    continue;
                }
                self.apply_damage(pawn, tick.amount, services);
            }
        }
        for index in 0..self.triggers.len() {
            let Some(pickup) = self.triggers[index].pickup() else {
                continue;
            };
            if let Some(node) = pickup.scene_node {
                let taken = pickup.taken;
                self.scene.set_visible(node, !taken);
            }
        }
    }
}
