use crate::trigger::{DoorId, TriggerId};
use bevy_ecs::prelude::Entity;
use glam::Vec2;
use rapier2d::geometry::CollisionEvent;
use rapier2d::math::Point;
use rapier2d::pipeline::{ActiveEvents, EventHandler};
use rapier2d::prelude::{
    CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet, ContactPair, DefaultBroadPhase,
    ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, QueryFilter, QueryFilterFlags, QueryPipeline, Ray, Real, RigidBody,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};
use std::collections::HashMap;
use std::sync::Mutex;

const PAWN_RADIUS: f32 = 0.2;
const PAWN_LINEAR_DAMPING: f32 = 10.0;

/// What a collider belongs to. Contact resolution and ray walks resolve
/// handles through this tag instead of downcasting user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderTag {
    Wall,
    Pawn(Entity),
    Trigger(TriggerId),
    Door(DoorId),
}

/// One begin/end contact pair, still unresolved.
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    pub started: bool,
    pub a: ColliderHandle,
    pub b: ColliderHandle,
}

struct CollisionEventCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl CollisionEventCollector {
    fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    fn drain(&self) -> Vec<CollisionEvent> {
        if let Ok(mut events) = self.events.lock() {
            std::mem::take(&mut *events)
        } else {
            Vec::new()
        }
    }
}

impl EventHandler for CollisionEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Owns the rapier state for one level: static wall volumes, trigger
/// sensors, door panels and pawn bodies. The grid plane is top-down, so
/// gravity is zero and pawn rotation is locked.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    tags: HashMap<ColliderHandle, ColliderTag>,
    event_collector: CollisionEventCollector,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: Vector::new(0.0, 0.0),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            tags: HashMap::new(),
            event_collector: CollisionEventCollector::new(),
        }
    }

    /// One static cell-sized volume per WALL sector.
    pub fn insert_wall(&mut self, cell: Vec2) -> ColliderHandle {
        let body = RigidBodyBuilder::fixed().translation(Vector::new(cell.x, cell.y)).build();
        let body_handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(0.5, 0.5)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.colliders.insert_with_parent(collider, body_handle, &mut self.bodies);
        self.tags.insert(handle, ColliderTag::Wall);
        handle
    }

    /// Static sensor volume for a trigger region. Overlap is detected,
    /// nothing is pushed around.
    pub fn insert_trigger_sensor(
        &mut self,
        position: Vec2,
        size: Vec2,
        id: TriggerId,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body =
            RigidBodyBuilder::fixed().translation(Vector::new(position.x, position.y)).build();
        let body_handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(size.x / 2.0, size.y / 2.0)
            .sensor(true)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.colliders.insert_with_parent(collider, body_handle, &mut self.bodies);
        self.tags.insert(handle, ColliderTag::Trigger(id));
        (body_handle, handle)
    }

    /// Solid door panel; disabled while the door stands open.
    pub fn insert_door_body(
        &mut self,
        position: Vec2,
        id: DoorId,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body =
            RigidBodyBuilder::fixed().translation(Vector::new(position.x, position.y)).build();
        let body_handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(0.5, 0.5)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.colliders.insert_with_parent(collider, body_handle, &mut self.bodies);
        self.tags.insert(handle, ColliderTag::Door(id));
        (body_handle, handle)
    }

    /// Dynamic pawn body: locked rotation, heavy damping, a small ball
    /// collider so pawns slide along walls.
    pub fn spawn_pawn_body(
        &mut self,
        position: Vec2,
        pawn: Entity,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(position.x, position.y))
            .lock_rotations()
            .linear_damping(PAWN_LINEAR_DAMPING)
            .build();
        let body_handle = self.bodies.insert(body);
        let collider = ColliderBuilder::ball(PAWN_RADIUS)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.colliders.insert_with_parent(collider, body_handle, &mut self.bodies);
        self.tags.insert(handle, ColliderTag::Pawn(pawn));
        (body_handle, handle)
    }

    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let collider_handles: Vec<ColliderHandle> = self
            .bodies
            .get(handle)
            .map(|body| body.colliders().iter().copied().collect())
            .unwrap_or_default();
        for collider in collider_handles {
            self.tags.remove(&collider);
        }
        let _ = self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        let hooks = ();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &hooks,
            &self.event_collector,
        );
        self.query_pipeline.update(&self.colliders);
    }

    /// Rebuilds the query acceleration structure outside of stepping, so
    /// ray casts work against freshly inserted colliders.
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    pub fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        self.event_collector
            .drain()
            .into_iter()
            .map(|event| match event {
                CollisionEvent::Started(a, b, _) => ContactEvent { started: true, a, b },
                CollisionEvent::Stopped(a, b, _) => ContactEvent { started: false, a, b },
            })
            .collect()
    }

    pub fn tag(&self, handle: ColliderHandle) -> Option<ColliderTag> {
        self.tags.get(&handle).copied()
    }

    pub fn is_sensor(&self, handle: ColliderHandle) -> bool {
        self.colliders.get(handle).map(|c| c.is_sensor()).unwrap_or(false)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|body| {
            let translation = body.translation();
            Vec2::new(translation.x, translation.y)
        })
    }

    pub fn set_body_translation(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(Vector::new(position.x, position.y), true);
        }
    }

    pub fn set_linvel(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_linvel(Vector::new(velocity.x, velocity.y), true);
        }
    }

    pub fn set_body_enabled(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_enabled(enabled);
        }
    }

    pub fn is_body_enabled(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.get(handle).map(|body| body.is_enabled()).unwrap_or(false)
    }

    /// All non-sensor colliders pierced by a ray, closest first. The
    /// caster's own collider is excluded; disabled bodies (open doors,
    /// dead pawns) never show up.
    pub fn ray_hits(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_toi: f32,
        exclude: Option<ColliderHandle>,
    ) -> Vec<(ColliderHandle, f32)> {
        let ray = Ray::new(
            Point::new(origin.x, origin.y),
            Vector::new(direction.x, direction.y),
        );
        let mut filter = QueryFilter::default();
        filter.flags |= QueryFilterFlags::EXCLUDE_SENSORS;
        filter.exclude_collider = exclude;
        let mut hits: Vec<(ColliderHandle, f32)> = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_toi,
            true,
            filter,
            |handle, intersection| {
                hits.push((handle, intersection.time_of_impact));
                true
            },
        );
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}
