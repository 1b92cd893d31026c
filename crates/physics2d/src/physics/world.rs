//! Physics pipeline
//!
//! [`PhysicsWorld`] owns the collision, movement and trigger systems and runs
//! them in a fixed order every step, then republishes their results on an
//! [`EventSystem`] for listeners that only care about event types.

use crate::ecs::{Entity, System};
use crate::events::{
    Event, EventArg, EventSystem, EventType, ARG_ENTITY_A, ARG_ENTITY_B, ARG_NORMAL, ARG_OTHER,
    ARG_PENETRATION, ARG_TRIGGER,
};
use crate::foundation::collections::{BodyKey, ColliderKey};
use crate::physics::body::PhysicsBody;
use crate::physics::collision::Shape;
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::collision_system::{CollisionEvent, CollisionEventKind, CollisionSystem};
use crate::physics::config::PhysicsConfig;
use crate::physics::movement_system::MovementSystem;
use crate::physics::trigger_system::{TriggerConfig, TriggerEvent, TriggerEventKind, TriggerSystem};

/// Collision, movement and triggers stepped together
///
/// Each [`PhysicsWorld::step`] runs, in order:
/// 1. movement integration and contact resolution
/// 2. the collision pass (pair enter/exit)
/// 3. trigger membership updates
/// 4. broadcast of all resulting events through the [`EventSystem`]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    collision: CollisionSystem,
    movement: MovementSystem,
    triggers: TriggerSystem,
    events: EventSystem,
    elapsed: f64,
    steps: u64,
}

impl PhysicsWorld {
    /// Build a world from configuration
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            collision: CollisionSystem::from_config(&config.collision),
            movement: MovementSystem::new(config.movement.clone()),
            triggers: TriggerSystem::new(),
            events: EventSystem::new(),
            config,
            elapsed: 0.0,
            steps: 0,
        }
    }

    /// Configuration the world was built with
    pub const fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Collision system
    pub const fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    /// Mutable collision system
    pub fn collision_mut(&mut self) -> &mut CollisionSystem {
        &mut self.collision
    }

    /// Movement system
    pub const fn movement(&self) -> &MovementSystem {
        &self.movement
    }

    /// Mutable movement system
    pub fn movement_mut(&mut self) -> &mut MovementSystem {
        &mut self.movement
    }

    /// Trigger system
    pub const fn triggers(&self) -> &TriggerSystem {
        &self.triggers
    }

    /// Mutable trigger system
    pub fn triggers_mut(&mut self) -> &mut TriggerSystem {
        &mut self.triggers
    }

    /// Event system that step results are published on
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Simulated seconds since the world was created
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of completed steps
    pub const fn step_count(&self) -> u64 {
        self.steps
    }

    // ---- Population ----

    /// Add a body with a collider of the given shape
    pub fn add_body(&mut self, body: PhysicsBody, shape: Shape) -> Option<BodyKey> {
        self.movement.add_body(&mut self.collision, body, shape)
    }

    /// Remove a body and its collider
    pub fn remove_body(&mut self, key: BodyKey) -> bool {
        self.movement.remove_body(&mut self.collision, key)
    }

    /// Add a collider that has no body
    pub fn add_collider(
        &mut self,
        entity: Entity,
        shape: Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
    ) -> Option<ColliderKey> {
        self.collision.register(entity, shape, layer, mask)
    }

    /// Add a trigger volume
    pub fn add_trigger(
        &mut self,
        entity: Entity,
        shape: Shape,
        layer: CollisionLayers,
        mask: CollisionLayers,
        config: TriggerConfig,
    ) -> Option<ColliderKey> {
        let key = self.collision.register_trigger(entity, shape, layer, mask)?;
        if !self.triggers.add_trigger(entity, config) {
            self.collision.unregister(entity);
            return None;
        }
        Some(key)
    }

    /// Remove a trigger volume; members are dropped without Exit callbacks
    pub fn remove_trigger(&mut self, entity: Entity) -> bool {
        let removed = self.triggers.remove_trigger(entity);
        removed && self.collision.unregister(entity)
    }

    /// Remove a body-less collider
    ///
    /// Bodies must go through [`PhysicsWorld::remove_body`] so the body
    /// record goes with them.
    pub fn remove_collider(&mut self, entity: Entity) -> bool {
        if self.collision.collider_by_entity(entity).is_some_and(|c| c.body.is_some()) {
            log::warn!("{entity} belongs to a body; use remove_body");
            return false;
        }
        self.triggers.remove_trigger(entity);
        self.collision.unregister(entity)
    }

    // ---- Stepping ----

    /// Advance the simulation by `delta_time` seconds
    ///
    /// Non-positive or non-finite steps are ignored.
    pub fn step(&mut self, delta_time: f32) {
        if !(delta_time.is_finite() && delta_time > 0.0) {
            log::warn!("ignoring physics step of {delta_time}s");
            return;
        }

        self.movement.update(&mut self.collision, delta_time);
        self.collision.update();
        self.triggers.update(self.collision.events(), delta_time);

        self.elapsed += f64::from(delta_time);
        self.steps += 1;
        self.broadcast();
        self.events.update_time(self.elapsed);
        self.events.dispatch();
    }

    fn broadcast(&mut self) {
        let timestamp = self.elapsed;
        for event in self.collision.events() {
            self.events.send(collision_event(event, timestamp));
        }
        for event in self.triggers.events() {
            self.events.send(trigger_event(event, timestamp));
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl System for PhysicsWorld {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn initialize(&mut self) {
        log::info!(
            "physics world ready: {} colliders, {} bodies",
            self.collision.collider_count(),
            self.movement.body_count()
        );
    }

    fn update(&mut self, delta_time: f32) {
        self.step(delta_time);
    }

    fn shutdown(&mut self) {
        log::info!("physics world shut down after {} steps ({:.2}s)", self.steps, self.elapsed);
        self.events.clear();
    }
}

fn collision_event(event: &CollisionEvent, timestamp: f64) -> Event {
    let event_type = match event.kind {
        CollisionEventKind::Enter => EventType::CollisionEnter,
        CollisionEventKind::Exit => EventType::CollisionExit,
    };
    let mut out = Event::new(event_type, timestamp)
        .with_arg(ARG_ENTITY_A, EventArg::Entity(event.pair.entity_a))
        .with_arg(ARG_ENTITY_B, EventArg::Entity(event.pair.entity_b));
    if let Some(contact) = &event.contact {
        out = out
            .with_arg(ARG_NORMAL, EventArg::Vector(contact.normal.x, contact.normal.y))
            .with_arg(ARG_PENETRATION, EventArg::Scalar(contact.penetration));
    }
    out
}

fn trigger_event(event: &TriggerEvent, timestamp: f64) -> Event {
    let event_type = match event.kind {
        TriggerEventKind::Enter => EventType::TriggerEnter,
        TriggerEventKind::Stay => EventType::TriggerStay,
        TriggerEventKind::Exit => EventType::TriggerExit,
    };
    Event::new(event_type, timestamp)
        .with_arg(ARG_TRIGGER, EventArg::Entity(event.trigger))
        .with_arg(ARG_OTHER, EventArg::Entity(event.other))
}
