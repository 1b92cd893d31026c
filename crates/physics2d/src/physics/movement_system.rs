//! Movement integration and contact resolution
//!
//! Each step runs in two phases. Integration advances every dynamic body, then
//! every body's collider is synced to the body's transform, layers and trigger
//! flag. Resolution walks the contacts between solid bodies a configurable
//! number of times, separating them and applying normal and friction impulses.

use std::collections::HashSet;

use crate::foundation::collections::{BodyKey, ColliderKey, SlotMap};
use crate::foundation::math::{clamp_length, normalize_or, Vec2, EPSILON};
use crate::physics::body::PhysicsBody;
use crate::physics::collision::{narrow_phase, ContactResult, Shape};
use crate::physics::collision_system::{Collider, CollisionSystem};
use crate::physics::config::MovementConfig;

/// Per-body values read during resolution and written back afterwards
#[derive(Debug, Clone, Copy)]
struct BodyState {
    position: Vec2,
    velocity: Vec2,
    inverse_mass: f32,
    friction: f32,
    restitution: f32,
}

impl BodyState {
    fn of(body: &PhysicsBody) -> Self {
        Self {
            position: body.position,
            velocity: body.velocity,
            inverse_mass: body.inverse_mass(),
            friction: body.friction,
            restitution: body.restitution,
        }
    }
}

/// Integrates physics bodies and resolves contacts between them
pub struct MovementSystem {
    bodies: SlotMap<BodyKey, PhysicsBody>,
    config: MovementConfig,
}

impl MovementSystem {
    /// Create an empty movement system
    pub fn new(config: MovementConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            config,
        }
    }

    /// Current settings
    pub const fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Replace the settings
    pub fn set_config(&mut self, config: MovementConfig) {
        self.config = config;
    }

    /// Add a body and register a collider for it
    ///
    /// `shape` is moved to the body's transform. Returns `None` (and keeps
    /// nothing) if the collision system rejects the collider.
    pub fn add_body(
        &mut self,
        collision: &mut CollisionSystem,
        body: PhysicsBody,
        mut shape: Shape,
    ) -> Option<BodyKey> {
        shape.set_transform(body.position, body.rotation);
        let (entity, layer, mask, is_trigger) =
            (body.entity, body.layer, body.mask, body.is_trigger);

        let key = self.bodies.insert(body);
        let mut collider = Collider::new(entity, shape, layer, mask).with_body(key);
        collider.is_trigger = is_trigger;

        let Some(collider_key) = collision.register_collider(collider) else {
            log::warn!("could not add body for {entity}");
            self.bodies.remove(key);
            return None;
        };
        if let Some(body) = self.bodies.get_mut(key) {
            body.collider = Some(collider_key);
        }
        log::debug!("added body for {entity}");
        Some(key)
    }

    /// Remove a body and its collider
    pub fn remove_body(&mut self, collision: &mut CollisionSystem, key: BodyKey) -> bool {
        let Some(body) = self.bodies.remove(key) else {
            return false;
        };
        collision.unregister(body.entity);
        true
    }

    /// Body by key
    pub fn body(&self, key: BodyKey) -> Option<&PhysicsBody> {
        self.bodies.get(key)
    }

    /// Mutable body by key
    ///
    /// Changes to the transform, layers or trigger flag made here reach the
    /// collider during the next step, static bodies included.
    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(key)
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &PhysicsBody)> {
        self.bodies.iter()
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Overwrite a body's velocity
    pub fn set_velocity(&mut self, key: BodyKey, velocity: Vec2) -> bool {
        self.bodies
            .get_mut(key)
            .map(|body| body.velocity = velocity)
            .is_some()
    }

    /// Accumulate a force on a body for the next step
    pub fn apply_force(&mut self, key: BodyKey, force: Vec2) -> bool {
        self.bodies
            .get_mut(key)
            .map(|body| body.apply_force(force))
            .is_some()
    }

    /// Apply an instantaneous impulse to a body
    pub fn apply_impulse(&mut self, key: BodyKey, impulse: Vec2) -> bool {
        self.bodies
            .get_mut(key)
            .map(|body| body.apply_impulse(impulse))
            .is_some()
    }

    /// Advance all bodies by `delta_time` and resolve the resulting contacts
    pub fn update(&mut self, collision: &mut CollisionSystem, delta_time: f32) {
        if !(delta_time > 0.0) {
            return;
        }

        self.integrate(delta_time);
        self.sync_colliders(collision);
        collision.refresh_broad_phase();

        for _ in 0..self.config.solver_iterations.max(1) {
            self.resolve_contacts(collision);
        }
    }

    fn integrate(&mut self, dt: f32) {
        let config = &self.config;
        let linear_decay = config.linear_damping.powf(dt);
        let angular_decay = config.angular_damping.powf(dt);

        for body in self.bodies.values_mut() {
            if body.is_static {
                continue;
            }

            let acceleration = body.acceleration + config.gravity * body.gravity_scale;
            body.velocity += acceleration * dt;
            body.velocity *= linear_decay;
            body.angular_velocity *= angular_decay;

            body.velocity = clamp_length(body.velocity, config.max_speed);
            if config.max_angular_speed > 0.0 {
                body.angular_velocity = body
                    .angular_velocity
                    .clamp(-config.max_angular_speed, config.max_angular_speed);
            }

            body.position += body.velocity * dt;
            body.rotation += body.angular_velocity * dt;
            body.acceleration = Vec2::zeros();
        }
    }

    /// Push every body's transform and filter to its collider
    fn sync_colliders(&self, collision: &mut CollisionSystem) {
        for body in self.bodies.values() {
            let Some(collider) = body.collider else {
                continue;
            };
            collision.set_transform(collider, body.position, body.rotation);
            collision.set_filter(collider, body.layer, body.mask, body.is_trigger);
        }
    }

    /// One resolution sweep; every unordered pair is resolved at most once
    fn resolve_contacts(&mut self, collision: &mut CollisionSystem) {
        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        let mut resolved = HashSet::new();

        for key_a in keys {
            let Some(body_a) = self.bodies.get(key_a) else {
                continue;
            };
            if body_a.is_static {
                continue;
            }
            let Some(collider_a) = body_a.collider else {
                continue;
            };
            let Some(candidates) = collision
                .collider(collider_a)
                .filter(|c| !c.is_trigger)
                .map(|c| collision.potential_collisions(&c.shape, c.layer, c.mask))
            else {
                continue;
            };

            for other in candidates {
                let Some(target) = collision.collider_by_entity(other) else {
                    continue;
                };
                if target.is_trigger {
                    continue;
                }
                let Some(key_b) = target.body else {
                    continue;
                };
                if key_b == key_a {
                    continue;
                }
                let Some(collider_b) = self.bodies.get(key_b).and_then(PhysicsBody::collider)
                else {
                    continue;
                };

                let pair = if key_a < key_b {
                    (key_a, key_b)
                } else {
                    (key_b, key_a)
                };
                if !resolved.insert(pair) {
                    continue;
                }

                let contact =
                    match (collision.collider(collider_a), collision.collider(collider_b)) {
                        (Some(a), Some(b)) => narrow_phase::test(&a.shape, &b.shape),
                        _ => None,
                    };
                if let Some(contact) = contact {
                    self.resolve_pair(
                        collision,
                        (key_a, collider_a),
                        (key_b, collider_b),
                        &contact,
                    );
                }
            }
        }
    }

    fn resolve_pair(
        &mut self,
        collision: &mut CollisionSystem,
        (key_a, collider_a): (BodyKey, ColliderKey),
        (key_b, collider_b): (BodyKey, ColliderKey),
        contact: &ContactResult,
    ) {
        let (Some(a), Some(b)) = (self.bodies.get(key_a), self.bodies.get(key_b)) else {
            return;
        };
        let (mut a, mut b) = (BodyState::of(a), BodyState::of(b));
        if !Self::solve(&self.config, &mut a, &mut b, contact) {
            return;
        }

        for (key, collider, state) in [(key_a, collider_a, a), (key_b, collider_b, b)] {
            if let Some(body) = self.bodies.get_mut(key) {
                if body.is_static {
                    continue;
                }
                body.position = state.position;
                body.velocity = state.velocity;
                collision.set_transform(collider, body.position, body.rotation);
            }
        }
    }

    /// Positional correction plus normal and friction impulses for one contact
    ///
    /// Returns `false` when nothing can move (both bodies static, or a contact
    /// without a normal).
    fn solve(
        config: &MovementConfig,
        a: &mut BodyState,
        b: &mut BodyState,
        contact: &ContactResult,
    ) -> bool {
        let inverse_mass_sum = a.inverse_mass + b.inverse_mass;
        if inverse_mass_sum <= 0.0 || contact.normal.magnitude_squared() < EPSILON {
            return false;
        }
        let normal = contact.normal;

        let depth =
            (contact.penetration - config.penetration_slop).max(0.0) * config.correction_percent;
        let correction = normal * (depth / inverse_mass_sum);
        a.position -= correction * a.inverse_mass;
        b.position += correction * b.inverse_mass;

        let relative = b.velocity - a.velocity;
        let velocity_along_normal = relative.dot(&normal);
        if velocity_along_normal > 0.0 {
            return true;
        }

        let restitution = a.restitution.min(b.restitution);
        let j = -(1.0 + restitution) * velocity_along_normal / inverse_mass_sum;
        let impulse = normal * j;
        a.velocity -= impulse * a.inverse_mass;
        b.velocity += impulse * b.inverse_mass;

        // Friction uses the velocity left after the normal impulse
        let relative = b.velocity - a.velocity;
        let tangential = relative - normal * relative.dot(&normal);
        if tangential.magnitude_squared() < EPSILON * EPSILON {
            return true;
        }
        let tangent = normalize_or(tangential, Vec2::zeros());
        let friction = (a.friction * b.friction).max(0.0).sqrt();
        let jt = (-relative.dot(&tangent) / inverse_mass_sum).clamp(-friction * j, friction * j);
        let friction_impulse = tangent * jt;
        a.velocity -= friction_impulse * a.inverse_mass;
        b.velocity += friction_impulse * b.inverse_mass;
        true
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new(MovementConfig::default())
    }
}
