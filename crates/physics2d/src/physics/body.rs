//! Rigid body state integrated by the movement system

use crate::ecs::Entity;
use crate::foundation::collections::ColliderKey;
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::CollisionLayers;

/// A 2D rigid body
///
/// Static bodies never integrate or receive impulses but still block dynamic
/// ones. Trigger bodies move but are skipped by contact resolution.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    /// Owning entity
    pub entity: Entity,
    /// World position
    pub position: Vec2,
    /// Linear velocity
    pub velocity: Vec2,
    /// Acceleration accumulated since the last step
    pub acceleration: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Angular velocity in radians per second
    pub angular_velocity: f32,
    /// Mass; non-positive values behave like an infinitely heavy body
    pub mass: f32,
    /// Friction coefficient
    pub friction: f32,
    /// Restitution (bounciness) coefficient
    pub restitution: f32,
    /// Multiplier applied to world gravity
    pub gravity_scale: f32,
    /// Immovable body
    pub is_static: bool,
    /// Overlap-only body
    pub is_trigger: bool,
    /// Layers this body belongs to
    pub layer: CollisionLayers,
    /// Layers this body collides with
    pub mask: CollisionLayers,
    pub(crate) collider: Option<ColliderKey>,
}

impl PhysicsBody {
    /// Dynamic body of unit mass at rest
    pub fn new(entity: Entity, position: Vec2) -> Self {
        Self {
            entity,
            position,
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            rotation: 0.0,
            angular_velocity: 0.0,
            mass: 1.0,
            friction: 0.3,
            restitution: 0.0,
            gravity_scale: 1.0,
            is_static: false,
            is_trigger: false,
            layer: CollisionLayers::ALL,
            mask: CollisionLayers::ALL,
            collider: None,
        }
    }

    /// Set the mass
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the initial rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the material coefficients
    pub fn with_material(mut self, friction: f32, restitution: f32) -> Self {
        self.friction = friction;
        self.restitution = restitution;
        self
    }

    /// Set the gravity multiplier
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }

    /// Set layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Make the body immovable
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self.velocity = Vec2::zeros();
        self.angular_velocity = 0.0;
        self
    }

    /// Make the body a trigger volume
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Collider registered for this body
    pub const fn collider(&self) -> Option<ColliderKey> {
        self.collider
    }

    /// Reciprocal mass; zero for static bodies
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Accumulate a force for the next step
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force * self.inverse_mass();
    }

    /// Change velocity immediately
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse * self.inverse_mass();
    }
}
