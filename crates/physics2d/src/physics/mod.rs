//! Physics module for collision detection and response
//!
//! Provides collision detection using a uniform-grid broad phase and
//! shape-pair narrow phase, impulse-based contact resolution for bodies, and
//! trigger volumes driven by collision events.

pub mod body;
pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod config;
pub mod movement_system;
pub mod trigger_system;
pub mod world;

#[cfg(test)]
mod tests;

pub use body::PhysicsBody;
pub use collision::{
    Aabb, BoundingCircle, ContactResult, ConvexPolygon, Ray, RayHit, Shape, ShapeKind, ShapeType,
};
pub use collision_layers::CollisionLayers;
pub use collision_system::{
    Collidable, Collider, CollisionEvent, CollisionEventKind, CollisionPair, CollisionSystem,
};
pub use config::{CollisionConfig, MovementConfig, PhysicsConfig};
pub use movement_system::MovementSystem;
pub use trigger_system::{TriggerConfig, TriggerEvent, TriggerEventKind, TriggerSystem};
pub use world::PhysicsWorld;
