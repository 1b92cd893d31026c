//! # physics2d
//!
//! A 2D collision detection and impulse-based physics core for games.
//!
//! ## Features
//!
//! - **Shapes**: Circles, rectangles, convex polygons and points with their own transforms
//! - **Broad Phase**: Uniform grid behind a swappable `SpatialQuery` trait
//! - **Narrow Phase**: Circle, AABB and SAT tests producing contact normals and depths
//! - **Resolution**: Positional correction, restitution and friction impulses
//! - **Triggers**: Enter/stay/exit volumes with one-shot, cooldown and allow-lists
//! - **Events**: Collision and trigger events broadcast through a typed event system
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use physics2d::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PhysicsConfig::load_from_file("physics.toml").unwrap_or_default();
//!     let mut world = PhysicsWorld::new(config);
//!
//!     let ball = PhysicsBody::new(Entity::new(1), Vec2::new(100.0, 200.0));
//!     world.add_body(ball, Shape::circle(Vec2::zeros(), 5.0));
//!
//!     for _ in 0..60 {
//!         world.step(1.0 / 60.0);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for physics users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{Entity, System},
        events::{Event, EventArg, EventSystem, EventType},
        foundation::{
            collections::{BodyKey, CallbackHandle, ColliderKey},
            math::Vec2,
            time::{FixedTimestep, Stopwatch},
        },
        physics::{
            Aabb, CollisionEvent, CollisionEventKind, CollisionLayers, CollisionPair,
            CollisionSystem, PhysicsBody, PhysicsConfig, PhysicsWorld, Ray, RayHit, Shape,
            TriggerConfig, TriggerEvent, TriggerEventKind,
        },
        spatial::{SpatialQuery, UniformGrid},
    };
}
