//! Entity/system interfaces consumed from the host engine
//!
//! Only the identifier type and the lifecycle trait are defined here; entity
//! storage and scheduling belong to the host.

mod entity;
mod system;

pub use entity::Entity;
pub use system::System;
