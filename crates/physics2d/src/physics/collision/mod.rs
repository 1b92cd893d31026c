//! Collision geometry and narrow-phase testing
//!
//! Shapes keep their geometry in local space and carry their own transform;
//! world-space data (vertices, normals, bounds) is produced on demand during
//! tests, never cached.
//!
//! # Module Organization
//!
//! - [`primitives`] - Bounding boxes, bounding circles and rays
//! - [`polygon`] - Convex polygon geometry with outward edge normals
//! - [`shape`] - The [`Shape`] value type (circle, rectangle, polygon, point)
//! - [`narrow_phase`] - Pairwise intersection tests and ray casts

pub mod narrow_phase;
pub mod polygon;
pub mod primitives;
pub mod shape;

pub use narrow_phase::ContactResult;
pub use polygon::ConvexPolygon;
pub use primitives::{Aabb, BoundingCircle, Ray, RayHit};
pub use shape::{Shape, ShapeKind, ShapeType};
