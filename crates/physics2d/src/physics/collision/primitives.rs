//! Primitive geometric types shared by the broad and narrow phase
//!
//! Axis-aligned boxes for the grid, bounding circles for fast rejection, and
//! rays for ray casting.

use crate::ecs::Entity;
use crate::foundation::math::{normalize_or, Vec2};

/// World-space axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from its corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a box from a centre point and half extents
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box containing every point (a single point at the origin when
    /// `points` is empty)
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vec2::zeros(), Vec2::zeros());
        };
        points.iter().skip(1).fold(Self::new(*first, *first), |aabb, p| Self {
            min: aabb.min.inf(p),
            max: aabb.max.sup(p),
        })
    }

    /// Box centre
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Half extents along each axis
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive overlap test
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// Circle used for quick rejection before exact tests
#[derive(Debug, Clone, Copy)]
pub struct BoundingCircle {
    /// Centre in world space
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl BoundingCircle {
    /// Creates a new bounding circle
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this circle overlaps another (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }
}

/// A ray for ray casting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec2,
    /// Unit direction of the ray
    pub direction: Vec2,
}

impl Ray {
    /// Creates a new ray; a zero direction falls back to +X
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: normalize_or(direction, Vec2::x()),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Bounding box of the segment from the origin to `max_distance`
    pub fn segment_aabb(&self, max_distance: f32) -> Aabb {
        let end = self.point_at(max_distance);
        Aabb::new(self.origin.inf(&end), self.origin.sup(&end))
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The entity that was hit
    pub entity: Entity,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec2,
    /// The surface normal at the intersection point
    pub normal: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0));
        let c = Aabb::new(Vec2::new(2.5, 2.5), Vec2::new(3.0, 3.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(&[
            Vec2::new(1.0, -2.0),
            Vec2::new(-3.0, 4.0),
            Vec2::new(0.0, 0.0),
        ]);
        assert_eq!(aabb.min, Vec2::new(-3.0, -2.0));
        assert_eq!(aabb.max, Vec2::new(1.0, 4.0));
    }

    #[test]
    fn test_ray_zero_direction_falls_back() {
        let ray = Ray::new(Vec2::zeros(), Vec2::zeros());
        assert_eq!(ray.direction, Vec2::x());
    }

    #[test]
    fn test_ray_segment_aabb() {
        let ray = Ray::new(Vec2::new(5.0, 5.0), Vec2::new(-1.0, 0.0));
        let aabb = ray.segment_aabb(3.0);
        assert_eq!(aabb.min, Vec2::new(2.0, 5.0));
        assert_eq!(aabb.max, Vec2::new(5.0, 5.0));
    }
}
