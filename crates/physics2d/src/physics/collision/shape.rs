//! Collision shapes
//!
//! A [`Shape`] is a value type: local geometry ([`ShapeKind`]) plus a world
//! transform (position and rotation). Geometry stays in local space; world
//! vertices, normals and bounds are derived from the current transform on every
//! query, so moving a shape can never leave stale derived data behind.

use std::f32::consts::FRAC_PI_2;

use super::polygon::ConvexPolygon;
use super::primitives::{Aabb, BoundingCircle};
use crate::foundation::math::{closest_point_on_segment, rotate, Vec2, EPSILON};

/// Shape tag used for narrow-phase dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    /// Circle
    Circle,
    /// Rectangle (may be rotated)
    Rectangle,
    /// Convex polygon
    Polygon,
    /// Single point
    Point,
}

/// Local geometry of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Circle centred on the shape position
    Circle {
        /// Radius
        radius: f32,
    },
    /// Rectangle centred on the shape position
    Rectangle {
        /// Extent along the local x axis
        width: f32,
        /// Extent along the local y axis
        height: f32,
    },
    /// Convex polygon with vertices relative to the shape position
    Polygon(ConvexPolygon),
    /// Zero-area point at the shape position
    Point,
}

/// A collision shape with its world transform
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// World position of the local origin
    pub position: Vec2,
    /// Counter-clockwise rotation in radians
    pub rotation: f32,
    /// Local geometry
    pub kind: ShapeKind,
}

impl Shape {
    /// Circle of `radius` centred at `position`
    pub fn circle(position: Vec2, radius: f32) -> Self {
        Self::from_kind(position, ShapeKind::Circle { radius: radius.max(0.0) })
    }

    /// Axis-aligned rectangle centred at `position`
    pub fn rectangle(position: Vec2, width: f32, height: f32) -> Self {
        Self::from_kind(
            position,
            ShapeKind::Rectangle {
                width: width.max(0.0),
                height: height.max(0.0),
            },
        )
    }

    /// Convex polygon with local-space `vertices`
    pub fn polygon(position: Vec2, vertices: Vec<Vec2>) -> Self {
        Self::from_kind(position, ShapeKind::Polygon(ConvexPolygon::new(vertices)))
    }

    /// Point shape
    pub fn point(position: Vec2) -> Self {
        Self::from_kind(position, ShapeKind::Point)
    }

    /// Shape with the given geometry and no rotation
    pub const fn from_kind(position: Vec2, kind: ShapeKind) -> Self {
        Self {
            position,
            rotation: 0.0,
            kind,
        }
    }

    /// Builder-style rotation
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Tag of this shape's geometry
    pub const fn shape_type(&self) -> ShapeType {
        match self.kind {
            ShapeKind::Circle { .. } => ShapeType::Circle,
            ShapeKind::Rectangle { .. } => ShapeType::Rectangle,
            ShapeKind::Polygon(_) => ShapeType::Polygon,
            ShapeKind::Point => ShapeType::Point,
        }
    }

    /// Move and rotate the shape
    pub fn set_transform(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Whether the rotation is a multiple of a quarter turn, so the shape's
    /// edges line up with the world axes
    pub fn is_axis_aligned(&self) -> bool {
        let remainder = self.rotation.rem_euclid(FRAC_PI_2);
        remainder < EPSILON || FRAC_PI_2 - remainder < EPSILON
    }

    /// Geometric centre in world space
    ///
    /// Equal to the position for every kind except polygons whose vertices are
    /// not centred on their local origin.
    pub fn center(&self) -> Vec2 {
        match &self.kind {
            ShapeKind::Polygon(polygon) if !polygon.vertices().is_empty() => {
                let vertices = self.world_vertices();
                vertices.iter().sum::<Vec2>() / vertices.len() as f32
            }
            _ => self.position,
        }
    }

    /// Radius of the smallest circle around the local origin enclosing the shape
    pub fn bounding_radius(&self) -> f32 {
        match &self.kind {
            ShapeKind::Circle { radius } => *radius,
            ShapeKind::Rectangle { width, height } => 0.5 * width.hypot(*height),
            ShapeKind::Polygon(polygon) => polygon.bounding_radius(),
            ShapeKind::Point => 0.0,
        }
    }

    /// World-space bounding circle used for fast rejection
    pub fn bounding_circle(&self) -> BoundingCircle {
        BoundingCircle::new(self.position, self.bounding_radius())
    }

    /// World-space axis-aligned bounds, accounting for rotation
    pub fn aabb(&self) -> Aabb {
        match &self.kind {
            ShapeKind::Circle { radius } => {
                Aabb::from_center_half_extents(self.position, Vec2::new(*radius, *radius))
            }
            ShapeKind::Rectangle { .. } | ShapeKind::Polygon(_) => {
                let vertices = self.world_vertices();
                if vertices.is_empty() {
                    Aabb::new(self.position, self.position)
                } else {
                    Aabb::from_points(&vertices)
                }
            }
            ShapeKind::Point => Aabb::new(self.position, self.position),
        }
    }

    /// World-space vertices, recomputed from the current transform
    ///
    /// Rectangles yield their four corners counter-clockwise; circles yield
    /// nothing; a point yields its position.
    pub fn world_vertices(&self) -> Vec<Vec2> {
        match &self.kind {
            ShapeKind::Rectangle { width, height } => {
                let (hw, hh) = (width * 0.5, height * 0.5);
                [
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ]
                .iter()
                .map(|corner| self.to_world(*corner))
                .collect()
            }
            ShapeKind::Polygon(polygon) => polygon
                .vertices()
                .iter()
                .map(|vertex| self.to_world(*vertex))
                .collect(),
            ShapeKind::Circle { .. } => Vec::new(),
            ShapeKind::Point => vec![self.position],
        }
    }

    /// World-space outward edge normals matching [`Shape::world_vertices`]
    pub fn world_normals(&self) -> Vec<Vec2> {
        match &self.kind {
            ShapeKind::Rectangle { .. } => [
                Vec2::new(0.0, -1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(-1.0, 0.0),
            ]
            .iter()
            .map(|normal| rotate(*normal, self.rotation))
            .collect(),
            ShapeKind::Polygon(polygon) => polygon
                .normals()
                .iter()
                .map(|normal| rotate(*normal, self.rotation))
                .collect(),
            ShapeKind::Circle { .. } | ShapeKind::Point => Vec::new(),
        }
    }

    /// Whether `point` lies inside or on the boundary of the shape
    pub fn contains_point(&self, point: Vec2) -> bool {
        match &self.kind {
            ShapeKind::Circle { radius } => {
                (point - self.position).magnitude_squared() <= radius * radius
            }
            ShapeKind::Rectangle { width, height } => {
                let local = self.to_local(point);
                local.x.abs() <= width * 0.5 + EPSILON && local.y.abs() <= height * 0.5 + EPSILON
            }
            ShapeKind::Polygon(polygon) => {
                if polygon.vertices().is_empty() {
                    return false;
                }
                let local = self.to_local(point);
                polygon
                    .vertices()
                    .iter()
                    .zip(polygon.normals())
                    .all(|(vertex, normal)| (local - vertex).dot(normal) <= EPSILON)
            }
            ShapeKind::Point => (point - self.position).magnitude_squared() < EPSILON * EPSILON,
        }
    }

    /// Closest point of the (solid) shape to `point`
    ///
    /// Points already inside the shape are returned unchanged.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        match &self.kind {
            ShapeKind::Circle { radius } => {
                let offset = point - self.position;
                let distance = offset.magnitude();
                if distance <= *radius {
                    point
                } else {
                    self.position + offset * (radius / distance)
                }
            }
            ShapeKind::Rectangle { width, height } => {
                let local = self.to_local(point);
                let clamped = Vec2::new(
                    local.x.clamp(-width * 0.5, width * 0.5),
                    local.y.clamp(-height * 0.5, height * 0.5),
                );
                self.to_world(clamped)
            }
            ShapeKind::Polygon(_) => {
                if self.contains_point(point) {
                    return point;
                }
                let vertices = self.world_vertices();
                let n = vertices.len();
                (0..n)
                    .map(|i| closest_point_on_segment(point, vertices[i], vertices[(i + 1) % n]))
                    .min_by(|a, b| {
                        (a - point)
                            .magnitude_squared()
                            .total_cmp(&(b - point).magnitude_squared())
                    })
                    .unwrap_or(self.position)
            }
            ShapeKind::Point => self.position,
        }
    }

    /// Convert a local-space point to world space
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.rotation)
    }

    /// Convert a world-space point to local space
    #[inline]
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        rotate(world - self.position, -self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_bounding_radius_per_kind() {
        assert_relative_eq!(Shape::circle(Vec2::zeros(), 3.0).bounding_radius(), 3.0);
        assert_relative_eq!(
            Shape::rectangle(Vec2::zeros(), 6.0, 8.0).bounding_radius(),
            5.0
        );
        assert_eq!(Shape::point(Vec2::new(1.0, 1.0)).bounding_radius(), 0.0);
    }

    #[test]
    fn test_rotated_rectangle_aabb() {
        let rect = Shape::rectangle(Vec2::new(10.0, 10.0), 2.0, 2.0).with_rotation(FRAC_PI_4);
        let aabb = rect.aabb();
        let half_diagonal = 2.0_f32.sqrt();
        assert_relative_eq!(aabb.min.x, 10.0 - half_diagonal, epsilon = 1e-5);
        assert_relative_eq!(aabb.max.y, 10.0 + half_diagonal, epsilon = 1e-5);
    }

    #[test]
    fn test_empty_polygon_aabb_sits_at_position() {
        let empty = Shape::polygon(Vec2::new(30.0, -4.0), Vec::new());
        let aabb = empty.aabb();
        assert_eq!(aabb.min, Vec2::new(30.0, -4.0));
        assert_eq!(aabb.max, Vec2::new(30.0, -4.0));
    }

    #[test]
    fn test_world_vertices_follow_transform() {
        let mut rect = Shape::rectangle(Vec2::zeros(), 2.0, 2.0);
        rect.set_transform(Vec2::new(5.0, 0.0), 0.0);
        let vertices = rect.world_vertices();
        assert_eq!(vertices[0], Vec2::new(4.0, -1.0));
        assert_eq!(vertices[2], Vec2::new(6.0, 1.0));
    }

    #[test]
    fn test_contains_point_rotated_rectangle() {
        let rect = Shape::rectangle(Vec2::zeros(), 4.0, 1.0).with_rotation(FRAC_PI_2);
        assert!(rect.contains_point(Vec2::new(0.0, 1.9)));
        assert!(!rect.contains_point(Vec2::new(1.9, 0.0)));
    }

    #[test]
    fn test_contains_point_polygon() {
        let triangle = Shape::polygon(
            Vec2::new(1.0, 1.0),
            vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)],
        );
        assert!(triangle.contains_point(Vec2::new(1.5, 1.5)));
        assert!(!triangle.contains_point(Vec2::new(2.6, 2.6)));
    }

    #[test]
    fn test_point_only_contains_itself() {
        let point = Shape::point(Vec2::new(2.0, 3.0));
        assert!(point.contains_point(Vec2::new(2.0, 3.0)));
        assert!(!point.contains_point(Vec2::new(2.0, 3.1)));
    }

    #[test]
    fn test_closest_point() {
        let circle = Shape::circle(Vec2::zeros(), 2.0);
        let closest = circle.closest_point(Vec2::new(10.0, 0.0));
        assert_relative_eq!(closest.x, 2.0);

        let rect = Shape::rectangle(Vec2::zeros(), 2.0, 2.0);
        assert_eq!(rect.closest_point(Vec2::new(5.0, 0.5)), Vec2::new(1.0, 0.5));
        assert_eq!(rect.closest_point(Vec2::new(0.2, 0.2)), Vec2::new(0.2, 0.2));

        let square = Shape::polygon(
            Vec2::zeros(),
            vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(-1.0, 1.0),
            ],
        );
        assert_eq!(square.closest_point(Vec2::new(0.0, 4.0)), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Shape::circle(Vec2::zeros(), 1.0);
        let mut copy = original.clone();
        copy.set_transform(Vec2::new(3.0, 3.0), 1.0);
        assert_eq!(original.position, Vec2::zeros());
        assert_ne!(original, copy);
    }

    #[test]
    fn test_axis_alignment() {
        assert!(Shape::rectangle(Vec2::zeros(), 1.0, 1.0).is_axis_aligned());
        assert!(Shape::rectangle(Vec2::zeros(), 1.0, 1.0)
            .with_rotation(FRAC_PI_2)
            .is_axis_aligned());
        assert!(!Shape::rectangle(Vec2::zeros(), 1.0, 1.0)
            .with_rotation(FRAC_PI_4)
            .is_axis_aligned());
    }
}
