//! Narrow-phase intersection tests
//!
//! [`test`] is the single entry point. It rejects pairs whose bounding circles
//! do not meet, then dispatches on the pair of shape kinds. Every kind pair has
//! one canonical routine; the mirrored pair runs the same routine with the
//! arguments swapped and flips the resulting normal, so the normal always
//! points from the first shape toward the second.
//!
//! Touching shapes (zero overlap) do not count as colliding.
//!
//! When two shapes of the same kind share a centre there is no direction to
//! push along. The smaller shape then gets the canonical axis and the larger
//! one its negation, which keeps the normals of both orderings opposite.
//! Identical coincident shapes are the exception: both orderings get the same
//! canonical axis.

use super::primitives::Ray;
use super::shape::{Shape, ShapeKind};
use crate::foundation::math::{
    closest_point_on_segment, cross, normalize_or, rotate, Vec2, EPSILON,
};

/// Contact information for a colliding pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResult {
    /// Unit normal pointing from shape A toward shape B (zero for point contacts)
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
    /// Approximate world-space contact point
    pub point: Vec2,
}

impl ContactResult {
    /// The same contact seen from the other shape
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Test two shapes for intersection
pub fn test(a: &Shape, b: &Shape) -> Option<ContactResult> {
    if !a.bounding_circle().intersects(&b.bounding_circle()) {
        return None;
    }

    match (&a.kind, &b.kind) {
        (ShapeKind::Point, _) => point_contact(a.position, b),
        (_, ShapeKind::Point) => point_contact(b.position, a).map(ContactResult::flipped),

        (ShapeKind::Circle { radius: ra }, ShapeKind::Circle { radius: rb }) => {
            circle_circle(a.position, *ra, b.position, *rb)
        }
        (ShapeKind::Circle { radius }, ShapeKind::Rectangle { width, height }) => {
            circle_rectangle(a.position, *radius, b, Vec2::new(width * 0.5, height * 0.5))
        }
        (ShapeKind::Rectangle { width, height }, ShapeKind::Circle { radius }) => {
            circle_rectangle(b.position, *radius, a, Vec2::new(width * 0.5, height * 0.5))
                .map(ContactResult::flipped)
        }
        (ShapeKind::Circle { radius }, ShapeKind::Polygon(_)) => {
            circle_polygon(a.position, *radius, b)
        }
        (ShapeKind::Polygon(_), ShapeKind::Circle { radius }) => {
            circle_polygon(b.position, *radius, a).map(ContactResult::flipped)
        }

        (ShapeKind::Rectangle { .. }, ShapeKind::Rectangle { .. }) => rectangle_rectangle(a, b),
        (ShapeKind::Polygon(_), ShapeKind::Rectangle { .. }) => {
            polygon_polygon(b, a).map(ContactResult::flipped)
        }
        (ShapeKind::Rectangle { .. } | ShapeKind::Polygon(_), ShapeKind::Polygon(_)) => {
            polygon_polygon(a, b)
        }
    }
}

/// Circle against circle
pub fn circle_circle(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
) -> Option<ContactResult> {
    let delta = center_b - center_a;
    let radius_sum = radius_a + radius_b;
    let distance_squared = delta.magnitude_squared();
    if distance_squared >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_squared.sqrt();
    let normal = normalize_or(delta, Vec2::x() * coincident_sign(radius_a, radius_b));
    Some(ContactResult {
        normal,
        penetration: radius_sum - distance,
        point: center_a + normal * radius_a,
    })
}

/// Circle against a (possibly rotated) rectangle with the given half extents
fn circle_rectangle(
    center: Vec2,
    radius: f32,
    rect: &Shape,
    half_extents: Vec2,
) -> Option<ContactResult> {
    let local = rect.to_local(center);
    let inside = local.x.abs() <= half_extents.x && local.y.abs() <= half_extents.y;

    if inside {
        // Push out through the nearest edge
        let to_x_edge = half_extents.x - local.x.abs();
        let to_y_edge = half_extents.y - local.y.abs();
        let (outward, edge_distance, surface) = if to_x_edge < to_y_edge {
            let sign = if local.x >= 0.0 { 1.0 } else { -1.0 };
            (
                Vec2::new(sign, 0.0),
                to_x_edge,
                Vec2::new(sign * half_extents.x, local.y),
            )
        } else {
            let sign = if local.y >= 0.0 { 1.0 } else { -1.0 };
            (
                Vec2::new(0.0, sign),
                to_y_edge,
                Vec2::new(local.x, sign * half_extents.y),
            )
        };
        return Some(ContactResult {
            normal: -rotate(outward, rect.rotation),
            penetration: radius + edge_distance,
            point: rect.to_world(surface),
        });
    }

    let clamped = Vec2::new(
        local.x.clamp(-half_extents.x, half_extents.x),
        local.y.clamp(-half_extents.y, half_extents.y),
    );
    let closest = rect.to_world(clamped);
    let delta = closest - center;
    let distance_squared = delta.magnitude_squared();
    if distance_squared >= radius * radius {
        return None;
    }

    Some(ContactResult {
        normal: normalize_or(delta, Vec2::x()),
        penetration: radius - distance_squared.sqrt(),
        point: closest,
    })
}

/// Circle against a convex polygon
fn circle_polygon(center: Vec2, radius: f32, polygon: &Shape) -> Option<ContactResult> {
    let vertices = polygon.world_vertices();
    let normals = polygon.world_normals();
    let n = vertices.len();
    if n == 0 {
        return None;
    }

    let (edge, closest) = (0..n)
        .map(|i| (i, closest_point_on_segment(center, vertices[i], vertices[(i + 1) % n])))
        .min_by(|(_, p), (_, q)| {
            (p - center)
                .magnitude_squared()
                .total_cmp(&(q - center).magnitude_squared())
        })?;

    let delta = closest - center;
    let distance = delta.magnitude();

    if polygon.contains_point(center) {
        return Some(ContactResult {
            normal: -normals[edge],
            penetration: radius + distance,
            point: closest,
        });
    }

    if distance >= radius {
        return None;
    }

    Some(ContactResult {
        normal: normalize_or(delta, -normals[edge]),
        penetration: radius - distance,
        point: closest,
    })
}

/// Two rectangles: interval overlap when both line up with the world axes,
/// separating axes otherwise
fn rectangle_rectangle(a: &Shape, b: &Shape) -> Option<ContactResult> {
    if !(a.is_axis_aligned() && b.is_axis_aligned()) {
        return polygon_polygon(a, b);
    }

    let (box_a, box_b) = (a.aabb(), b.aabb());
    let delta = box_b.center() - box_a.center();
    let extents = box_a.half_extents() + box_b.half_extents();

    let overlap_x = extents.x - delta.x.abs();
    if overlap_x <= 0.0 {
        return None;
    }
    let overlap_y = extents.y - delta.y.abs();
    if overlap_y <= 0.0 {
        return None;
    }

    let (half_a, half_b) = (box_a.half_extents(), box_b.half_extents());
    let (normal, penetration) = if overlap_x < overlap_y {
        let sign = axis_sign(delta.x, (half_a.x, half_a.y), (half_b.x, half_b.y));
        (Vec2::new(sign, 0.0), overlap_x)
    } else {
        let sign = axis_sign(delta.y, (half_a.y, half_a.x), (half_b.y, half_b.x));
        (Vec2::new(0.0, sign), overlap_y)
    };

    let overlap_min = box_a.min.sup(&box_b.min);
    let overlap_max = box_a.max.inf(&box_b.max);
    Some(ContactResult {
        normal,
        penetration,
        point: (overlap_min + overlap_max) * 0.5,
    })
}

/// Separating axis test between two vertex-bearing shapes (rectangles or
/// polygons), using the edge normals of both as candidate axes
fn polygon_polygon(a: &Shape, b: &Shape) -> Option<ContactResult> {
    let (vertices_a, vertices_b) = (a.world_vertices(), b.world_vertices());
    if vertices_a.is_empty() || vertices_b.is_empty() {
        return None;
    }

    let mut penetration = f32::MAX;
    let mut axis = Vec2::x();
    for candidate in a.world_normals().iter().chain(b.world_normals().iter()) {
        let (min_a, max_a) = project(&vertices_a, candidate);
        let (min_b, max_b) = project(&vertices_b, candidate);
        if max_a <= min_b || max_b <= min_a {
            return None;
        }
        let overlap = (max_a - min_b).min(max_b - min_a);
        if overlap < penetration {
            penetration = overlap;
            axis = *candidate;
        }
    }

    let direction = centroid(&vertices_b) - centroid(&vertices_a);
    let normal = if direction.magnitude_squared() < EPSILON * EPSILON {
        let canonical = if axis.x < 0.0 || (axis.x == 0.0 && axis.y < 0.0) {
            -axis
        } else {
            axis
        };
        let size_a = (a.bounding_radius(), vertices_a.len());
        let size_b = (b.bounding_radius(), vertices_b.len());
        canonical * coincident_sign(size_a, size_b)
    } else if direction.dot(&axis) < 0.0 {
        -axis
    } else {
        axis
    };

    let deepest = vertices_a
        .iter()
        .copied()
        .max_by(|p, q| p.dot(&normal).total_cmp(&q.dot(&normal)))?;

    Some(ContactResult {
        normal,
        penetration,
        point: deepest - normal * penetration,
    })
}

/// Point shape against any shape; containment only
fn point_contact(point: Vec2, other: &Shape) -> Option<ContactResult> {
    other.contains_point(point).then(|| ContactResult {
        normal: Vec2::zeros(),
        penetration: 0.0,
        point,
    })
}

/// `1.0` when `a` is no larger than `b`, `-1.0` otherwise
fn coincident_sign<T: PartialOrd>(a: T, b: T) -> f32 {
    if a <= b {
        1.0
    } else {
        -1.0
    }
}

/// Direction along one axis from the centre offset, falling back to the
/// relative size of the boxes when the centres line up
fn axis_sign(offset: f32, extents_a: (f32, f32), extents_b: (f32, f32)) -> f32 {
    if offset > 0.0 {
        1.0
    } else if offset < 0.0 {
        -1.0
    } else {
        coincident_sign(extents_a, extents_b)
    }
}

fn project(vertices: &[Vec2], axis: &Vec2) -> (f32, f32) {
    vertices.iter().fold((f32::MAX, f32::MIN), |(min, max), v| {
        let d = v.dot(axis);
        (min.min(d), max.max(d))
    })
}

fn centroid(vertices: &[Vec2]) -> Vec2 {
    vertices.iter().sum::<Vec2>() / vertices.len() as f32
}

/// Exact ray intersection against a single shape
///
/// Returns the distance along the ray and the surface normal at the hit.
/// A ray starting inside a solid shape hits at distance 0 with a normal facing
/// back along the ray.
pub fn ray_intersection(shape: &Shape, ray: &Ray, max_distance: f32) -> Option<(f32, Vec2)> {
    match &shape.kind {
        ShapeKind::Circle { radius } => ray_circle(shape.position, *radius, ray, max_distance),
        ShapeKind::Rectangle { .. } | ShapeKind::Polygon(_) => {
            if shape.contains_point(ray.origin) {
                return Some((0.0, -ray.direction));
            }
            let vertices = shape.world_vertices();
            let normals = shape.world_normals();
            let n = vertices.len();
            (0..n)
                .filter_map(|i| {
                    ray_segment(ray, vertices[i], vertices[(i + 1) % n])
                        .filter(|t| *t <= max_distance)
                        .map(|t| (t, normals[i]))
                })
                .min_by(|(s, _), (t, _)| s.total_cmp(t))
        }
        ShapeKind::Point => {
            let offset = shape.position - ray.origin;
            let t = offset.dot(&ray.direction);
            if t < 0.0 || t > max_distance || cross(ray.direction, offset).abs() > EPSILON {
                return None;
            }
            Some((t, -ray.direction))
        }
    }
}

fn ray_circle(center: Vec2, radius: f32, ray: &Ray, max_distance: f32) -> Option<(f32, Vec2)> {
    let m = ray.origin - center;
    let c = m.magnitude_squared() - radius * radius;
    if c <= 0.0 {
        return Some((0.0, -ray.direction));
    }
    let b = m.dot(&ray.direction);
    if b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    if t > max_distance {
        return None;
    }
    let normal = normalize_or(ray.point_at(t) - center, -ray.direction);
    Some((t, normal))
}

/// Distance along `ray` to the segment `a`-`b`, ignoring parallel segments
fn ray_segment(ray: &Ray, a: Vec2, b: Vec2) -> Option<f32> {
    let edge = b - a;
    let denominator = cross(ray.direction, edge);
    if denominator.abs() < EPSILON {
        return None;
    }
    let to_start = a - ray.origin;
    let t = cross(to_start, edge) / denominator;
    let u = cross(to_start, ray.direction) / denominator;
    (t >= 0.0 && (0.0..=1.0).contains(&u)).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(position: Vec2, size: f32) -> Shape {
        let h = size * 0.5;
        Shape::polygon(
            position,
            vec![
                Vec2::new(-h, -h),
                Vec2::new(h, -h),
                Vec2::new(h, h),
                Vec2::new(-h, h),
            ],
        )
    }

    #[test]
    fn test_circle_circle_penetration() {
        let a = Shape::circle(Vec2::zeros(), 5.0);
        let b = Shape::circle(Vec2::new(8.0, 0.0), 5.0);
        let contact = test(&a, &b).expect("circles 8 apart overlap");
        assert_relative_eq!(contact.penetration, 2.0, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(contact.point.x, 5.0, epsilon = 1e-5);

        let c = Shape::circle(Vec2::new(12.0, 0.0), 5.0);
        assert!(test(&a, &c).is_none());
    }

    #[test]
    fn test_touching_is_not_a_hit() {
        let a = Shape::circle(Vec2::zeros(), 1.0);
        let b = Shape::circle(Vec2::new(2.0, 0.0), 1.0);
        assert!(test(&a, &b).is_none());

        let c = Shape::rectangle(Vec2::zeros(), 2.0, 2.0);
        let d = Shape::rectangle(Vec2::new(2.0, 0.0), 2.0, 2.0);
        assert!(test(&c, &d).is_none());
    }

    #[test]
    fn test_coincident_circles_use_fallback_axis() {
        let a = Shape::circle(Vec2::new(3.0, 3.0), 1.0);
        let contact = test(&a, &a.clone()).expect("coincident circles overlap");
        assert_eq!(contact.normal, Vec2::x());
        assert_relative_eq!(contact.penetration, 2.0);
    }

    #[test]
    fn test_concentric_shapes_get_opposite_normals() {
        let center = Vec2::new(10.0, 20.0);
        let pairs = [
            (Shape::circle(center, 1.0), Shape::circle(center, 2.0)),
            (
                Shape::rectangle(center, 4.0, 10.0),
                Shape::rectangle(center, 2.0, 10.0),
            ),
            (
                Shape::rectangle(center, 10.0, 4.0),
                Shape::rectangle(center, 10.0, 6.0),
            ),
            (
                Shape::rectangle(center, 4.0, 10.0).with_rotation(0.3),
                Shape::rectangle(center, 2.0, 10.0).with_rotation(0.3),
            ),
        ];

        for (a, b) in &pairs {
            let forward = test(a, b).expect("concentric shapes overlap");
            let backward = test(b, a).expect("concentric shapes overlap");
            assert_relative_eq!(forward.normal.magnitude(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(forward.normal.x, -backward.normal.x, epsilon = 1e-5);
            assert_relative_eq!(forward.normal.y, -backward.normal.y, epsilon = 1e-5);
            assert_relative_eq!(forward.penetration, backward.penetration, epsilon = 1e-5);
        }

        // The smaller circle pushes toward +x
        let (small, large) = &pairs[0];
        assert_eq!(test(small, large).expect("overlap").normal, Vec2::x());
        assert_eq!(test(large, small).expect("overlap").normal, -Vec2::x());
    }

    #[test]
    fn test_axis_aligned_rectangles() {
        let a = Shape::rectangle(Vec2::zeros(), 10.0, 10.0);
        let b = Shape::rectangle(Vec2::new(6.0, 0.0), 10.0, 10.0);
        let contact = test(&a, &b).expect("rectangles overlap");
        assert_relative_eq!(contact.penetration, 4.0, epsilon = 1e-5);
        assert_eq!(contact.normal, Vec2::new(1.0, 0.0));

        let reversed = test(&b, &a).expect("rectangles overlap");
        assert_eq!(reversed.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_rotated_rectangles_use_separating_axes() {
        let a = Shape::rectangle(Vec2::zeros(), 2.0, 2.0);
        let b = Shape::rectangle(Vec2::new(2.2, 0.0), 2.0, 2.0)
            .with_rotation(std::f32::consts::FRAC_PI_4);
        // Diamond tip reaches 2.2 - sqrt(2) < 1
        let contact = test(&a, &b).expect("diamond corner pokes into the square");
        assert!(contact.normal.x > 0.9);
        assert_relative_eq!(
            contact.penetration,
            1.0 - (2.2 - 2.0_f32.sqrt()),
            epsilon = 1e-4
        );

        let far = Shape::rectangle(Vec2::new(2.5, 0.0), 2.0, 2.0)
            .with_rotation(std::f32::consts::FRAC_PI_4);
        assert!(test(&a, &far).is_none());
    }

    #[test]
    fn test_polygon_squares_offset() {
        let a = square(Vec2::zeros(), 1.0);
        let b = square(Vec2::new(0.5, 0.0), 1.0);
        let contact = test(&a, &b).expect("squares overlap");
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(contact.normal.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_separated_triangles() {
        let triangle = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        let a = Shape::polygon(Vec2::zeros(), triangle.clone());
        for offset in [
            Vec2::new(1.2, 0.0),
            Vec2::new(0.0, -1.2),
            Vec2::new(0.6, 0.6),
            Vec2::new(-1.1, 0.3),
        ] {
            let b = Shape::polygon(offset, triangle.clone());
            assert!(test(&a, &b).is_none(), "triangles at {offset:?} should be apart");
        }
    }

    #[test]
    fn test_circle_rectangle_outside_and_inside() {
        let rect = Shape::rectangle(Vec2::zeros(), 4.0, 2.0);

        let circle = Shape::circle(Vec2::new(0.0, 1.5), 1.0);
        let contact = test(&circle, &rect).expect("circle overlaps the top edge");
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-5);
        assert_relative_eq!(contact.normal.y, -1.0, epsilon = 1e-6);

        // Centre inside, closest to the right edge
        let inside = Shape::circle(Vec2::new(1.8, 0.0), 0.5);
        let contact = test(&inside, &rect).expect("circle inside rectangle");
        assert_relative_eq!(contact.normal.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(contact.penetration, 0.7, epsilon = 1e-5);
    }

    #[test]
    fn test_circle_against_rotated_rectangle() {
        let rect =
            Shape::rectangle(Vec2::zeros(), 4.0, 1.0).with_rotation(std::f32::consts::FRAC_PI_2);
        // Long axis is now vertical
        assert!(test(&Shape::circle(Vec2::new(0.0, 2.3), 0.5), &rect).is_some());
        assert!(test(&Shape::circle(Vec2::new(1.2, 0.0), 0.5), &rect).is_none());
    }

    #[test]
    fn test_circle_polygon() {
        let poly = square(Vec2::zeros(), 2.0);

        let outside = Shape::circle(Vec2::new(1.5, 0.0), 1.0);
        let contact = test(&outside, &poly).expect("circle overlaps right edge");
        assert_relative_eq!(contact.normal.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(contact.penetration, 0.5, epsilon = 1e-5);

        let inside = Shape::circle(Vec2::new(0.0, 0.8), 0.1);
        let contact = test(&inside, &poly).expect("circle inside polygon");
        assert_relative_eq!(contact.normal.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(contact.penetration, 0.3, epsilon = 1e-5);

        assert!(test(&Shape::circle(Vec2::new(3.0, 0.0), 1.0), &poly).is_none());
    }

    #[test]
    fn test_point_shapes_use_containment() {
        let point = Shape::point(Vec2::new(0.5, 0.5));
        let rect = Shape::rectangle(Vec2::zeros(), 2.0, 2.0);
        let contact = test(&point, &rect).expect("point inside rectangle");
        assert_eq!(contact.normal, Vec2::zeros());
        assert_eq!(contact.penetration, 0.0);
        assert!(test(&rect, &point).is_some());
        assert!(test(&Shape::point(Vec2::new(3.0, 0.0)), &rect).is_none());
    }

    #[test]
    fn test_fast_reject_skips_far_shapes() {
        let a = Shape::polygon(
            Vec2::zeros(),
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
        let b = Shape::circle(Vec2::new(100.0, 100.0), 1.0);
        assert!(test(&a, &b).is_none());
    }

    #[test]
    fn test_results_are_symmetric() {
        let shapes = [
            Shape::circle(Vec2::new(0.0, 0.0), 1.0),
            Shape::circle(Vec2::new(0.7, 1.1), 0.6),
            Shape::rectangle(Vec2::new(1.3, 0.2), 2.0, 1.0),
            Shape::rectangle(Vec2::new(0.4, -0.9), 1.5, 0.8).with_rotation(0.3),
            Shape::polygon(
                Vec2::new(-0.6, 0.4),
                vec![Vec2::new(-0.5, -0.4), Vec2::new(0.8, -0.2), Vec2::new(0.1, 0.9)],
            ),
            Shape::point(Vec2::new(0.2, 0.1)),
        ];

        for (i, a) in shapes.iter().enumerate() {
            for b in shapes.iter().skip(i + 1) {
                let forward = test(a, b);
                let backward = test(b, a);
                assert_eq!(
                    forward.is_some(),
                    backward.is_some(),
                    "{:?} vs {:?}",
                    a.shape_type(),
                    b.shape_type()
                );
                if let (Some(f), Some(r)) = (forward, backward) {
                    assert_relative_eq!(f.normal.x, -r.normal.x, epsilon = 1e-4);
                    assert_relative_eq!(f.normal.y, -r.normal.y, epsilon = 1e-4);
                    assert_relative_eq!(f.penetration, r.penetration, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_ray_against_rectangle_face() {
        let rect = Shape::rectangle(Vec2::zeros(), 2.0, 2.0);
        let ray = Ray::new(Vec2::new(-10.0, 0.0), Vec2::new(1.0, 0.0));
        let (distance, normal) = ray_intersection(&rect, &ray, 100.0).expect("ray hits face");
        assert_relative_eq!(distance, 9.0, epsilon = 1e-5);
        assert_relative_eq!(normal.x, -1.0, epsilon = 1e-6);

        assert!(ray_intersection(&rect, &ray, 5.0).is_none());
    }

    #[test]
    fn test_ray_against_circle() {
        let circle = Shape::circle(Vec2::new(5.0, 0.0), 1.0);
        let ray = Ray::new(Vec2::zeros(), Vec2::new(1.0, 0.0));
        let (distance, normal) = ray_intersection(&circle, &ray, 100.0).expect("ray hits circle");
        assert_relative_eq!(distance, 4.0, epsilon = 1e-5);
        assert_relative_eq!(normal.x, -1.0, epsilon = 1e-5);

        let away = Ray::new(Vec2::zeros(), Vec2::new(-1.0, 0.0));
        assert!(ray_intersection(&circle, &away, 100.0).is_none());

        let grazing = Ray::new(Vec2::new(0.0, 2.0), Vec2::new(1.0, 0.0));
        assert!(ray_intersection(&circle, &grazing, 100.0).is_none());
    }

    #[test]
    fn test_ray_starting_inside() {
        let poly = square(Vec2::zeros(), 2.0);
        let ray = Ray::new(Vec2::new(0.1, 0.1), Vec2::new(0.0, 1.0));
        let (distance, normal) = ray_intersection(&poly, &ray, 10.0).expect("origin inside");
        assert_eq!(distance, 0.0);
        assert_eq!(normal, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_ray_against_point() {
        let point = Shape::point(Vec2::new(3.0, 0.0));
        let ray = Ray::new(Vec2::zeros(), Vec2::new(1.0, 0.0));
        let (distance, _) = ray_intersection(&point, &ray, 10.0).expect("ray passes through point");
        assert_relative_eq!(distance, 3.0);

        let off_axis = Ray::new(Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.0));
        assert!(ray_intersection(&point, &off_axis, 10.0).is_none());
    }
}
