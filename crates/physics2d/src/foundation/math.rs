//! Math utilities and types
//!
//! Provides the 2D vector type used across the physics core together with the
//! handful of planar helpers nalgebra does not spell out directly.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Tolerance used to guard degenerate geometry (zero-length edges,
/// coincident centres, near-parallel rays).
pub const EPSILON: f32 = 1e-4;

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    if angle == 0.0 {
        return v;
    }
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// 2D cross product (z component of the 3D cross product)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Normalize `v`, substituting `fallback` when it is too short to normalize
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let length = v.magnitude();
    if length > EPSILON {
        v / length
    } else {
        fallback
    }
}

/// Clamp the length of `v` to `max_length` (no-op when `max_length <= 0`)
#[inline]
pub fn clamp_length(v: Vec2, max_length: f32) -> Vec2 {
    if max_length <= 0.0 {
        return v;
    }
    let length_squared = v.magnitude_squared();
    if length_squared > max_length * max_length {
        v * (max_length / length_squared.sqrt())
    } else {
        v
    }
}

/// Closest point to `p` on the segment `a`-`b`
///
/// Degenerate segments collapse to `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let length_squared = ab.magnitude_squared();
    if length_squared < EPSILON * EPSILON {
        return a;
    }
    let t = ((p - a).dot(&ab) / length_squared).clamp(0.0, 1.0);
    a + ab * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate(Vec2::new(1.0, 0.0), FRAC_PI_2);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_or_fallback() {
        let fallback = Vec2::x();
        assert_eq!(normalize_or(Vec2::zeros(), fallback), fallback);
        assert_relative_eq!(normalize_or(Vec2::new(0.0, 3.0), fallback).y, 1.0);
    }

    #[test]
    fn test_clamp_length() {
        let clamped = clamp_length(Vec2::new(3.0, 4.0), 1.0);
        assert_relative_eq!(clamped.magnitude(), 1.0, epsilon = 1e-6);
        assert_eq!(clamp_length(Vec2::new(3.0, 4.0), 0.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_closest_point_on_segment_clamps_to_ends() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(-5.0, 2.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec2::new(15.0, 2.0), a, b), b);
        assert_eq!(
            closest_point_on_segment(Vec2::new(4.0, 2.0), a, b),
            Vec2::new(4.0, 0.0)
        );
    }
}
