//! Convex polygon geometry stored in local space
//!
//! The vertex list is private so edge normals can never go stale: every
//! mutation goes through [`ConvexPolygon::set_vertices`], which recomputes them.

use crate::foundation::math::{cross, Vec2, EPSILON};

/// Convex polygon in local (shape) space
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Create a polygon from local-space vertices
    ///
    /// Either winding is accepted; normals always point outward. Consecutive
    /// duplicate vertices are dropped so no edge has zero length unless the
    /// polygon itself is degenerate.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        let mut polygon = Self {
            vertices: Vec::new(),
            normals: Vec::new(),
        };
        polygon.set_vertices(vertices);
        polygon
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`
    pub fn regular(sides: usize, radius: f32) -> Self {
        let sides = sides.max(3);
        let step = std::f32::consts::TAU / sides as f32;
        let vertices = (0..sides)
            .map(|i| {
                let (sin, cos) = (step * i as f32).sin_cos();
                Vec2::new(cos * radius, sin * radius)
            })
            .collect();
        Self::new(vertices)
    }

    /// Local-space vertices
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Outward unit normal of each edge; `normals()[i]` belongs to the edge
    /// from vertex `i` to vertex `i + 1`
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Replace the vertex list and recompute edge normals
    pub fn set_vertices(&mut self, mut vertices: Vec<Vec2>) {
        vertices.dedup_by(|a, b| (*a - *b).magnitude_squared() < EPSILON * EPSILON);
        while vertices.len() > 1 {
            let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
            if (first - last).magnitude_squared() < EPSILON * EPSILON {
                vertices.pop();
            } else {
                break;
            }
        }
        self.vertices = vertices;
        self.recompute_normals();
    }

    /// Largest distance from the local origin to any vertex
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.magnitude())
            .fold(0.0, f32::max)
    }

    /// Twice the signed area (positive for counter-clockwise winding)
    fn signed_area_doubled(vertices: &[Vec2]) -> f32 {
        let n = vertices.len();
        (0..n)
            .map(|i| cross(vertices[i], vertices[(i + 1) % n]))
            .sum()
    }

    fn recompute_normals(&mut self) {
        let n = self.vertices.len();
        let clockwise = Self::signed_area_doubled(&self.vertices) < 0.0;

        self.normals = (0..n)
            .map(|i| {
                let edge = self.vertices[(i + 1) % n] - self.vertices[i];
                let length = edge.magnitude();
                if length < EPSILON {
                    return Vec2::x();
                }
                let outward = if clockwise {
                    Vec2::new(-edge.y, edge.x)
                } else {
                    Vec2::new(edge.y, -edge.x)
                };
                outward / length
            })
            .collect();
    }
}
