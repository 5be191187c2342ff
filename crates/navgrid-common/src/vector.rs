//! Ray and point-distance utilities

use crate::Aabb;
use glam::Vec3;

/// Slack allowed on box faces and triangle edges, relative to coordinate magnitude
pub const EDGE_TOLERANCE: f32 = 1e-5;

/// Calculates the squared distance between two points
#[inline]
pub fn distance_squared(a: &Vec3, b: &Vec3) -> f32 {
    (*b - *a).length_squared()
}

/// A finite ray used for surface picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray
    pub origin: Vec3,
    /// Unit direction of the ray
    pub direction: Vec3,
    /// Maximum distance along `direction` that counts as a hit
    pub length: f32,
}

impl Ray {
    /// Creates a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            length,
        }
    }

    /// Creates a ray pointing straight down (-Y)
    pub fn downward(origin: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction: Vec3::NEG_Y,
            length,
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against an axis-aligned box, within the ray length
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let mut t_min = 0.0_f32;
        let mut t_max = self.length;

        for axis in 0..3 {
            let o = self.origin[axis];
            let d = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            let slack = EDGE_TOLERANCE * lo.abs().max(hi.abs()).max(1.0);
            let (lo, hi) = (lo - slack, hi + slack);

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }

        true
    }
}

/// Checks if a ray intersects a triangle
pub fn ray_triangle_intersection(
    origin: &Vec3,
    direction: &Vec3,
    v0: &Vec3,
    v1: &Vec3,
    v2: &Vec3,
) -> Option<f32> {
    // Möller–Trumbore algorithm
    let edge1 = *v1 - *v0;
    let edge2 = *v2 - *v0;

    let h = direction.cross(edge2);
    let a = edge1.dot(h);

    // This ray is parallel to the triangle
    if a.abs() < f32::EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = *origin - *v0;
    let u = f * s.dot(h);

    if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * direction.dot(q);

    if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
        return None;
    }

    let t = f * edge2.dot(q);

    if t > f32::EPSILON {
        return Some(t);
    }

    None
}
