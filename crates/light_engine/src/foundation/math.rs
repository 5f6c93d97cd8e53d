//! Math utilities and types
//!
//! Provides fundamental math types for spatial sampling and lighting.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,

    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from explicit corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an inverted box that any grown point will replace
    pub fn empty() -> Self {
        Self {
            min: Vec3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vec3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    /// Whether no point has been grown into this box
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the box to include a point
    pub fn grow(&mut self, point: Vec3) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Return the box expanded by `amount` on every side
    pub fn expanded(&self, amount: f32) -> Self {
        let pad = Vec3::new(amount, amount, amount);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Whether a point lies inside the box (inclusive bounds)
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }

    /// Size along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Math utility functions
pub mod utils {
    use super::{Vec2, Vec3};

    /// Squared distance between two points
    pub fn distance_squared(a: Vec3, b: Vec3) -> f32 {
        (a - b).magnitude_squared()
    }

    /// GLSL-style smooth Hermite interpolation
    ///
    /// Returns 0 at `edge0`, 1 at `edge1`, with zero derivative at both
    /// edges. Edges may be given in descending order to flip the curve.
    pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
        let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t)
    }

    /// Barycentric point-in-triangle test in the horizontal plane
    ///
    /// Uses a small tolerance so points on a shared edge belong to both
    /// triangles rather than neither.
    pub fn point_in_triangle_2d(pt: Vec2, v0: Vec2, v1: Vec2, v2: Vec2) -> bool {
        let e0 = v1 - v0;
        let e1 = v2 - v0;

        let dot00 = e0.dot(&e0);
        let dot01 = e0.dot(&e1);
        let dot11 = e1.dot(&e1);
        let dot20 = (pt - v0).dot(&e0);
        let dot21 = (pt - v0).dot(&e1);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom == 0.0 {
            return false; // Degenerate triangle
        }
        let inv = 1.0 / denom;
        let u = (dot11 * dot20 - dot01 * dot21) * inv;
        let v = (dot00 * dot21 - dot01 * dot20) * inv;

        u >= -1e-5 && v >= -1e-5 && u + v <= 1.0 + 1e-5
    }
}
