//! Triangle index and occlusion queries
//!
//! The index bakes all level surfaces and occluder-mesh instances into a
//! flat world-space triangle list and answers boolean any-hit visibility
//! queries against it. It is rebuilt explicitly when level geometry
//! changes and never mutated in between.

use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::LevelGeometry;

/// Errors surfaced by an occlusion source
#[derive(thiserror::Error, Debug)]
pub enum OcclusionError {
    /// The query ray could not be evaluated
    #[error("indeterminate occlusion query: {0}")]
    Indeterminate(String),
}

/// Boolean visibility query against opaque static geometry
///
/// Callers treat an `Err` as "occluded": a failed query must never produce
/// light, only withhold it.
pub trait OcclusionSource {
    /// Returns true when opaque geometry intersects the ray from `origin`
    /// along `direction` within `[min_distance, max_distance)`.
    fn any_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        min_distance: f32,
        max_distance: f32,
    ) -> Result<bool, OcclusionError>;
}

/// A world-space triangle
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Möller-Trumbore ray-triangle intersection
    ///
    /// Returns the distance along the ray if hit, None otherwise.
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        const EPSILON: f32 = 0.000001;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle?
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if t >= 0.0 {
            Some(t)
        } else {
            None // Behind ray origin
        }
    }
}

/// Flat world-space triangle list answering any-hit queries
#[derive(Debug, Default)]
pub struct GeometryIndex {
    triangles: Vec<Triangle>,
}

impl GeometryIndex {
    /// Create an empty index; every query misses
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of baked triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Rebuild the triangle list from level geometry
    ///
    /// Walls and floor/ceiling polygons triangulate directly; occluder
    /// meshes are baked through their instance transform.
    pub fn rebuild(&mut self, level: &LevelGeometry) {
        self.triangles.clear();

        for wall in &level.walls {
            let up = Vec3::new(0.0, wall.height, 0.0);
            let (a, b) = (wall.start, wall.end);
            self.triangles.push(Triangle::new(a, b, b + up));
            self.triangles.push(Triangle::new(a, b + up, a + up));
        }

        for surface in level.floors.iter().chain(level.ceilings.iter()) {
            let [c0, c1, c2, c3] = surface.corners;
            let at = |c: Vec2| Vec3::new(c.x, surface.height, c.y);
            self.triangles.push(Triangle::new(at(c0), at(c1), at(c2)));
            self.triangles.push(Triangle::new(at(c0), at(c2), at(c3)));
        }

        for instance in &level.mesh_instances {
            for chunk in instance.indices.chunks(3) {
                if chunk.len() == 3 {
                    self.triangles.push(Triangle::new(
                        instance.world_vertex(chunk[0]),
                        instance.world_vertex(chunk[1]),
                        instance.world_vertex(chunk[2]),
                    ));
                }
            }
        }

        log::debug!("geometry index rebuilt: {} triangles", self.triangles.len());
    }
}

impl OcclusionSource for GeometryIndex {
    fn any_hit(
        &self,
        origin: Vec3,
        direction: Vec3,
        min_distance: f32,
        max_distance: f32,
    ) -> Result<bool, OcclusionError> {
        if !origin.iter().all(|c| c.is_finite()) || !direction.iter().all(|c| c.is_finite()) {
            return Err(OcclusionError::Indeterminate(
                "non-finite ray origin or direction".to_string(),
            ));
        }
        if direction.magnitude_squared() < f32::EPSILON {
            return Err(OcclusionError::Indeterminate(
                "zero-length ray direction".to_string(),
            ));
        }

        for triangle in &self.triangles {
            if let Some(t) = triangle.intersect_ray(origin, direction) {
                if t >= min_distance && t < max_distance {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
