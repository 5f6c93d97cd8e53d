//! Static level geometry consumed by the lighting subsystem
//!
//! Walls, floor and ceiling polygons, and door openings describe the level
//! for sampling; arbitrary triangle-mesh instances may be added for
//! occlusion only. All of it is read-only between explicit rebuilds.

pub mod index;

pub use index::{GeometryIndex, OcclusionError, OcclusionSource, Triangle};

use crate::foundation::math::{utils, Aabb, Mat4, Point3, Vec2, Vec3};

/// A vertical wall segment
///
/// Runs from `start` to `end` at the base and extends `height` units up.
#[derive(Debug, Clone)]
pub struct Wall {
    /// Base start point
    pub start: Vec3,
    /// Base end point
    pub end: Vec3,
    /// Vertical extent above the base
    pub height: f32,
}

impl Wall {
    /// Create a wall segment
    pub fn new(start: Vec3, end: Vec3, height: f32) -> Self {
        Self { start, end, height }
    }

    /// Horizontal length of the segment
    pub fn length(&self) -> f32 {
        (self.end - self.start).magnitude()
    }

    /// Normalized direction from start to end
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize()
    }

    /// Outward surface normal; the horizontal perpendicular of the segment
    ///
    /// Walls wound counter-clockwise around an interior face inward.
    pub fn normal(&self) -> Vec3 {
        let dir = self.direction();
        Vec3::new(-dir.z, 0.0, dir.x)
    }
}

/// A horizontal convex quad polygon at a fixed height
#[derive(Debug, Clone)]
pub struct HorizontalQuad {
    /// Corner positions in the horizontal plane, wound consistently
    pub corners: [Vec2; 4],
    /// Height of the surface
    pub height: f32,
}

impl HorizontalQuad {
    /// Create a quad from corners and height
    pub fn new(corners: [Vec2; 4], height: f32) -> Self {
        Self { corners, height }
    }

    /// Create an axis-aligned rectangle from opposite corners
    pub fn rect(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            corners: [
                min,
                Vec2::new(max.x, min.y),
                max,
                Vec2::new(min.x, max.y),
            ],
            height,
        }
    }

    /// Whether a horizontal position lies inside the footprint
    ///
    /// The quad splits into two triangles sharing the 0-2 diagonal.
    pub fn contains_2d(&self, point: Vec2) -> bool {
        let [a, b, c, d] = self.corners;
        utils::point_in_triangle_2d(point, a, b, c) || utils::point_in_triangle_2d(point, a, c, d)
    }

    /// Bounding rectangle of the footprint
    pub fn bounding_rect(&self) -> (Vec2, Vec2) {
        let mut min = self.corners[0];
        let mut max = self.corners[0];
        for corner in &self.corners[1..] {
            min.x = min.x.min(corner.x);
            min.y = min.y.min(corner.y);
            max.x = max.x.max(corner.x);
            max.y = max.y.max(corner.y);
        }
        (min, max)
    }
}

/// A floor surface; samples take the up normal
pub type FloorPolygon = HorizontalQuad;

/// A ceiling surface; samples take the down normal
pub type CeilingPolygon = HorizontalQuad;

/// A doorway's swept-opening footprint
///
/// Surface samples inside the footprint and within the door's vertical
/// extent are culled so the cloud never represents geometry hidden by an
/// open door.
#[derive(Debug, Clone)]
pub struct Door {
    /// Horizontal footprint of the swept opening
    pub footprint: [Vec2; 4],
    /// Height of the door sill
    pub base_height: f32,
}

impl Door {
    /// Create a door from its swept footprint and sill height
    pub fn new(footprint: [Vec2; 4], base_height: f32) -> Self {
        Self {
            footprint,
            base_height,
        }
    }

    /// Whether a world position falls inside the opening
    pub fn contains(&self, position: Vec3, vertical_extent: f32) -> bool {
        if position.y < self.base_height || position.y > self.base_height + vertical_extent {
            return false;
        }
        let p = Vec2::new(position.x, position.z);
        let [a, b, c, d] = self.footprint;
        utils::point_in_triangle_2d(p, a, b, c) || utils::point_in_triangle_2d(p, a, c, d)
    }
}

/// An occlusion-only triangle mesh with a world transform
#[derive(Debug, Clone)]
pub struct MeshInstance {
    /// Vertex positions in model space
    pub vertices: Vec<Vec3>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
    /// Model-to-world transform
    pub transform: Mat4,
}

impl MeshInstance {
    /// Create an instance with an identity transform
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            transform: Mat4::identity(),
        }
    }

    /// Set the model-to-world transform
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub(crate) fn world_vertex(&self, index: u32) -> Vec3 {
        let v = self.vertices[index as usize];
        let p = self.transform.transform_point(&Point3::new(v.x, v.y, v.z));
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Complete static geometry of a level
#[derive(Debug, Clone, Default)]
pub struct LevelGeometry {
    /// Wall segments
    pub walls: Vec<Wall>,
    /// Floor polygons
    pub floors: Vec<FloorPolygon>,
    /// Ceiling polygons
    pub ceilings: Vec<CeilingPolygon>,
    /// Door openings
    pub doors: Vec<Door>,
    /// Additional occluder meshes
    pub mesh_instances: Vec<MeshInstance>,
}

impl LevelGeometry {
    /// Create empty level geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the level has no surfaces to sample
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.floors.is_empty() && self.ceilings.is_empty()
    }

    /// Bounding volume over walls, floors, and ceilings
    ///
    /// Occluder meshes do not extend the volume; they block light but are
    /// never sampled.
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for wall in &self.walls {
            bounds.grow(wall.start);
            bounds.grow(wall.end);
            bounds.grow(wall.start + Vec3::new(0.0, wall.height, 0.0));
            bounds.grow(wall.end + Vec3::new(0.0, wall.height, 0.0));
        }
        for surface in self.floors.iter().chain(self.ceilings.iter()) {
            for corner in &surface.corners {
                bounds.grow(Vec3::new(corner.x, surface.height, corner.y));
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_normal_is_horizontal_perpendicular() {
        let wall = Wall::new(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0), 2.0);
        let normal = wall.normal();
        assert_eq!(normal, Vec3::new(0.0, 0.0, 1.0));
        assert!(normal.dot(&wall.direction()).abs() < 1e-6);
    }

    #[test]
    fn test_quad_contains_2d() {
        let quad = HorizontalQuad::rect(Vec2::zeros(), Vec2::new(5.0, 5.0), 0.0);
        assert!(quad.contains_2d(Vec2::new(2.5, 2.5)));
        assert!(quad.contains_2d(Vec2::new(0.0, 0.0)));
        assert!(!quad.contains_2d(Vec2::new(5.1, 2.5)));
        assert!(!quad.contains_2d(Vec2::new(-0.1, 2.5)));
    }

    #[test]
    fn test_door_contains_respects_vertical_extent() {
        let door = Door::new(
            [
                Vec2::new(1.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(1.0, 1.0),
            ],
            0.0,
        );
        assert!(door.contains(Vec3::new(1.5, 1.0, 0.5), 2.0));
        assert!(!door.contains(Vec3::new(1.5, 2.5, 0.5), 2.0));
        assert!(!door.contains(Vec3::new(0.5, 1.0, 0.5), 2.0));
    }

    #[test]
    fn test_level_bounds_cover_wall_height() {
        let mut level = LevelGeometry::new();
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(3.0, 0.0, 0.0), 2.4));
        let bounds = level.bounds();
        assert_eq!(bounds.min, Vec3::zeros());
        assert_eq!(bounds.max, Vec3::new(3.0, 2.4, 0.0));
    }

    #[test]
    fn test_empty_level_has_empty_bounds() {
        let level = LevelGeometry::new();
        assert!(level.is_empty());
        assert!(level.bounds().is_empty());
    }
}
