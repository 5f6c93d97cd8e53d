//! Surface point cloud generation
//!
//! Samples walls, floors, and ceilings at a fixed spacing into an ordered,
//! index-stable cloud. Sample indices are the addressing key for the dirty
//! tracker and both lighting passes; the cloud is only ever replaced
//! wholesale on geometry rebuild.

use crate::config::GiConfig;
use crate::foundation::math::Vec3;
use crate::geometry::{HorizontalQuad, LevelGeometry};

/// A fixed sample point on static level geometry
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSample {
    /// World position
    pub position: Vec3,
    /// Outward surface normal
    pub normal: Vec3,
    /// Accumulated direct light, overwritten whenever the sample is dirty
    pub direct_light: Vec3,
}

impl SurfaceSample {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            direct_light: Vec3::zeros(),
        }
    }
}

/// Ordered, index-stable cloud of surface samples
#[derive(Debug, Default)]
pub struct SurfaceCloud {
    samples: Vec<SurfaceSample>,
}

impl SurfaceCloud {
    /// Create an empty cloud
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the cloud for a level
    ///
    /// Samples start half a spacing in from every edge and stride at full
    /// spacing strictly below the far edge, so none lands exactly on a
    /// corner. Output count and order are deterministic for identical
    /// input geometry.
    pub fn generate(level: &LevelGeometry, config: &GiConfig) -> Self {
        let spacing = config.sample_spacing;
        let mut samples = Vec::new();

        // Walls: march along the segment, then up each column
        for wall in &level.walls {
            let length = wall.length();
            if length <= 0.0 || wall.height <= 0.0 {
                continue;
            }
            let dir = wall.direction();
            let normal = wall.normal();
            let mut x = spacing * 0.5;
            while x < length {
                let base = wall.start + dir * x;
                let mut y = spacing * 0.5;
                while y < wall.height {
                    let position = Vec3::new(base.x, wall.start.y + y, base.z);
                    samples.push(SurfaceSample::new(position, normal));
                    y += spacing;
                }
                x += spacing;
            }
        }

        // Floors: cover the polygon's bounding rectangle, normal up
        for floor in &level.floors {
            Self::sample_horizontal(
                &mut samples,
                floor,
                Vec3::new(0.0, 1.0, 0.0),
                spacing,
            );
        }

        // Ceilings: same coverage, normal down
        for ceiling in &level.ceilings {
            Self::sample_horizontal(
                &mut samples,
                ceiling,
                Vec3::new(0.0, -1.0, 0.0),
                spacing,
            );
        }

        // Cull samples sitting inside a door's swept opening
        if !level.doors.is_empty() {
            let extent = config.door_vertical_extent;
            samples.retain(|sample| {
                !level
                    .doors
                    .iter()
                    .any(|door| door.contains(sample.position, extent))
            });
        }

        log::info!("surface cloud generated: {} samples", samples.len());
        Self { samples }
    }

    fn sample_horizontal(
        samples: &mut Vec<SurfaceSample>,
        surface: &HorizontalQuad,
        normal: Vec3,
        spacing: f32,
    ) {
        let (min, max) = surface.bounding_rect();
        let mut x = min.x + spacing * 0.5;
        while x < max.x {
            let mut z = min.y + spacing * 0.5;
            while z < max.y {
                samples.push(SurfaceSample::new(
                    Vec3::new(x, surface.height, z),
                    normal,
                ));
                z += spacing;
            }
            x += spacing;
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the cloud holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Shared view of the samples
    pub fn samples(&self) -> &[SurfaceSample] {
        &self.samples
    }

    /// Publish a batch of recomputed direct-light values
    ///
    /// Called by the frame coordinator after the injection stage joins;
    /// untouched indices keep their previous value.
    pub(crate) fn publish_direct_light(&mut self, updates: &[(usize, Vec3)]) {
        for &(index, value) in updates {
            self.samples[index].direct_light = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::geometry::{Door, FloorPolygon, Wall};

    fn config() -> GiConfig {
        GiConfig::default()
    }

    #[test]
    fn test_wall_sampling_counts_and_offsets() {
        let mut level = LevelGeometry::new();
        // Length 2.0, height 1.0, spacing 0.4:
        // columns at 0.2, 0.6, 1.0, 1.4, 1.8 and heights at 0.2, 0.6
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), 1.0));

        let cloud = SurfaceCloud::generate(&level, &config());
        assert_eq!(cloud.len(), 10);

        let first = &cloud.samples()[0];
        assert!((first.position.x - 0.2).abs() < 1e-6);
        assert!((first.position.y - 0.2).abs() < 1e-6);
        assert_eq!(first.normal, Vec3::new(0.0, 0.0, 1.0));

        // No sample lands on the segment ends or the top edge
        for sample in cloud.samples() {
            assert!(sample.position.x > 0.0 && sample.position.x < 2.0);
            assert!(sample.position.y > 0.0 && sample.position.y < 1.0);
        }
    }

    #[test]
    fn test_floor_and_ceiling_normals() {
        let mut level = LevelGeometry::new();
        level
            .floors
            .push(FloorPolygon::rect(Vec2::zeros(), Vec2::new(1.0, 1.0), 0.0));
        level
            .ceilings
            .push(FloorPolygon::rect(Vec2::zeros(), Vec2::new(1.0, 1.0), 2.4));

        let cloud = SurfaceCloud::generate(&level, &config());
        assert!(!cloud.is_empty());
        for sample in cloud.samples() {
            if sample.position.y == 0.0 {
                assert_eq!(sample.normal, Vec3::new(0.0, 1.0, 0.0));
            } else {
                assert_eq!(sample.normal, Vec3::new(0.0, -1.0, 0.0));
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut level = LevelGeometry::new();
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(3.0, 0.0, 0.0), 2.4));
        level
            .floors
            .push(FloorPolygon::rect(Vec2::zeros(), Vec2::new(3.0, 3.0), 0.0));

        let a = SurfaceCloud::generate(&level, &config());
        let b = SurfaceCloud::generate(&level, &config());
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_door_culls_wall_samples() {
        let mut level = LevelGeometry::new();
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0), 2.4));
        let without_door = SurfaceCloud::generate(&level, &config());

        // Door footprint straddling the wall around x in [1.5, 2.5]
        level.doors.push(Door::new(
            [
                Vec2::new(1.5, -0.2),
                Vec2::new(2.5, -0.2),
                Vec2::new(2.5, 0.2),
                Vec2::new(1.5, 0.2),
            ],
            0.0,
        ));
        let with_door = SurfaceCloud::generate(&level, &config());

        assert!(with_door.len() < without_door.len());
        for sample in with_door.samples() {
            let in_footprint = sample.position.x > 1.5 && sample.position.x < 2.5;
            let in_extent = sample.position.y <= config().door_vertical_extent;
            assert!(!(in_footprint && in_extent));
        }
    }

    #[test]
    fn test_empty_geometry_yields_empty_cloud() {
        let cloud = SurfaceCloud::generate(&LevelGeometry::new(), &config());
        assert!(cloud.is_empty());
    }

    #[test]
    fn test_publish_overwrites_only_listed_indices() {
        let mut level = LevelGeometry::new();
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), 1.0));
        let mut cloud = SurfaceCloud::generate(&level, &config());

        let lit = Vec3::new(0.5, 0.4, 0.3);
        cloud.publish_direct_light(&[(0, lit)]);
        assert_eq!(cloud.samples()[0].direct_light, lit);
        assert_eq!(cloud.samples()[1].direct_light, Vec3::zeros());
    }
}
