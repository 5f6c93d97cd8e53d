//! Per-frame dirty-region derivation
//!
//! Turns the lights' dirty flags into the two work lists the lighting
//! passes consume: sample indices to re-inject and probe coordinates to
//! re-propagate. Both lists are insertion-ordered and carry no further
//! meaning; downstream stages treat them as read-only for the rest of the
//! frame.

use crate::config::GiConfig;
use crate::foundation::math::{utils, Aabb};
use crate::gi::cloud::SurfaceCloud;
use crate::gi::lattice::{GridCoord, ProbeLattice};
use crate::lighting::LightSet;

/// Work lists for one frame
#[derive(Debug, Default)]
pub struct DirtySets {
    /// Cloud indices whose direct light must be recomputed
    pub sample_indices: Vec<usize>,
    /// Valid probe coordinates whose indirect light must be recomputed
    pub probe_coords: Vec<GridCoord>,
}

impl DirtySets {
    /// Whether the frame has no work
    pub fn is_empty(&self) -> bool {
        self.sample_indices.is_empty()
    }
}

/// Derive the dirty sample and probe sets for this frame
///
/// A sample is dirty when any dirty light's radius covers it. A valid
/// probe is dirty when some dirty sample lies within the propagation
/// cutoff and does not face away from it. One bounding box over the dirty
/// samples, expanded by the cutoff, rejects distant probes before the
/// per-probe distance loop runs.
pub fn collect_dirty_sets(
    lights: &LightSet,
    cloud: &SurfaceCloud,
    lattice: &ProbeLattice,
    config: &GiConfig,
) -> DirtySets {
    let samples = cloud.samples();

    let mut sample_indices = Vec::new();
    for (index, sample) in samples.iter().enumerate() {
        for light in lights.values() {
            if !light.dirty {
                continue;
            }
            let radius_squared = light.radius * light.radius;
            if utils::distance_squared(sample.position, light.position) < radius_squared {
                sample_indices.push(index);
                break;
            }
        }
    }

    if sample_indices.is_empty() {
        return DirtySets::default();
    }

    let mut dirty_bounds = Aabb::empty();
    for &index in &sample_indices {
        dirty_bounds.grow(samples[index].position);
    }
    let reach = dirty_bounds.expanded(config.max_propagation_distance);
    let max_distance_squared =
        config.max_propagation_distance * config.max_propagation_distance;

    let mut probe_coords = Vec::new();
    for (&coord, &probe_position) in lattice
        .working_coords()
        .iter()
        .zip(lattice.working_positions())
    {
        if !reach.contains(probe_position) {
            continue;
        }
        for &index in &sample_indices {
            let sample = &samples[index];
            if utils::distance_squared(sample.position, probe_position) >= max_distance_squared {
                continue;
            }
            // Skip samples whose surface faces away from the probe
            if (sample.position - probe_position).dot(&sample.normal) > 0.0 {
                continue;
            }
            probe_coords.push(coord);
            break;
        }
    }

    DirtySets {
        sample_indices,
        probe_coords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec2, Vec3};
    use crate::geometry::{FloorPolygon, LevelGeometry, Wall};
    use crate::lighting::Light;

    fn room_level() -> LevelGeometry {
        let mut level = LevelGeometry::new();
        level
            .floors
            .push(FloorPolygon::rect(Vec2::zeros(), Vec2::new(5.0, 5.0), 0.0));
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(5.0, 0.0, 0.0), 2.4));
        level
    }

    #[test]
    fn test_sample_dirty_iff_within_dirty_light_radius() {
        let config = GiConfig::default();
        let level = room_level();
        let cloud = SurfaceCloud::generate(&level, &config);
        let lattice = ProbeLattice::build(&level, &config);

        let mut lights = LightSet::new();
        let light = Light::new(Vec3::new(1.0, 1.0, 1.0), Light::default_color(), 1.5, 1.0);
        lights.insert(light);

        let dirty = collect_dirty_sets(&lights, &cloud, &lattice, &config);

        let radius_squared = 1.5_f32 * 1.5;
        for (index, sample) in cloud.samples().iter().enumerate() {
            let within = utils::distance_squared(sample.position, Vec3::new(1.0, 1.0, 1.0))
                < radius_squared;
            assert_eq!(dirty.sample_indices.contains(&index), within);
        }
    }

    #[test]
    fn test_clean_lights_produce_no_work() {
        let config = GiConfig::default();
        let level = room_level();
        let cloud = SurfaceCloud::generate(&level, &config);
        let lattice = ProbeLattice::build(&level, &config);

        let mut lights = LightSet::new();
        lights.insert(Light::default());
        lights.clear_dirty();

        let dirty = collect_dirty_sets(&lights, &cloud, &lattice, &config);
        assert!(dirty.is_empty());
        assert!(dirty.probe_coords.is_empty());
    }

    #[test]
    fn test_probes_beyond_propagation_distance_stay_clean() {
        let config = GiConfig::default();
        let level = room_level();
        let cloud = SurfaceCloud::generate(&level, &config);
        let lattice = ProbeLattice::build(&level, &config);

        // Small light in one corner; only nearby samples go dirty
        let mut lights = LightSet::new();
        lights.insert(Light::new(
            Vec3::new(0.3, 0.3, 0.3),
            Light::default_color(),
            0.5,
            1.0,
        ));

        let dirty = collect_dirty_sets(&lights, &cloud, &lattice, &config);
        assert!(!dirty.sample_indices.is_empty());

        let max_sq = config.max_propagation_distance * config.max_propagation_distance;
        for &coord in &dirty.probe_coords {
            let position = lattice.world_position(coord);
            let near_some_dirty_sample = dirty.sample_indices.iter().any(|&index| {
                utils::distance_squared(cloud.samples()[index].position, position) < max_sq
            });
            assert!(near_some_dirty_sample);
        }

        // The far corner of the room is out of reach entirely
        let far = lattice
            .working_coords()
            .iter()
            .zip(lattice.working_positions())
            .find(|(_, p)| (p.x - 4.9).abs() < 0.4 && (p.z - 4.9).abs() < 0.4);
        if let Some((&coord, _)) = far {
            assert!(!dirty.probe_coords.contains(&coord));
        }
    }

    #[test]
    fn test_back_facing_samples_do_not_dirty_probes() {
        let config = GiConfig::default();

        // A single wall with normal +z; probes live behind it at -z over
        // their own floor strip
        let mut level = LevelGeometry::new();
        level
            .walls
            .push(Wall::new(Vec3::zeros(), Vec3::new(2.0, 0.0, 0.0), 2.0));
        level.floors.push(FloorPolygon::rect(
            Vec2::new(0.0, -2.0),
            Vec2::new(2.0, -0.5),
            0.0,
        ));

        let cloud = SurfaceCloud::generate(&level, &config);
        let lattice = ProbeLattice::build(&level, &config);

        let mut lights = LightSet::new();
        lights.insert(Light::new(
            Vec3::new(1.0, 1.0, 0.5),
            Light::default_color(),
            6.0,
            1.0,
        ));

        let dirty = collect_dirty_sets(&lights, &cloud, &lattice, &config);

        // Wall samples face +z and must not dirty probes at negative z;
        // floor samples face up and may. Verify per-probe reachability
        // honors the one-sided test.
        for &coord in &dirty.probe_coords {
            let probe = lattice.world_position(coord);
            let reachable = dirty.sample_indices.iter().any(|&index| {
                let sample = &cloud.samples()[index];
                utils::distance_squared(sample.position, probe)
                    < config.max_propagation_distance * config.max_propagation_distance
                    && (sample.position - probe).dot(&sample.normal) <= 0.0
            });
            assert!(reachable);
        }
    }
}
