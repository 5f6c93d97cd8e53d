//! Dynamic indirect illumination
//!
//! The pipeline per frame: light dirty flags feed the dirty tracker,
//! injection rewrites direct light on dirty surface samples, propagation
//! scatters it into dirty probes, and the renderer samples the probe
//! lattice. Geometry changes are out-of-band: the owner calls the rebuild
//! entry points explicitly; nothing here polls for them.

pub mod cloud;
pub mod dirty;
mod inject;
pub mod lattice;
mod propagate;

pub use cloud::{SurfaceCloud, SurfaceSample};
pub use dirty::{collect_dirty_sets, DirtySets};
pub use lattice::{GridCoord, ProbeLattice};

use crate::config::GiConfig;
use crate::foundation::math::Vec3;
use crate::geometry::{GeometryIndex, LevelGeometry};
use crate::lighting::{Light, LightSet};

/// Work counts for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Surface samples re-injected this frame
    pub dirty_samples: usize,
    /// Probes re-propagated this frame
    pub dirty_probes: usize,
}

/// Context object owning all indirect-lighting state
///
/// One scene owner holds this and passes it by reference into every call;
/// there are no ambient statics. The lights stay owned by the scene and
/// come in per frame.
pub struct IndirectLighting {
    config: GiConfig,
    geometry: GeometryIndex,
    cloud: SurfaceCloud,
    lattice: ProbeLattice,
    cap_warning_logged: bool,
}

impl IndirectLighting {
    /// Create the subsystem with the given tuning
    ///
    /// Everything starts empty; [`sample_indirect`](Self::sample_indirect)
    /// returns zero until the first rebuild.
    pub fn new(config: GiConfig) -> Self {
        Self {
            config,
            geometry: GeometryIndex::new(),
            cloud: SurfaceCloud::new(),
            lattice: ProbeLattice::empty(),
            cap_warning_logged: false,
        }
    }

    /// Current tuning parameters
    pub fn config(&self) -> &GiConfig {
        &self.config
    }

    /// Rebuild the occlusion index after level geometry changed
    pub fn rebuild_geometry(&mut self, level: &LevelGeometry) {
        self.geometry.rebuild(level);
    }

    /// Regenerate the surface cloud and the probe lattice mask
    ///
    /// Must be called alongside [`rebuild_geometry`](Self::rebuild_geometry)
    /// whenever walls, floors, ceilings, or doors change. Stored light
    /// values reset; the owner's dirty lights re-populate them on the next
    /// frame.
    pub fn rebuild_point_cloud_and_lattice(&mut self, level: &LevelGeometry) {
        self.cloud = SurfaceCloud::generate(level, &self.config);
        self.lattice = ProbeLattice::build(level, &self.config);
        self.cap_warning_logged = false;
    }

    /// Run one frame of the lighting chain
    ///
    /// Sequences dirty tracking, injection, and propagation, with a full
    /// join between the stages. Clears every light's dirty flag at the
    /// end, after all stages have read them.
    pub fn update(&mut self, lights: &mut LightSet) -> FrameStats {
        let dirty = collect_dirty_sets(lights, &self.cloud, &self.lattice, &self.config);
        let stats = FrameStats {
            dirty_samples: dirty.sample_indices.len(),
            dirty_probes: dirty.probe_coords.len(),
        };

        if !dirty.is_empty() {
            let capped = self.capped_lights(lights);
            let direct =
                inject::recompute_direct_light(&self.cloud, &dirty, &capped, &self.geometry, &self.config);
            self.cloud.publish_direct_light(&direct);

            if !dirty.probe_coords.is_empty() {
                let indirect =
                    propagate::propagate_dirty_probes(&self.cloud, &self.lattice, &dirty, &self.config);
                self.lattice.publish_indirect_light(&indirect);
            }
        }

        lights.clear_dirty();
        log::trace!(
            "frame: {} dirty samples, {} dirty probes",
            stats.dirty_samples,
            stats.dirty_probes
        );
        stats
    }

    /// Snapshot the lights up to the per-sample cap
    fn capped_lights(&mut self, lights: &LightSet) -> Vec<Light> {
        let cap = self.config.max_lights_per_sample;
        if lights.len() > cap && !self.cap_warning_logged {
            log::warn!(
                "{} lights exceed the per-sample cap of {}; excess lights are ignored",
                lights.len(),
                cap
            );
            self.cap_warning_logged = true;
        }
        lights.values().take(cap).cloned().collect()
    }

    /// Trilinearly sampled indirect light at a world position
    ///
    /// The sole read interface for the rendering pass. Never faults:
    /// before the first rebuild, outside the lattice, or surrounded only
    /// by invalid probes it returns zero.
    pub fn sample_indirect(&self, world_position: Vec3) -> Vec3 {
        self.lattice.sample(world_position)
    }

    /// The surface cloud, for debug visualization
    pub fn cloud(&self) -> &SurfaceCloud {
        &self.cloud
    }

    /// The probe lattice, for debug visualization
    pub fn lattice(&self) -> &ProbeLattice {
        &self.lattice
    }
}
