//! Light propagation
//!
//! Scatters direct light from dirty surface samples into dirty probes,
//! approximating one bounce of diffuse transport via nearest-surface
//! scatter. Deliberately not a radiometric integral. Same task and
//! publish discipline as injection: independent per-probe tasks, private
//! result buffer, published after the join.

use rayon::prelude::*;

use crate::config::GiConfig;
use crate::foundation::math::{utils, Vec3};
use crate::gi::cloud::SurfaceCloud;
use crate::gi::dirty::DirtySets;
use crate::gi::lattice::{GridCoord, ProbeLattice};

/// Smooth attenuation: full at the sample, zero at the cutoff distance
fn attenuation(distance: f32, cutoff: f32) -> f32 {
    utils::smoothstep(cutoff, 0.0, distance)
}

/// Recompute indirect light for every dirty probe
///
/// Overwrite semantics, identical contract to injection: the returned
/// value replaces the probe's stored light entirely.
pub(crate) fn propagate_dirty_probes(
    cloud: &SurfaceCloud,
    lattice: &ProbeLattice,
    dirty: &DirtySets,
    config: &GiConfig,
) -> Vec<(GridCoord, Vec3)> {
    let cutoff = config.max_propagation_distance;
    let cutoff_squared = cutoff * cutoff;
    let scale = config.propagation_scale;

    dirty
        .probe_coords
        .par_iter()
        .map(|&coord| {
            let probe_position = lattice.world_position(coord);
            let mut accum = Vec3::zeros();

            for &index in &dirty.sample_indices {
                let sample = &cloud.samples()[index];
                let distance_squared =
                    utils::distance_squared(sample.position, probe_position);
                if distance_squared >= cutoff_squared {
                    continue;
                }
                // Same one-sided test as the dirty tracker
                if (sample.position - probe_position).dot(&sample.normal) > 0.0 {
                    continue;
                }
                let distance = distance_squared.sqrt();
                accum += sample.direct_light * (attenuation(distance, cutoff) * scale);
            }

            (coord, accum)
        })
        .collect()
}
