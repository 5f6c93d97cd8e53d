//! Direct-light injection
//!
//! Recomputes dirty surface samples from scratch against the capped light
//! list. Each sample is an independent task; results land in a private
//! buffer the frame coordinator publishes after the stage joins, so
//! readers never observe a half-updated cloud.

use rayon::prelude::*;

use crate::config::GiConfig;
use crate::foundation::math::{utils, Vec3};
use crate::geometry::OcclusionSource;
use crate::gi::cloud::SurfaceCloud;
use crate::gi::dirty::DirtySets;
use crate::lighting::{Light, LightKind};

/// Smooth falloff: full at the light, zero at the radius
fn falloff(distance: f32, radius: f32) -> f32 {
    utils::smoothstep(radius, 0.0, distance)
}

/// Recompute direct light for every dirty sample
///
/// Overwrite semantics: the returned value replaces the sample's stored
/// light entirely, including the all-zero case where nothing is visible.
pub(crate) fn recompute_direct_light<S>(
    cloud: &SurfaceCloud,
    dirty: &DirtySets,
    lights: &[Light],
    occlusion: &S,
    config: &GiConfig,
) -> Vec<(usize, Vec3)>
where
    S: OcclusionSource + Sync,
{
    let epsilon = config.occlusion_epsilon;

    dirty
        .sample_indices
        .par_iter()
        .map(|&index| {
            let sample = &cloud.samples()[index];
            let mut accum = Vec3::zeros();

            for light in lights {
                let to_light = light.position - sample.position;
                let distance = to_light.magnitude();
                if distance >= light.radius {
                    continue;
                }
                // A light coincident with the sample has no usable direction
                if distance <= epsilon {
                    continue;
                }
                let direction = to_light / distance;

                let visible = match light.kind {
                    LightKind::CubemapLit => true,
                    LightKind::Lamp => {
                        match occlusion.any_hit(sample.position, direction, epsilon, distance) {
                            Ok(hit) => !hit,
                            Err(err) => {
                                log::debug!("occlusion query failed, withholding light: {err}");
                                false
                            }
                        }
                    }
                };
                if !visible {
                    continue;
                }

                let lambert = sample.normal.dot(&direction).max(0.0);
                accum +=
                    light.color * (falloff(distance, light.radius) * light.strength * lambert);
            }

            (index, accum)
        })
        .collect()
}
