//! # Light Engine
//!
//! Dynamic indirect illumination over static level geometry.
//!
//! ## Features
//!
//! - **Surface Point Cloud**: fixed-spacing samples over walls, floors,
//!   and ceilings, culled around door openings
//! - **Dirty-Region Invalidation**: per-frame work proportional to what
//!   moving lights actually touched, never a full rebuild
//! - **Probe Lattice**: a 3D light field masked to occupiable interior
//!   volume, trilinearly sampled by the renderer
//! - **Parallel Passes**: injection and propagation fan out across all
//!   cores with a hard join between the stages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use light_engine::prelude::*;
//!
//! fn main() {
//!     let mut level = LevelGeometry::new();
//!     level.floors.push(FloorPolygon::rect(
//!         Vec2::zeros(),
//!         Vec2::new(5.0, 5.0),
//!         0.0,
//!     ));
//!
//!     let mut gi = IndirectLighting::new(GiConfig::default());
//!     gi.rebuild_geometry(&level);
//!     gi.rebuild_point_cloud_and_lattice(&level);
//!
//!     let mut lights = LightSet::new();
//!     lights.insert(Light::default());
//!
//!     gi.update(&mut lights);
//!     let indirect = gi.sample_indirect(Vec3::new(2.5, 1.0, 2.5));
//!     println!("indirect light: {indirect:?}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod gi;
pub mod lighting;

pub use gi::{FrameStats, IndirectLighting};

/// Common imports for engine users
pub mod prelude {
    pub use crate::config::{Config, GiConfig};
    pub use crate::foundation::math::{Vec2, Vec3};
    pub use crate::geometry::{
        CeilingPolygon, Door, FloorPolygon, GeometryIndex, LevelGeometry, MeshInstance,
        OcclusionSource, Wall,
    };
    pub use crate::gi::{FrameStats, IndirectLighting, ProbeLattice, SurfaceCloud};
    pub use crate::lighting::{Light, LightId, LightKind, LightSet};
}
