//! Probe lattice
//!
//! A fixed axis-aligned grid of light probes spanning the level's bounding
//! volume. Validity is decided once at build time: a probe survives only
//! when it sits over a floor polygon and below the interior ceiling
//! cutoff. Invalid coordinates are excluded from the working set outright,
//! so per-frame cost tracks occupiable interior volume, not grid volume.

use crate::config::GiConfig;
use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::LevelGeometry;

/// Grid coordinate of a probe cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    /// Cell index along x
    pub x: u16,
    /// Cell index along y
    pub y: u16,
    /// Cell index along z
    pub z: u16,
}

impl GridCoord {
    /// Create a coordinate triple
    pub fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }
}

/// Masked 3D grid of indirect-light probes
#[derive(Debug)]
pub struct ProbeLattice {
    origin: Vec3,
    spacing: f32,
    dims: [usize; 3],
    valid: Vec<bool>,
    values: Vec<Vec3>,
    working_coords: Vec<GridCoord>,
    working_positions: Vec<Vec3>,
}

impl ProbeLattice {
    /// Create a zero-size lattice; every query returns the neutral value
    pub fn empty() -> Self {
        Self {
            origin: Vec3::zeros(),
            spacing: 1.0,
            dims: [0, 0, 0],
            valid: Vec::new(),
            values: Vec::new(),
            working_coords: Vec::new(),
            working_positions: Vec::new(),
        }
    }

    /// Build the lattice and its validity mask for a level
    ///
    /// Runs only on geometry rebuild. A coordinate is valid when some
    /// floor polygon's footprint contains its horizontal position, the
    /// floor lies at or below it, and it sits below the floor height plus
    /// the interior ceiling cutoff.
    pub fn build(level: &LevelGeometry, config: &GiConfig) -> Self {
        let bounds = level.bounds();
        if bounds.is_empty() {
            log::warn!("probe lattice built over empty geometry; emitting no probes");
            return Self::empty();
        }

        let spacing = config.lattice_spacing;
        let size = bounds.size();
        let dims = [
            (size.x / spacing).floor() as usize + 1,
            (size.y / spacing).floor() as usize + 1,
            (size.z / spacing).floor() as usize + 1,
        ];
        let cell_count = dims[0] * dims[1] * dims[2];

        let mut lattice = Self {
            origin: bounds.min,
            spacing,
            dims,
            valid: vec![false; cell_count],
            values: vec![Vec3::zeros(); cell_count],
            working_coords: Vec::new(),
            working_positions: Vec::new(),
        };

        for z in 0..dims[2] {
            for y in 0..dims[1] {
                for x in 0..dims[0] {
                    let coord = GridCoord::new(x as u16, y as u16, z as u16);
                    let position = lattice.world_position(coord);
                    if Self::is_interior(position, level, config) {
                        let index = lattice.flat_index(x, y, z);
                        lattice.valid[index] = true;
                        lattice.working_coords.push(coord);
                        lattice.working_positions.push(position);
                    }
                }
            }
        }

        log::info!(
            "probe lattice built: {}x{}x{} cells, {} valid",
            dims[0],
            dims[1],
            dims[2],
            lattice.working_coords.len()
        );
        lattice
    }

    fn is_interior(position: Vec3, level: &LevelGeometry, config: &GiConfig) -> bool {
        let horizontal = Vec2::new(position.x, position.z);
        level.floors.iter().any(|floor| {
            floor.height <= position.y
                && position.y < floor.height + config.interior_ceiling_cutoff
                && floor.contains_2d(horizontal)
        })
    }

    fn flat_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.dims[0] + z * self.dims[0] * self.dims[1]
    }

    /// Grid dimensions along x, y, z
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Number of valid probes in the working set
    pub fn valid_count(&self) -> usize {
        self.working_coords.len()
    }

    /// Whether a coordinate is part of the valid working set
    pub fn is_valid(&self, coord: GridCoord) -> bool {
        let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
        if x >= self.dims[0] || y >= self.dims[1] || z >= self.dims[2] {
            return false;
        }
        self.valid[self.flat_index(x, y, z)]
    }

    /// World position of a grid coordinate
    pub fn world_position(&self, coord: GridCoord) -> Vec3 {
        self.origin
            + Vec3::new(
                coord.x as f32 * self.spacing,
                coord.y as f32 * self.spacing,
                coord.z as f32 * self.spacing,
            )
    }

    /// Valid probe coordinates, in build order
    pub fn working_coords(&self) -> &[GridCoord] {
        &self.working_coords
    }

    /// World positions parallel to [`working_coords`](Self::working_coords)
    pub fn working_positions(&self) -> &[Vec3] {
        &self.working_positions
    }

    /// Stored indirect light at a coordinate
    pub fn value(&self, coord: GridCoord) -> Vec3 {
        let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
        if x >= self.dims[0] || y >= self.dims[1] || z >= self.dims[2] {
            return Vec3::zeros();
        }
        self.values[self.flat_index(x, y, z)]
    }

    /// Raw value storage, for change detection in callers
    pub fn values(&self) -> &[Vec3] {
        &self.values
    }

    /// Publish a batch of recomputed probe values
    ///
    /// Called by the frame coordinator after the propagation stage joins.
    pub(crate) fn publish_indirect_light(&mut self, updates: &[(GridCoord, Vec3)]) {
        for &(coord, value) in updates {
            let index = self.flat_index(coord.x as usize, coord.y as usize, coord.z as usize);
            self.values[index] = value;
        }
    }

    /// Trilinearly sample the lattice at a world position
    ///
    /// Invalid and out-of-bounds corners carry no weight; the remaining
    /// weights renormalize. Returns the neutral zero value when all eight
    /// surrounding cells are invalid.
    pub fn sample(&self, position: Vec3) -> Vec3 {
        if self.working_coords.is_empty() {
            return Vec3::zeros();
        }

        let rel = (position - self.origin) / self.spacing;
        let base = Vec3::new(rel.x.floor(), rel.y.floor(), rel.z.floor());
        let frac = rel - base;
        let (x0, y0, z0) = (base.x as i64, base.y as i64, base.z as i64);

        let mut accum = Vec3::zeros();
        let mut total_weight = 0.0;

        for corner in 0..8_usize {
            let dx = (corner & 1) as i64;
            let dy = ((corner >> 1) & 1) as i64;
            let dz = ((corner >> 2) & 1) as i64;

            let (cx, cy, cz) = (x0 + dx, y0 + dy, z0 + dz);
            if cx < 0
                || cy < 0
                || cz < 0
                || cx as usize >= self.dims[0]
                || cy as usize >= self.dims[1]
                || cz as usize >= self.dims[2]
            {
                continue;
            }
            let index = self.flat_index(cx as usize, cy as usize, cz as usize);
            if !self.valid[index] {
                continue;
            }

            let wx = if dx == 0 { 1.0 - frac.x } else { frac.x };
            let wy = if dy == 0 { 1.0 - frac.y } else { frac.y };
            let wz = if dz == 0 { 1.0 - frac.z } else { frac.z };
            let weight = wx * wy * wz;

            accum += self.values[index] * weight;
            total_weight += weight;
        }

        if total_weight <= f32::EPSILON {
            return Vec3::zeros();
        }
        accum / total_weight
    }
}

impl Default for ProbeLattice {
    fn default() -> Self {
        Self::empty()
    }
}
