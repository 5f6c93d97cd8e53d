//! Room lighting demo
//!
//! Builds a single rectangular room with a warm ceiling light, runs the
//! per-frame indirect-lighting chain, and logs what the renderer would
//! see. Then moves the light across the room for a few frames to show
//! dirty-region invalidation keeping the per-frame work small.

use light_engine::prelude::*;

const ROOM_SIZE: f32 = 5.0;
const ROOM_HEIGHT: f32 = 2.4;

/// Build the demo room: four inward-facing walls, floor, and ceiling
fn build_room() -> LevelGeometry {
    let mut level = LevelGeometry::new();

    let corners = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(ROOM_SIZE, 0.0, 0.0),
        Vec3::new(ROOM_SIZE, 0.0, ROOM_SIZE),
        Vec3::new(0.0, 0.0, ROOM_SIZE),
    ];
    for i in 0..4 {
        level
            .walls
            .push(Wall::new(corners[i], corners[(i + 1) % 4], ROOM_HEIGHT));
    }

    level.floors.push(FloorPolygon::rect(
        Vec2::zeros(),
        Vec2::new(ROOM_SIZE, ROOM_SIZE),
        0.0,
    ));
    level.ceilings.push(CeilingPolygon::rect(
        Vec2::zeros(),
        Vec2::new(ROOM_SIZE, ROOM_SIZE),
        ROOM_HEIGHT,
    ));

    level
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Building demo room...");
    let level = build_room();

    let mut gi = IndirectLighting::new(GiConfig::default());
    gi.rebuild_geometry(&level);
    gi.rebuild_point_cloud_and_lattice(&level);
    log::info!(
        "Rebuilt: {} surface samples, {} valid probes",
        gi.cloud().len(),
        gi.lattice().valid_count()
    );

    let mut lights = LightSet::new();
    let lamp = lights.insert(Light::new(
        Vec3::new(ROOM_SIZE * 0.5, ROOM_HEIGHT - 0.2, ROOM_SIZE * 0.5),
        Light::default_color(),
        6.0,
        1.0,
    ));

    // First frame: the freshly spawned light floods the whole room
    let stats = gi.update(&mut lights);
    log::info!(
        "Frame 1: {} dirty samples, {} dirty probes",
        stats.dirty_samples,
        stats.dirty_probes
    );
    report_sample(&gi, Vec3::new(ROOM_SIZE * 0.5, 1.0, ROOM_SIZE * 0.5));
    report_sample(&gi, Vec3::new(0.5, 0.5, 0.5));

    // Quiet frame: nothing dirty, nothing recomputed
    let stats = gi.update(&mut lights);
    log::info!(
        "Frame 2 (idle): {} dirty samples, {} dirty probes",
        stats.dirty_samples,
        stats.dirty_probes
    );

    // Slide the light toward a corner over a few frames
    for frame in 3..8 {
        if let Some(light) = lights.get_mut(lamp) {
            light.position.x -= 0.4;
            light.position.z -= 0.4;
            light.dirty = true;
        }
        let stats = gi.update(&mut lights);
        log::info!(
            "Frame {frame} (moving light): {} dirty samples, {} dirty probes",
            stats.dirty_samples,
            stats.dirty_probes
        );
    }

    report_sample(&gi, Vec3::new(0.5, 0.5, 0.5));
    log::info!("Done");
}

/// Log the indirect light the renderer would read at a position
fn report_sample(gi: &IndirectLighting, position: Vec3) {
    let value = gi.sample_indirect(position);
    log::info!(
        "indirect at ({:.1}, {:.1}, {:.1}) = ({:.4}, {:.4}, {:.4})",
        position.x,
        position.y,
        position.z,
        value.x,
        value.y,
        value.z
    );
}
