// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipe Placer CLI
//!
//! Builds a square plane, refines it with the isosceles subdivision and packs
//! pipes onto it with the settings from the environment. The placement is
//! printed to stdout as JSON; logs go to stderr.
//!
//! # Environment
//!
//! - `PIPE_INNER_RADIUS`, `PIPE_OUTER_RADIUS`, `PIPE_LENGTH` - millimetres
//! - `PIPE_INVERT_NORMAL` - `true` or `false`
//! - `PIPE_UNIT_SCALE` - millimetres to scene units
//! - `SURFACE_SIZE`, `SURFACE_CUTS` - plane side and subdivision cuts
//! - `RUST_LOG` - log filter, `info` by default

use anyhow::{bail, Context};
use pipe_placer_core::StopReason;
use pipe_placer_geometry::Mesh;
use pipe_placer_processing::{
    enter_edit_mode, subdivide_isosceles, try_place_pipes, OperatorResult, Scene, SceneObject,
    PIPE_OBJECT_NAME,
};
use serde::Serialize;

mod config;

use config::Config;

#[derive(Debug, Serialize)]
struct SurfaceSummary {
    vertices: usize,
    triangles: usize,
}

#[derive(Debug, Serialize)]
struct PipeRecord {
    name: String,
    location: [f64; 3],
    /// Quaternion as `[x, y, z, w]`
    rotation: [f64; 4],
}

#[derive(Debug, Serialize)]
struct PlacementOutput {
    surface: SurfaceSummary,
    passes: usize,
    stop: StopReason,
    pipes: Vec<PipeRecord>,
}

fn check(operator: &str, result: OperatorResult) -> anyhow::Result<()> {
    for report in &result.reports {
        tracing::info!(operator, level = ?report.level, "{}", report.message);
    }
    if !result.is_finished() {
        let message = result
            .reports
            .first()
            .map(|r| r.message.clone())
            .unwrap_or_default();
        bail!("{operator} cancelled: {message}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();

    tracing::info!(
        inner_radius = config.settings.inner_radius,
        outer_radius = config.settings.outer_radius,
        length = config.settings.length,
        invert_normal = config.settings.invert_normal,
        surface_size = config.surface_size,
        surface_cuts = config.surface_cuts,
        "Starting pipe placement"
    );

    let mut scene = Scene::with_settings(config.settings.clone());
    let plane = scene.add_object(SceneObject::with_mesh(
        "Plane",
        Mesh::grid_plane(config.surface_size, 0),
    ));
    scene.set_active(&plane);

    check("enter_edit_mode", enter_edit_mode(&mut scene))?;
    if let Some(object) = scene.active_object_mut() {
        object.select_all_faces();
    }
    check(
        "subdivide_isosceles",
        subdivide_isosceles(&mut scene, config.surface_cuts),
    )?;

    let outcome = try_place_pipes(&mut scene).context("pipe placement failed")?;

    let surface = scene
        .object(&plane)
        .and_then(SceneObject::mesh)
        .map(|mesh| SurfaceSummary {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
        })
        .context("surface object disappeared")?;

    let pipes = scene
        .objects_named(PIPE_OBJECT_NAME)
        .map(|object| {
            let q = object.rotation.quaternion();
            PipeRecord {
                name: object.name.clone(),
                location: [object.location.x, object.location.y, object.location.z],
                rotation: [q.i, q.j, q.k, q.w],
            }
        })
        .collect();

    let output = PlacementOutput {
        surface,
        passes: outcome.report.passes,
        stop: outcome.report.stop,
        pipes,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    tracing::info!(
        pipes = outcome.instances.len(),
        passes = outcome.report.passes,
        "Placement written"
    );
    Ok(())
}
