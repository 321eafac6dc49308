// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene operators.
//!
//! Every operator returns an [`OperatorResult`]; failures cancel the operator
//! with a report instead of surfacing an error. The `try_*` variants expose
//! the underlying [`Result`] for callers that want the details.

use std::sync::Arc;

use pipe_placer_core::{PlacementEngine, PlacementReport};
use pipe_placer_geometry::{extract_faces, subdivide};

use crate::error::{Error, Result};
use crate::factory::{PipeInstanceFactory, PIPE_OBJECT_NAME};
use crate::report::{OperatorResult, Report};
use crate::scene::{Mode, ObjectData, Scene, SceneObject};

/// Grid cuts per selected triangle edge
pub const DEFAULT_SUBDIVISION_CUTS: usize = 4;

/// What a placement run left in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementOutcome {
    pub report: PlacementReport,
    /// Names of the pipe objects, in placement order
    pub instances: Vec<String>,
}

fn finish<T>(
    operator: &str,
    result: Result<T>,
    report: impl FnOnce(&T) -> Option<Report>,
) -> OperatorResult {
    match result {
        Ok(value) => {
            let outcome = OperatorResult::finished();
            match report(&value) {
                Some(r) => outcome.with_report(r),
                None => outcome,
            }
        }
        Err(err) => {
            tracing::warn!(operator, %err, "operator cancelled");
            err.into()
        }
    }
}

fn active_mesh_object(scene: &Scene) -> Result<&SceneObject> {
    scene
        .active_object()
        .filter(|o| o.is_mesh())
        .ok_or_else(Error::no_mesh_selected)
}

fn require_mode(scene: &Scene, expected: Mode) -> Result<()> {
    if scene.mode() == expected {
        Ok(())
    } else {
        Err(Error::WrongMode {
            expected,
            found: scene.mode(),
        })
    }
}

/// Pack pipes over the vertices of the active mesh.
pub fn place_pipes(scene: &mut Scene) -> OperatorResult {
    finish("place_pipes", try_place_pipes(scene), |outcome| {
        Some(Report::info(format!(
            "Placed {} pipes in {} passes",
            outcome.report.pipes.len(),
            outcome.report.passes
        )))
    })
}

pub fn try_place_pipes(scene: &mut Scene) -> Result<PlacementOutcome> {
    let surface = active_mesh_object(scene)?
        .surface_snapshot()
        .ok_or_else(Error::no_mesh_selected)?;
    scene.settings.validate()?;
    let config = scene.settings.to_placement_config();
    let geometry = scene.settings.pipe_geometry();

    // Placement reads the whole mesh, not the edit selection
    scene.set_mode(Mode::Object);

    let mut engine = PlacementEngine::new(config, &surface)?;
    let mut factory = PipeInstanceFactory::new(scene, &geometry)?;
    let report = engine.run(&mut factory)?;
    let instances = factory.into_created();

    tracing::info!(
        pipes = instances.len(),
        passes = report.passes,
        stop = ?report.stop,
        "pipe placement finished"
    );
    Ok(PlacementOutcome { report, instances })
}

/// Switch the active mesh object into edit mode.
pub fn enter_edit_mode(scene: &mut Scene) -> OperatorResult {
    finish("enter_edit_mode", try_enter_edit_mode(scene), |_| None)
}

pub fn try_enter_edit_mode(scene: &mut Scene) -> Result<()> {
    active_mesh_object(scene)?;
    scene.set_mode(Mode::Edit);
    Ok(())
}

/// Copy the selected faces of the active mesh into a new object.
///
/// The copy keeps the source transform. The scene returns to object mode and
/// the source object stays active.
pub fn copy_selected_faces(scene: &mut Scene) -> OperatorResult {
    finish("copy_selected_faces", try_copy_selected_faces(scene), |_| None)
}

/// Returns the name of the new object.
pub fn try_copy_selected_faces(scene: &mut Scene) -> Result<String> {
    require_mode(scene, Mode::Edit)?;
    let source = active_mesh_object(scene)?;
    if source.selected_faces.is_empty() {
        return Err(Error::NothingSelected);
    }

    let mesh = source.mesh().map(|m| extract_faces(m, &source.selected_faces));
    let mut copy = SceneObject::new(
        source.name.clone(),
        mesh.map_or(ObjectData::Empty, |m| ObjectData::Mesh(Arc::new(m))),
    );
    copy.location = source.location;
    copy.rotation = source.rotation;
    copy.scale = source.scale;

    let name = scene.add_object(copy);
    scene.set_mode(Mode::Object);
    tracing::debug!(%name, "copied selected faces");
    Ok(name)
}

/// Refine the selected faces into small, evenly spaced triangles.
///
/// Each face is cut into a grid of `(cuts + 1)^2` triangles and each of those
/// is split in six around its centroid. The new faces stay selected.
pub fn subdivide_isosceles(scene: &mut Scene, cuts: usize) -> OperatorResult {
    finish(
        "subdivide_isosceles",
        try_subdivide_isosceles(scene, cuts),
        |_| None,
    )
}

/// Returns the number of faces now selected.
pub fn try_subdivide_isosceles(scene: &mut Scene, cuts: usize) -> Result<usize> {
    require_mode(scene, Mode::Edit)?;
    let object = active_mesh_object(scene)?;
    if object.selected_faces.is_empty() {
        return Err(Error::NothingSelected);
    }
    let mesh = object.mesh().ok_or_else(Error::no_mesh_selected)?;
    let result = subdivide::subdivide_isosceles(mesh, &object.selected_faces, cuts);

    let object = scene
        .active_object_mut()
        .ok_or_else(Error::no_mesh_selected)?;
    object.data = ObjectData::Mesh(Arc::new(result.mesh));
    object.selected_faces = result.selected;
    Ok(object.selected_faces.len())
}

/// Add one pipe at the origin and make it active.
pub fn create_pipe_instance(scene: &mut Scene) -> OperatorResult {
    finish("create_pipe_instance", try_create_pipe_instance(scene), |_| None)
}

/// Returns the name of the new pipe object.
pub fn try_create_pipe_instance(scene: &mut Scene) -> Result<String> {
    scene.settings.validate()?;
    let mesh = scene.settings.pipe_geometry().build()?;
    let name = scene.add_object(SceneObject::with_mesh(PIPE_OBJECT_NAME, mesh));
    scene.set_active(&name);
    Ok(name)
}
