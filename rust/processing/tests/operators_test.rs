// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use pipe_placer_core::StopReason;
use pipe_placer_geometry::Mesh;
use pipe_placer_processing::{
    copy_selected_faces, create_pipe_instance, enter_edit_mode, place_pipes, subdivide_isosceles,
    try_place_pipes, Mode, OperatorStatus, PipeSettings, ReportLevel, Scene, SceneObject,
    DEFAULT_SUBDIVISION_CUTS, PIPE_OBJECT_NAME,
};

/// Settings where one millimetre is one scene unit
fn unit_settings() -> PipeSettings {
    PipeSettings {
        unit_scale: 1.0,
        ..PipeSettings::default()
    }
}

fn point_cloud(points: &[(f64, f64)]) -> Mesh {
    let mut mesh = Mesh::new();
    for &(x, y) in points {
        mesh.add_vertex(Point3::new(x, y, 0.0), Vector3::z());
    }
    mesh
}

fn scene_with_active(settings: PipeSettings, object: SceneObject) -> Scene {
    let mut scene = Scene::with_settings(settings);
    let name = scene.add_object(object);
    assert!(scene.set_active(&name));
    scene
}

fn pipe_locations(scene: &Scene) -> Vec<Vector3<f64>> {
    scene
        .objects_named(PIPE_OBJECT_NAME)
        .map(|o| o.location)
        .collect()
}

#[test]
fn place_pipes_needs_active_mesh() {
    let mut scene = Scene::new();
    let result = place_pipes(&mut scene);

    assert_eq!(result.status, OperatorStatus::Cancelled);
    assert_eq!(result.reports[0].level, ReportLevel::Warning);
    assert_eq!(result.reports[0].message, "Please select a mesh object!");
    assert!(scene.is_empty());
}

#[test]
fn place_pipes_completes_triangle() {
    let surface = point_cloud(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.6603)]);
    let mut scene = scene_with_active(unit_settings(), SceneObject::with_mesh("Surface", surface));

    let result = place_pipes(&mut scene);
    assert_eq!(result.status, OperatorStatus::Finished);
    assert_eq!(result.reports[0].level, ReportLevel::Info);
    assert_eq!(result.reports[0].message, "Placed 3 pipes in 2 passes");

    let names: Vec<_> = scene
        .objects_named(PIPE_OBJECT_NAME)
        .map(|o| o.name.clone())
        .collect();
    assert_eq!(names, vec!["Pipe", "Pipe.001", "Pipe.002"]);

    let locations = pipe_locations(&scene);
    assert_relative_eq!(locations[0], Vector3::zeros());
    assert_relative_eq!(locations[1], Vector3::new(10.0, 0.0, 0.0));
    assert_relative_eq!(locations[2], Vector3::new(5.0, 8.6603, 0.0), epsilon = 1e-5);

    // Normals are inverted by default, so every pipe points down into the surface
    for pipe in scene.objects_named(PIPE_OBJECT_NAME) {
        assert_relative_eq!(pipe.rotation * Vector3::z(), -Vector3::z(), epsilon = 1e-9);
    }

    assert_eq!(scene.mode(), Mode::Object);
    assert_eq!(scene.active_name(), Some("Surface"));
}

#[test]
fn missing_second_pipe_cancels_and_cleans_up() {
    let surface = point_cloud(&[(0.0, 0.0), (40.0, 0.0)]);
    let mut scene = scene_with_active(unit_settings(), SceneObject::with_mesh("Surface", surface));

    let result = place_pipes(&mut scene);
    assert_eq!(result.status, OperatorStatus::Cancelled);
    assert_eq!(
        result.reports[0].message,
        "Couldn't find a suitable location for the second pipe!"
    );
    assert_eq!(scene.objects_named(PIPE_OBJECT_NAME).count(), 0);
}

#[test]
fn invalid_settings_are_reported_as_errors() {
    let settings = PipeSettings {
        outer_radius: 0.5,
        ..PipeSettings::default()
    };
    let surface = point_cloud(&[(0.0, 0.0), (10.0, 0.0)]);
    let mut scene = scene_with_active(settings, SceneObject::with_mesh("Surface", surface));

    let result = place_pipes(&mut scene);
    assert_eq!(result.status, OperatorStatus::Cancelled);
    assert_eq!(result.reports[0].level, ReportLevel::Error);
    assert_eq!(scene.len(), 1);
}

#[test]
fn edit_operators_check_mode_and_selection() {
    let plane = SceneObject::with_mesh("Plane", Mesh::grid_plane(2.0, 0));
    let mut scene = scene_with_active(PipeSettings::default(), plane);

    let result = copy_selected_faces(&mut scene);
    assert_eq!(result.status, OperatorStatus::Cancelled);
    assert_eq!(
        result.reports[0].message,
        "Please be in Edit Mode (currently in Object Mode)"
    );

    assert!(enter_edit_mode(&mut scene).is_finished());
    assert_eq!(scene.mode(), Mode::Edit);

    let result = subdivide_isosceles(&mut scene, DEFAULT_SUBDIVISION_CUTS);
    assert_eq!(result.status, OperatorStatus::Cancelled);
    assert_eq!(result.reports[0].level, ReportLevel::Warning);
    assert_eq!(scene.object("Plane").unwrap().mesh().unwrap().triangle_count(), 2);
}

#[test]
fn enter_edit_mode_rejects_empty_objects() {
    let empty = SceneObject::new("Empty", pipe_placer_processing::ObjectData::Empty);
    let mut scene = scene_with_active(PipeSettings::default(), empty);

    let result = enter_edit_mode(&mut scene);
    assert_eq!(result.status, OperatorStatus::Cancelled);
    assert_eq!(scene.mode(), Mode::Object);
}

#[test]
fn create_pipe_instance_adds_active_pipe() {
    let mut scene = Scene::new();
    assert!(create_pipe_instance(&mut scene).is_finished());
    assert!(create_pipe_instance(&mut scene).is_finished());

    assert_eq!(scene.active_name(), Some("Pipe.001"));
    let pipe = scene.object("Pipe").unwrap();
    let (min, max) = pipe.mesh().unwrap().bounds();
    assert_relative_eq!(min.z, -0.02, epsilon = 1e-5);
    assert_relative_eq!(max.z, 0.0, epsilon = 1e-5);
}

#[test]
fn prepared_surface_is_packed() {
    let plane = SceneObject::with_mesh("Plane", Mesh::grid_plane(0.1, 0));
    let mut scene = scene_with_active(PipeSettings::default(), plane);

    assert!(enter_edit_mode(&mut scene).is_finished());
    scene.active_object_mut().unwrap().select_all_faces();
    assert!(subdivide_isosceles(&mut scene, DEFAULT_SUBDIVISION_CUTS).is_finished());

    let selected = scene.active_object().unwrap().selected_faces.len();
    assert_eq!(selected, 2 * 25 * 6);
    assert_eq!(scene.mode(), Mode::Edit);

    assert!(copy_selected_faces(&mut scene).is_finished());
    assert_eq!(scene.mode(), Mode::Object);
    let copy = scene.object("Plane.001").unwrap();
    assert_eq!(copy.mesh().unwrap().triangle_count(), selected);
    assert!(copy.selected_faces.is_empty());

    assert!(scene.set_active("Plane.001"));
    let outcome = try_place_pipes(&mut scene).unwrap();
    assert_eq!(outcome.report.pipes.len(), 18);
    assert_eq!(outcome.report.passes, 6);
    assert_eq!(outcome.report.stop, StopReason::PassLimit);
    assert_eq!(outcome.instances.len(), 18);

    let ideal = scene.settings.to_placement_config().ideal_distance();
    let locations = pipe_locations(&scene);
    for (i, a) in locations.iter().enumerate() {
        for b in &locations[i + 1..] {
            assert!((a - b).norm() >= ideal - 1e-9, "pipes at {a:?} and {b:?} overlap");
        }
    }

    let surface = scene.object("Plane.001").unwrap().surface_snapshot().unwrap();
    for location in &locations {
        assert!(surface
            .vertices()
            .iter()
            .any(|v| v.position.coords == *location));
    }
}

#[test]
fn settings_fill_missing_fields_from_defaults() {
    let settings: PipeSettings = serde_json::from_str(r#"{"outer_radius": 6.0}"#).unwrap();
    assert_relative_eq!(settings.outer_radius, 6.0);
    assert_relative_eq!(settings.inner_radius, 3.0);
    assert!(settings.invert_normal);
    assert!(settings.validate().is_ok());
}
