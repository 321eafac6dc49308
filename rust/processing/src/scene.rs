// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal scene model: named objects, an active object and an editing mode.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use pipe_placer_core::SurfaceSnapshot;
use pipe_placer_geometry::Mesh;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::settings::PipeSettings;

/// Interaction mode of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Object,
    Edit,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Object => write!(f, "Object"),
            Mode::Edit => write!(f, "Edit"),
        }
    }
}

/// Object payload. Mesh data is shared between linked copies.
#[derive(Debug, Clone)]
pub enum ObjectData {
    Mesh(Arc<Mesh>),
    Empty,
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub data: ObjectData,
    pub location: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    /// Selected face indices, meaningful in edit mode
    pub selected_faces: Vec<usize>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            data,
            location: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
            selected_faces: Vec::new(),
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name, ObjectData::Mesh(Arc::new(mesh)))
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.data {
            ObjectData::Mesh(mesh) => Some(mesh),
            ObjectData::Empty => None,
        }
    }

    /// Mutable mesh access, unsharing linked data first
    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.data {
            ObjectData::Mesh(mesh) => Some(Arc::make_mut(mesh)),
            ObjectData::Empty => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.data, ObjectData::Mesh(_))
    }

    /// Select every face of the mesh
    pub fn select_all_faces(&mut self) {
        let count = self.mesh().map_or(0, Mesh::triangle_count);
        self.selected_faces = (0..count).collect();
    }

    /// Local to world transform: translation, rotation, then scale
    pub fn matrix_world(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.location)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// World-space vertex snapshot of the mesh, `None` for non-mesh objects
    pub fn surface_snapshot(&self) -> Option<SurfaceSnapshot> {
        self.mesh().map(|mesh| {
            SurfaceSnapshot::from_slices(&mesh.positions, &mesh.normals, &self.matrix_world())
        })
    }
}

/// Objects, active object, mode and pipe settings
#[derive(Debug, Default)]
pub struct Scene {
    pub settings: PipeSettings,
    objects: Vec<SceneObject>,
    names: FxHashSet<String>,
    active: Option<String>,
    mode: Mode,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PipeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Add an object, renaming it if the name is taken. Returns the final name.
    pub fn add_object(&mut self, mut object: SceneObject) -> String {
        object.name = self.unique_name(&object.name);
        self.names.insert(object.name.clone());
        let name = object.name.clone();
        self.objects.push(object);
        name
    }

    pub fn remove_object(&mut self, name: &str) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.name == name)?;
        self.names.remove(name);
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        Some(self.objects.remove(index))
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Objects whose name is `base` or `base.NNN`
    pub fn objects_named<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a SceneObject> + 'a {
        self.objects
            .iter()
            .filter(move |o| base_name(&o.name) == base)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Make `name` the active object. Returns false if it does not exist.
    pub fn set_active(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            self.active = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_object(&self) -> Option<&SceneObject> {
        self.object(self.active.as_deref()?)
    }

    pub fn active_object_mut(&mut self) -> Option<&mut SceneObject> {
        let name = self.active.clone()?;
        self.object_mut(&name)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::trace!(from = %self.mode, to = %mode, "mode switch");
            self.mode = mode;
        }
    }

    /// `name` if it is free, otherwise the first free `name.NNN`.
    pub fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        let base = base_name(name);
        (1..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

/// Strip a trailing `.NNN` counter
fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, suffix)) if suffix.len() == 3 && suffix.bytes().all(|b| b.is_ascii_digit()) => {
            base
        }
        _ => name,
    }
}
