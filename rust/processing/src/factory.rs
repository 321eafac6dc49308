// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene objects for accepted pipes.

use std::sync::Arc;

use pipe_placer_core::{InstanceFactory, PlacedPipe};
use pipe_placer_geometry::{Mesh, PipeGeometry};

use crate::error::Result;
use crate::scene::{ObjectData, Scene, SceneObject};

/// Base name of pipe objects
pub const PIPE_OBJECT_NAME: &str = "Pipe";

/// Realizes placed pipes as scene objects sharing one template mesh.
pub struct PipeInstanceFactory<'a> {
    scene: &'a mut Scene,
    template: Arc<Mesh>,
    created: Vec<(PlacedPipe, String)>,
}

impl<'a> PipeInstanceFactory<'a> {
    /// Build the pipe template once and prepare to add instances to `scene`.
    pub fn new(scene: &'a mut Scene, geometry: &PipeGeometry) -> Result<Self> {
        let template = geometry.build()?;
        tracing::debug!(
            vertices = template.vertex_count(),
            triangles = template.triangle_count(),
            "pipe template ready"
        );
        Ok(Self::with_template(scene, Arc::new(template)))
    }

    pub fn with_template(scene: &'a mut Scene, template: Arc<Mesh>) -> Self {
        Self {
            scene,
            template,
            created: Vec::new(),
        }
    }

    /// Names of the objects created so far, in creation order
    pub fn created(&self) -> impl Iterator<Item = &str> {
        self.created.iter().map(|(_, name)| name.as_str())
    }

    pub fn into_created(self) -> Vec<String> {
        self.created.into_iter().map(|(_, name)| name).collect()
    }
}

impl InstanceFactory for PipeInstanceFactory<'_> {
    fn realize(&mut self, pipe: &PlacedPipe) {
        let mut object = SceneObject::new(PIPE_OBJECT_NAME, ObjectData::Mesh(self.template.clone()));
        object.location = pipe.position.coords;
        object.rotation = pipe.orientation;

        let name = self.scene.add_object(object);
        tracing::trace!(%name, x = pipe.position.x, y = pipe.position.y, z = pipe.position.z, "pipe instance");
        self.created.push((*pipe, name));
    }

    fn discard(&mut self, pipe: &PlacedPipe) {
        let Some(index) = self.created.iter().rposition(|(placed, _)| placed == pipe) else {
            return;
        };
        let (_, name) = self.created.remove(index);
        self.scene.remove_object(&name);
        tracing::debug!(%name, "pipe instance discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipe_placer_core::{Point3, UnitQuaternion, Vector3};

    fn pipe_at(x: f64) -> PlacedPipe {
        PlacedPipe {
            position: Point3::new(x, 0.0, 0.0),
            normal: Vector3::z(),
            orientation: UnitQuaternion::identity(),
        }
    }

    #[test]
    fn instances_share_template() {
        let mut scene = Scene::new();
        let template = Arc::new(Mesh::grid_plane(1.0, 0));
        let mut factory = PipeInstanceFactory::with_template(&mut scene, template.clone());
        factory.realize(&pipe_at(0.0));
        factory.realize(&pipe_at(10.0));
        assert_eq!(factory.created().collect::<Vec<_>>(), vec!["Pipe", "Pipe.001"]);

        let second = scene.object("Pipe.001").unwrap();
        assert_eq!(second.location, Vector3::new(10.0, 0.0, 0.0));
        match &second.data {
            ObjectData::Mesh(mesh) => assert!(Arc::ptr_eq(mesh, &template)),
            ObjectData::Empty => panic!("pipe has no mesh"),
        }
    }

    #[test]
    fn discard_removes_matching_instance() {
        let mut scene = Scene::new();
        let mut factory =
            PipeInstanceFactory::with_template(&mut scene, Arc::new(Mesh::grid_plane(1.0, 0)));
        factory.realize(&pipe_at(0.0));
        factory.realize(&pipe_at(10.0));
        factory.discard(&pipe_at(0.0));
        factory.discard(&pipe_at(99.0));

        assert_eq!(factory.into_created(), vec!["Pipe.001".to_string()]);
        assert!(scene.object("Pipe").is_none());
        assert_eq!(scene.len(), 1);
    }
}
