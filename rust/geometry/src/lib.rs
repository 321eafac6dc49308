// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipe Placer Geometry
//!
//! Triangle meshes for the placement surface and the pipes put on it:
//! grid planes, face extraction and subdivision for preparing a surface, and
//! hollow pipe solids built with csgrs and earcutr.

pub mod csg;
pub mod error;
pub mod mesh;
pub mod pipe;
pub mod subdivide;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector3};

pub use csg::subtract_mesh;
pub use error::{Error, Result};
pub use mesh::{Mesh, MeshBuilder};
pub use pipe::{cylinder, PipeGeometry, DEFAULT_BORE_OVERSHOOT, DEFAULT_SEGMENTS};
pub use subdivide::{
    extract_faces, grid_subdivide, split_around_centroid, subdivide_isosceles, Subdivision,
};
pub use triangulation::{polygon_normal, triangulate_face};
