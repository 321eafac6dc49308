// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World-space snapshot of a surface mesh.
//!
//! Positions and normals are kept side by side so that a selected vertex
//! always carries its own normal. Nothing is ever looked up by coordinates.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::{Error, Result};

/// One vertex of the surface in world space.
///
/// The normal is not guaranteed to be unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl SurfaceVertex {
    #[inline]
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

/// Immutable vertex table read once at the start of a placement run.
///
/// Order follows the source mesh and decides tie-breaks in the candidate
/// search. Duplicate positions are kept as-is.
#[derive(Debug, Clone, Default)]
pub struct SurfaceSnapshot {
    vertices: Vec<SurfaceVertex>,
}

impl SurfaceSnapshot {
    /// Wraps vertices that are already in world space.
    pub fn new(vertices: Vec<SurfaceVertex>) -> Self {
        Self { vertices }
    }

    /// Builds a snapshot from flat `[x, y, z, ...]` buffers in object space.
    ///
    /// Positions go through `world`, normals through the inverse transpose of
    /// its linear part so that non-uniform scale keeps them perpendicular to
    /// the surface. Missing normals become zero vectors.
    pub fn from_slices(positions: &[f32], normals: &[f32], world: &Matrix4<f64>) -> Self {
        let linear: Matrix3<f64> = world.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        let vertices = positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, p)| {
                let local = Point3::new(p[0] as f64, p[1] as f64, p[2] as f64);
                let position = world.transform_point(&local);

                let normal = normals
                    .get(i * 3..i * 3 + 3)
                    .map(|n| normal_matrix * Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64))
                    .unwrap_or_else(Vector3::zeros);

                SurfaceVertex::new(position, normal)
            })
            .collect();

        Self { vertices }
    }

    /// First vertex in mesh order, used as the default seed.
    pub fn seed(&self) -> Result<&SurfaceVertex> {
        self.vertices.first().ok_or(Error::EmptySurface)
    }

    #[inline]
    pub fn vertices(&self) -> &[SurfaceVertex] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl From<Vec<SurfaceVertex>> for SurfaceSnapshot {
    fn from(vertices: Vec<SurfaceVertex>) -> Self {
        Self::new(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_transform_keeps_coordinates() {
        let positions = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let normals = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let snapshot = SurfaceSnapshot::from_slices(&positions, &normals, &Matrix4::identity());

        assert_eq!(snapshot.len(), 2);
        assert_relative_eq!(snapshot.vertices()[1].position, Point3::new(4.0, 5.0, 6.0));
        assert_relative_eq!(snapshot.vertices()[1].normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn translation_moves_positions_but_not_normals() {
        let world = Matrix4::new_translation(&Vector3::new(10.0, 0.0, -2.0));
        let snapshot = SurfaceSnapshot::from_slices(&[0.0, 0.0, 0.0], &[0.0, 0.0, 1.0], &world);

        let v = snapshot.seed().unwrap();
        assert_relative_eq!(v.position, Point3::new(10.0, 0.0, -2.0));
        assert_relative_eq!(v.normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn non_uniform_scale_keeps_normals_perpendicular() {
        // Plane x + z = 0 with normal (1, 0, 1), stretched 2x along X
        let world = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let snapshot = SurfaceSnapshot::from_slices(&[1.0, 0.0, -1.0], &[1.0, 0.0, 1.0], &world);

        let v = snapshot.seed().unwrap();
        assert_relative_eq!(v.position, Point3::new(2.0, 0.0, -1.0));
        // The stretched tangent (2, 0, -1) must stay perpendicular
        assert_relative_eq!(v.normal.dot(&Vector3::new(2.0, 0.0, -1.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_normals_default_to_zero() {
        let snapshot = SurfaceSnapshot::from_slices(&[0.0, 0.0, 0.0], &[], &Matrix4::identity());
        assert_relative_eq!(snapshot.vertices()[0].normal, Vector3::zeros());
    }

    #[test]
    fn empty_surface_has_no_seed() {
        let snapshot = SurfaceSnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.seed(), Err(Error::EmptySurface));
    }
}
