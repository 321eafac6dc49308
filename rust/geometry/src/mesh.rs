// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use rustc_hash::FxHashMap;

/// Triangle mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Square plane in XY centered on the origin, facing +Z.
    ///
    /// `cuts` extra grid lines run across each side, so the plane has
    /// `(cuts + 1)^2` quads and twice as many triangles.
    pub fn grid_plane(size: f64, cuts: usize) -> Self {
        let n = cuts + 1;
        let half = size / 2.0;
        let step = size / n as f64;
        let mut mesh = Self::with_capacity((n + 1) * (n + 1), n * n * 6);

        for j in 0..=n {
            for i in 0..=n {
                let position = Point3::new(-half + i as f64 * step, -half + j as f64 * step, 0.0);
                mesh.add_vertex(position, Vector3::z());
            }
        }

        let row = (n + 1) as u32;
        for j in 0..n as u32 {
            for i in 0..n as u32 {
                let v00 = j * row + i;
                let v10 = v00 + 1;
                let v01 = v00 + row;
                let v11 = v01 + 1;
                mesh.add_triangle(v00, v10, v11);
                mesh.add_triangle(v00, v11, v01);
            }
        }

        mesh
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `index`
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3] as f64,
            self.positions[index * 3 + 1] as f64,
            self.positions[index * 3 + 2] as f64,
        )
    }

    /// Normal of vertex `index`, zero if the mesh carries no normals
    #[inline]
    pub fn normal(&self, index: usize) -> Vector3<f64> {
        match self.normals.get(index * 3..index * 3 + 3) {
            Some(n) => Vector3::new(n[0] as f64, n[1] as f64, n[2] as f64),
            None => Vector3::zeros(),
        }
    }

    /// Vertex indices of triangle `face`
    #[inline]
    pub fn triangle(&self, face: usize) -> [u32; 3] {
        [
            self.indices[face * 3],
            self.indices[face * 3 + 1],
            self.indices[face * 3 + 2],
        ]
    }

    /// Corner positions of triangle `face`
    #[inline]
    pub fn triangle_points(&self, face: usize) -> [Point3<f64>; 3] {
        self.triangle(face).map(|i| self.position(i as usize))
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Apply an affine transform in place.
    ///
    /// Normals go through the inverse-transpose of the linear part and are
    /// renormalized.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        for chunk in self.positions.chunks_exact_mut(3) {
            let p = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let t = matrix.transform_point(&p);
            chunk[0] = t.x as f32;
            chunk[1] = t.y as f32;
            chunk[2] = t.z as f32;
        }

        for chunk in self.normals.chunks_exact_mut(3) {
            let n = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let t = (normal_matrix * n).try_normalize(1e-12).unwrap_or(n);
            chunk[0] = t.x as f32;
            chunk[1] = t.y as f32;
            chunk[2] = t.z as f32;
        }
    }

    /// Recompute smooth vertex normals from the triangle faces.
    ///
    /// Face normals are area-weighted. Vertices used by no triangle get a
    /// zero normal.
    pub fn recalculate_normals(&mut self) {
        let vertex_count = self.vertex_count();
        let mut normals = vec![Vector3::<f64>::zeros(); vertex_count];

        for face in 0..self.triangle_count() {
            let [i0, i1, i2] = self.triangle(face).map(|i| i as usize);
            let [v0, v1, v2] = self.triangle_points(face);
            let normal = (v1 - v0).cross(&(v2 - v0));

            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        self.normals.clear();
        self.normals.reserve(vertex_count * 3);

        for normal in normals {
            let normalized = normal.try_normalize(1e-20).unwrap_or_else(Vector3::zeros);
            self.normals.push(normalized.x as f32);
            self.normals.push(normalized.y as f32);
            self.normals.push(normalized.z as f32);
        }
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a mesh while welding vertices that land on the same `f32` position.
///
/// Subdivision emits each shared corner once per triangle; welding keeps the
/// result a connected surface.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
    lookup: FxHashMap<[u32; 3], u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the vertex at `position`, adding it if it is new.
    pub fn vertex(&mut self, position: Point3<f64>) -> u32 {
        let key = [
            (position.x as f32).to_bits(),
            (position.y as f32).to_bits(),
            (position.z as f32).to_bits(),
        ];
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        let index = self.mesh.vertex_count() as u32;
        self.mesh.add_vertex(position, Vector3::zeros());
        self.lookup.insert(key, index);
        index
    }

    /// Add a triangle by corner positions, returning its face index.
    pub fn triangle(&mut self, corners: [Point3<f64>; 3]) -> usize {
        let [a, b, c] = corners.map(|p| self.vertex(p));
        self.mesh.add_triangle(a, b, c);
        self.mesh.triangle_count() - 1
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Finish the mesh with smooth normals
    pub fn build(mut self) -> Mesh {
        self.mesh.recalculate_normals();
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_add_vertex() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.positions, vec![1.0, 2.0, 3.0]);
        assert_eq!(mesh.normals, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_grid_plane_layout() {
        let mesh = Mesh::grid_plane(2.0, 3);
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.triangle_count(), 32);

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min, Point3::new(-1.0, -1.0, 0.0));
        assert_relative_eq!(max, Point3::new(1.0, 1.0, 0.0));

        for face in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle_points(face);
            assert!((b - a).cross(&(c - a)).z > 0.0);
        }
    }

    #[test]
    fn test_recalculate_normals_matches_winding() {
        let mut mesh = Mesh::grid_plane(1.0, 1);
        mesh.normals.iter_mut().for_each(|n| *n = 0.0);
        mesh.recalculate_normals();

        for i in 0..mesh.vertex_count() {
            assert_relative_eq!(mesh.normal(i), Vector3::z(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_transform_moves_positions_and_normals() {
        let mut mesh = Mesh::grid_plane(2.0, 0);
        let matrix = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 5.0))
            * Matrix4::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2);
        mesh.transform(&matrix);

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 4.0, epsilon = 1e-6);
        assert_relative_eq!(max.z, 6.0, epsilon = 1e-6);
        assert_relative_eq!(mesh.normal(0), -Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_builder_welds_shared_corners() {
        let mut builder = MeshBuilder::new();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        let d = Point3::new(0.0, 1.0, 0.0);
        builder.triangle([a, b, c]);
        builder.triangle([a, c, d]);

        let mesh = builder.build();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_relative_eq!(mesh.normal(1), Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_missing_normals_read_as_zero() {
        let mut mesh = Mesh::new();
        mesh.positions.extend_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(mesh.normal(0), Vector3::zeros());
    }
}
