// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface preparation: face extraction and subdivision
//!
//! Placement only ever lands on existing vertices, so a coarse surface is
//! refined first. Each selected triangle is cut into a regular grid, then
//! every grid triangle is split into six around its centroid.

use nalgebra::Point3;

use crate::mesh::{Mesh, MeshBuilder};

/// Result of subdividing part of a mesh
#[derive(Debug, Clone)]
pub struct Subdivision {
    pub mesh: Mesh,
    /// Faces of `mesh` that came from the selected faces
    pub selected: Vec<usize>,
}

/// Copy the given faces into a new, welded mesh.
///
/// Out of range face indices are ignored.
pub fn extract_faces(mesh: &Mesh, faces: &[usize]) -> Mesh {
    let mut builder = MeshBuilder::new();
    for &face in faces {
        if face < mesh.triangle_count() {
            builder.triangle(mesh.triangle_points(face));
        }
    }
    builder.build()
}

/// Cut a triangle into `(cuts + 1)^2` similar triangles with the same winding.
pub fn grid_subdivide(corners: [Point3<f64>; 3], cuts: usize) -> Vec<[Point3<f64>; 3]> {
    let n = cuts + 1;
    let [a, b, c] = corners;
    let ab = (b - a) / n as f64;
    let ac = (c - a) / n as f64;
    let at = |i: usize, j: usize| a + ab * i as f64 + ac * j as f64;

    let mut out = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n - i {
            out.push([at(i, j), at(i + 1, j), at(i, j + 1)]);
            if i + j + 1 < n {
                out.push([at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]);
            }
        }
    }
    out
}

/// Split a triangle into six around its centroid through the edge midpoints.
pub fn split_around_centroid(corners: [Point3<f64>; 3]) -> [[Point3<f64>; 3]; 6] {
    let [a, b, c] = corners;
    let g = Point3::from((a.coords + b.coords + c.coords) / 3.0);
    let ab = nalgebra::center(&a, &b);
    let bc = nalgebra::center(&b, &c);
    let ca = nalgebra::center(&c, &a);

    [
        [a, ab, g],
        [ab, b, g],
        [b, bc, g],
        [bc, c, g],
        [c, ca, g],
        [ca, a, g],
    ]
}

/// Grid-subdivide the selected faces and split each piece around its centroid.
///
/// Unselected faces are carried over untouched. Normals are recomputed on the
/// result, and the returned selection covers every face made from the input
/// selection.
pub fn subdivide_isosceles(mesh: &Mesh, selected: &[usize], cuts: usize) -> Subdivision {
    let mut is_selected = vec![false; mesh.triangle_count()];
    for &face in selected {
        if let Some(flag) = is_selected.get_mut(face) {
            *flag = true;
        }
    }

    let mut builder = MeshBuilder::new();
    let mut new_selection = Vec::new();

    for (face, &flag) in is_selected.iter().enumerate() {
        let corners = mesh.triangle_points(face);
        if !flag {
            builder.triangle(corners);
            continue;
        }
        for piece in grid_subdivide(corners, cuts) {
            for part in split_around_centroid(piece) {
                new_selection.push(builder.triangle(part));
            }
        }
    }

    let mesh = builder.build();
    tracing::debug!(
        cuts,
        selected_faces = new_selection.len(),
        vertices = mesh.vertex_count(),
        "subdivided surface"
    );

    Subdivision {
        mesh,
        selected: new_selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn area(t: &[Point3<f64>; 3]) -> f64 {
        (t[1] - t[0]).cross(&(t[2] - t[0])).z / 2.0
    }

    fn unit() -> [Point3<f64>; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn grid_pieces_tile_the_triangle() {
        for cuts in 0..5 {
            let pieces = grid_subdivide(unit(), cuts);
            assert_eq!(pieces.len(), (cuts + 1) * (cuts + 1));

            let expected = 0.5 / ((cuts + 1) * (cuts + 1)) as f64;
            for piece in &pieces {
                assert_relative_eq!(area(piece), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn centroid_split_keeps_winding() {
        let parts = split_around_centroid(unit());
        let total: f64 = parts.iter().map(area).sum();
        assert_relative_eq!(total, 0.5, epsilon = 1e-12);
        for part in &parts {
            assert!(area(part) > 0.0);
        }
    }

    #[test]
    fn unselected_faces_survive() {
        let plane = Mesh::grid_plane(2.0, 0);
        let result = subdivide_isosceles(&plane, &[1], 1);

        // One face kept, the other cut into 4 and each of those into 6
        assert_eq!(result.mesh.triangle_count(), 1 + 4 * 6);
        assert_eq!(result.selected, (1..25).collect::<Vec<_>>());
    }

    #[test]
    fn extracted_faces_are_welded() {
        let plane = Mesh::grid_plane(1.0, 1);
        let copy = extract_faces(&plane, &[0, 1, 99]);
        assert_eq!(copy.triangle_count(), 2);
        assert_eq!(copy.vertex_count(), 4);
    }
}
