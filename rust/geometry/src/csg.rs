// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean mesh operations backed by csgrs

use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
use csgrs::traits::CSG;
use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::{polygon_normal, triangulate_face};

/// Subtract `tool` from `host`.
///
/// An empty tool leaves the host untouched. Fails with [`Error::EmptyMesh`]
/// when nothing of the host survives.
pub fn subtract_mesh(host: &Mesh, tool: &Mesh) -> Result<Mesh> {
    if tool.is_empty() {
        return Ok(host.clone());
    }

    let host_csg = to_csgrs(host)?;
    let tool_csg = to_csgrs(tool)?;
    let result = from_csgrs(&host_csg.difference(&tool_csg));

    if result.triangle_count() == 0 {
        return Err(Error::EmptyMesh("difference removed the whole host".to_string()));
    }

    tracing::trace!(
        host_triangles = host.triangle_count(),
        tool_triangles = tool.triangle_count(),
        result_triangles = result.triangle_count(),
        "mesh difference"
    );
    Ok(result)
}

/// One csgrs polygon per non-degenerate triangle, carrying the face normal.
fn to_csgrs(mesh: &Mesh) -> Result<CSGMesh<()>> {
    let mut polygons = Vec::with_capacity(mesh.triangle_count());

    for face in 0..mesh.triangle_count() {
        let [v0, v1, v2] = mesh.triangle_points(face);
        // Zero-area triangles would feed NaN planes into the BSP
        let Some(normal) = (v1 - v0).cross(&(v2 - v0)).try_normalize(1e-10) else {
            continue;
        };

        let vertices = vec![
            Vertex::new(v0, normal),
            Vertex::new(v1, normal),
            Vertex::new(v2, normal),
        ];
        polygons.push(Polygon::new(vertices, None));
    }

    if polygons.is_empty() {
        return Err(Error::Csg(format!(
            "mesh with {} triangles has no usable faces",
            mesh.triangle_count()
        )));
    }

    Ok(CSGMesh::from_polygons(&polygons, None))
}

/// Flatten csgrs polygons back into a triangle mesh with flat normals.
fn from_csgrs(csg: &CSGMesh<()>) -> Mesh {
    let mut mesh = Mesh::new();

    for polygon in &csg.polygons {
        let vertices = &polygon.vertices;
        if vertices.len() < 3 {
            continue;
        }

        let points: Vec<Point3<f64>> = vertices.iter().map(|v| v.pos).collect();
        let normal = match vertices[0].normal.try_normalize(1e-10) {
            Some(n) if n.iter().all(|c| c.is_finite()) => n,
            _ => match polygon_normal(&points) {
                Some(n) => n,
                None => continue,
            },
        };

        let indices = match triangulate_face(&points, &normal) {
            Ok(indices) => indices,
            Err(err) => {
                tracing::debug!(corners = points.len(), %err, "skipping CSG polygon");
                continue;
            }
        };

        let base = mesh.vertex_count() as u32;
        for point in &points {
            mesh.add_vertex(*point, normal);
        }
        for tri in indices.chunks_exact(3) {
            mesh.add_triangle(base + tri[0] as u32, base + tri[1] as u32, base + tri[2] as u32);
        }
    }

    mesh
}
