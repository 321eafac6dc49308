// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar face triangulation
//!
//! CSG output comes back as planar polygons. Convex ones are fanned, anything
//! else goes through earcutr after projecting onto the face plane.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};

/// Triangulate a planar polygon, returning indices into `points`.
///
/// `normal` is the face normal the winding of the output should follow.
pub fn triangulate_face(points: &[Point3<f64>], normal: &Vector3<f64>) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(format!(
            "face has {n} corners, need at least 3"
        )));
    }
    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    let projected = project_onto_plane(points, normal);
    if is_convex(&projected) {
        return Ok((1..n - 1).flat_map(|i| [0, i, i + 1]).collect());
    }

    let flat: Vec<f64> = projected.iter().flat_map(|p| [p.x, p.y]).collect();
    let mut indices = earcutr::earcut(&flat, &[], 2)
        .map_err(|e| Error::TriangulationError(format!("{e:?}")))?;

    // earcutr normalizes ring orientation; put the winding back to CCW
    for tri in indices.chunks_exact_mut(3) {
        let (a, b, c) = (&projected[tri[0]], &projected[tri[1]], &projected[tri[2]]);
        if (b - a).perp(&(c - a)) < 0.0 {
            tri.swap(1, 2);
        }
    }
    Ok(indices)
}

/// Unit normal of a polygon by Newell's method, `None` if it is degenerate.
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let mut normal = Vector3::zeros();
    for (i, current) in points.iter().enumerate() {
        let next = &points[(i + 1) % points.len()];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal.try_normalize(1e-10)
}

/// 2D coordinates of `points` in a right-handed basis of the plane with `normal`.
fn project_onto_plane(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<Point2<f64>> {
    // Least aligned world axis keeps the basis well conditioned
    let reference = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Vector3::x()
    } else if normal.y.abs() <= normal.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = reference.cross(normal).normalize();
    let v = normal.cross(&u).normalize();

    let origin = points[0];
    points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(&u), d.dot(&v))
        })
        .collect()
}

/// All turns go the same way (collinear runs are ignored).
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    let mut sign = 0.0f64;
    for i in 0..n {
        let (a, b, c) = (&points[i], &points[(i + 1) % n], &points[(i + 2) % n]);
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross.abs() <= 1e-12 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if sign != cross.signum() {
            return false;
        }
    }
    sign > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(points: &[Point3<f64>], indices: &[usize], normal: &Vector3<f64>) -> f64 {
        indices
            .chunks(3)
            .map(|t| {
                let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
                (b - a).cross(&(c - a)).dot(normal) / 2.0
            })
            .sum()
    }

    #[test]
    fn triangle_passes_through() {
        let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert_eq!(triangulate_face(&points, &Vector3::z()).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn too_few_points_fail() {
        let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            triangulate_face(&points, &Vector3::z()),
            Err(Error::TriangulationError(_))
        ));
    }

    #[test]
    fn convex_quad_is_fanned() {
        // Unit square in the XZ plane, facing -Y
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let normal = polygon_normal(&points).unwrap();
        assert!((normal - (-Vector3::y())).norm() < 1e-12);

        let indices = triangulate_face(&points, &normal).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert!((signed_area(&points, &indices, &normal) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn concave_face_keeps_area_and_winding() {
        // L shape, area 3
        let points = [
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(2.0, 1.0, 2.0),
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(1.0, 2.0, 2.0),
            Point3::new(0.0, 2.0, 2.0),
        ];
        let normal = polygon_normal(&points).unwrap();
        let indices = triangulate_face(&points, &normal).unwrap();

        assert_eq!(indices.len(), 12);
        assert!((signed_area(&points, &indices, &normal) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_points_have_no_normal() {
        let points = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        assert!(polygon_normal(&points).is_none());
    }
}
