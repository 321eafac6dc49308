// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector helpers shared by the candidate search and the engine.

use nalgebra::{Point3, Vector3};

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Relative slack below the contact distance that still counts as touching.
pub const CONTACT_EPSILON: f64 = 1e-9;

/// Whether a pipe at `candidate` would overlap a pipe at `existing`.
///
/// Strict: pipes exactly `2 * outer_radius` apart touch but do not intersect.
/// Distances short of contact by rounding noise, within [`CONTACT_EPSILON`]
/// of it, also touch.
#[inline]
pub fn intersects(existing: &Point3<f64>, candidate: &Point3<f64>, outer_radius: f64) -> bool {
    let contact = outer_radius * 2.0;
    distance(existing, candidate) < contact - contact * CONTACT_EPSILON
}

/// Whether `d` lies in `[ideal - tolerance, ideal + tolerance]`.
#[inline]
pub fn within_tolerance(d: f64, ideal: f64, tolerance: f64) -> bool {
    (d - ideal).abs() <= tolerance
}

/// In-plane perpendicular of a normalized direction, ignoring Z.
#[inline]
pub fn perpendicular_xy(direction: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-direction.y, direction.x, 0.0)
}

/// Perpendicular of `direction` inside the tangent plane of `normal`.
///
/// Returns `None` when the normal is zero or parallel to the direction.
/// For a `+Z` normal the result equals [`perpendicular_xy`].
#[inline]
pub fn perpendicular_tangent(
    direction: &Vector3<f64>,
    normal: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    normal.cross(direction).try_normalize(1e-12)
}

/// Any unit vector perpendicular to `v`.
pub(crate) fn any_orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    // Cross with the axis least aligned with v
    let reference = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&reference)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::x)
}
