// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipe orientation from sampled surface normals.

use std::f64::consts::PI;

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::primitives::any_orthogonal;

/// Shortest rotation that maps `up` onto `target`.
///
/// Opposite vectors give a half turn about an axis perpendicular to `up`.
/// A zero `up` or `target` gives the identity.
pub fn rotation_between(up: &Vector3<f64>, target: &Vector3<f64>) -> UnitQuaternion<f64> {
    if up.norm() < 1e-12 || target.norm() < 1e-12 {
        return UnitQuaternion::identity();
    }

    if let Some(rotation) = UnitQuaternion::rotation_between(up, target) {
        return rotation;
    }

    // Antiparallel: nalgebra cannot pick the axis
    let axis = Unit::new_normalize(any_orthogonal(up));
    UnitQuaternion::from_axis_angle(&axis, PI)
}

/// Orientation of a pipe placed on a vertex with the given normal.
pub fn orient_to_normal(
    up: &Vector3<f64>,
    normal: &Vector3<f64>,
    invert_normal: bool,
) -> UnitQuaternion<f64> {
    let target = if invert_normal { -normal } else { *normal };
    rotation_between(up, &target)
}
