// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Candidate search over surface vertices.
//!
//! Two entry points:
//! - [`find_next`] picks a vertex at the ideal spacing from a list of
//!   reference positions (used for the second pipe).
//! - [`find_best_points`] completes an equilateral triangle on a pipe pair,
//!   once on each side of the pair.
//!
//! Vertices are scanned in snapshot order. On equal scores the first vertex
//! scanned wins, so results are deterministic for a given input order.

use nalgebra::{Point3, Vector3};

use crate::config::PerpendicularMode;
use crate::primitives::{distance, intersects, perpendicular_tangent, perpendicular_xy, within_tolerance};
use crate::surface::SurfaceVertex;

/// `sqrt(3) / 2`, height of an equilateral triangle with unit side.
const EQUILATERAL_HEIGHT: f64 = 0.866_025_403_784_438_6;

/// Spacing rules for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub outer_radius: f64,
    pub tolerance: f64,
    pub perpendicular: PerpendicularMode,
}

impl SearchParams {
    pub fn new(outer_radius: f64, tolerance: f64) -> Self {
        Self {
            outer_radius,
            tolerance,
            perpendicular: PerpendicularMode::PlanarXy,
        }
    }

    pub fn with_perpendicular(mut self, mode: PerpendicularMode) -> Self {
        self.perpendicular = mode;
        self
    }

    #[inline]
    pub fn ideal_distance(&self) -> f64 {
        self.outer_radius * 2.0
    }
}

/// Finds the vertex that sits at the ideal spacing from every reference.
///
/// A vertex qualifies when its distance to each of `previous` is within
/// tolerance of `2 * outer_radius`. Among those, the one whose distance to the
/// last reference is closest to ideal is returned.
pub fn find_next<'a>(
    previous: &[Point3<f64>],
    vertices: &'a [SurfaceVertex],
    params: &SearchParams,
) -> Option<&'a SurfaceVertex> {
    let last = previous.last()?;
    let ideal = params.ideal_distance();

    let mut best: Option<&SurfaceVertex> = None;
    let mut best_diff = f64::INFINITY;

    for vertex in vertices {
        let suitable = previous
            .iter()
            .all(|p| within_tolerance(distance(&vertex.position, p), ideal, params.tolerance));
        if !suitable {
            continue;
        }

        let diff = (distance(&vertex.position, last) - ideal).abs();
        if diff < best_diff {
            best = Some(vertex);
            best_diff = diff;
        }
    }

    best
}

/// Result of a triangle completion on one pipe pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairCandidates {
    /// Vertex nearest the apex on the perpendicular side.
    pub third: Option<SurfaceVertex>,
    /// Vertex nearest the mirrored apex. Always `None` when `third` is.
    pub fourth: Option<SurfaceVertex>,
}

impl PairCandidates {
    /// Candidates in evaluation order: third, then fourth.
    pub fn iter(&self) -> impl Iterator<Item = &SurfaceVertex> {
        self.third.iter().chain(self.fourth.iter())
    }
}

/// Completes the equilateral triangle on `p1`, `p2` on both sides.
///
/// The third point is the vertex nearest the ideal apex among vertices that
/// intersect neither `p1` nor `p2`. The fourth is the vertex nearest the
/// mirrored apex among vertices that also avoid the chosen third point.
/// If no third point exists, no fourth is searched.
///
/// `p1_normal` is only consulted in [`PerpendicularMode::TangentPlane`].
pub fn find_best_points(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p1_normal: &Vector3<f64>,
    vertices: &[SurfaceVertex],
    params: &SearchParams,
) -> PairCandidates {
    let offset = p2 - p1;
    let direction = match offset.try_normalize(1e-12) {
        Some(d) => d,
        None => return PairCandidates::default(),
    };

    let perpendicular = match params.perpendicular {
        PerpendicularMode::PlanarXy => perpendicular_xy(&direction),
        PerpendicularMode::TangentPlane => perpendicular_tangent(&direction, p1_normal)
            .unwrap_or_else(|| perpendicular_xy(&direction)),
    };

    let midpoint = nalgebra::center(p1, p2);
    let height = offset.norm() * EQUILATERAL_HEIGHT;
    let apex = midpoint + perpendicular * height;
    let mirrored_apex = midpoint - perpendicular * height;

    let radius = params.outer_radius;

    let third = nearest(
        vertices
            .iter()
            .filter(|v| !intersects(&v.position, p1, radius) && !intersects(&v.position, p2, radius)),
        &apex,
    );

    let Some(third) = third else {
        return PairCandidates::default();
    };

    let fourth = nearest(
        vertices.iter().filter(|v| {
            [p1, p2, &third.position]
                .iter()
                .all(|pos| !intersects(&v.position, pos, radius))
        }),
        &mirrored_apex,
    );

    PairCandidates {
        third: Some(*third),
        fourth: fourth.copied(),
    }
}

/// Vertex closest to `target`, first one on ties.
fn nearest<'a>(
    vertices: impl Iterator<Item = &'a SurfaceVertex>,
    target: &Point3<f64>,
) -> Option<&'a SurfaceVertex> {
    vertices
        .map(|v| (v, distance(&v.position, target)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(v, _)| v)
}
