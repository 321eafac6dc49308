// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hollow pipe solid
//!
//! A pipe is an outer cylinder with a through bore. Its axis is local +Z and
//! the solid spans `z` in `[-length, 0]`: the top rim sits on the placement
//! point and the body extends back along the axis.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::csg::subtract_mesh;
use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Segments around the circumference when none are given
pub const DEFAULT_SEGMENTS: usize = 32;

/// How far the bore cutter sticks out of each end, in scene units
pub const DEFAULT_BORE_OVERSHOOT: f64 = 0.1;

/// Dimensions of a pipe template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeGeometry {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub length: f64,
    pub segments: usize,
    /// Extra depth added to both ends of the bore cutter so the difference
    /// never works on coplanar caps
    pub bore_overshoot: f64,
}

impl PipeGeometry {
    pub fn new(inner_radius: f64, outer_radius: f64, length: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            length,
            segments: DEFAULT_SEGMENTS,
            bore_overshoot: DEFAULT_BORE_OVERSHOOT,
        }
    }

    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_bore_overshoot(mut self, overshoot: f64) -> Self {
        self.bore_overshoot = overshoot;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.outer_radius.is_finite() && self.outer_radius > 0.0) {
            return Err(Error::InvalidPipe(format!(
                "outer radius must be positive, got {}",
                self.outer_radius
            )));
        }
        if !(self.length.is_finite() && self.length > 0.0) {
            return Err(Error::InvalidPipe(format!(
                "length must be positive, got {}",
                self.length
            )));
        }
        if self.segments < 3 {
            return Err(Error::InvalidPipe(format!(
                "need at least 3 segments, got {}",
                self.segments
            )));
        }
        if self.inner_radius >= self.outer_radius {
            return Err(Error::InvalidPipe(format!(
                "inner radius {} leaves no wall inside outer radius {}",
                self.inner_radius, self.outer_radius
            )));
        }
        Ok(())
    }

    /// Build the pipe mesh.
    ///
    /// A non-positive inner radius yields a solid rod.
    pub fn build(&self) -> Result<Mesh> {
        self.validate()?;

        let mut outer = cylinder(self.outer_radius, self.length, self.segments);
        shift_z(&mut outer, -self.length / 2.0);

        if self.inner_radius <= 0.0 {
            return Ok(outer);
        }

        let mut bore = cylinder(
            self.inner_radius,
            self.length + 2.0 * self.bore_overshoot,
            self.segments,
        );
        shift_z(&mut bore, -self.length / 2.0);

        let pipe = subtract_mesh(&outer, &bore)?;
        tracing::debug!(
            inner_radius = self.inner_radius,
            outer_radius = self.outer_radius,
            length = self.length,
            triangles = pipe.triangle_count(),
            "built pipe template"
        );
        Ok(pipe)
    }
}

/// Closed cylinder along Z centered on the origin.
///
/// Caps and sides get their own vertices so every face keeps a flat cap
/// normal or a radial side normal.
pub fn cylinder(radius: f64, depth: f64, segments: usize) -> Mesh {
    let half = depth / 2.0;
    let ring: Vec<(f64, f64)> = (0..segments)
        .map(|i| {
            let angle = TAU * i as f64 / segments as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let mut mesh = Mesh::with_capacity(segments * 4 + 2, segments * 12);

    // Sides
    for &(c, s) in &ring {
        let normal = Vector3::new(c, s, 0.0);
        mesh.add_vertex(Point3::new(radius * c, radius * s, -half), normal);
        mesh.add_vertex(Point3::new(radius * c, radius * s, half), normal);
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (b0, t0) = (2 * i as u32, 2 * i as u32 + 1);
        let (b1, t1) = (2 * j as u32, 2 * j as u32 + 1);
        mesh.add_triangle(b0, b1, t1);
        mesh.add_triangle(b0, t1, t0);
    }

    // Caps
    for (z, normal) in [(half, Vector3::z()), (-half, -Vector3::z())] {
        let center = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(0.0, 0.0, z), normal);
        for &(c, s) in &ring {
            mesh.add_vertex(Point3::new(radius * c, radius * s, z), normal);
        }
        for i in 0..segments as u32 {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % segments as u32;
            if z > 0.0 {
                mesh.add_triangle(center, a, b);
            } else {
                mesh.add_triangle(center, b, a);
            }
        }
    }

    mesh
}

fn shift_z(mesh: &mut Mesh, dz: f64) {
    for chunk in mesh.positions.chunks_exact_mut(3) {
        chunk[2] = (chunk[2] as f64 + dz) as f32;
    }
}
