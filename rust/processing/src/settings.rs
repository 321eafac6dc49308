// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-facing pipe settings, in millimetres.

use pipe_placer_core::{PlacementConfig, DEFAULT_TOLERANCE};
use pipe_placer_geometry::PipeGeometry;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest accepted radius or length, in millimetres
pub const MIN_DIMENSION: f64 = 1.0;

/// Accepted range of the import threshold
pub const THRESHOLD_RANGE: (f64, f64) = (-3500.0, 5000.0);

/// Pipe settings as edited by the user.
///
/// Dimensions are millimetres; `unit_scale` converts them to scene units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeSettings {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub length: f64,
    /// Point pipes against the sampled surface normal
    pub invert_normal: bool,
    /// Iso threshold for volume imports. Placement does not read it.
    pub threshold_value: f64,
    pub unit_scale: f64,
}

impl Default for PipeSettings {
    fn default() -> Self {
        Self {
            inner_radius: 3.0,
            outer_radius: 5.0,
            length: 20.0,
            invert_normal: true,
            threshold_value: -650.0,
            unit_scale: 0.001,
        }
    }
}

impl PipeSettings {
    pub fn validate(&self) -> Result<()> {
        let dimensions = [
            ("inner_radius", self.inner_radius),
            ("outer_radius", self.outer_radius),
            ("length", self.length),
        ];
        for (name, value) in dimensions {
            if value.is_nan() || value < MIN_DIMENSION {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be at least {MIN_DIMENSION} mm, got {value}"
                )));
            }
        }

        let (low, high) = THRESHOLD_RANGE;
        if !(low..=high).contains(&self.threshold_value) {
            return Err(Error::InvalidSettings(format!(
                "threshold_value must be within [{low}, {high}], got {}",
                self.threshold_value
            )));
        }

        if !(self.unit_scale.is_finite() && self.unit_scale > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "unit_scale must be positive, got {}",
                self.unit_scale
            )));
        }

        Ok(())
    }

    /// Engine configuration in scene units.
    ///
    /// The spacing tolerance is not scaled.
    pub fn to_placement_config(&self) -> PlacementConfig {
        PlacementConfig::new(
            self.inner_radius * self.unit_scale,
            self.outer_radius * self.unit_scale,
            self.length * self.unit_scale,
        )
        .with_invert_normal(self.invert_normal)
        .with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Pipe template dimensions in scene units.
    pub fn pipe_geometry(&self) -> PipeGeometry {
        PipeGeometry::new(
            self.inner_radius * self.unit_scale,
            self.outer_radius * self.unit_scale,
            self.length * self.unit_scale,
        )
    }
}
