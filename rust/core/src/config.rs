// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement configuration.
//!
//! All lengths are in scene units. Callers that store pipe dimensions in
//! millimetres scale them before building a [`PlacementConfig`].

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Allowed deviation from the ideal center-to-center distance.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Maximum number of growth passes per run.
pub const DEFAULT_MAX_PASSES: usize = 6;

/// How the sideways direction of a pipe pair is computed during
/// triangle completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PerpendicularMode {
    /// `(-d.y, d.x, 0)`: ignores Z, only meaningful on roughly horizontal
    /// patches.
    #[default]
    PlanarXy,
    /// `n x d` with `n` the surface normal sampled at the first pipe of the
    /// pair. Falls back to [`PerpendicularMode::PlanarXy`] when degenerate.
    TangentPlane,
}

/// Configuration for one placement run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementConfig {
    /// Inner (bore) radius of a pipe.
    pub inner_radius: f64,
    /// Outer radius of a pipe. Neighbors sit `2 * outer_radius` apart.
    pub outer_radius: f64,
    /// Pipe length along its local up axis.
    pub pipe_length: f64,
    /// Orient pipes along the negated surface normal.
    pub invert_normal: bool,
    /// Allowed deviation from [`PlacementConfig::ideal_distance`].
    pub tolerance: f64,
    /// Growth pass cap.
    pub max_passes: usize,
    /// Sideways direction used for triangle completion.
    pub perpendicular: PerpendicularMode,
    /// Local axis of the pipe instance that gets aligned to the normal.
    pub up_axis: Vector3<f64>,
    /// When the second pipe cannot be found, leave nothing realized.
    ///
    /// With `false` the first pipe is realized before the search and
    /// survives the failed run.
    pub rollback_on_seed_failure: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            inner_radius: 0.003,
            outer_radius: 0.005,
            pipe_length: 0.02,
            invert_normal: true,
            tolerance: DEFAULT_TOLERANCE,
            max_passes: DEFAULT_MAX_PASSES,
            perpendicular: PerpendicularMode::PlanarXy,
            up_axis: Vector3::z(),
            rollback_on_seed_failure: true,
        }
    }
}

impl PlacementConfig {
    /// Creates a configuration for the given radii and length with default
    /// tolerance, pass cap and orientation settings.
    pub fn new(inner_radius: f64, outer_radius: f64, pipe_length: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            pipe_length,
            ..Default::default()
        }
    }

    pub fn with_invert_normal(mut self, invert: bool) -> Self {
        self.invert_normal = invert;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_perpendicular(mut self, mode: PerpendicularMode) -> Self {
        self.perpendicular = mode;
        self
    }

    pub fn with_up_axis(mut self, up_axis: Vector3<f64>) -> Self {
        self.up_axis = up_axis;
        self
    }

    pub fn with_rollback_on_seed_failure(mut self, rollback: bool) -> Self {
        self.rollback_on_seed_failure = rollback;
        self
    }

    /// Target center-to-center spacing, `2 * outer_radius`.
    #[inline]
    pub fn ideal_distance(&self) -> f64 {
        self.outer_radius * 2.0
    }

    /// Checks that every length is finite and positive.
    ///
    /// `inner_radius < outer_radius` is expected but not enforced.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("inner_radius", self.inner_radius),
            ("outer_radius", self.outer_radius),
            ("pipe_length", self.pipe_length),
            ("tolerance", self.tolerance),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.max_passes == 0 {
            return Err(Error::InvalidConfig(
                "max_passes must be at least 1".to_string(),
            ));
        }

        if self.up_axis.norm() < 1e-12 || !self.up_axis.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidConfig(
                "up_axis must be a non-zero finite vector".to_string(),
            ));
        }

        if self.inner_radius >= self.outer_radius {
            tracing::warn!(
                inner_radius = self.inner_radius,
                outer_radius = self.outer_radius,
                "inner radius is not smaller than outer radius"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ideal_distance_is_twice_outer_radius() {
        let config = PlacementConfig::new(3.0, 5.0, 20.0);
        assert_relative_eq!(config.ideal_distance(), 10.0);
    }

    #[test]
    fn defaults_match_addon_properties() {
        let config = PlacementConfig::default();
        assert_relative_eq!(config.tolerance, 0.01);
        assert_eq!(config.max_passes, 6);
        assert!(config.invert_normal);
        assert_eq!(config.perpendicular, PerpendicularMode::PlanarXy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_lengths() {
        let config = PlacementConfig::new(3.0, 0.0, 20.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = PlacementConfig::new(3.0, 5.0, f64::NAN);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = PlacementConfig::new(3.0, 5.0, 20.0).with_max_passes(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn inner_larger_than_outer_is_tolerated() {
        let config = PlacementConfig::new(6.0, 5.0, 20.0);
        assert!(config.validate().is_ok());
    }
}
