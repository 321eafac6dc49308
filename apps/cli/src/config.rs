// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use std::str::FromStr;

use pipe_placer_processing::{PipeSettings, DEFAULT_SUBDIVISION_CUTS};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pipe dimensions in millimetres.
    pub settings: PipeSettings,
    /// Side of the square surface, in scene units.
    pub surface_size: f64,
    /// Grid cuts used when subdividing the surface.
    pub surface_cuts: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = PipeSettings::default();
        Self {
            settings: PipeSettings {
                inner_radius: env_or("PIPE_INNER_RADIUS", defaults.inner_radius),
                outer_radius: env_or("PIPE_OUTER_RADIUS", defaults.outer_radius),
                length: env_or("PIPE_LENGTH", defaults.length),
                invert_normal: env_or("PIPE_INVERT_NORMAL", defaults.invert_normal),
                unit_scale: env_or("PIPE_UNIT_SCALE", defaults.unit_scale),
                ..defaults
            },
            surface_size: env_or("SURFACE_SIZE", 0.1),
            surface_cuts: env_or("SURFACE_CUTS", DEFAULT_SUBDIVISION_CUTS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
