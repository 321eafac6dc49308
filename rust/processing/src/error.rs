// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene operators.

use thiserror::Error;

use crate::report::{Report, ReportLevel};
use crate::scene::Mode;

/// Result type alias for operators.
pub type Result<T> = std::result::Result<T, Error>;

/// Operator errors.
///
/// Display strings are what the user sees in the report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    InvalidSelection(String),

    #[error("Please be in {expected} Mode (currently in {found} Mode)")]
    WrongMode { expected: Mode, found: Mode },

    #[error("Please select faces to convert.")]
    NothingSelected,

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Placement(#[from] pipe_placer_core::Error),

    #[error(transparent)]
    Geometry(#[from] pipe_placer_geometry::Error),
}

impl Error {
    /// Selection error for operators that need an active mesh.
    pub fn no_mesh_selected() -> Self {
        Error::InvalidSelection("Please select a mesh object!".to_string())
    }

    /// User-facing report for this error.
    pub fn report(&self) -> Report {
        match self {
            Error::InvalidSelection(_) | Error::WrongMode { .. } | Error::NothingSelected => {
                Report::new(ReportLevel::Warning, self.to_string())
            }
            Error::Placement(pipe_placer_core::Error::NoSeedCandidate) => Report::new(
                ReportLevel::Warning,
                "Couldn't find a suitable location for the second pipe!",
            ),
            Error::Placement(pipe_placer_core::Error::EmptySurface) => {
                Report::new(ReportLevel::Warning, "Selected mesh has no vertices!")
            }
            Error::InvalidSettings(_) | Error::Placement(_) | Error::Geometry(_) => {
                Report::new(ReportLevel::Error, self.to_string())
            }
        }
    }
}
