// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for pipe placement.

use thiserror::Error;

/// Result type alias for placement operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a placement run.
///
/// A growth pass that adds nothing is not an error; it is reported as
/// [`StopReason::NoGrowth`](crate::StopReason::NoGrowth).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// No active mesh object, or the object is in the wrong mode.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// No surface vertex sits at the ideal distance from the seed.
    #[error("no suitable location for the second pipe")]
    NoSeedCandidate,

    /// The surface snapshot has no vertices.
    #[error("surface has no vertices")]
    EmptySurface,

    /// Placement configuration is out of range.
    #[error("invalid placement configuration: {0}")]
    InvalidConfig(String),
}
