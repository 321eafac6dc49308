// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Pipe Placer Core
//!
//! Greedy packing of cylindrical pipes over the vertices of a surface mesh.
//!
//! Pipes are placed on existing mesh vertices so that neighbors sit at
//! `2 * outer_radius` from each other. A run seeds one pipe, finds a second
//! at the ideal spacing, then grows outward by completing equilateral
//! triangles on every pipe pair at that spacing. Each pipe is oriented by the
//! surface normal sampled at its vertex.
//!
//! ```
//! use pipe_placer_core::{PlacedPipe, PlacementConfig, PlacementEngine, SurfaceSnapshot, SurfaceVertex};
//! use nalgebra::{Point3, Vector3};
//!
//! let surface = SurfaceSnapshot::new(vec![
//!     SurfaceVertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
//!     SurfaceVertex::new(Point3::new(10.0, 0.0, 0.0), Vector3::z()),
//!     SurfaceVertex::new(Point3::new(5.0, 8.6603, 0.0), Vector3::z()),
//! ]);
//! let config = PlacementConfig::new(3.0, 5.0, 20.0);
//!
//! let mut realized: Vec<PlacedPipe> = Vec::new();
//! let report = PlacementEngine::new(config, &surface)?.run(&mut realized)?;
//! assert_eq!(report.pipes.len(), 3);
//! # Ok::<(), pipe_placer_core::Error>(())
//! ```
//!
//! Geometry of the pipes themselves is out of scope here: accepted pipes are
//! handed to an [`InstanceFactory`].

pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod orientation;
pub mod primitives;
pub mod surface;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

pub use candidates::{find_best_points, find_next, PairCandidates, SearchParams};
pub use config::{PerpendicularMode, PlacementConfig, DEFAULT_MAX_PASSES, DEFAULT_TOLERANCE};
pub use engine::{
    CheckedPairSet, EngineState, InstanceFactory, PlacedPipe, PlacementEngine, PlacementReport,
    StopReason,
};
pub use error::{Error, Result};
pub use orientation::{orient_to_normal, rotation_between};
pub use primitives::{
    distance, intersects, perpendicular_tangent, perpendicular_xy, within_tolerance, CONTACT_EPSILON,
};
pub use surface::{SurfaceSnapshot, SurfaceVertex};
