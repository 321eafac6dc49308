// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement engine: seeds two pipes, then grows the packing by completing
//! equilateral triangles on pipe pairs at the ideal spacing.
//!
//! ```text
//! Seeding ──(second pipe found)──> Growing ──(pass adds nothing | pass cap)──> Done
//!    └──(no second pipe)──> error, run aborted
//! ```
//!
//! Every accepted pipe is handed to an [`InstanceFactory`] right away; the
//! engine never builds geometry itself.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::candidates::{find_best_points, find_next, SearchParams};
use crate::config::PlacementConfig;
use crate::error::{Error, Result};
use crate::orientation::orient_to_normal;
use crate::primitives::{distance, intersects, within_tolerance};
use crate::surface::{SurfaceSnapshot, SurfaceVertex};

/// One accepted pipe. Never mutated once placed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedPipe {
    /// Always equal to the position of some surface vertex.
    pub position: Point3<f64>,
    /// Normal sampled at that vertex, before any inversion.
    pub normal: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

/// Realizes placed pipes as host objects.
pub trait InstanceFactory {
    /// Creates one instance at the pipe's position and orientation.
    fn realize(&mut self, pipe: &PlacedPipe);

    /// Removes an instance created by [`InstanceFactory::realize`].
    fn discard(&mut self, _pipe: &PlacedPipe) {}
}

/// Record-only factory.
impl InstanceFactory for Vec<PlacedPipe> {
    fn realize(&mut self, pipe: &PlacedPipe) {
        self.push(*pipe);
    }

    fn discard(&mut self, pipe: &PlacedPipe) {
        if let Some(idx) = self.iter().rposition(|p| p == pipe) {
            self.remove(idx);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EngineState {
    Seeding,
    Growing,
    Done,
}

/// Why the growing phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// A pass accepted no new pipe.
    NoGrowth,
    /// The configured number of passes ran and the last one still grew.
    PassLimit,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementReport {
    /// Placed pipes in acceptance order, seed first.
    pub pipes: Vec<PlacedPipe>,
    /// Growth passes executed.
    pub passes: usize,
    pub stop: StopReason,
}

impl PlacementReport {
    pub fn positions(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.pipes.iter().map(|p| &p.position)
    }
}

/// Unordered index pairs already tried for triangle completion.
///
/// Only grows, and lives for one run.
#[derive(Debug, Clone, Default)]
pub struct CheckedPairSet {
    pairs: FxHashSet<(usize, usize)>,
}

impl CheckedPairSet {
    #[inline]
    fn key(i: usize, j: usize) -> (usize, usize) {
        if i <= j {
            (i, j)
        } else {
            (j, i)
        }
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.pairs.contains(&Self::key(i, j))
    }

    /// Returns `false` if the pair was already present.
    pub fn insert(&mut self, i: usize, j: usize) -> bool {
        self.pairs.insert(Self::key(i, j))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn clear(&mut self) {
        self.pairs.clear();
    }
}

/// Greedy pipe packing over one surface snapshot.
pub struct PlacementEngine<'s> {
    config: PlacementConfig,
    surface: &'s SurfaceSnapshot,
    params: SearchParams,
    state: EngineState,
    placed: Vec<PlacedPipe>,
    checked: CheckedPairSet,
    passes: usize,
}

impl<'s> PlacementEngine<'s> {
    /// Validates the configuration and binds the engine to a surface.
    pub fn new(config: PlacementConfig, surface: &'s SurfaceSnapshot) -> Result<Self> {
        config.validate()?;
        if surface.is_empty() {
            return Err(Error::EmptySurface);
        }

        let params = SearchParams::new(config.outer_radius, config.tolerance)
            .with_perpendicular(config.perpendicular);

        Ok(Self {
            config,
            surface,
            params,
            state: EngineState::Seeding,
            placed: Vec::new(),
            checked: CheckedPairSet::default(),
            passes: 0,
        })
    }

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Pipes accepted so far.
    #[inline]
    pub fn placed(&self) -> &[PlacedPipe] {
        &self.placed
    }

    #[inline]
    pub fn checked_pairs(&self) -> &CheckedPairSet {
        &self.checked
    }

    #[inline]
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Runs from the first vertex of the surface.
    pub fn run<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F) -> Result<PlacementReport> {
        let seed = *self.surface.seed()?;
        self.run_from(seed, factory)
    }

    /// Runs from an explicit seed vertex.
    ///
    /// Any state from an earlier run is discarded first.
    pub fn run_from<F: InstanceFactory + ?Sized>(
        &mut self,
        seed: SurfaceVertex,
        factory: &mut F,
    ) -> Result<PlacementReport> {
        self.reset();
        self.place_seed(seed, factory)?;

        let mut stop = StopReason::PassLimit;
        let mut keep_growing = true;
        while keep_growing && self.passes < self.config.max_passes {
            let added = self.grow_pass(factory);
            if added == 0 {
                stop = StopReason::NoGrowth;
                keep_growing = false;
            }
        }

        self.state = EngineState::Done;
        tracing::info!(
            placed = self.placed.len(),
            passes = self.passes,
            checked_pairs = self.checked.len(),
            ?stop,
            "Pipe placement finished"
        );

        Ok(PlacementReport {
            pipes: self.placed.clone(),
            passes: self.passes,
            stop,
        })
    }

    fn reset(&mut self) {
        self.state = EngineState::Seeding;
        self.placed.clear();
        self.checked.clear();
        self.passes = 0;
    }

    /// Seeding: first pipe on the seed, second at the ideal spacing from it.
    fn place_seed<F: InstanceFactory + ?Sized>(
        &mut self,
        seed: SurfaceVertex,
        factory: &mut F,
    ) -> Result<()> {
        let first = self.pipe_at(&seed);
        factory.realize(&first);
        self.placed.push(first);

        let second = find_next(&[seed.position], self.surface.vertices(), &self.params).copied();
        let Some(second) = second else {
            tracing::warn!(
                seed = ?seed.position,
                ideal_distance = self.config.ideal_distance(),
                rollback = self.config.rollback_on_seed_failure,
                "No surface vertex at the ideal spacing from the seed"
            );
            if self.config.rollback_on_seed_failure {
                factory.discard(&first);
                self.placed.clear();
            }
            return Err(Error::NoSeedCandidate);
        };

        let second = self.pipe_at(&second);
        factory.realize(&second);
        self.placed.push(second);

        tracing::debug!(
            first = ?first.position,
            second = ?second.position,
            "Seed pipes placed"
        );
        self.state = EngineState::Growing;
        Ok(())
    }

    /// One growth pass. Returns the number of pipes accepted.
    ///
    /// Pairs are collected once at the start of the pass; pipes accepted
    /// during the pass only become pair members in the next one, but they do
    /// block later candidates of the same pass.
    fn grow_pass<F: InstanceFactory + ?Sized>(&mut self, factory: &mut F) -> usize {
        if self.state != EngineState::Growing {
            return 0;
        }
        self.passes += 1;

        let ideal = self.config.ideal_distance();
        let tolerance = self.config.tolerance;

        let mut pairs: SmallVec<[(usize, usize); 16]> = SmallVec::new();
        for i in 0..self.placed.len() {
            for j in (i + 1)..self.placed.len() {
                if self.checked.contains(i, j) {
                    continue;
                }
                let d = distance(&self.placed[i].position, &self.placed[j].position);
                if within_tolerance(d, ideal, tolerance) {
                    pairs.push((i, j));
                }
            }
        }

        let mut added = 0;
        for (i, j) in pairs {
            self.checked.insert(i, j);

            let p1 = self.placed[i];
            let p2 = self.placed[j];
            let candidates = find_best_points(
                &p1.position,
                &p2.position,
                &p1.normal,
                self.surface.vertices(),
                &self.params,
            );

            for vertex in candidates.iter() {
                if self.is_free(&vertex.position) {
                    let pipe = self.pipe_at(vertex);
                    factory.realize(&pipe);
                    self.placed.push(pipe);
                    added += 1;
                }
            }
        }

        tracing::debug!(
            pass = self.passes,
            checked_pairs = self.checked.len(),
            added,
            total = self.placed.len(),
            "Growth pass complete"
        );
        added
    }

    fn is_free(&self, candidate: &Point3<f64>) -> bool {
        self.placed
            .iter()
            .all(|p| !intersects(&p.position, candidate, self.config.outer_radius))
    }

    fn pipe_at(&self, vertex: &SurfaceVertex) -> PlacedPipe {
        PlacedPipe {
            position: vertex.position,
            normal: vertex.normal,
            orientation: orient_to_normal(
                &self.config.up_axis,
                &vertex.normal,
                self.config.invert_normal,
            ),
        }
    }
}
