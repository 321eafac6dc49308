// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene glue for pipe placement
//!
//! A small scene model with an active object, object/edit modes and face
//! selection, the user's [`PipeSettings`], and the operators that prepare a
//! surface and pack pipes onto it. Pipes are realized as scene objects by
//! [`PipeInstanceFactory`].

pub mod error;
pub mod factory;
pub mod operators;
pub mod report;
pub mod scene;
pub mod settings;

pub use error::{Error, Result};
pub use factory::{PipeInstanceFactory, PIPE_OBJECT_NAME};
pub use operators::{
    copy_selected_faces, create_pipe_instance, enter_edit_mode, place_pipes, subdivide_isosceles,
    try_copy_selected_faces, try_create_pipe_instance, try_enter_edit_mode, try_place_pipes,
    try_subdivide_isosceles, PlacementOutcome, DEFAULT_SUBDIVISION_CUTS,
};
pub use report::{OperatorResult, OperatorStatus, Report, ReportLevel};
pub use scene::{Mode, ObjectData, Scene, SceneObject};
pub use settings::PipeSettings;
