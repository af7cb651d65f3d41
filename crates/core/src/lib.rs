// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! studio-core: job model and driver for the Studio content engine
//!
//! This crate provides:
//! - The pipeline registry and the job/scene data model
//! - Pure scene-list operations
//! - The job driver as a pure step function over a job snapshot
//! - Clock, ticker, id and content adapter abstractions

pub mod adapters;
pub mod clock;
pub mod driver;
pub mod error;
pub mod id;
pub mod job;
pub mod patch;
pub mod registry;
pub mod scene;
pub mod settings;
pub mod ticker;

pub use adapters::{AdapterCall, ContentAdapter, FakeContentAdapter, SyntheticAdapter, UnitArtifact};
pub use clock::{Clock, FakeClock, SystemClock};
pub use driver::{approval_patch, retry_patch, Driver, Pacing, Step, Then};
pub use error::{ConfigError, StageFailure, ValidationError};
pub use id::{scene_id, IdGen, UuidIdGen};
pub use job::{Job, JobId, JobStatus, NewJob, StageProgress, StageStatus};
pub use patch::JobPatch;
pub use registry::{PipelineStage, PipelineType, SCENE_BREAKDOWN, SCENE_GENERATION};
pub use scene::{
    ApproveSelection, GenerationUnit, MoveDirection, Scene, SceneDraft, SceneOutput, SceneShape,
    SceneStatus, SceneUnit, SubStages, UnitStatus,
};
pub use settings::{GenerationOverrides, GenerationSettings, JobConfig, ModelChoices};
pub use ticker::{FakeTicker, Ticker, TokioTicker};
