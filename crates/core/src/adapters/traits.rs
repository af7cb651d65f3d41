// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter trait definitions for content generation

use crate::error::StageFailure;
use crate::job::Job;
use crate::registry::PipelineStage;
use crate::scene::{Scene, SceneDraft, SceneUnit};

/// Output of one generation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitArtifact {
    pub url: Option<String>,
    /// Narration text, produced by the t2s unit only
    pub script: Option<String>,
}

/// Produces the work of each stage.
///
/// Calls happen inside the job store's critical section, so implementations
/// must return promptly and must not block on I/O.
pub trait ContentAdapter: Send + Sync {
    /// Finish a flat stage, returning its `outputs.result` text
    fn complete_stage(&self, job: &Job, stage: &PipelineStage) -> Result<String, StageFailure>;

    /// Text for scene `index` of `total` at scene breakdown
    fn describe_scene(&self, job: &Job, index: usize, total: usize) -> SceneDraft;

    /// Generate one unit of a scene
    fn generate_unit(
        &self,
        job: &Job,
        scene: &Scene,
        unit: SceneUnit,
    ) -> Result<UnitArtifact, StageFailure>;
}
