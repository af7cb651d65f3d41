// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job data model
//!
//! A job is one run of a pipeline. Its stage list is copied from the registry
//! when the job is created and is never reordered afterwards.

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::patch::JobPatch;
use crate::registry::{PipelineStage, PipelineType};
use crate::scene::Scene;
use crate::settings::{GenerationOverrides, GenerationSettings, JobConfig, ModelChoices};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a job
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        JobId(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

/// Lifecycle status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Queued,
    Processing,
    AwaitingSceneReview,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Processing => "Processing",
            JobStatus::AwaitingSceneReview => "AwaitingSceneReview",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
            JobStatus::Cancelled => "Cancelled",
        }
    }

    /// No driver will ever touch the job again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Queued or being driven
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Processing)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Pending => "pending",
            StageStatus::Running => "running",
            StageStatus::Completed => "completed",
            StageStatus::Failed => "failed",
        };
        f.pad(s)
    }
}

/// Progress of one stage within a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    pub stage_id: String,
    pub status: StageStatus,
    /// Percent complete, 0 to 100
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<BTreeMap<String, serde_json::Value>>,
}

impl StageProgress {
    pub fn pending(stage: &PipelineStage) -> Self {
        Self {
            stage_id: stage.id.to_string(),
            status: StageStatus::Pending,
            progress: 0,
            started_at: None,
            completed_at: None,
            error: None,
            outputs: None,
        }
    }
}

/// Submission data for a new job
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewJob {
    pub blueprint_id: String,
    pub idea_id: String,
    pub pipeline_type: Option<PipelineType>,
    pub variables: BTreeMap<String, String>,
    pub models: ModelChoices,
    pub prompt_template: String,
    pub generation_settings: GenerationOverrides,
}

impl NewJob {
    pub fn new(pipeline_type: PipelineType) -> Self {
        Self {
            pipeline_type: Some(pipeline_type),
            ..Default::default()
        }
    }
}

/// A content-generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub blueprint_id: String,
    pub idea_id: String,
    pub pipeline_type: PipelineType,
    pub status: JobStatus,
    pub current_stage_index: usize,
    pub stages: Vec<StageProgress>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub config: JobConfig,
    #[serde(default)]
    pub outputs: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenes: Option<Vec<Scene>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Create a queued job with stages initialized from the registry
    pub fn new(
        id: impl Into<JobId>,
        new: NewJob,
        clock: &impl Clock,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let pipeline_type = new.pipeline_type.ok_or_else(|| {
            ValidationError::InvalidSettings("pipelineType is required".to_string())
        })?;
        let generation_settings = GenerationSettings::resolve(new.generation_settings)?;
        Ok(Self {
            id,
            blueprint_id: new.blueprint_id,
            idea_id: new.idea_id,
            pipeline_type,
            status: JobStatus::Queued,
            current_stage_index: 0,
            stages: pipeline_type
                .stages()
                .iter()
                .map(StageProgress::pending)
                .collect(),
            variables: new.variables,
            config: JobConfig {
                models: new.models,
                prompt_template: new.prompt_template,
                generation_settings,
            },
            outputs: BTreeMap::new(),
            scenes: None,
            created_at: clock.now(),
            started_at: None,
            completed_at: None,
            error: None,
        })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.config.generation_settings
    }

    /// Stage ids and order equal the registry's for this pipeline
    pub fn stages_match_registry(&self) -> bool {
        let defs = self.pipeline_type.stages();
        defs.len() == self.stages.len()
            && defs
                .iter()
                .zip(&self.stages)
                .all(|(def, stage)| def.id == stage.stage_id)
    }

    /// Check that a job may be handed to the engine
    pub fn check_submittable(&self) -> Result<(), ValidationError> {
        if self.status != JobStatus::Queued {
            return Err(ValidationError::InvalidStatus {
                job_id: self.id.to_string(),
                actual: self.status,
                expected: "Queued",
            });
        }
        if !self.stages_match_registry() {
            return Err(ValidationError::StagesMismatch {
                job_id: self.id.to_string(),
                pipeline: self.pipeline_type,
            });
        }
        self.config.generation_settings.validate()
    }

    pub fn scenes(&self) -> &[Scene] {
        self.scenes.as_deref().unwrap_or(&[])
    }

    pub fn stage_index(&self, stage_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.stage_id == stage_id)
    }

    /// Index of the first failed stage, if any
    pub fn failed_stage(&self) -> Option<usize> {
        self.stages
            .iter()
            .position(|s| s.status == StageStatus::Failed)
    }

    /// Merge a partial update into this job.
    ///
    /// `stages` and `scenes` are replaced wholesale, `outputs` are merged by
    /// key, and every other field present in the patch overwrites.
    pub fn apply(&mut self, patch: &JobPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(index) = patch.current_stage_index {
            self.current_stage_index = index;
        }
        if let Some(stages) = &patch.stages {
            self.stages = stages.clone();
        }
        if let Some(scenes) = &patch.scenes {
            self.scenes = Some(scenes.clone());
        }
        if let Some(outputs) = &patch.outputs {
            for (key, value) in outputs {
                self.outputs.insert(key.clone(), value.clone());
            }
        }
        if let Some(started_at) = patch.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
        if let Some(error) = &patch.error {
            self.error = error.clone();
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
