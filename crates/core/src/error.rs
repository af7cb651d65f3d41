// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by the job model and driver

use crate::job::JobStatus;
use crate::registry::PipelineType;
use thiserror::Error;

/// Rejections raised at the call boundary. Nothing is changed when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("regeneration comment must not be empty")]
    EmptyComment,
    #[error("at least one scene must be selected for approval")]
    EmptyApproval,
    #[error("scene not found: {0}")]
    SceneNotFound(String),
    #[error("job {job_id} has no scenes")]
    NoScenes { job_id: String },
    #[error("job {job_id} is {actual}, expected {expected}")]
    InvalidStatus {
        job_id: String,
        actual: JobStatus,
        expected: &'static str,
    },
    #[error("stages of job {job_id} do not match the {pipeline} pipeline")]
    StagesMismatch {
        job_id: String,
        pipeline: PipelineType,
    },
    #[error("invalid generation settings: {0}")]
    InvalidSettings(String),
}

/// Configuration errors. These are fatal for the job they affect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown pipeline type: {0}")]
    UnknownPipeline(String),
}

/// Failure reported by a stage's simulated work
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StageFailure {
    pub message: String,
}

impl StageFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
