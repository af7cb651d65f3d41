// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake content adapter for testing

use super::traits::{ContentAdapter, UnitArtifact};
use crate::error::StageFailure;
use crate::job::Job;
use crate::registry::PipelineStage;
use crate::scene::{Scene, SceneDraft, SceneUnit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded call to an adapter method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    CompleteStage {
        job_id: String,
        stage_id: String,
    },
    DescribeScene {
        job_id: String,
        index: usize,
    },
    GenerateUnit {
        job_id: String,
        scene_id: String,
        unit: SceneUnit,
    },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<AdapterCall>,
    stage_failures: HashMap<String, String>,
    unit_failures: HashMap<(usize, SceneUnit), String>,
}

/// Fake adapter with call recording and scripted failures
#[derive(Clone, Default)]
pub struct FakeContentAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeContentAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `stage_id` fail with `message` whenever it completes
    pub fn fail_stage(&self, stage_id: &str, message: &str) {
        self.lock()
            .stage_failures
            .insert(stage_id.to_string(), message.to_string());
    }

    /// Make one unit of the scene at `index` fail
    pub fn fail_unit(&self, index: usize, unit: SceneUnit, message: &str) {
        self.lock()
            .unit_failures
            .insert((index, unit), message.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.stage_failures.clear();
        state.unit_failures.clear();
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.lock().calls.clone()
    }

    /// Stage ids completed so far, in order
    pub fn completed_stages(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                AdapterCall::CompleteStage { stage_id, .. } => Some(stage_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Units generated so far as `(scene_id, unit)`, in order
    pub fn generated_units(&self) -> Vec<(String, SceneUnit)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                AdapterCall::GenerateUnit { scene_id, unit, .. } => Some((scene_id.clone(), *unit)),
                _ => None,
            })
            .collect()
    }
}

impl ContentAdapter for FakeContentAdapter {
    fn complete_stage(&self, job: &Job, stage: &PipelineStage) -> Result<String, StageFailure> {
        let mut state = self.lock();
        state.calls.push(AdapterCall::CompleteStage {
            job_id: job.id.to_string(),
            stage_id: stage.id.to_string(),
        });
        match state.stage_failures.get(stage.id) {
            Some(message) => Err(StageFailure::new(message.clone())),
            None => Ok(format!("{} result", stage.id)),
        }
    }

    fn describe_scene(&self, job: &Job, index: usize, total: usize) -> SceneDraft {
        self.lock().calls.push(AdapterCall::DescribeScene {
            job_id: job.id.to_string(),
            index,
        });
        SceneDraft {
            description: format!("scene {} of {}", index + 1, total),
            prompt: format!("prompt {}", index + 1),
        }
    }

    fn generate_unit(
        &self,
        job: &Job,
        scene: &Scene,
        unit: SceneUnit,
    ) -> Result<UnitArtifact, StageFailure> {
        let mut state = self.lock();
        state.calls.push(AdapterCall::GenerateUnit {
            job_id: job.id.to_string(),
            scene_id: scene.id.clone(),
            unit,
        });
        if let Some(message) = state.unit_failures.get(&(scene.index, unit)) {
            return Err(StageFailure::new(message.clone()));
        }
        Ok(UnitArtifact {
            url: Some(format!("fake://{}/{}", scene.id, unit)),
            script: (unit == SceneUnit::T2s).then(|| format!("script for {}", scene.id)),
        })
    }
}
