// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job driver state machine
//!
//! [`Driver::step`] is a pure function of the job snapshot: it returns the next
//! partial update and how the caller should continue. Every bit of driver
//! position (current stage, ramp progress, the scene and unit being generated)
//! lives in the job itself, so any driver instance can pick a job up.

use crate::adapters::ContentAdapter;
use crate::error::ValidationError;
use crate::id;
use crate::job::{Job, JobStatus, StageProgress, StageStatus};
use crate::patch::JobPatch;
use crate::registry::{PipelineStage, SCENE_BREAKDOWN, SCENE_GENERATION};
use crate::scene::{self, ApproveSelection, Scene, SceneStatus, UnitStatus};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

const OUTPUT_CDN: &str = "https://cdn.studio.local";

/// Scales the simulated durations of stages and scene work
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    /// Multiplier on registry estimated durations; 0 disables waiting
    pub time_scale: f64,
    /// Progress increments per flat stage
    pub ticks_per_stage: u32,
    /// Simulated time to regenerate a scene, before scaling
    pub regeneration_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            ticks_per_stage: 10,
            regeneration_delay: Duration::from_secs(2),
        }
    }
}

impl Pacing {
    /// No simulated waiting at all
    pub fn instant() -> Self {
        Self {
            time_scale: 0.0,
            ..Self::default()
        }
    }

    fn ticks(&self) -> u32 {
        self.ticks_per_stage.clamp(1, 100)
    }

    fn scaled(&self, seconds: f64) -> Duration {
        let scaled = seconds * self.time_scale;
        if scaled.is_finite() && scaled > 0.0 {
            Duration::from_secs_f64(scaled)
        } else {
            Duration::ZERO
        }
    }

    /// Wait between progress increments of a flat stage
    pub fn tick(&self, stage: &PipelineStage) -> Duration {
        self.scaled(f64::from(stage.estimated_duration) / f64::from(self.ticks()))
    }

    /// Percent added per tick
    pub fn increment(&self) -> u8 {
        u8::try_from(100u32.div_ceil(self.ticks())).unwrap_or(100)
    }

    /// Time to generate one unit, splitting the stage estimate evenly
    pub fn unit_delay(&self, stage: &PipelineStage, scenes: usize, units: usize) -> Duration {
        let parts = (scenes.max(1) * units.max(1)) as f64;
        self.scaled(f64::from(stage.estimated_duration) / parts)
    }

    pub fn regeneration(&self) -> Duration {
        self.scaled(self.regeneration_delay.as_secs_f64())
    }
}

/// What the caller does after applying a step's patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Then {
    /// Step again immediately
    Continue,
    /// Step again after waiting
    Wait(Duration),
    /// Stop; the job waits for scene review
    Suspend,
    /// Stop; the job is terminal or no longer driven
    Finish,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub patch: Option<JobPatch>,
    pub then: Then,
}

impl Step {
    fn new(patch: JobPatch, then: Then) -> Self {
        Self {
            patch: Some(patch),
            then,
        }
    }

    fn stop(then: Then) -> Self {
        Self { patch: None, then }
    }

    /// The driver exits after this step
    pub fn is_final(&self) -> bool {
        matches!(self.then, Then::Suspend | Then::Finish)
    }
}

/// Advances one job through its pipeline
#[derive(Debug, Clone, Default)]
pub struct Driver {
    pacing: Pacing,
}

impl Driver {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing }
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// Compute the next update for `job`
    pub fn step(&self, job: &Job, adapter: &dyn ContentAdapter, now: DateTime<Utc>) -> Step {
        match job.status {
            JobStatus::Queued => return admit(job, now),
            JobStatus::Processing => {}
            JobStatus::AwaitingSceneReview => return Step::stop(Then::Suspend),
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled => {
                return Step::stop(Then::Finish)
            }
        }

        if !job.stages_match_registry() {
            tracing::error!(
                job_id = %job.id,
                pipeline = %job.pipeline_type,
                "stage list does not match the registry"
            );
            return fail_job(
                format!("stages do not match the {} pipeline", job.pipeline_type),
                now,
            );
        }

        let index = job.current_stage_index;
        let Some(def) = job.pipeline_type.stage(index) else {
            return complete_job(job, now);
        };
        let stage = &job.stages[index];
        match stage.status {
            StageStatus::Completed => Step::new(
                JobPatch::new().current_stage_index(index + 1),
                Then::Continue,
            ),
            StageStatus::Failed => {
                let message = stage
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("{} failed", def.name));
                fail_job(message, now)
            }
            StageStatus::Pending => self.start_stage(job, index, def, now),
            StageStatus::Running if is_scene_stage(job, def) => {
                self.scene_step(job, index, def, adapter, now)
            }
            StageStatus::Running => self.ramp(job, index, def, adapter, now),
        }
    }

    fn start_stage(&self, job: &Job, index: usize, def: &PipelineStage, now: DateTime<Utc>) -> Step {
        tracing::info!(job_id = %job.id, stage = def.id, "stage started");
        let mut stages = job.stages.clone();
        stages[index] = StageProgress {
            status: StageStatus::Running,
            started_at: Some(now),
            ..StageProgress::pending(def)
        };
        let then = if is_scene_stage(job, def) {
            Then::Continue
        } else {
            Then::Wait(self.pacing.tick(def))
        };
        Step::new(JobPatch::new().stages(stages), then)
    }

    fn ramp(
        &self,
        job: &Job,
        index: usize,
        def: &PipelineStage,
        adapter: &dyn ContentAdapter,
        now: DateTime<Utc>,
    ) -> Step {
        let current = job.stages[index].progress;
        let next = current.saturating_add(self.pacing.increment()).min(100);
        if next < 100 {
            tracing::debug!(job_id = %job.id, stage = def.id, progress = next, "tick");
            let mut stages = job.stages.clone();
            stages[index].progress = next;
            return Step::new(
                JobPatch::new().stages(stages),
                Then::Wait(self.pacing.tick(def)),
            );
        }
        self.complete_stage(job, index, def, adapter, now)
    }

    fn complete_stage(
        &self,
        job: &Job,
        index: usize,
        def: &PipelineStage,
        adapter: &dyn ContentAdapter,
        now: DateTime<Utc>,
    ) -> Step {
        let result = match adapter.complete_stage(job, def) {
            Ok(result) => result,
            Err(failure) => return fail_stage(job, index, None, failure.message, now),
        };
        tracing::info!(job_id = %job.id, stage = def.id, "stage completed");

        let mut stages = job.stages.clone();
        let stage = &mut stages[index];
        stage.status = StageStatus::Completed;
        stage.progress = 100;
        stage.completed_at = Some(now);
        stage.outputs = Some(BTreeMap::from([(
            "result".to_string(),
            Value::String(result),
        )]));
        let patch = JobPatch::new()
            .stages(stages)
            .current_stage_index(index + 1);

        if def.id != SCENE_BREAKDOWN || !job.pipeline_type.has_scene_review() {
            return Step::new(patch, Then::Continue);
        }

        let automated = job.settings().automated_mode;
        let scenes = match &job.scenes {
            Some(existing) => existing.clone(),
            None => plan_scenes(job, adapter, automated),
        };
        let patch = patch.scenes(scenes);
        if automated {
            Step::new(patch, Then::Continue)
        } else {
            tracing::info!(job_id = %job.id, "awaiting scene review");
            Step::new(patch.status(JobStatus::AwaitingSceneReview), Then::Suspend)
        }
    }

    fn scene_step(
        &self,
        job: &Job,
        index: usize,
        def: &PipelineStage,
        adapter: &dyn ContentAdapter,
        now: DateTime<Utc>,
    ) -> Step {
        let scenes = job.scenes();
        let selected = scenes.iter().filter(|s| s.status.is_selected()).count();

        if let Some(failed) = scenes.iter().find(|s| s.status == SceneStatus::Failed) {
            let message = failed
                .output
                .units()
                .into_iter()
                .find_map(|(_, unit)| unit.error.clone())
                .unwrap_or_else(|| format!("scene {} failed", failed.index + 1));
            return fail_stage(job, index, None, message, now);
        }

        if let Some(pos) = scenes.iter().position(|s| s.status == SceneStatus::Generating) {
            let scene = &scenes[pos];
            let Some((kind, unit)) = scene.output.next_unit() else {
                let mut next = scenes.to_vec();
                next[pos].status = SceneStatus::Completed;
                return Step::new(
                    self.with_progress(job, index, &next),
                    Then::Continue,
                );
            };

            match unit.status {
                UnitStatus::Pending => {
                    let mut next = scenes.to_vec();
                    if let Some(unit) = next[pos].output.unit_mut(kind) {
                        unit.status = UnitStatus::Generating;
                    }
                    let delay = self
                        .pacing
                        .unit_delay(def, selected, scene.output.unit_count());
                    tracing::debug!(job_id = %job.id, scene = %scene.id, unit = %kind, "generating");
                    Step::new(JobPatch::new().scenes(next), Then::Wait(delay))
                }
                UnitStatus::Generating => match adapter.generate_unit(job, scene, kind) {
                    Ok(artifact) => {
                        let mut next = scenes.to_vec();
                        let target = &mut next[pos];
                        if let Some(unit) = target.output.unit_mut(kind) {
                            unit.status = UnitStatus::Completed;
                            unit.url = artifact.url;
                            unit.script = artifact.script;
                            unit.error = None;
                        }
                        if target.output.next_unit().is_none() {
                            target.status = SceneStatus::Completed;
                            tracing::info!(job_id = %job.id, scene = %target.id, "scene completed");
                            return Step::new(
                                self.with_progress(job, index, &next),
                                Then::Continue,
                            );
                        }
                        Step::new(JobPatch::new().scenes(next), Then::Continue)
                    }
                    Err(failure) => {
                        let mut next = scenes.to_vec();
                        let target = &mut next[pos];
                        if let Some(unit) = target.output.unit_mut(kind) {
                            unit.status = UnitStatus::Failed;
                            unit.error = Some(failure.message.clone());
                        }
                        target.status = SceneStatus::Failed;
                        fail_stage(job, index, Some(next), failure.message, now)
                    }
                },
                UnitStatus::Failed | UnitStatus::Completed => {
                    let message = unit
                        .error
                        .clone()
                        .unwrap_or_else(|| format!("{} failed", kind));
                    let mut next = scenes.to_vec();
                    next[pos].status = SceneStatus::Failed;
                    fail_stage(job, index, Some(next), message, now)
                }
            }
        } else if let Some(pos) = scenes.iter().position(|s| s.status == SceneStatus::Approved) {
            let mut next = scenes.to_vec();
            next[pos].status = SceneStatus::Generating;
            tracing::info!(job_id = %job.id, scene = %next[pos].id, "scene generation started");
            Step::new(JobPatch::new().scenes(next), Then::Continue)
        } else {
            self.complete_stage(job, index, def, adapter, now)
        }
    }

    /// Scene list update plus the stage progress it implies
    fn with_progress(&self, job: &Job, index: usize, scenes: &[Scene]) -> JobPatch {
        let mut stages = job.stages.clone();
        let stage = &mut stages[index];
        stage.progress = stage.progress.max(scene_progress(scenes));
        JobPatch::new().scenes(scenes.to_vec()).stages(stages)
    }
}

/// Percent of selected scenes completed; 100 when none are selected
pub fn scene_progress(scenes: &[Scene]) -> u8 {
    let selected = scenes.iter().filter(|s| s.status.is_selected()).count();
    if selected == 0 {
        return 100;
    }
    let completed = scenes
        .iter()
        .filter(|s| s.status == SceneStatus::Completed)
        .count();
    u8::try_from(completed * 100 / selected).unwrap_or(100)
}

fn is_scene_stage(job: &Job, def: &PipelineStage) -> bool {
    def.id == SCENE_GENERATION && job.pipeline_type.has_scene_review()
}

fn admit(job: &Job, now: DateTime<Utc>) -> Step {
    tracing::info!(job_id = %job.id, pipeline = %job.pipeline_type, "job started");
    let mut patch = JobPatch::new().status(JobStatus::Processing);
    if job.started_at.is_none() {
        patch = patch.started_at(now);
    }
    Step::new(patch, Then::Continue)
}

fn plan_scenes(job: &Job, adapter: &dyn ContentAdapter, approved: bool) -> Vec<Scene> {
    let Some(shape) = job.pipeline_type.scene_shape() else {
        return Vec::new();
    };
    let settings = job.settings();
    let total = settings.number_of_scenes as usize;
    (0..total)
        .map(|i| {
            let mut scene = Scene::new(
                id::scene_id(&job.id, i),
                i,
                adapter.describe_scene(job, i, total),
                shape,
                settings.scene_duration(),
            );
            if approved {
                scene.status = SceneStatus::Approved;
            }
            scene
        })
        .collect()
}

fn fail_stage(
    job: &Job,
    index: usize,
    scenes: Option<Vec<Scene>>,
    message: String,
    now: DateTime<Utc>,
) -> Step {
    tracing::warn!(job_id = %job.id, stage = %job.stages[index].stage_id, error = %message, "stage failed");
    let mut stages = job.stages.clone();
    let stage = &mut stages[index];
    stage.status = StageStatus::Failed;
    stage.completed_at = Some(now);
    stage.error = Some(message.clone());

    let mut patch = JobPatch::new()
        .stages(stages)
        .status(JobStatus::Failed)
        .completed_at(now)
        .error(message);
    if let Some(scenes) = scenes {
        patch = patch.scenes(scenes);
    }
    Step::new(patch, Then::Finish)
}

fn fail_job(message: String, now: DateTime<Utc>) -> Step {
    Step::new(
        JobPatch::new()
            .status(JobStatus::Failed)
            .completed_at(now)
            .error(message),
        Then::Finish,
    )
}

fn complete_job(job: &Job, now: DateTime<Utc>) -> Step {
    let content = job
        .stages
        .iter()
        .filter_map(|s| s.outputs.as_ref()?.get("result")?.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let url = format!("{}/{}/{}", OUTPUT_CDN, job.pipeline_type, job.id);
    let mut patch = JobPatch::new()
        .status(JobStatus::Completed)
        .completed_at(now)
        .output("content", content);

    if job.pipeline_type.is_video() {
        patch = patch.output("videoUrl", format!("{}/final.mp4", url));
        let scenes = job.scenes();
        if !scenes.is_empty() {
            let summary: Vec<Value> = scenes
                .iter()
                .map(|scene| {
                    let clip = scene
                        .output
                        .units()
                        .into_iter()
                        .filter_map(|(_, unit)| unit.url.clone())
                        .last();
                    json!({
                        "id": scene.id,
                        "index": scene.index,
                        "description": scene.description,
                        "status": scene.status,
                        "url": clip,
                    })
                })
                .collect();
            patch = patch.output("scenes", summary);
        }
    }
    tracing::info!(job_id = %job.id, "job completed");
    Step::new(patch.output("url", url), Then::Finish)
}

/// Resume a job held at scene review.
///
/// Approves the selection, settles `scene_breakdown` as completed and puts
/// `scene_generation` in the running state so a fresh driver continues there.
pub fn approval_patch(
    job: &Job,
    selection: &ApproveSelection,
    now: DateTime<Utc>,
) -> Result<JobPatch, ValidationError> {
    if job.status != JobStatus::AwaitingSceneReview {
        return Err(ValidationError::InvalidStatus {
            job_id: job.id.to_string(),
            actual: job.status,
            expected: "AwaitingSceneReview",
        });
    }
    let scenes = job.scenes.as_deref().ok_or_else(|| ValidationError::NoScenes {
        job_id: job.id.to_string(),
    })?;
    let scenes = scene::approve_selected(scenes, selection)?;

    let (Some(breakdown), Some(generation)) = (
        job.stage_index(SCENE_BREAKDOWN),
        job.stage_index(SCENE_GENERATION),
    ) else {
        return Err(ValidationError::StagesMismatch {
            job_id: job.id.to_string(),
            pipeline: job.pipeline_type,
        });
    };

    let mut stages = job.stages.clone();
    let done = &mut stages[breakdown];
    done.status = StageStatus::Completed;
    done.progress = 100;
    done.completed_at.get_or_insert(now);
    let running = &mut stages[generation];
    running.status = StageStatus::Running;
    running.progress = 0;
    running.started_at = Some(now);
    running.completed_at = None;
    running.error = None;
    running.outputs = None;

    Ok(JobPatch::new()
        .scenes(scenes)
        .stages(stages)
        .status(JobStatus::Processing)
        .current_stage_index(generation))
}

/// Re-queue a failed job at the stage that failed
pub fn retry_patch(job: &Job) -> Result<JobPatch, ValidationError> {
    if job.status != JobStatus::Failed {
        return Err(ValidationError::InvalidStatus {
            job_id: job.id.to_string(),
            actual: job.status,
            expected: "Failed",
        });
    }
    let index = job
        .failed_stage()
        .unwrap_or(job.current_stage_index)
        .min(job.stages.len().saturating_sub(1));

    let mut stages = job.stages.clone();
    if let Some(stage) = stages.get_mut(index) {
        stage.status = StageStatus::Pending;
        stage.progress = 0;
        stage.started_at = None;
        stage.completed_at = None;
        stage.error = None;
        stage.outputs = None;
    }

    let mut patch = JobPatch::new()
        .stages(stages)
        .status(JobStatus::Queued)
        .current_stage_index(index)
        .clear_error()
        .clear_completed_at();

    if let Some(scenes) = &job.scenes {
        let mut scenes = scenes.clone();
        for scene in scenes.iter_mut() {
            if matches!(scene.status, SceneStatus::Failed | SceneStatus::Generating) {
                scene.status = SceneStatus::Approved;
                scene.output.reset_unfinished();
            }
        }
        patch = patch.scenes(scenes);
    }
    Ok(patch)
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
