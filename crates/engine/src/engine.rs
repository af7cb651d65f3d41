// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine facade
//!
//! The entry points the rest of the system calls: submit, update, cancel,
//! approve, scene operations and retry. Each one is a single transaction on
//! the job store; anything that needs a driver afterwards goes through the
//! scheduler.

use crate::bus::{UpdateFilter, UpdateOrigin, UpdateReceiver};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::runner::Runner;
use crate::scheduler::Scheduler;
use crate::store::JobStore;
use std::sync::Arc;
use studio_core::scene;
use studio_core::{
    approval_patch, retry_patch, ApproveSelection, Clock, ContentAdapter, Driver, Job, JobId,
    JobPatch, JobStatus, MoveDirection, Pacing, Scene, SystemClock, Ticker, TokioTicker,
    ValidationError,
};
use tracing::Instrument;

/// Engine dependencies
pub struct EngineDeps<C, T> {
    pub clock: C,
    pub ticker: T,
    pub adapter: Arc<dyn ContentAdapter>,
}

/// The job execution engine
pub struct Engine<C: Clock = SystemClock, T: Ticker = TokioTicker> {
    store: JobStore,
    scheduler: Scheduler,
    runner: Runner<C, T>,
    clock: C,
}

impl<C: Clock, T: Ticker> Clone for Engine<C, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            scheduler: self.scheduler.clone(),
            runner: self.runner.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl Engine<SystemClock, TokioTicker> {
    /// Production engine with the synthetic adapter
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_deps(
            EngineDeps {
                clock: SystemClock,
                ticker: TokioTicker,
                adapter: Arc::new(config.adapter()),
            },
            config.pacing(),
        )
    }
}

fn rejected(op: &'static str, job_id: &JobId, err: EngineError) -> EngineError {
    tracing::warn!(job_id = %job_id, error = %err, "{} rejected", op);
    err
}

impl<C: Clock, T: Ticker> Engine<C, T> {
    pub fn with_deps(deps: EngineDeps<C, T>, pacing: Pacing) -> Self {
        let store = JobStore::new();
        let scheduler = Scheduler::new();
        let runner = Runner::new(
            store.clone(),
            scheduler.clone(),
            Driver::new(pacing),
            deps.adapter,
            deps.clock.clone(),
            deps.ticker,
        );
        Self {
            store,
            scheduler,
            runner,
            clock: deps.clock,
        }
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.store.list()
    }

    pub fn job(&self, id: &JobId) -> Option<Job> {
        self.store.get(id)
    }

    pub fn subscribe(&self, filter: UpdateFilter) -> UpdateReceiver {
        self.store.subscribe(filter)
    }

    /// Whether a driver currently holds the job
    pub fn is_driving(&self, id: &JobId) -> bool {
        self.scheduler.is_claimed(id)
    }

    /// Admit every queued job without a driver and start one for each
    pub fn observe(&self) -> Vec<JobId> {
        let admitted = self.store.read(|jobs| self.scheduler.admit(jobs));
        admitted
            .into_iter()
            .map(|(id, token)| {
                tracing::info!(job_id = %id, "job admitted");
                self.runner.spawn(id.clone(), token);
                id
            })
            .collect()
    }

    /// Prepend new jobs and admit them
    pub fn submit_jobs(&self, jobs: Vec<Job>) -> Result<Vec<JobId>, EngineError> {
        for job in &jobs {
            job.check_submittable()
                .map_err(|e| rejected("submit", &job.id, e.into()))?;
        }
        let ids: Vec<JobId> = jobs.iter().map(|job| job.id.clone()).collect();
        self.store.insert_front(jobs)?;
        self.observe();
        Ok(ids)
    }

    /// Merge an external partial update into a job
    pub fn update_job(&self, id: &JobId, patch: JobPatch) -> Result<Job, EngineError> {
        let job = self.store.apply(id, patch, UpdateOrigin::External)?;
        self.observe();
        Ok(job)
    }

    pub fn cancel_job(&self, id: &JobId) -> Result<(), EngineError> {
        let now = self.clock.now();
        self.store
            .transact(id, UpdateOrigin::Cancel, |job| {
                if job.status.is_terminal() {
                    return Err(ValidationError::InvalidStatus {
                        job_id: job.id.to_string(),
                        actual: job.status,
                        expected: "a job that has not finished",
                    }
                    .into());
                }
                self.scheduler.release(&job.id);
                let patch = JobPatch::new()
                    .status(JobStatus::Cancelled)
                    .completed_at(now);
                Ok((Some(patch), ()))
            })
            .map_err(|e| rejected("cancel", id, e))?;
        tracing::info!(job_id = %id, "job cancelled");
        Ok(())
    }

    /// Approve scenes of a job held at review and start a driver for it
    pub fn approve_scenes(&self, id: &JobId, selection: ApproveSelection) -> Result<(), EngineError> {
        let now = self.clock.now();
        let token = self
            .store
            .transact(id, UpdateOrigin::Approval, |job| {
                let patch = approval_patch(job, &selection, now)?;
                match self.scheduler.claim(&job.id) {
                    Ok(token) => Ok((Some(patch), Ok(token))),
                    Err(violation) => {
                        tracing::error!(job_id = %job.id, error = %violation, "driver already active");
                        let failed = JobPatch::new()
                            .status(JobStatus::Failed)
                            .completed_at(now)
                            .error(violation.to_string());
                        Ok((Some(failed), Err(violation)))
                    }
                }
            })
            .map_err(|e| rejected("approve", id, e))?;
        let token = token?;
        tracing::info!(job_id = %id, "scenes approved, resuming");
        self.runner.spawn(id.clone(), token);
        Ok(())
    }

    /// Apply a scene-list operation as one wholesale replacement
    fn scene_op(
        &self,
        op_name: &'static str,
        id: &JobId,
        origin: UpdateOrigin,
        op: impl FnOnce(&[Scene]) -> Result<Vec<Scene>, ValidationError>,
    ) -> Result<(), EngineError> {
        self.store
            .transact(id, origin, |job| {
                if job.status == JobStatus::Cancelled {
                    return Err(ValidationError::InvalidStatus {
                        job_id: job.id.to_string(),
                        actual: job.status,
                        expected: "a job that is not cancelled",
                    }
                    .into());
                }
                let scenes = job.scenes.as_deref().ok_or_else(|| ValidationError::NoScenes {
                    job_id: job.id.to_string(),
                })?;
                let next = op(scenes)?;
                Ok((Some(JobPatch::new().scenes(next)), ()))
            })
            .map_err(|e| rejected(op_name, id, e))
    }

    pub fn edit_scene(&self, id: &JobId, scene_id: &str, description: &str) -> Result<(), EngineError> {
        self.scene_op("edit scene", id, UpdateOrigin::SceneEdit, |scenes| {
            scene::edit(scenes, scene_id, description)
        })
    }

    pub fn move_scene(
        &self,
        id: &JobId,
        scene_id: &str,
        direction: MoveDirection,
    ) -> Result<(), EngineError> {
        self.scene_op("move scene", id, UpdateOrigin::SceneEdit, |scenes| {
            scene::move_scene(scenes, scene_id, direction)
        })
    }

    pub fn delete_scene(&self, id: &JobId, scene_id: &str) -> Result<(), EngineError> {
        self.scene_op("delete scene", id, UpdateOrigin::SceneEdit, |scenes| {
            scene::delete(scenes, scene_id)
        })
    }

    /// Mark one scene approved without resuming the job
    pub fn approve_scene(&self, id: &JobId, scene_id: &str) -> Result<(), EngineError> {
        self.scene_op("approve scene", id, UpdateOrigin::SceneEdit, |scenes| {
            scene::approve(scenes, scene_id)
        })
    }

    /// Reset a scene to pending with a revision comment.
    ///
    /// The comment is folded into the scene text after the regeneration
    /// delay, unless the job was cancelled, the scene deleted, or a newer
    /// regeneration started in the meantime.
    pub fn regenerate_scene(
        &self,
        id: &JobId,
        scene_id: &str,
        comment: &str,
    ) -> Result<(), EngineError> {
        self.scene_op("regenerate scene", id, UpdateOrigin::SceneEdit, |scenes| {
            scene::begin_regeneration(scenes, scene_id, comment)
        })?;

        let store = self.store.clone();
        let ticker = self.runner.ticker().clone();
        let delay = self.runner.driver().pacing().regeneration();
        let job_id = id.clone();
        let scene_id = scene_id.to_string();
        let comment = comment.trim().to_string();
        let span = tracing::info_span!("regeneration", job_id = %job_id, scene_id = %scene_id);
        tokio::spawn(
            async move {
                ticker.sleep(delay).await;
                let result = store.transact(&job_id, UpdateOrigin::Regeneration, |job| {
                    if job.status == JobStatus::Cancelled {
                        tracing::debug!("job cancelled, skipping");
                        return Ok((None, ()));
                    }
                    let patch = match scene::finish_regeneration(job.scenes(), &scene_id, &comment) {
                        Ok(Some(scenes)) => Some(JobPatch::new().scenes(scenes)),
                        Ok(None) => {
                            tracing::debug!("superseded by a newer regeneration");
                            None
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "scene gone, skipping");
                            None
                        }
                    };
                    Ok((patch, ()))
                });
                if let Err(e) = result {
                    tracing::debug!(error = %e, "regeneration dropped");
                }
            }
            .instrument(span),
        );
        Ok(())
    }

    /// Re-admit a failed job at the stage that failed
    pub fn retry_job(&self, id: &JobId) -> Result<(), EngineError> {
        self.store
            .transact(id, UpdateOrigin::Retry, |job| Ok((Some(retry_patch(job)?), ())))
            .map_err(|e| rejected("retry", id, e))?;
        tracing::info!(job_id = %id, "job re-queued");
        self.observe();
        Ok(())
    }

    /// Remove a job from the collection. A running driver stops at its next step,
    /// even if a job with the same id is submitted before then.
    pub fn delete_job(&self, id: &JobId) -> Result<Job, EngineError> {
        let job = self.store.remove(id)?;
        self.scheduler.release(id);
        Ok(job)
    }

    /// Wait until `done` holds for the job
    pub async fn wait_until(
        &self,
        id: &JobId,
        done: impl Fn(&Job) -> bool,
    ) -> Result<Job, EngineError> {
        let mut updates = self.subscribe(UpdateFilter::Job(id.clone()));
        loop {
            let job = self
                .job(id)
                .ok_or_else(|| EngineError::JobNotFound(id.clone()))?;
            if done(&job) {
                return Ok(job);
            }
            if updates.recv().await.is_none() {
                return Err(EngineError::JobNotFound(id.clone()));
            }
        }
    }

    /// Wait until the job is neither queued nor processing
    pub async fn settle(&self, id: &JobId) -> Result<Job, EngineError> {
        self.wait_until(id, |job| !job.status.is_active()).await
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
