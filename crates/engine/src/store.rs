// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store: the update sink
//!
//! The store owns the job collection. Every mutation goes through one lock,
//! is merged with [`Job::apply`], and is published on the bus before the lock
//! is released, so observers see updates to a job in the order they landed.

use crate::bus::{JobUpdate, UpdateBus, UpdateFilter, UpdateOrigin, UpdateReceiver};
use crate::error::EngineError;
use std::sync::{Arc, Mutex, MutexGuard};
use studio_core::{Job, JobId, JobPatch};

#[derive(Default)]
struct StoreState {
    /// Newest first
    jobs: Vec<Job>,
    sequence: u64,
}

impl StoreState {
    fn position(&self, id: &JobId) -> Result<usize, EngineError> {
        self.jobs
            .iter()
            .position(|job| &job.id == id)
            .ok_or_else(|| EngineError::JobNotFound(id.clone()))
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }
}

#[derive(Clone, Default)]
pub struct JobStore {
    state: Arc<Mutex<StoreState>>,
    bus: UpdateBus,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe(&self, filter: UpdateFilter) -> UpdateReceiver {
        self.bus.subscribe(filter)
    }

    /// Prepend jobs to the collection. All or none are inserted.
    pub fn insert_front(&self, jobs: Vec<Job>) -> Result<(), EngineError> {
        let mut state = self.lock();
        for (i, job) in jobs.iter().enumerate() {
            let seen_earlier = jobs[..i].iter().any(|other| other.id == job.id);
            if seen_earlier || state.position(&job.id).is_ok() {
                return Err(EngineError::DuplicateJob(job.id.clone()));
            }
        }
        for job in jobs.iter().rev() {
            state.jobs.insert(0, job.clone());
        }
        for job in jobs {
            let sequence = state.next_sequence();
            self.bus.publish(&JobUpdate {
                sequence,
                origin: UpdateOrigin::Submit,
                patch: JobPatch::new().status(job.status),
                job,
            });
        }
        Ok(())
    }

    pub fn get(&self, id: &JobId) -> Option<Job> {
        let state = self.lock();
        state.jobs.iter().find(|job| &job.id == id).cloned()
    }

    /// Snapshot of every job, newest first
    pub fn list(&self) -> Vec<Job> {
        self.lock().jobs.clone()
    }

    /// Run `f` over the job collection while holding the store lock
    pub fn read<R>(&self, f: impl FnOnce(&[Job]) -> R) -> R {
        let state = self.lock();
        f(&state.jobs)
    }

    /// Merge a patch into one job
    pub fn apply(
        &self,
        id: &JobId,
        patch: JobPatch,
        origin: UpdateOrigin,
    ) -> Result<Job, EngineError> {
        self.transact(id, origin, |_| Ok((Some(patch), ())))?;
        self.get(id).ok_or_else(|| EngineError::JobNotFound(id.clone()))
    }

    /// Read-modify-write one job atomically.
    ///
    /// `f` sees the current job and returns an optional patch plus a result.
    /// The patch is merged and published before the lock is released. If `f`
    /// fails, nothing changes.
    pub fn transact<R>(
        &self,
        id: &JobId,
        origin: UpdateOrigin,
        f: impl FnOnce(&Job) -> Result<(Option<JobPatch>, R), EngineError>,
    ) -> Result<R, EngineError> {
        let mut state = self.lock();
        let pos = state.position(id)?;
        let (patch, result) = f(&state.jobs[pos])?;
        if let Some(patch) = patch.filter(|p| !p.is_empty()) {
            state.jobs[pos].apply(&patch);
            let sequence = state.next_sequence();
            self.bus.publish(&JobUpdate {
                sequence,
                origin,
                patch,
                job: state.jobs[pos].clone(),
            });
        }
        Ok(result)
    }

    /// Remove a job from the collection
    pub fn remove(&self, id: &JobId) -> Result<Job, EngineError> {
        let mut state = self.lock();
        let pos = state.position(id)?;
        let job = state.jobs.remove(pos);
        let sequence = state.next_sequence();
        self.bus.publish(&JobUpdate {
            sequence,
            origin: UpdateOrigin::Delete,
            patch: JobPatch::new(),
            job: job.clone(),
        });
        Ok(job)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
