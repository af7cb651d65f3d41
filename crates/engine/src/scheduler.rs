// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: admits queued jobs, one driver per job
//!
//! The claim table records which jobs have a live driver. A job is claimed
//! when its driver is started and released when the driver stops. Every
//! claim carries a fresh [`ClaimToken`]; a driver keeps stepping only while
//! the job's current claim is still its own, so a driver orphaned by a
//! cancel or delete stops once the job is claimed again.

use crate::error::EngineError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use studio_core::{Job, JobId, JobStatus};

/// Ownership of one claim, handed to the driver it was taken for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClaimToken(u64);

#[derive(Default)]
struct Claims {
    held: HashMap<JobId, ClaimToken>,
    issued: u64,
}

impl Claims {
    fn try_claim(&mut self, id: &JobId) -> Option<ClaimToken> {
        if self.held.contains_key(id) {
            return None;
        }
        self.issued += 1;
        let token = ClaimToken(self.issued);
        self.held.insert(id.clone(), token);
        Some(token)
    }
}

#[derive(Clone, Default)]
pub struct Scheduler {
    claims: Arc<Mutex<Claims>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Claims> {
        self.claims.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claim every queued job that has no driver yet.
    ///
    /// Returns the newly claimed ids with their tokens; the caller starts a
    /// driver for each. Observing the same job set again claims nothing new.
    pub fn admit(&self, jobs: &[Job]) -> Vec<(JobId, ClaimToken)> {
        let mut claims = self.lock();
        jobs.iter()
            .filter(|job| job.status == JobStatus::Queued)
            .filter_map(|job| claims.try_claim(&job.id).map(|t| (job.id.clone(), t)))
            .collect()
    }

    /// Claim one job for a driver
    pub fn claim(&self, id: &JobId) -> Result<ClaimToken, EngineError> {
        self.lock()
            .try_claim(id)
            .ok_or_else(|| EngineError::ConcurrencyViolation(id.clone()))
    }

    /// Whether `token` is still the job's current claim
    pub fn holds(&self, id: &JobId, token: ClaimToken) -> bool {
        self.lock().held.get(id) == Some(&token)
    }

    /// Revoke whatever claim the job has. Returns whether it was claimed.
    pub fn release(&self, id: &JobId) -> bool {
        self.lock().held.remove(id).is_some()
    }

    /// Release the claim only if `token` still owns it
    pub fn release_held(&self, id: &JobId, token: ClaimToken) -> bool {
        let mut claims = self.lock();
        if claims.held.get(id) == Some(&token) {
            claims.held.remove(id);
            true
        } else {
            false
        }
    }

    pub fn is_claimed(&self, id: &JobId) -> bool {
        self.lock().held.contains_key(id)
    }

    pub fn claimed_count(&self) -> usize {
        self.lock().held.len()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
