// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async driver runner
//!
//! Runs one job's driver as a tokio task. Each step is evaluated against the
//! store's current snapshot inside the store lock, so a cancellation that
//! lands between steps is always seen before the next update. A driver whose
//! claim was revoked stops without touching the job.

use crate::bus::UpdateOrigin;
use crate::error::EngineError;
use crate::scheduler::{ClaimToken, Scheduler};
use crate::store::JobStore;
use std::sync::Arc;
use studio_core::{Clock, ContentAdapter, Driver, JobId, Then, Ticker};
use tokio::task::JoinHandle;
use tracing::Instrument;

pub struct Runner<C: Clock, T: Ticker> {
    store: JobStore,
    scheduler: Scheduler,
    driver: Arc<Driver>,
    adapter: Arc<dyn ContentAdapter>,
    clock: C,
    ticker: T,
}

impl<C: Clock, T: Ticker> Clone for Runner<C, T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            scheduler: self.scheduler.clone(),
            driver: Arc::clone(&self.driver),
            adapter: Arc::clone(&self.adapter),
            clock: self.clock.clone(),
            ticker: self.ticker.clone(),
        }
    }
}

impl<C: Clock, T: Ticker> Runner<C, T> {
    pub fn new(
        store: JobStore,
        scheduler: Scheduler,
        driver: Driver,
        adapter: Arc<dyn ContentAdapter>,
        clock: C,
        ticker: T,
    ) -> Self {
        Self {
            store,
            scheduler,
            driver: Arc::new(driver),
            adapter,
            clock,
            ticker,
        }
    }

    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Start a driver task for a job the caller has already claimed
    pub fn spawn(&self, job_id: JobId, token: ClaimToken) -> JoinHandle<()> {
        let runner = self.clone();
        let pipeline = self
            .store
            .get(&job_id)
            .map(|job| job.pipeline_type.as_str())
            .unwrap_or("unknown");
        let span = tracing::info_span!("driver", job_id = %job_id, pipeline);
        tokio::spawn(async move { runner.run(job_id, token).await }.instrument(span))
    }

    /// Drive the job until it suspends, finishes, disappears, or loses its claim
    pub async fn run(&self, job_id: JobId, token: ClaimToken) {
        loop {
            let outcome = self.store.transact(&job_id, UpdateOrigin::Driver, |job| {
                if !self.scheduler.holds(&job.id, token) {
                    tracing::debug!("claim revoked, driver stopping");
                    return Ok((None, Then::Finish));
                }
                let step = self.driver.step(job, self.adapter.as_ref(), self.clock.now());
                if step.is_final() {
                    self.scheduler.release_held(&job.id, token);
                }
                Ok((step.patch, step.then))
            });
            match outcome {
                Ok(Then::Continue) => tokio::task::yield_now().await,
                Ok(Then::Wait(duration)) => self.ticker.sleep(duration).await,
                Ok(Then::Suspend) => {
                    tracing::debug!("driver suspended");
                    break;
                }
                Ok(Then::Finish) => {
                    tracing::debug!("driver finished");
                    break;
                }
                Err(EngineError::JobNotFound(_)) => {
                    tracing::info!("job removed, driver stopping");
                    self.scheduler.release_held(&job_id, token);
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "driver aborted");
                    self.scheduler.release_held(&job_id, token);
                    break;
                }
            }
        }
    }
}
