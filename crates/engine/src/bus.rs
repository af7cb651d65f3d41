// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update bus for routing job updates to observers

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use studio_core::{Job, JobId, JobPatch};
use tokio::sync::mpsc;

/// Sender for update delivery
pub type UpdateSender = mpsc::UnboundedSender<JobUpdate>;
/// Receiver for update delivery
pub type UpdateReceiver = mpsc::UnboundedReceiver<JobUpdate>;

/// Who produced an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateOrigin {
    Submit,
    Driver,
    External,
    Cancel,
    Approval,
    SceneEdit,
    Regeneration,
    Retry,
    Delete,
}

/// One merged update, with the job as it stood right after the merge
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    /// Store-wide, strictly increasing
    pub sequence: u64,
    pub origin: UpdateOrigin,
    pub patch: JobPatch,
    pub job: Job,
}

impl JobUpdate {
    pub fn job_id(&self) -> &JobId {
        &self.job.id
    }
}

/// Which updates a subscriber receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateFilter {
    All,
    Job(JobId),
}

impl UpdateFilter {
    pub fn matches(&self, update: &JobUpdate) -> bool {
        match self {
            UpdateFilter::All => true,
            UpdateFilter::Job(id) => update.job_id() == id,
        }
    }
}

/// The update bus fans each update out to matching subscribers
#[derive(Clone, Default)]
pub struct UpdateBus {
    subscribers: Arc<RwLock<HashMap<u64, (UpdateFilter, UpdateSender)>>>,
    next_id: Arc<AtomicU64>,
}

impl UpdateBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, filter: UpdateFilter) -> UpdateReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.insert(id, (filter, tx));
        rx
    }

    /// Publish to every matching subscriber, dropping those that hung up
    pub fn publish(&self, update: &JobUpdate) {
        let mut closed = Vec::new();
        {
            let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
            for (id, (filter, tx)) in subs.iter() {
                if filter.matches(update) && tx.send(update.clone()).is_err() {
                    closed.push(*id);
                }
            }
        }
        if !closed.is_empty() {
            let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
            for id in closed {
                subs.remove(&id);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
