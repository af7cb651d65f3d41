// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and scene identifiers

use crate::job::JobId;

/// Mints ids for newly created jobs
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> JobId;
}

/// Random v4 UUIDs, for jobs created outside any host
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> JobId {
        JobId(uuid::Uuid::new_v4().to_string())
    }
}

/// Id of the scene planned at `index` (0-based) within a job.
///
/// Scene ids are fixed at breakdown and survive reordering, so the ordinal
/// here is the planned position, not the current one.
pub fn scene_id(job: &JobId, index: usize) -> String {
    format!("{}-scene-{}", job, index + 1)
}
