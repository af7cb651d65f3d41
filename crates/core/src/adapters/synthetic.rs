// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic content adapter
//!
//! Produces placeholder text and URLs instead of calling any model. Stages
//! listed in `fail_stages` report a failure so error paths can be exercised
//! end to end.

use super::traits::{ContentAdapter, UnitArtifact};
use crate::error::StageFailure;
use crate::job::Job;
use crate::registry::{PipelineStage, SCENE_GENERATION};
use crate::scene::{Scene, SceneDraft, SceneUnit};
use std::collections::HashSet;

const CDN: &str = "https://cdn.studio.local";

const BEATS: [&str; 6] = [
    "Opening hook",
    "Problem setup",
    "Turning point",
    "Solution reveal",
    "Proof and detail",
    "Call to action",
];

#[derive(Debug, Clone, Default)]
pub struct SyntheticAdapter {
    fail_stages: HashSet<String>,
}

impl SyntheticAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given stage ids whenever they complete
    pub fn failing<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_stages: stages.into_iter().map(Into::into).collect(),
        }
    }

    fn check(&self, stage_id: &str, name: &str) -> Result<(), StageFailure> {
        if self.fail_stages.contains(stage_id) {
            return Err(StageFailure::new(format!(
                "{} failed: synthetic failure",
                name
            )));
        }
        Ok(())
    }
}

fn topic(job: &Job) -> &str {
    job.variables
        .get("topic")
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(job.idea_id.as_str())
}

impl ContentAdapter for SyntheticAdapter {
    fn complete_stage(&self, job: &Job, stage: &PipelineStage) -> Result<String, StageFailure> {
        self.check(stage.id, stage.name)?;
        Ok(format!(
            "{} for {} ({})",
            stage.name,
            topic(job),
            job.pipeline_type
        ))
    }

    fn describe_scene(&self, job: &Job, index: usize, total: usize) -> SceneDraft {
        let beat = BEATS[index % BEATS.len()];
        let settings = job.settings();
        let template = if job.config.prompt_template.is_empty() {
            "Cinematic shot"
        } else {
            job.config.prompt_template.as_str()
        };
        SceneDraft {
            description: format!("Scene {} of {}: {} about {}", index + 1, total, beat, topic(job)),
            prompt: format!(
                "{}. {} for {}. Aspect ratio {}, {} quality, {} seconds.",
                template,
                beat,
                topic(job),
                settings.aspect_ratio,
                settings.quality,
                settings.scene_duration()
            ),
        }
    }

    fn generate_unit(
        &self,
        job: &Job,
        scene: &Scene,
        unit: SceneUnit,
    ) -> Result<UnitArtifact, StageFailure> {
        self.check(SCENE_GENERATION, "Scene Generation")?;
        let base = format!("{}/{}/{}", CDN, job.id, scene.id);
        let artifact = match unit {
            SceneUnit::T2v => UnitArtifact {
                url: Some(format!("{}/clip.mp4", base)),
                script: None,
            },
            SceneUnit::T2i => UnitArtifact {
                url: Some(format!("{}/frame.png", base)),
                script: None,
            },
            SceneUnit::I2v => UnitArtifact {
                url: Some(format!("{}/motion.mp4", base)),
                script: None,
            },
            SceneUnit::T2s => UnitArtifact {
                url: None,
                script: Some(format!("Narration: {}", scene.description)),
            },
            SceneUnit::Voice => UnitArtifact {
                url: Some(format!("{}/voice.mp3", base)),
                script: None,
            },
        };
        Ok(artifact)
    }
}
