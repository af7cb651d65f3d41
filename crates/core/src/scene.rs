// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scenes and scene-list operations
//!
//! Every operation here takes the current scene list and returns a new one.
//! All of them keep `index` contiguous from 0 and equal to array position.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review and generation status of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneStatus {
    Pending,
    Approved,
    Generating,
    Completed,
    Failed,
}

impl SceneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneStatus::Pending => "pending",
            SceneStatus::Approved => "approved",
            SceneStatus::Generating => "generating",
            SceneStatus::Completed => "completed",
            SceneStatus::Failed => "failed",
        }
    }

    /// Selected for generation: approved at some point and not reset since
    pub fn is_selected(&self) -> bool {
        !matches!(self, SceneStatus::Pending)
    }
}

impl fmt::Display for SceneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Status of one generation unit within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    Pending,
    Generating,
    Completed,
    Failed,
}

/// Kind of generation unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneUnit {
    /// Text to video (faceless)
    T2v,
    /// Text to image
    T2i,
    /// Image to video
    I2v,
    /// Text to script
    T2s,
    Voice,
}

impl SceneUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneUnit::T2v => "t2v",
            SceneUnit::T2i => "t2i",
            SceneUnit::I2v => "i2v",
            SceneUnit::T2s => "t2s",
            SceneUnit::Voice => "voice",
        }
    }
}

impl fmt::Display for SceneUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One generation step and its outputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationUnit {
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Storyboard sub-stages, generated in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubStages {
    pub t2i: GenerationUnit,
    pub i2v: GenerationUnit,
    pub t2s: GenerationUnit,
    pub voice: GenerationUnit,
}

/// Which output shape a pipeline's scenes carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneShape {
    T2v,
    SubStages,
}

/// Scene output: exactly one of the two shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SceneOutput {
    T2v(GenerationUnit),
    SubStages(SubStages),
}

impl SceneOutput {
    pub fn empty(shape: SceneShape) -> Self {
        match shape {
            SceneShape::T2v => SceneOutput::T2v(GenerationUnit::default()),
            SceneShape::SubStages => SceneOutput::SubStages(SubStages::default()),
        }
    }

    pub fn shape(&self) -> SceneShape {
        match self {
            SceneOutput::T2v(_) => SceneShape::T2v,
            SceneOutput::SubStages(_) => SceneShape::SubStages,
        }
    }

    /// Units in generation order
    pub fn units(&self) -> Vec<(SceneUnit, &GenerationUnit)> {
        match self {
            SceneOutput::T2v(unit) => vec![(SceneUnit::T2v, unit)],
            SceneOutput::SubStages(s) => vec![
                (SceneUnit::T2i, &s.t2i),
                (SceneUnit::I2v, &s.i2v),
                (SceneUnit::T2s, &s.t2s),
                (SceneUnit::Voice, &s.voice),
            ],
        }
    }

    pub fn unit_mut(&mut self, kind: SceneUnit) -> Option<&mut GenerationUnit> {
        match (self, kind) {
            (SceneOutput::T2v(unit), SceneUnit::T2v) => Some(unit),
            (SceneOutput::SubStages(s), SceneUnit::T2i) => Some(&mut s.t2i),
            (SceneOutput::SubStages(s), SceneUnit::I2v) => Some(&mut s.i2v),
            (SceneOutput::SubStages(s), SceneUnit::T2s) => Some(&mut s.t2s),
            (SceneOutput::SubStages(s), SceneUnit::Voice) => Some(&mut s.voice),
            _ => None,
        }
    }

    /// First unit that has not completed yet
    pub fn next_unit(&self) -> Option<(SceneUnit, &GenerationUnit)> {
        self.units()
            .into_iter()
            .find(|(_, unit)| unit.status != UnitStatus::Completed)
    }

    /// Put every unit that has not completed back to pending
    pub fn reset_unfinished(&mut self) {
        let units: Vec<&mut GenerationUnit> = match self {
            SceneOutput::T2v(unit) => vec![unit],
            SceneOutput::SubStages(s) => vec![&mut s.t2i, &mut s.i2v, &mut s.t2s, &mut s.voice],
        };
        for unit in units {
            if unit.status != UnitStatus::Completed {
                *unit = GenerationUnit::default();
            }
        }
    }

    pub fn unit_count(&self) -> usize {
        match self {
            SceneOutput::T2v(_) => 1,
            SceneOutput::SubStages(_) => 4,
        }
    }
}

/// A reviewable unit of video content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub index: usize,
    pub description: String,
    pub prompt: String,
    pub estimated_tokens: u32,
    /// Seconds of final video
    pub duration: u32,
    pub status: SceneStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_comment: Option<String>,
    #[serde(flatten)]
    pub output: SceneOutput,
}

/// Text for a new scene, produced by the content adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDraft {
    pub description: String,
    pub prompt: String,
}

impl Scene {
    pub fn new(
        id: impl Into<String>,
        index: usize,
        draft: SceneDraft,
        shape: SceneShape,
        duration: u32,
    ) -> Self {
        let estimated_tokens = estimate_tokens(&draft.prompt);
        Self {
            id: id.into(),
            index,
            description: draft.description,
            prompt: draft.prompt,
            estimated_tokens,
            duration,
            status: SceneStatus::Pending,
            regeneration_comment: None,
            output: SceneOutput::empty(shape),
        }
    }
}

/// Rough token estimate for a prompt
pub fn estimate_tokens(prompt: &str) -> u32 {
    let chars = u32::try_from(prompt.chars().count()).unwrap_or(u32::MAX);
    chars.div_ceil(4).max(1)
}

/// Direction for [`move_scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Which scenes an approval covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveSelection {
    All,
    Only(Vec<String>),
}

fn position(scenes: &[Scene], id: &str) -> Result<usize, ValidationError> {
    scenes
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| ValidationError::SceneNotFound(id.to_string()))
}

/// Set each scene's `index` to its array position
pub fn reindex(scenes: &mut [Scene]) {
    for (i, scene) in scenes.iter_mut().enumerate() {
        scene.index = i;
    }
}

/// Replace a scene's description. Status is untouched.
pub fn edit(
    scenes: &[Scene],
    id: &str,
    description: impl Into<String>,
) -> Result<Vec<Scene>, ValidationError> {
    let pos = position(scenes, id)?;
    let mut next = scenes.to_vec();
    next[pos].description = description.into();
    Ok(next)
}

/// Swap a scene with its neighbour. No-op at either end.
pub fn move_scene(
    scenes: &[Scene],
    id: &str,
    direction: MoveDirection,
) -> Result<Vec<Scene>, ValidationError> {
    let pos = position(scenes, id)?;
    let mut next = scenes.to_vec();
    let other = match direction {
        MoveDirection::Up if pos > 0 => pos - 1,
        MoveDirection::Down if pos + 1 < next.len() => pos + 1,
        _ => return Ok(next),
    };
    next.swap(pos, other);
    next[pos].index = pos;
    next[other].index = other;
    Ok(next)
}

/// Remove a scene and close the gap
pub fn delete(scenes: &[Scene], id: &str) -> Result<Vec<Scene>, ValidationError> {
    let pos = position(scenes, id)?;
    let mut next = scenes.to_vec();
    next.remove(pos);
    reindex(&mut next);
    Ok(next)
}

fn approve_in_place(scene: &mut Scene) {
    if matches!(scene.status, SceneStatus::Pending | SceneStatus::Approved) {
        scene.status = SceneStatus::Approved;
    }
}

/// Approve one scene. Scenes already past approval keep their status.
pub fn approve(scenes: &[Scene], id: &str) -> Result<Vec<Scene>, ValidationError> {
    let pos = position(scenes, id)?;
    let mut next = scenes.to_vec();
    approve_in_place(&mut next[pos]);
    Ok(next)
}

pub fn approve_all(scenes: &[Scene]) -> Vec<Scene> {
    let mut next = scenes.to_vec();
    next.iter_mut().for_each(approve_in_place);
    next
}

/// Approve a selection. An empty selection is rejected.
pub fn approve_selected(
    scenes: &[Scene],
    selection: &ApproveSelection,
) -> Result<Vec<Scene>, ValidationError> {
    match selection {
        ApproveSelection::All => {
            if scenes.is_empty() {
                return Err(ValidationError::EmptyApproval);
            }
            Ok(approve_all(scenes))
        }
        ApproveSelection::Only(ids) => {
            if ids.is_empty() {
                return Err(ValidationError::EmptyApproval);
            }
            let mut next = scenes.to_vec();
            for id in ids {
                let pos = position(&next, id)?;
                approve_in_place(&mut next[pos]);
            }
            Ok(next)
        }
    }
}

fn check_comment(comment: &str) -> Result<&str, ValidationError> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyComment);
    }
    Ok(trimmed)
}

/// Start a regeneration: the scene goes back to pending with the comment stored
pub fn begin_regeneration(
    scenes: &[Scene],
    id: &str,
    comment: &str,
) -> Result<Vec<Scene>, ValidationError> {
    let comment = check_comment(comment)?;
    let pos = position(scenes, id)?;
    let mut next = scenes.to_vec();
    let scene = &mut next[pos];
    scene.status = SceneStatus::Pending;
    scene.regeneration_comment = Some(comment.to_string());
    scene.output = SceneOutput::empty(scene.output.shape());
    Ok(next)
}

/// Finish a regeneration by folding the comment into the scene text.
///
/// Returns `Ok(None)` when the scene has since been regenerated with a
/// different comment; the newer regeneration wins.
pub fn finish_regeneration(
    scenes: &[Scene],
    id: &str,
    comment: &str,
) -> Result<Option<Vec<Scene>>, ValidationError> {
    let comment = check_comment(comment)?;
    let pos = position(scenes, id)?;
    if scenes[pos].regeneration_comment.as_deref() != Some(comment) {
        return Ok(None);
    }
    let mut next = scenes.to_vec();
    let scene = &mut next[pos];
    scene.description = format!("{} [Revised: {}]", scene.description, comment);
    scene.prompt = format!("{}\nRevision notes: {}", scene.prompt, comment);
    scene.estimated_tokens = estimate_tokens(&scene.prompt);
    scene.status = SceneStatus::Pending;
    Ok(Some(next))
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
