// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline registry
//!
//! Static map from pipeline type to its ordered stage list. The stage ids and
//! their order are an external contract: jobs copy them at creation and never
//! reorder them.

use crate::error::ConfigError;
use crate::scene::SceneShape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stage id of the breakdown stage that produces the scene list
pub const SCENE_BREAKDOWN: &str = "scene_breakdown";
/// Stage id of the stage that generates each approved scene
pub const SCENE_GENERATION: &str = "scene_generation";

/// One of the six content-generation workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineType {
    FacelessVideo,
    StoryboardVideo,
    SocialMedia,
    BlogArticle,
    YoutubeScript,
    AiUgc,
}

/// A stage definition in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Estimated duration in seconds
    pub estimated_duration: u32,
}

const fn stage(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    estimated_duration: u32,
) -> PipelineStage {
    PipelineStage {
        id,
        name,
        description,
        estimated_duration,
    }
}

static FACELESS_VIDEO: [PipelineStage; 4] = [
    stage("script", "Script", "Write the narration script", 15),
    stage(
        SCENE_BREAKDOWN,
        "Scene Breakdown",
        "Split the script into reviewable scenes",
        10,
    ),
    stage(
        SCENE_GENERATION,
        "Scene Generation",
        "Render a text-to-video clip per approved scene",
        45,
    ),
    stage("assembly", "Assembly", "Stitch clips, narration and music", 25),
];

static STORYBOARD_VIDEO: [PipelineStage; 4] = [
    stage("script", "Script", "Write the storyboard script", 15),
    stage(
        SCENE_BREAKDOWN,
        "Scene Breakdown",
        "Split the script into reviewable scenes",
        10,
    ),
    stage(
        SCENE_GENERATION,
        "Scene Generation",
        "Generate image, motion, narration and voice per approved scene",
        60,
    ),
    stage("assembly", "Assembly", "Stitch scenes into the final cut", 20),
];

static SOCIAL_MEDIA: [PipelineStage; 4] = [
    stage("content", "Content", "Draft the post copy", 10),
    stage("hashtags", "Hashtags", "Pick hashtags for reach", 5),
    stage("image", "Image", "Generate the post image", 15),
    stage("formatting", "Formatting", "Format for each platform", 3),
];

static BLOG_ARTICLE: [PipelineStage; 5] = [
    stage("outline", "Outline", "Draft the article outline", 8),
    stage("sections", "Sections", "Write each section", 30),
    stage("seo", "SEO", "Optimize title, headings and keywords", 10),
    stage("images", "Images", "Generate inline illustrations", 20),
    stage("assembly", "Assembly", "Assemble the final article", 5),
];

static YOUTUBE_SCRIPT: [PipelineStage; 4] = [
    stage("hook", "Hook", "Write the opening hook", 8),
    stage("script", "Script", "Write the full script", 25),
    stage("retention", "Retention", "Add retention beats", 10),
    stage("broll", "B-Roll", "Suggest b-roll shots", 12),
];

static AI_UGC: [PipelineStage; 4] = [
    stage("persona", "Persona", "Define the creator persona", 10),
    stage("script", "Script", "Write the testimonial script", 15),
    stage("avatar", "Avatar", "Render the avatar performance", 30),
    stage("assembly", "Assembly", "Assemble the final video", 25),
];

impl PipelineType {
    pub const ALL: [PipelineType; 6] = [
        PipelineType::FacelessVideo,
        PipelineType::StoryboardVideo,
        PipelineType::SocialMedia,
        PipelineType::BlogArticle,
        PipelineType::YoutubeScript,
        PipelineType::AiUgc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineType::FacelessVideo => "faceless-video",
            PipelineType::StoryboardVideo => "storyboard-video",
            PipelineType::SocialMedia => "social-media",
            PipelineType::BlogArticle => "blog-article",
            PipelineType::YoutubeScript => "youtube-script",
            PipelineType::AiUgc => "ai-ugc",
        }
    }

    /// Ordered stage list for this pipeline
    pub fn stages(&self) -> &'static [PipelineStage] {
        match self {
            PipelineType::FacelessVideo => &FACELESS_VIDEO,
            PipelineType::StoryboardVideo => &STORYBOARD_VIDEO,
            PipelineType::SocialMedia => &SOCIAL_MEDIA,
            PipelineType::BlogArticle => &BLOG_ARTICLE,
            PipelineType::YoutubeScript => &YOUTUBE_SCRIPT,
            PipelineType::AiUgc => &AI_UGC,
        }
    }

    pub fn stage(&self, index: usize) -> Option<&'static PipelineStage> {
        self.stages().get(index)
    }

    pub fn stage_index(&self, stage_id: &str) -> Option<usize> {
        self.stages().iter().position(|s| s.id == stage_id)
    }

    /// Produces a video as its final output
    pub fn is_video(&self) -> bool {
        matches!(
            self,
            PipelineType::FacelessVideo | PipelineType::StoryboardVideo | PipelineType::AiUgc
        )
    }

    /// Breaks into scenes and pauses for review after `scene_breakdown`
    pub fn has_scene_review(&self) -> bool {
        self.scene_shape().is_some()
    }

    /// Output shape of this pipeline's scenes, if it has any
    pub fn scene_shape(&self) -> Option<SceneShape> {
        match self {
            PipelineType::FacelessVideo => Some(SceneShape::T2v),
            PipelineType::StoryboardVideo => Some(SceneShape::SubStages),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PipelineType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPipeline(s.to_string()))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
