// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `studio pipelines` - List the pipeline registry

use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::fmt;
use studio_core::{PipelineStage, PipelineType};

#[derive(Args)]
pub struct PipelinesArgs {
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineInfo {
    pipeline_type: PipelineType,
    video: bool,
    scene_review: bool,
    stages: &'static [PipelineStage],
}

impl From<PipelineType> for PipelineInfo {
    fn from(pipeline_type: PipelineType) -> Self {
        Self {
            pipeline_type,
            video: pipeline_type.is_video(),
            scene_review: pipeline_type.has_scene_review(),
            stages: pipeline_type.stages(),
        }
    }
}

impl fmt::Display for PipelineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<String> = self
            .stages
            .iter()
            .map(|s| format!("{}:{}", s.id, s.estimated_duration))
            .collect();
        let mut tags = Vec::new();
        if self.video {
            tags.push("video");
        }
        if self.scene_review {
            tags.push("review");
        }
        write!(
            f,
            "{:<18} {:<14} {}",
            self.pipeline_type.as_str(),
            tags.join(","),
            stages.join(" ")
        )
    }
}

pub fn handle(args: PipelinesArgs) {
    let pipelines: Vec<PipelineInfo> = PipelineType::ALL.into_iter().map(Into::into).collect();
    if let OutputFormat::Text = args.format {
        println!("{:<18} {:<14} STAGES", "PIPELINE", "KIND");
    }
    output::print_list(&pipelines, args.format);
}
