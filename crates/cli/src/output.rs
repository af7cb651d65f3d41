// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use studio_core::{Job, StageStatus};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

/// One-line progress view of a job
pub fn progress_line(job: &Job) -> String {
    let stage = job
        .stages
        .get(job.current_stage_index)
        .or_else(|| job.stages.last());
    match stage {
        Some(stage) => format!(
            "{:<20} {:<18} {:>3}%",
            job.status.as_str(),
            stage.stage_id,
            stage.progress
        ),
        None => job.status.as_str().to_string(),
    }
}

/// Final job report; serializes as the job itself
#[derive(Serialize)]
#[serde(transparent)]
pub struct JobSummary<'a>(pub &'a Job);

impl fmt::Display for JobSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let job = self.0;
        writeln!(f, "Job: {}", job.id)?;
        writeln!(f, "  Pipeline: {}", job.pipeline_type)?;
        write!(f, "  Status: {}", job.status)?;
        if let Some(error) = &job.error {
            write!(f, "\n  Error: {}", error)?;
        }

        write!(f, "\n  Stages:")?;
        for stage in &job.stages {
            let marker = match stage.status {
                StageStatus::Failed => " !",
                _ => "",
            };
            write!(
                f,
                "\n    {:<18} {:<10} {:>3}%{}",
                stage.stage_id, stage.status, stage.progress, marker
            )?;
        }

        if let Some(scenes) = &job.scenes {
            write!(f, "\n  Scenes:")?;
            for scene in scenes {
                write!(
                    f,
                    "\n    {}. [{}] {}",
                    scene.index, scene.status, scene.description
                )?;
            }
        }

        if !job.outputs.is_empty() {
            write!(f, "\n  Outputs:")?;
            for key in ["url", "videoUrl"] {
                if let Some(value) = job.outputs.get(key).and_then(|v| v.as_str()) {
                    write!(f, "\n    {}: {}", key, value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{FakeClock, JobPatch, JobStatus, NewJob, PipelineType};

    fn blog() -> Job {
        Job::new("job-1", NewJob::new(PipelineType::BlogArticle), &FakeClock::new()).unwrap()
    }

    #[test]
    fn progress_line_shows_current_stage() {
        let mut job = blog();
        job.status = JobStatus::Processing;
        job.current_stage_index = 1;
        job.stages[1].progress = 40;
        let line = progress_line(&job);
        assert!(line.starts_with("Processing"));
        assert!(line.contains("sections"));
        assert!(line.ends_with(" 40%"));
    }

    #[test]
    fn progress_line_past_the_end_shows_last_stage() {
        let mut job = blog();
        job.current_stage_index = job.stages.len();
        assert!(progress_line(&job).contains("assembly"));
    }

    #[test]
    fn summary_lists_stages_and_outputs() {
        let mut job = blog();
        job.apply(
            &JobPatch::new()
                .status(JobStatus::Failed)
                .error("seo failed")
                .output("url", "https://cdn.studio.local/blog-article/job-1"),
        );
        let text = JobSummary(&job).to_string();
        assert!(text.starts_with("Job: job-1\n  Pipeline: blog-article\n  Status: Failed"));
        assert!(text.contains("Error: seo failed"));
        assert!(text.contains("outline"));
        assert!(text.contains("url: https://cdn.studio.local/blog-article/job-1"));
        assert!(!text.contains("Scenes:"));
    }
}
