// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `studio run <pipeline>` - Run one job and stream its progress

use crate::output::{self, JobSummary, OutputFormat};
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use studio_core::{
    ApproveSelection, IdGen, Job, JobStatus, NewJob, PipelineType, Scene, SystemClock, UuidIdGen,
};
use studio_engine::{Engine, EngineConfig, UpdateFilter};

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline type (e.g., "blog-article")
    pub pipeline: String,

    /// Number of scenes for video pipelines
    #[arg(long)]
    pub scenes: Option<u32>,

    /// Skip the scene review gate
    #[arg(long)]
    pub automated: bool,

    /// Scenes to approve at review: all, none, or scene indices (0,2)
    #[arg(long, default_value = "all")]
    pub approve: Approval,

    /// Make a stage fail (repeatable)
    #[arg(long = "fail-stage")]
    pub fail_stages: Vec<String>,

    /// Multiplier on stage durations; 0 runs without waiting
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Engine config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Job variables (key=value)
    #[arg(long = "var", value_parser = parse_key_val)]
    pub variables: Vec<(String, String)>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// What to approve when the job reaches scene review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approval {
    All,
    None,
    Indices(Vec<usize>),
}

impl FromStr for Approval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Approval::All),
            "none" => Ok(Approval::None),
            _ => s
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<usize>()
                        .map_err(|_| format!("invalid scene index `{part}`"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Approval::Indices),
        }
    }
}

impl Approval {
    /// Resolve to a selection over the current scenes; `None` leaves the job at review
    fn selection(&self, scenes: &[Scene]) -> Result<Option<ApproveSelection>> {
        match self {
            Approval::All => Ok(Some(ApproveSelection::All)),
            Approval::None => Ok(None),
            Approval::Indices(indices) => {
                let ids = indices
                    .iter()
                    .map(|&i| {
                        scenes
                            .get(i)
                            .map(|scene| scene.id.clone())
                            .with_context(|| format!("no scene at index {i}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(ApproveSelection::Only(ids)))
            }
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn engine_config(args: &RunArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(scale) = args.time_scale {
        config.time_scale = scale;
    }
    config.fail_stages.extend(args.fail_stages.iter().cloned());
    config.validate()?;
    Ok(config)
}

fn new_job(args: &RunArgs, pipeline: PipelineType) -> Result<Job> {
    let mut new = NewJob::new(pipeline);
    new.variables = args.variables.iter().cloned().collect();
    new.generation_settings.number_of_scenes = args.scenes;
    new.generation_settings.automated_mode = args.automated.then_some(true);
    Ok(Job::new(UuidIdGen.next(), new, &SystemClock)?)
}

pub async fn handle(args: RunArgs) -> Result<ExitCode> {
    let pipeline: PipelineType = args.pipeline.parse()?;
    let config = engine_config(&args)?;
    let engine = Engine::new(&config);

    let job = new_job(&args, pipeline)?;
    let job_id = job.id.clone();
    let mut updates = engine.subscribe(UpdateFilter::Job(job_id.clone()));
    engine.submit_jobs(vec![job])?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;
    let mut last_line = String::new();

    loop {
        let update = tokio::select! {
            update = updates.recv() => match update {
                Some(update) => update,
                None => break,
            },
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                tracing::info!(job_id = %job_id, "interrupted, cancelling");
                engine.cancel_job(&job_id)?;
                continue;
            }
        };

        match args.format {
            OutputFormat::Text => {
                let line = output::progress_line(&update.job);
                if line != last_line {
                    println!("{}", line);
                    last_line = line;
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string(&update)?),
        }

        match update.job.status {
            JobStatus::AwaitingSceneReview => match args.approve.selection(update.job.scenes())? {
                Some(selection) => engine.approve_scenes(&job_id, selection)?,
                None => break,
            },
            status if status.is_terminal() => break,
            _ => {}
        }
    }

    let Some(job) = engine.job(&job_id) else {
        bail!("job {} disappeared", job_id);
    };
    match args.format {
        OutputFormat::Text => {
            println!();
            output::print(&JobSummary(&job), args.format);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&job)?),
    }

    Ok(match job.status {
        JobStatus::Completed => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
