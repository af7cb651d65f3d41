// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! studio - content pipeline runner

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{pipelines, run};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "studio",
    version,
    about = "Studio - marketing content pipeline runner"
)]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pipeline registry
    Pipelines(pipelines::PipelinesArgs),
    /// Run one job through a pipeline
    Run(run::RunArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Pipelines(args) => {
            pipelines::handle(args);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run(args) => run::handle(args).await,
    }
}

/// Logs go to stderr so stdout stays parseable
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
