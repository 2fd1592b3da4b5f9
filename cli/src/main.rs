//! CLI entrypoint for DiffWarden
//!
//! Wires together all layers using dependency injection: config and
//! adapters from the infrastructure layer, the run-review use case from
//! the application layer, and console output from the presentation
//! layer.

use anyhow::{ensure, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warden_application::{PipelineConfig, RunReviewError, RunReviewInput, RunReviewUseCase};
use warden_application::ToolExecutorPort;
use warden_domain::{ReviewTarget, StagePrompts};
use warden_infrastructure::{
    AgentsApiPlatform, ConfigLoader, DiffSource, GithubClient, LocalDiffSource,
    ReviewToolExecutor, WardenConfig,
};
use warden_presentation::{Cli, ConsoleFormatter, ConsoleProgress};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            exit_code_for(&error)
        }
    }
}

/// Map error kinds to exit codes: 1 for invalid input or configuration,
/// 2 for pipeline failures, 130 for cancellation.
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<RunReviewError>() {
        Some(RunReviewError::Cancelled) => ExitCode::from(130),
        Some(_) => ExitCode::from(2),
        None => ExitCode::from(1),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    // Validate the target and the credentials before any network call.
    let target = ReviewTarget::parse(&cli.target)?;
    let api_key = config.platform_api_key()?;
    let source = diff_source(&config, &target)?;

    info!("Starting DiffWarden for {}", target.describe());

    // === Dependency Injection ===
    let executor = Arc::new(ReviewToolExecutor::new(source));
    let platform = Arc::new(AgentsApiPlatform::new(
        &api_key,
        config.platform.base_url.clone(),
        Duration::from_secs(config.platform.request_timeout_secs),
    )?);

    let pipeline: PipelineConfig = config.pipeline();
    let specs = pipeline.stage_specs(executor.tool_spec());
    let request = StagePrompts::review_request(&target);

    // Ctrl-C cancels the run; teardown still executes inside the use case.
    let cancellation = CancellationToken::new();
    {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\ncancelling review...");
                cancellation.cancel();
            }
        });
    }

    if !cli.quiet {
        println!();
        println!("DiffWarden reviewing {}", target.describe());
        println!();
    }

    let use_case =
        RunReviewUseCase::new(platform, executor).with_cancellation(cancellation);
    let input = RunReviewInput::new(specs, request);

    let report = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress = ConsoleProgress::new();
        use_case.execute_with_progress(input, &progress).await?
    };

    let output = if cli.json {
        ConsoleFormatter::format_json(&report)
    } else {
        ConsoleFormatter::format(&report)
    };
    println!("{output}");

    Ok(())
}

/// Pick the diff source for the target; PR targets need the code-host
/// credential, local diffs need the file to exist.
fn diff_source(config: &WardenConfig, target: &ReviewTarget) -> Result<DiffSource> {
    match target {
        ReviewTarget::PullRequest(_) => {
            let token = config.github_token()?;
            let client = GithubClient::new(
                &token,
                config.github.base_url.clone(),
                Duration::from_secs(config.github.request_timeout_secs),
            )?;
            Ok(DiffSource::CodeHost(client))
        }
        ReviewTarget::LocalDiff(path) => {
            ensure!(path.exists(), "diff file not found: {}", path.display());
            Ok(DiffSource::Local(LocalDiffSource::new(path.clone())))
        }
    }
}
