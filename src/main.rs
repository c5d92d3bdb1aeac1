use anyhow::{Context, Result};
use cigrid::actions::ShellRunner;
use cigrid::cli::commands::{
    EventKindArg, ExpandCommand, HistoryCommand, JobCommand, RunCommand, ValidateCommand,
};
use cigrid::cli::output::*;
use cigrid::cli::{Cli, Command};
use cigrid::core::{matrix, JobConfig, PipelineConfig, PipelineStatus, TriggerEvent};
use cigrid::execution::{ExecutionEvent, JobExecutor, RunCoordinator};
use cigrid::persistence::{create_summary, PersistenceBackend, RunSummary};
#[cfg(not(feature = "sqlite"))]
use cigrid::persistence::InMemoryPersistence;
#[cfg(feature = "sqlite")]
use cigrid::persistence::SqliteRunStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, cli.verbose).await?,
        Command::Job(cmd) => run_job(cmd).await?,
        Command::Expand(cmd) => expand_matrix(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
        Command::History(cmd) => show_history(cmd).await?,
    }

    Ok(())
}

async fn run_pipeline(cmd: &RunCommand, verbose: bool) -> Result<()> {
    let config =
        PipelineConfig::from_file(&cmd.file).context("Failed to load pipeline config")?;

    println!("{} Loaded pipeline: {}", INFO, style(&config.name).bold());

    let strategy = cmd.strategy.to_strategy(config.max_parallel);
    let coordinator = RunCoordinator::new(ShellRunner::default(), strategy);

    // Progress over the expanded job count
    let total_jobs = matrix::expand(&config.dimensions())?.len();
    let progress = create_progress_bar(total_jobs);
    let bar = progress.clone();
    coordinator.add_event_handler(move |event| {
        if verbose {
            bar.println(format_execution_event(&event));
        }
        if let ExecutionEvent::JobFinished { job, .. } = &event {
            bar.set_message(job.clone());
            bar.inc(1);
        }
    });

    let verdict = match &cmd.event {
        Some(kind) => {
            let event = build_event(*kind, cmd);
            match coordinator.run_if_triggered(&config, &event).await? {
                Some(verdict) => verdict,
                None => {
                    progress.finish_and_clear();
                    println!(
                        "{} No trigger matched {} on '{}', nothing to do",
                        INFO,
                        event.kind(),
                        style(event.branch()).bold()
                    );
                    return Ok(());
                }
            }
        }
        None => coordinator.run(&config).await?,
    };
    progress.finish_and_clear();

    // Save to history
    if !cmd.no_history {
        let store = open_store().await?;
        let summary = create_summary(&verdict);
        store.save_run(&summary).await?;
        println!(
            "{} Run saved to history (ID: {})",
            INFO,
            style(&summary.run_id.to_string()[..8]).dim()
        );
    }

    print_pipeline_report(&verdict);

    if verdict.status == PipelineStatus::Failed {
        std::process::exit(1);
    }

    Ok(())
}

fn build_event(kind: EventKindArg, cmd: &RunCommand) -> TriggerEvent {
    match kind {
        EventKindArg::Push => TriggerEvent::Push {
            branch: cmd.branch.clone(),
            commit: cmd.commit.clone(),
        },
        EventKindArg::PullRequest => TriggerEvent::PullRequest {
            source_branch: cmd.source_branch.clone(),
            target_branch: cmd.branch.clone(),
            commit: cmd.commit.clone(),
        },
    }
}

async fn run_job(cmd: &JobCommand) -> Result<()> {
    let config =
        PipelineConfig::from_file(&cmd.file).context("Failed to load pipeline config")?;
    config.validate().context("Invalid pipeline config")?;

    let job = JobConfig::from_selection(&config.dimensions(), &cmd.select)?;
    println!("{} Running job {}", ROCKET, style(job.label()).bold());

    let steps = config.steps();
    let gate = config.gate_policy();
    let executor = JobExecutor::new(ShellRunner::default());
    let verdict = executor
        .execute(&job, &steps, &gate, &AtomicBool::new(false), None)
        .await?
        .context("Job was cancelled before completion")?;

    print_job_verdict(&verdict);

    // 0 = passed (advisory failures included), 1 = failed, 2 = errored
    std::process::exit(verdict.status.exit_code());
}

fn expand_matrix(cmd: &ExpandCommand) -> Result<()> {
    let config =
        PipelineConfig::from_file(&cmd.file).context("Failed to load pipeline config")?;
    let jobs = matrix::expand(&config.dimensions())?;

    if cmd.json {
        let data = serde_json::json!({ "pipeline": config.name, "jobs": jobs });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!(
            "{} {} expands to {} jobs:",
            INFO,
            style(&config.name).bold(),
            style(jobs.len()).cyan()
        );
        for job in &jobs {
            println!("  {}", job.label());
        }
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    match PipelineConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Dimensions: {}", style(config.matrix.len()).cyan());
            println!("  Steps: {}", style(config.steps.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

async fn show_history(cmd: &HistoryCommand) -> Result<()> {
    let store = open_store().await?;

    // If a specific run is requested
    if let Some(run_id_str) = &cmd.run_id {
        let run_id = Uuid::parse_str(run_id_str).context("Invalid run ID format")?;
        match store.load_run(run_id).await? {
            Some(summary) => println!("{}", format_run_summary(&summary)),
            None => println!("{} Run not found", WARN),
        }
        return Ok(());
    }

    // List runs for one pipeline or all
    let runs = if let Some(pipeline_name) = &cmd.pipeline {
        store.list_runs(pipeline_name).await?
    } else {
        let mut all = Vec::new();
        for pipeline_name in store.list_pipelines().await? {
            all.extend(store.list_runs(&pipeline_name).await?);
        }
        all.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        all
    };
    let runs: Vec<RunSummary> = runs.into_iter().take(cmd.limit).collect();

    if runs.is_empty() {
        println!("{} No runs found", INFO);
        return Ok(());
    }

    if cmd.json {
        let data = serde_json::json!({ "runs": runs });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("{} Run history (showing latest {}):", INFO, cmd.limit);
        for summary in &runs {
            println!("  {}", format_run_summary(summary));
        }
    }

    Ok(())
}

async fn open_store() -> Result<Arc<dyn PersistenceBackend>> {
    #[cfg(feature = "sqlite")]
    {
        Ok(Arc::new(SqliteRunStore::with_default_path().await?))
    }
    #[cfg(not(feature = "sqlite"))]
    {
        Ok(Arc::new(InMemoryPersistence::new()))
    }
}
