//! CLI output formatting

use crate::{
    core::{JobStatus, JobVerdict, PipelineStatus, PipelineVerdict, StepStatus},
    execution::ExecutionEvent,
    persistence::RunSummary,
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a progress bar over the job count
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}

/// Format a step status for display
pub fn format_step_status(status: StepStatus) -> String {
    match status {
        StepStatus::Passed => style("passed").green().to_string(),
        StepStatus::Failed => style("failed").red().to_string(),
        StepStatus::Skipped => style("skipped").dim().to_string(),
        StepStatus::Errored => style("errored").magenta().to_string(),
    }
}

/// Format a job status for display
pub fn format_job_status(status: JobStatus) -> String {
    match status {
        JobStatus::Running => style("RUNNING").yellow().to_string(),
        JobStatus::Passed => style("PASSED").green().to_string(),
        JobStatus::Unstable => style("UNSTABLE").yellow().to_string(),
        JobStatus::Failed => style("FAILED").red().to_string(),
        JobStatus::Errored => style("ERRORED").magenta().to_string(),
    }
}

/// Format the pipeline status for display
pub fn format_pipeline_status(status: PipelineStatus) -> String {
    match status {
        PipelineStatus::Passed => style("PASSED").green().to_string(),
        PipelineStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::RunStarted {
            run_id,
            pipeline_name,
            total_jobs,
        } => format!(
            "{} Starting {} ({}): {} jobs",
            ROCKET,
            style(pipeline_name).bold(),
            style(&run_id.to_string()[..8]).dim(),
            style(total_jobs).cyan()
        ),
        ExecutionEvent::JobStarted { job } => {
            format!("{} {}", SPINNER, style(job).cyan())
        }
        ExecutionEvent::StepFinished { job, record } => {
            let icon = match record.status {
                StepStatus::Passed => CHECK,
                StepStatus::Failed | StepStatus::Errored => CROSS,
                StepStatus::Skipped => WARN,
            };
            let mut line = format!(
                "  {} {}: {} {}",
                icon,
                style(job).dim(),
                record.step_id,
                format_step_status(record.status)
            );
            if let Some(detail) = &record.detail {
                line.push_str(&format!(" ({})", style(detail).dim()));
            }
            line
        }
        ExecutionEvent::JobFinished { job, status } => {
            let icon = match status {
                JobStatus::Passed => CHECK,
                JobStatus::Unstable => WARN,
                _ => CROSS,
            };
            format!("{} {} {}", icon, style(job).bold(), format_job_status(*status))
        }
        ExecutionEvent::RunFinished { run_id, status } => format!(
            "{} Run {} {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_pipeline_status(*status)
        ),
    }
}

/// Print the verdict of a single job, one line per step
pub fn print_job_verdict(verdict: &JobVerdict) {
    println!(
        "{} {}",
        style(verdict.job.label()).bold(),
        format_job_status(verdict.status)
    );
    for record in &verdict.steps {
        let mut line = format!(
            "  {} {}",
            record.step_id,
            format_step_status(record.status)
        );
        if let Some(detail) = &record.detail {
            line.push_str(&format!(" ({})", style(detail).dim()));
        }
        println!("{}", line);
    }
}

/// Print the full pipeline report: per-job outcome plus a summary line
pub fn print_pipeline_report(verdict: &PipelineVerdict) {
    println!(
        "\n{} {} - {}",
        INFO,
        style(&verdict.pipeline_name).bold(),
        format_pipeline_status(verdict.status)
    );

    for job in &verdict.jobs {
        print_job_verdict(job);
    }

    println!(
        "\n  {} jobs: {} passed, {} unstable, {} failed, {} errored",
        style(verdict.jobs.len()).cyan(),
        style(verdict.count(JobStatus::Passed)).green(),
        style(verdict.count(JobStatus::Unstable)).yellow(),
        style(verdict.count(JobStatus::Failed)).red(),
        style(verdict.count(JobStatus::Errored)).magenta()
    );
}

/// Format a run summary for the history listing
pub fn format_run_summary(summary: &RunSummary) -> String {
    let icon = match summary.status {
        PipelineStatus::Passed => CHECK,
        PipelineStatus::Failed => CROSS,
    };

    format!(
        "{} {} - {} - {} - {} jobs ({} passed, {} failed, {} errored) - {}",
        icon,
        style(&summary.run_id.to_string()[..8]).dim(),
        style(&summary.pipeline_name).bold(),
        format_pipeline_status(summary.status),
        summary.total_jobs,
        style(summary.passed_jobs).green(),
        style(summary.failed_jobs).red(),
        style(summary.errored_jobs).magenta(),
        style(summary.started_at.to_rfc3339()).dim()
    )
}
