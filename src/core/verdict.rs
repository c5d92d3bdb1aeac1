//! Verdict models - per-step, per-job, and pipeline outcomes

use crate::core::matrix::JobConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one step within one job
///
/// `Errored` marks the step whose action invocation itself could not
/// complete, as opposed to `Failed` where the action ran and reported a
/// logical failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Passed,
    Failed,
    /// Not executed because an earlier blocking failure (or fault) ended
    /// the job
    Skipped,
    Errored,
}

/// Recorded result of one step within one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step identifier
    pub step_id: String,

    /// Outcome
    pub status: StepStatus,

    /// Failure or fault detail, if any
    pub detail: Option<String>,
}

impl StepRecord {
    pub fn passed(step_id: &str) -> Self {
        Self {
            step_id: step_id.to_string(),
            status: StepStatus::Passed,
            detail: None,
        }
    }

    pub fn failed(step_id: &str, detail: String) -> Self {
        Self {
            step_id: step_id.to_string(),
            status: StepStatus::Failed,
            detail: Some(detail),
        }
    }

    pub fn skipped(step_id: &str) -> Self {
        Self {
            step_id: step_id.to_string(),
            status: StepStatus::Skipped,
            detail: None,
        }
    }

    pub fn errored(step_id: &str, detail: String) -> Self {
        Self {
            step_id: step_id.to_string(),
            status: StepStatus::Errored,
            detail: Some(detail),
        }
    }
}

/// Terminal status of one job - the explicit state of the per-job state
/// machine
///
/// `Running` is the initial state; the others are terminal. `Unstable`
/// means every blocking step passed but at least one advisory step
/// failed - the job is not failed, and it does not fail the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Running,
    Passed,
    Unstable,
    Failed,
    Errored,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    /// Exit code for running this job from the CLI: 0 for passed (and
    /// unstable - advisory failures are non-failing), 1 for failed,
    /// 2 for errored so callers can branch on outcome class
    pub fn exit_code(&self) -> i32 {
        match self {
            JobStatus::Passed | JobStatus::Unstable => 0,
            JobStatus::Failed | JobStatus::Running => 1,
            JobStatus::Errored => 2,
        }
    }
}

/// The ordered step results for one job config plus its terminal status
///
/// Finalized atomically by the job executor that produced it; immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobVerdict {
    /// The job configuration this verdict belongs to
    pub job: JobConfig,

    /// Step results in declaration order
    pub steps: Vec<StepRecord>,

    /// Terminal status
    pub status: JobStatus,

    /// When the job started
    pub started_at: DateTime<Utc>,

    /// When the job finished
    pub finished_at: DateTime<Utc>,
}

impl JobVerdict {
    /// Did this verdict fail the pipeline?
    pub fn is_failing(&self) -> bool {
        matches!(self.status, JobStatus::Failed | JobStatus::Errored)
    }

    /// Look up the recorded result for a step
    pub fn step(&self, step_id: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|record| record.step_id == step_id)
    }
}

/// Aggregate pipeline status over all jobs of one trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    Passed,
    Failed,
}

/// Aggregate verdict over all job verdicts for one trigger event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineVerdict {
    /// Unique run id
    pub run_id: Uuid,

    /// Pipeline name
    pub pipeline_name: String,

    /// One verdict per job config, in expansion order
    pub jobs: Vec<JobVerdict>,

    /// Aggregate status: failed iff any job failed or errored
    pub status: PipelineStatus,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl PipelineVerdict {
    /// Aggregate job verdicts into the pipeline verdict
    pub fn aggregate(
        run_id: Uuid,
        pipeline_name: String,
        jobs: Vec<JobVerdict>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let status = if jobs.iter().any(JobVerdict::is_failing) {
            PipelineStatus::Failed
        } else {
            PipelineStatus::Passed
        };

        Self {
            run_id,
            pipeline_name,
            jobs,
            status,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Number of jobs with the given status
    pub fn count(&self, status: JobStatus) -> usize {
        self.jobs.iter().filter(|job| job.status == status).count()
    }
}
