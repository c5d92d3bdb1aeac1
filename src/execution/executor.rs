//! Job executor - runs one job's step sequence against the gate policy

use crate::{
    actions::{ActionRunner, StepOutcome},
    core::{
        config::ConfigError,
        gate::GatePolicy,
        matrix::JobConfig,
        step::Step,
        verdict::{JobStatus, JobVerdict, StepRecord},
    },
};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

/// Callback invoked as each step result is recorded
pub type StepObserver = dyn Fn(&JobConfig, &StepRecord) + Send + Sync;

/// Executes one job: the ordered step sequence as a small state machine
///
/// The job status starts `Running` and the only transitions out of it
/// are the ones a step result triggers: a blocking failure moves to
/// `Failed`, an infrastructure fault to `Errored`; once terminal, every
/// remaining step is recorded `Skipped`. Jobs that run to the end
/// finalize as `Passed`, or `Unstable` when only advisory steps failed.
pub struct JobExecutor<R> {
    runner: R,
}

impl<R: ActionRunner> JobExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Execute the step sequence for one job config
    ///
    /// Steps run strictly in declaration order; a step never starts
    /// before its predecessor's result is recorded. The cancellation
    /// flag is checked before each step; a cancelled job produces no
    /// verdict (`Ok(None)`) rather than a partial one.
    pub async fn execute(
        &self,
        job: &JobConfig,
        steps: &[Step],
        gate: &GatePolicy,
        cancelled: &AtomicBool,
        observer: Option<&StepObserver>,
    ) -> Result<Option<JobVerdict>, ConfigError> {
        info!("executing job: {}", job.label());
        let started_at = Utc::now();

        let mut status = JobStatus::Running;
        let mut advisory_failure = false;
        let mut records = Vec::with_capacity(steps.len());

        for step in steps {
            if cancelled.load(Ordering::SeqCst) {
                info!("job {} cancelled before step {}", job.label(), step.id);
                return Ok(None);
            }

            if status.is_terminal() {
                let record = StepRecord::skipped(&step.id);
                notify(observer, job, &record);
                records.push(record);
                continue;
            }

            let params = step.resolve_params(job);
            let record = match self.runner.invoke(&step.action, &params).await {
                Ok(StepOutcome::Success) => {
                    debug!("step {} passed for {}", step.id, job.label());
                    StepRecord::passed(&step.id)
                }
                Ok(StepOutcome::Failure { detail }) => {
                    if gate.is_blocking(&step.id)? {
                        warn!(
                            "blocking step {} failed for {}: {}",
                            step.id,
                            job.label(),
                            detail
                        );
                        status = JobStatus::Failed;
                    } else {
                        warn!(
                            "advisory step {} failed for {}: {}",
                            step.id,
                            job.label(),
                            detail
                        );
                        advisory_failure = true;
                    }
                    StepRecord::failed(&step.id, detail)
                }
                Err(fault) => {
                    error!(
                        "infrastructure fault in step {} for {}: {}",
                        step.id,
                        job.label(),
                        fault
                    );
                    status = JobStatus::Errored;
                    StepRecord::errored(&step.id, fault.to_string())
                }
            };

            notify(observer, job, &record);
            records.push(record);
        }

        let status = match status {
            JobStatus::Running => {
                if advisory_failure {
                    JobStatus::Unstable
                } else {
                    JobStatus::Passed
                }
            }
            terminal => terminal,
        };

        info!("job {} finished: {:?}", job.label(), status);
        Ok(Some(JobVerdict {
            job: job.clone(),
            steps: records,
            status,
            started_at,
            finished_at: Utc::now(),
        }))
    }
}

fn notify(observer: Option<&StepObserver>, job: &JobConfig, record: &StepRecord) {
    if let Some(observer) = observer {
        observer(job, record);
    }
}
