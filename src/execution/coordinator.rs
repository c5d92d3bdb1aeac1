//! Run coordinator - orchestrates a full matrix run

use crate::{
    actions::ActionRunner,
    core::{
        config::{ConfigError, PipelineConfig},
        gate::GatePolicy,
        matrix::{self, JobConfig},
        step::Step,
        trigger::TriggerEvent,
        verdict::{JobStatus, JobVerdict, PipelineStatus, PipelineVerdict, StepRecord},
    },
    execution::executor::JobExecutor,
};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

/// Strategy for dispatching job executions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingStrategy {
    /// Execute jobs one at a time, in expansion order
    Sequential,

    /// Execute all jobs concurrently
    Parallel,

    /// Limited parallelism (max N concurrent jobs)
    LimitedParallel(usize),
}

impl Default for SchedulingStrategy {
    fn default() -> Self {
        SchedulingStrategy::Sequential
    }
}

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted {
        run_id: Uuid,
        pipeline_name: String,
        total_jobs: usize,
    },
    JobStarted {
        job: String,
    },
    StepFinished {
        job: String,
        record: StepRecord,
    },
    JobFinished {
        job: String,
        status: JobStatus,
    },
    RunFinished {
        run_id: Uuid,
        status: PipelineStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// A run could not produce a verdict
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The run was cancelled; no verdict is reported rather than a
    /// false one
    #[error("run was cancelled before completion")]
    Cancelled,

    #[error("job '{job}' did not finish: {reason}")]
    Lost { job: String, reason: String },
}

/// Drives matrix expansion, dispatches independent job executions, and
/// aggregates verdicts
///
/// Jobs share nothing mutable: each task gets its own job config and
/// read-only views of the step list and gate policy, so one job erroring
/// never blocks completion of the others.
pub struct RunCoordinator<R> {
    runner: Arc<R>,
    strategy: SchedulingStrategy,
    handlers: Arc<Mutex<Vec<EventHandler>>>,
    cancelled: Arc<AtomicBool>,
}

impl<R: ActionRunner + 'static> RunCoordinator<R> {
    pub fn new(runner: R, strategy: SchedulingStrategy) -> Self {
        Self {
            runner: Arc::new(runner),
            strategy,
            handlers: Arc::new(Mutex::new(Vec::new())),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push(Arc::new(handler));
        }
    }

    /// Request cancellation of the in-flight run
    ///
    /// In-flight jobs stop before their next step; the run reports
    /// `RunError::Cancelled` and no verdict.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Shared cancellation flag, e.g. for wiring to a signal handler or
    /// a superseding trigger
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Start a run if the config's trigger filters accept the event
    ///
    /// Returns `Ok(None)` when the filters reject it; the event metadata
    /// is not interpreted beyond that decision.
    pub async fn run_if_triggered(
        &self,
        config: &PipelineConfig,
        event: &TriggerEvent,
    ) -> Result<Option<PipelineVerdict>, RunError> {
        if !config.accepts(event) {
            info!(
                "ignoring {} on '{}': no matching trigger",
                event.kind(),
                event.branch()
            );
            return Ok(None);
        }
        info!(
            "{} on '{}' ({}) accepted",
            event.kind(),
            event.branch(),
            event.commit()
        );
        self.run(config).await.map(Some)
    }

    /// Execute the full matrix for one trigger
    ///
    /// Validates the configuration before anything is dispatched - a bad
    /// config means zero job executions.
    pub async fn run(&self, config: &PipelineConfig) -> Result<PipelineVerdict, RunError> {
        config.validate()?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let jobs = matrix::expand(&config.dimensions())?;
        let steps = Arc::new(config.steps());
        let gate = Arc::new(config.gate_policy());

        info!(
            "starting run {} of '{}': {} jobs, {} steps each",
            run_id,
            config.name,
            jobs.len(),
            steps.len()
        );
        self.emit(ExecutionEvent::RunStarted {
            run_id,
            pipeline_name: config.name.clone(),
            total_jobs: jobs.len(),
        });

        let verdicts = match self.strategy {
            SchedulingStrategy::Sequential => self.run_sequential(&jobs, &steps, &gate).await?,
            SchedulingStrategy::Parallel => {
                self.run_parallel(&jobs, &steps, &gate, None).await?
            }
            SchedulingStrategy::LimitedParallel(limit) => {
                self.run_parallel(&jobs, &steps, &gate, Some(limit)).await?
            }
        };

        if self.cancelled.load(Ordering::SeqCst) || verdicts.iter().any(Option::is_none) {
            warn!("run {} cancelled, discarding partial results", run_id);
            return Err(RunError::Cancelled);
        }

        let verdict = PipelineVerdict::aggregate(
            run_id,
            config.name.clone(),
            verdicts.into_iter().flatten().collect(),
            started_at,
        );

        info!("run {} finished: {:?}", run_id, verdict.status);
        self.emit(ExecutionEvent::RunFinished {
            run_id,
            status: verdict.status,
        });

        Ok(verdict)
    }

    async fn run_sequential(
        &self,
        jobs: &[JobConfig],
        steps: &Arc<Vec<Step>>,
        gate: &Arc<GatePolicy>,
    ) -> Result<Vec<Option<JobVerdict>>, RunError> {
        let executor = JobExecutor::new(self.runner.clone());
        let mut verdicts = Vec::with_capacity(jobs.len());

        for job in jobs {
            if self.cancelled.load(Ordering::SeqCst) {
                verdicts.push(None);
                continue;
            }

            self.emit(ExecutionEvent::JobStarted { job: job.label() });
            let handlers = self.handlers.clone();
            let label = job.label();
            let observer = move |_job: &JobConfig, record: &StepRecord| {
                emit_to(
                    &handlers,
                    ExecutionEvent::StepFinished {
                        job: label.clone(),
                        record: record.clone(),
                    },
                );
            };

            let verdict = executor
                .execute(job, steps, gate, &self.cancelled, Some(&observer))
                .await?;

            if let Some(verdict) = &verdict {
                self.emit(ExecutionEvent::JobFinished {
                    job: job.label(),
                    status: verdict.status,
                });
            }
            verdicts.push(verdict);
        }

        Ok(verdicts)
    }

    async fn run_parallel(
        &self,
        jobs: &[JobConfig],
        steps: &Arc<Vec<Step>>,
        gate: &Arc<GatePolicy>,
        limit: Option<usize>,
    ) -> Result<Vec<Option<JobVerdict>>, RunError> {
        let semaphore = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs.iter().cloned() {
            let runner = self.runner.clone();
            let steps = steps.clone();
            let gate = gate.clone();
            let handlers = self.handlers.clone();
            let cancelled = self.cancelled.clone();
            let semaphore = semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                emit_to(&handlers, ExecutionEvent::JobStarted { job: job.label() });

                let label = job.label();
                let observer_handlers = handlers.clone();
                let observer = move |_job: &JobConfig, record: &StepRecord| {
                    emit_to(
                        &observer_handlers,
                        ExecutionEvent::StepFinished {
                            job: label.clone(),
                            record: record.clone(),
                        },
                    );
                };

                let executor = JobExecutor::new(runner);
                let verdict = executor
                    .execute(&job, &steps, &gate, &cancelled, Some(&observer))
                    .await?;

                if let Some(verdict) = &verdict {
                    emit_to(
                        &handlers,
                        ExecutionEvent::JobFinished {
                            job: job.label(),
                            status: verdict.status,
                        },
                    );
                }
                Ok::<Option<JobVerdict>, ConfigError>(verdict)
            }));
        }

        let mut verdicts = Vec::with_capacity(jobs.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(verdict)) => verdicts.push(verdict),
                Ok(Err(config_err)) => return Err(config_err.into()),
                Err(join_err) => {
                    return Err(RunError::Lost {
                        job: jobs[index].label(),
                        reason: join_err.to_string(),
                    })
                }
            }
        }

        Ok(verdicts)
    }

    fn emit(&self, event: ExecutionEvent) {
        emit_to(&self.handlers, event);
    }
}

fn emit_to(handlers: &Mutex<Vec<EventHandler>>, event: ExecutionEvent) {
    if let Ok(handlers) = handlers.lock() {
        for handler in handlers.iter() {
            handler(event.clone());
        }
    }
}
