//! Persistence layer for run history

#[cfg(feature = "sqlite")]
pub mod store;

#[cfg(feature = "sqlite")]
pub use store::SqliteRunStore;

use crate::core::verdict::{JobStatus, PipelineStatus, PipelineVerdict};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run id
    pub run_id: Uuid,

    /// Pipeline name
    pub pipeline_name: String,

    /// Aggregate status
    pub status: PipelineStatus,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Total number of jobs
    pub total_jobs: usize,

    /// Jobs that passed
    pub passed_jobs: usize,

    /// Jobs that passed with advisory failures
    pub unstable_jobs: usize,

    /// Jobs that failed
    pub failed_jobs: usize,

    /// Jobs that errored
    pub errored_jobs: usize,
}

/// Build a run summary from a pipeline verdict
pub fn create_summary(verdict: &PipelineVerdict) -> RunSummary {
    RunSummary {
        run_id: verdict.run_id,
        pipeline_name: verdict.pipeline_name.clone(),
        status: verdict.status,
        started_at: verdict.started_at,
        finished_at: verdict.finished_at,
        total_jobs: verdict.jobs.len(),
        passed_jobs: verdict.count(JobStatus::Passed),
        unstable_jobs: verdict.count(JobStatus::Unstable),
        failed_jobs: verdict.count(JobStatus::Failed),
        errored_jobs: verdict.count(JobStatus::Errored),
    }
}

/// Trait for persistence backends
#[async_trait::async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Save a run summary
    async fn save_run(&self, run: &RunSummary) -> Result<()>;

    /// Load a run by id
    async fn load_run(&self, run_id: Uuid) -> Result<Option<RunSummary>>;

    /// List all runs for a pipeline
    async fn list_runs(&self, pipeline_name: &str) -> Result<Vec<RunSummary>>;

    /// List all pipeline names
    async fn list_pipelines(&self) -> Result<Vec<String>>;
}

/// In-memory persistence (for testing or ephemeral use)
pub struct InMemoryPersistence {
    runs: tokio::sync::RwLock<std::collections::HashMap<Uuid, RunSummary>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            runs: tokio::sync::RwLock::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PersistenceBackend for InMemoryPersistence {
    async fn save_run(&self, run: &RunSummary) -> Result<()> {
        self.runs.write().await.insert(run.run_id, run.clone());
        Ok(())
    }

    async fn load_run(&self, run_id: Uuid) -> Result<Option<RunSummary>> {
        Ok(self.runs.read().await.get(&run_id).cloned())
    }

    async fn list_runs(&self, pipeline_name: &str) -> Result<Vec<RunSummary>> {
        let mut runs: Vec<RunSummary> = self
            .runs
            .read()
            .await
            .values()
            .filter(|run| run.pipeline_name == pipeline_name)
            .cloned()
            .collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(runs)
    }

    async fn list_pipelines(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .runs
            .read()
            .await
            .values()
            .map(|run| run.pipeline_name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
