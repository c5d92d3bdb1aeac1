//! Test utility functions for cigrid scenarios

use crate::mock_runner::MockRunner;
use cigrid::{
    JobVerdict, PipelineConfig, PipelineVerdict, RunCoordinator, RunError, SchedulingStrategy,
    StepStatus,
};

/// Run a pipeline YAML against a mock runner
pub async fn run_with(
    runner: MockRunner,
    yaml: &str,
    strategy: SchedulingStrategy,
) -> Result<PipelineVerdict, RunError> {
    let config = PipelineConfig::from_yaml(yaml)?;
    let coordinator = RunCoordinator::new(runner, strategy);
    coordinator.run(&config).await
}

/// Parse without validation, so invalid configs reach the coordinator
pub fn parse_unchecked(yaml: &str) -> PipelineConfig {
    serde_yaml::from_str(yaml).expect("yaml parses")
}

/// Find the verdict for a job by its label
pub fn job<'a>(verdict: &'a PipelineVerdict, label: &str) -> &'a JobVerdict {
    verdict
        .jobs
        .iter()
        .find(|job| job.job.label() == label)
        .unwrap_or_else(|| panic!("no job labelled '{}'", label))
}

/// The step statuses of one job, in declaration order
pub fn step_statuses(verdict: &JobVerdict) -> Vec<StepStatus> {
    verdict.steps.iter().map(|record| record.status).collect()
}
