//! Scenario: blocking step failures fail the job and skip the rest

use crate::helpers::*;
use crate::mock_runner::{Behavior, MockRunner};
use cigrid::{JobStatus, PipelineStatus, SchedulingStrategy, StepStatus};

const THREE_STEPS: &str = r#"
name: "CI"
steps:
  - id: checkout
    name: "Check out sources"
    action: checkout
  - id: format
    name: "Check formatting"
    action: format
  - id: lint
    name: "Lint"
    action: lint
"#;

#[tokio::test]
async fn test_blocking_failure_midway() {
    let runner = MockRunner::new().on("format", Behavior::Fail("2 files would be reformatted"));
    let probe = runner.clone();

    let verdict = run_with(runner, THREE_STEPS, SchedulingStrategy::Sequential)
        .await
        .unwrap();

    let job = &verdict.jobs[0];
    assert_eq!(
        step_statuses(job),
        vec![StepStatus::Passed, StepStatus::Failed, StepStatus::Skipped]
    );
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(verdict.status, PipelineStatus::Failed);

    // The skipped step was never invoked
    assert_eq!(probe.invocation_count(), 2);
    assert!(probe.invocations().iter().all(|i| i.action != "lint"));
}

#[tokio::test]
async fn test_blocking_failure_on_first_step_skips_everything_else() {
    let runner = MockRunner::new().on("checkout", Behavior::Fail("ref not found"));
    let probe = runner.clone();

    let verdict = run_with(runner, THREE_STEPS, SchedulingStrategy::Sequential)
        .await
        .unwrap();

    assert_eq!(
        step_statuses(&verdict.jobs[0]),
        vec![StepStatus::Failed, StepStatus::Skipped, StepStatus::Skipped]
    );
    assert_eq!(probe.invocation_count(), 1);
}

#[tokio::test]
async fn test_failure_detail_is_preserved() {
    let runner = MockRunner::new().on("lint", Behavior::Fail("E999 SyntaxError"));

    let verdict = run_with(runner, THREE_STEPS, SchedulingStrategy::Sequential)
        .await
        .unwrap();

    let record = verdict.jobs[0].step("lint").unwrap();
    assert_eq!(record.status, StepStatus::Failed);
    assert_eq!(record.detail.as_deref(), Some("E999 SyntaxError"));
}
