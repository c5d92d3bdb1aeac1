//! Scenario: a cancelled run reports no verdict rather than a false one

use crate::mock_runner::MockRunner;
use cigrid::{ExecutionEvent, PipelineConfig, RunCoordinator, RunError, SchedulingStrategy};
use std::sync::atomic::Ordering;

const TWO_JOBS_TWO_STEPS: &str = r#"
name: "CI"
matrix:
  - name: os
    values: [windows-2019, ubuntu-latest]
steps:
  - id: format
    name: "Check formatting"
    action: format
  - id: lint
    name: "Lint"
    action: lint
"#;

#[tokio::test]
async fn test_cancel_before_run_yields_no_verdict() {
    let config = PipelineConfig::from_yaml(TWO_JOBS_TWO_STEPS).unwrap();
    let runner = MockRunner::new();
    let probe = runner.clone();
    let coordinator = RunCoordinator::new(runner, SchedulingStrategy::Sequential);

    coordinator.cancel();
    let err = coordinator.run(&config).await.unwrap_err();

    assert!(matches!(err, RunError::Cancelled));
    assert_eq!(probe.invocation_count(), 0);
}

#[tokio::test]
async fn test_cancel_mid_run_discards_partial_results() {
    let config = PipelineConfig::from_yaml(TWO_JOBS_TWO_STEPS).unwrap();
    let runner = MockRunner::new();
    let probe = runner.clone();
    let coordinator = RunCoordinator::new(runner, SchedulingStrategy::Sequential);

    // Simulate a superseding trigger: cancel as soon as the first step
    // result is published
    let flag = coordinator.cancel_flag();
    coordinator.add_event_handler(move |event| {
        if matches!(event, ExecutionEvent::StepFinished { .. }) {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let err = coordinator.run(&config).await.unwrap_err();
    assert!(matches!(err, RunError::Cancelled));

    // Only the first step of the first job ran; nothing was reported
    assert_eq!(probe.invocation_count(), 1);
}
