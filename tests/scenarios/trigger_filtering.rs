//! Scenario: trigger filters decide whether a run starts at all

use crate::mock_runner::MockRunner;
use cigrid::{PipelineConfig, RunCoordinator, SchedulingStrategy, TriggerEvent};

const FILTERED: &str = r#"
name: "CI"
on:
  push:
    branches: [main, release]
  pull_request: {}
steps:
  - id: format
    name: "Check formatting"
"#;

fn push(branch: &str) -> TriggerEvent {
    TriggerEvent::Push {
        branch: branch.to_string(),
        commit: "abc123".to_string(),
    }
}

#[tokio::test]
async fn test_push_to_protected_branch_runs() {
    let config = PipelineConfig::from_yaml(FILTERED).unwrap();
    let coordinator = RunCoordinator::new(MockRunner::new(), SchedulingStrategy::Sequential);

    let verdict = coordinator
        .run_if_triggered(&config, &push("main"))
        .await
        .unwrap();
    assert!(verdict.is_some());
}

#[tokio::test]
async fn test_push_to_other_branch_is_ignored() {
    let config = PipelineConfig::from_yaml(FILTERED).unwrap();
    let runner = MockRunner::new();
    let probe = runner.clone();
    let coordinator = RunCoordinator::new(runner, SchedulingStrategy::Sequential);

    let verdict = coordinator
        .run_if_triggered(&config, &push("feature/matrix"))
        .await
        .unwrap();

    assert!(verdict.is_none());
    assert_eq!(probe.invocation_count(), 0);
}

#[tokio::test]
async fn test_pull_request_runs_regardless_of_target() {
    let config = PipelineConfig::from_yaml(FILTERED).unwrap();
    let coordinator = RunCoordinator::new(MockRunner::new(), SchedulingStrategy::Sequential);

    let verdict = coordinator
        .run_if_triggered(
            &config,
            &TriggerEvent::PullRequest {
                source_branch: "feature/matrix".to_string(),
                target_branch: "develop".to_string(),
                commit: "def456".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(verdict.is_some());
}

#[tokio::test]
async fn test_unconfigured_event_kind_is_ignored() {
    let yaml = r#"
name: "CI"
on:
  pull_request: {}
steps:
  - id: format
    name: "Check formatting"
"#;
    let config = PipelineConfig::from_yaml(yaml).unwrap();
    let coordinator = RunCoordinator::new(MockRunner::new(), SchedulingStrategy::Sequential);

    let verdict = coordinator
        .run_if_triggered(&config, &push("main"))
        .await
        .unwrap();
    assert!(verdict.is_none());
}
