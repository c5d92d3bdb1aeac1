//! Scenario: matrix expansion drives one job per dimension combination

use crate::helpers::*;
use crate::mock_runner::MockRunner;
use cigrid::core::matrix::{expand, Dimension};
use cigrid::{JobStatus, SchedulingStrategy};

const TWO_BY_THREE: &str = r#"
name: "CI"
matrix:
  - name: os
    values: [windows-2019, ubuntu-latest]
  - name: python
    values: ["3.9", "3.10", "3.11"]
steps:
  - id: format
    name: "Check formatting"
  - id: lint
    name: "Lint"
"#;

#[tokio::test]
async fn test_run_covers_full_cross_product() {
    let runner = MockRunner::new();
    let probe = runner.clone();

    let verdict = run_with(runner, TWO_BY_THREE, SchedulingStrategy::Parallel)
        .await
        .unwrap();

    // 2 x 3 dimensions, each pair unique
    assert_eq!(verdict.jobs.len(), 6);
    let mut labels: Vec<_> = verdict.jobs.iter().map(|j| j.job.label()).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), 6);

    // Every job ran both steps
    assert_eq!(probe.invocation_count(), 12);
    assert!(verdict.jobs.iter().all(|j| j.status == JobStatus::Passed));
}

#[tokio::test]
async fn test_expansion_order_is_deterministic() {
    let dimensions = vec![
        Dimension::new("os", vec!["windows-2019".into(), "ubuntu-latest".into()]),
        Dimension::new(
            "python",
            vec!["3.9".into(), "3.10".into(), "3.11".into()],
        ),
    ];

    let first = expand(&dimensions).unwrap();
    let second = expand(&dimensions).unwrap();
    assert_eq!(first, second);

    let labels: Vec<_> = first.iter().map(|j| j.label()).collect();
    assert_eq!(
        labels,
        vec![
            "windows-2019 / 3.9",
            "windows-2019 / 3.10",
            "windows-2019 / 3.11",
            "ubuntu-latest / 3.9",
            "ubuntu-latest / 3.10",
            "ubuntu-latest / 3.11",
        ]
    );
}

#[tokio::test]
async fn test_sequential_and_parallel_yield_same_verdicts() {
    let sequential = run_with(
        MockRunner::new(),
        TWO_BY_THREE,
        SchedulingStrategy::Sequential,
    )
    .await
    .unwrap();
    let parallel = run_with(
        MockRunner::new(),
        TWO_BY_THREE,
        SchedulingStrategy::LimitedParallel(2),
    )
    .await
    .unwrap();

    let labels = |verdict: &cigrid::PipelineVerdict| -> Vec<String> {
        verdict.jobs.iter().map(|j| j.job.label()).collect()
    };
    assert_eq!(labels(&sequential), labels(&parallel));
    assert_eq!(sequential.status, parallel.status);
}
