//! Scenario: an infrastructure fault in one job never touches siblings

use crate::helpers::*;
use crate::mock_runner::{Behavior, MockRunner};
use cigrid::{JobStatus, SchedulingStrategy, StepStatus};

const MATRIX: &str = r#"
name: "CI"
matrix:
  - name: os
    values: [windows-2019, ubuntu-latest]
  - name: python
    values: ["3.9", "3.10"]
steps:
  - id: setup
    name: "Set up interpreter"
    action: setup
    params:
      os: "{{ os }}"
      python: "{{ python }}"
  - id: lint
    name: "Lint"
    action: lint
    params:
      os: "{{ os }}"
"#;

#[tokio::test]
async fn test_single_fault_leaves_sibling_verdicts_untouched() {
    let faulty = MockRunner::new().on(
        "setup",
        Behavior::FaultWhen {
            key: "python",
            value: "3.10",
            message: "environment unavailable",
        },
    );

    let with_fault = run_with(faulty, MATRIX, SchedulingStrategy::Parallel)
        .await
        .unwrap();
    let control = run_with(MockRunner::new(), MATRIX, SchedulingStrategy::Parallel)
        .await
        .unwrap();

    // The two jobs selecting python 3.10 errored and stopped at setup
    for label in ["windows-2019 / 3.10", "ubuntu-latest / 3.10"] {
        let errored = job(&with_fault, label);
        assert_eq!(errored.status, JobStatus::Errored);
        assert_eq!(
            step_statuses(errored),
            vec![StepStatus::Errored, StepStatus::Skipped]
        );
    }

    // The siblings are byte-for-byte the same as an unfaulted run
    for label in ["windows-2019 / 3.9", "ubuntu-latest / 3.9"] {
        let sibling = job(&with_fault, label);
        let reference = job(&control, label);
        assert_eq!(sibling.status, reference.status);
        assert_eq!(sibling.steps, reference.steps);
    }
}

#[tokio::test]
async fn test_faulted_run_still_completes_every_job() {
    let runner = MockRunner::new().on(
        "setup",
        Behavior::FaultWhen {
            key: "os",
            value: "windows-2019",
            message: "image pull failed",
        },
    );

    let verdict = run_with(runner, MATRIX, SchedulingStrategy::LimitedParallel(2))
        .await
        .unwrap();

    // Errored jobs never block completion of the others
    assert_eq!(verdict.jobs.len(), 4);
    assert_eq!(verdict.count(JobStatus::Errored), 2);
    assert_eq!(verdict.count(JobStatus::Passed), 2);
}
