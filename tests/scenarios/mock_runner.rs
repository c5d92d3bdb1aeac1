//! Mock action runner for deterministic, fast tests

use async_trait::async_trait;
use cigrid::{ActionRunner, InfrastructureFault, StepOutcome};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One recorded action invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub action: String,
    pub params: HashMap<String, String>,
}

/// Behavior of the mock for one action reference
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Report a logical failure
    Fail(&'static str),
    /// Raise an infrastructure fault
    Fault(&'static str),
    /// Report a logical failure only when a resolved parameter matches
    FailWhen {
        key: &'static str,
        value: &'static str,
        detail: &'static str,
    },
    /// Raise an infrastructure fault only when a resolved parameter
    /// matches - used to inject a fault into exactly one matrix job
    FaultWhen {
        key: &'static str,
        value: &'static str,
        message: &'static str,
    },
}

/// Mock runner with scripted behavior per action reference
///
/// Actions without a scripted behavior succeed. Clones share the
/// invocation log, so a test can keep a probe while the coordinator
/// owns the runner.
#[derive(Clone)]
pub struct MockRunner {
    behaviors: HashMap<String, Behavior>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a behavior for an action reference
    pub fn on(mut self, action: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(action.to_string(), behavior);
        self
    }

    /// All recorded invocations, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .expect("invocation log lock")
            .clone()
    }

    /// Number of recorded invocations
    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().expect("invocation log lock").len()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionRunner for MockRunner {
    async fn invoke(
        &self,
        action: &str,
        params: &HashMap<String, String>,
    ) -> Result<StepOutcome, InfrastructureFault> {
        self.invocations
            .lock()
            .expect("invocation log lock")
            .push(Invocation {
                action: action.to_string(),
                params: params.clone(),
            });

        match self.behaviors.get(action) {
            None => Ok(StepOutcome::Success),
            Some(Behavior::Fail(detail)) => Ok(StepOutcome::Failure {
                detail: detail.to_string(),
            }),
            Some(Behavior::Fault(message)) => {
                Err(InfrastructureFault::Unavailable(message.to_string()))
            }
            Some(Behavior::FailWhen { key, value, detail }) => {
                if params.get(*key).map(String::as_str) == Some(*value) {
                    Ok(StepOutcome::Failure {
                        detail: detail.to_string(),
                    })
                } else {
                    Ok(StepOutcome::Success)
                }
            }
            Some(Behavior::FaultWhen {
                key,
                value,
                message,
            }) => {
                if params.get(*key).map(String::as_str) == Some(*value) {
                    Err(InfrastructureFault::Unavailable(message.to_string()))
                } else {
                    Ok(StepOutcome::Success)
                }
            }
        }
    }
}
