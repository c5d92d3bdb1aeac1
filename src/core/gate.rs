//! Gate policy - which steps are blocking

use crate::core::{config::ConfigError, step::Step};
use std::collections::HashMap;

/// Static mapping of step id to blocking/advisory, total over the
/// declared step set
///
/// Built once from configuration and queried by the job executor after
/// each step result. A blocking step's failure fails the job and skips
/// the remaining steps; an advisory failure is recorded and execution
/// continues.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    blocking: HashMap<String, bool>,
}

impl GatePolicy {
    /// Build the policy from the declared step list
    pub fn from_steps(steps: &[Step]) -> Self {
        Self {
            blocking: steps
                .iter()
                .map(|step| (step.id.clone(), step.blocking))
                .collect(),
        }
    }

    /// Is the named step blocking?
    ///
    /// Querying a step that is not declared in the pipeline is a
    /// configuration error.
    pub fn is_blocking(&self, step_id: &str) -> Result<bool, ConfigError> {
        self.blocking
            .get(step_id)
            .copied()
            .ok_or_else(|| ConfigError::UnknownStep {
                step: step_id.to_string(),
            })
    }

    /// Number of declared steps
    pub fn len(&self) -> usize {
        self.blocking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocking.is_empty()
    }
}
