//! Action interface - the boundary to external collaborators
//!
//! Concrete actions (checkout, interpreter provisioning, formatter and
//! linter invocations) live outside the engine. The engine only needs
//! their outcome and treats their internals as opaque.

pub mod shell;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use shell::ShellRunner;

/// The action interface itself could not complete
///
/// Distinguished from a step failure: a fault means the check was never
/// actually performed, not that it failed.
#[derive(Debug, Error)]
pub enum InfrastructureFault {
    #[error("failed to spawn action process: {0}")]
    Spawn(String),

    #[error("I/O failure while running action: {0}")]
    Io(#[from] std::io::Error),

    #[error("action environment unavailable: {0}")]
    Unavailable(String),
}

/// Logical outcome of one action invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The action completed and reported success
    Success,

    /// The action completed but reported a logical failure (e.g. the
    /// format check found unformatted files)
    Failure { detail: String },
}

/// Invokes one action with resolved parameters
///
/// Implementations must not share mutable state between concurrent
/// invocations; each job's executions are independent.
#[async_trait]
pub trait ActionRunner: Send + Sync {
    /// Invoke an action and report its outcome
    ///
    /// A `Err(InfrastructureFault)` means the invocation machinery broke;
    /// a logical failure of the action is `Ok(StepOutcome::Failure)`.
    async fn invoke(
        &self,
        action: &str,
        params: &HashMap<String, String>,
    ) -> Result<StepOutcome, InfrastructureFault>;
}

#[async_trait]
impl<R: ActionRunner + ?Sized> ActionRunner for std::sync::Arc<R> {
    async fn invoke(
        &self,
        action: &str,
        params: &HashMap<String, String>,
    ) -> Result<StepOutcome, InfrastructureFault> {
        (**self).invoke(action, params).await
    }
}
