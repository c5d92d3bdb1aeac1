//! Shell action runner - executes command-carrying steps as subprocesses

use crate::actions::{ActionRunner, InfrastructureFault, StepOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs actions by handing their `command` parameter to a shell
///
/// Steps without a `command` parameter (checkout, interpreter
/// provisioning) are treated as no-ops when running locally; the CI
/// host performs those for real.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    /// Shell executable (e.g. "sh", "/bin/bash")
    shell: String,
}

impl ShellRunner {
    /// Create a runner using the given shell
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    #[cfg(test)]
    pub fn shell(&self) -> &str {
        &self.shell
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

#[async_trait]
impl ActionRunner for ShellRunner {
    async fn invoke(
        &self,
        action: &str,
        params: &HashMap<String, String>,
    ) -> Result<StepOutcome, InfrastructureFault> {
        let Some(command) = params.get("command") else {
            debug!("action '{}' carries no command, treating as local no-op", action);
            return Ok(StepOutcome::Success);
        };

        debug!("spawning '{}' for action '{}'", command, action);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command).kill_on_drop(true);

        // Resolved parameters are visible to the command as CIGRID_* vars
        for (key, value) in params {
            if key != "command" {
                cmd.env(format!("CIGRID_{}", key.to_uppercase().replace('-', "_")), value);
            }
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| InfrastructureFault::Spawn(format!("{}: {}", self.shell, e)))?;

        if output.status.success() {
            return Ok(StepOutcome::Success);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let exit_code = output.status.code().unwrap_or(-1);
        warn!(
            "action '{}' exited with code {}: {}",
            action,
            exit_code,
            stderr.trim()
        );
        Ok(StepOutcome::Failure {
            detail: format!("exited with code {}: {}", exit_code, stderr.trim()),
        })
    }
}
