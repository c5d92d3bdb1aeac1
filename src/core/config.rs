//! Pipeline configuration from YAML

use crate::core::{
    gate::GatePolicy,
    matrix::Dimension,
    step::Step,
    trigger::TriggerEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Malformed or inconsistent pipeline definition
///
/// Fatal: surfaced before any job is dispatched, so a bad configuration
/// never produces a partial run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dimension '{dimension}' has no values")]
    EmptyDimension { dimension: String },

    #[error("duplicate dimension name: {dimension}")]
    DuplicateDimension { dimension: String },

    #[error("dimension '{dimension}' lists value '{value}' more than once")]
    DuplicateValue { dimension: String, value: String },

    #[error("duplicate step id: {step}")]
    DuplicateStep { step: String },

    #[error("pipeline declares no steps")]
    NoSteps,

    #[error("step '{step}' references unknown dimension '{key}' in its parameters")]
    UnknownParameter { step: String, key: String },

    #[error("unknown step: {step}")]
    UnknownStep { step: String },

    #[error("unknown dimension: {dimension}")]
    UnknownDimension { dimension: String },

    #[error("dimension '{dimension}' has no value '{value}'")]
    UnknownValue { dimension: String, value: String },

    #[error("no value selected for dimension '{dimension}'")]
    MissingSelection { dimension: String },

    #[error("failed to read pipeline file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse pipeline YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Pipeline version (optional)
    #[serde(default)]
    pub version: Option<String>,

    /// Trigger filters; absent means the pipeline runs for any event
    #[serde(default, rename = "on")]
    pub triggers: Option<TriggerConfig>,

    /// Ordered matrix dimensions; absent means a single job
    #[serde(default)]
    pub matrix: Vec<DimensionConfig>,

    /// Pipeline steps, executed in declaration order within each job
    pub steps: Vec<StepConfig>,

    /// Upper bound on concurrently running jobs
    #[serde(default)]
    pub max_parallel: Option<usize>,
}

/// One matrix dimension as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionConfig {
    /// Dimension name
    pub name: String,

    /// Ordered values
    pub values: Vec<String>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Unique step identifier
    pub id: String,

    /// Human-readable step name
    pub name: String,

    /// Optional step description
    #[serde(default)]
    pub description: Option<String>,

    /// Action reference, opaque to the engine
    #[serde(default = "default_action")]
    pub action: String,

    /// Action parameters; values may reference dimensions as
    /// `{{ dimension }}`
    #[serde(default)]
    pub params: std::collections::HashMap<String, String>,

    /// Whether a failure of this step fails the job (default) or is
    /// advisory
    #[serde(default = "default_blocking")]
    pub blocking: bool,
}

fn default_action() -> String {
    "run-command".to_string()
}

fn default_blocking() -> bool {
    true
}

/// Trigger filters, keyed by event kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerConfig {
    #[serde(default)]
    pub push: Option<BranchFilter>,

    #[serde(default)]
    pub pull_request: Option<BranchFilter>,
}

/// Branch filter for one event kind; an empty list matches any branch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchFilter {
    #[serde(default)]
    pub branches: Vec<String>,
}

impl BranchFilter {
    fn matches(&self, branch: &str) -> bool {
        self.branches.is_empty() || self.branches.iter().any(|b| b == branch)
    }
}

impl TriggerConfig {
    /// Should the pipeline run for this event?
    pub fn accepts(&self, event: &TriggerEvent) -> bool {
        let filter = match event {
            TriggerEvent::Push { .. } => self.push.as_ref(),
            TriggerEvent::PullRequest { .. } => self.pull_request.as_ref(),
        };
        match filter {
            Some(filter) => filter.matches(event.branch()),
            None => false,
        }
    }
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    ///
    /// Fails fast with the first inconsistency found; a config that does
    /// not validate never reaches the coordinator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }

        let mut seen_dimensions = HashSet::new();
        for dimension in &self.matrix {
            if !seen_dimensions.insert(&dimension.name) {
                return Err(ConfigError::DuplicateDimension {
                    dimension: dimension.name.clone(),
                });
            }
            if dimension.values.is_empty() {
                return Err(ConfigError::EmptyDimension {
                    dimension: dimension.name.clone(),
                });
            }
            let mut seen_values = HashSet::new();
            for value in &dimension.values {
                if !seen_values.insert(value) {
                    return Err(ConfigError::DuplicateValue {
                        dimension: dimension.name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        let mut seen_steps = HashSet::new();
        for step in &self.steps {
            if !seen_steps.insert(&step.id) {
                return Err(ConfigError::DuplicateStep {
                    step: step.id.clone(),
                });
            }
        }

        // Step parameters may only reference declared dimensions
        let dimension_names: HashSet<&str> =
            self.matrix.iter().map(|d| d.name.as_str()).collect();
        for step in self.steps() {
            for key in step.placeholder_keys() {
                if !dimension_names.contains(key.as_str()) {
                    return Err(ConfigError::UnknownParameter {
                        step: step.id.clone(),
                        key,
                    });
                }
            }
        }

        Ok(())
    }

    /// Should the pipeline run for this event?
    ///
    /// A pipeline without trigger filters runs for any event.
    pub fn accepts(&self, event: &TriggerEvent) -> bool {
        match &self.triggers {
            Some(triggers) => triggers.accepts(event),
            None => true,
        }
    }

    /// Convert config dimensions to the domain model
    pub fn dimensions(&self) -> Vec<Dimension> {
        self.matrix
            .iter()
            .map(|d| Dimension::new(d.name.clone(), d.values.clone()))
            .collect()
    }

    /// Convert config steps to the domain model
    pub fn steps(&self) -> Vec<Step> {
        self.steps.iter().map(Step::from_config).collect()
    }

    /// Build the gate policy over the declared steps
    pub fn gate_policy(&self) -> GatePolicy {
        GatePolicy::from_steps(&self.steps())
    }
}
