//! Step domain model

use crate::core::{config::StepConfig, matrix::JobConfig};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Placeholder syntax accepted in step parameters: `{{ dimension }}`
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_][A-Za-z0-9_.-]*)\s*\}\}")
            .expect("placeholder pattern is valid")
    })
}

/// A single step in the pipeline
///
/// Steps are defined once per pipeline and shared read-only across all
/// job configurations. The action reference is opaque to the engine -
/// only the action runner interprets it.
#[derive(Debug, Clone)]
pub struct Step {
    /// Unique step identifier
    pub id: String,

    /// Human-readable step name
    pub name: String,

    /// Opaque action reference (e.g. "checkout", "run-command")
    pub action: String,

    /// Parameters passed to the action, may contain `{{ dimension }}`
    /// placeholders
    pub params: HashMap<String, String>,

    /// Whether a failure of this step fails the job and skips the rest
    pub blocking: bool,
}

impl Step {
    /// Create a step from a step config
    pub fn from_config(config: &StepConfig) -> Self {
        Step {
            id: config.id.clone(),
            name: config.name.clone(),
            action: config.action.clone(),
            params: config.params.clone(),
            blocking: config.blocking,
        }
    }

    /// Resolve parameters for one job by substituting its dimension values
    ///
    /// Placeholders referencing unknown names are left untouched; the
    /// configuration validator rejects them before any job is dispatched.
    pub fn resolve_params(&self, job: &JobConfig) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(key, template)| {
                let resolved = placeholder_pattern()
                    .replace_all(template, |caps: &regex::Captures| {
                        match job.get(&caps[1]) {
                            Some(value) => value.to_string(),
                            None => caps[0].to_string(),
                        }
                    })
                    .into_owned();
                (key.clone(), resolved)
            })
            .collect()
    }

    /// Collect the placeholder names referenced by this step's parameters
    pub fn placeholder_keys(&self) -> HashSet<String> {
        self.params
            .values()
            .flat_map(|template| {
                placeholder_pattern()
                    .captures_iter(template)
                    .map(|caps| caps[1].to_string())
            })
            .collect()
    }
}
