//! Matrix expansion - dimensions and job configurations

use crate::core::config::ConfigError;
use serde::{Deserialize, Serialize};

/// A named axis of variation with an ordered set of discrete values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name (e.g. "os", "python")
    pub name: String,

    /// Ordered values for this dimension
    pub values: Vec<String>,
}

impl Dimension {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// One concrete combination of dimension values - a single point in the
/// cross product
///
/// The selection order matches the dimension declaration order. Identity
/// is the full tuple of selected values; a `JobConfig` is never mutated
/// after expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    selections: Vec<(String, String)>,
}

impl JobConfig {
    /// Create a job config directly from (dimension, value) pairs
    pub fn new(selections: Vec<(String, String)>) -> Self {
        Self { selections }
    }

    /// Build a job config from a user-supplied selection, validating it
    /// against the declared dimensions
    ///
    /// Every dimension must be covered exactly once and each selected
    /// value must be one of the dimension's declared values. Used by the
    /// CLI to run a single job locally.
    pub fn from_selection(
        dimensions: &[Dimension],
        selection: &[(String, String)],
    ) -> Result<Self, ConfigError> {
        for (name, value) in selection {
            let dimension = dimensions
                .iter()
                .find(|d| &d.name == name)
                .ok_or_else(|| ConfigError::UnknownDimension {
                    dimension: name.clone(),
                })?;
            if !dimension.values.iter().any(|v| v == value) {
                return Err(ConfigError::UnknownValue {
                    dimension: name.clone(),
                    value: value.clone(),
                });
            }
        }

        let mut selections = Vec::with_capacity(dimensions.len());
        for dimension in dimensions {
            let value = selection
                .iter()
                .find(|(name, _)| name == &dimension.name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| ConfigError::MissingSelection {
                    dimension: dimension.name.clone(),
                })?;
            selections.push((dimension.name.clone(), value));
        }

        Ok(Self { selections })
    }

    /// Get the selected value for a dimension
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.selections
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over (dimension, value) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Human-readable label, e.g. "windows-2019 / 3.10"
    pub fn label(&self) -> String {
        if self.selections.is_empty() {
            return "default".to_string();
        }
        self.selections
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

/// Expand dimensions into the full cross product of job configurations
///
/// Pure function: the first dimension iterates as the outer loop, each
/// subsequent dimension as a progressively inner loop, so the output
/// order is deterministic and stable across calls. The number of
/// produced configs equals the product of the dimension sizes. Zero
/// dimensions yield exactly one empty job config (a single-job
/// pipeline).
pub fn expand(dimensions: &[Dimension]) -> Result<Vec<JobConfig>, ConfigError> {
    for dimension in dimensions {
        if dimension.values.is_empty() {
            return Err(ConfigError::EmptyDimension {
                dimension: dimension.name.clone(),
            });
        }
    }

    let mut configs: Vec<Vec<(String, String)>> = vec![Vec::new()];
    for dimension in dimensions {
        let mut next = Vec::with_capacity(configs.len() * dimension.values.len());
        for partial in &configs {
            for value in &dimension.values {
                let mut selections = partial.clone();
                selections.push((dimension.name.clone(), value.clone()));
                next.push(selections);
            }
        }
        configs = next;
    }

    Ok(configs.into_iter().map(JobConfig::new).collect())
}
