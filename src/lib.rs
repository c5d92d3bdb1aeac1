//! cigrid - a matrix CI execution engine

pub mod actions;
pub mod cli;
pub mod core;
pub mod execution;
pub mod persistence;

// Re-export commonly used types
pub use crate::actions::{ActionRunner, InfrastructureFault, ShellRunner, StepOutcome};
pub use crate::core::{
    ConfigError, Dimension, GatePolicy, JobConfig, JobStatus, JobVerdict, PipelineConfig,
    PipelineStatus, PipelineVerdict, Step, StepRecord, StepStatus, TriggerEvent,
};
pub use crate::execution::{
    ExecutionEvent, JobExecutor, RunCoordinator, RunError, SchedulingStrategy,
};
