//! Pipeline execution engine

pub mod coordinator;
pub mod executor;

pub use coordinator::{EventHandler, ExecutionEvent, RunCoordinator, RunError, SchedulingStrategy};
pub use executor::{JobExecutor, StepObserver};
