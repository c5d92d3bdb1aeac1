//! CLI command definitions

use crate::execution::SchedulingStrategy;
use clap::Args;

/// Run the full job matrix
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Scheduling strategy
    #[arg(long, value_enum, default_value_t = SchedulingStrategyArg::Parallel)]
    pub strategy: SchedulingStrategyArg,

    /// Don't save the run to history
    #[arg(long)]
    pub no_history: bool,

    /// Simulate a trigger event instead of running unconditionally
    #[arg(long, value_enum)]
    pub event: Option<EventKindArg>,

    /// Branch the event targets (pushed branch, or PR target branch)
    #[arg(long, default_value = "main")]
    pub branch: String,

    /// Source branch of a pull-request event
    #[arg(long, default_value = "work")]
    pub source_branch: String,

    /// Commit reference carried by the event
    #[arg(long, default_value = "HEAD")]
    pub commit: String,
}

/// Run a single job configuration locally
#[derive(Debug, Args, Clone)]
pub struct JobCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Dimension selection (dimension=value), once per dimension
    #[arg(long = "select", value_parser = parse_key_value)]
    pub select: Vec<(String, String)>,
}

/// Print the expanded job matrix
#[derive(Debug, Args, Clone)]
pub struct ExpandCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Show run history
#[derive(Debug, Args, Clone)]
pub struct HistoryCommand {
    /// Pipeline name to filter by
    #[arg(short, long)]
    pub pipeline: Option<String>,

    /// Number of recent runs to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show a specific run by id
    #[arg(long)]
    pub run_id: Option<String>,
}

/// Scheduling strategy argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchedulingStrategyArg {
    Sequential,
    Parallel,
    #[clap(name = "parallel-limited")]
    ParallelLimited,
}

impl SchedulingStrategyArg {
    /// Convert to the engine strategy, taking the concurrency bound from
    /// configuration when limited
    pub fn to_strategy(self, max_parallel: Option<usize>) -> SchedulingStrategy {
        match self {
            SchedulingStrategyArg::Sequential => SchedulingStrategy::Sequential,
            SchedulingStrategyArg::Parallel => SchedulingStrategy::Parallel,
            SchedulingStrategyArg::ParallelLimited => {
                SchedulingStrategy::LimitedParallel(max_parallel.unwrap_or(4))
            }
        }
    }
}

/// Trigger event kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventKindArg {
    Push,
    #[clap(name = "pull-request")]
    PullRequest,
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid key=value pair: {}", s));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}
