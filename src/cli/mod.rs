//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ExpandCommand, HistoryCommand, JobCommand, RunCommand, ValidateCommand};

/// Matrix CI execution engine
#[derive(Debug, Parser, Clone)]
#[command(name = "cigrid")]
#[command(author = "cigrid contributors")]
#[command(version = "0.1.0")]
#[command(about = "A matrix CI execution engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the full job matrix
    Run(RunCommand),

    /// Run a single job configuration locally
    Job(JobCommand),

    /// Print the expanded job matrix
    Expand(ExpandCommand),

    /// Validate a pipeline configuration
    Validate(ValidateCommand),

    /// Show run history
    History(HistoryCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
