//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

/// Thanksync - thank-you notifications for newly finished test takers.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "thanksync", version)]
#[command(about = "Polls the test-taker API and notifies each eligible taker exactly once")]
pub struct Cli {
    /// Read configuration from this JSON or TOML file instead of the
    /// environment.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit.
    #[arg(long)]
    pub once: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}
