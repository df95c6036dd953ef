// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::format::OutputFormat;

/// Command-line arguments for `taskbatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskbatch",
    version,
    about = "Compute which tasks run in parallel, and for how long, given durations and dependencies.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// How to print the schedule.
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKBATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task graph, but don't simulate.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
