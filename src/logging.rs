// src/logging.rs

//! Logging setup for `taskbatch` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from, in order: `--log-level`, the `TASKBATCH_LOG`
//! environment variable (same names as the flag, case-insensitive), then
//! `warn`. Logs go to stderr; stdout carries only the schedule.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

const LOG_ENV_VAR: &str = "TASKBATCH_LOG";

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Parse a level name the way `--log-level` does. Unknown names yield `None`.
pub fn level_from_str(s: &str) -> Option<LogLevel> {
    <LogLevel as ValueEnum>::from_str(s.trim(), true).ok()
}

/// Resolve the effective level from the CLI flag and the environment.
pub fn effective_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .or_else(|| env_value.and_then(level_from_str))
        .map(Level::from)
        .unwrap_or(Level::WARN)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = effective_level(cli_level, env_value.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
