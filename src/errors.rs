// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskbatchError {
    /// Bad input: a referenced task without a duration, a zero duration,
    /// a self-dependency, or an invalid config file.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The ready queue drained while tasks were still unresolved.
    ///
    /// `unresolved` lists every task that never finished; `cycles` lists the
    /// dependency cycles found among them (a task downstream of a cycle is
    /// unresolved without being part of one).
    #[error("Cycle detected in DAG: unresolved tasks [{}]", .unresolved.join(", "))]
    CycleDetected {
        unresolved: Vec<String>,
        cycles: Vec<Vec<String>>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskbatchError>;
