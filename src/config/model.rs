// src/config/model.rs

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::types::Duration;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [task.A]
/// duration = 1
///
/// [task.B]
/// duration = 2
/// after = ["A"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means
/// every duration is positive and every `after` entry names a declared task.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(task: BTreeMap<String, TaskConfig>) -> Self {
        Self { task }
    }

    /// `task -> duration`, the scheduler's duration map.
    pub fn durations(&self) -> HashMap<String, Duration> {
        self.task
            .iter()
            .map(|(name, tc)| (name.clone(), tc.duration.unsigned_abs()))
            .collect()
    }

    /// `task -> [prerequisites]`, the scheduler's dependency map.
    ///
    /// Tasks without `after` are left out; they are still scheduled through
    /// the duration map.
    pub fn dependencies(&self) -> HashMap<String, Vec<String>> {
        self.task
            .iter()
            .filter(|(_, tc)| !tc.after.is_empty())
            .map(|(name, tc)| (name.clone(), tc.after.clone()))
            .collect()
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Time units the task needs. Signed so that negative values reach
    /// validation and get a proper message.
    pub duration: i64,

    /// Prerequisites: this task starts only after all of these finish.
    /// Repeating a name makes the task wait on it twice.
    #[serde(default)]
    pub after: Vec<String>,

    /// Free-form note shown in `--dry-run` output.
    #[serde(default)]
    pub description: Option<String>,
}
