#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use taskbatch::config::{ConfigFile, RawConfigFile, TaskConfig};
use taskbatch::errors::Result;
use taskbatch::{Duration, Schedule};

/// Builder for the `(durations, dependencies)` pair the scheduler consumes.
#[derive(Debug, Clone, Default)]
pub struct TaskSetBuilder {
    durations: HashMap<String, Duration>,
    dependencies: HashMap<String, Vec<String>>,
}

impl TaskSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task with a duration and no prerequisites.
    pub fn task(mut self, name: &str, duration: Duration) -> Self {
        self.durations.insert(name.to_string(), duration);
        self
    }

    /// Set the prerequisites of `name` (replacing any previous list).
    pub fn after(mut self, name: &str, deps: &[&str]) -> Self {
        self.dependencies.insert(
            name.to_string(),
            deps.iter().map(|d| d.to_string()).collect(),
        );
        self
    }

    pub fn durations(&self) -> &HashMap<String, Duration> {
        &self.durations
    }

    pub fn dependencies(&self) -> &HashMap<String, Vec<String>> {
        &self.dependencies
    }

    pub fn build(self) -> (HashMap<String, Duration>, HashMap<String, Vec<String>>) {
        (self.durations, self.dependencies)
    }

    /// Run the scheduler over the current task set.
    pub fn schedule(&self) -> Result<Schedule<String>> {
        taskbatch::schedule(&self.durations, &self.dependencies)
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(duration: i64) -> Self {
        Self {
            task: TaskConfig {
                duration,
                after: vec![],
                description: None,
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.task.description = Some(text.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
