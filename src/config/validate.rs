// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, TaskbatchError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TaskbatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.task))
    }
}

/// File-level checks. Cycles are left to the simulator, which reports the
/// unresolved tasks along with the cycle.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_durations(cfg)?;
    validate_task_dependencies(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(TaskbatchError::ConfigError(
            "config must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_durations(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if task.duration < 1 {
            return Err(TaskbatchError::ConfigError(format!(
                "task '{}' must have a positive `duration` (got {})",
                name, task.duration
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if dep == name {
                return Err(TaskbatchError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !cfg.task.contains_key(dep) {
                return Err(TaskbatchError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after` (no [task.{}] with a duration)",
                    name, dep, dep
                )));
            }
        }
    }
    Ok(())
}
