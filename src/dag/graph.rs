// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::errors::{Result, TaskbatchError};
use crate::types::{Duration, TaskKey};

/// Internal node structure: stores duration, immediate deps and dependents.
#[derive(Debug, Clone)]
struct TaskNode<K> {
    /// Total work units the task needs.
    duration: Duration,
    /// Direct prerequisites, in input order. Duplicates are kept.
    deps: Vec<K>,
    /// Direct dependents: one entry per occurrence in a dependent's list.
    dependents: Vec<K>,
}

/// Immutable dependency graph for one scheduling run.
///
/// Holds the adjacency list (task -> dependents) and the initial in-degree of
/// every task mentioned in either input map. Nodes are kept in a `BTreeMap`
/// so every traversal happens in sorted key order.
#[derive(Debug, Clone)]
pub struct DependencyGraph<K: TaskKey> {
    nodes: BTreeMap<K, TaskNode<K>>,
    /// Sum of all durations; bounds every elapsed time a run can reach.
    total_work: Duration,
}

impl<K: TaskKey> DependencyGraph<K> {
    /// Build the graph from a duration map and a dependency map
    /// (`task -> [prerequisites]`).
    ///
    /// Fails with [`TaskbatchError::ConfigError`] when:
    /// - a task lists itself as a prerequisite
    /// - a task mentioned anywhere has no duration
    /// - a duration is zero
    /// - the durations sum past `u64::MAX` (the makespan could not be represented)
    ///
    /// Cycles are *not* detected here; the simulator reports them when the
    /// ready queue drains early.
    pub fn build(
        durations: &HashMap<K, Duration>,
        dependencies: &HashMap<K, Vec<K>>,
    ) -> Result<Self> {
        let mut dependents_order: Vec<&K> = dependencies.keys().collect();
        dependents_order.sort();

        for &task in &dependents_order {
            if dependencies[task].iter().any(|dep| dep == task) {
                return Err(TaskbatchError::ConfigError(format!(
                    "task '{}' cannot depend on itself",
                    task
                )));
            }
        }

        // Every task mentioned anywhere, with its duration.
        let mut universe: BTreeSet<&K> = durations.keys().collect();
        let mut nodes: BTreeMap<K, TaskNode<K>> = BTreeMap::new();
        let mut total_work: Duration = 0;

        for &task in &dependents_order {
            universe.insert(task);
            for dep in &dependencies[task] {
                if !durations.contains_key(dep) {
                    return Err(TaskbatchError::ConfigError(format!(
                        "task '{}' has no duration (required by '{}')",
                        dep, task
                    )));
                }
                universe.insert(dep);
            }
        }

        for task in universe {
            let duration = *durations.get(task).ok_or_else(|| {
                TaskbatchError::ConfigError(format!("task '{}' has no duration", task))
            })?;
            if duration == 0 {
                return Err(TaskbatchError::ConfigError(format!(
                    "task '{}' must have a positive duration (got 0)",
                    task
                )));
            }
            total_work = total_work.checked_add(duration).ok_or_else(|| {
                TaskbatchError::ConfigError(format!(
                    "task '{}' pushes the total duration past {} time units",
                    task,
                    Duration::MAX
                ))
            })?;
            nodes.insert(
                task.clone(),
                TaskNode {
                    duration,
                    deps: Vec::new(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: wire deps and dependents, one edge per occurrence.
        for &task in &dependents_order {
            let deps = dependencies[task].clone();
            for dep in &deps {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(task.clone());
                }
            }
            if let Some(node) = nodes.get_mut(task) {
                node.deps = deps;
            }
        }

        debug!(tasks = nodes.len(), "dependency graph built");

        Ok(Self { nodes, total_work })
    }

    /// All task identifiers, in sorted order.
    pub fn tasks(&self) -> impl Iterator<Item = &K> {
        self.nodes.keys()
    }

    /// Number of tasks in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, task: &K) -> bool {
        self.nodes.contains_key(task)
    }

    /// Immediate prerequisites of a task, as listed in the input.
    pub fn dependencies_of(&self, task: &K) -> &[K] {
        self.nodes
            .get(task)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks that list this one as a prerequisite).
    pub fn dependents_of(&self, task: &K) -> &[K] {
        self.nodes
            .get(task)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Initial number of unresolved prerequisites (duplicates counted).
    pub fn in_degree_of(&self, task: &K) -> Option<usize> {
        self.nodes.get(task).map(|n| n.deps.len())
    }

    pub fn duration_of(&self, task: &K) -> Option<Duration> {
        self.nodes.get(task).map(|n| n.duration)
    }

    /// Tasks with no prerequisites, in sorted order.
    pub fn roots(&self) -> impl Iterator<Item = &K> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.deps.is_empty())
            .map(|(k, _)| k)
    }

    /// Sum of all durations: an upper bound on the makespan.
    pub fn total_work(&self) -> Duration {
        self.total_work
    }
}
