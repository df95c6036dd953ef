//! Schedule validators shared by integration and property tests.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};
use taskbatch::{Duration, Schedule};

/// Check that `schedule` is a valid execution of the given task set:
///
/// - every task appears in at least one round and finishes exactly once
/// - the deltas of the rounds a task appears in sum to its duration
/// - a task's rounds are contiguous and end with the round it finishes in
/// - every prerequisite finished in a round strictly before the first round
///   its dependent appears in
/// - every round has a positive delta and finishes at least one task
pub fn check_schedule(
    schedule: &Schedule<String>,
    durations: &HashMap<String, Duration>,
    dependencies: &HashMap<String, Vec<String>>,
) -> Result<()> {
    let mut first_round: BTreeMap<&str, usize> = BTreeMap::new();
    let mut last_round: BTreeMap<&str, usize> = BTreeMap::new();
    let mut finished_in: BTreeMap<&str, usize> = BTreeMap::new();
    let mut worked: BTreeMap<&str, Duration> = BTreeMap::new();
    let mut appearances: BTreeMap<&str, usize> = BTreeMap::new();

    for (idx, round) in schedule.rounds().iter().enumerate() {
        if round.time_delta == 0 {
            bail!("round {idx} has a zero time delta");
        }
        if round.finished.is_empty() {
            bail!("round {idx} finishes no task");
        }
        for task in &round.tasks {
            let name = task.as_str();
            first_round.entry(name).or_insert(idx);
            last_round.insert(name, idx);
            *worked.entry(name).or_default() += round.time_delta;
            *appearances.entry(name).or_default() += 1;
        }
        for task in &round.finished {
            if !round.tasks.contains(task) {
                bail!("task {task} finished in round {idx} without being active");
            }
            if finished_in.insert(task.as_str(), idx).is_some() {
                bail!("task {task} finished twice");
            }
        }
    }

    let mut all_tasks: Vec<&String> = durations.keys().collect();
    for (task, deps) in dependencies {
        all_tasks.push(task);
        all_tasks.extend(deps.iter());
    }

    for task in all_tasks {
        let name = task.as_str();
        let Some(&finish) = finished_in.get(name) else {
            bail!("task {task} never finished");
        };
        let expected = durations.get(task).copied().unwrap_or_default();
        let got = worked.get(name).copied().unwrap_or_default();
        if got != expected {
            bail!("task {task} worked {got} units, expected {expected}");
        }
        if last_round[name] != finish {
            bail!("task {task} appears after the round it finished in");
        }
        if appearances[name] != finish - first_round[name] + 1 {
            bail!("task {task} was not active in a contiguous span of rounds");
        }
    }

    for (task, deps) in dependencies {
        let start = first_round[task.as_str()];
        for dep in deps {
            let dep_finish = finished_in[dep.as_str()];
            if dep_finish >= start {
                bail!("task {task} started in round {start} before {dep} finished (round {dep_finish})");
            }
        }
    }

    Ok(())
}
