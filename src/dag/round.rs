// src/dag/round.rs

//! Output types of a scheduling run.

use std::collections::BTreeMap;

use crate::types::{Duration, TaskKey};

/// One simulated round: a fixed batch of tasks active for `time_delta` units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round<K> {
    /// Elapsed time when the round began.
    pub start: Duration,
    /// Length of the round: the smallest remaining duration in the batch.
    pub time_delta: Duration,
    /// Every task active during the round, sorted. Includes tasks that are
    /// still running when the round ends.
    pub tasks: Vec<K>,
    /// Subset of `tasks` that completed at the end of the round, sorted.
    pub finished: Vec<K>,
}

impl<K> Round<K> {
    /// Elapsed time when the round ended.
    pub fn end(&self) -> Duration {
        self.start + self.time_delta
    }
}

/// Ordered sequence of rounds produced by a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<K> {
    rounds: Vec<Round<K>>,
}

impl<K: TaskKey> Schedule<K> {
    pub fn new(rounds: Vec<Round<K>>) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> &[Round<K>] {
        &self.rounds
    }

    pub fn into_rounds(self) -> Vec<Round<K>> {
        self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Total simulated time from the first round's start to the last round's end.
    pub fn makespan(&self) -> Duration {
        self.rounds.last().map(Round::end).unwrap_or(0)
    }

    /// Completion time of every task.
    pub fn finish_times(&self) -> BTreeMap<K, Duration> {
        let mut out = BTreeMap::new();
        for round in &self.rounds {
            for task in &round.finished {
                out.insert(task.clone(), round.end());
            }
        }
        out
    }

    /// `(time_delta, tasks)` pairs, the minimal structured view of the schedule.
    pub fn batches(&self) -> Vec<(Duration, Vec<K>)> {
        self.rounds
            .iter()
            .map(|r| (r.time_delta, r.tasks.clone()))
            .collect()
    }
}
