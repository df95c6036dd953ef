// src/dag/simulator.rs

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, warn};

use crate::dag::graph::DependencyGraph;
use crate::dag::round::{Round, Schedule};
use crate::errors::{Result, TaskbatchError};
use crate::types::{Duration, TaskKey};

/// Lifecycle of a [`SchedulingRun`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed; the ready queue has not been seeded yet.
    Idle,
    /// Rounds are being simulated.
    Running,
    /// Every task finished.
    Completed,
    /// The ready queue drained with tasks still unresolved.
    Deadlocked,
}

/// Tasks left over when a run deadlocks, kept so repeated `step()` calls
/// report the same error.
#[derive(Debug, Clone)]
struct Deadlock {
    unresolved: Vec<String>,
    cycles: Vec<Vec<String>>,
}

impl Deadlock {
    fn to_error(&self) -> TaskbatchError {
        TaskbatchError::CycleDetected {
            unresolved: self.unresolved.clone(),
            cycles: self.cycles.clone(),
        }
    }
}

/// Per-run simulation state over an immutable [`DependencyGraph`].
///
/// Owns everything that changes while rounds are simulated:
/// - remaining duration per task
/// - unresolved prerequisite count per task
/// - the ready queue
/// - elapsed time
///
/// A run is single-use; build a new one to schedule again.
#[derive(Debug)]
pub struct SchedulingRun<'g, K: TaskKey> {
    graph: &'g DependencyGraph<K>,
    remaining: HashMap<K, Duration>,
    in_degree: HashMap<K, usize>,
    ready: VecDeque<K>,
    elapsed: Duration,
    finished: usize,
    rounds_emitted: usize,
    state: RunState,
    deadlock: Option<Deadlock>,
}

impl<'g, K: TaskKey> SchedulingRun<'g, K> {
    pub fn new(graph: &'g DependencyGraph<K>) -> Self {
        let mut remaining = HashMap::with_capacity(graph.len());
        let mut in_degree = HashMap::with_capacity(graph.len());

        for task in graph.tasks() {
            remaining.insert(task.clone(), graph.duration_of(task).unwrap_or(0));
            in_degree.insert(task.clone(), graph.in_degree_of(task).unwrap_or(0));
        }

        Self {
            graph,
            remaining,
            in_degree,
            ready: VecDeque::new(),
            elapsed: 0,
            finished: 0,
            rounds_emitted: 0,
            state: RunState::Idle,
            deadlock: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Simulated time consumed by the rounds emitted so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Tasks eligible for the next round, in queue order.
    pub fn ready_tasks(&self) -> impl Iterator<Item = &K> {
        self.ready.iter()
    }

    pub fn remaining_of(&self, task: &K) -> Option<Duration> {
        self.remaining.get(task).copied()
    }

    /// Current number of unfinished prerequisites of `task`.
    pub fn in_degree_of(&self, task: &K) -> Option<usize> {
        self.in_degree.get(task).copied()
    }

    /// Seed the ready queue with every root task (sorted) and move to `Running`.
    pub fn start(&mut self) {
        if self.state != RunState::Idle {
            warn!(state = ?self.state, "start called on a run that already started; ignoring");
            return;
        }

        self.ready.extend(
            self.in_degree
                .iter()
                .filter(|(_, deg)| **deg == 0)
                .map(|(task, _)| task.clone())
                .collect::<BTreeSet<_>>(),
        );
        self.state = RunState::Running;

        debug!(
            tasks = self.graph.len(),
            roots = self.ready.len(),
            "scheduling run started"
        );
    }

    /// Simulate one round.
    ///
    /// Returns `Ok(Some(round))` while work remains, `Ok(None)` once every
    /// task has finished, and [`TaskbatchError::CycleDetected`] if the ready
    /// queue empties first. An `Idle` run is started implicitly.
    pub fn step(&mut self) -> Result<Option<Round<K>>> {
        match self.state {
            RunState::Idle => self.start(),
            RunState::Running => {}
            RunState::Completed => return Ok(None),
            RunState::Deadlocked => {
                return Err(match &self.deadlock {
                    Some(deadlock) => deadlock.to_error(),
                    None => TaskbatchError::CycleDetected {
                        unresolved: Vec::new(),
                        cycles: Vec::new(),
                    },
                });
            }
        }

        if self.ready.is_empty() {
            return if self.finished < self.graph.len() {
                let deadlock = self.diagnose_deadlock();
                warn!(
                    unresolved = ?deadlock.unresolved,
                    cycles = ?deadlock.cycles,
                    "ready queue empty with unfinished tasks; dependency cycle"
                );
                let err = deadlock.to_error();
                self.deadlock = Some(deadlock);
                self.state = RunState::Deadlocked;
                Err(err)
            } else {
                info!(
                    rounds = self.rounds_emitted,
                    makespan = self.elapsed,
                    "all tasks finished; run completed"
                );
                self.state = RunState::Completed;
                Ok(None)
            };
        }

        // The batch is fixed here; anything unlocked below waits a round.
        let batch: Vec<K> = self.ready.drain(..).collect();

        let mut min_time = Duration::MAX;
        for task in &batch {
            if let Some(&left) = self.remaining.get(task) {
                min_time = min_time.min(left);
            }
        }

        let graph = self.graph;
        let mut finished = Vec::new();

        for task in &batch {
            let Some(left) = self.remaining.get_mut(task) else {
                warn!(task = %task, "ready task missing from remaining map; skipping");
                continue;
            };
            *left -= min_time;

            if *left > 0 {
                self.ready.push_back(task.clone());
                continue;
            }

            finished.push(task.clone());
            self.finished += 1;

            for dependent in graph.dependents_of(task) {
                let Some(deg) = self.in_degree.get_mut(dependent) else {
                    continue;
                };
                match deg.checked_sub(1) {
                    Some(0) => {
                        *deg = 0;
                        debug!(task = %dependent, unlocked_by = %task, "dependent ready for next round");
                        self.ready.push_back(dependent.clone());
                    }
                    Some(n) => *deg = n,
                    None => {
                        warn!(task = %dependent, "in-degree already zero; ignoring extra release");
                    }
                }
            }
        }

        let mut tasks = batch;
        tasks.sort();
        finished.sort();

        let round = Round {
            start: self.elapsed,
            time_delta: min_time,
            tasks,
            finished,
        };
        self.elapsed += min_time;
        self.rounds_emitted += 1;

        debug!(
            round = self.rounds_emitted,
            start = round.start,
            time_delta = round.time_delta,
            tasks = ?round.tasks.iter().map(ToString::to_string).collect::<Vec<_>>(),
            finished = round.finished.len(),
            "round simulated"
        );

        Ok(Some(round))
    }

    /// Drive the run until it completes or deadlocks.
    pub fn run_to_completion(&mut self) -> Result<Schedule<K>> {
        let mut rounds = Vec::new();
        while let Some(round) = self.step()? {
            rounds.push(round);
        }
        Ok(Schedule::new(rounds))
    }

    /// Collect every unfinished task and the cycles among them.
    fn diagnose_deadlock(&self) -> Deadlock {
        let mut stuck: Vec<&K> = self
            .remaining
            .iter()
            .filter(|(_, left)| **left > 0)
            .map(|(task, _)| task)
            .collect();
        stuck.sort();

        // Edge direction: prerequisite -> dependent, restricted to stuck tasks.
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut index: HashMap<&K, NodeIndex> = HashMap::new();
        for &task in &stuck {
            index.insert(task, graph.add_node(task.to_string()));
        }
        for &task in &stuck {
            for dependent in self.graph.dependents_of(task) {
                if let Some(&to) = index.get(dependent) {
                    graph.update_edge(index[task], to, ());
                }
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut names: Vec<String> =
                    component.into_iter().map(|ix| graph[ix].clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();

        Deadlock {
            unresolved: stuck.into_iter().map(ToString::to_string).collect(),
            cycles,
        }
    }
}

/// Build the graph and simulate it to completion in one call.
pub fn schedule<K: TaskKey>(
    durations: &HashMap<K, Duration>,
    dependencies: &HashMap<K, Vec<K>>,
) -> Result<Schedule<K>> {
    let graph = DependencyGraph::build(durations, dependencies)?;
    SchedulingRun::new(&graph).run_to_completion()
}
