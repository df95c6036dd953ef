// src/format.rs

//! Textual rendering of simulated rounds.
//!
//! Two layouts:
//! - [`OutputFormat::Csv`]: one `"<delta>,<task>,<task>,..."` line per round
//! - [`OutputFormat::Timeline`]: `[start..end]` spans with the tasks that
//!   finish in each round, followed by the makespan
//!
//! Tasks within a round are listed in sorted order; an empty schedule
//! renders to nothing.

use std::fmt::Write as _;

use clap::ValueEnum;

use crate::dag::round::{Round, Schedule};
use crate::types::TaskKey;

/// Output layout as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Timeline,
}

/// Render a single round as `"<delta>,<task>,<task>,..."`.
pub fn render_line<K: TaskKey>(round: &Round<K>) -> String {
    let mut line = round.time_delta.to_string();
    for task in sorted_tasks(round) {
        line.push(',');
        line.push_str(&task.to_string());
    }
    line
}

/// One CSV line per round, in execution order.
pub fn render_lines<K: TaskKey>(rounds: &[Round<K>]) -> Vec<String> {
    rounds.iter().map(render_line).collect()
}

/// Render a whole schedule in the requested layout, newline-terminated.
pub fn render_schedule<K: TaskKey>(schedule: &Schedule<K>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Csv => {
            let mut out = String::new();
            for line in render_lines(schedule.rounds()) {
                out.push_str(&line);
                out.push('\n');
            }
            out
        }
        OutputFormat::Timeline => render_timeline(schedule),
    }
}

fn render_timeline<K: TaskKey>(schedule: &Schedule<K>) -> String {
    let mut out = String::new();
    if schedule.is_empty() {
        return out;
    }

    let width = schedule.makespan().to_string().len();
    for round in schedule.rounds() {
        let tasks = join(sorted_tasks(round));
        let mut done = round.finished.clone();
        done.sort();
        let _ = writeln!(
            out,
            "[{:>width$}..{:>width$}] {} (done: {})",
            round.start,
            round.end(),
            tasks,
            join(done.iter()),
        );
    }
    let _ = writeln!(out, "makespan: {}", schedule.makespan());
    out
}

// `Round::tasks` is sorted by the simulator, but rounds can be built by hand.
fn sorted_tasks<K: TaskKey>(round: &Round<K>) -> impl Iterator<Item = &K> {
    let mut tasks: Vec<&K> = round.tasks.iter().collect();
    tasks.sort();
    tasks.into_iter()
}

fn join<'a, K: TaskKey + 'a>(tasks: impl Iterator<Item = &'a K>) -> String {
    tasks.map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
