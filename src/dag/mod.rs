// src/dag/mod.rs

//! Dependency graph and batch simulation.
//!
//! - [`graph`] builds the adjacency list and in-degree counts from the
//!   user's dependency map, and validates durations.
//! - [`simulator`] contains the per-run state machine that advances time
//!   round by round and releases dependents as prerequisites finish.
//! - [`round`] defines the rounds and schedule a run produces.

pub mod graph;
pub mod round;
pub mod simulator;

pub use graph::DependencyGraph;
pub use round::{Round, Schedule};
pub use simulator::{RunState, SchedulingRun, schedule};
