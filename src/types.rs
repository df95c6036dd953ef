use std::fmt::Display;
use std::hash::Hash;

/// Identifier of a task in a scheduling run.
///
/// Anything that is hashable, totally ordered and printable works. Ordering
/// keeps adjacency lists and batch listings deterministic; `Display` lets
/// errors and rendered schedules name tasks.
pub trait TaskKey: Clone + Eq + Hash + Ord + Display {}

impl<T> TaskKey for T where T: Clone + Eq + Hash + Ord + Display {}

/// Number of simulated time units.
pub type Duration = u64;
