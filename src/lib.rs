// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod format;
pub mod logging;
pub mod types;

use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::{DependencyGraph, SchedulingRun};

pub use crate::dag::{Round, Schedule, schedule};
pub use crate::errors::TaskbatchError;
pub use crate::types::{Duration, TaskKey};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - graph building
/// - the round simulation
/// - rendering to `out`
pub fn run(args: &CliArgs, out: &mut impl Write) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;
    info!(config = ?args.config, tasks = cfg.task.len(), "config loaded");

    let durations = cfg.durations();
    let dependencies = cfg.dependencies();
    let graph = DependencyGraph::build(&durations, &dependencies)?;

    if args.dry_run {
        print_dry_run(&cfg, &graph, out)?;
        return Ok(());
    }

    let schedule = SchedulingRun::new(&graph).run_to_completion()?;
    out.write_all(format::render_schedule(&schedule, args.format).as_bytes())?;
    out.flush()?;

    Ok(())
}

/// Simple dry-run output: print tasks, durations, deps and roots.
fn print_dry_run(
    cfg: &ConfigFile,
    graph: &DependencyGraph<String>,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "taskbatch dry-run")?;
    writeln!(out, "  total work = {}", graph.total_work())?;
    writeln!(
        out,
        "  roots = {:?}",
        graph.roots().map(String::as_str).collect::<Vec<_>>()
    )?;
    writeln!(out)?;

    writeln!(out, "tasks ({}):", cfg.task.len())?;
    for (name, task) in cfg.task.iter() {
        writeln!(out, "  - {name}")?;
        writeln!(out, "      duration: {}", task.duration)?;
        if !task.after.is_empty() {
            writeln!(out, "      after: {:?}", task.after)?;
        }
        if let Some(ref desc) = task.description {
            writeln!(out, "      description: {desc}")?;
        }
    }

    debug!("dry-run complete (no simulation)");
    Ok(())
}
