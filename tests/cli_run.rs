use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;
use taskbatch::cli::CliArgs;
use taskbatch::errors::TaskbatchError;
use taskbatch::format::OutputFormat;
use taskbatch::run;

const FIVE_TASKS: &str = r#"
[task.A]
duration = 1

[task.B]
duration = 2
after = ["A"]

[task.C]
duration = 7
after = ["A"]

[task.D]
duration = 3
after = ["A", "B"]
description = "waits on A and B"

[task.E]
duration = 3
after = ["C", "B"]
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

fn args_for(path: PathBuf, format: OutputFormat, dry_run: bool) -> CliArgs {
    CliArgs {
        config: path,
        format,
        log_level: None,
        dry_run,
    }
}

fn run_to_string(args: &CliArgs) -> anyhow::Result<String> {
    let mut out = Vec::new();
    run(args, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_csv_output() {
    let file = write_config(FIVE_TASKS);
    let args = args_for(file.path().to_path_buf(), OutputFormat::Csv, false);

    assert_eq!(run_to_string(&args).unwrap(), "1,A\n2,B,C\n3,C,D\n2,C\n3,E\n");
}

#[test]
fn test_timeline_output_ends_with_makespan() {
    let file = write_config(FIVE_TASKS);
    let args = args_for(file.path().to_path_buf(), OutputFormat::Timeline, false);

    let out = run_to_string(&args).unwrap();
    assert_eq!(out.lines().count(), 6);
    assert!(out.ends_with("makespan: 11\n"));
}

#[test]
fn test_dry_run_lists_tasks_without_simulating() {
    let file = write_config(FIVE_TASKS);
    let args = args_for(file.path().to_path_buf(), OutputFormat::Csv, true);

    let out = run_to_string(&args).unwrap();
    assert!(out.starts_with("taskbatch dry-run\n"));
    assert!(out.contains("total work = 16"));
    assert!(out.contains(r#"roots = ["A"]"#));
    assert!(out.contains("tasks (5):"));
    assert!(out.contains("description: waits on A and B"));
    assert!(!out.contains("1,A"));
}

#[test]
fn test_cycle_surfaces_as_error() {
    let file = write_config(
        "[task.A]\nduration = 1\nafter = [\"B\"]\n\n[task.B]\nduration = 1\nafter = [\"A\"]\n",
    );
    let args = args_for(file.path().to_path_buf(), OutputFormat::Csv, false);

    let err = run_to_string(&args).unwrap_err();
    match err.downcast_ref::<TaskbatchError>() {
        Some(TaskbatchError::CycleDetected { unresolved, .. }) => {
            assert_eq!(unresolved.len(), 2);
        }
        other => panic!("expected CycleDetected, got {:?}", other),
    }
}

#[test]
fn test_argument_parsing() {
    let args = CliArgs::try_parse_from(["taskbatch"]).unwrap();
    assert_eq!(args.config, PathBuf::from("Taskbatch.toml"));
    assert_eq!(args.format, OutputFormat::Csv);
    assert!(!args.dry_run);

    let args = CliArgs::try_parse_from([
        "taskbatch",
        "--config",
        "jobs.toml",
        "--format",
        "timeline",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .unwrap();
    assert_eq!(args.config, PathBuf::from("jobs.toml"));
    assert_eq!(args.format, OutputFormat::Timeline);
    assert!(args.log_level.is_some());
    assert!(args.dry_run);

    assert!(CliArgs::try_parse_from(["taskbatch", "--format", "xml"]).is_err());
}

#[test]
fn test_dry_run_rejects_durations_summing_past_u64() {
    let huge = i64::MAX;
    let file = write_config(&format!(
        "[task.A]\nduration = {huge}\n\n[task.B]\nduration = {huge}\nafter = [\"A\"]\n\n[task.C]\nduration = {huge}\nafter = [\"B\"]\n"
    ));
    let args = args_for(file.path().to_path_buf(), OutputFormat::Csv, true);

    let err = run_to_string(&args).unwrap_err();
    match err.downcast_ref::<TaskbatchError>() {
        Some(TaskbatchError::ConfigError(msg)) => assert!(msg.contains("'C'")),
        other => panic!("expected ConfigError, got {:?}", other),
    }
}
