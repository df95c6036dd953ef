use taskbatch::dag::{DependencyGraph, RunState, SchedulingRun};
use taskbatch::errors::TaskbatchError;
use taskbatch_test_utils::builders::TaskSetBuilder;
use taskbatch_test_utils::init_tracing;

fn graph_of(set: TaskSetBuilder) -> DependencyGraph<String> {
    let (durations, dependencies) = set.build();
    DependencyGraph::build(&durations, &dependencies).expect("valid task set")
}

fn s(name: &str) -> String {
    name.to_string()
}

#[test]
fn test_run_state_transitions() {
    init_tracing();
    let graph = graph_of(
        TaskSetBuilder::new()
            .task("A", 2)
            .task("B", 1)
            .after("B", &["A"]),
    );
    let mut run = SchedulingRun::new(&graph);
    assert_eq!(run.state(), RunState::Idle);
    assert_eq!(run.ready_tasks().count(), 0);

    run.start();
    assert_eq!(run.state(), RunState::Running);
    assert_eq!(run.ready_tasks().cloned().collect::<Vec<_>>(), vec![s("A")]);

    let first = run.step().unwrap().expect("first round");
    assert_eq!(first.start, 0);
    assert_eq!(first.time_delta, 2);
    assert_eq!(first.tasks, vec![s("A")]);
    assert_eq!(first.finished, vec![s("A")]);
    assert_eq!(run.in_degree_of(&s("B")), Some(0));

    let second = run.step().unwrap().expect("second round");
    assert_eq!(second.start, 2);
    assert_eq!(second.end(), 3);
    assert_eq!(run.elapsed(), 3);

    assert!(run.step().unwrap().is_none());
    assert_eq!(run.state(), RunState::Completed);

    // Completed is terminal.
    assert!(run.step().unwrap().is_none());
}

#[test]
fn test_step_on_idle_run_starts_it() {
    let graph = graph_of(TaskSetBuilder::new().task("A", 3));
    let mut run = SchedulingRun::new(&graph);

    let round = run.step().unwrap().expect("round");
    assert_eq!(round.time_delta, 3);
    assert_eq!(run.state(), RunState::Running);
}

#[test]
fn test_start_twice_is_ignored() {
    let graph = graph_of(TaskSetBuilder::new().task("A", 1).task("B", 1));
    let mut run = SchedulingRun::new(&graph);
    run.start();
    run.start();

    assert_eq!(run.ready_tasks().count(), 2);
}

#[test]
fn test_unfinished_tasks_keep_their_remaining_work() {
    let graph = graph_of(TaskSetBuilder::new().task("long", 7).task("short", 2));
    let mut run = SchedulingRun::new(&graph);

    let round = run.step().unwrap().unwrap();
    assert_eq!(round.time_delta, 2);
    assert_eq!(round.tasks, vec![s("long"), s("short")]);
    assert_eq!(round.finished, vec![s("short")]);
    assert_eq!(run.remaining_of(&s("long")), Some(5));
    assert_eq!(run.remaining_of(&s("short")), Some(0));
}

#[test]
fn test_task_unlocked_mid_round_waits_for_next_round() {
    // A finishes after 1 unit while B keeps running; C (after A) must not
    // join the round A finished in.
    let graph = graph_of(
        TaskSetBuilder::new()
            .task("A", 1)
            .task("B", 5)
            .task("C", 1)
            .after("C", &["A"]),
    );
    let mut run = SchedulingRun::new(&graph);

    let first = run.step().unwrap().unwrap();
    assert_eq!(first.tasks, vec![s("A"), s("B")]);
    assert!(!first.tasks.contains(&s("C")));

    // Queue order follows the batch: A's release of C comes before B's re-enqueue.
    assert_eq!(
        run.ready_tasks().cloned().collect::<Vec<_>>(),
        vec![s("C"), s("B")]
    );

    let second = run.step().unwrap().unwrap();
    assert_eq!(second.time_delta, 1);
    assert_eq!(second.tasks, vec![s("B"), s("C")]);

    let third = run.step().unwrap().unwrap();
    assert_eq!((third.time_delta, third.tasks), (3, vec![s("B")]));
}

#[test]
fn test_two_task_cycle_is_detected() {
    init_tracing();
    let graph = graph_of(
        TaskSetBuilder::new()
            .task("A", 1)
            .task("B", 1)
            .after("A", &["B"])
            .after("B", &["A"]),
    );
    let mut run = SchedulingRun::new(&graph);

    match run.run_to_completion() {
        Err(TaskbatchError::CycleDetected { unresolved, cycles }) => {
            assert_eq!(unresolved, vec![s("A"), s("B")]);
            assert_eq!(cycles, vec![vec![s("A"), s("B")]]);
        }
        other => panic!("expected CycleDetected, got {:?}", other),
    }
    assert_eq!(run.state(), RunState::Deadlocked);

    // Deadlocked is terminal and keeps reporting the same tasks.
    match run.step() {
        Err(TaskbatchError::CycleDetected { unresolved, .. }) => {
            assert_eq!(unresolved, vec![s("A"), s("B")]);
        }
        other => panic!("expected CycleDetected again, got {:?}", other),
    }
}

#[test]
fn test_cycle_after_progress_reports_downstream_tasks() {
    // root runs first; the A/B/C cycle hangs off it and D waits on the cycle.
    let graph = graph_of(
        TaskSetBuilder::new()
            .task("root", 2)
            .task("A", 1)
            .task("B", 1)
            .task("C", 1)
            .task("D", 1)
            .after("A", &["root", "C"])
            .after("B", &["A"])
            .after("C", &["B"])
            .after("D", &["A"]),
    );
    let mut run = SchedulingRun::new(&graph);

    let first = run.step().unwrap().unwrap();
    assert_eq!(first.tasks, vec![s("root")]);

    let err = run.step().unwrap_err();
    match err {
        TaskbatchError::CycleDetected { unresolved, cycles } => {
            assert_eq!(unresolved, vec![s("A"), s("B"), s("C"), s("D")]);
            assert_eq!(cycles, vec![vec![s("A"), s("B"), s("C")]]);
        }
        other => panic!("expected CycleDetected, got {:?}", other),
    }
}

#[test]
fn test_cycle_error_message_names_tasks() {
    let set = TaskSetBuilder::new()
        .task("x", 1)
        .task("y", 1)
        .after("x", &["y"])
        .after("y", &["x"]);

    let err = set.schedule().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cycle detected in DAG: unresolved tasks [x, y]"
    );
}
