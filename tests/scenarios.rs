// tests/scenarios.rs

mod common;
use crate::common::builders::{TaskJsonBuilder, WorkflowJsonBuilder};
use crate::common::{capture_logs, id, init_tracing, level_names};

use wfdag::dag::{build, LeveledPlan};
use wfdag::workflow::{load_from_str, TaskRecord};

fn plan_from_json(doc: WorkflowJsonBuilder) -> LeveledPlan {
    let workflow = load_from_str(&doc.to_json_string()).expect("valid workflow JSON");
    LeveledPlan::from_workflow(&workflow).expect("buildable workflow")
}

#[test]
fn sequence_through_a_file() {
    init_tracing();

    let plan = build([
        TaskRecord::new("T1").with_output("f1"),
        TaskRecord::new("T2").with_input("f1"),
    ])
    .unwrap();

    assert_eq!(level_names(&plan), vec![vec!["T1"], vec!["T2"]]);
    assert!(plan.parents_of(id(&plan, "T2")).unwrap().contains(&id(&plan, "T1")));
    assert!(plan.children_of(id(&plan, "T1")).unwrap().contains(&id(&plan, "T2")));
}

#[test]
fn join_of_two_producers() {
    init_tracing();

    let plan = build([
        TaskRecord::new("T1").with_output("f1"),
        TaskRecord::new("T2").with_output("f2"),
        TaskRecord::new("T3").with_input("f1").with_input("f2"),
    ])
    .unwrap();

    assert_eq!(level_names(&plan), vec![vec!["T1", "T2"], vec!["T3"]]);
    assert_eq!(plan.parents_of(id(&plan, "T3")).unwrap().len(), 2);
}

#[test]
fn external_input_is_not_an_error() {
    let (plan, logs) =
        capture_logs(|| build([TaskRecord::new("T1").with_input("external.dat")]));
    let plan = plan.unwrap();

    assert_eq!(level_names(&plan), vec![vec!["T1"]]);
    assert!(plan.parents_of(id(&plan, "T1")).unwrap().is_empty());

    let line = logs
        .lines()
        .find(|l| l.contains("external input"))
        .unwrap_or_else(|| panic!("no external input event in:\n{logs}"));
    assert!(line.contains("INFO"), "{line}");
    assert!(line.contains("task=T1"), "{line}");
    assert!(line.contains("reference=external.dat"), "{line}");
}

#[test]
fn unknown_child_is_logged_as_terminal_output() {
    let (plan, logs) = capture_logs(|| build([TaskRecord::new("T1").with_child("archive")]));

    assert_eq!(plan.unwrap().task_count(), 1);
    assert!(
        logs.lines()
            .any(|l| l.contains("terminal output") && l.contains("reference=archive")),
        "{logs}"
    );
}

#[test]
fn json_workflow_with_mixed_declarations() {
    init_tracing();

    // split -> {left, right} -> merge, declared through every kind of link:
    // a file, an explicit parent, a one-sided `childrens` entry.
    let doc = WorkflowJsonBuilder::new("diamond")
        .with_task(
            TaskJsonBuilder::new("split")
                .command(&["split", "data.in"])
                .input("data.in")
                .output("part.a")
                .childrens(&["right"]),
        )
        .with_task(
            TaskJsonBuilder::new("left")
                .command(&["proc", "part.a"])
                .input("part.a")
                .output("left.out"),
        )
        .with_task(TaskJsonBuilder::new("right").output("right.out"))
        .with_task(
            TaskJsonBuilder::new("merge")
                .parents(&["right"])
                .input("left.out")
                .output("final.out"),
        );

    let plan = plan_from_json(doc);

    assert_eq!(plan.workflow_name(), "diamond");
    assert_eq!(
        level_names(&plan),
        vec![vec!["split"], vec!["left", "right"], vec!["merge"]]
    );

    let right = id(&plan, "right");
    assert!(plan.parents_of(right).unwrap().contains(&id(&plan, "split")));
    assert_eq!(plan.level_of(id(&plan, "merge")), Some(2));
}

#[test]
fn identifiers_follow_declaration_order() {
    let doc = WorkflowJsonBuilder::new("order")
        .with_task(TaskJsonBuilder::new("zeta").input("x"))
        .with_task(TaskJsonBuilder::new("alpha").output("x"));

    let plan = plan_from_json(doc);

    assert_eq!(id(&plan, "zeta").to_string(), "dv_0");
    assert_eq!(id(&plan, "alpha").to_string(), "dv_1");
    // alpha produces x, so it runs first despite its larger identifier.
    assert_eq!(level_names(&plan), vec![vec!["alpha"], vec!["zeta"]]);
}

#[test]
fn rebuilding_the_same_workflow_yields_the_same_plan() {
    let tasks = || {
        vec![
            TaskRecord::new("c").with_input("b.out"),
            TaskRecord::new("a").with_output("a.out"),
            TaskRecord::new("b").with_input("a.out").with_output("b.out"),
            TaskRecord::new("d").with_parent("a"),
        ]
    };

    let first = build(tasks()).unwrap();
    let second = build(tasks()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn unrelated_tasks_share_level_zero() {
    let plan = build([
        TaskRecord::new("a").with_command(["true"]),
        TaskRecord::new("b").with_command(["true"]),
        TaskRecord::new("c"),
    ])
    .unwrap();

    assert_eq!(plan.len(), 1);
    assert_eq!(plan.task_count(), 3);
    assert_eq!(plan.level(0).unwrap().len(), 3);
}

#[test]
fn empty_workflow_has_no_levels() {
    let plan = build(Vec::<TaskRecord>::new()).unwrap();

    assert!(plan.is_empty());
    assert_eq!(plan.task_count(), 0);
    assert_eq!(plan.to_string(), "");
}

#[test]
fn plan_json_lists_levels_with_resolved_edges() {
    let plan = build([
        TaskRecord::new("T1").with_output("f1"),
        TaskRecord::new("T2").with_input("f1"),
    ])
    .unwrap();

    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["name"], "workflow");
    assert_eq!(json["levels"][0][0]["id"], "dv_0");
    assert_eq!(json["levels"][0][0]["children"][0], "dv_1");
    assert_eq!(json["levels"][1][0]["name"], "T2");
    assert_eq!(json["levels"][1][0]["parents"][0], "dv_0");
}
