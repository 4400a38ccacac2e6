//! Aislamiento de fallos en `run_children`: un hijo que falla no detiene a
//! sus hermanos ni se propaga al padre.

mod support;

use stepcheck_core::{ExecutionContext, MessageCategory, StatusSeverity, Step};
use support::{visits, Batch, Behaviour, Probe};

#[test]
fn failing_child_does_not_abort_siblings() {
    let mut batch = Batch::new().with_child(Probe::new("first", Behaviour::Finish(StatusSeverity::Success)))
                                .with_child(Probe::new("second", Behaviour::Fail("bad header")))
                                .with_child(Probe::new("third", Behaviour::Finish(StatusSeverity::Success)));
    let mut ctx = ExecutionContext::new();
    batch.execute(&mut ctx).expect("batch never fails");

    assert_eq!(visits(&ctx), vec!["first", "second", "third"]);
    let names: Vec<&str> = batch.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);

    let failed = &batch.children()[1];
    assert_eq!(failed.result().status(), StatusSeverity::UnexpectedSystemError);
    let errors = failed.result().messages_of(MessageCategory::Error);
    assert!(errors[0].contains("batch"), "parent identity missing: {errors:?}");
    assert!(errors.iter().any(|m| m.contains("bad header")));

    assert_eq!(batch.children()[0].result().status(), StatusSeverity::Success);
    assert_eq!(batch.children()[2].result().status(), StatusSeverity::Success);
    assert_eq!(batch.result().status(), StatusSeverity::UnexpectedSystemError);
}

#[test]
fn panicking_child_is_contained_like_an_error() {
    let mut batch = Batch::new().with_child(Probe::new("boom", Behaviour::Panic("index exploded")))
                                .with_child(Probe::new("after", Behaviour::Finish(StatusSeverity::ValidationError)));
    let mut ctx = ExecutionContext::new();
    batch.execute(&mut ctx).unwrap();

    assert_eq!(visits(&ctx), vec!["boom", "after"]);
    let boom = &batch.children()[0];
    assert_eq!(boom.result().status(), StatusSeverity::UnexpectedSystemError);
    assert!(boom.result().messages().iter().any(|m| m.contains("index exploded")));
    assert_eq!(batch.children()[1].result().status(), StatusSeverity::ValidationError);
}

#[test]
fn rollup_of_mixed_children() {
    let mut batch = Batch::new().with_child(Probe::new("c1", Behaviour::Finish(StatusSeverity::ValidationError)))
                                .with_child(Probe::new("c2", Behaviour::Finish(StatusSeverity::Success)))
                                .with_child(Probe::new("c3", Behaviour::Finish(StatusSeverity::UnexpectedSystemError)));
    let mut ctx = ExecutionContext::new();
    batch.execute(&mut ctx).unwrap();
    assert_eq!(batch.aggregate_child_status(), StatusSeverity::UnexpectedSystemError);
}

#[test]
fn same_kind_guard_is_shallow() {
    let mut batch = Batch::new();
    assert!(!batch.add_child(Box::new(Batch::new())));
    assert!(batch.children().is_empty());

    // probe dentro de probe: mismo kind, rechazado
    let mut probe = Probe::new("outer", Behaviour::Finish(StatusSeverity::Success));
    assert!(!probe.add_child(Box::new(Probe::new("inner", Behaviour::Finish(StatusSeverity::Success)))));

    // batch -> probe -> batch: kinds distintos en cada nivel, aceptado
    probe.add_child(Box::new(Batch::new()));
    assert!(batch.add_child(Box::new(probe)));
    assert_eq!(batch.children().len(), 1);
}

#[test]
fn second_execution_overwrites_result_in_place() {
    let mut probe = Probe::new("again", Behaviour::Finish(StatusSeverity::Skipped));
    let mut ctx = ExecutionContext::new();
    assert_eq!(probe.result().status(), StatusSeverity::NotRun);
    probe.execute(&mut ctx).unwrap();
    probe.execute(&mut ctx).unwrap();
    assert_eq!(probe.result().status(), StatusSeverity::Skipped);
    assert_eq!(visits(&ctx), vec!["again", "again"]);
}
