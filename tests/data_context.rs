// tests/data_context.rs

mod common;

use common::{context, run_graph};
use nagare::engine::{DataContext, RunContext};
use nagare::graph::NodeSpec;
use nagare_test_utils::builders::router_with;
use nagare_test_utils::init_tracing;
use nagare_test_utils::modules::{CallLog, record, test_registry};
use serde_json::{Value, json};

fn trail(data: &DataContext) -> Vec<String> {
    match data.get("trail") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// root -> [A -> [A1], B]
fn graph(a: &str, a1: &str, b: &str) -> NodeSpec {
    router_with(
        "root",
        vec![
            NodeSpec::task("A", a).child(NodeSpec::task("A1", a1)),
            NodeSpec::task("B", b),
        ],
    )
}

#[test]
fn isolated_siblings_do_not_see_each_other() {
    init_tracing();

    let log = CallLog::new();
    let mut registry = test_registry();
    let a = record(&mut registry, "a", &log);
    let a1 = record(&mut registry, "a1", &log);
    let b = record(&mut registry, "b", &log);

    run_graph(&registry, context(true, false), &[graph(&a, &a1, &b)]);

    let seen = log.contexts();
    assert_eq!(log.commands(), [a.clone(), a1.clone(), b.clone()]);
    // A1 is a descendant of A and sees A's mutation.
    assert_eq!(trail(&seen[1].1), [a.clone()]);
    // B is a sibling of A and sees nothing from A's branch.
    assert!(trail(&seen[2].1).is_empty());
}

#[test]
fn propagated_context_is_seen_by_everything_later() {
    init_tracing();

    let log = CallLog::new();
    let mut registry = test_registry();
    let a = record(&mut registry, "a", &log);
    let a1 = record(&mut registry, "a1", &log);
    let b = record(&mut registry, "b", &log);

    let (ctx, _) = run_graph(&registry, context(true, true), &[graph(&a, &a1, &b)]);

    let seen = log.contexts();
    assert_eq!(trail(&seen[1].1), [a.clone()]);
    assert_eq!(trail(&seen[2].1), [a.clone(), a1.clone()]);
    assert_eq!(trail(ctx.root_context()), [a, a1, b]);
}

#[test]
fn initial_context_reaches_first_module() {
    init_tracing();

    let log = CallLog::new();
    let mut registry = test_registry();
    let a = record(&mut registry, "a", &log);

    let data = DataContext::from_value(json!({"who": "someone", "nested": {"n": 1}})).unwrap();
    let ctx = RunContext::new(common::MODULE_ROOT, data.clone());
    let (ctx, _) = run_graph(&registry, ctx, &[NodeSpec::task("A", &a)]);

    assert_eq!(log.contexts()[0].1, data);
    // Not propagating: the caller's context is left as it was.
    assert_eq!(ctx.root_context(), &data);
}

#[test]
fn builtin_change_why_is_visible_downstream_only() {
    init_tracing();

    let mut registry = nagare::task::ModuleRegistry::with_builtins();
    let log = CallLog::new();
    let watcher = record(&mut registry, "watcher", &log);

    let graph = router_with(
        "root",
        vec![
            NodeSpec::task("change", "debug.change_why").child(NodeSpec::task("below", &watcher)),
            NodeSpec::task("beside", &watcher),
        ],
    );

    run_graph(&registry, context(true, false), &[graph]);

    let seen = log.contexts();
    assert!(seen[0].1.get("why").is_some());
    assert!(seen[1].1.get("why").is_none());
}
