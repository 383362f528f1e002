#![allow(dead_code)]

use nagare::engine::{DataContext, RunContext, TraversalEngine};
use nagare::graph::NodeSpec;
use nagare::score::{ScoreReport, aggregate};
use nagare::task::ModuleRegistry;

pub const MODULE_ROOT: &str = "does-not-exist-modules";

/// Run `roots` and return the finished context and its score.
pub fn run_graph(
    registry: &ModuleRegistry,
    ctx: RunContext,
    roots: &[NodeSpec],
) -> (RunContext, ScoreReport) {
    let mut ctx = ctx;
    TraversalEngine::new(registry).run(&mut ctx, roots);
    let report = aggregate(ctx.visited_nodes());
    (ctx, report)
}

pub fn context(strict: bool, propagate: bool) -> RunContext {
    RunContext::new(MODULE_ROOT, DataContext::new())
        .strict(strict)
        .propagate(propagate)
}

pub fn visited_names(ctx: &RunContext) -> Vec<String> {
    ctx.visited_nodes().iter().map(|n| n.name.clone()).collect()
}
