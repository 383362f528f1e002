// src/engine/traversal.rs

//! Depth-first walk over the node-spec tree.

use tracing::{debug, error, info, warn};

use crate::engine::context::DataContext;
use crate::engine::dispatch::{MALFORMED_RESULT, dispatch};
use crate::engine::node::NodeId;
use crate::engine::run_context::RunContext;
use crate::graph::NodeSpec;
use crate::task::{ModuleRegistry, TaskStatus};
use crate::types::DescendPolicy;

/// Recursive walker tying specs, modules and the run context together.
///
/// Single-threaded: children are visited in declared order, depth first,
/// and a module blocks the walk for as long as it runs.
pub struct TraversalEngine<'r> {
    registry: &'r ModuleRegistry,
}

impl<'r> TraversalEngine<'r> {
    pub fn new(registry: &'r ModuleRegistry) -> Self {
        Self { registry }
    }

    /// Visit every root in order, starting from the run's root context.
    pub fn run(&self, ctx: &mut RunContext, roots: &[NodeSpec]) {
        let mut data = ctx.take_root_context();
        for spec in roots {
            self.visit(ctx, spec, &mut data);
        }
        ctx.restore_root_context(data);

        info!(
            visited = ctx.visited_nodes().len(),
            failed = ctx.visited_nodes().failed_count(),
            "traversal finished"
        );
    }

    /// Visit one spec and, depending on policy and outcome, its children.
    ///
    /// Returns the id of the registered node for command nodes that were
    /// dispatched. Router nodes and specs skipped by the strict halt return
    /// `None`.
    pub fn visit(
        &self,
        ctx: &mut RunContext,
        spec: &NodeSpec,
        data: &mut DataContext,
    ) -> Option<NodeId> {
        // Global halt: one failure anywhere stops every later visit.
        if ctx.is_strict() {
            let failed = ctx.visited_nodes().failed_count();
            if failed > 0 {
                debug!(node = %spec.name, failed, "strict halt, not visiting");
                return None;
            }
        }

        let mut node = ctx.materialize(spec);
        node.visited = true;
        node.messages.push(match &spec.command {
            Some(cmd) => format!("Running: {} ({cmd})", spec.name),
            None => format!("Running: {}", spec.name),
        });
        info!(node = %spec.name, command = ?spec.command, "visiting node");

        let mut branch_copy;
        let branch: &mut DataContext = if ctx.is_propagating() {
            data
        } else {
            branch_copy = data.deep_copy();
            &mut branch_copy
        };

        let Some(command) = spec.command.as_deref() else {
            debug!(node = %spec.name, children = spec.children.len(), "router node, fanning out");
            for child in &spec.children {
                self.visit(ctx, child, branch);
            }
            return None;
        };

        let result = dispatch(self.registry, ctx.module_root(), command, &spec.name, branch);

        node.messages.extend(result.messages().iter().cloned());
        node.errors.extend(result.errors().iter().cloned());

        let mut descend = match result.status() {
            TaskStatus::Error => {
                node.error = true;
                node.messages.push(format!("Error running: {}", spec.name));
                error!(node = %spec.name, command, "node failed");
                if ctx.is_strict() {
                    node.messages.push("Operation stopped".to_string());
                    false
                } else {
                    true
                }
            }
            TaskStatus::Skip => {
                node.skipped = true;
                node.messages.push("Downstream evaluation skipped".to_string());
                warn!(node = %spec.name, command, "node skipped, not visiting children");
                false
            }
            TaskStatus::Success => {
                node.messages.push("Success".to_string());
                info!(node = %spec.name, command, "node succeeded");
                true
            }
        };

        // Legacy graphs only fan out from routers and from modules whose
        // reply was not a result at all.
        if ctx.descend_policy() == DescendPolicy::Legacy {
            let malformed = result.errors().iter().any(|e| e.kind == MALFORMED_RESULT);
            descend = descend && malformed;
        }

        let id = node.id;
        if !ctx.register(node) {
            warn!(node = %spec.name, "node already registered");
        }

        if descend {
            for child in &spec.children {
                self.visit(ctx, child, branch);
            }
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::task::TaskResult;
    use anyhow::anyhow;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> ModuleRegistry {
        let fs = MockFileSystem::new();
        fs.add_dir("mods");
        let mut registry = ModuleRegistry::with_fs(Arc::new(fs));
        registry.register_fn("ok", |_| Ok(TaskResult::success())).unwrap();
        registry.register_fn("fail", |_| Err(anyhow!("boom"))).unwrap();
        registry
            .register_fn("skip", |_| Ok(TaskResult::skip().with_message("not today")))
            .unwrap();
        registry
            .register_fn("soft_fail", |_| Ok(TaskResult::error().with_message("soft")))
            .unwrap();
        registry
            .register_fn("mark", |data| {
                let count = data.get("marks").and_then(|v| v.as_u64()).unwrap_or(0);
                data.insert("marks", count + 1);
                Ok(TaskResult::success())
            })
            .unwrap();
        registry
    }

    fn names(ctx: &RunContext) -> Vec<String> {
        ctx.visited_nodes().iter().map(|n| n.name.clone()).collect()
    }

    fn run(ctx: &mut RunContext, roots: &[NodeSpec]) {
        let registry = registry();
        TraversalEngine::new(&registry).run(ctx, roots);
    }

    #[test]
    fn router_fans_out_without_registering_itself() {
        let graph = NodeSpec::router("root")
            .child(NodeSpec::task("A", "ok"))
            .child(NodeSpec::task("B", "ok"));
        let mut ctx = RunContext::new("mods", DataContext::new());
        run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A", "B"]);
    }

    #[test]
    fn success_descends_into_children() {
        let graph = NodeSpec::task("A", "ok").child(NodeSpec::task("A1", "ok"));
        let mut ctx = RunContext::new("mods", DataContext::new());
        run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A", "A1"]);
    }

    #[test]
    fn legacy_policy_stops_after_any_dispatch() {
        let graph = NodeSpec::router("root")
            .child(NodeSpec::task("A", "ok").child(NodeSpec::task("A1", "ok")))
            .child(NodeSpec::task("B", "ok"));
        let mut ctx = RunContext::new("mods", DataContext::new()).descend(DescendPolicy::Legacy);
        run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A", "B"]);
    }

    #[test]
    fn legacy_policy_descends_after_malformed_reply() {
        let mut registry = registry();
        registry
            .register_fn("garbled", |_| {
                Err(crate::errors::NagareError::MalformedResult {
                    command: "garbled".to_string(),
                    detail: "not a result".to_string(),
                }
                .into())
            })
            .unwrap();
        let graph = NodeSpec::router("root")
            .child(NodeSpec::task("A", "garbled").child(NodeSpec::task("A1", "ok")))
            .child(NodeSpec::task("B", "soft_fail").child(NodeSpec::task("B1", "ok")));
        let mut ctx = RunContext::new("mods", DataContext::new())
            .strict(false)
            .descend(DescendPolicy::Legacy);
        TraversalEngine::new(&registry).run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A", "A1", "B"]);
    }

    #[test]
    fn non_strict_error_still_descends() {
        let graph = NodeSpec::task("A", "soft_fail").child(NodeSpec::task("A1", "ok"));
        let mut ctx = RunContext::new("mods", DataContext::new()).strict(false);
        run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A", "A1"]);
        assert!(ctx.visited_nodes().iter().next().unwrap().error);
    }

    #[test]
    fn strict_error_stops_own_children_and_later_branches() {
        let graph = NodeSpec::router("root")
            .child(NodeSpec::task("A", "fail").child(NodeSpec::task("A1", "ok")))
            .child(NodeSpec::task("B", "ok"));
        let mut ctx = RunContext::new("mods", DataContext::new());
        run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A"]);
        let a = ctx.visited_nodes().iter().next().unwrap();
        assert!(a.messages.iter().any(|m| m == "Operation stopped"));
        assert!(a.messages.iter().any(|m| m.contains("boom")));
    }

    #[test]
    fn skip_is_branch_local() {
        let graph = NodeSpec::router("root")
            .child(NodeSpec::task("A", "skip").child(NodeSpec::task("A1", "ok")))
            .child(NodeSpec::task("B", "ok"));
        let mut ctx = RunContext::new("mods", DataContext::new());
        run(&mut ctx, &[graph]);

        assert_eq!(names(&ctx), ["A", "B"]);
        let a = ctx.visited_nodes().iter().next().unwrap();
        assert!(a.skipped);
        assert!(a.messages.iter().any(|m| m == "not today"));
    }

    #[test]
    fn propagate_shares_mutations_with_root_context() {
        let graph = NodeSpec::router("root")
            .child(NodeSpec::task("A", "mark"))
            .child(NodeSpec::task("B", "mark"));
        let mut ctx = RunContext::new("mods", DataContext::new()).propagate(true);
        run(&mut ctx, &[graph]);

        assert_eq!(ctx.root_context().get("marks"), Some(&json!(2)));
    }

    #[test]
    fn isolated_run_leaves_root_context_untouched() {
        let graph = NodeSpec::task("A", "mark");
        let mut ctx = RunContext::new("mods", DataContext::new());
        run(&mut ctx, &[graph]);

        assert!(ctx.root_context().get("marks").is_none());
    }

    #[test]
    fn visit_returns_registered_id_for_command_nodes_only() {
        let registry = registry();
        let engine = TraversalEngine::new(&registry);
        let mut ctx = RunContext::new("mods", DataContext::new());
        let mut data = DataContext::new();

        let id = engine.visit(&mut ctx, &NodeSpec::task("A", "ok"), &mut data);
        assert!(id.is_some_and(|id| ctx.visited_nodes().contains(id)));

        let none = engine.visit(&mut ctx, &NodeSpec::router("R"), &mut data);
        assert!(none.is_none());
    }
}
