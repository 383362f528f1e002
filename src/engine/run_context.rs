// src/engine/run_context.rs

//! Session-wide state for one traversal.

use std::path::{Path, PathBuf};

use crate::config::RunSettings;
use crate::engine::context::DataContext;
use crate::engine::node::{Node, NodeId, VisitedNodes};
use crate::graph::NodeSpec;
use crate::types::DescendPolicy;

/// Everything a traversal reads or writes besides the graph itself.
///
/// Created once per run and handed by reference to every `visit` call.
/// Defaults: `strict = true`, `propagate = false`,
/// `descend = DescendPolicy::Continue`.
#[derive(Debug)]
pub struct RunContext {
    strict: bool,
    propagate: bool,
    descend: DescendPolicy,
    root_context: DataContext,
    module_root: PathBuf,
    visited: VisitedNodes,
    next_id: usize,
}

impl RunContext {
    pub fn new(module_root: impl Into<PathBuf>, root_context: DataContext) -> Self {
        Self {
            strict: true,
            propagate: false,
            descend: DescendPolicy::default(),
            root_context,
            module_root: module_root.into(),
            visited: VisitedNodes::new(),
            next_id: 0,
        }
    }

    pub fn from_settings(settings: &RunSettings, root_context: DataContext) -> Self {
        Self::new(settings.module_root.clone(), root_context)
            .strict(settings.strict)
            .propagate(settings.propagate)
            .descend(settings.descend)
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    pub fn descend(mut self, descend: DescendPolicy) -> Self {
        self.descend = descend;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn is_propagating(&self) -> bool {
        self.propagate
    }

    pub fn descend_policy(&self) -> DescendPolicy {
        self.descend
    }

    pub fn module_root(&self) -> &Path {
        &self.module_root
    }

    /// The caller's data context. After a `propagate` run this holds every
    /// mutation made by the modules; otherwise it is untouched.
    pub fn root_context(&self) -> &DataContext {
        &self.root_context
    }

    pub fn visited_nodes(&self) -> &VisitedNodes {
        &self.visited
    }

    pub(crate) fn take_root_context(&mut self) -> DataContext {
        std::mem::take(&mut self.root_context)
    }

    pub(crate) fn restore_root_context(&mut self, data: DataContext) {
        self.root_context = data;
    }

    pub(crate) fn materialize(&mut self, spec: &NodeSpec) -> Node {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        Node::materialize(id, spec)
    }

    pub(crate) fn register(&mut self, node: Node) -> bool {
        self.visited.register(node)
    }
}
