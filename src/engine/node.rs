// src/engine/node.rs

//! Materialised nodes and the registry of visited ones.

use std::collections::HashSet;

use crate::graph::NodeSpec;
use crate::task::TaskError;

/// Identity of a materialised node within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(raw: usize) -> Self {
        Self(raw)
    }
}

/// One position in the execution tree, with its execution state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub command: Option<String>,
    /// Names of the child specs, in declared order.
    pub children: Vec<String>,
    pub visited: bool,
    pub error: bool,
    pub skipped: bool,
    pub messages: Vec<String>,
    pub errors: Vec<TaskError>,
}

impl Node {
    /// Fresh node for `spec`: flags cleared, log seeded with its name.
    pub fn materialize(id: NodeId, spec: &NodeSpec) -> Self {
        Self {
            id,
            name: spec.name.clone(),
            command: spec.command.clone(),
            children: spec.children.iter().map(|c| c.name.clone()).collect(),
            visited: false,
            error: false,
            skipped: false,
            messages: vec![format!("{}'s report:", spec.name)],
            errors: Vec::new(),
        }
    }
}

/// Nodes that went through dispatch, in registration order.
///
/// A node is stored at most once; registering the same [`NodeId`] again is
/// a no-op.
#[derive(Debug, Default)]
pub struct VisitedNodes {
    nodes: Vec<Node>,
    ids: HashSet<NodeId>,
}

impl VisitedNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a node with the same id was already registered.
    pub fn register(&mut self, node: Node) -> bool {
        if !self.ids.insert(node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn failed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.error).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
