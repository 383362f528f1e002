#![allow(dead_code)]

use nagare::graph::{GraphDocument, NodeSpec};

/// Builder for `GraphDocument` to simplify test setup.
pub struct GraphBuilder {
    nodes: Vec<NodeSpec>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_root(mut self, node: NodeSpec) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn build(self) -> GraphDocument {
        GraphDocument::new(self.nodes)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `root -> [children...]`, the shape most scenarios start from.
pub fn router_with(name: &str, children: Vec<NodeSpec>) -> NodeSpec {
    children
        .into_iter()
        .fold(NodeSpec::router(name), |spec, child| spec.child(child))
}

/// `name_0 -> name_1 -> ... -> name_{len-1}`, every node running `command`.
pub fn chain(name: &str, command: &str, len: usize) -> Option<NodeSpec> {
    (0..len)
        .rev()
        .map(|i| NodeSpec::task(format!("{name}_{i}"), command))
        .reduce(|child, parent| parent.child(child))
}

/// Names of every spec in depth-first, declared order.
pub fn preorder_names(spec: &NodeSpec) -> Vec<String> {
    let mut out = vec![spec.name.clone()];
    for child in &spec.children {
        out.extend(preorder_names(child));
    }
    out
}
