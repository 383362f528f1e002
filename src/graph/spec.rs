// src/graph/spec.rs

use serde::{Deserialize, Serialize};

/// One node of the graph description, as loaded.
///
/// A spec without a `command` is a router: it only fans out to its children.
/// Extra fields written by graph editors (uuid, coordinates, description)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Downstream nodes in declared order. `out_nodes` is accepted too.
    #[serde(default, alias = "out_nodes")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn router(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            children: Vec::new(),
        }
    }

    pub fn task(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: Some(command.into()),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Number of specs in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::subtree_len).sum::<usize>()
    }
}

/// The root list of a graph description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeSpec>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<NodeSpec>) -> Self {
        Self { nodes }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(NodeSpec::subtree_len).sum()
    }
}
