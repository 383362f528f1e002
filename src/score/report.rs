// src/score/report.rs

//! Reduction of the visited-node registry into the final score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{Node, VisitedNodes};
use crate::task::TaskError;

/// Final status of a node. When several flags are set, `Error` wins over
/// `Skipped`, which wins over `Success`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Error,
    Skipped,
    Success,
}

impl NodeStatus {
    pub fn of(node: &Node) -> Self {
        if node.error {
            NodeStatus::Error
        } else if node.skipped {
            NodeStatus::Skipped
        } else {
            NodeStatus::Success
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Error => f.write_str("error"),
            NodeStatus::Skipped => f.write_str("skipped"),
            NodeStatus::Success => f.write_str("success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeScore {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub status: NodeStatus,
    pub messages: Vec<String>,
    pub errors: Vec<TaskError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub errors: usize,
    pub skipped: usize,
    pub successes: usize,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} node(s): {} succeeded, {} failed, {} skipped",
            self.total, self.successes, self.errors, self.skipped
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub summary: ScoreSummary,
    pub nodes: Vec<NodeScore>,
}

impl ScoreReport {
    pub fn node(&self, name: &str) -> Option<&NodeScore> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

/// Build the score from the visited nodes, in registration order.
pub fn aggregate(visited: &VisitedNodes) -> ScoreReport {
    let mut summary = ScoreSummary::default();
    let mut nodes = Vec::with_capacity(visited.len());

    for node in visited.iter() {
        let status = NodeStatus::of(node);
        match status {
            NodeStatus::Error => summary.errors += 1,
            NodeStatus::Skipped => summary.skipped += 1,
            NodeStatus::Success => summary.successes += 1,
        }
        nodes.push(NodeScore {
            name: node.name.clone(),
            command: node.command.clone(),
            status,
            messages: node.messages.clone(),
            errors: node.errors.clone(),
        });
    }
    summary.total = nodes.len();

    ScoreReport { summary, nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NodeId;
    use crate::graph::NodeSpec;

    fn node(id: usize, name: &str, error: bool, skipped: bool) -> Node {
        let mut node = Node::materialize(NodeId::new(id), &NodeSpec::task(name, "x.y"));
        node.visited = true;
        node.error = error;
        node.skipped = skipped;
        node
    }

    #[test]
    fn counts_and_orders_by_registration() {
        let mut visited = VisitedNodes::new();
        visited.register(node(0, "a", false, false));
        visited.register(node(1, "b", true, false));
        visited.register(node(2, "c", false, true));

        let report = aggregate(&visited);
        assert_eq!(
            report.summary,
            ScoreSummary {
                total: 3,
                errors: 1,
                skipped: 1,
                successes: 1
            }
        );
        let names: Vec<&str> = report.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(report.has_errors());
    }

    #[test]
    fn error_takes_precedence_over_skip() {
        let mut visited = VisitedNodes::new();
        visited.register(node(0, "both", true, true));
        let report = aggregate(&visited);
        assert_eq!(report.node("both").map(|n| n.status), Some(NodeStatus::Error));
        assert_eq!(report.summary.skipped, 0);
    }

    #[test]
    fn empty_registry_gives_empty_report() {
        let report = aggregate(&VisitedNodes::new());
        assert_eq!(report, ScoreReport::default());
        assert!(!report.has_errors());
    }
}
