// src/graph/loader.rs

//! Reading graph descriptions and data contexts from JSON files.
//!
//! Accepted graph shapes:
//! - `{"nodes": [ {..}, {..} ]}`
//! - `{"nodes": {..}}` (a single root node)
//! - a bare node object or a bare array of nodes.
//!
//! Nesting depth is not capped by the JSON parser; only the call stack
//! bounds how deep a graph can go.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::engine::DataContext;
use crate::errors::{NagareError, Result};
use crate::fs::FileSystem;
use crate::graph::{GraphDocument, NodeSpec};

/// Parse a graph description from JSON text.
pub fn parse_graph(text: &str) -> Result<GraphDocument> {
    let value = parse_unbounded(text)?;

    let nodes_value = match value {
        Value::Object(mut map) if map.contains_key("nodes") => {
            map.remove("nodes").unwrap_or(Value::Null)
        }
        other => other,
    };

    let nodes: Vec<NodeSpec> = match nodes_value {
        Value::Array(_) => serde_json::from_value(nodes_value)?,
        Value::Object(_) => vec![serde_json::from_value(nodes_value)?],
        other => {
            return Err(NagareError::ConfigError(format!(
                "graph `nodes` must be a node object or an array of nodes, got {other}"
            )));
        }
    };

    let graph = GraphDocument::new(nodes);
    validate_graph(&graph)?;
    Ok(graph)
}

/// Load and parse a graph description from `path`.
pub fn load_graph(fs: &dyn FileSystem, path: &Path) -> Result<GraphDocument> {
    let text = fs
        .read_to_string(path)
        .map_err(|e| NagareError::ConfigError(format!("cannot read graph {path:?}: {e:#}")))?;
    let graph = parse_graph(&text)?;
    debug!(path = ?path, roots = graph.nodes.len(), nodes = graph.node_count(), "loaded graph");
    Ok(graph)
}

/// Load the initial data context from a JSON object file.
pub fn load_data(fs: &dyn FileSystem, path: &Path) -> Result<DataContext> {
    let text = fs
        .read_to_string(path)
        .map_err(|e| NagareError::ConfigError(format!("cannot read data {path:?}: {e:#}")))?;
    DataContext::from_value(parse_unbounded(&text)?)
}

/// Parse JSON without serde_json's default nesting limit of 128.
fn parse_unbounded(text: &str) -> Result<Value> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

fn validate_graph(graph: &GraphDocument) -> Result<()> {
    if graph.nodes.is_empty() {
        return Err(NagareError::ConfigError(
            "graph must contain at least one node".to_string(),
        ));
    }

    let mut stack: Vec<&NodeSpec> = graph.nodes.iter().collect();
    while let Some(spec) = stack.pop() {
        if spec.name.trim().is_empty() {
            return Err(NagareError::ConfigError(
                "every graph node needs a non-empty `name`".to_string(),
            ));
        }
        stack.extend(spec.children.iter());
    }
    Ok(())
}
