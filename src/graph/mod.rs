// src/graph/mod.rs

//! Graph description: the node-spec tree and its JSON loader.

pub mod loader;
pub mod spec;

pub use loader::{load_data, load_graph, parse_graph};
pub use spec::{GraphDocument, NodeSpec};
