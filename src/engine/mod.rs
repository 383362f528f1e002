// src/engine/mod.rs

//! Traversal engine.
//!
//! - [`context`] is the data context threaded through the walk.
//! - [`node`] holds materialised nodes and the visited-node registry.
//! - [`run_context`] is the explicit per-run state (policies, module root,
//!   visited nodes).
//! - [`dispatch`] is the single failure boundary around module calls.
//! - [`traversal`] is the recursive depth-first walker.

pub mod context;
pub mod dispatch;
pub mod node;
pub mod run_context;
pub mod traversal;

pub use context::DataContext;
pub use dispatch::dispatch;
pub use node::{Node, NodeId, VisitedNodes};
pub use run_context::RunContext;
pub use traversal::TraversalEngine;
