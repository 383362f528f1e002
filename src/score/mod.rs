// src/score/mod.rs

//! Final score: aggregation of visited nodes and its JSON output.

pub mod report;
pub mod writer;

pub use report::{NodeScore, NodeStatus, ScoreReport, ScoreSummary, aggregate};
pub use writer::write_report;
