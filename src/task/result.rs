// src/task/result.rs

//! Outcome of a single task module invocation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status reported by a task module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Error,
    Skip,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Success => f.write_str("success"),
            TaskStatus::Error => f.write_str("error"),
            TaskStatus::Skip => f.write_str("skip"),
        }
    }
}

/// A structured problem reported by a module, e.g. a broken asset.
///
/// Only `item` is mandatory; `type` and `reason` default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub item: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

impl TaskError {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            kind: String::new(),
            reason: String::new(),
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// Result of one module invocation.
///
/// Modules build it up and hand it back; from then on the engine only reads
/// it and copies the logs onto the owning node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    status: TaskStatus,
    #[serde(default)]
    messages: Vec<String>,
    #[serde(default)]
    errors: Vec<TaskError>,
}

impl TaskResult {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            messages: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn success() -> Self {
        Self::new(TaskStatus::Success)
    }

    pub fn error() -> Self {
        Self::new(TaskStatus::Error)
    }

    pub fn skip() -> Self {
        Self::new(TaskStatus::Skip)
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.add_message(msg);
        self
    }

    pub fn with_error(mut self, err: TaskError) -> Self {
        self.add_error(err);
        self
    }

    pub fn add_message(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    pub fn add_error(&mut self, err: TaskError) {
        self.errors.push(err);
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[TaskError] {
        &self.errors
    }
}
