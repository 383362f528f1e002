// src/task/builtin.rs

//! Modules that ship with the binary.
//!
//! These are small and mostly useful for exercising a graph end to end:
//! printing the context, forcing an error or a skip, and checking that a
//! given key made it through the chain.

use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::{debug, info, warn};

use crate::engine::DataContext;
use crate::task::module::TaskModule;
use crate::task::registry::ModuleRegistry;
use crate::task::{TaskError, TaskResult};

/// Logs the whole context at `info`.
pub struct PrintData;

impl TaskModule for PrintData {
    fn run(&self, data: &mut DataContext) -> Result<TaskResult> {
        info!(data = %data, "data context");
        Ok(TaskResult::success())
    }
}

/// Logs the pretty-printed context at `debug`.
pub struct DumpData;

impl TaskModule for DumpData {
    fn run(&self, data: &mut DataContext) -> Result<TaskResult> {
        debug!("data context:\n{}", data.to_pretty());
        Ok(TaskResult::success().with_message(format!("{} key(s) in context", data.len())))
    }
}

/// Always reports an error, with a few sample structured errors.
pub struct InvokeError;

impl TaskModule for InvokeError {
    fn run(&self, _data: &mut DataContext) -> Result<TaskResult> {
        warn!("simulating an error");
        Ok(TaskResult::error()
            .with_error(
                TaskError::new("broken_node")
                    .kind("mesh")
                    .reason("sample error with every field set"),
            )
            .with_error(TaskError::new("missing_object").reason("item and reason only"))
            .with_error(TaskError::new("item_only_specified"))
            .with_message("errors can drive selection or repair downstream"))
    }
}

/// Always reports a skip, so nothing below it runs.
pub struct InvokeSkip;

impl TaskModule for InvokeSkip {
    fn run(&self, _data: &mut DataContext) -> Result<TaskResult> {
        warn!("simulating a skip");
        Ok(TaskResult::skip().with_message("sample skip node"))
    }
}

/// Overwrites `why` in the context.
pub struct ChangeWhy;

impl TaskModule for ChangeWhy {
    fn run(&self, data: &mut DataContext) -> Result<TaskResult> {
        data.insert("why", "Helping people bring out the best in themselves.");
        info!(why = ?data.get("why"), "changed why");
        Ok(TaskResult::success())
    }
}

/// Fails unless `key` is present in the context.
pub struct RequireKey {
    key: &'static str,
}

impl RequireKey {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl TaskModule for RequireKey {
    fn run(&self, data: &mut DataContext) -> Result<TaskResult> {
        let Some(value) = data.get(self.key) else {
            bail!("missing key '{}' in data context", self.key);
        };
        info!(key = self.key, value = %value, "processed key");
        Ok(TaskResult::success().with_message(format!("{} = {}", self.key, value)))
    }
}

pub fn register_builtins(registry: &mut ModuleRegistry) {
    let builtins: Vec<(&str, Arc<dyn TaskModule>)> = vec![
        ("basic.print_data", Arc::new(PrintData)),
        ("debug.dump_data", Arc::new(DumpData)),
        ("debug.invoke_error", Arc::new(InvokeError)),
        ("debug.invoke_skip", Arc::new(InvokeSkip)),
        ("debug.change_why", Arc::new(ChangeWhy)),
        ("custom.process_what", Arc::new(RequireKey::new("what"))),
        ("custom.process_when", Arc::new(RequireKey::new("when"))),
        ("custom.process_where", Arc::new(RequireKey::new("where"))),
        ("custom.process_why", Arc::new(RequireKey::new("why"))),
        ("custom.process_who", Arc::new(RequireKey::new("who"))),
    ];

    for (command, module) in builtins {
        if let Err(e) = registry.register(command, module) {
            // Only reachable if a built-in name above is mistyped.
            warn!(command, error = %e, "skipping built-in module");
        }
    }
}
