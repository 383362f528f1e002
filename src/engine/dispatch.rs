// src/engine/dispatch.rs

//! The failure boundary around module resolution and invocation.
//!
//! This is the only place where module failures are expected. Whatever goes
//! wrong in here (unknown command, `Err` from the module, a panic, or a reply
//! that does not follow the result protocol) comes out as a [`TaskResult`]
//! with `status = error`. Nothing escapes to unwind the traversal.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error, warn};

use crate::engine::context::DataContext;
use crate::errors::NagareError;
use crate::task::{ModuleRegistry, TaskError, TaskResult};

/// Error `type` recorded for a module that failed or panicked.
pub const MODULE_FAILURE: &str = "module_failure";
/// Error `type` recorded for a module whose reply was not a valid result.
pub const MALFORMED_RESULT: &str = "malformed_result";

/// Resolve `command` and run it against `data`, containing every failure.
pub fn dispatch(
    registry: &ModuleRegistry,
    module_root: &Path,
    command: &str,
    node_name: &str,
    data: &mut DataContext,
) -> TaskResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> anyhow::Result<TaskResult> {
        let module = registry.resolve(command, module_root).inspect_err(|e| {
            if matches!(e, NagareError::ModuleNotFound { .. }) {
                warn!(node = %node_name, command = %command, error = %e, "module not found");
            }
        })?;
        module.run(data)
    }));

    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            let detail = format!("{err:#}");
            match err.downcast_ref::<NagareError>() {
                Some(NagareError::MalformedResult { .. }) => {
                    malformed_result(command, node_name, &detail, data)
                }
                _ => failed_result(command, node_name, &detail, data),
            }
        }
        Err(payload) => {
            let detail = format!("panicked: {}", panic_message(payload.as_ref()));
            failed_result(command, node_name, &detail, data)
        }
    }
}

fn failed_result(command: &str, node_name: &str, detail: &str, data: &DataContext) -> TaskResult {
    error!(node = %node_name, command = %command, error = %detail, "module failed");
    debug!(node = %node_name, data = %data, "data context at failure");

    TaskResult::error()
        .with_message(format!("Failed module: {command}"))
        .with_message(format!("Node: {node_name}"))
        .with_message(detail.to_string())
        .with_error(
            TaskError::new(node_name)
                .kind(MODULE_FAILURE)
                .reason(detail.to_string()),
        )
}

fn malformed_result(
    command: &str,
    node_name: &str,
    detail: &str,
    data: &DataContext,
) -> TaskResult {
    error!(node = %node_name, command = %command, error = %detail, "module returned a malformed result");
    debug!(node = %node_name, data = %data, "data context at failure");

    TaskResult::error()
        .with_message(format!("Malformed result from module: {command}"))
        .with_message(format!("Node: {node_name}"))
        .with_message(detail.to_string())
        .with_error(
            TaskError::new(node_name)
                .kind(MALFORMED_RESULT)
                .reason(detail.to_string()),
        )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
