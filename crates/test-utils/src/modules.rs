use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use nagare::engine::DataContext;
use nagare::errors::NagareError;
use nagare::task::{ModuleRegistry, TaskModule, TaskResult};
use serde_json::Value;

/// Shared log of what recording modules saw, in call order.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(String, DataContext)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, command: &str, data: &DataContext) {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), data.deep_copy()));
    }

    /// Commands in the order they ran.
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(c, _)| c.clone()).collect()
    }

    /// Snapshot of the context each call received, in call order.
    pub fn contexts(&self) -> Vec<(String, DataContext)> {
        self.calls.lock().unwrap().clone()
    }
}

/// Records its context, appends `command` to the `trail` array, and succeeds.
pub struct RecordingModule {
    command: String,
    log: CallLog,
}

impl RecordingModule {
    pub fn new(command: &str, log: &CallLog) -> Self {
        Self {
            command: command.to_string(),
            log: log.clone(),
        }
    }
}

impl TaskModule for RecordingModule {
    fn run(&self, data: &mut DataContext) -> anyhow::Result<TaskResult> {
        self.log.push(&self.command, data);

        let mut trail = match data.get("trail") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        trail.push(Value::String(self.command.clone()));
        data.insert("trail", Value::Array(trail));

        Ok(TaskResult::success())
    }
}

/// Registry with in-memory modules covering every outcome:
///
/// - `ok`: success
/// - `fail`: returns `Err`
/// - `panic`: panics
/// - `soft_fail`: returns an `error` result
/// - `skip`: returns a `skip` result
/// - `malformed`: reports a malformed reply
/// - `record.*`: [`RecordingModule`]s registered via [`record`]
pub fn test_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry
        .register_fn("ok", |_| Ok(TaskResult::success()))
        .unwrap();
    registry
        .register_fn("fail", |_| Err(anyhow!("module failed on purpose")))
        .unwrap();
    registry
        .register_fn("panic", |_| panic!("module panicked on purpose"))
        .unwrap();
    registry
        .register_fn("soft_fail", |_| {
            Ok(TaskResult::error().with_message("reported failure"))
        })
        .unwrap();
    registry
        .register_fn("skip", |_| Ok(TaskResult::skip().with_message("skipping")))
        .unwrap();
    registry
        .register_fn("malformed", |_| {
            Err(NagareError::MalformedResult {
                command: "malformed".to_string(),
                detail: "returned nothing usable".to_string(),
            }
            .into())
        })
        .unwrap();
    registry
}

/// Register a recording module under `record.<name>`; returns the command.
pub fn record(registry: &mut ModuleRegistry, name: &str, log: &CallLog) -> String {
    let command = format!("record.{name}");
    registry
        .register(&command, Arc::new(RecordingModule::new(&command, log)))
        .unwrap();
    command
}
