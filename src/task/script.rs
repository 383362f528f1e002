// src/task/script.rs

//! Task modules backed by an executable file under the module root.
//!
//! Protocol:
//! - the data context is written to the process's stdin as a JSON object;
//! - the process prints one JSON object on stdout:
//!   `{"status": "success"|"error"|"skip", "messages": [..], "errors": [..], "data": {..}}`
//!   where `messages`, `errors` and `data` are optional;
//! - when `data` is present it replaces the context contents.
//!
//! A non-zero exit status is an execution failure. Stdout that does not
//! follow the protocol is reported as [`NagareError::MalformedResult`].

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::engine::DataContext;
use crate::errors::NagareError;
use crate::task::TaskResult;
use crate::task::module::TaskModule;

#[derive(Debug, Deserialize)]
struct ScriptReply {
    #[serde(flatten)]
    result: TaskResult,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone)]
pub struct ScriptModule {
    command: String,
    path: PathBuf,
}

impl ScriptModule {
    pub fn new(command: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            path: path.into(),
        }
    }

    fn parse_reply(&self, stdout: &[u8]) -> std::result::Result<ScriptReply, NagareError> {
        serde_json::from_slice(stdout).map_err(|e| NagareError::MalformedResult {
            command: self.command.clone(),
            detail: format!("{e}; stdout was {:?}", String::from_utf8_lossy(stdout).trim()),
        })
    }
}

impl TaskModule for ScriptModule {
    fn run(&self, data: &mut DataContext) -> Result<TaskResult> {
        info!(command = %self.command, script = ?self.path, "starting script module");

        let input = serde_json::to_vec(data.as_map())?;

        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning script {:?}", self.path))?;

        // Feed stdin from a separate thread so a chatty script cannot
        // deadlock against a full stdout pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin of {:?} was not captured", self.path))?;
        let writer = thread::spawn(move || stdin.write_all(&input));

        let output = child
            .wait_with_output()
            .with_context(|| format!("waiting for script {:?}", self.path))?;

        match writer.join() {
            Ok(Ok(())) => {}
            // The script may legitimately exit without reading its input.
            Ok(Err(e)) => debug!(command = %self.command, error = %e, "stdin write failed"),
            Err(_) => warn!(command = %self.command, "stdin writer thread panicked"),
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(command = %self.command, stderr = %stderr.trim(), "script stderr");
        }

        if !output.status.success() {
            bail!(
                "script {:?} exited with {}: {}",
                self.path,
                output.status,
                stderr.trim()
            );
        }

        let reply = self.parse_reply(&output.stdout)?;
        if let Some(new_data) = reply.data {
            data.replace(new_data);
        }

        Ok(reply.result)
    }
}
