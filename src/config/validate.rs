// src/config/validate.rs

//! Fail-fast checks run before any traversal starts.

use std::path::{Path, PathBuf};

use crate::config::model::{DEFAULT_PROPAGATE, DEFAULT_STRICT, RunSection, RunSettings};
use crate::errors::{NagareError, Result};
use crate::fs::FileSystem;

pub fn validate_settings(fs: &dyn FileSystem, section: RunSection) -> Result<RunSettings> {
    let module_root = validate_module_root(fs, section.module_root.as_deref())?;
    let graph = validate_graph_path(fs, section.graph.as_deref())?;
    let data = section
        .data
        .map(|p| validate_input_json(fs, "data", p))
        .transpose()?;
    let score = section
        .score
        .map(|p| validate_output_json("score", p))
        .transpose()?;

    Ok(RunSettings {
        strict: section.strict.unwrap_or(DEFAULT_STRICT),
        propagate: section.propagate.unwrap_or(DEFAULT_PROPAGATE),
        descend: section.descend.unwrap_or_default(),
        module_root,
        graph,
        data,
        score,
    })
}

/// The module root must be set and be an existing directory.
pub fn validate_module_root(fs: &dyn FileSystem, root: Option<&Path>) -> Result<PathBuf> {
    let Some(root) = root else {
        return Err(NagareError::ConfigError(
            "module root is not set (use --module-root, [run].module_root or NAGARE_MODULE_ROOT)"
                .to_string(),
        ));
    };
    if !fs.is_dir(root) {
        return Err(NagareError::ConfigError(format!(
            "module root {root:?} is not a directory"
        )));
    }
    Ok(root.to_path_buf())
}

fn validate_graph_path(fs: &dyn FileSystem, graph: Option<&Path>) -> Result<PathBuf> {
    let Some(graph) = graph else {
        return Err(NagareError::ConfigError(
            "graph is not set (use --graph or [run].graph)".to_string(),
        ));
    };
    validate_input_json(fs, "graph", graph.to_path_buf())
}

fn validate_input_json(fs: &dyn FileSystem, what: &str, path: PathBuf) -> Result<PathBuf> {
    let path = validate_output_json(what, path)?;
    if !fs.is_file(&path) {
        return Err(NagareError::ConfigError(format!(
            "{what} file {path:?} does not exist"
        )));
    }
    Ok(path)
}

fn validate_output_json(what: &str, path: PathBuf) -> Result<PathBuf> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(NagareError::ConfigError(format!(
            "{what} file {path:?} must have a .json extension"
        )));
    }
    Ok(path)
}
