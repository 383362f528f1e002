// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawConfigFile, RunSection, RunSettings};
use crate::config::validate::validate_settings;
use crate::errors::{NagareError, Result};
use crate::fs::FileSystem;

/// Load a configuration file and return the raw `RawConfigFile`, with
/// relative paths rebased onto the file's directory.
///
/// This only performs TOML deserialization; it does **not** check that the
/// referenced files exist. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs
        .read_to_string(path)
        .map_err(|e| NagareError::ConfigError(format!("cannot read config {path:?}: {e:#}")))?;

    let mut config: RawConfigFile = toml::from_str(&contents)?;
    config.run = config.run.resolve_relative_to(&config_base_dir(path));

    Ok(config)
}

/// Read the `[run]` section if a config file is available.
///
/// A missing file is fine unless the caller asked for it explicitly.
pub fn load_run_section(fs: &dyn FileSystem, path: &Path, explicit: bool) -> Result<RunSection> {
    if !explicit && !fs.exists(path) {
        debug!(path = ?path, "no config file, using defaults and CLI flags");
        return Ok(RunSection::default());
    }
    Ok(load_from_path(fs, path)?.run)
}

/// Recommended entry point: config file, then CLI overrides, then
/// validation.
///
/// - Reads TOML (optional unless `explicit`).
/// - Applies `overrides` (CLI flags) on top.
/// - Falls back to `env_module_root` for the module root.
/// - Validates everything into [`RunSettings`].
pub fn load_and_validate(
    fs: &dyn FileSystem,
    path: &Path,
    explicit: bool,
    overrides: RunSection,
    env_module_root: Option<PathBuf>,
) -> Result<RunSettings> {
    let mut section = load_run_section(fs, path, explicit)?.merged_with(overrides);
    if section.module_root.is_none() {
        section.module_root = env_module_root;
    }
    validate_settings(fs, section)
}

/// `nagare.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("nagare.toml")
}

/// Directory relative paths in a config file are resolved against.
fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
