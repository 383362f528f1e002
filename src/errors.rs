// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NagareError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid command identifier: {0}")]
    InvalidCommand(String),

    #[error("Module not found: {command} (searched {searched:?})")]
    ModuleNotFound { command: String, searched: PathBuf },

    #[error("Module '{command}' returned a malformed result: {detail}")]
    MalformedResult { command: String, detail: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, NagareError>;
