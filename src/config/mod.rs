// src/config/mod.rs

//! Run configuration for nagare.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file and layer CLI overrides on top (`loader.rs`).
//! - Fail fast on bad paths or an unset module root (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_run_section};
pub use model::{RawConfigFile, RunSection, RunSettings};
pub use validate::{validate_module_root, validate_settings};
