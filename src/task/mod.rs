// src/task/mod.rs

//! Task modules and their results.
//!
//! - [`result`] defines what a module hands back ([`TaskResult`]).
//! - [`module`] defines the [`TaskModule`] contract.
//! - [`command`] validates dot-separated command identifiers.
//! - [`registry`] resolves a command to a module: in-process first, then a
//!   script under the module root.
//! - [`script`] runs executable modules over a JSON stdin/stdout protocol.
//! - [`builtin`] holds the modules that ship with the binary.

pub mod builtin;
pub mod command;
pub mod module;
pub mod registry;
pub mod result;
pub mod script;

pub use command::CommandPath;
pub use module::{FnModule, TaskModule};
pub use registry::ModuleRegistry;
pub use result::{TaskError, TaskResult, TaskStatus};
pub use script::ScriptModule;
