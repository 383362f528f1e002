// src/task/registry.rs

//! Command -> module lookup.
//!
//! Modules registered in-process always win. Anything else is looked up as a
//! script under the module root: `a.b.c` maps to `<root>/a/b/c`, or to the
//! first `<root>/a/b/c.<ext>` in sorted order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result as AnyResult;
use tracing::debug;

use crate::engine::DataContext;
use crate::errors::{NagareError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::task::builtin::register_builtins;
use crate::task::command::CommandPath;
use crate::task::module::{FnModule, TaskModule};
use crate::task::script::ScriptModule;
use crate::task::TaskResult;

pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn TaskModule>>,
    fs: Arc<dyn FileSystem>,
}

impl ModuleRegistry {
    /// Empty registry backed by the real filesystem for script lookup.
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem))
    }

    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            modules: HashMap::new(),
            fs,
        }
    }

    /// Registry pre-loaded with the built-in `basic.*`, `debug.*` and
    /// `custom.*` modules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Register a module under `command`. Replaces any previous binding.
    pub fn register(&mut self, command: &str, module: Arc<dyn TaskModule>) -> Result<()> {
        let path: CommandPath = command.parse()?;
        self.modules.insert(path.to_string(), module);
        Ok(())
    }

    pub fn register_fn<F>(&mut self, command: &str, f: F) -> Result<()>
    where
        F: Fn(&mut DataContext) -> AnyResult<TaskResult> + Send + Sync + 'static,
    {
        self.register(command, Arc::new(FnModule(f)))
    }

    pub fn contains(&self, command: &str) -> bool {
        self.modules.contains_key(command.trim())
    }

    /// All in-process commands, sorted.
    pub fn commands(&self) -> Vec<String> {
        let mut out: Vec<String> = self.modules.keys().cloned().collect();
        out.sort();
        out
    }

    /// Resolve `command` to a callable module.
    pub fn resolve(&self, command: &str, module_root: &Path) -> Result<Arc<dyn TaskModule>> {
        let path: CommandPath = command.parse()?;
        let key = path.to_string();

        if let Some(module) = self.modules.get(&key) {
            debug!(command = %key, "resolved registered module");
            return Ok(Arc::clone(module));
        }

        let script = self.find_script(&path, module_root)?;
        debug!(command = %key, script = ?script, "resolved script module");
        Ok(Arc::new(ScriptModule::new(key, script)))
    }

    fn find_script(&self, path: &CommandPath, module_root: &Path) -> Result<PathBuf> {
        let base = module_root.join(path.relative_path());
        if self.fs.is_file(&base) {
            return Ok(base);
        }

        let not_found = || NagareError::ModuleNotFound {
            command: path.to_string(),
            searched: base.clone(),
        };

        let (Some(dir), Some(stem)) = (base.parent(), path.segments().last()) else {
            return Err(not_found());
        };
        if !self.fs.is_dir(dir) {
            return Err(not_found());
        }

        let mut candidates: Vec<PathBuf> = self
            .fs
            .read_dir(dir)?
            .into_iter()
            .filter(|p| p.file_stem().and_then(|s| s.to_str()) == Some(stem.as_str()))
            .filter(|p| p.extension().is_some() && self.fs.is_file(p))
            .collect();
        candidates.sort();

        candidates.into_iter().next().ok_or_else(not_found)
    }

    /// Every script command found under `module_root`, sorted.
    ///
    /// Files whose relative path is not a valid command identifier are
    /// ignored.
    pub fn discover_scripts(&self, module_root: &Path) -> Result<Vec<String>> {
        let mut found = Vec::new();
        let mut stack = vec![(module_root.to_path_buf(), Vec::<String>::new())];

        while let Some((dir, prefix)) = stack.pop() {
            for entry in self.fs.read_dir(&dir)? {
                let Some(stem) = entry.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !CommandPath::is_valid_segment(stem) {
                    continue;
                }
                let mut segments = prefix.clone();
                segments.push(stem.to_string());

                if self.fs.is_dir(&entry) {
                    stack.push((entry, segments));
                } else if self.fs.is_file(&entry) {
                    found.push(segments.join("."));
                }
            }
        }

        found.sort();
        found.dedup();
        Ok(found)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn mock_registry(fs: &MockFileSystem) -> ModuleRegistry {
        ModuleRegistry::with_fs(Arc::new(fs.clone()))
    }

    #[test]
    fn registered_module_wins_over_script() {
        let fs = MockFileSystem::new();
        fs.add_file("mods/debug/ping", b"#!/bin/sh");
        let mut registry = mock_registry(&fs);
        registry
            .register_fn("debug.ping", |_| Ok(TaskResult::success().with_message("pong")))
            .unwrap();

        let module = registry.resolve("debug.ping", Path::new("mods")).unwrap();
        let mut data = DataContext::new();
        let result = module.run(&mut data).unwrap();
        assert_eq!(result.messages(), ["pong"]);
    }

    #[test]
    fn script_lookup_prefers_exact_then_sorted_extension() {
        let fs = MockFileSystem::new();
        fs.add_file("mods/check/lint.sh", b"");
        fs.add_file("mods/check/lint.py", b"");
        let registry = mock_registry(&fs);

        let found = registry
            .find_script(&"check.lint".parse().unwrap(), Path::new("mods"))
            .unwrap();
        assert_eq!(found, PathBuf::from("mods/check/lint.py"));

        fs.add_file("mods/check/lint", b"");
        let found = registry
            .find_script(&"check.lint".parse().unwrap(), Path::new("mods"))
            .unwrap();
        assert_eq!(found, PathBuf::from("mods/check/lint"));
    }

    #[test]
    fn unknown_command_is_module_not_found() {
        let fs = MockFileSystem::new();
        fs.add_dir("mods");
        let registry = mock_registry(&fs);

        match registry.resolve("nope.missing", Path::new("mods")) {
            Err(NagareError::ModuleNotFound { command, searched }) => {
                assert_eq!(command, "nope.missing");
                assert_eq!(searched, PathBuf::from("mods/nope/missing"));
            }
            Err(e) => panic!("expected ModuleNotFound, got {e:?}"),
            Ok(_) => panic!("expected ModuleNotFound, got a module"),
        }
    }

    #[test]
    fn invalid_command_is_rejected_before_lookup() {
        let mut registry = mock_registry(&MockFileSystem::new());
        assert!(matches!(
            registry.resolve("../escape", Path::new("mods")),
            Err(NagareError::InvalidCommand(_))
        ));
        assert!(registry.register_fn("bad..name", |_| Ok(TaskResult::success())).is_err());
    }

    #[test]
    fn discovers_nested_scripts() {
        let fs = MockFileSystem::new();
        fs.add_file("mods/debug/sniff.sh", b"");
        fs.add_file("mods/custom/deep/check.py", b"");
        fs.add_file("mods/custom/not valid.py", b"");
        let registry = mock_registry(&fs);

        let found = registry.discover_scripts(Path::new("mods")).unwrap();
        assert_eq!(found, vec!["custom.deep.check", "debug.sniff"]);
    }

    #[test]
    fn builtins_are_registered() {
        let registry = ModuleRegistry::with_builtins();
        assert!(registry.contains("debug.invoke_error"));
        assert!(registry.contains("debug.invoke_skip"));
        assert!(registry.contains("custom.process_who"));
        assert!(!registry.contains("debug.unknown"));
    }
}
