// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::DescendPolicy;

/// Top-level run configuration as read from a TOML file.
///
/// ```toml
/// [run]
/// strict = true
/// propagate = false
/// descend = "continue"
/// module_root = "modules"
/// graph = "graphs/tester.json"
/// data = "data/block.json"
/// score = "out/score.json"
/// ```
///
/// Every key is optional; CLI flags override whatever is set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub run: RunSection,
}

/// `[run]` section. Also used for CLI overrides, which have the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Stop every not-yet-visited branch once any node has failed.
    #[serde(default)]
    pub strict: Option<bool>,

    /// Share one data context across the whole run instead of copying it
    /// per branch.
    #[serde(default)]
    pub propagate: Option<bool>,

    /// What happens to a command node's children after dispatch.
    #[serde(default)]
    pub descend: Option<DescendPolicy>,

    /// Directory that script modules are looked up under.
    #[serde(default)]
    pub module_root: Option<PathBuf>,

    /// Graph description (JSON).
    #[serde(default)]
    pub graph: Option<PathBuf>,

    /// Initial data context (JSON object). Empty when unset.
    #[serde(default)]
    pub data: Option<PathBuf>,

    /// Where to write the score (JSON). Not written when unset.
    #[serde(default)]
    pub score: Option<PathBuf>,
}

impl RunSection {
    /// Values set in `overrides` replace ours.
    pub fn merged_with(self, overrides: RunSection) -> RunSection {
        RunSection {
            strict: overrides.strict.or(self.strict),
            propagate: overrides.propagate.or(self.propagate),
            descend: overrides.descend.or(self.descend),
            module_root: overrides.module_root.or(self.module_root),
            graph: overrides.graph.or(self.graph),
            data: overrides.data.or(self.data),
            score: overrides.score.or(self.score),
        }
    }

    /// Make relative paths relative to `base` (the config file's directory).
    pub fn resolve_relative_to(mut self, base: &Path) -> RunSection {
        for path in [
            &mut self.module_root,
            &mut self.graph,
            &mut self.data,
            &mut self.score,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub strict: bool,
    pub propagate: bool,
    pub descend: DescendPolicy,
    pub module_root: PathBuf,
    pub graph: PathBuf,
    pub data: Option<PathBuf>,
    pub score: Option<PathBuf>,
}

pub const DEFAULT_STRICT: bool = true;
pub const DEFAULT_PROPAGATE: bool = false;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_unset_fields_fall_through() {
        let file = RunSection {
            strict: Some(false),
            graph: Some(PathBuf::from("g.json")),
            ..Default::default()
        };
        let cli = RunSection {
            strict: Some(true),
            score: Some(PathBuf::from("s.json")),
            ..Default::default()
        };

        let merged = file.merged_with(cli);
        assert_eq!(merged.strict, Some(true));
        assert_eq!(merged.graph, Some(PathBuf::from("g.json")));
        assert_eq!(merged.score, Some(PathBuf::from("s.json")));
        assert_eq!(merged.propagate, None);
    }

    #[test]
    fn relative_paths_are_rebased() {
        let section = RunSection {
            graph: Some(PathBuf::from("graphs/a.json")),
            module_root: Some(PathBuf::from("/abs/modules")),
            ..Default::default()
        }
        .resolve_relative_to(Path::new("proj"));

        assert_eq!(section.graph, Some(PathBuf::from("proj/graphs/a.json")));
        assert_eq!(section.module_root, Some(PathBuf::from("/abs/modules")));
    }

    #[test]
    fn parses_run_section() {
        let raw: RawConfigFile = toml::from_str(
            r#"
[run]
strict = false
descend = "legacy"
module_root = "modules"
"#,
        )
        .unwrap();
        assert_eq!(raw.run.strict, Some(false));
        assert_eq!(raw.run.descend, Some(DescendPolicy::Legacy));
        assert!(toml::from_str::<RawConfigFile>("[run]\nbogus = 1\n").is_err());
    }
}
