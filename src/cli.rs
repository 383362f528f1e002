// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::RunSection;
use crate::config::default_config_path;
use crate::types::DescendPolicy;

/// Command-line arguments for `nagare`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nagare",
    version,
    about = "Walk a node graph depth-first, run each node's task module, and score the run.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the run config file (TOML).
    ///
    /// Default: `nagare.toml` in the current working directory, used only if
    /// it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Graph description to run (JSON).
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Initial data context (JSON object).
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Write the score report to this path (JSON).
    #[arg(long, value_name = "PATH")]
    pub score: Option<PathBuf>,

    /// Directory script modules are resolved under.
    ///
    /// Falls back to `[run].module_root`, then `NAGARE_MODULE_ROOT`.
    #[arg(long, value_name = "DIR")]
    pub module_root: Option<PathBuf>,

    /// Halt every remaining branch after the first node error (default).
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "no_strict")]
    pub strict: bool,

    /// Keep visiting other branches after a node error.
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "strict")]
    pub no_strict: bool,

    /// Share one data context across the whole run instead of copying it
    /// per branch.
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "no_propagate")]
    pub propagate: bool,

    /// Give every branch its own copy of the data context (default).
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "propagate")]
    pub no_propagate: bool,

    /// What happens to a command node's children once it has run.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub descend: Option<DescendArg>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NAGARE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the graph, but don't run any module.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the built-in modules and the scripts under the module root.
    #[arg(long)]
    pub list_modules: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Descend policy as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum DescendArg {
    Continue,
    Legacy,
}

impl From<DescendArg> for DescendPolicy {
    fn from(arg: DescendArg) -> Self {
        match arg {
            DescendArg::Continue => DescendPolicy::Continue,
            DescendArg::Legacy => DescendPolicy::Legacy,
        }
    }
}

impl CliArgs {
    /// Config path and whether the user named it explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (default_config_path(), false),
        }
    }

    /// Flags that override the config file. Unset flags stay `None`.
    pub fn overrides(&self) -> RunSection {
        RunSection {
            strict: flag_pair(self.strict, self.no_strict),
            propagate: flag_pair(self.propagate, self.no_propagate),
            descend: self.descend.map(DescendPolicy::from),
            module_root: self.module_root.clone(),
            graph: self.graph.clone(),
            data: self.data.clone(),
            score: self.score.clone(),
        }
    }
}

/// `--x` / `--no-x` pairs: clap keeps only the last one given.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    if off {
        Some(false)
    } else if on {
        Some(true)
    } else {
        None
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_do_not_override() {
        let args = CliArgs::parse_from(["nagare"]);
        assert_eq!(args.overrides(), RunSection::default());
        assert_eq!(args.config_path(), (PathBuf::from("nagare.toml"), false));
    }

    #[test]
    fn flags_map_to_overrides() {
        let args = CliArgs::parse_from([
            "nagare",
            "--no-strict",
            "--propagate",
            "--descend",
            "legacy",
            "--graph",
            "g.json",
            "--config",
            "custom.toml",
        ]);
        let o = args.overrides();
        assert_eq!(o.strict, Some(false));
        assert_eq!(o.propagate, Some(true));
        assert_eq!(o.descend, Some(DescendPolicy::Legacy));
        assert_eq!(o.graph, Some(PathBuf::from("g.json")));
        assert_eq!(args.config_path(), (PathBuf::from("custom.toml"), true));
    }

    #[test]
    fn last_strict_flag_wins() {
        let args = CliArgs::parse_from(["nagare", "--no-strict", "--strict"]);
        assert_eq!(args.overrides().strict, Some(true));
    }

    #[test]
    fn no_propagate_turns_config_propagation_off() {
        let args = CliArgs::parse_from(["nagare", "--no-propagate"]);
        assert_eq!(args.overrides().propagate, Some(false));

        let file = RunSection {
            propagate: Some(true),
            ..RunSection::default()
        };
        assert_eq!(file.merged_with(args.overrides()).propagate, Some(false));

        let args = CliArgs::parse_from(["nagare", "--no-propagate", "--propagate"]);
        assert_eq!(args.overrides().propagate, Some(true));
    }
}
