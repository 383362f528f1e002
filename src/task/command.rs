// src/task/command.rs

//! Dot-separated command identifiers (`debug.invoke_error`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::NagareError;

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("segment pattern is valid")
});

/// A validated command path such as `custom.process_who`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandPath {
    segments: Vec<String>,
}

impl CommandPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `a.b.c` -> `a/b/c`, relative to a module root.
    pub fn relative_path(&self) -> PathBuf {
        self.segments.iter().collect()
    }

    pub fn is_valid_segment(segment: &str) -> bool {
        SEGMENT.is_match(segment)
    }
}

impl FromStr for CommandPath {
    type Err = NagareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(NagareError::InvalidCommand("empty command".to_string()));
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('.') {
            if !Self::is_valid_segment(segment) {
                return Err(NagareError::InvalidCommand(format!(
                    "'{trimmed}' has invalid segment '{segment}'"
                )));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_namespace_to_relative_path() {
        let cmd: CommandPath = "custom.process_who".parse().unwrap();
        assert_eq!(cmd.segments(), ["custom", "process_who"]);
        assert_eq!(cmd.relative_path(), PathBuf::from("custom").join("process_who"));
        assert_eq!(cmd.to_string(), "custom.process_who");
    }

    #[test]
    fn rejects_traversal_and_empty_segments() {
        for bad in ["", "a..b", "../etc", "a.b/c", ".a", "a.", "1abc"] {
            assert!(
                matches!(bad.parse::<CommandPath>(), Err(NagareError::InvalidCommand(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
