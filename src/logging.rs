// src/logging.rs

//! Logging setup for the `nagare` binary.
//!
//! The filter comes from, in order:
//! 1. `--log-level`, applied to every target;
//! 2. `NAGARE_LOG`, read as a full `EnvFilter` directive list, so
//!    `info,nagare::engine=trace` narrows tracing to the traversal;
//! 3. `info`.
//!
//! Output goes to stderr. Stdout is reserved for the run summary, dry-run
//! tree and module listing.

use anyhow::{Result, anyhow};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "NAGARE_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
///
/// An unparsable `NAGARE_LOG` does not abort the run: the default filter is
/// used and a warning names the rejected value.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env.as_deref());

    let (filter, rejected) = match EnvFilter::try_new(&directives) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_DIRECTIVES), Some(err)),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("cannot install log subscriber: {e}"))?;

    if let Some(err) = rejected {
        warn!(value = %directives, error = %err, "ignoring invalid NAGARE_LOG");
    }
    Ok(())
}

fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return level_name(level).to_string();
    }
    match env.map(str::trim) {
        Some(value) if !value.is_empty() => value.replace("warning", "warn"),
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_beats_env() {
        assert_eq!(
            filter_directives(Some(LogLevel::Debug), Some("nagare::engine=trace")),
            "debug"
        );
    }

    #[test]
    fn env_directives_pass_through() {
        assert_eq!(
            filter_directives(None, Some(" info,nagare::engine=trace ")),
            "info,nagare::engine=trace"
        );
        assert_eq!(filter_directives(None, Some("warning")), "warn");
        assert!(EnvFilter::try_new(filter_directives(None, Some("warning"))).is_ok());
    }

    #[test]
    fn blank_or_missing_env_uses_default() {
        assert_eq!(filter_directives(None, None), "info");
        assert_eq!(filter_directives(None, Some("   ")), "info");
    }

    #[test]
    fn garbage_directives_are_rejected_by_the_filter() {
        assert!(EnvFilter::try_new(filter_directives(None, Some("nagare=[[["))).is_err());
    }
}
