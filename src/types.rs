use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What the traversal does with a command node's children once its module
/// has produced a result.
///
/// - `Continue`: descend after `success`; stop after `skip`; stop after
///   `error` only when the run is strict (default behaviour).
/// - `Legacy`: stop after any well-formed result, whatever its status. Only
///   routers and modules whose reply was malformed fan out, and the latter
///   only when the run is not strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescendPolicy {
    #[default]
    Continue,
    Legacy,
}

impl FromStr for DescendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(DescendPolicy::Continue),
            "legacy" => Ok(DescendPolicy::Legacy),
            other => Err(format!(
                "invalid descend policy: {other} (expected \"continue\" or \"legacy\")"
            )),
        }
    }
}

impl fmt::Display for DescendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescendPolicy::Continue => f.write_str("continue"),
            DescendPolicy::Legacy => f.write_str("legacy"),
        }
    }
}
