//! Run mode definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Available run modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Walk the listing until it ends or the page cap is hit (default).
    #[default]
    Full,
    /// Stop at the newest item saved by the previous run.
    SinceLast,
    /// Walk with an explicit page cap to pull older history.
    Backfill,
    /// Re-materialize items that recorded failed child downloads.
    Repair,
}

impl RunMode {
    /// Whether the walk stops at the saved marker.
    pub fn stops_at_marker(&self) -> bool {
        matches!(self, RunMode::SinceLast)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Full => write!(f, "full"),
            RunMode::SinceLast => write!(f, "since-last"),
            RunMode::Backfill => write!(f, "backfill"),
            RunMode::Repair => write!(f, "repair"),
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" | "run" => Ok(RunMode::Full),
            "since-last" | "since_last" => Ok(RunMode::SinceLast),
            "backfill" => Ok(RunMode::Backfill),
            "repair" => Ok(RunMode::Repair),
            _ => Err(format!("Unknown run mode: {}", s)),
        }
    }
}
