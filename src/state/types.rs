//! Persisted archive state.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Progress record kept in `state.json`.
///
/// `processed_ids` only grows. An id lands there once its folder holds
/// `meta.json` and `caption.txt`, even if some children failed; those ids
/// are also listed in `partial_ids` until a repair run completes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveState {
    /// Newest item archived by the last completed run.
    #[serde(default)]
    pub last_saved_media_id: Option<String>,

    #[serde(default)]
    pub last_run_iso: Option<String>,

    #[serde(default)]
    pub processed_ids: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub partial_ids: BTreeSet<String>,
}

impl ArchiveState {
    pub fn is_processed(&self, id: &str) -> bool {
        self.processed_ids.contains(id)
    }

    pub fn is_partial(&self, id: &str) -> bool {
        self.partial_ids.contains(id)
    }

    /// Record a materialized item. `complete` is false when any child
    /// download failed.
    pub fn mark_processed(&mut self, id: &str, complete: bool) {
        self.processed_ids.insert(id.to_string());
        if complete {
            self.partial_ids.remove(id);
        } else {
            self.partial_ids.insert(id.to_string());
        }
    }

    /// Stamp the run time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_run_iso = Some(now.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_field_names() {
        let mut state = ArchiveState::default();
        state.mark_processed("b", true);
        state.mark_processed("a", true);
        state.last_saved_media_id = Some("b".to_string());
        state.touch(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());

        let json: serde_json::Value = serde_json::to_value(&state).unwrap();
        assert_eq!(json["last_saved_media_id"], "b");
        assert_eq!(json["last_run_iso"], "2024-05-01T12:00:00Z");
        assert_eq!(json["processed_ids"], serde_json::json!(["a", "b"]));
        assert!(json.get("partial_ids").is_none());
    }

    #[test]
    fn test_reads_minimal_legacy_file() {
        let state: ArchiveState = serde_json::from_str(
            r#"{"last_saved_media_id": null, "last_run_iso": null, "processed_ids": ["1"]}"#,
        )
        .unwrap();
        assert!(state.is_processed("1"));
        assert!(state.partial_ids.is_empty());
    }

    #[test]
    fn test_partial_then_complete() {
        let mut state = ArchiveState::default();
        state.mark_processed("x", false);
        assert!(state.is_processed("x"));
        assert!(state.is_partial("x"));

        state.mark_processed("x", true);
        assert!(state.is_processed("x"));
        assert!(!state.is_partial("x"));
    }
}
