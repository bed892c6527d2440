//! Run totals.

use crate::archive::materialize::{MaterializeResult, Outcome};
use crate::archive::walker::WalkEnd;
use crate::config::RunMode;

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub pages_fetched: u32,
    pub items_written: u32,
    pub items_skipped: u32,
    /// Items that could not be archived and stay unrecorded.
    pub items_failed: u32,
    /// Items written with at least one failed child.
    pub items_partial: u32,
    /// Listed entries that could not be parsed.
    pub items_unreadable: u32,
    pub children_downloaded: u32,
    pub children_present: u32,
    pub children_failed: u32,
    /// Listing pages that failed after the first one.
    pub page_errors: u32,
    pub interrupted: bool,
    pub walk_end: Option<WalkEnd>,
}

impl RunSummary {
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Fold one item result into the totals.
    pub fn add_item(&mut self, result: &MaterializeResult) {
        match result.outcome {
            Outcome::Skipped => self.items_skipped += 1,
            Outcome::Written => {
                self.items_written += 1;
                if !result.is_complete() {
                    self.items_partial += 1;
                }
            }
        }
        self.children_downloaded += result.children_downloaded;
        self.children_present += result.children_present;
        self.children_failed += result.children_failed;
    }

    pub fn mark_item_failed(&mut self) {
        self.items_failed += 1;
    }

    /// Anything a human should look at before trusting the archive.
    pub fn has_failures(&self) -> bool {
        self.items_failed > 0
            || self.items_unreadable > 0
            || self.children_failed > 0
            || self.page_errors > 0
    }

    /// The walk covered what it set out to: no interrupt, no failed page.
    pub fn completed(&self) -> bool {
        !self.interrupted && self.page_errors == 0 && self.walk_end != Some(WalkEnd::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_counts() {
        let mut summary = RunSummary::new(RunMode::Full);
        summary.add_item(&MaterializeResult::skipped());
        summary.add_item(&MaterializeResult {
            outcome: Outcome::Written,
            children_downloaded: 2,
            children_present: 1,
            children_failed: 1,
        });

        assert_eq!(summary.items_skipped, 1);
        assert_eq!(summary.items_written, 1);
        assert_eq!(summary.items_partial, 1);
        assert_eq!(summary.children_downloaded, 2);
        assert_eq!(summary.children_present, 1);
        assert_eq!(summary.children_failed, 1);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_completed() {
        let mut summary = RunSummary::new(RunMode::SinceLast);
        summary.walk_end = Some(WalkEnd::ReachedMarker);
        assert!(summary.completed());

        summary.interrupted = true;
        assert!(!summary.completed());

        let mut failed = RunSummary::new(RunMode::Full);
        failed.page_errors = 1;
        assert!(!failed.completed());
    }

    #[test]
    fn test_unreadable_entries_are_failures() {
        let mut summary = RunSummary::new(RunMode::Full);
        assert!(!summary.has_failures());
        summary.items_unreadable = 2;
        assert!(summary.has_failures());
    }
}
