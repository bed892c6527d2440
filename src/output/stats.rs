//! Run summary reporting.

use console::style;

use crate::archive::{RunSummary, WalkEnd};

fn describe_end(summary: &RunSummary) -> &'static str {
    if summary.interrupted {
        return "interrupted";
    }
    match summary.walk_end {
        Some(WalkEnd::Exhausted) => "end of listing",
        Some(WalkEnd::PageCap) => "page limit",
        Some(WalkEnd::ReachedMarker) => "reached last archived item",
        Some(WalkEnd::Failed) => "listing request failed",
        None => "not started",
    }
}

/// Print the end-of-run totals.
pub fn print_run_summary(summary: &RunSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!(
        "{}",
        style(format!("Run summary ({}):", summary.mode)).bold()
    );
    println!("  Pages:     {} ({})", summary.pages_fetched, describe_end(summary));
    println!("  Archived:  {}", style(summary.items_written).green());
    println!("  Skipped:   {} (already archived)", summary.items_skipped);
    if summary.items_partial > 0 {
        println!(
            "  Partial:   {} (run `repair` to retry)",
            style(summary.items_partial).yellow()
        );
    }
    if summary.items_unreadable > 0 {
        println!(
            "  Unreadable: {} (left out of the listing)",
            style(summary.items_unreadable).red()
        );
    }
    if summary.items_failed > 0 {
        println!("  Failed:    {}", style(summary.items_failed).red());
    }
    if summary.children_downloaded + summary.children_present + summary.children_failed > 0 {
        println!(
            "  Children:  {} downloaded, {} present, {} failed",
            summary.children_downloaded, summary.children_present, summary.children_failed
        );
    }
    if summary.page_errors > 0 {
        println!("  Page errors: {}", style(summary.page_errors).red());
    }
    println!("{}", style("═".repeat(50)).dim());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunMode;

    #[test]
    fn test_describe_end_prefers_interrupt() {
        let mut summary = RunSummary::new(RunMode::Full);
        summary.walk_end = Some(WalkEnd::Exhausted);
        assert_eq!(describe_end(&summary), "end of listing");

        summary.interrupted = true;
        assert_eq!(describe_end(&summary), "interrupted");
    }
}
