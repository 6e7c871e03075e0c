//! Formatted terminal output for a finished run.
//!
//! Kept apart from the pipeline so the stages only count, never print.

use crate::app::pipeline::{RunOutcome, RunSummary};
use crate::domain::HarvestConfig;

/// Format the end-of-run summary printed to stdout.
pub fn format_run_summary(summary: &RunSummary, config: &HarvestConfig) -> String {
    let mut out = String::new();

    out.push_str("=== harvest - CNPJ listing + lookup ===\n");
    out.push_str(&format!("Sources: {}\n", config.sources.len()));

    let l = &summary.listing;
    out.push_str(&format!(
        "Listing: {} URLs ({} failed, {} empty), {} raw identifiers",
        l.urls, l.failed, l.empty, l.raw_identifiers
    ));
    if l.skipped_entries > 0 {
        out.push_str(&format!(", {} entries without cnpj", l.skipped_entries));
    }
    out.push('\n');

    out.push_str(&format!(
        "Identifiers: {} queued, {} duplicates skipped, {} degenerate dropped\n",
        summary.queued, summary.duplicates, summary.degenerate
    ));

    let s = &summary.lookup;
    out.push_str(&format!(
        "Lookup: {} found, {} empty, {} malformed, {} rejected, {} timed out, {} transport errors ({} retries)\n",
        s.found, s.empty, s.malformed, s.rejected, s.timed_out, s.transport, s.retries
    ));

    match &summary.outcome {
        RunOutcome::Written { entities, related } => {
            out.push_str(&format!(
                "Wrote {entities} companies -> {}\n",
                config.entities_out.display()
            ));
            out.push_str(&format!(
                "Wrote {related} related parties -> {}\n",
                config.partners_out.display()
            ));
            out.push_str("Done.");
        }
        RunOutcome::NoData => out.push_str("No valid data collected; no files written."),
    }

    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::{ListingStats, LookupStats};

    fn config() -> HarvestConfig {
        HarvestConfig {
            sources: Vec::new(),
            lookup_url: "https://lookup.test".to_string(),
            lookup_timeout: Duration::from_secs(10),
            listing_timeout: Duration::from_secs(30),
            max_attempts: 2,
            default_country: "brasil".to_string(),
            fill_related_country: true,
            entities_out: "f.csv".into(),
            partners_out: "dim.csv".into(),
        }
    }

    fn summary(outcome: RunOutcome) -> RunSummary {
        RunSummary {
            listing: ListingStats {
                urls: 3,
                failed: 1,
                empty: 1,
                raw_identifiers: 4,
                skipped_entries: 0,
            },
            queued: 3,
            duplicates: 1,
            degenerate: 0,
            lookup: LookupStats {
                requested: 3,
                found: 2,
                timed_out: 1,
                retries: 1,
                ..LookupStats::default()
            },
            outcome,
        }
    }

    #[test]
    fn written_run_lists_both_files() {
        let text = format_run_summary(
            &summary(RunOutcome::Written {
                entities: 2,
                related: 5,
            }),
            &config(),
        );
        assert!(text.contains("Listing: 3 URLs (1 failed, 1 empty), 4 raw identifiers\n"));
        assert!(text.contains("Wrote 2 companies -> f.csv"));
        assert!(text.contains("Wrote 5 related parties -> dim.csv"));
        assert!(!text.contains("without cnpj"));
    }

    #[test]
    fn empty_run_says_so() {
        let text = format_run_summary(&summary(RunOutcome::NoData), &config());
        assert!(text.ends_with("No valid data collected; no files written."));
    }
}
