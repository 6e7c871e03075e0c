//! The harvest pipeline, shared by every source configuration.
//!
//! listing URLs -> raw identifiers -> canonical queue -> detail lookups -> tables -> CSV
//!
//! All run state (identifier queue, collected records, counters) is owned here and
//! handed from stage to stage; no stage keeps anything between runs.

use tracing::{debug, info};

use crate::data::{
    Admission, HttpFetch, IdentifierQueue, ListingStats, LookupFetcher, LookupPolicy, LookupStats,
    ReqwestFetcher, collect_raw_identifiers,
};
use crate::domain::HarvestConfig;
use crate::error::AppError;
use crate::io::write_tables;
use crate::normalize::{NormalizeOptions, normalize_records};

/// How the run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written { entities: usize, related: usize },
    /// No record survived lookup; nothing was written.
    NoData,
}

/// Counters from every stage plus the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub listing: ListingStats,
    pub queued: usize,
    pub duplicates: usize,
    pub degenerate: usize,
    pub lookup: LookupStats,
    pub outcome: RunOutcome,
}

/// Run against the real endpoints.
pub fn run_harvest(config: &HarvestConfig) -> Result<RunSummary, AppError> {
    let mut http = ReqwestFetcher::new()?;
    run_harvest_with(&mut http, config)
}

/// Run with any `HttpFetch`. Only configuration and write failures are errors.
pub fn run_harvest_with<F: HttpFetch>(
    http: &mut F,
    config: &HarvestConfig,
) -> Result<RunSummary, AppError> {
    // 1) Enumerate listing URLs and collect raw identifiers.
    let mut listing = ListingStats::default();
    let raw = collect_raw_identifiers(http, &config.sources, config.listing_timeout, &mut listing)?;
    info!(
        "Listing done: {} URLs, {} raw identifiers",
        listing.urls, listing.raw_identifiers
    );

    // 2) Canonicalize and dedup across all sources.
    // Degenerate values are dropped without a log line.
    let mut queue = IdentifierQueue::new();
    for value in &raw {
        match queue.admit(value) {
            Admission::Queued(cnpj) => debug!("CNPJ {cnpj} queued for lookup"),
            Admission::Duplicate(cnpj) => debug!("CNPJ {cnpj} already queued, skipping"),
            Admission::Degenerate => {}
        }
    }
    let identifiers = queue.identifiers();
    info!("{} distinct identifiers queued for lookup", identifiers.len());

    // 3) Look each identifier up once.
    let policy = LookupPolicy {
        timeout: config.lookup_timeout,
        max_attempts: config.max_attempts,
    };
    let report = LookupFetcher::new(http, &config.lookup_url, policy).fetch_all(identifiers);

    // 4) Normalize and write.
    let options = NormalizeOptions {
        default_country: config.default_country.clone(),
        fill_related_country: config.fill_related_country,
    };
    let outcome = match normalize_records(&report.records, &options) {
        None => {
            info!("No valid data collected; no files written");
            RunOutcome::NoData
        }
        Some(tables) => {
            if tables.related.is_empty() {
                info!("No related parties in the collected records");
            }
            write_tables(&tables, &config.entities_out, &config.partners_out)?;
            info!(
                "Wrote {} entities to {} and {} related parties to {}",
                tables.entities.len(),
                config.entities_out.display(),
                tables.related.len(),
                config.partners_out.display()
            );
            RunOutcome::Written {
                entities: tables.entities.len(),
                related: tables.related.len(),
            }
        }
    };

    Ok(RunSummary {
        listing,
        queued: identifiers.len(),
        duplicates: queue.duplicates(),
        degenerate: queue.degenerate(),
        lookup: report.stats,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use super::*;
    use crate::data::http::testing::ScriptedFetcher;
    use crate::domain::{FragmentStrategy, SourceConfig};

    const LOOKUP: &str = "https://lookup.test/api/cnpj/v1";

    fn source(base: &str, values: &[&str]) -> SourceConfig {
        SourceConfig {
            base_url: base.to_string(),
            start: base.len() - 1,
            end: base.len(),
            fragments: FragmentStrategy::List {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    fn config(dir: &Path, sources: Vec<SourceConfig>) -> HarvestConfig {
        HarvestConfig {
            sources,
            lookup_url: LOOKUP.to_string(),
            lookup_timeout: Duration::from_secs(10),
            listing_timeout: Duration::from_secs(10),
            max_attempts: 2,
            default_country: "brasil".to_string(),
            fill_related_country: true,
            entities_out: dir.join("entities.csv"),
            partners_out: dir.join("partners.csv"),
        }
    }

    #[test]
    fn identifier_listed_by_two_sources_is_looked_up_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut http = ScriptedFetcher::new();
        http.ok("page1-a", r#"{"results":[{"cnpj":"12345678000190"}]}"#)
            .ok(
                "page2-b",
                r#"{"results":[{"cnpj":"12345678000190"},{"cnpj":"0"},{"cnpj":"1234567890123"}]}"#,
            )
            .ok(
                &format!("{LOOKUP}/12345678000190"),
                r#"{"cnpj":"12345678000190","qsa":[{"nome_socio":"Fulano"}]}"#,
            )
            .timeout(&format!("{LOOKUP}/01234567890123"))
            .timeout(&format!("{LOOKUP}/01234567890123"));

        let config = config(
            dir.path(),
            vec![source("page1-X", &["a"]), source("page2-X", &["b"])],
        );
        let summary = run_harvest_with(&mut http, &config).unwrap();

        assert_eq!(http.calls_to(&format!("{LOOKUP}/12345678000190")), 1);
        assert_eq!(summary.queued, 2);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.degenerate, 1);
        assert_eq!(summary.lookup.found, 1);
        assert_eq!(summary.lookup.timed_out, 1);
        assert_eq!(
            summary.outcome,
            RunOutcome::Written {
                entities: 1,
                related: 1
            }
        );
        assert!(config.entities_out.exists());
        assert!(config.partners_out.exists());
    }

    #[test]
    fn nothing_found_writes_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut http = ScriptedFetcher::new();
        http.ok("page1-a", r#"{"results":[{"cnpj":"12345678000190"}]}"#)
            .status(&format!("{LOOKUP}/12345678000190"), 404);

        let config = config(dir.path(), vec![source("page1-X", &["a", "b"])]);
        let summary = run_harvest_with(&mut http, &config).unwrap();

        assert_eq!(summary.outcome, RunOutcome::NoData);
        assert_eq!(summary.listing.urls, 2);
        assert_eq!(summary.listing.failed, 1);
        assert_eq!(summary.lookup.rejected, 1);
        assert!(!config.entities_out.exists());
        assert!(!config.partners_out.exists());
    }
}
