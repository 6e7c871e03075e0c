//! Listing endpoint: one GET per enumerated URL, no retry.
//!
//! A failed or empty page is logged and contributes nothing; it never stops the run.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::data::http::HttpFetch;
use crate::domain::SourceConfig;
use crate::error::AppError;
use crate::sources::enumerate_source;

/// Counters for the listing stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingStats {
    pub urls: usize,
    pub failed: usize,
    pub empty: usize,
    pub raw_identifiers: usize,
    /// Result entries without a usable `cnpj` field.
    pub skipped_entries: usize,
}

/// Fetch every URL of every source, in source order then URL order.
///
/// Returns the raw identifiers in the order they were seen. Only an invalid source
/// configuration is an error; request failures are absorbed per URL.
pub fn collect_raw_identifiers<F: HttpFetch>(
    http: &mut F,
    sources: &[SourceConfig],
    timeout: Duration,
    stats: &mut ListingStats,
) -> Result<Vec<String>, AppError> {
    let mut out = Vec::new();
    for source in sources {
        for url in enumerate_source(source)? {
            out.extend(fetch_listing(http, &url, timeout, stats));
        }
    }
    Ok(out)
}

/// Fetch one listing page and pull the `cnpj` of every entry under `results`.
pub fn fetch_listing<F: HttpFetch>(
    http: &mut F,
    url: &str,
    timeout: Duration,
    stats: &mut ListingStats,
) -> Vec<String> {
    info!("Processing URL: {url}");
    stats.urls += 1;

    let results = match request_results(http, url, timeout) {
        Ok(results) => results,
        Err(reason) => {
            warn!("Listing request failed for {url}: {reason}");
            stats.failed += 1;
            return Vec::new();
        }
    };

    if results.is_empty() {
        warn!("No results for URL: {url}");
        stats.empty += 1;
        return Vec::new();
    }

    let mut identifiers = Vec::with_capacity(results.len());
    for entry in &results {
        match entry.get("cnpj") {
            Some(Value::String(s)) => identifiers.push(s.clone()),
            Some(Value::Number(n)) => identifiers.push(n.to_string()),
            _ => {
                warn!("Skipping listing entry without cnpj from {url}");
                stats.skipped_entries += 1;
            }
        }
    }
    stats.raw_identifiers += identifiers.len();
    identifiers
}

fn request_results<F: HttpFetch>(
    http: &mut F,
    url: &str,
    timeout: Duration,
) -> Result<Vec<Value>, String> {
    let resp = http.get(url, timeout).map_err(|e| e.to_string())?;
    if !resp.is_success() {
        return Err(format!("HTTP status {}", resp.status));
    }
    let body: Value =
        serde_json::from_str(&resp.body).map_err(|e| format!("invalid JSON body: {e}"))?;

    // A missing or non-array `results` is treated as an empty page.
    Ok(match body {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => results,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    })
}
