//! Shared domain types.
//!
//! Configuration types are serde-friendly so a source list can be loaded from JSON
//! instead of the built-in one.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A base URL plus the byte window `[start, end)` replaced by each fragment.
///
/// Invariant: `start <= end <= base_url.len()`, both on char boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    base_url: String,
    start: usize,
    end: usize,
}

impl UrlTemplate {
    pub fn new(base_url: impl Into<String>, start: usize, end: usize) -> Result<Self, AppError> {
        let base_url = base_url.into();
        if start > end || end > base_url.len() {
            return Err(AppError::config(format!(
                "Invalid template window [{start}, {end}) for URL of length {}: {base_url}",
                base_url.len()
            )));
        }
        if !base_url.is_char_boundary(start) || !base_url.is_char_boundary(end) {
            return Err(AppError::config(format!(
                "Template window [{start}, {end}) splits a character in {base_url}"
            )));
        }
        Ok(Self {
            base_url,
            start,
            end,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

/// How the fragments for one source are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FragmentStrategy {
    /// Every `outer + inner` pair, outer-major. Repeated inner entries repeat fragments.
    Product { outer: Vec<char>, inner: Vec<char> },
    /// Single letters from `start`, adding `step` to the code point each time.
    Stepped { start: char, step: i32 },
    /// Hand-picked fragments, used verbatim.
    List { values: Vec<String> },
}

/// One listing source: where to substitute and what to substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub start: usize,
    pub end: usize,
    pub fragments: FragmentStrategy,
}

impl SourceConfig {
    pub fn template(&self) -> Result<UrlTemplate, AppError> {
        UrlTemplate::new(self.base_url.clone(), self.start, self.end)
    }
}

/// Fully resolved run configuration (CLI + env + sources file).
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub sources: Vec<SourceConfig>,
    /// Lookup endpoint prefix; the identifier is appended as the last path segment.
    pub lookup_url: String,
    pub lookup_timeout: Duration,
    pub listing_timeout: Duration,
    /// Total attempts per identifier (first try included).
    pub max_attempts: u32,
    pub default_country: String,
    /// Apply `default_country` to related-party entries too.
    pub fill_related_country: bool,
    pub entities_out: PathBuf,
    pub partners_out: PathBuf,
}

pub const DEFAULT_LOOKUP_URL: &str = "https://brasilapi.com.br/api/cnpj/v1";
pub const DEFAULT_COUNTRY: &str = "brasil";
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// A canonical 14-digit CNPJ (left-zero-padded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cnpj(String);

impl Cnpj {
    /// Wrap an already padded identifier.
    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One decoded lookup response, tagged with the identifier that was queried.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRecord {
    pub requested: Cnpj,
    pub fields: Map<String, Value>,
}

impl DetailRecord {
    /// Identifier used for dedup and as the related-party foreign key.
    ///
    /// Prefers the record's own `cnpj` field, falling back to the queried identifier.
    pub fn identifier(&self) -> String {
        match self.fields.get("cnpj") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => self.requested.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rejects_window_past_end() {
        assert!(UrlTemplate::new("abc", 1, 4).is_err());
        assert!(UrlTemplate::new("abc", 2, 1).is_err());
        assert!(UrlTemplate::new("abc", 3, 3).is_ok());
    }

    #[test]
    fn strategy_deserializes_from_tagged_json() {
        let json = r#"{"kind":"stepped","start":"A","step":4}"#;
        let strategy: FragmentStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(strategy, FragmentStrategy::Stepped { start: 'A', step: 4 });
    }

    #[test]
    fn record_identifier_falls_back_to_requested() {
        let record = DetailRecord {
            requested: Cnpj::from_canonical("00000000000191".to_string()),
            fields: Map::new(),
        };
        assert_eq!(record.identifier(), "00000000000191");
    }
}
