//! Detail lookup: one GET per canonical identifier, retried only on timeout.
//!
//! Each identifier runs its own small state machine:
//!
//! ```text
//! Pending --timeout--> Retrying --timeout (attempts exhausted)--> Abandoned
//!    |                    |
//!    +--------------------+--response--> Succeeded | Abandoned
//! ```
//!
//! Nothing that happens to one identifier is visible to the next one.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::data::http::{FetchError, HttpFetch};
use crate::domain::{Cnpj, DetailRecord};

/// Timeout and attempt budget for a single identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupPolicy {
    pub timeout: Duration,
    /// Total attempts, first one included. Only timeouts consume extra attempts.
    pub max_attempts: u32,
}

/// Why an identifier produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbandonReason {
    TimedOut,
    Rejected(u16),
    Transport(String),
    MalformedBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Pending,
    Retrying { attempts_made: u32 },
    /// `None` when the endpoint answered 2xx with an empty body.
    Succeeded(Option<DetailRecord>),
    Abandoned(AbandonReason),
}

impl LookupState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Abandoned(_))
    }
}

/// Per-outcome counters for the lookup stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupStats {
    pub requested: usize,
    pub found: usize,
    pub empty: usize,
    pub malformed: usize,
    pub rejected: usize,
    pub timed_out: usize,
    pub transport: usize,
    pub retries: usize,
}

impl LookupStats {
    fn record(&mut self, state: &LookupState) {
        match state {
            LookupState::Succeeded(Some(_)) => self.found += 1,
            LookupState::Succeeded(None) => self.empty += 1,
            LookupState::Abandoned(AbandonReason::TimedOut) => self.timed_out += 1,
            LookupState::Abandoned(AbandonReason::Rejected(_)) => self.rejected += 1,
            LookupState::Abandoned(AbandonReason::Transport(_)) => self.transport += 1,
            LookupState::Abandoned(AbandonReason::MalformedBody) => self.malformed += 1,
            LookupState::Pending | LookupState::Retrying { .. } => {}
        }
    }
}

/// Records collected by a lookup pass, in identifier order.
#[derive(Debug, Clone, Default)]
pub struct LookupReport {
    pub records: Vec<DetailRecord>,
    pub stats: LookupStats,
}

pub struct LookupFetcher<'a, F: HttpFetch> {
    http: &'a mut F,
    base_url: String,
    policy: LookupPolicy,
    /// Responses received so far (all statuses), for progress logging.
    request_counter: u64,
}

impl<'a, F: HttpFetch> LookupFetcher<'a, F> {
    pub fn new(http: &'a mut F, base_url: &str, policy: LookupPolicy) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            policy,
            request_counter: 0,
        }
    }

    fn url_for(&self, cnpj: &Cnpj) -> String {
        format!("{}/{}", self.base_url, cnpj)
    }

    /// Look up every identifier once, in order.
    pub fn fetch_all(&mut self, identifiers: &[Cnpj]) -> LookupReport {
        let mut report = LookupReport::default();
        for cnpj in identifiers {
            report.stats.requested += 1;
            let state = self.run(cnpj, &mut report.stats);
            report.stats.record(&state);
            if let LookupState::Succeeded(Some(record)) = state {
                report.records.push(record);
            }
        }
        report
    }

    /// Drive one identifier to a terminal state.
    #[cfg(test)]
    fn lookup(&mut self, cnpj: &Cnpj) -> LookupState {
        self.run(cnpj, &mut LookupStats::default())
    }

    fn run(&mut self, cnpj: &Cnpj, stats: &mut LookupStats) -> LookupState {
        let mut state = LookupState::Pending;
        while !state.is_terminal() {
            state = self.step(cnpj, &state);
            if matches!(state, LookupState::Retrying { .. }) {
                stats.retries += 1;
            }
        }
        state
    }

    fn step(&mut self, cnpj: &Cnpj, state: &LookupState) -> LookupState {
        let attempt = match state {
            LookupState::Pending => 1,
            LookupState::Retrying { attempts_made } => attempts_made + 1,
            terminal => return terminal.clone(),
        };

        let url = self.url_for(cnpj);
        match self.http.get(&url, self.policy.timeout) {
            Err(FetchError::Timeout) if attempt < self.policy.max_attempts => {
                warn!("Timeout looking up CNPJ {cnpj}, retrying (attempt {attempt})");
                LookupState::Retrying {
                    attempts_made: attempt,
                }
            }
            Err(FetchError::Timeout) => {
                warn!("Timeout looking up CNPJ {cnpj}, giving up after {attempt} attempt(s)");
                LookupState::Abandoned(AbandonReason::TimedOut)
            }
            Err(FetchError::Transport(e)) => {
                warn!("Error looking up CNPJ {cnpj}: {e}");
                LookupState::Abandoned(AbandonReason::Transport(e))
            }
            Ok(resp) => {
                self.request_counter += 1;
                info!(
                    "Status {} for CNPJ {cnpj} - request {}",
                    resp.status, self.request_counter
                );
                if !resp.is_success() {
                    warn!("CNPJ {cnpj} rejected with status {}", resp.status);
                    return LookupState::Abandoned(AbandonReason::Rejected(resp.status));
                }
                if resp.body.is_empty() {
                    info!("No data returned for CNPJ {cnpj}");
                    return LookupState::Succeeded(None);
                }
                match serde_json::from_str::<Value>(&resp.body) {
                    Ok(Value::Object(fields)) => LookupState::Succeeded(Some(DetailRecord {
                        requested: cnpj.clone(),
                        fields,
                    })),
                    Ok(other) => {
                        warn!("Expected a JSON object for CNPJ {cnpj}, got: {other}");
                        LookupState::Abandoned(AbandonReason::MalformedBody)
                    }
                    Err(e) => {
                        warn!("Failed to decode JSON for CNPJ {cnpj}: {e}");
                        warn!("Response body: {}", resp.body);
                        LookupState::Abandoned(AbandonReason::MalformedBody)
                    }
                }
            }
        }
    }
}
