//! Blocking HTTP seam.
//!
//! Stages talk to `HttpFetch` rather than `reqwest` directly so tests can script
//! responses. Non-2xx statuses are returned as responses, not errors: each stage
//! decides what a status means for it.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::error::AppError;

/// Status + body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
}

pub trait HttpFetch {
    fn get(&mut self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

/// `HttpFetch` backed by a shared `reqwest` blocking client.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("cnpj-harvest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    fn get(&mut self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}
