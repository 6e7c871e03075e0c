//! Command-line parsing for the CNPJ harvester.
//!
//! Flags only shape the run (endpoints, timeouts, output paths). What gets
//! enumerated comes from the built-in source list unless `--sources` replaces it.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{
    DEFAULT_COUNTRY, DEFAULT_LISTING_TIMEOUT_SECS, DEFAULT_LOOKUP_TIMEOUT_SECS,
    DEFAULT_LOOKUP_URL, DEFAULT_MAX_ATTEMPTS,
};

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "harvest",
    version,
    about = "Collect B3-listed CNPJs and export company + partner tables as CSV"
)]
pub struct Cli {
    /// JSON file with the listing sources to enumerate (defaults to the built-in B3 list).
    #[arg(long, value_name = "JSON")]
    pub sources: Option<PathBuf>,

    /// Lookup endpoint prefix; the 14-digit CNPJ is appended as the last path segment.
    #[arg(long, env = "CNPJ_LOOKUP_URL", default_value = DEFAULT_LOOKUP_URL)]
    pub lookup_url: String,

    /// Per-request timeout for lookups (seconds).
    #[arg(long, default_value_t = DEFAULT_LOOKUP_TIMEOUT_SECS)]
    pub lookup_timeout: u64,

    /// Per-request timeout for listing pages (seconds).
    #[arg(long, default_value_t = DEFAULT_LISTING_TIMEOUT_SECS)]
    pub listing_timeout: u64,

    /// Total lookup attempts per CNPJ; only timeouts are retried.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Value used when a country (`pais`) field is missing or blank.
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub default_country: String,

    /// Leave blank related-party countries as they are.
    #[arg(long)]
    pub no_related_country_default: bool,

    /// Company table output.
    #[arg(long, value_name = "CSV", default_value = "f_dados_cnpj_b3.csv")]
    pub entities_out: PathBuf,

    /// Related-party (QSA) table output.
    #[arg(long, value_name = "CSV", default_value = "dim_socios_cnpj_b3.csv")]
    pub partners_out: PathBuf,

    /// Debug-level logging (ignored when RUST_LOG is set).
    #[arg(short, long)]
    pub verbose: bool,
}
