//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - resolves the run configuration
//! - runs the harvest pipeline and prints the summary

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::domain::HarvestConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `harvest` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = harvest_config_from_args(&cli)?;
    tracing::info!("Starting harvest with {} sources", config.sources.len());

    let summary = pipeline::run_harvest(&config)?;
    println!("{}", crate::report::format_run_summary(&summary, &config));
    Ok(())
}

/// Logs go to stderr so stdout carries only the summary.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

pub fn harvest_config_from_args(cli: &Cli) -> Result<HarvestConfig, AppError> {
    let sources = match &cli.sources {
        Some(path) => crate::io::read_sources_json(path)?,
        None => crate::sources::builtin_sources(),
    };

    Ok(HarvestConfig {
        sources,
        lookup_url: cli.lookup_url.clone(),
        lookup_timeout: Duration::from_secs(cli.lookup_timeout),
        listing_timeout: Duration::from_secs(cli.listing_timeout),
        max_attempts: cli.max_attempts,
        default_country: cli.default_country.clone(),
        fill_related_country: !cli.no_related_country_default,
        entities_out: cli.entities_out.clone(),
        partners_out: cli.partners_out.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_uses_builtin_sources_by_default() {
        let cli = Cli::try_parse_from(["harvest", "--no-related-country-default"]).unwrap();
        let config = harvest_config_from_args(&cli).unwrap();
        assert_eq!(config.sources.len(), 4);
        assert!(!config.fill_related_country);
        assert_eq!(config.lookup_timeout, Duration::from_secs(10));
    }

    #[test]
    fn missing_sources_file_is_a_config_error() {
        let cli = Cli::try_parse_from(["harvest", "--sources", "/nonexistent/sources.json"]).unwrap();
        let err = harvest_config_from_args(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
