//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - source configuration (`UrlTemplate`, `FragmentStrategy`, `SourceConfig`, `HarvestConfig`)
//! - identifiers and lookup payloads (`Cnpj`, `DetailRecord`)
//! - the row-oriented `Table` the normalizer produces and the exporter writes

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
