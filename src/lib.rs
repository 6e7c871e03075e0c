//! `cnpj-harvest` library crate.
//!
//! The binary (`harvest`) is a thin wrapper around this library so that:
//!
//! - every pipeline stage is testable without network access or spawning processes
//! - the stages can be driven with a different `HttpFetch` or source list

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod normalize;
pub mod report;
pub mod sources;
