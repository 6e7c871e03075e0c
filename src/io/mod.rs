//! Input/output helpers.
//!
//! - table CSV export (`export`)
//! - source list JSON loading (`sources`)

pub mod export;
pub mod sources;

pub use export::*;
pub use sources::*;
