//! Human-readable run reporting.

pub mod format;

pub use format::*;
