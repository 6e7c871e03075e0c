//! Reshaping lookup records into the two output tables.
//!
//! - text/cell normalization (`text`)
//! - entity + related-party table construction (`tables`)

pub mod tables;
pub mod text;

pub use tables::*;
pub use text::*;
