//! Network-facing stages.
//!
//! - blocking HTTP seam (`http`)
//! - listing endpoint enumeration (`listing`)
//! - identifier canonicalization + dedup (`identifiers`)
//! - per-identifier detail lookup with retry (`lookup`)

pub mod http;
pub mod identifiers;
pub mod listing;
pub mod lookup;

pub use http::*;
pub use identifiers::*;
pub use listing::*;
pub use lookup::*;
