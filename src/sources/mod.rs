//! URL-space enumeration for the listing endpoint.
//!
//! - fragment generation (`sequence`)
//! - template substitution (`template`)
//! - the hand-authored B3 source list (`builtin`)

pub mod builtin;
pub mod sequence;
pub mod template;

pub use builtin::*;
pub use sequence::*;
pub use template::*;

use crate::domain::SourceConfig;
use crate::error::AppError;

/// Every concrete listing URL for one source, in fragment order.
pub fn enumerate_source(source: &SourceConfig) -> Result<Vec<String>, AppError> {
    let template = source.template()?;
    let fragments = fragments_for(&source.fragments)?;
    Ok(expand_urls(&template, &fragments))
}
