//! Load a listing source list from JSON.
//!
//! The file is a JSON array of `SourceConfig`:
//!
//! ```json
//! [{ "base_url": "https://...", "start": 140, "end": 141,
//!    "fragments": { "kind": "stepped", "start": "A", "step": 4 } }]
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::SourceConfig;
use crate::error::AppError;

/// Read and validate a sources file. Every template window is checked up front.
pub fn read_sources_json(path: &Path) -> Result<Vec<SourceConfig>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open sources JSON '{}': {e}", path.display()))
    })?;
    let sources: Vec<SourceConfig> = serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid sources JSON: {e}")))?;

    if sources.is_empty() {
        return Err(AppError::config(format!(
            "Sources JSON '{}' lists no sources.",
            path.display()
        )));
    }
    for source in &sources {
        source.template()?;
    }
    Ok(sources)
}
