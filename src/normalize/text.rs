//! Text normalization shared by column names and string cells.

use serde_json::Value;

/// Lowercase, spaces to underscores, then transliterate to ASCII.
pub fn normalize_text(s: &str) -> String {
    deunicode::deunicode(&s.to_lowercase().replace(' ', "_"))
}

/// Normalize string cells; every other value passes through unchanged.
pub fn normalize_cell(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(normalize_text(&s)),
        other => other,
    }
}
