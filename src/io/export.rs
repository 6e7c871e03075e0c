//! Write output tables to CSV.
//!
//! One header row, then one line per table row. Existing files are overwritten.

use std::path::Path;

use serde_json::Value;

use crate::domain::Table;
use crate::error::AppError;
use crate::normalize::NormalizedTables;

/// Write both tables. The first failure aborts the write.
pub fn write_tables(
    tables: &NormalizedTables,
    entities_path: &Path,
    related_path: &Path,
) -> Result<(), AppError> {
    write_table_csv(entities_path, &tables.entities)?;
    write_table_csv(related_path, &tables.related)?;
    Ok(())
}

/// Write a table to a CSV file. A table without columns yields an empty file.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::output(format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    if !table.columns().is_empty() {
        writer
            .write_record(table.columns())
            .map_err(|e| AppError::output(format!("Failed to write CSV header: {e}")))?;
    }

    for row in table.rows() {
        writer
            .write_record(row.iter().map(cell_text))
            .map_err(|e| AppError::output(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush CSV '{}': {e}", path.display())))?;

    Ok(())
}

/// Text form of a cell: null is empty, nested values are compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::identifiers::canonicalize;
    use crate::domain::DetailRecord;
    use crate::normalize::{NormalizeOptions, normalize_records};

    fn read_back(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    fn record(raw: &str, body: Value) -> DetailRecord {
        let Value::Object(fields) = body else {
            panic!("expected object");
        };
        DetailRecord {
            requested: canonicalize(raw).unwrap(),
            fields,
        }
    }

    #[test]
    fn tables_round_trip_with_consistent_keys() {
        let records = vec![
            record(
                "11222333000181",
                json!({"cnpj": "11222333000181", "capital_social": 1000.5, "opcao_pelo_simples": false,
                       "qsa": [{"nome_socio": "A"}, {"nome_socio": "B"}]}),
            ),
            record(
                "99888777000166",
                json!({"cnpj": "99888777000166", "capital_social": null, "qsa": [{"nome_socio": "C"}]}),
            ),
            record("11222333000181", json!({"cnpj": "11222333000181", "qsa": []})),
        ];
        let options = NormalizeOptions {
            default_country: "brasil".to_string(),
            fill_related_country: true,
        };
        let tables = normalize_records(&records, &options).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let entities_path = dir.path().join("entities.csv");
        let related_path = dir.path().join("related.csv");
        write_tables(&tables, &entities_path, &related_path).unwrap();

        let (headers, rows) = read_back(&entities_path);
        assert_eq!(headers, ["cnpj", "capital_social", "opcao_pelo_simples"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ["11222333000181", "1000.5", "false"]);
        assert_eq!(rows[1], ["99888777000166", "", ""]);

        let (headers, related) = read_back(&related_path);
        let fk = headers.iter().position(|h| h == "cnpj").unwrap();
        assert_eq!(related.len(), 3);
        let entity_ids: Vec<&String> = rows.iter().map(|r| &r[0]).collect();
        for row in &related {
            assert!(entity_ids.contains(&&row[fk]));
        }
    }

    #[test]
    fn nested_cells_are_written_as_json() {
        assert_eq!(cell_text(&json!([{"a": 1}])), r#"[{"a":1}]"#);
        assert_eq!(cell_text(&Value::Null), "");
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_table_csv(&path, &Table::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
