//! Entity and related-party tables.
//!
//! Steps, in order:
//! 1. keep the first record per identifier
//! 2. default blank `pais` values
//! 3. drop columns nobody downstream uses
//! 4. normalize column names and string cells
//! 5. derive `year`/`month` from `data_inicio_atividade`
//! 6. fan `qsa` entries out into the related-party table, keyed by `cnpj`
//! 7. drop `qsa` and `cnaes_secundarios` from the entity table
//!
//! The fan-out builds new objects from the entity rows; nothing is mutated in place.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};

use crate::domain::{DetailRecord, Table};
use crate::normalize::text::{normalize_cell, normalize_text};

pub const IDENTIFIER_COLUMN: &str = "cnpj";
pub const COUNTRY_COLUMN: &str = "pais";
pub const START_DATE_COLUMN: &str = "data_inicio_atividade";
pub const RELATED_PARTIES_COLUMN: &str = "qsa";
pub const SECONDARY_ACTIVITIES_COLUMN: &str = "cnaes_secundarios";
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";

/// Columns removed from the entity table before normalization.
pub const DROPPED_COLUMNS: [&str; 8] = [
    "email",
    "codigo_pais",
    "opcao_pelo_mei",
    "data_opcao_pelo_mei",
    "data_exclusao_do_mei",
    "data_exclusao_do_simples",
    "ente_federativo_responsavel",
    "data_opcao_pelo_simples",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub default_country: String,
    pub fill_related_country: bool,
}

/// The two output tables. Every related-party `cnpj` appears in the entity table.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTables {
    pub entities: Table,
    pub related: Table,
}

/// Build both tables, or `None` when there is nothing to write.
pub fn normalize_records(
    records: &[DetailRecord],
    options: &NormalizeOptions,
) -> Option<NormalizedTables> {
    let objects = dedup_records(records);
    if objects.is_empty() {
        return None;
    }

    let mut entities = Table::from_objects(objects);

    if entities.has_column(COUNTRY_COLUMN) {
        let country = Value::String(options.default_country.clone());
        entities.map_column(COUNTRY_COLUMN, |v| {
            if is_blank(v) {
                country.clone()
            } else {
                v.clone()
            }
        });
    }

    entities.drop_columns(&DROPPED_COLUMNS);
    normalize_table(&mut entities);
    derive_year_month(&mut entities);

    let mut related = related_parties(&entities, options);
    normalize_table(&mut related);

    entities.drop_columns(&[RELATED_PARTIES_COLUMN, SECONDARY_ACTIVITIES_COLUMN]);

    Some(NormalizedTables { entities, related })
}

/// First record per identifier, as JSON objects that always carry `cnpj`.
fn dedup_records(records: &[DetailRecord]) -> Vec<Map<String, Value>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        let identifier = record.identifier();
        if !seen.insert(identifier.clone()) {
            continue;
        }
        let mut fields = record.fields.clone();
        if !matches!(
            fields.get(IDENTIFIER_COLUMN),
            Some(Value::String(_) | Value::Number(_))
        ) {
            fields.insert(IDENTIFIER_COLUMN.to_string(), Value::String(identifier));
        }
        out.push(fields);
    }
    out
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn normalize_table(table: &mut Table) {
    table.rename_columns(normalize_text);
    table.map_cells(normalize_cell);
}

fn derive_year_month(table: &mut Table) {
    let Some(dates) = table.column(START_DATE_COLUMN) else {
        return;
    };
    let parsed: Vec<Option<NaiveDate>> = dates.into_iter().map(parse_date).collect();

    let years = parsed
        .iter()
        .map(|d| d.map_or(Value::Null, |d| Value::from(d.year())))
        .collect();
    let months = parsed
        .iter()
        .map(|d| d.map_or(Value::Null, |d| Value::from(d.month())))
        .collect();

    table.push_column(YEAR_COLUMN, years);
    table.push_column(MONTH_COLUMN, months);
}

/// Lenient date parsing; anything unrecognized is `None` for that row only.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let Value::String(raw) = value else {
        return None;
    };
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
        // Datetime strings: the date prefix is enough.
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// One row per `qsa` entry, stamped with the owning entity's `cnpj`.
fn related_parties(entities: &Table, options: &NormalizeOptions) -> Table {
    let (Some(id_idx), Some(qsa_idx)) = (
        entities.column_index(IDENTIFIER_COLUMN),
        entities.column_index(RELATED_PARTIES_COLUMN),
    ) else {
        return Table::default();
    };

    let mut out = Vec::new();
    for row in entities.rows() {
        let Value::Array(entries) = &row[qsa_idx] else {
            continue;
        };
        for entry in entries {
            let Value::Object(entry) = entry else {
                continue;
            };
            let mut party = entry.clone();
            party.insert(IDENTIFIER_COLUMN.to_string(), row[id_idx].clone());
            if options.fill_related_country
                && party.get(COUNTRY_COLUMN).is_none_or(is_blank)
            {
                party.insert(
                    COUNTRY_COLUMN.to_string(),
                    Value::String(options.default_country.clone()),
                );
            }
            out.push(party);
        }
    }
    Table::from_objects(out)
}
