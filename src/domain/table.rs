//! Row-oriented table with a fixed column list.
//!
//! Built from JSON objects the way a dataframe is built from a list of dicts:
//! columns are the union of keys in first-seen order, and a key missing from an
//! object becomes `Value::Null` in that row.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn from_objects<I>(objects: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let objects: Vec<Map<String, Value>> = objects.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .into_iter()
            .map(|mut object| {
                columns
                    .iter()
                    .map(|c| object.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Remove the named columns; names that are not present are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        for name in names {
            if let Some(idx) = self.column_index(name) {
                self.columns.remove(idx);
                for row in &mut self.rows {
                    row.remove(idx);
                }
            }
        }
    }

    /// Append a column. `values` shorter than the table are padded with nulls.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Value>) {
        self.columns.push(name.into());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.push(values.next().unwrap_or(Value::Null));
        }
    }

    /// Replace every cell of one column in place. No-op if the column is absent.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(&Value) -> Value) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
    }

    /// Rename every column. A name already taken gets `_1`, `_2`, ... appended so
    /// headers stay unique.
    pub fn rename_columns(&mut self, mut f: impl FnMut(&str) -> String) {
        let mut renamed: Vec<String> = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let base = f(column);
            let mut name = base.clone();
            let mut suffix = 1;
            while renamed.contains(&name) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            renamed.push(name);
        }
        self.columns = renamed;
    }

    pub fn map_cells(&mut self, mut f: impl FnMut(Value) -> Value) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                *cell = f(std::mem::take(cell));
            }
        }
    }
}
