use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One spreadsheet row as a column-name-to-value mapping.
///
/// Rows are immutable once handed to the builder; every value is kept as the
/// raw authored text, including expression strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord {
    columns: BTreeMap<String, String>,
}

impl RowRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from (column, value) pairs; a repeated column keeps
    /// the last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let columns = pairs
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        Self { columns }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Raw cell under `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Cell under `column`, or the empty string when the column is absent.
    pub fn value(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Stable identifier from the `name` column.
    pub fn name(&self) -> &str {
        self.value("name")
    }

    /// Type discriminator with authoring whitespace collapsed, so
    /// `begin  group` and `begin group` read the same.
    pub fn row_type(&self) -> String {
        self.value("type")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_blank(&self) -> bool {
        self.columns.values().all(|value| value.trim().is_empty())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }
}
