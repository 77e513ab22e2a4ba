//! In-memory tabular input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One spreadsheet row: column name to raw string value.
pub type Row = BTreeMap<String, String>;

/// Ordered column names plus rows of raw string values.
///
/// `columns` is authoritative: it may name columns that have no value in
/// any row, and rows may omit columns (read as empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Builds a dataset from a header and positional records.
    pub fn from_records<H, R, V>(headers: H, records: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let columns: Vec<String> = headers.into_iter().map(Into::into).collect();
        let mut rows = Vec::new();
        for (idx, record) in records.into_iter().enumerate() {
            let values: Vec<String> = record.into_iter().map(Into::into).collect();
            if values.len() != columns.len() {
                return Err(ModelError::RowWidthMismatch {
                    row: idx + 1,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
            rows.push(columns.iter().cloned().zip(values).collect());
        }
        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `column` across every row, empty where absent.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |row| cell(row, column))
    }
}

/// Raw value of `column` in `row`; absent cells read as `""`.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Per-column statistics used by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub total_count: usize,
    pub non_empty_count: usize,
    /// `non_empty_count / total_count`, 0.0 for an empty dataset.
    pub fill_rate: f64,
    pub sample_values: Vec<String>,
}
