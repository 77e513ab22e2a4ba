//! Per-value, per-row and aggregate validation results.

use serde::{Deserialize, Serialize};

/// Result of checking a single raw value. Never thrown, always returned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
            expected: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            expected: None,
        }
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn from_check(valid: bool, reason: impl FnOnce() -> String) -> Self {
        if valid {
            Self::valid()
        } else {
            Self::invalid(reason())
        }
    }
}

/// Status of one field within one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldStatus {
    Match,
    Mismatch,
    /// Required field mapped to a column whose cell is empty.
    MissingData,
    /// Required field with no mapped column.
    MissingColumn,
}

impl FieldStatus {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Match)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub field: String,
    pub column: Option<String>,
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    pub status: FieldStatus,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowValidationResult {
    /// 1-based position of the row in the dataset.
    pub row_id: usize,
    pub valid: bool,
    pub fields: Vec<FieldOutcome>,
}

impl RowValidationResult {
    /// Outcomes that made the row invalid.
    pub fn errors(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.fields.iter().filter(|f| !f.status.is_valid())
    }
}

/// Totals across every validated row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateValidationReport {
    pub schema_name: String,
    pub document_type: String,
    pub match_score: f64,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub success_rate: f64,
}

impl AggregateValidationReport {
    pub fn from_rows(
        schema_name: &str,
        document_type: &str,
        match_score: f64,
        rows: &[RowValidationResult],
    ) -> Self {
        let total_rows = rows.len();
        let valid_rows = rows.iter().filter(|r| r.valid).count();
        let success_rate = if total_rows == 0 {
            0.0
        } else {
            valid_rows as f64 / total_rows as f64 * 100.0
        };
        Self {
            schema_name: schema_name.to_string(),
            document_type: document_type.to_string(),
            match_score,
            total_rows,
            valid_rows,
            invalid_rows: total_rows - valid_rows,
            success_rate,
        }
    }
}
