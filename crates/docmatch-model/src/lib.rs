#![deny(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod matching;
pub mod options;
pub mod report;
pub mod schema;

pub use dataset::{ColumnProfile, Dataset, Row, cell};
pub use error::{ModelError, Result};
pub use matching::{FieldMatch, FieldMatches, MatchType, SchemaScore, ValidationSummary, clamp_score};
pub use options::{EngineOptions, TypePolicy};
pub use report::{
    AggregateValidationReport, FieldOutcome, FieldStatus, RowValidationResult, ValidationOutcome,
};
pub use schema::{
    ClaimPhase, FieldDefinition, ListItem, RegexRule, Schema, UnknownValidateType, ValidateType,
    ValidationRule,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_report_counts() {
        let rows = vec![
            RowValidationResult {
                row_id: 1,
                valid: true,
                fields: vec![],
            },
            RowValidationResult {
                row_id: 2,
                valid: false,
                fields: vec![FieldOutcome {
                    field: "AMOUNT".to_string(),
                    column: Some("Amount".to_string()),
                    value: Some("abc".to_string()),
                    expected: None,
                    status: FieldStatus::Mismatch,
                    errors: vec!["Invalid decimal amount".to_string()],
                }],
            },
        ];
        let report = AggregateValidationReport::from_rows("payments", "PAYMENT", 100.0, &rows);
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.valid_rows, 1);
        assert_eq!(report.invalid_rows, 1);
        assert_eq!(report.success_rate, 50.0);
        assert_eq!(rows[1].errors().count(), 1);
    }

    #[test]
    fn empty_report_has_zero_success_rate() {
        let report = AggregateValidationReport::from_rows("s", "S", 0.0, &[]);
        assert_eq!(report.success_rate, 0.0);
    }

    #[test]
    fn match_type_serializes_snake_case() {
        let json = serde_json::to_string(&MatchType::CaseInsensitiveField).expect("serialize");
        assert_eq!(json, "\"case_insensitive_field\"");
        let status = serde_json::to_string(&FieldStatus::MissingColumn).expect("serialize");
        assert_eq!(status, "\"MISSING_COLUMN\"");
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: EngineOptions =
            serde_json::from_str(r#"{"sample_size":10}"#).expect("deserialize options");
        assert_eq!(options.sample_size, 10);
        assert_eq!(options.content_accept_percentage, 70.0);
    }
}
