//! Column-level and single-value validation entry points.

use std::collections::BTreeSet;

use docmatch_model::{
    EngineOptions, FieldDefinition, Row, Schema, ValidationOutcome, ValidationSummary, cell,
};

use crate::value::{check_value, is_blank, value_passes};

/// Validates one cell against a field, including the emptiness rules.
///
/// Empty values pass on optional fields and fail on required ones.
pub fn validate_single_value(
    value: &str,
    field: &FieldDefinition,
    schema: &Schema,
) -> ValidationOutcome {
    if is_blank(value) {
        return if field.required {
            ValidationOutcome::invalid("Required field is empty")
        } else {
            ValidationOutcome::valid()
        };
    }
    check_value(value, field, schema)
}

/// Validates every value of `column` against `field`.
///
/// Empty values on an optional field are dropped from both counts before
/// the percentage is taken.
pub fn validate_field_values(
    column: &str,
    field: &FieldDefinition,
    rows: &[Row],
    schema: &Schema,
    options: &EngineOptions,
) -> ValidationSummary {
    let limit = options.error_sample_size;
    let mut summary = ValidationSummary::default();
    let mut seen_invalid = BTreeSet::new();

    for row in rows {
        let value = cell(row, column);
        let blank = is_blank(value);
        if blank && !field.required {
            continue;
        }
        summary.total_count += 1;

        let valid = !blank && value_passes(value, field, schema);
        if valid {
            summary.valid_count += 1;
            continue;
        }

        if summary.errors.len() < limit {
            summary.errors.push(if blank {
                "Required field is empty".to_string()
            } else {
                format!("Invalid value: {value}")
            });
        }
        if summary.invalid_samples.len() < limit && seen_invalid.insert(value) {
            summary.invalid_samples.push(value.to_string());
        }
    }

    summary.valid_percentage = if summary.total_count == 0 {
        0.0
    } else {
        summary.valid_count as f64 / summary.total_count as f64 * 100.0
    };
    summary
}
