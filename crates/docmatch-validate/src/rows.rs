//! Row-by-row validation of a dataset against a selected schema.

use tracing::debug;

use docmatch_model::{
    AggregateValidationReport, FieldDefinition, FieldMatch, FieldMatches, FieldOutcome,
    FieldStatus, Row, RowValidationResult, Schema, cell,
};

use crate::field::validate_single_value;
use crate::value::is_blank;

const MISSING_COLUMN_ERROR: &str = "Required field has no matching column";

/// Column bound to the definition its values are checked against.
#[derive(Debug)]
struct Binding<'a> {
    field: &'a str,
    column: &'a str,
    definition: &'a FieldDefinition,
}

/// Applies a schema and its field-to-column mapping to dataset rows.
#[derive(Debug)]
pub struct RowValidator<'a> {
    schema: &'a Schema,
    bindings: Vec<Binding<'a>>,
    missing_required: Vec<&'a FieldDefinition>,
}

impl<'a> RowValidator<'a> {
    pub fn new(schema: &'a Schema, matches: &'a FieldMatches) -> Self {
        let by_column = matches.by_column();
        let mut bindings = Vec::new();
        for entry in matches.matched() {
            let Some(column) = entry.column.as_deref() else {
                continue;
            };
            // A column claimed twice is validated once, for its last claimant.
            if !by_column
                .get(column)
                .is_some_and(|owner| owner.field == entry.field)
            {
                continue;
            }
            match schema.field(&entry.definition) {
                Some(definition) => bindings.push(Binding {
                    field: entry.field.as_str(),
                    column,
                    definition,
                }),
                None => debug!(
                    field = %entry.field,
                    column,
                    "mapped field not defined in schema {}",
                    schema.name
                ),
            }
        }

        let missing_required = schema
            .required_fields()
            .filter(|field| !matches.get(&field.name).is_some_and(FieldMatch::is_matched))
            .collect();

        Self {
            schema,
            bindings,
            missing_required,
        }
    }

    /// Required fields that no column was bound to.
    pub fn missing_required(&self) -> impl Iterator<Item = &str> {
        self.missing_required.iter().map(|f| f.name.as_str())
    }

    /// Validates one row. `row_id` is the 1-based row position.
    pub fn validate_row(&self, row_id: usize, row: &Row) -> RowValidationResult {
        let mut fields = Vec::with_capacity(self.missing_required.len() + self.bindings.len());

        for field in &self.missing_required {
            fields.push(FieldOutcome {
                field: field.name.clone(),
                column: None,
                value: None,
                expected: None,
                status: FieldStatus::MissingColumn,
                errors: vec![MISSING_COLUMN_ERROR.to_string()],
            });
        }

        for binding in &self.bindings {
            let value = cell(row, binding.column);
            let outcome = validate_single_value(value, binding.definition, self.schema);
            let status = if outcome.valid {
                FieldStatus::Match
            } else if binding.definition.required && is_blank(value) {
                FieldStatus::MissingData
            } else {
                FieldStatus::Mismatch
            };
            fields.push(FieldOutcome {
                field: binding.field.to_string(),
                column: Some(binding.column.to_string()),
                value: Some(value.to_string()),
                expected: outcome.expected,
                status,
                errors: outcome.reason.into_iter().collect(),
            });
        }

        let valid = fields.iter().all(|f| f.status.is_valid());
        RowValidationResult {
            row_id,
            valid,
            fields,
        }
    }

    pub fn validate_rows(&self, rows: &[Row]) -> Vec<RowValidationResult> {
        let results: Vec<RowValidationResult> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.validate_row(idx + 1, row))
            .collect();
        debug!(
            schema = %self.schema.name,
            total = results.len(),
            valid = results.iter().filter(|r| r.valid).count(),
            "validated rows"
        );
        results
    }

    /// Aggregate totals for rows validated against this schema.
    pub fn report(
        &self,
        match_score: f64,
        results: &[RowValidationResult],
    ) -> AggregateValidationReport {
        AggregateValidationReport::from_rows(
            &self.schema.name,
            &self.schema.document_type,
            match_score,
            results,
        )
    }
}
