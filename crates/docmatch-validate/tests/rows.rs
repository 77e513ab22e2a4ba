use std::collections::BTreeMap;

use docmatch_model::{
    FieldDefinition, FieldMatch, FieldMatches, FieldStatus, MatchType, Row, Schema,
    ValidationRule, ValidationSummary,
};
use docmatch_validate::RowValidator;

fn shareholder_schema() -> Schema {
    Schema::new(
        "shareholders",
        Some("SHAREHOLDER_REGISTER".to_string()),
        vec![
            FieldDefinition::new("SHAREHOLDER_ID_NUMBER", ValidationRule::SaIdNumber)
                .with_required(true)
                .with_slug(["ID_NUMBER"]),
            FieldDefinition::new("COMPANY_NAME", ValidationRule::None)
                .with_required(true)
                .with_slug(["COMPANY"]),
            FieldDefinition::new("AMOUNT", ValidationRule::DecimalAmount),
            FieldDefinition::new("PHONE", ValidationRule::None).with_max_matches(2),
        ],
        BTreeMap::new(),
        BTreeMap::new(),
    )
    .expect("schema")
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn bound(field: &str, column: &str) -> FieldMatch {
    FieldMatch::new(field, column, MatchType::ExactSlug, 100.0, ValidationSummary::default())
}

#[test]
fn valid_row_matches_every_field() {
    let schema = shareholder_schema();
    let matches: FieldMatches = vec![
        bound("SHAREHOLDER_ID_NUMBER", "ID_NUMBER"),
        bound("COMPANY_NAME", "COMPANY"),
    ]
    .into_iter()
    .collect();
    let validator = RowValidator::new(&schema, &matches);

    let result = validator.validate_row(
        1,
        &row(&[("ID_NUMBER", "8001015009087"), ("COMPANY", "Acme")]),
    );
    assert!(result.valid);
    assert_eq!(result.fields.len(), 2);
    assert!(result.fields.iter().all(|f| f.status == FieldStatus::Match));
}

#[test]
fn mismatch_and_missing_data_invalidate_the_row() {
    let schema = shareholder_schema();
    let matches: FieldMatches = vec![
        bound("SHAREHOLDER_ID_NUMBER", "ID_NUMBER"),
        bound("COMPANY_NAME", "COMPANY"),
    ]
    .into_iter()
    .collect();
    let validator = RowValidator::new(&schema, &matches);

    let result = validator.validate_row(3, &row(&[("ID_NUMBER", "123"), ("COMPANY", "")]));
    assert!(!result.valid);
    assert_eq!(result.row_id, 3);

    let id = &result.fields[0];
    assert_eq!(id.status, FieldStatus::Mismatch);
    assert_eq!(id.errors, vec!["Invalid South African ID number".to_string()]);
    assert_eq!(id.expected.as_deref(), Some("Valid SA ID Number"));

    let company = &result.fields[1];
    assert_eq!(company.status, FieldStatus::MissingData);
    assert_eq!(result.errors().count(), 2);
}

#[test]
fn unmapped_required_field_is_missing_column_on_every_row() {
    let schema = shareholder_schema();
    let matches: FieldMatches = vec![
        bound("COMPANY_NAME", "COMPANY"),
        FieldMatch::unmatched("SHAREHOLDER_ID_NUMBER"),
    ]
    .into_iter()
    .collect();
    let validator = RowValidator::new(&schema, &matches);
    assert_eq!(
        validator.missing_required().collect::<Vec<_>>(),
        vec!["SHAREHOLDER_ID_NUMBER"]
    );

    let rows = vec![row(&[("COMPANY", "Acme")]), row(&[("COMPANY", "Globex")])];
    let results = validator.validate_rows(&rows);
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(!result.valid);
        let missing = &result.fields[0];
        assert_eq!(missing.field, "SHAREHOLDER_ID_NUMBER");
        assert_eq!(missing.status, FieldStatus::MissingColumn);
        assert_eq!(missing.column, None);
    }

    let report = validator.report(50.0, &results);
    assert_eq!(report.document_type, "SHAREHOLDER_REGISTER");
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.invalid_rows, 2);
    assert_eq!(report.success_rate, 0.0);
}

#[test]
fn synthetic_fields_use_their_base_definition() {
    let schema = shareholder_schema();
    let extra = FieldMatch::new(
        "AMOUNT",
        "Amount 2",
        MatchType::ContentValidation,
        90.0,
        ValidationSummary::default(),
    )
    .renamed("AMOUNT_2");
    assert_eq!(extra.definition, "AMOUNT");
    let matches: FieldMatches = vec![
        bound("SHAREHOLDER_ID_NUMBER", "ID_NUMBER"),
        bound("COMPANY_NAME", "COMPANY"),
        bound("AMOUNT", "Amount"),
        extra,
    ]
    .into_iter()
    .collect();
    let validator = RowValidator::new(&schema, &matches);

    let result = validator.validate_row(
        1,
        &row(&[
            ("ID_NUMBER", "8001015009087"),
            ("COMPANY", "Acme"),
            ("Amount", "10.50"),
            ("Amount 2", "ten"),
        ]),
    );
    assert!(!result.valid);
    let synthetic = result
        .fields
        .iter()
        .find(|f| f.field == "AMOUNT_2")
        .expect("synthetic outcome");
    assert_eq!(synthetic.status, FieldStatus::Mismatch);
    assert_eq!(synthetic.errors, vec!["Invalid decimal amount".to_string()]);
}

#[test]
fn optional_empty_values_match() {
    let schema = shareholder_schema();
    let matches: FieldMatches = vec![
        bound("SHAREHOLDER_ID_NUMBER", "ID_NUMBER"),
        bound("COMPANY_NAME", "COMPANY"),
        bound("AMOUNT", "Amount"),
    ]
    .into_iter()
    .collect();
    let validator = RowValidator::new(&schema, &matches);

    let result = validator.validate_row(
        1,
        &row(&[("ID_NUMBER", "8001015009087"), ("COMPANY", "Acme")]),
    );
    assert!(result.valid);
    assert_eq!(result.fields[2].value.as_deref(), Some(""));
}
